use ndarray::Array2;

/// Higher trust means a shorter hop
pub fn edge_cost(weight: f64) -> f64 {
    1.0 - weight
}

/// Floyd-Warshall over a symmetric weight matrix where NaN marks a missing
/// edge. Unreachable pairs stay at infinity.
pub fn all_pairs_shortest_paths(weights: &Array2<f64>) -> Array2<f64> {
    let n = weights.nrows();
    let mut distances = initial_distances(weights);

    for k in 0..n {
        for i in 0..n {
            let to_k = distances[[i, k]];
            if to_k.is_infinite() {
                continue;
            }
            for j in 0..n {
                let through_k = to_k + distances[[k, j]];
                if through_k < distances[[i, j]] {
                    distances[[i, j]] = through_k;
                }
            }
        }
    }

    symmetrize(&mut distances);
    distances
}

/// Paths summed in opposite directions can differ in the last bit
fn symmetrize(distances: &mut Array2<f64>) {
    let n = distances.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            let shortest = distances[[i, j]].min(distances[[j, i]]);
            distances[[i, j]] = shortest;
            distances[[j, i]] = shortest;
        }
    }
}

fn initial_distances(weights: &Array2<f64>) -> Array2<f64> {
    let n = weights.nrows();
    Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            0.0
        } else if weights[[i, j]].is_nan() {
            f64::INFINITY
        } else {
            edge_cost(weights[[i, j]])
        }
    })
}
