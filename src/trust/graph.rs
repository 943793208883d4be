use std::collections::HashMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::shortest_path::all_pairs_shortest_paths;
use crate::domain::UserId;
use crate::errors::{EngineError, EngineResult};

/// Undirected trust graph with memoized all-pairs distances.
///
/// Immutable once built; a different population needs a new graph.
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    nodes: Vec<UserId>,
    index: HashMap<UserId, usize>,
    weights: Array2<f64>,
    distances: Array2<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCentrality {
    pub user_id: UserId,
    pub closeness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub diameter: Option<f64>,
    pub mean_centrality: f64,
    pub centrality: Vec<NodeCentrality>,
}

impl WeightedGraph {
    pub fn from_edges<I>(mut nodes: Vec<UserId>, edges: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (UserId, UserId, f64)>,
    {
        nodes.sort_unstable();
        nodes.dedup();

        let index: HashMap<UserId, usize> = nodes.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let mut weights = Array2::from_elem((nodes.len(), nodes.len()), f64::NAN);

        for (a, b, weight) in edges {
            check_edge(a, b, weight)?;
            let i = lookup(&index, a)?;
            let j = lookup(&index, b)?;
            weights[[i, j]] = weight;
            weights[[j, i]] = weight;
        }

        let distances = all_pairs_shortest_paths(&weights);

        Ok(Self {
            nodes,
            index,
            weights,
            distances,
        })
    }

    pub fn nodes(&self) -> &[UserId] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        let n = self.nodes.len();
        (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .filter(|&(i, j)| !self.weights[[i, j]].is_nan())
            .count()
    }

    pub fn density(&self) -> f64 {
        let n = self.nodes.len();
        if n < 2 {
            return 0.0;
        }
        let possible = n * (n - 1) / 2;
        self.edge_count() as f64 / possible as f64
    }

    pub fn weight(&self, a: UserId, b: UserId) -> EngineResult<Option<f64>> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        let weight = self.weights[[i, j]];
        Ok(if i == j || weight.is_nan() { None } else { Some(weight) })
    }

    pub fn neighbours(&self, node: UserId) -> EngineResult<Vec<(UserId, f64)>> {
        let i = self.position(node)?;
        Ok(self
            .nodes
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i && !self.weights[[i, j]].is_nan())
            .map(|(j, &other)| (other, self.weights[[i, j]]))
            .collect())
    }

    /// Geodesic distance; infinite when no path exists
    pub fn distance(&self, a: UserId, b: UserId) -> EngineResult<f64> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        Ok(self.distances[[i, j]])
    }

    /// Closeness centrality: mean of `1 / distance` to every other node.
    ///
    /// Unreachable nodes are left out of the mean, and so are nodes at
    /// distance exactly 0 (linked by full-trust edges only). A node that
    /// reaches nothing scores 0.
    pub fn centrality(&self, node: UserId) -> EngineResult<f64> {
        let i = self.position(node)?;
        Ok(self.closeness_at(i))
    }

    pub fn centralities(&self) -> Vec<NodeCentrality> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, &user_id)| NodeCentrality {
                user_id,
                closeness: self.closeness_at(i),
            })
            .collect()
    }

    pub fn mean_centrality(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        let total: f64 = (0..self.nodes.len()).map(|i| self.closeness_at(i)).sum();
        total / self.nodes.len() as f64
    }

    /// Largest finite distance between two distinct nodes
    pub fn diameter(&self) -> Option<f64> {
        self.distances
            .indexed_iter()
            .filter(|&((i, j), d)| i != j && d.is_finite())
            .map(|(_, &d)| d)
            .fold(None, |max: Option<f64>, d| Some(max.map_or(d, |m| m.max(d))))
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            density: self.density(),
            diameter: self.diameter(),
            mean_centrality: self.mean_centrality(),
            centrality: self.centralities(),
        }
    }

    fn closeness_at(&self, i: usize) -> f64 {
        let (sum, reachable) = self
            .distances
            .row(i)
            .iter()
            .enumerate()
            .filter(|&(j, &d)| j != i && d.is_finite() && d != 0.0)
            .fold((0.0, 0usize), |(sum, count), (_, &d)| (sum + 1.0 / d, count + 1));

        if reachable == 0 { 0.0 } else { sum / reachable as f64 }
    }

    fn position(&self, node: UserId) -> EngineResult<usize> {
        lookup(&self.index, node)
    }
}

fn lookup(index: &HashMap<UserId, usize>, node: UserId) -> EngineResult<usize> {
    index.get(&node).copied().ok_or(EngineError::UserNotFound(node))
}

fn check_edge(a: UserId, b: UserId, weight: f64) -> EngineResult<()> {
    if a == b {
        return Err(EngineError::invalid("edge", format!("self edge on node {}", a)));
    }
    if !(0.0..=1.0).contains(&weight) {
        return Err(EngineError::invalid(
            "edge",
            format!("weight {} between {} and {} is outside [0, 1]", weight, a, b),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> WeightedGraph {
        WeightedGraph::from_edges(vec![1, 2, 3, 4], vec![(1, 2, 0.5), (2, 3, 0.75)]).unwrap()
    }

    #[test]
    fn test_weights_are_symmetric() {
        let graph = line();

        assert_eq!(graph.weight(1, 2).unwrap(), Some(0.5));
        assert_eq!(graph.weight(2, 1).unwrap(), Some(0.5));
        assert_eq!(graph.weight(1, 3).unwrap(), None);
        assert_eq!(graph.weight(1, 1).unwrap(), None);
        assert_eq!(graph.edge_count(), 2);
        assert!((graph.density() - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_distances_follow_paths() {
        let graph = line();

        assert_eq!(graph.distance(1, 1).unwrap(), 0.0);
        assert_eq!(graph.distance(1, 2).unwrap(), 0.5);
        assert_eq!(graph.distance(1, 3).unwrap(), 0.75);
        assert_eq!(graph.distance(3, 1).unwrap(), 0.75);
        assert!(graph.distance(1, 4).unwrap().is_infinite());
        assert_eq!(graph.diameter(), Some(0.75));
    }

    #[test]
    fn test_closeness_skips_unreachable_nodes() {
        let graph = line();

        // 1 reaches 2 at 0.5 and 3 at 0.75; 4 is unreachable
        let expected = (1.0 / 0.5 + 1.0 / 0.75) / 2.0;
        assert!((graph.centrality(1).unwrap() - expected).abs() < 1e-12);
        assert_eq!(graph.centrality(4).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_distance_neighbour_is_skipped() {
        let graph = WeightedGraph::from_edges(vec![1, 2, 3], vec![(1, 2, 1.0), (1, 3, 0.5)]).unwrap();

        assert_eq!(graph.distance(1, 2).unwrap(), 0.0);
        assert_eq!(graph.centrality(1).unwrap(), 2.0);
    }

    #[test]
    fn test_invalid_edges_are_rejected() {
        assert!(WeightedGraph::from_edges(vec![1, 2], vec![(1, 2, 1.5)]).is_err());
        assert!(WeightedGraph::from_edges(vec![1, 2], vec![(1, 1, 0.5)]).is_err());
        assert!(matches!(
            WeightedGraph::from_edges(vec![1, 2], vec![(1, 9, 0.5)]),
            Err(EngineError::UserNotFound(9))
        ));
    }

    #[test]
    fn test_unknown_node_query() {
        assert!(matches!(line().distance(1, 99), Err(EngineError::UserNotFound(99))));
    }
}
