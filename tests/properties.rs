use std::collections::BTreeSet;

use proptest::prelude::*;

use recsys_lab::domain::{InMemoryDataset, Rating, RatingsDataset};
use recsys_lab::execution::{FnExecutor, ParallelExecutionManager};
use recsys_lab::progress::ProgressHandle;
use recsys_lab::trust::WeightedGraph;
use recsys_lab::validation::{CrossFoldValidation, FixedSizeGroups, GroupCrossFoldValidation, ValidationTechnique};

/// Sparse datasets of up to 12 users and 20 items
fn arbitrary_dataset() -> impl Strategy<Value = InMemoryDataset> {
    prop::collection::vec((1i64..12, 1i64..20, 1u8..=5), 1..120).prop_map(|triples| {
        InMemoryDataset::from_ratings(
            triples
                .into_iter()
                .map(|(user, item, value)| Rating::new(user, item, f64::from(value))),
        )
    })
}

fn arbitrary_graph() -> impl Strategy<Value = (Vec<i64>, Vec<(i64, i64, f64)>)> {
    (2usize..8).prop_flat_map(|n| {
        let nodes: Vec<i64> = (0..n as i64).collect();
        let edges = prop::collection::vec((0..n as i64, 0..n as i64, 0.0f64..=1.0), 0..20).prop_map(
            |edges| {
                let mut seen = BTreeSet::new();
                edges
                    .into_iter()
                    .filter(|&(a, b, _)| a != b && seen.insert((a.min(b), a.max(b))))
                    .collect::<Vec<_>>()
            },
        );
        (Just(nodes), edges)
    })
}

fn partition_of(dataset: &InMemoryDataset, folds: usize, seed: u64) -> recsys_lab::validation::Partition {
    CrossFoldValidation::new(folds, seed)
        .unwrap()
        .partition(dataset, &ProgressHandle::disabled())
        .unwrap()
}

proptest! {
    /// Every rating is held out in exactly one fold
    #[test]
    fn prop_folds_cover_ratings_disjointly(dataset in arbitrary_dataset(), folds in 2usize..7, seed in any::<u64>()) {
        let partition = partition_of(&dataset, folds, seed);

        prop_assert_eq!(partition.fold_sizes().iter().sum::<usize>(), dataset.num_ratings());
        for user in dataset.all_users() {
            for item in dataset.user_rated(user).unwrap() {
                let holding = partition.folds().iter().filter(|fold| fold.contains(user, item)).count();
                prop_assert_eq!(holding, 1);
            }
        }
    }

    /// Per-user fold sizes differ by at most one
    #[test]
    fn prop_folds_are_balanced_per_user(dataset in arbitrary_dataset(), folds in 2usize..7, seed in any::<u64>()) {
        let partition = partition_of(&dataset, folds, seed);

        for user in dataset.all_users() {
            let sizes = partition.user_fold_sizes(user);
            let max = sizes.iter().max().copied().unwrap_or(0);
            let min = sizes.iter().min().copied().unwrap_or(0);
            prop_assert!(max - min <= 1);
        }
    }

    #[test]
    fn prop_partition_is_deterministic(dataset in arbitrary_dataset(), seed in any::<u64>()) {
        prop_assert_eq!(partition_of(&dataset, 4, seed), partition_of(&dataset, 4, seed));
    }

    /// Group-level folds also hold out every rating exactly once
    #[test]
    fn prop_group_folds_cover_ratings(dataset in arbitrary_dataset(), seed in any::<u64>()) {
        let users = dataset.all_users().len();
        let groups = FixedSizeGroups::new((users / 3).max(1), users.min(2), seed)
            .unwrap()
            .form(&dataset)
            .unwrap();
        let partition = GroupCrossFoldValidation::new(3, seed, groups)
            .unwrap()
            .partition(&dataset, &ProgressHandle::disabled())
            .unwrap();

        for user in dataset.all_users() {
            for item in dataset.user_rated(user).unwrap() {
                let holding = partition.folds().iter().filter(|fold| fold.contains(user, item)).count();
                prop_assert_eq!(holding, 1);
            }
        }
    }

    #[test]
    fn prop_every_submitted_task_completes(count in 0usize..200, parallelism in 1usize..9) {
        let manager = ParallelExecutionManager::new(parallelism, ProgressHandle::disabled()).unwrap();
        let executor = FnExecutor::new(|value: usize| Ok(value + 1));

        let report = manager.run("increment", (0..count).collect(), &executor).unwrap();

        prop_assert!(report.is_complete());
        prop_assert_eq!(report.into_sorted_outputs(), (1..=count).collect::<Vec<_>>());
    }

    #[test]
    fn prop_graph_is_symmetric((nodes, edges) in arbitrary_graph()) {
        let graph = WeightedGraph::from_edges(nodes.clone(), edges).unwrap();

        for &a in &nodes {
            prop_assert_eq!(graph.distance(a, a).unwrap(), 0.0);
            for &b in &nodes {
                prop_assert_eq!(graph.weight(a, b).unwrap(), graph.weight(b, a).unwrap());
                prop_assert_eq!(graph.distance(a, b).unwrap(), graph.distance(b, a).unwrap());
            }
        }
    }
}
