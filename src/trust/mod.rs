//! Pairwise trust between users and the weighted graph built from it.

mod builder;
mod graph;
mod pairwise;
mod shortest_path;
mod task;

pub use builder::TrustGraphBuilder;
pub use graph::{GraphSummary, NodeCentrality, WeightedGraph};
pub use pairwise::{JaccardTrust, PairwiseTrust, PenalizedPearson};
pub use shortest_path::{all_pairs_shortest_paths, edge_cost};
pub use task::{PairTrust, PairwiseTrustExecutor};
