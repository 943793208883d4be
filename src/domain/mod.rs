pub mod dataset;
pub mod models;

pub use dataset::{InMemoryDataset, ItemRatings, RatingsDataset, UserRatings};
pub use models::*;
