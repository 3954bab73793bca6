pub mod detection;
pub mod snapshot;
pub mod traits;
pub mod tree_search;
pub mod types;
