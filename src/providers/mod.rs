//! Race feed implementations

pub mod memory;
pub mod yaml;

pub use memory::{FeedHandle, StaticFeed};
pub use yaml::YamlFeed;
