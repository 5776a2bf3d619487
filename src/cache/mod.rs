// Cache module for local filesystem caching.
// Persists fetched gist documents so repeat reads skip the network.

pub mod paths;
pub mod store;

pub use paths::{entry_file_name, entry_path};
pub use store::DocumentCache;
