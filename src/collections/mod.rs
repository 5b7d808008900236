//! Reference Collections
//!
//! Small single-threaded containers that sit beside the cache. Neither is
//! used by the expiring cache itself.

mod chained_map;
mod multimap;

pub use chained_map::ChainedHashMap;
pub use multimap::MultiMap;
