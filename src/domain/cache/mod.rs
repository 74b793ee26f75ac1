//! Cache domain - raw key/value backend contract and key layout

mod key;
mod repository;

pub use key::CacheKey;
pub use repository::Cache;

#[cfg(test)]
pub use repository::mock::{MockCache, MockCacheOp};
