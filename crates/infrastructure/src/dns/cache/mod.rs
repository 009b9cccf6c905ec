pub mod cached_exchanger;
pub mod response_cache;

pub use cached_exchanger::{cache_key, CachedExchanger};
pub use response_cache::ResponseCache;
