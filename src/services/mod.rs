pub mod aggregator;
pub mod db_cache;
pub mod fetcher;
pub mod m3u_parser;
pub mod memory_store;
pub mod metrics;
pub mod pipeline;
pub mod refresher;
pub mod static_playlist;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
