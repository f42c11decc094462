pub mod config;
pub mod logging;

pub mod checksum;
pub mod fetcher;
pub mod http;
pub mod legend;
pub mod retry;
pub mod storage;
pub mod thumbnail;
