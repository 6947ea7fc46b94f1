// http-relay - buffering HTTP forwarding proxy with response interception and caching

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod proxy;
pub mod server;
pub mod upstream;
pub mod utils;

pub use proxy::{Proxy, ProxyBuilder, ProxyOutcome};
