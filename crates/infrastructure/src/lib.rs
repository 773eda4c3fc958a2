//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_platform_client;
mod in_memory_platform;

pub use http_platform_client::HttpPlatformClient;
pub use in_memory_platform::InMemoryPlatform;
