//! Event bus adapters.
//!
//! Adapters implement the event publishing port for different environments:
//!
//! - `InMemoryEventBus` - In-process capture for tests and local runs
//! - `RedisEventPublisher` - Redis pub/sub for deployments

mod in_memory;
mod redis;

pub use in_memory::InMemoryEventBus;
pub use self::redis::RedisEventPublisher;
