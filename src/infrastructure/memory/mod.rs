//! In-Memory Implementations
//!
//! 提供 ReleaseStorePort 的内存实现

mod release_store;

pub use release_store::InMemoryReleaseStore;
