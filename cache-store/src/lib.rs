mod dash_cache;
mod memory_store;

pub use dash_cache::DashSelectionCache;
pub use memory_store::MemoryContentStore;
