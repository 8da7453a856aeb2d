pub mod dashboard;
pub mod favorites;
pub mod persistence;
pub mod store;

pub use dashboard::Dashboard;
pub use favorites::Favorites;
pub use persistence::{rehydrate, PersistenceBridge, DISPLAYED_KEY, FAVORITES_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreResult};
