//! Groove Storage
//!
//! Implementations of [`groove_core::PersistenceAdapter`].
//!
//! - [`MemoryStore`]: ephemeral sessions and tests
//! - [`JsonFileStore`]: one JSON document per collection in a data directory,
//!   replaced atomically on every save
//!
//! # Example
//!
//! ```rust,no_run
//! use groove_core::PersistenceAdapter;
//! use groove_storage::JsonFileStore;
//!
//! # async fn example() -> groove_core::Result<()> {
//! let store = JsonFileStore::open("./data").await?;
//! let tracks = store.load_tracks().await?;
//! store.save_tracks(&tracks).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod json;
mod memory;

pub use error::{Result, StorageError};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
