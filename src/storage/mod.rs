//! Persistent key-value storage.
//!
//! The device keeps a handful of JSON blobs across restarts: the auth
//! tokens, a snapshot of the session, the nutrition store and the app
//! state. [`KeyValueStore`] abstracts the backing storage so tests can run
//! against [`InMemoryKeyValueStore`] while the app uses [`FileKeyValueStore`].
//!
//! | Key | Written by |
//! |-----|------------|
//! | [`keys::AUTH_TOKENS`] | login / register actions |
//! | [`keys::AUTH_SESSION`] | session persistence listener |
//! | [`keys::NUTRITION`] | nutrition persistence listener |
//! | [`keys::APP_STATE`] | app-state persistence listener |

mod file_store;
pub mod keys;
mod memory_store;
mod repository;

pub use file_store::FileKeyValueStore;
pub use keys::Persisted;
pub use memory_store::InMemoryKeyValueStore;
pub use repository::KeyValueStore;
