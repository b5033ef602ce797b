//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Type aliases for the `Arc<Mutex<T>>` / `Arc<RwLock<T>>` shapes
//!   used to share state between the data model and its viewers.

pub mod aliases;

pub use aliases::*;
