//! Type aliases for shared state.
//!
//! The data model is shared by every viewer attached to a dataset and
//! notifies them synchronously from whichever thread performed the mutation,
//! so shared state is always `Send + Sync`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use synoptiq_core::types::*;
//!
//! // Instead of: Arc<Mutex<ViewState>>
//! let view: ThreadSafe<ViewState> = thread_safe(ViewState::default());
//! view.lock().redraw();
//! ```

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Uses `parking_lot::Mutex`, which is not reentrant: never call back into
/// code that locks the same value while holding the guard.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// A thread-safe read-write locked wrapper for read-heavy shared state.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// Create a new thread-safe value.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}

/// Create a new thread-safe read-write value.
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}
