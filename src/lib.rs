//! Keeps an in-memory directory tree in sync with asynchronously fetched
//! listings, preserving expansion and selection of nodes that survive a
//! refresh.

pub mod config;
pub mod error;
pub mod event;
pub mod fs;
pub mod logging;
pub mod render;
pub mod sync;
pub mod tree;

pub use error::{AppError, Result};
pub use sync::TreeSync;
pub use tree::{ApplyOutcome, DirectoryTree};
