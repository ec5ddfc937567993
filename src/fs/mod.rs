pub mod lister;
pub mod watcher;
