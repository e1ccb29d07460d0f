//! Backend synchronization

pub mod watcher;
