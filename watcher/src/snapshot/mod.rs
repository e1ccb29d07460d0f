//! Snapshot storage and diffing

pub mod diff;
pub mod store;
