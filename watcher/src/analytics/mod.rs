//! Derived deployment statistics

pub mod summary;
