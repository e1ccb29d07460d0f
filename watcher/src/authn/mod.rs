//! Authentication token retrieval

pub mod token;
