//! HTTP client for backend communication

pub mod client;
pub mod deployments;
