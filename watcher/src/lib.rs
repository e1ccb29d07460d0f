//! Zipp Watcher Library
//!
//! Core modules for the Zipp deployment watcher daemon.

pub mod analytics;
pub mod app;
pub mod authn;
pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
pub mod notify;
pub mod server;
pub mod snapshot;
pub mod storage;
pub mod sync;
pub mod utils;
pub mod workers;
