//! Local read-only status API

pub mod handlers;
pub mod serve;
pub mod state;
