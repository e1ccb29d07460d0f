//! Ephemeral user notifications

pub mod queue;
