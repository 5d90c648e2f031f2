//! Core domain types and logic.

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod gbm;
pub mod pipeline;
pub mod sequencer;
