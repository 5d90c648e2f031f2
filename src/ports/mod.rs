//! Port traits at the boundary of the engine.

pub mod config_port;
pub mod event_processor;
pub mod event_source;
