//! CuraEngine backend plugin for the postprocess slot.
//!
//! The engine hands every generated layer of g-code to the plugin. The plugin
//! holds each layer back by one exchange so it can prefix the next layer with
//! a comment about the boundary, tagged with a setting broadcast by the same
//! engine session.

pub mod config;
pub mod error;
pub mod identity;
pub mod lookback;
pub mod metadata;
pub mod registry;
pub mod server;
pub mod service;

pub use error::PluginError;
pub use server::{serve, spawn_plugin};
pub use service::PluginState;
