//! Modbot - modular robot move playback
//!
//! Library side of the `modbot` binary: configuration loading and the
//! frame-loop systems that drive a [`modbot_core::Session`].

pub mod config;
pub mod systems;
