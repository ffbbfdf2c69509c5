//! Core types for paperchat.

pub mod message;

pub use message::*;
