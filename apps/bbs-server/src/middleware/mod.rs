//! Middleware modules.

pub mod error;
pub mod origin_gate;
