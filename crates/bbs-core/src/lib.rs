//! # BBS Core
//!
//! The domain layer of the bulletin board backend: the post record, the
//! storage and clock ports, the post log gateway and the origin access gate.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod access;
pub mod domain;
pub mod error;
pub mod ports;
pub mod post_log;

pub use access::OriginGate;
pub use error::{AccessError, ConfigError, RepoError};
pub use post_log::PostLog;
