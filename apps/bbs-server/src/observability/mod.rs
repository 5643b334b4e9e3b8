//! Observability module - request IDs.

pub(crate) mod request_id;

pub use request_id::{RequestId, RequestIdMiddleware};
