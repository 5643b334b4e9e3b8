//! Domain entities - the core business objects.

mod post;

pub use post::{COLLECTION, LIST_LIMIT, PostEntry, PostRecord, RETENTION_SECS};
