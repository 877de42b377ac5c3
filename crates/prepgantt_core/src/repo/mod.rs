//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the blob store contract used by session and account services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories treat blobs as opaque text; parsing belongs to services.

pub mod blob_repo;
