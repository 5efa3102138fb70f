//! Shared domain types, the error taxonomy, and download helpers.
//!
//! Everything here is pure: no I/O, no service clients. The service crates
//! (`clookit-db`, `clookit-worker`, `clookit-api`) build on these types.

pub mod downloads;
pub mod error;
pub mod types;
