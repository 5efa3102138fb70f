//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Every query on user-owned
//! rows is scoped by `(id, user_id)`.

pub mod download_repo;
pub mod generation_repo;

pub use download_repo::DownloadRepo;
pub use generation_repo::GenerationRepo;
