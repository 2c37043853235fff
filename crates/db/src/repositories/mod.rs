//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod article_repo;
pub mod media_repo;
pub mod persona_repo;

pub use article_repo::ArticleRepo;
pub use media_repo::MediaRepo;
pub use persona_repo::PersonaRepo;
