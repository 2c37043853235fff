//! Outbound integrations that are not AI models: object storage for
//! avatars and mirrored generations, and publishing media to X.

pub mod publish;
pub mod storage;

pub use publish::{PostResult, PublishError, XPublisher};
pub use storage::{object_key, LocalStore, ObjectStore, S3Store, StorageError};
