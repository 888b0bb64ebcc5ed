//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods are generic over [`sqlx::PgExecutor`] so callers can pass either
//! `&PgPool` or `&mut *tx` from an open transaction.

pub mod output_repo;
pub mod prompt_repo;
pub mod user_repo;
pub mod video_repo;

pub use output_repo::OutputRepo;
pub use prompt_repo::PromptRepo;
pub use user_repo::UserRepo;
pub use video_repo::VideoRepo;
