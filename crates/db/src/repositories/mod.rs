//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod analysis_repo;
pub mod dog_repo;
pub mod user_repo;

pub use analysis_repo::AnalysisRepo;
pub use dog_repo::DogRepo;
pub use user_repo::UserRepo;
