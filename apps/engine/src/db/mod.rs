//! Persistence for practice state.

pub mod date_utils;
pub mod error;
pub mod memory;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use memory::MemoryRepository;
pub use repository::{
    ErrorPatternRepository, LearnerRepository, PracticeRepository, ReviewItemRepository,
    SqliteRepository,
};
