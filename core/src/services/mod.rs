//! Services module
//!
//! The store and the background writer that mirrors it to storage.

pub mod persistence;
pub mod quiz;
pub mod store;

pub use persistence::PersistenceWriter;
pub use quiz::QuizAnswers;
pub use store::{LoadReport, ProfileStore};
