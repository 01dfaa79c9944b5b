//! Headless flashcard core: SM-2 scheduling, face token resolution, and
//! directory-bundle deck persistence.
pub mod catalog;
pub mod models;
pub mod package;
pub mod resolver;

pub use catalog::DeckCatalog;
pub use models::{Card, Grade, InvalidGrade, Scheduler, StudyState};
pub use package::{DeckPackage, PackageError};
pub use resolver::{FaceContent, ResourceNotFound};
