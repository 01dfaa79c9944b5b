pub mod card;
pub mod sm2;
pub mod study_state;

pub use card::Card;
pub use sm2::{Grade, InvalidGrade, Scheduler};
pub use study_state::StudyState;
