//! Fill the gap: choose the word or phrase that completes the sentence

pub mod generator;
pub mod session;

pub use generator::{build_questions, Question, QuestionKind};
pub use session::{host_translation, AnswerOutcome, FillGapSession};
