use thiserror::Error;

/// Session phase, shared by the fill-the-gap and flashcards state machines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not enough lesson content to build a session
    Unavailable,
    NotStarted,
    InProgress,
    Finished,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Unavailable => "UNAVAILABLE",
            Phase::NotStarted => "NOT_STARTED",
            Phase::InProgress => "IN_PROGRESS",
            Phase::Finished => "FINISHED",
        }
    }
}

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: Phase, to: Phase },
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("unit not found: {0}")]
    UnknownUnit(String),
    #[error("lesson {lesson} not found in unit {unit}")]
    UnknownLesson { unit: String, lesson: String },
    #[error("game {game} is not available for unit {unit}")]
    UnknownGame { unit: String, game: String },
    #[error("no session is implemented for game {0}")]
    UnsupportedGame(String),
    #[error("verb collection not found: {0}")]
    UnknownCollection(String),
    #[error("lesson {0} does not have enough vocabulary or adverbs for this game")]
    InsufficientContent(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("invalid lesson data: {0}")]
    Data(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
