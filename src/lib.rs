//! # danci-games - bilingual vocabulary mini-games
//!
//! Game logic for the EN/RU lesson games, independent of any UI:
//!
//! - **Fill the gap** - pick the adverb or phrase that completes a sentence
//! - **Flashcards** - flip lesson phrases against a countdown
//! - **Irregular verbs** - flip cards with read-aloud, plus a searchable table
//!
//! ## Timing
//!
//! Every delayed transition (auto-advance, countdown, flip delay, narration
//! gap) lives on a per-session virtual clock. Hosts drive it with
//! `advance(by)`, or through the tokio helpers in [`runtime`].
//!
//! ## Module layout
//!
//! - [`types`] - lesson data and shared constants
//! - [`catalog`] - unit and lesson lookup
//! - [`fill_gap`] - question generator and session
//! - [`flashcards`] - timed flashcards session
//! - [`verbs`] - verb collections, card navigator, table search
//! - [`narration`] - speech sequencing over a host-supplied engine
//! - [`schedule`] - virtual-clock timers
//! - [`runtime`] - `Clocked` trait and tokio driver
//!
//! ## Example
//!
//! ```rust
//! use danci_games::{Catalog, FlashcardSession, TimingConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use std::time::Duration;
//!
//! let catalog = Catalog::bundled()?;
//! let lesson = catalog.lesson("1", "1A")?;
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//!
//! let mut session = FlashcardSession::new(lesson, &mut rng, &TimingConfig::default());
//! session.start()?;
//! session.mark_known();
//! session.advance(Duration::from_secs(1));
//! assert_eq!(session.seconds_left(), 239);
//! # Ok::<(), danci_games::GameError>(())
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod catalog;
pub mod celebration;
pub mod config;
pub mod error;
pub mod fill_gap;
pub mod flashcards;
pub mod logging;
pub mod narration;
pub mod runtime;
pub mod schedule;
pub mod shuffle;
pub mod translations;
pub mod types;
pub mod verbs;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use catalog::Catalog;
pub use config::{Config, TimingConfig};
pub use error::{GameError, Phase, Result, TransitionError};
pub use fill_gap::{AnswerOutcome, FillGapSession, Question, QuestionKind};
pub use flashcards::{FlashcardSession, FlashcardSummary};
pub use narration::{Narrator, SpeechConfig, SpeechEngine, TtsError};
pub use runtime::Clocked;
pub use verbs::{CardNavigator, CollectionPolicy, Navigation, VerbCollection};
