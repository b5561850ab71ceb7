use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use super::generator::{build_questions, Question, QuestionKind};
use crate::celebration::Celebration;
use crate::config::TimingConfig;
use crate::error::{GameError, Phase, Result, TransitionError};
use crate::logging::HOST_TARGET;
use crate::runtime::Clocked;
use crate::schedule::{TimerId, Timers};
use crate::types::{percent, Lesson};

const NO_TRANSLATION: &str = "(no translation)";

const ADVERB_TRANSLATIONS: [(&str, &str); 4] = [
    ("usually", "обычно"),
    ("sometimes", "иногда"),
    ("often", "часто"),
    ("never", "никогда"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FillGapTimer {
    Advance,
}

/// What happened to an accepted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub expected: String,
    /// Delay before the next question is shown
    pub advance_in: Duration,
}

/// One play-through of the fill-the-gap game.
///
/// An answer locks the question until the auto-advance fires; further
/// answers in that window are ignored. A wrong answer is final.
#[derive(Debug)]
pub struct FillGapSession {
    lesson_id: String,
    questions: Vec<Question>,
    translations: Vec<String>,
    timing: TimingConfig,
    started: bool,
    index: usize,
    score: usize,
    selected: Option<String>,
    pending_advance: Option<TimerId>,
    timers: Timers<FillGapTimer>,
    celebration: Celebration,
}

impl FillGapSession {
    pub fn new<R: Rng + ?Sized>(lesson: &Lesson, rng: &mut R, timing: &TimingConfig) -> Self {
        let questions = build_questions(lesson, rng);
        Self::from_questions(lesson, questions, timing)
    }

    pub fn from_questions(lesson: &Lesson, questions: Vec<Question>, timing: &TimingConfig) -> Self {
        let translations = questions
            .iter()
            .map(|q| host_translation(lesson, q).to_string())
            .collect();

        Self {
            lesson_id: lesson.id.clone(),
            questions,
            translations,
            timing: timing.clone(),
            started: false,
            index: 0,
            score: 0,
            selected: None,
            pending_advance: None,
            timers: Timers::new(),
            celebration: Celebration::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.questions.is_empty() {
            Phase::Unavailable
        } else if !self.started {
            Phase::NotStarted
        } else if self.is_finished() {
            Phase::Finished
        } else {
            Phase::InProgress
        }
    }

    /// True once every question was answered (and trivially for an empty quiz)
    pub fn is_finished(&self) -> bool {
        self.index >= self.questions.len()
    }

    pub fn start(&mut self) -> Result<()> {
        match self.phase() {
            Phase::NotStarted => {
                self.started = true;
                self.index = 0;
                self.score = 0;
                self.selected = None;
                info!(
                    lesson = %self.lesson_id,
                    questions = self.questions.len(),
                    "fill-the-gap started"
                );
                self.announce_current();
                Ok(())
            }
            Phase::Unavailable => Err(GameError::InsufficientContent(self.lesson_id.clone())),
            from => Err(TransitionError::InvalidTransition {
                from,
                to: Phase::InProgress,
            }
            .into()),
        }
    }

    /// Records an answer for the current question.
    ///
    /// Returns `None` when the answer is ignored: the session is not running
    /// or an earlier answer is still waiting for its auto-advance.
    pub fn select_answer(&mut self, option: &str) -> Option<AnswerOutcome> {
        if self.phase() != Phase::InProgress || self.selected.is_some() {
            debug!(option, phase = self.phase().as_str(), "answer ignored");
            return None;
        }
        let question = self.questions.get(self.index)?;
        let correct = question.is_correct(option);
        let expected = question.correct.clone();

        self.selected = Some(option.to_string());
        if correct {
            self.score += 1;
            self.celebration.fire();
        }

        let advance_in = self.timing.answer_delay(correct);
        self.pending_advance = Some(self.timers.schedule(advance_in, FillGapTimer::Advance));
        debug!(index = self.index, correct, "answer recorded");

        Some(AnswerOutcome {
            correct,
            expected,
            advance_in,
        })
    }

    pub fn advance(&mut self, by: Duration) {
        let target = self.timers.now() + by;
        while let Some(fired) = self.timers.pop_due(target) {
            match fired.kind {
                FillGapTimer::Advance => self.next_question(),
            }
        }
        self.timers.settle(target);
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Drops every pending transition; the session is discarded after this
    pub fn close(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.pending_advance = None;
        debug!(cancelled, "fill-the-gap closed");
    }

    fn next_question(&mut self) {
        self.pending_advance = None;
        self.selected = None;
        self.index += 1;

        if self.is_finished() {
            info!(
                lesson = %self.lesson_id,
                score = self.score,
                total = self.questions.len(),
                "fill-the-gap finished"
            );
            if self.score > 0 {
                self.celebration.fire();
            }
        } else {
            self.announce_current();
        }
    }

    fn announce_current(&self) {
        if let (Some(question), Some(translation)) = (
            self.questions.get(self.index),
            self.translations.get(self.index),
        ) {
            info!(
                target: HOST_TARGET,
                answer = %question.correct,
                translation = %translation,
                "[Fill the gap] question {}/{}",
                self.index + 1,
                self.questions.len()
            );
        }
    }

    pub fn lesson_id(&self) -> &str {
        &self.lesson_id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current(&self) -> Option<&Question> {
        if self.phase() == Phase::InProgress {
            self.questions.get(self.index)
        } else {
            None
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_awaiting_advance(&self) -> bool {
        self.pending_advance
            .map(|id| self.timers.is_pending(id))
            .unwrap_or(false)
    }

    pub fn percent(&self) -> u32 {
        percent(self.score, self.questions.len())
    }

    pub fn celebration_trigger(&self) -> u64 {
        self.celebration.trigger()
    }
}

impl Clocked for FillGapSession {
    fn now(&self) -> Duration {
        FillGapSession::now(self)
    }

    fn next_deadline(&self) -> Option<Duration> {
        FillGapSession::next_deadline(self)
    }

    fn advance(&mut self, by: Duration) {
        FillGapSession::advance(self, by)
    }
}

/// Russian gloss of the expected answer, for the presenter's log
pub fn host_translation<'a>(lesson: &'a Lesson, question: &Question) -> &'a str {
    match question.kind {
        QuestionKind::Phrase => lesson.translation_of(&question.correct).unwrap_or(NO_TRANSLATION),
        QuestionKind::Adverb => ADVERB_TRANSLATIONS
            .iter()
            .find(|(en, _)| *en == question.correct)
            .map(|(_, ru)| *ru)
            .unwrap_or(NO_TRANSLATION),
    }
}
