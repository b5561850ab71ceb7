//! Flashcards: see the phrase, flip for the translation, mark "know" or "skip"
//!
//! The session ends when the deck runs out or the countdown reaches zero,
//! whichever happens first. The countdown stops as soon as the session ends.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::celebration::Celebration;
use crate::config::TimingConfig;
use crate::error::{Phase, Result, TransitionError};
use crate::logging::HOST_TARGET;
use crate::runtime::Clocked;
use crate::schedule::{TimerId, Timers};
use crate::shuffle::shuffle;
use crate::types::{percent, Lesson, VocabItem};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlashcardTimer {
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashcardSummary {
    pub known: usize,
    pub skipped: usize,
    pub total: usize,
    pub percent: u32,
}

#[derive(Debug)]
pub struct FlashcardSession {
    lesson_id: String,
    deck: Vec<VocabItem>,
    limit_secs: u32,
    started: bool,
    index: usize,
    show_back: bool,
    known: Vec<usize>,
    skipped: Vec<usize>,
    seconds_left: u32,
    countdown: Option<TimerId>,
    finish_reported: bool,
    timers: Timers<FlashcardTimer>,
    celebration: Celebration,
}

impl FlashcardSession {
    /// Shuffles the lesson vocabulary once; the order is fixed for the session.
    pub fn new<R: Rng + ?Sized>(lesson: &Lesson, rng: &mut R, timing: &TimingConfig) -> Self {
        Self::from_deck(&lesson.id, shuffle(&lesson.vocabulary, rng), timing)
    }

    pub fn from_deck(lesson_id: &str, deck: Vec<VocabItem>, timing: &TimingConfig) -> Self {
        Self {
            lesson_id: lesson_id.to_string(),
            deck,
            limit_secs: timing.flashcards_limit_secs,
            started: false,
            index: 0,
            show_back: false,
            known: Vec::new(),
            skipped: Vec::new(),
            seconds_left: timing.flashcards_limit_secs,
            countdown: None,
            finish_reported: false,
            timers: Timers::new(),
            celebration: Celebration::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        if !self.started {
            Phase::NotStarted
        } else if self.is_finished() {
            Phase::Finished
        } else {
            Phase::InProgress
        }
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.deck.len() || self.seconds_left == 0
    }

    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(TransitionError::InvalidTransition {
                from: self.phase(),
                to: Phase::InProgress,
            }
            .into());
        }

        self.started = true;
        self.index = 0;
        self.show_back = false;
        self.known.clear();
        self.skipped.clear();
        self.seconds_left = self.limit_secs;
        info!(
            lesson = %self.lesson_id,
            cards = self.deck.len(),
            limit_secs = self.limit_secs,
            "flashcards started"
        );

        if self.is_finished() {
            self.on_finished();
        } else {
            self.countdown = Some(self.timers.schedule(TICK, FlashcardTimer::Tick));
            self.announce_current();
        }
        Ok(())
    }

    /// Toggles the visible face; returns the new `show_back`, or `None` when not running
    pub fn flip(&mut self) -> Option<bool> {
        if self.phase() != Phase::InProgress {
            return None;
        }
        self.show_back = !self.show_back;
        Some(self.show_back)
    }

    pub fn mark_known(&mut self) -> bool {
        self.resolve(true)
    }

    pub fn skip(&mut self) -> bool {
        self.resolve(false)
    }

    fn resolve(&mut self, known: bool) -> bool {
        if self.phase() != Phase::InProgress {
            debug!(known, phase = self.phase().as_str(), "card action ignored");
            return false;
        }

        if self.index < self.deck.len() {
            if known {
                self.known.push(self.index);
            } else {
                self.skipped.push(self.index);
            }
        }
        if known {
            self.celebration.fire();
        }
        self.show_back = false;
        self.index += 1;

        if self.is_finished() {
            self.on_finished();
        } else {
            self.announce_current();
        }
        true
    }

    fn tick(&mut self) {
        self.countdown = None;
        if self.phase() != Phase::InProgress {
            return;
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.is_finished() {
            self.on_finished();
        } else {
            self.countdown = Some(self.timers.schedule(TICK, FlashcardTimer::Tick));
        }
    }

    fn on_finished(&mut self) {
        if self.finish_reported {
            return;
        }
        self.finish_reported = true;
        if let Some(id) = self.countdown.take() {
            self.timers.cancel(id);
        }

        let timed_out = self.seconds_left == 0;
        info!(
            lesson = %self.lesson_id,
            known = self.known.len(),
            skipped = self.skipped.len(),
            total = self.deck.len(),
            timed_out,
            "flashcards finished"
        );
        if !self.known.is_empty() {
            self.celebration.fire();
        }
    }

    fn announce_current(&self) {
        if let Some(card) = self.deck.get(self.index) {
            info!(
                target: HOST_TARGET,
                answer = %card.en,
                translation = %card.ru,
                "[Flashcards] card {}/{}",
                self.index + 1,
                self.deck.len()
            );
        }
    }

    pub fn advance(&mut self, by: Duration) {
        let target = self.timers.now() + by;
        while let Some(fired) = self.timers.pop_due(target) {
            match fired.kind {
                FlashcardTimer::Tick => self.tick(),
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

    pub fn close(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.countdown = None;
        debug!(cancelled, "flashcards closed");
    }

    pub fn deck(&self) -> &[VocabItem] {
        &self.deck
    }

    pub fn current(&self) -> Option<&VocabItem> {
        if self.phase() == Phase::InProgress {
            self.deck.get(self.index)
        } else {
            None
        }
    }

    /// Text on the visible face of the current card
    pub fn visible_text(&self) -> Option<&str> {
        self.current().map(|card| {
            if self.show_back {
                card.ru.as_str()
            } else {
                card.en.as_str()
            }
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn show_back(&self) -> bool {
        self.show_back
    }

    pub fn known(&self) -> &[usize] {
        &self.known
    }

    pub fn skipped(&self) -> &[usize] {
        &self.skipped
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn celebration_trigger(&self) -> u64 {
        self.celebration.trigger()
    }

    pub fn summary(&self) -> Option<FlashcardSummary> {
        if self.phase() != Phase::Finished {
            return None;
        }
        Some(FlashcardSummary {
            known: self.known.len(),
            skipped: self.skipped.len(),
            total: self.deck.len(),
            percent: percent(self.known.len(), self.deck.len()),
        })
    }
}

impl Clocked for FlashcardSession {
    fn now(&self) -> Duration {
        FlashcardSession::now(self)
    }

    fn next_deadline(&self) -> Option<Duration> {
        FlashcardSession::next_deadline(self)
    }

    fn advance(&mut self, by: Duration) {
        FlashcardSession::advance(self, by)
    }
}

/// `m:ss`, as shown next to the countdown
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(n: usize) -> Vec<VocabItem> {
        (0..n)
            .map(|i| VocabItem::new(format!("en{i}"), format!("ru{i}")))
            .collect()
    }

    fn session(n: usize) -> FlashcardSession {
        FlashcardSession::from_deck("1A", deck(n), &TimingConfig::default())
    }

    #[test]
    fn test_actions_ignored_before_start() {
        let mut s = session(3);
        assert_eq!(s.phase(), Phase::NotStarted);
        assert_eq!(s.flip(), None);
        assert!(!s.mark_known());
        assert!(!s.skip());
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn test_flip_does_not_move() {
        let mut s = session(3);
        s.start().unwrap();
        assert_eq!(s.visible_text(), Some("en0"));
        assert_eq!(s.flip(), Some(true));
        assert_eq!(s.visible_text(), Some("ru0"));
        assert_eq!(s.index(), 0);
        assert_eq!(s.flip(), Some(false));
    }

    #[test]
    fn test_mark_known_resets_face_and_celebrates() {
        let mut s = session(3);
        s.start().unwrap();
        s.flip();
        assert!(s.mark_known());
        assert!(!s.show_back());
        assert_eq!(s.index(), 1);
        assert_eq!(s.known(), &[0]);
        assert_eq!(s.celebration_trigger(), 1);

        assert!(s.skip());
        assert_eq!(s.skipped(), &[1]);
        assert_eq!(s.celebration_trigger(), 1);
    }

    #[test]
    fn test_deck_exhaustion_finishes_and_stops_countdown() {
        let mut s = session(2);
        s.start().unwrap();
        s.advance(Duration::from_secs(3));
        assert_eq!(s.seconds_left(), 237);
        s.skip();
        s.skip();
        assert_eq!(s.phase(), Phase::Finished);
        assert!(s.next_deadline().is_none());
        s.advance(Duration::from_secs(10));
        assert_eq!(s.seconds_left(), 237);
        let summary = s.summary().unwrap();
        assert_eq!(summary.percent, 0);
        assert_eq!(s.celebration_trigger(), 0);
    }

    #[test]
    fn test_timeout_finishes_session() {
        let mut s = session(10);
        s.start().unwrap();
        s.mark_known();
        s.advance(Duration::from_secs(239));
        assert_eq!(s.phase(), Phase::InProgress);
        assert_eq!(s.seconds_left(), 1);
        s.advance(Duration::from_secs(1));
        assert_eq!(s.phase(), Phase::Finished);
        assert_eq!(s.seconds_left(), 0);
        assert!(!s.mark_known());
        assert!(s.next_deadline().is_none());

        let summary = s.summary().unwrap();
        assert_eq!(summary.known, 1);
        assert_eq!(summary.total, 10);
        assert_eq!(summary.percent, 10);
        // one for the card, one for the summary
        assert_eq!(s.celebration_trigger(), 2);
    }

    #[test]
    fn test_empty_deck_finishes_on_start() {
        let mut s = session(0);
        s.start().unwrap();
        assert_eq!(s.phase(), Phase::Finished);
        assert!(s.next_deadline().is_none());
        assert_eq!(s.summary().unwrap().percent, 0);
    }

    #[test]
    fn test_start_twice_is_invalid() {
        let mut s = session(2);
        s.start().unwrap();
        assert!(s.start().is_err());
    }

    #[test]
    fn test_close_stops_countdown() {
        let mut s = session(2);
        s.start().unwrap();
        s.close();
        s.advance(Duration::from_secs(30));
        assert_eq!(s.seconds_left(), 240);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(240), "4:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(0), "0:00");
    }
}
