//! Flip-card navigation over an irregular verb collection
//!
//! Moving away from a card that shows its back first turns it face up, then
//! changes the card once the flip animation is over. Only one such deferred
//! move is ever pending.

use std::time::Duration;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use super::collections::VerbCollection;
use crate::config::TimingConfig;
use crate::error::{GameError, Result};
use crate::narration::Narrator;
use crate::runtime::Clocked;
use crate::schedule::{TimerId, Timers};
use crate::shuffle::{seeded_rng, shuffle};
use crate::types::IrregularVerb;

pub const EMPTY_COLLECTION_MESSAGE: &str =
    "This collection has no verbs yet. / В этой коллекции пока нет глаголов.";

/// How the visible order relates to the stored order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionPolicy {
    /// Shuffled on construction and on every collection change
    AutoShuffle,
    /// Stored order until `shuffle` is called
    Ordered,
}

/// Result of `go_prev` / `go_next`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Ignored,
    Immediate { index: usize },
    Deferred { index: usize, after: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavTimer {
    Navigate(usize),
}

#[derive(Debug)]
pub struct CardNavigator<R: Rng = ChaCha8Rng> {
    collections: Vec<VerbCollection>,
    active: usize,
    policy: CollectionPolicy,
    shuffled: Option<Vec<IrregularVerb>>,
    index: usize,
    show_back: bool,
    show_translation: bool,
    pending_nav: Option<TimerId>,
    flip_duration: Duration,
    timers: Timers<NavTimer>,
    narrator: Narrator,
    rng: R,
}

impl CardNavigator<ChaCha8Rng> {
    /// `None` seeds from the system time
    pub fn with_seed(
        collections: Vec<VerbCollection>,
        policy: CollectionPolicy,
        timing: &TimingConfig,
        narrator: Narrator,
        seed: Option<u64>,
    ) -> Self {
        Self::new(collections, policy, timing, narrator, seeded_rng(seed))
    }
}

impl<R: Rng> CardNavigator<R> {
    /// Starts on the first collection
    pub fn new(
        collections: Vec<VerbCollection>,
        policy: CollectionPolicy,
        timing: &TimingConfig,
        narrator: Narrator,
        rng: R,
    ) -> Self {
        let mut navigator = Self {
            collections,
            active: 0,
            policy,
            shuffled: None,
            index: 0,
            show_back: false,
            show_translation: false,
            pending_nav: None,
            flip_duration: timing.flip_duration(),
            timers: Timers::new(),
            narrator,
            rng,
        };
        navigator.apply_policy();
        navigator
    }

    /// Cards in the order they are shown
    pub fn display_list(&self) -> &[IrregularVerb] {
        match &self.shuffled {
            Some(shuffled) => shuffled,
            None => self.stored(),
        }
    }

    fn stored(&self) -> &[IrregularVerb] {
        self.collections
            .get(self.active)
            .map(|c| c.verbs.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.display_list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.display_list().is_empty()
    }

    pub fn current(&self) -> Option<&IrregularVerb> {
        self.display_list().get(self.index)
    }

    /// Message for the host to show instead of a card
    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_COLLECTION_MESSAGE)
    }

    pub fn flip(&mut self) -> Option<bool> {
        if self.is_empty() {
            return None;
        }
        self.narrator.cancel();
        if self.show_back {
            self.show_back = false;
            self.show_translation = false;
        } else {
            self.show_back = true;
        }
        Some(self.show_back)
    }

    pub fn toggle_translation(&mut self) -> Option<bool> {
        if self.is_empty() {
            return None;
        }
        self.show_translation = !self.show_translation;
        Some(self.show_translation)
    }

    pub fn can_prev(&self) -> bool {
        self.index > 0
    }

    pub fn can_next(&self) -> bool {
        self.index + 1 < self.len()
    }

    pub fn go_prev(&mut self) -> Navigation {
        self.navigate_to(self.index.saturating_sub(1))
    }

    pub fn go_next(&mut self) -> Navigation {
        self.navigate_to(self.index + 1)
    }

    fn navigate_to(&mut self, target: usize) -> Navigation {
        let len = self.len();
        if len == 0 {
            return Navigation::Ignored;
        }
        let target = target.min(len - 1);
        self.narrator.cancel();
        self.cancel_pending_nav();

        if self.show_back {
            self.show_back = false;
            self.pending_nav = Some(
                self.timers
                    .schedule(self.flip_duration, NavTimer::Navigate(target)),
            );
            debug!(target, "navigation deferred until the card is face up");
            Navigation::Deferred {
                index: target,
                after: self.flip_duration,
            }
        } else {
            self.set_index(target);
            Navigation::Immediate { index: target }
        }
    }

    fn set_index(&mut self, index: usize) {
        self.index = index;
        self.show_back = false;
        self.show_translation = false;
    }

    fn cancel_pending_nav(&mut self) {
        if let Some(id) = self.pending_nav.take() {
            self.timers.cancel(id);
        }
    }

    fn reset_view(&mut self) {
        self.cancel_pending_nav();
        self.set_index(0);
    }

    fn apply_policy(&mut self) {
        self.shuffled = match self.policy {
            CollectionPolicy::AutoShuffle => Some(self.random_order()),
            CollectionPolicy::Ordered => None,
        };
    }

    fn random_order(&mut self) -> Vec<IrregularVerb> {
        let stored = self
            .collections
            .get(self.active)
            .map(|c| c.verbs.as_slice())
            .unwrap_or(&[]);
        shuffle(stored, &mut self.rng)
    }

    /// New random order, back to the first card
    pub fn shuffle(&mut self) {
        self.narrator.cancel();
        self.shuffled = Some(self.random_order());
        self.reset_view();
        debug!(cards = self.len(), "deck shuffled");
    }

    pub fn select_collection(&mut self, id: &str) -> Result<()> {
        let position = self
            .collections
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| GameError::UnknownCollection(id.to_string()))?;

        self.narrator.cancel();
        self.active = position;
        self.apply_policy();
        self.reset_view();
        info!(collection = id, cards = self.len(), "collection selected");
        Ok(())
    }

    /// Reads V1, V2 and V3 of the current card aloud
    pub fn speak_current(&mut self) -> bool {
        let Some(verb) = self.current() else {
            return false;
        };
        let forms: Vec<String> = verb.forms().iter().map(|f| f.to_string()).collect();
        self.narrator.narrate(forms);
        self.narrator.is_speaking()
    }

    /// Lets a pull-style speech engine report finished utterances
    pub fn pump_speech(&mut self) {
        self.narrator.pump();
    }

    /// Fires navigation and narration timers in deadline order. A move due at
    /// the same instant as the next spoken form wins and silences it.
    pub fn advance(&mut self, by: Duration) {
        let target = self.timers.now() + by;
        loop {
            self.narrator.pump();
            let nav_due = self.timers.next_deadline().filter(|d| *d <= target);
            let speech_due = self.narrator.next_deadline().filter(|d| *d <= target);
            let step = match (nav_due, speech_due) {
                (Some(nav), Some(speech)) if speech < nav => speech,
                (Some(nav), _) => nav,
                (None, Some(speech)) => speech,
                (None, None) => break,
            };

            while let Some(fired) = self.timers.pop_due(step) {
                match fired.kind {
                    NavTimer::Navigate(index) => {
                        self.pending_nav = None;
                        self.narrator.cancel();
                        self.set_index(index);
                    }
                }
            }
            self.timers.settle(step);
            self.narrator.advance(step.saturating_sub(self.narrator.now()));
        }
        self.timers.settle(target);
        self.narrator.advance(target.saturating_sub(self.narrator.now()));
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.timers.next_deadline(), self.narrator.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn close(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.pending_nav = None;
        self.narrator.cancel();
        debug!(cancelled, "navigator closed");
    }

    pub fn collections(&self) -> &[VerbCollection] {
        &self.collections
    }

    pub fn active_collection(&self) -> Option<&VerbCollection> {
        self.collections.get(self.active)
    }

    pub fn policy(&self) -> CollectionPolicy {
        self.policy
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn show_back(&self) -> bool {
        self.show_back
    }

    pub fn show_translation(&self) -> bool {
        self.show_translation
    }

    pub fn is_navigation_pending(&self) -> bool {
        self.pending_nav
            .map(|id| self.timers.is_pending(id))
            .unwrap_or(false)
    }

    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }
}

impl<R: Rng> Clocked for CardNavigator<R> {
    fn now(&self) -> Duration {
        CardNavigator::now(self)
    }

    fn next_deadline(&self) -> Option<Duration> {
        CardNavigator::next_deadline(self)
    }

    fn advance(&mut self, by: Duration) {
        CardNavigator::advance(self, by)
    }
}
