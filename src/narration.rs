//! Read-aloud of card word forms
//!
//! The speech engine itself lives outside the crate (browser synthesis,
//! Android TTS, a console stub). `Narrator` only sequences calls into it:
//! one text at a time, a fixed gap after each completion or failure, and a
//! cancel that also clears the pending gap so nothing plays after navigation.
//!
//! Only one sequence is active at a time; starting a new one cancels the old.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::runtime::Clocked;
use crate::schedule::{TimerId, Timers};

/// Voice settings passed with every utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Language tag (e.g. "en-GB")
    pub language: String,
    /// 0.5 - 2.0, 1.0 is normal
    pub rate: f32,
    /// 0.5 - 2.0, 1.0 is normal
    pub pitch: f32,
    /// Substring of the preferred voice name, if the engine offers a choice
    pub voice_hint: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: "en-GB".to_string(),
            rate: 0.9, // a little slower for learners
            pitch: 1.0,
            voice_hint: Some("Aaron".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TtsError {
    #[error("speech synthesis is not supported on this platform")]
    NotSupported,
    #[error("speech failed: {0}")]
    SpeakFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtteranceOutcome {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeechEvent {
    pub id: UtteranceId,
    pub outcome: UtteranceOutcome,
}

/// Playback capability supplied by the host
pub trait SpeechEngine {
    fn is_available(&self) -> bool {
        true
    }

    /// Starts one utterance. Completion is reported later, either pushed by
    /// the host through [`Narrator::utterance_finished`] or pulled via
    /// [`SpeechEngine::drain_events`].
    fn speak(&mut self, text: &str, config: &SpeechConfig) -> Result<UtteranceId, TtsError>;

    /// Stops whatever is playing and drops queued utterances
    fn cancel(&mut self);

    fn drain_events(&mut self) -> Vec<SpeechEvent> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NarrationTimer {
    SpeakNext,
}

#[derive(Debug)]
struct Sequence {
    texts: Vec<String>,
    next: usize,
    active: Option<UtteranceId>,
}

pub struct Narrator {
    engine: Option<Box<dyn SpeechEngine>>,
    config: SpeechConfig,
    gap: Duration,
    sequence: Option<Sequence>,
    delay: Option<TimerId>,
    timers: Timers<NarrationTimer>,
}

impl fmt::Debug for Narrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Narrator")
            .field("has_engine", &self.engine.is_some())
            .field("config", &self.config)
            .field("gap", &self.gap)
            .field("sequence", &self.sequence)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl Narrator {
    pub fn new(engine: Option<Box<dyn SpeechEngine>>, config: SpeechConfig, gap: Duration) -> Self {
        Self {
            engine,
            config,
            gap,
            sequence: None,
            delay: None,
            timers: Timers::new(),
        }
    }

    /// Narrator without an engine; every call is a no-op
    pub fn silent() -> Self {
        Self::new(None, SpeechConfig::default(), Duration::ZERO)
    }

    pub fn is_available(&self) -> bool {
        self.engine
            .as_ref()
            .map(|engine| engine.is_available())
            .unwrap_or(false)
    }

    pub fn is_speaking(&self) -> bool {
        self.sequence.is_some()
    }

    pub fn config(&self) -> &SpeechConfig {
        &self.config
    }

    /// Speaks `texts` in order, replacing any sequence in progress.
    pub fn narrate<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.is_available() {
            debug!("speech engine unavailable, narration skipped");
            return;
        }
        self.cancel();

        let texts: Vec<String> = texts.into_iter().map(Into::into).collect();
        if texts.is_empty() {
            return;
        }
        debug!(forms = texts.len(), "narration started");
        self.sequence = Some(Sequence {
            texts,
            next: 0,
            active: None,
        });
        self.speak_next();
        self.pump();
    }

    /// Completion signal for an utterance. Events for anything other than the
    /// utterance currently playing are ignored.
    pub fn utterance_finished(&mut self, id: UtteranceId, outcome: UtteranceOutcome) {
        let Some(sequence) = self.sequence.as_mut() else {
            return;
        };
        if sequence.active != Some(id) {
            debug!(?id, "stale speech event ignored");
            return;
        }
        sequence.active = None;
        if outcome == UtteranceOutcome::Failed {
            debug!(?id, "utterance failed, moving on");
        }
        self.after_utterance();
    }

    /// Pulls completion events from engines that report them that way
    pub fn pump(&mut self) {
        let events = match self.engine.as_mut() {
            Some(engine) => engine.drain_events(),
            None => return,
        };
        for event in events {
            self.utterance_finished(event.id, event.outcome);
        }
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.delay.take() {
            self.timers.cancel(id);
        }
        if self.sequence.take().is_some() {
            debug!("narration cancelled");
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.cancel();
        }
    }

    pub fn advance(&mut self, by: Duration) {
        let target = self.timers.now() + by;
        self.pump();
        while let Some(fired) = self.timers.pop_due(target) {
            match fired.kind {
                NarrationTimer::SpeakNext => self.speak_next(),
            }
            self.pump();
        }
        self.timers.settle(target);
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    fn after_utterance(&mut self) {
        let finished = self
            .sequence
            .as_ref()
            .map(|s| s.next >= s.texts.len())
            .unwrap_or(true);
        if finished {
            self.sequence = None;
            debug!("narration complete");
            return;
        }
        self.delay = Some(self.timers.schedule(self.gap, NarrationTimer::SpeakNext));
    }

    fn speak_next(&mut self) {
        self.delay = None;
        let Some(sequence) = self.sequence.as_mut() else {
            return;
        };
        let Some(text) = sequence.texts.get(sequence.next).cloned() else {
            self.sequence = None;
            return;
        };
        sequence.next += 1;

        let Some(engine) = self.engine.as_mut() else {
            self.sequence = None;
            return;
        };
        match engine.speak(&text, &self.config) {
            Ok(id) => sequence.active = Some(id),
            Err(err) => {
                warn!(error = %err, text = %text, "utterance could not start");
                sequence.active = None;
                self.after_utterance();
            }
        }
    }
}

impl Drop for Narrator {
    fn drop(&mut self) {
        if self.is_speaking() {
            self.cancel();
        }
    }
}

impl Clocked for Narrator {
    fn now(&self) -> Duration {
        Narrator::now(self)
    }

    fn next_deadline(&self) -> Option<Duration> {
        Narrator::next_deadline(self)
    }

    fn advance(&mut self, by: Duration) {
        Narrator::advance(self, by)
    }
}
