use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::FLASHCARDS_LIMIT_SECS;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub units_path: Option<PathBuf>,
    pub timing: TimingConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let units_path = std::env::var("DANCI_UNITS_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Self {
            log_level,
            units_path,
            timing: TimingConfig::from_env(),
        }
    }
}

/// Delays and limits for the timed transitions, in milliseconds unless noted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub fill_gap_correct_delay_ms: u64,
    pub fill_gap_wrong_delay_ms: u64,
    pub flashcards_limit_secs: u32,
    pub flip_duration_ms: u64,
    pub narration_gap_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fill_gap_correct_delay_ms: 800,
            fill_gap_wrong_delay_ms: 1500,
            flashcards_limit_secs: FLASHCARDS_LIMIT_SECS,
            flip_duration_ms: 500,
            narration_gap_ms: 550,
        }
    }
}

impl TimingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            fill_gap_correct_delay_ms: env_or("FILL_GAP_CORRECT_DELAY_MS", defaults.fill_gap_correct_delay_ms),
            fill_gap_wrong_delay_ms: env_or("FILL_GAP_WRONG_DELAY_MS", defaults.fill_gap_wrong_delay_ms),
            flashcards_limit_secs: env_or("FLASHCARDS_LIMIT_SECS", defaults.flashcards_limit_secs),
            flip_duration_ms: env_or("FLIP_DURATION_MS", defaults.flip_duration_ms),
            narration_gap_ms: env_or("NARRATION_GAP_MS", defaults.narration_gap_ms),
        }
    }

    pub fn answer_delay(&self, correct: bool) -> Duration {
        if correct {
            Duration::from_millis(self.fill_gap_correct_delay_ms)
        } else {
            Duration::from_millis(self.fill_gap_wrong_delay_ms)
        }
    }

    pub fn flip_duration(&self) -> Duration {
        Duration::from_millis(self.flip_duration_ms)
    }

    pub fn narration_gap(&self) -> Duration {
        Duration::from_millis(self.narration_gap_ms)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let timing = TimingConfig::default();
        assert_eq!(timing.answer_delay(true), Duration::from_millis(800));
        assert_eq!(timing.answer_delay(false), Duration::from_millis(1500));
        assert_eq!(timing.flashcards_limit_secs, 240);
        assert_eq!(timing.flip_duration(), Duration::from_millis(500));
        assert_eq!(timing.narration_gap(), Duration::from_millis(550));
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        std::env::set_var("DANCI_TEST_BAD_NUMBER", "soon");
        assert_eq!(env_or("DANCI_TEST_BAD_NUMBER", 42u64), 42);
        std::env::set_var("DANCI_TEST_GOOD_NUMBER", " 7 ");
        assert_eq!(env_or("DANCI_TEST_GOOD_NUMBER", 42u64), 7);
    }

    #[test]
    fn test_timing_roundtrips_through_json() {
        let timing = TimingConfig {
            flip_duration_ms: 250,
            ..Default::default()
        };
        let json = serde_json::to_string(&timing).unwrap();
        let back: TimingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, timing);
    }
}
