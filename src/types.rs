use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

// Limits shared by the game sessions
pub const MAX_QUESTIONS: usize = 8;
pub const FLASHCARDS_LIMIT_SECS: u32 = 4 * 60;
pub const MIN_ADVERBS: usize = 2;
pub const MIN_PHRASES: usize = 4;
pub const PHRASE_DISTRACTORS: usize = 3;

/// A single vocabulary entry (English phrase and Russian translation)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VocabItem {
    pub en: String,
    pub ru: String,
}

impl VocabItem {
    pub fn new(en: impl Into<String>, ru: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ru: ru.into(),
        }
    }
}

/// Lesson record (field names aligned with units.json)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub lesson: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_ru: Option<String>,
    #[serde(default)]
    pub grammar: String,
    #[serde(default)]
    pub vocabulary: Vec<VocabItem>,
    #[serde(default)]
    pub prompts: Vec<String>,
    #[serde(default)]
    pub adverbs: Vec<String>,
}

impl Lesson {
    /// Russian title, falling back to the English one
    pub fn title_ru_or_default(&self) -> &str {
        self.title_ru.as_deref().unwrap_or(&self.title)
    }

    pub fn translation_of(&self, en: &str) -> Option<&str> {
        self.vocabulary
            .iter()
            .find(|item| item.en == en)
            .map(|item| item.ru.as_str())
    }
}

/// Game listing entry attached to a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub layout: GameLayout,
    pub title_en: String,
    pub title_ru: String,
    /// 1 = easy, 2 = medium, 3 = hard
    pub difficulty: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameLayout {
    #[serde(rename = "2d")]
    Flat,
    #[serde(rename = "3d")]
    Depth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub unit: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_ru: Option<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub games: Vec<GameEntry>,
}

impl Unit {
    pub fn title_ru_or_default(&self) -> &str {
        self.title_ru.as_deref().unwrap_or(&self.title)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitsData {
    pub units: Vec<Unit>,
}

/// Games that have a session implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Flashcards,
    FillTheGap,
}

impl FromStr for GameKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flashcards" => Ok(GameKind::Flashcards),
            "fill-the-gap" => Ok(GameKind::FillTheGap),
            _ => Err(GameError::UnsupportedGame(s.to_string())),
        }
    }
}

impl GameKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            GameKind::Flashcards => "flashcards",
            GameKind::FillTheGap => "fill-the-gap",
        }
    }
}

/// Irregular verb: base form (V1), past simple (V2), past participle (V3), translation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrregularVerb {
    pub v1: String,
    pub v2: String,
    pub v3: String,
    pub ru: String,
}

impl IrregularVerb {
    pub fn new(
        v1: impl Into<String>,
        v2: impl Into<String>,
        v3: impl Into<String>,
        ru: impl Into<String>,
    ) -> Self {
        Self {
            v1: v1.into(),
            v2: v2.into(),
            v3: v3.into(),
            ru: ru.into(),
        }
    }

    /// Word forms in narration order
    pub fn forms(&self) -> [&str; 3] {
        [&self.v1, &self.v2, &self.v3]
    }
}

/// Whole-number completion percentage, 0 for an empty total
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}
