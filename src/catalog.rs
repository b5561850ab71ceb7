//! Lesson and unit data provider
//!
//! Read-only access to the units shipped in `data/units.json` or loaded from a
//! file given in the config. Units and lessons are looked up either by id
//! ("1A") or by their number ("1").

use std::path::Path;

use tracing::debug;

use crate::error::{GameError, Result};
use crate::types::{GameKind, Lesson, Unit, UnitsData};

const BUNDLED_UNITS: &str = include_str!("../data/units.json");

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    data: UnitsData,
}

impl Catalog {
    pub fn new(data: UnitsData) -> Self {
        Self { data }
    }

    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_UNITS)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: UnitsData = serde_json::from_str(json)?;
        debug!(units = data.units.len(), "catalog loaded");
        Ok(Self { data })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    pub fn units(&self) -> &[Unit] {
        &self.data.units
    }

    pub fn unit(&self, unit_id: &str) -> Result<&Unit> {
        self.data
            .units
            .iter()
            .find(|u| u.id == unit_id || u.unit.to_string() == unit_id)
            .ok_or_else(|| GameError::UnknownUnit(unit_id.to_string()))
    }

    pub fn lesson(&self, unit_id: &str, lesson_id: &str) -> Result<&Lesson> {
        let unit = self.unit(unit_id)?;
        unit.lessons
            .iter()
            .find(|l| l.id == lesson_id || l.lesson.to_string() == lesson_id)
            .ok_or_else(|| GameError::UnknownLesson {
                unit: unit_id.to_string(),
                lesson: lesson_id.to_string(),
            })
    }

    /// Resolves a game id, but only if the unit lists it and a session exists for it
    pub fn game(&self, unit_id: &str, game_id: &str) -> Result<GameKind> {
        let unit = self.unit(unit_id)?;
        if !unit.games.iter().any(|g| g.id == game_id) {
            return Err(GameError::UnknownGame {
                unit: unit_id.to_string(),
                game: game_id.to_string(),
            });
        }
        game_id.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = Catalog::bundled().unwrap();
        assert!(!catalog.units().is_empty());
        let lesson = catalog.lesson("1", "1A").unwrap();
        assert!(lesson.vocabulary.len() >= 4);
        assert!(lesson.adverbs.len() >= 2);
    }

    #[test]
    fn test_lookup_by_number() {
        let catalog = Catalog::bundled().unwrap();
        let by_id = catalog.lesson("1", "1B").unwrap();
        let by_number = catalog.lesson("1", "2").unwrap();
        assert_eq!(by_id.id, by_number.id);
    }

    #[test]
    fn test_unknown_unit_and_lesson() {
        let catalog = Catalog::bundled().unwrap();
        assert!(matches!(catalog.unit("99"), Err(GameError::UnknownUnit(_))));
        assert!(matches!(
            catalog.lesson("1", "9Z"),
            Err(GameError::UnknownLesson { .. })
        ));
    }

    #[test]
    fn test_game_must_be_listed_for_unit() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(catalog.game("1", "fill-the-gap").unwrap(), GameKind::FillTheGap);
        assert!(matches!(
            catalog.game("2", "fill-the-gap"),
            Err(GameError::UnknownGame { .. })
        ));
    }

    #[test]
    fn test_listed_game_without_session() {
        let catalog = Catalog::from_json_str(
            r#"{"units":[{"id":"9","unit":9,"title":"Sport","lessons":[],
                "games":[{"id":"memory","type":"2d","titleEn":"Memory","titleRu":"Память","difficulty":2}]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            catalog.game("9", "memory"),
            Err(GameError::UnsupportedGame(game)) if game == "memory"
        ));
    }

    #[test]
    fn test_invalid_json_is_data_error() {
        assert!(matches!(
            Catalog::from_json_str("{\"units\": 3}"),
            Err(GameError::Data(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("units.json");
        std::fs::write(
            &path,
            r#"{"units":[{"id":"7","unit":7,"title":"Food","lessons":[{"id":"7A","lesson":1,"title":"Breakfast"}]}]}"#,
        )
        .unwrap();

        let catalog = Catalog::from_path(&path).unwrap();
        assert_eq!(catalog.lesson("7", "7A").unwrap().title, "Breakfast");
        assert!(matches!(
            Catalog::from_path(dir.path().join("missing.json")),
            Err(GameError::Io(_))
        ));
    }
}
