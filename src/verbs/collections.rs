//! Irregular verb collections
//!
//! Table One ships with the crate. Table Two is listed but has no verbs yet;
//! the navigator shows its empty-collection message for it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GameError, Result};
use crate::types::IrregularVerb;

const TABLE_ONE: &str = include_str!("../../data/irregular_verbs_table1.json");

pub const TABLE_ONE_ID: &str = "table1";
pub const TABLE_TWO_ID: &str = "table2";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbCollection {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub verbs: Vec<IrregularVerb>,
}

impl VerbCollection {
    pub fn new(id: impl Into<String>, label: impl Into<String>, verbs: Vec<IrregularVerb>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            verbs,
        }
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }
}

pub fn table_one() -> Result<Vec<IrregularVerb>> {
    let verbs: Vec<IrregularVerb> = serde_json::from_str(TABLE_ONE)?;
    debug!(verbs = verbs.len(), "table one loaded");
    Ok(verbs)
}

/// Every collection the verb games can switch between, in display order
pub fn bundled_collections() -> Result<Vec<VerbCollection>> {
    Ok(vec![
        VerbCollection::new(TABLE_ONE_ID, "Table One", table_one()?),
        VerbCollection::new(TABLE_TWO_ID, "Table Two", Vec::new()),
    ])
}

pub fn find<'a>(collections: &'a [VerbCollection], id: &str) -> Result<&'a VerbCollection> {
    collections
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| GameError::UnknownCollection(id.to_string()))
}
