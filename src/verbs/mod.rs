//! Irregular verbs: flip cards and the searchable table

pub mod collections;
pub mod navigator;
pub mod table;

pub use collections::{bundled_collections, table_one, VerbCollection, TABLE_ONE_ID, TABLE_TWO_ID};
pub use navigator::{CardNavigator, CollectionPolicy, Navigation, EMPTY_COLLECTION_MESSAGE};
pub use table::{filter, matches_search, normalize_for_search, NO_MATCHES_MESSAGE};
