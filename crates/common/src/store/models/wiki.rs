//! Wiki entity: one row per anchor text

use crate::store::Candidate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wiki")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub word: String,

    /// Candidate priors stored as JSON: [["Paris", 0.91], ["Paris,_Texas", 0.04]]
    #[sea_orm(column_type = "Text", nullable)]
    pub p_e_m: Option<String>,

    /// Canonical casing for rows keyed by a lowercased word
    #[sea_orm(column_type = "Text", nullable)]
    pub lower: Option<String>,

    pub freq: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parse candidates from the stored JSON pairs
    pub fn parse_candidates(&self) -> Result<Vec<Candidate>, serde_json::Error> {
        match self.p_e_m.as_deref() {
            None | Some("") => Ok(Vec::new()),
            Some(raw) => {
                let pairs: Vec<(String, f32)> = serde_json::from_str(raw)?;
                Ok(pairs
                    .into_iter()
                    .map(|(entity, score)| Candidate { entity, score })
                    .collect())
            }
        }
    }

    /// Frequency as an unsigned count; negative values are treated as absent
    pub fn frequency(&self) -> Option<u64> {
        self.freq.and_then(|f| u64::try_from(f).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(p_e_m: Option<&str>, freq: Option<i64>) -> Model {
        Model {
            word: "Paris".to_string(),
            p_e_m: p_e_m.map(str::to_string),
            lower: None,
            freq,
        }
    }

    #[test]
    fn test_parse_candidates() {
        let candidates = row(Some(r#"[["Paris", 0.91], ["Paris,_Texas", 0.04]]"#), None)
            .parse_candidates()
            .unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].entity, "Paris");
        assert_eq!(candidates[1].entity, "Paris,_Texas");
    }

    #[test]
    fn test_missing_candidates() {
        assert!(row(None, None).parse_candidates().unwrap().is_empty());
        assert!(row(Some(""), None).parse_candidates().unwrap().is_empty());
        assert!(row(Some("{\"bad\": 1}"), None).parse_candidates().is_err());
    }

    #[test]
    fn test_frequency() {
        assert_eq!(row(None, Some(42)).frequency(), Some(42));
        assert_eq!(row(None, Some(-1)).frequency(), None);
        assert_eq!(row(None, None).frequency(), None);
    }
}
