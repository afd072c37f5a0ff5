//! In-batch cosponsor reduction
//!
//! A flush buffer can hold several observations of the same
//! (bill, bioguide) pair: the same person seen through overlapping
//! documents. One bulk upsert statement must not carry two rows for one
//! key, so the buffer is reduced to exactly one merged row per key before
//! it is flushed.
//!
//! Merge policy is [`merge::first_wins`] per field plus
//! [`merge::promote_true`] for the original-cosponsor flag. This is
//! batch-order first-wins, not the cross-run coalesce the store applies on
//! conflict; see the module docs of [`crate::merge`] for why the two
//! differ.

use std::collections::HashMap;

use crate::merge::{first_wins, promote_true};
use billdb_common::db::models::{BillKey, CosponsorRecord};

/// Reduce a buffer to one row per (bill, bioguide), preserving
/// first-observation order
pub fn reduce(observations: Vec<CosponsorRecord>) -> Vec<CosponsorRecord> {
    let mut merged: Vec<CosponsorRecord> = Vec::new();
    let mut index: HashMap<(BillKey, String), usize> = HashMap::new();

    for observation in observations {
        let slot = (observation.key.clone(), observation.bioguide.clone());
        match index.get(&slot) {
            None => {
                index.insert(slot, merged.len());
                merged.push(observation);
            }
            Some(&at) => {
                let row = &mut merged[at];
                first_wins(&mut row.fullname, observation.fullname);
                first_wins(&mut row.party, observation.party);
                first_wins(&mut row.state, observation.state);
                first_wins(&mut row.joined_date, observation.joined_date);
                promote_true(&mut row.is_original, observation.is_original);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn observation(bioguide: &str) -> CosponsorRecord {
        CosponsorRecord {
            key: BillKey::new(118, "hr", 1),
            bioguide: bioguide.to_string(),
            fullname: None,
            party: None,
            state: None,
            joined_date: None,
            is_original: None,
        }
    }

    #[test]
    fn first_non_null_wins_per_field() {
        let first = CosponsorRecord {
            party: Some("D".to_string()),
            ..observation("B001")
        };
        let second = CosponsorRecord {
            fullname: Some("Jane Doe".to_string()),
            party: Some("R".to_string()),
            ..observation("B001")
        };

        let merged = reduce(vec![first, second]);
        assert_eq!(merged.len(), 1);
        // fullname filled by the later observation (first non-null)
        assert_eq!(merged[0].fullname.as_deref(), Some("Jane Doe"));
        // party keeps the first observation's value
        assert_eq!(merged[0].party.as_deref(), Some("D"));
    }

    #[test]
    fn any_true_promotes_the_original_flag() {
        let rows = vec![
            CosponsorRecord {
                is_original: Some(false),
                ..observation("B001")
            },
            CosponsorRecord {
                is_original: None,
                ..observation("B001")
            },
            CosponsorRecord {
                is_original: Some(true),
                ..observation("B001")
            },
            CosponsorRecord {
                is_original: Some(false),
                ..observation("B001")
            },
        ];

        let merged = reduce(rows);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].is_original, Some(true));
    }

    #[test]
    fn distinct_keys_stay_distinct() {
        let other_bill = CosponsorRecord {
            key: BillKey::new(117, "s", 2),
            ..observation("B001")
        };
        let merged = reduce(vec![observation("B001"), observation("B002"), other_bill]);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn output_preserves_first_observation_order() {
        let merged = reduce(vec![
            observation("C003"),
            observation("A001"),
            observation("C003"),
            observation("B002"),
        ]);
        let order: Vec<&str> = merged.iter().map(|r| r.bioguide.as_str()).collect();
        assert_eq!(order, vec!["C003", "A001", "B002"]);
    }

    #[test]
    fn joined_date_first_wins() {
        let rows = vec![
            CosponsorRecord {
                joined_date: NaiveDate::from_ymd_opt(2023, 5, 10),
                ..observation("B001")
            },
            CosponsorRecord {
                joined_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                ..observation("B001")
            },
        ];
        let merged = reduce(rows);
        assert_eq!(merged[0].joined_date, NaiveDate::from_ymd_opt(2023, 5, 10));
    }
}
