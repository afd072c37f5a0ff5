//! Database models for the three persisted relations

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Canonical bill identity: (congress, type code, number).
///
/// Immutable once resolved; the composite primary key of `bills` and the
/// leading columns of `bill_actions` and `bill_cosponsors`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillKey {
    pub congress: i64,
    /// Lowercase short code, e.g. "hr" or "s"
    pub bill_type: String,
    pub bill_number: i64,
}

impl BillKey {
    pub fn new(congress: i64, bill_type: impl Into<String>, bill_number: i64) -> Self {
        Self {
            congress,
            bill_type: bill_type.into(),
            bill_number,
        }
    }

    /// Chamber derived from the type code: house types start with 'h',
    /// senate types with 's'; anything else is unknown.
    pub fn chamber(&self) -> Option<&'static str> {
        if self.bill_type.starts_with('h') {
            Some("house")
        } else if self.bill_type.starts_with('s') {
            Some("senate")
        } else {
            None
        }
    }
}

impl std::fmt::Display for BillKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}{}", self.congress, self.bill_type, self.bill_number)
    }
}

/// One row of `bills`, reconstructed fresh from each document.
///
/// Persisted via an upsert that overwrites chamber unconditionally and
/// coalesces every other field against storage, so bill metadata grows
/// monotonically more complete across re-ingestion and a populated field
/// never regresses to null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillRecord {
    pub key: BillKey,
    pub title: Option<String>,
    pub introduced_date: Option<NaiveDate>,
    pub latest_action: Option<String>,
    pub latest_action_date: Option<NaiveDateTime>,
    pub sponsor_bioguide: Option<String>,
    pub sponsor_fullname: Option<String>,
}

/// One row of the append-only `bill_actions` log.
///
/// Uniqueness is (bill key, action_datetime, action_text); duplicate insert
/// attempts are dropped, never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub key: BillKey,
    pub action_datetime: Option<NaiveDateTime>,
    pub actor: Option<String>,
    pub action_text: Option<String>,
    pub action_code: Option<String>,
    /// Provenance: document path relative to the data root
    pub source_path: String,
}

/// One row of `bill_cosponsors`, keyed on (bill key, bioguide).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosponsorRecord {
    pub key: BillKey,
    pub bioguide: String,
    pub fullname: Option<String>,
    pub party: Option<String>,
    pub state: Option<String>,
    pub joined_date: Option<NaiveDate>,
    /// Tri-state: true / false / unknown
    pub is_original: Option<bool>,
}
