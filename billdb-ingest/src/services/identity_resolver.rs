//! Bill identity resolution
//!
//! A document's canonical key (congress, type, number) can live in three
//! places depending on schema vintage: the document content, the GovInfo
//! bulk filename, or the surrounding directory layout. Resolution runs the
//! three sources in that order with per-field fallback. Each source only
//! fills fields the earlier sources left empty, so a field found in the
//! content is never displaced by a filename or directory match.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::merge::fill_missing;
use crate::xml::{Element, TagPred, TagRule};
use billdb_common::db::models::BillKey;

const CONGRESS: TagRule = TagRule::new(&[TagPred::Suffix("congress")]);
const BILL_TYPE: TagRule =
    TagRule::new(&[TagPred::Exact("type"), TagPred::Suffix("billtype")]);
const BILL_NUMBER: TagRule =
    TagRule::new(&[TagPred::Exact("number"), TagPred::Suffix("billnumber")]);

static FILENAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)BILLSTATUS-(\d+)([a-z]+)(\d+)\.xml$").expect("valid filename pattern")
});

static BILL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]+)(\d+)$").expect("valid bill id pattern"));

/// Best-effort identity with each field independently optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialIdentity {
    pub congress: Option<i64>,
    pub bill_type: Option<String>,
    pub bill_number: Option<i64>,
}

impl PartialIdentity {
    fn is_complete(&self) -> bool {
        self.congress.is_some() && self.bill_type.is_some() && self.bill_number.is_some()
    }

    /// Per-field fallback: take the other identity's fields only where this
    /// one is still empty
    fn fill_from(&mut self, other: PartialIdentity) {
        fill_missing(&mut self.congress, other.congress);
        fill_missing(&mut self.bill_type, other.bill_type);
        fill_missing(&mut self.bill_number, other.bill_number);
    }

    fn into_key(self) -> Option<BillKey> {
        Some(BillKey {
            congress: self.congress?,
            bill_type: self.bill_type?,
            bill_number: self.bill_number?,
        })
    }
}

/// Resolve the canonical key for a parsed document, or `None` when any
/// field remains undeterminable after all three sources
pub fn resolve(root: &Element, path: &Path) -> Option<BillKey> {
    let mut identity = from_content(root);
    if !identity.is_complete() {
        identity.fill_from(from_filename(path));
    }
    if !identity.is_complete() {
        identity.fill_from(from_directories(path));
    }
    identity.into_key()
}

/// Scan document content in document order; stop once all three fields are
/// found. Congress and number take the digits of the first matching
/// element's text; type is lowercased verbatim.
fn from_content(root: &Element) -> PartialIdentity {
    let mut identity = PartialIdentity::default();

    for el in root.iter() {
        let Some(text) = el.text() else { continue };

        if identity.congress.is_none() && CONGRESS.matches(&el.tag) {
            identity.congress = digits_to_i64(text);
        }
        if identity.bill_type.is_none() && BILL_TYPE.matches(&el.tag) {
            identity.bill_type = Some(text.to_lowercase());
        }
        if identity.bill_number.is_none() && BILL_NUMBER.matches(&el.tag) {
            identity.bill_number = digits_to_i64(text);
        }
        if identity.is_complete() {
            break;
        }
    }

    identity
}

/// Match `BILLSTATUS-<congress><type><number>.xml` against the base name
fn from_filename(path: &Path) -> PartialIdentity {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return PartialIdentity::default();
    };

    match FILENAME_RE.captures(&name) {
        Some(caps) => PartialIdentity {
            congress: caps[1].parse().ok(),
            bill_type: Some(caps[2].to_lowercase()),
            bill_number: caps[3].parse().ok(),
        },
        None => PartialIdentity::default(),
    }
}

/// Read identity out of a `.../<congress>/bills/<type>/<type><number>/...`
/// directory layout, trying marker segments from the rightmost backward
fn from_directories(path: &Path) -> PartialIdentity {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let marker_indices: Vec<usize> = parts
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            let lowered = p.to_lowercase();
            lowered == "bills" || lowered == "billstatus"
        })
        .map(|(i, _)| i)
        .collect();

    for &idx in marker_indices.iter().rev() {
        let Some(congress) = idx
            .checked_sub(1)
            .and_then(|i| parts.get(i))
            .and_then(|p| p.parse::<i64>().ok())
        else {
            continue;
        };
        let Some(bill_type) = parts.get(idx + 1).map(|p| p.to_lowercase()) else {
            continue;
        };
        let bill_id = parts
            .get(idx + 2)
            .map(|p| p.to_lowercase())
            .unwrap_or_default();

        if let Some(caps) = BILL_ID_RE.captures(&bill_id) {
            return PartialIdentity {
                congress: Some(congress),
                bill_type: Some(bill_type),
                bill_number: caps[2].parse().ok(),
            };
        }
    }

    PartialIdentity::default()
}

fn digits_to_i64(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}
