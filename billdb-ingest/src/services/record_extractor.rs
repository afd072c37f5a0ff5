//! Document extraction
//!
//! Parses one BILLSTATUS document into a normalized in-memory record: the
//! bill header plus its action and cosponsor child rows. Field lookup is
//! schema-tolerant: every site matches through the declarative tag rules
//! below rather than fixed element paths, so GovInfo and older FDsys
//! dialects extract through the same code.
//!
//! Extraction failures are per-document and non-fatal to a batch run:
//! malformed markup and an irresolvable identity both surface as
//! `ExtractError` for the driver to count and skip.

use std::path::Path;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::services::identity_resolver;
use crate::xml::{self, Element, TagPred, TagRule, XmlError};
use billdb_common::db::models::{ActionRecord, BillKey, BillRecord, CosponsorRecord};
use billdb_common::time;

const TITLE: TagRule = TagRule::new(&[
    TagPred::Suffix("title"),
    TagPred::Suffix("officialtitle"),
    TagPred::Suffix("titlewithoutnumber"),
]);
const INTRODUCED_DATE: TagRule = TagRule::new(&[TagPred::Suffix("introduceddate")]);

const SPONSOR_CONTAINER: TagRule =
    TagRule::new(&[TagPred::Suffix("sponsor"), TagPred::Suffix("sponsors")]);
const BIOGUIDE: TagRule = TagRule::new(&[TagPred::Suffix("bioguideid")]);
const SPONSOR_NAME: TagRule =
    TagRule::new(&[TagPred::Suffix("fullname"), TagPred::Suffix("name")]);

const COSPONSORS_CONTAINER: TagRule = TagRule::new(&[TagPred::Suffix("cosponsors")]);
const COSPONSOR_ITEM: TagRule =
    TagRule::new(&[TagPred::Suffix("cosponsor"), TagPred::Exact("item")]);
const FULLNAME: TagRule = TagRule::new(&[TagPred::Suffix("fullname")]);
const PARTY: TagRule = TagRule::new(&[TagPred::Suffix("party")]);
const STATE: TagRule = TagRule::new(&[TagPred::Suffix("state")]);
const SPONSORSHIP_DATE: TagRule = TagRule::new(&[TagPred::Suffix("sponsorshipdate")]);
const IS_ORIGINAL: TagRule = TagRule::new(&[TagPred::Suffix("isoriginalcosponsor")]);

const ACTIONS_CONTAINER: TagRule = TagRule::new(&[TagPred::Suffix("actions")]);
const ACTION_ITEM: TagRule =
    TagRule::new(&[TagPred::Suffix("action"), TagPred::Exact("item")]);
const ACTION_DATETIME: TagRule = TagRule::new(&[
    TagPred::Suffix("actiondatetime"),
    TagPred::Suffix("actiondate"),
]);
const ACTION_TEXT: TagRule = TagRule::new(&[TagPred::Suffix("text")]);
const ACTION_ACTOR: TagRule = TagRule::new(&[TagPred::Suffix("actors")]);
const ACTION_CODE: TagRule = TagRule::new(&[TagPred::Suffix("actioncode")]);

/// Document extraction errors; all of them skip the document and let the
/// batch continue
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Cannot read the document
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),

    /// Malformed markup
    #[error("parse error: {0}")]
    Parse(#[from] XmlError),

    /// No resolvable (congress, type, number) in content, filename, or
    /// directory structure
    #[error("missing identity")]
    MissingIdentity,
}

/// One fully extracted document: the bill header plus its child rows
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub bill: BillRecord,
    pub actions: Vec<ActionRecord>,
    pub cosponsors: Vec<CosponsorRecord>,
}

/// Read and extract a single document from disk
pub fn extract_document(path: &Path, data_root: &Path) -> Result<ExtractedDocument, ExtractError> {
    let content = std::fs::read_to_string(path)?;
    extract_source(&content, path, data_root)
}

/// Extract a document from already-loaded source text
pub fn extract_source(
    content: &str,
    path: &Path,
    data_root: &Path,
) -> Result<ExtractedDocument, ExtractError> {
    let root = xml::parse(content)?;

    let key = identity_resolver::resolve(&root, path).ok_or(ExtractError::MissingIdentity)?;

    let source_path = path
        .strip_prefix(data_root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned();

    let actions = extract_actions(&root, &key, &source_path);
    let cosponsors = extract_cosponsors(&root, &key);
    let (latest_action, latest_action_date) = latest_action(&actions);
    let (sponsor_bioguide, sponsor_fullname) = extract_sponsor(&root);

    let bill = BillRecord {
        title: shortest(root.collect_texts(TITLE)).map(str::to_string),
        introduced_date: root.first_text(INTRODUCED_DATE).and_then(time::parse_date),
        latest_action,
        latest_action_date,
        sponsor_bioguide,
        sponsor_fullname,
        key,
    };

    Ok(ExtractedDocument {
        bill,
        actions,
        cosponsors,
    })
}

/// Shortest candidate; earliest encountered wins on equal length
fn shortest<'a>(candidates: Vec<&'a str>) -> Option<&'a str> {
    let mut best: Option<&str> = None;
    for candidate in candidates {
        match best {
            None => best = Some(candidate),
            Some(current) if candidate.len() < current.len() => best = Some(candidate),
            _ => {}
        }
    }
    best
}

/// First sponsor container that yields a bioguide id or a name; scanning
/// stops at that container
fn extract_sponsor(root: &Element) -> (Option<String>, Option<String>) {
    let mut bioguide = None;
    let mut fullname = None;

    for container in root.iter().filter(|el| SPONSOR_CONTAINER.matches(&el.tag)) {
        for el in container.iter() {
            let Some(text) = el.text() else { continue };
            if bioguide.is_none() && BIOGUIDE.matches(&el.tag) {
                bioguide = Some(text.to_string());
            } else if fullname.is_none() && SPONSOR_NAME.matches(&el.tag) {
                fullname = Some(text.to_string());
            }
        }
        if bioguide.is_some() || fullname.is_some() {
            break;
        }
    }

    (bioguide, fullname)
}

/// Cosponsor rows from the first `cosponsors` container in the document.
/// A row is kept only when a bioguide id was found.
fn extract_cosponsors(root: &Element, key: &BillKey) -> Vec<CosponsorRecord> {
    let mut rows = Vec::new();

    let Some(container) = root.first_match(COSPONSORS_CONTAINER) else {
        return rows;
    };

    for child in container
        .children
        .iter()
        .filter(|c| COSPONSOR_ITEM.matches(&c.tag))
    {
        let mut bioguide = None;
        let mut fullname = None;
        let mut party = None;
        let mut state = None;
        let mut joined_date = None;
        let mut is_original = None;

        for el in child.iter() {
            let Some(text) = el.text() else { continue };
            if bioguide.is_none() && BIOGUIDE.matches(&el.tag) {
                bioguide = Some(text.to_string());
            } else if fullname.is_none() && FULLNAME.matches(&el.tag) {
                fullname = Some(text.to_string());
            } else if party.is_none() && PARTY.matches(&el.tag) {
                party = Some(text.to_string());
            } else if state.is_none() && STATE.matches(&el.tag) {
                state = Some(text.to_string());
            } else if joined_date.is_none() && SPONSORSHIP_DATE.matches(&el.tag) {
                joined_date = time::parse_date(text);
            } else if is_original.is_none() && IS_ORIGINAL.matches(&el.tag) {
                is_original = Some(parse_flag(text));
            }
        }

        if let Some(bioguide) = bioguide {
            rows.push(CosponsorRecord {
                key: key.clone(),
                bioguide,
                fullname,
                party,
                state,
                joined_date,
                is_original,
            });
        }
    }

    rows
}

/// Action rows from the first `actions` container in the document. Fields
/// are read from each action element's direct children; a row is kept when
/// it has a datetime or a text.
fn extract_actions(root: &Element, key: &BillKey, source_path: &str) -> Vec<ActionRecord> {
    let mut rows = Vec::new();

    let Some(container) = root.first_match(ACTIONS_CONTAINER) else {
        return rows;
    };

    for child in container
        .children
        .iter()
        .filter(|c| ACTION_ITEM.matches(&c.tag))
    {
        let mut action_datetime = None;
        let mut action_text = None;
        let mut actor = None;
        let mut action_code = None;

        for el in &child.children {
            let Some(text) = el.text() else { continue };
            if action_datetime.is_none() && ACTION_DATETIME.matches(&el.tag) {
                action_datetime = time::parse_datetime(text);
            } else if action_text.is_none() && ACTION_TEXT.matches(&el.tag) {
                action_text = Some(text.to_string());
            } else if actor.is_none() && ACTION_ACTOR.matches(&el.tag) {
                actor = Some(text.to_string());
            } else if action_code.is_none() && ACTION_CODE.matches(&el.tag) {
                action_code = Some(text.to_string());
            }
        }

        if action_datetime.is_some() || action_text.is_some() {
            rows.push(ActionRecord {
                key: key.clone(),
                action_datetime,
                actor,
                action_text,
                action_code,
                source_path: source_path.to_string(),
            });
        }
    }

    rows
}

/// The action with the maximum datetime. A missing datetime compares as
/// the minimum, so it is only selected when no dated action exists; equal
/// keys resolve to the later-extracted action.
fn latest_action(actions: &[ActionRecord]) -> (Option<String>, Option<NaiveDateTime>) {
    let mut latest: Option<&ActionRecord> = None;

    for action in actions {
        match latest {
            None => latest = Some(action),
            Some(best) if action.action_datetime >= best.action_datetime => {
                latest = Some(action);
            }
            _ => {}
        }
    }

    match latest {
        Some(action) => (action.action_text.clone(), action.action_datetime),
        None => (None, None),
    }
}

fn parse_flag(text: &str) -> bool {
    matches!(text.to_lowercase().as_str(), "true" | "1" | "yes")
}
