//! Owned XML element tree for schema-tolerant field extraction
//!
//! The BILLSTATUS corpus mixes GovInfo and older FDsys schema dialects, so
//! extraction never navigates fixed paths; it walks the whole tree and
//! matches tag names loosely. This module builds a small owned tree from a
//! quick-xml event stream and centralizes the loose matching in one
//! declarative rule type (`TagRule`) evaluated by generic tree walks.
//!
//! Tag names are normalized once, at construction: namespace prefix
//! stripped (last segment after the final `:`), then lowercased. Every
//! later comparison operates on the normalized form.

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// XML tree construction errors
#[derive(Debug, Error)]
pub enum XmlError {
    /// Malformed markup
    #[error("malformed XML: {0}")]
    Malformed(#[from] quick_xml::Error),

    /// Document contained no root element
    #[error("document has no root element")]
    NoRoot,
}

/// One element: normalized tag, direct text, child elements.
///
/// `text` is the text content preceding the first child element, trimmed;
/// empty or whitespace-only text is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    /// Non-empty trimmed text content, if any
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Document-order traversal of this element and all descendants
    pub fn iter(&self) -> DocumentOrderIter<'_> {
        DocumentOrderIter { stack: vec![self] }
    }

    /// First element in document order (including self) matching the rule
    pub fn first_match(&self, rule: TagRule) -> Option<&Element> {
        self.iter().find(|el| rule.matches(&el.tag))
    }

    /// Text of the first matching element that has non-empty text
    pub fn first_text(&self, rule: TagRule) -> Option<&str> {
        self.iter()
            .filter(|el| rule.matches(&el.tag))
            .find_map(|el| el.text())
    }

    /// All non-empty texts of matching elements, in document order
    pub fn collect_texts(&self, rule: TagRule) -> Vec<&str> {
        self.iter()
            .filter(|el| rule.matches(&el.tag))
            .filter_map(|el| el.text())
            .collect()
    }
}

/// Pre-order iterator over an element subtree
pub struct DocumentOrderIter<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for DocumentOrderIter<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        let el = self.stack.pop()?;
        self.stack.extend(el.children.iter().rev());
        Some(el)
    }
}

/// A single tag-name predicate over normalized tag names
#[derive(Debug, Clone, Copy)]
pub enum TagPred {
    /// Tag equals the name exactly
    Exact(&'static str),
    /// Tag ends with the name (equality included)
    Suffix(&'static str),
}

impl TagPred {
    pub fn matches(self, tag: &str) -> bool {
        match self {
            TagPred::Exact(name) => tag == name,
            TagPred::Suffix(suffix) => tag.ends_with(suffix),
        }
    }
}

/// Schema-tolerance rule: the set of acceptable tag-name predicates for one
/// logical field, shared by every extraction site that reads that field.
#[derive(Debug, Clone, Copy)]
pub struct TagRule(&'static [TagPred]);

impl TagRule {
    pub const fn new(preds: &'static [TagPred]) -> Self {
        Self(preds)
    }

    pub fn matches(&self, tag: &str) -> bool {
        self.0.iter().any(|p| p.matches(tag))
    }
}

/// Parse a complete document into an element tree
pub fn parse(content: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(content);

    // (element under construction, accumulated leading text)
    let mut stack: Vec<(Element, String)> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                stack.push((open_element(e.name().as_ref()), String::new()));
            }
            Ok(Event::Empty(ref e)) => {
                let el = open_element(e.name().as_ref());
                attach(&mut stack, &mut root, el);
            }
            Ok(Event::Text(ref e)) => {
                if let Some((el, buf)) = stack.last_mut() {
                    // Only text before the first child element counts
                    if el.children.is_empty() {
                        buf.push_str(&e.unescape()?);
                    }
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some((el, buf)) = stack.last_mut() {
                    if el.children.is_empty() {
                        buf.push_str(&String::from_utf8_lossy(e));
                    }
                }
            }
            Ok(Event::End(_)) => {
                if let Some((mut el, buf)) = stack.pop() {
                    let trimmed = buf.trim();
                    if !trimmed.is_empty() {
                        el.text = Some(trimmed.to_string());
                    }
                    attach(&mut stack, &mut root, el);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {} // declarations, comments, processing instructions
            Err(e) => return Err(XmlError::Malformed(e)),
        }
    }

    root.ok_or(XmlError::NoRoot)
}

fn open_element(raw_name: &[u8]) -> Element {
    Element {
        tag: normalize_tag(raw_name),
        text: None,
        children: Vec::new(),
    }
}

fn attach(stack: &mut Vec<(Element, String)>, root: &mut Option<Element>, el: Element) {
    if let Some((parent, _)) = stack.last_mut() {
        parent.children.push(el);
    } else if root.is_none() {
        *root = Some(el);
    }
}

/// Strip any namespace prefix and lowercase the local name
fn normalize_tag(raw_name: &[u8]) -> String {
    let name = String::from_utf8_lossy(raw_name);
    let local = match name.rfind(':') {
        Some(pos) => &name[pos + 1..],
        None => &name[..],
    };
    local.to_lowercase()
}
