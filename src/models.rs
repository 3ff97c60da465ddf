use crate::error::EtaError;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

/// Tag ETA uses both for a record node and for the tail field inside it.
pub const AIRCRAFT_TAG: &str = "AIRCRAFT";

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AircraftRecord {
    pub tail: String,
    pub aircraft_type: String,
    pub resource_type: String,
    pub aircraft_class: String,
    pub description: String,
    pub hobbs: f64,
    pub obsolete: bool,
}

impl AircraftRecord {
    pub fn new(tail: &str, aircraft_type: &str, hobbs: f64) -> Self {
        Self {
            tail: tail.to_string(),
            aircraft_type: aircraft_type.to_string(),
            hobbs,
            ..Self::default()
        }
    }
}

/// Fixed fleet shown when ETA cannot be reached.
pub fn placeholder_fleet() -> Vec<AircraftRecord> {
    vec![
        AircraftRecord::new("N101SIU", "C172", 1234.5),
        AircraftRecord::new("N102SIU", "C172", 980.2),
    ]
}

/// Minimal element tree; ETA replies are small enough to hold whole.
#[derive(Debug, Default)]
pub struct XmlNode {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn new(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Trimmed text of the first direct child named `tag`, or "" if absent.
    pub fn field(&self, tag: &str) -> &str {
        self.children
            .iter()
            .find(|c| c.name == tag)
            .map(|c| c.text.trim())
            .unwrap_or("")
    }

    /// Record nodes below `self`, in document order.
    ///
    /// An `AIRCRAFT` element is a record unless its parent is itself a
    /// record, in which case it is that record's tail field. `self` counts
    /// as a record when `self_is_record` is set.
    fn collect_records(&self, self_is_record: bool) -> Vec<&XmlNode> {
        let mut records = Vec::new();
        let mut pending = vec![(self, self_is_record)];

        while let Some((node, node_is_record)) = pending.pop() {
            for child in node.children.iter().rev() {
                let child_is_record = child.name == AIRCRAFT_TAG && !node_is_record;
                pending.push((child, child_is_record));
            }
            if node_is_record && !std::ptr::eq(node, self) {
                records.push(node);
            }
        }
        records
    }
}

// Deep trees are torn down from a heap stack instead of recursively.
impl Drop for XmlNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

// Builds an AircraftRecord from one <AIRCRAFT> node, applying the
// field fallbacks. Missing or junk values degrade to defaults.
impl From<&XmlNode> for AircraftRecord {
    fn from(node: &XmlNode) -> Self {
        let resource_type = node.field("RESOURCE_TYPE");
        let aircraft_class = node.field("AIRCRAFT_CLASS");
        let description = node.field("DESCRIPTION");

        Self {
            tail: first_non_empty(&[
                node.field(AIRCRAFT_TAG),
                node.field("NNUMBER"),
                node.field("CALL_NUMBER"),
            ])
            .to_string(),
            aircraft_type: first_non_empty(&[resource_type, aircraft_class, description])
                .to_string(),
            resource_type: resource_type.to_string(),
            aircraft_class: aircraft_class.to_string(),
            description: description.to_string(),
            hobbs: parse_hobbs(node.field("HOBBS")),
            obsolete: parse_obsolete(node.field("OBSOLETE")),
        }
    }
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> &'a str {
    candidates
        .iter()
        .copied()
        .find(|s| !s.is_empty())
        .unwrap_or("")
}

fn parse_hobbs(text: &str) -> f64 {
    text.parse::<f64>()
        .ok()
        .filter(|h| h.is_finite() && *h >= 0.0)
        .unwrap_or(0.0)
}

fn parse_obsolete(flag: &str) -> bool {
    flag.chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
}

/// Parses an ETA `aircraft` export into records.
///
/// Record nodes are found at any depth, including empty ones. When the
/// reply holds exactly one aircraft ETA may drop the wrapper, so a root
/// `<AIRCRAFT>` element is used as the sole record if nothing below it
/// matched.
///
/// Only malformed markup is an error; empty or bad field values never are.
pub fn parse_aircraft_xml(xml: &str) -> Result<Vec<AircraftRecord>, EtaError> {
    let root = parse_document(xml)?;

    let root_is_aircraft = root.name.eq_ignore_ascii_case(AIRCRAFT_TAG);
    let mut nodes = root.collect_records(root_is_aircraft);
    if nodes.is_empty() && root_is_aircraft {
        nodes.push(&root);
    }

    Ok(nodes.into_iter().map(AircraftRecord::from).collect())
}

/// Reads a whole document into an [`XmlNode`] tree, rejecting anything
/// that is not well-formed.
pub fn parse_document(xml: &str) -> Result<XmlNode, EtaError> {
    let mut reader = Reader::from_str(xml);
    reader.check_end_names(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                ensure_no_root(&root)?;
                stack.push(XmlNode::new(e.name().as_ref()));
            }
            Event::Empty(e) => {
                ensure_no_root(&root)?;
                attach(&mut stack, &mut root, XmlNode::new(e.name().as_ref()));
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| EtaError::parse("closing tag without a matching start"))?;
                attach(&mut stack, &mut root, node);
            }
            Event::Text(t) => push_text(&mut stack, &t.unescape()?)?,
            Event::CData(c) => {
                let bytes = c.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&bytes))?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(EtaError::parse(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| EtaError::parse("document has no root element"))
}

fn ensure_no_root(root: &Option<XmlNode>) -> Result<(), EtaError> {
    match root {
        Some(r) => Err(EtaError::parse(format!(
            "content after the <{}> root element",
            r.name
        ))),
        None => Ok(()),
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

fn push_text(stack: &mut [XmlNode], text: &str) -> Result<(), EtaError> {
    match stack.last_mut() {
        Some(node) => node.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => return Err(EtaError::parse("text outside the root element")),
    }
    Ok(())
}
