//! Logical structure types.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A named structural unit (chapter, letter, ...) of the logical structure map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalSection {
    /// Section identifier (e.g. "U.1")
    pub id: String,

    /// Section type (e.g. "letter", "chapter")
    #[serde(rename = "type")]
    pub section_type: String,
}

impl LogicalSection {
    /// Create a new logical section.
    pub fn new(id: impl Into<String>, section_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            section_type: section_type.into(),
        }
    }
}

/// Mapping from logical section ids to the physical page ids they span.
///
/// Keys keep the order in which they were first linked, and every link is
/// appended to its key's list, so duplicate links stay visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalLinks {
    entries: Vec<(String, Vec<String>)>,
}

impl LogicalLinks {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a link from a logical id to a physical id.
    pub fn link(&mut self, logical_id: impl Into<String>, physical_id: impl Into<String>) {
        let logical_id = logical_id.into();
        let physical_id = physical_id.into();

        match self.entries.iter_mut().find(|(id, _)| *id == logical_id) {
            Some((_, targets)) => targets.push(physical_id),
            None => self.entries.push((logical_id, vec![physical_id])),
        }
    }

    /// Physical ids linked to a logical id, in link order.
    pub fn get(&self, logical_id: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(id, _)| id == logical_id)
            .map(|(_, targets)| targets.as_slice())
    }

    /// Logical ids that link to the given physical id.
    pub fn sections_for_page<'a>(&'a self, physical_id: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |(_, targets)| targets.iter().any(|t| t == physical_id))
            .map(|(id, _)| id.as_str())
    }

    /// Iterate over `(logical_id, physical_ids)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(id, targets)| (id.as_str(), targets.as_slice()))
    }

    /// Number of distinct logical ids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no links.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of links, duplicates included.
    pub fn link_count(&self) -> usize {
        self.entries.iter().map(|(_, targets)| targets.len()).sum()
    }
}

impl Serialize for LogicalLinks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, targets) in &self.entries {
            map.serialize_entry(id, targets)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LogicalLinks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LinksVisitor;

        impl<'de> Visitor<'de> for LinksVisitor {
            type Value = LogicalLinks;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of logical ids to lists of physical ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut links = LogicalLinks::new();
                while let Some((id, targets)) = access.next_entry::<String, Vec<String>>()? {
                    for target in targets {
                        links.link(id.clone(), target);
                    }
                }
                Ok(links)
            }
        }

        deserializer.deserialize_map(LinksVisitor)
    }
}
