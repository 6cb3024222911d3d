//! Event stream source
//!
//! Wraps the XML tokenizer behind a single pull cursor. Every consumer in
//! the interpreter advances the same cursor, so an element's subtree is
//! bounded by matching its `End` event on name and depth.

mod reader;

pub use reader::XmlEventReader;

use crate::logging::{codes, Code};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute names to string values, ordered by name
pub type AttributeMap = BTreeMap<String, String>;

pub type StreamResult<T> = Result<T, StreamError>;

/// Namespace-qualified element name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub namespace: Option<String>,
    pub local_name: String,
}

impl QualifiedName {
    pub fn new(namespace: Option<&str>, local_name: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local_name: local_name.to_string(),
        }
    }

    pub fn is_in(&self, namespace: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
    }
}

impl fmt::Display for QualifiedName {
    /// Clark notation: `{namespace}local`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// An opened element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: QualifiedName,
    pub attributes: AttributeMap,
    /// 1 for the document root
    pub depth: usize,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// True when `end` closes this element and not a nested namesake
    pub fn is_closed_by(&self, end: &ElementEnd) -> bool {
        end.depth == self.depth && end.name == self.name
    }
}

/// A closed element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementEnd {
    pub name: QualifiedName,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    Start(Element),
    End(ElementEnd),
    /// Character data inside the root element, entities resolved
    Text(String),
}

/// Pull cursor over document-order events
pub trait EventStream {
    /// `Ok(None)` once the input is exhausted
    fn next_event(&mut self) -> StreamResult<Option<XmlEvent>>;

    /// Number of elements currently open
    fn depth(&self) -> usize;

    /// Byte offset of the cursor in the input
    fn position(&self) -> u64;
}

impl<S: EventStream + ?Sized> EventStream for &mut S {
    fn next_event(&mut self) -> StreamResult<Option<XmlEvent>> {
        (**self).next_event()
    }

    fn depth(&self) -> usize {
        (**self).depth()
    }

    fn position(&self) -> u64 {
        (**self).position()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("Malformed XML at byte {position}: {message}")]
    Xml { message: String, position: u64 },

    #[error("Element nesting exceeds {max} levels at byte {position}")]
    DepthLimitExceeded { max: usize, position: u64 },

    #[error("Undeclared namespace prefix '{prefix}' at byte {position}")]
    UnboundPrefix { prefix: String, position: u64 },
}

impl StreamError {
    pub fn error_code(&self) -> Code {
        match self {
            StreamError::Xml { .. } => codes::stream::MALFORMED_XML,
            StreamError::DepthLimitExceeded { .. } => codes::stream::NESTING_TOO_DEEP,
            StreamError::UnboundPrefix { .. } => codes::stream::UNBOUND_PREFIX,
        }
    }

    pub fn position(&self) -> u64 {
        match self {
            StreamError::Xml { position, .. }
            | StreamError::DepthLimitExceeded { position, .. }
            | StreamError::UnboundPrefix { position, .. } => *position,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clark_notation() {
        let name = QualifiedName::new(Some("urn:x"), "Rule");
        assert_eq!(name.to_string(), "{urn:x}Rule");
        assert_eq!(QualifiedName::new(None, "Rule").to_string(), "Rule");
    }

    #[test]
    fn test_closing_requires_matching_depth() {
        let name = QualifiedName::new(Some("urn:x"), "Rule");
        let element = Element {
            name: name.clone(),
            attributes: AttributeMap::new(),
            depth: 3,
        };

        assert!(element.is_closed_by(&ElementEnd {
            name: name.clone(),
            depth: 3
        }));
        assert!(!element.is_closed_by(&ElementEnd { name, depth: 4 }));
        assert!(!element.is_closed_by(&ElementEnd {
            name: QualifiedName::new(None, "Rule"),
            depth: 3
        }));
    }

    #[test]
    fn test_error_codes() {
        let error = StreamError::DepthLimitExceeded {
            max: 256,
            position: 10,
        };
        assert_eq!(error.error_code().as_str(), "E021");
        assert_eq!(error.position(), 10);
        assert!(error.requires_halt());
    }
}
