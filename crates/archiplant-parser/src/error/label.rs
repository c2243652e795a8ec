//! Labels attaching messages to model entities.
//!
//! Payload errors have no entity yet, so their labels point at a line and
//! column in the JSON text instead.

use std::fmt;

/// The model entity (or payload position) a label refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Element(String),
    Relationship(String),
    Group(String),
    /// A 1-based line and column in the payload text.
    Location { line: usize, column: usize },
}

impl Subject {
    pub fn element(id: impl Into<String>) -> Self {
        Self::Element(id.into())
    }

    pub fn relationship(id: impl Into<String>) -> Self {
        Self::Relationship(id.into())
    }

    pub fn group(id: impl Into<String>) -> Self {
        Self::Group(id.into())
    }

    /// Returns the entity id, if the subject names an entity.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Element(id) | Self::Relationship(id) | Self::Group(id) => Some(id),
            Self::Location { .. } => None,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(id) => write!(f, "element `{id}`"),
            Self::Relationship(id) => write!(f, "relationship `{id}`"),
            Self::Group(id) => write!(f, "group `{id}`"),
            Self::Location { line, column } => write!(f, "line {line}, column {column}"),
        }
    }
}

/// A labeled reference to a model entity.
///
/// # Primary vs Secondary Labels
///
/// - **Primary labels** mark the entity the diagnostic is about.
/// - **Secondary labels** provide additional context, such as "first declared
///   here" or "referenced from here".
#[derive(Debug, Clone)]
pub struct Label {
    subject: Subject,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(subject: Subject, message: impl Into<String>) -> Self {
        Self {
            subject,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(subject: Subject, message: impl Into<String>) -> Self {
        Self {
            subject,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the subject this label applies to.
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Check if this is a secondary label.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
