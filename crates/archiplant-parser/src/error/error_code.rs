//! Error codes for the Archiplant diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Payload errors
//! - `E1xx` - Normalization errors
//! - `E2xx` - Validation errors

use std::fmt;

/// The pipeline phase a diagnostic was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Decoding the JSON payload.
    Payload,
    /// Resolving free-form names to canonical values.
    Normalization,
    /// Checking the model against ArchiMate structural rules.
    Validation,
}

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Payload Errors (E0xx)
    // =========================================================================
    /// Malformed JSON.
    ///
    /// The payload is not syntactically valid JSON.
    E001,

    /// Invalid payload structure.
    ///
    /// The payload is valid JSON but does not have the expected shape,
    /// for example a missing `id` or a string where a list is expected.
    E002,

    // =========================================================================
    // Normalization Errors (E1xx)
    // =========================================================================
    /// Unknown element type.
    E100,

    /// Unknown layer.
    E101,

    /// Unknown relationship type.
    E102,

    /// Unknown group type.
    E103,

    /// Invalid option value.
    ///
    /// A direction, line style, note position, port direction or layout
    /// option could not be resolved.
    E104,

    /// Invalid color.
    E105,

    // =========================================================================
    // Validation Errors (E2xx)
    // =========================================================================
    /// Undefined relationship endpoint.
    ///
    /// A relationship refers to an element or group id that is not declared.
    E200,

    /// Undefined group.
    ///
    /// An element or group refers to a parent group that is not declared.
    E201,

    /// Duplicate identifier.
    E202,

    /// Empty identifier.
    E203,

    /// Element type not valid for layer.
    E204,

    /// Relationship not permitted.
    ///
    /// The relationship matrix does not allow this kind between the two
    /// endpoints. Reported as a warning unless strict mode is enabled.
    E205,

    /// Self-relationship not permitted.
    ///
    /// Only association, directed association, flow, triggering and
    /// influence may connect an element to itself.
    E206,

    /// Group cycle.
    ///
    /// A group is its own ancestor through `parent_group_id`.
    E207,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Payload errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            // Normalization errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            // Validation errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
            ErrorCode::E207 => "E207",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Payload errors
            ErrorCode::E001 => "malformed JSON",
            ErrorCode::E002 => "invalid payload structure",
            // Normalization errors
            ErrorCode::E100 => "unknown element type",
            ErrorCode::E101 => "unknown layer",
            ErrorCode::E102 => "unknown relationship type",
            ErrorCode::E103 => "unknown group type",
            ErrorCode::E104 => "invalid option value",
            ErrorCode::E105 => "invalid color",
            // Validation errors
            ErrorCode::E200 => "undefined relationship endpoint",
            ErrorCode::E201 => "undefined group",
            ErrorCode::E202 => "duplicate identifier",
            ErrorCode::E203 => "empty identifier",
            ErrorCode::E204 => "element type not valid for layer",
            ErrorCode::E205 => "relationship not permitted",
            ErrorCode::E206 => "self-relationship not permitted",
            ErrorCode::E207 => "group cycle",
        }
    }

    /// Returns the phase this code belongs to.
    pub fn phase(&self) -> Phase {
        match self {
            ErrorCode::E001 | ErrorCode::E002 => Phase::Payload,
            ErrorCode::E100
            | ErrorCode::E101
            | ErrorCode::E102
            | ErrorCode::E103
            | ErrorCode::E104
            | ErrorCode::E105 => Phase::Normalization,
            ErrorCode::E200
            | ErrorCode::E201
            | ErrorCode::E202
            | ErrorCode::E203
            | ErrorCode::E204
            | ErrorCode::E205
            | ErrorCode::E206
            | ErrorCode::E207 => Phase::Validation,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
