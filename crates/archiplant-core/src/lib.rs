//! Archiplant Core Types and Definitions
//!
//! This crate provides the foundational types for describing ArchiMate models
//! that Archiplant turns into PlantUML. It includes:
//!
//! - **Colors**: CSS and bare-hex color handling ([`color::Color`])
//! - **Layers**: The seven ArchiMate layers ([`layer::Layer`])
//! - **Element types**: The canonical element catalogue ([`element::ElementType`])
//! - **Relationships**: Relationship kinds and the relationship matrix ([`relationship`] module)
//! - **Style**: Directions, line styles, group and note options ([`style`] module)
//! - **Layout**: Per-request layout and styling options ([`layout`] module)
//! - **Model**: The typed, normalized model records ([`model`] module)

pub mod color;
pub mod element;
pub mod layer;
pub mod layout;
pub mod model;
pub mod relationship;
pub mod style;
