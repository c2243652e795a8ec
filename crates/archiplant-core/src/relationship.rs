//! Relationship kinds, categories and the relationship matrix.
//!
//! # Overview
//!
//! - [`RelationshipKind`]: The twelve relationship kinds a model may use.
//! - [`RelationshipCategory`]: Coarse grouping used in summaries.
//! - [`Endpoint`]: What a relationship end resolves to.
//!
//! # Relationship Matrix
//!
//! [`RelationshipKind::permits`] decides whether a pairing of endpoints is
//! legal. The rules are expressed over [`Aspect`]s:
//!
//! | Kind | Source | Target |
//! |------|--------|--------|
//! | Composition, Aggregation | same aspect as target | same aspect as source |
//! | Assignment | active, composite | behavior, active |
//! | Realization | anything but motivation | anything; motivation may realize motivation |
//! | Serving | active, behavior, composite | active, behavior, composite |
//! | Access | active, behavior, composite | passive, composite |
//! | Influence | anything | motivation, composite |
//! | Triggering, Flow | active, behavior, composite | active, behavior, composite |
//! | Specialization | same element type as target | same element type as source |
//! | Association, DirectedAssociation | anything | anything |
//!
//! A composite endpoint satisfies the structural rules on either side, and a
//! group endpoint permits every relationship.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::element::{Aspect, ElementType};

/// One of the twelve relationship kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationshipKind {
    Access,
    Aggregation,
    Assignment,
    Association,
    DirectedAssociation,
    Composition,
    Flow,
    Influence,
    Realization,
    Serving,
    Specialization,
    Triggering,
}

/// Coarse classification of relationship kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipCategory {
    Structural,
    Dynamic,
    Dependency,
    General,
}

/// What one end of a relationship resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Element(ElementType),
    Group,
}

impl RelationshipKind {
    /// Every relationship kind.
    pub const ALL: [RelationshipKind; 12] = [
        RelationshipKind::Access,
        RelationshipKind::Aggregation,
        RelationshipKind::Assignment,
        RelationshipKind::Association,
        RelationshipKind::DirectedAssociation,
        RelationshipKind::Composition,
        RelationshipKind::Flow,
        RelationshipKind::Influence,
        RelationshipKind::Realization,
        RelationshipKind::Serving,
        RelationshipKind::Specialization,
        RelationshipKind::Triggering,
    ];

    /// Returns the kind's name, e.g. `"Serving"`.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Returns the summary category of this kind.
    pub fn category(self) -> RelationshipCategory {
        match self {
            Self::Composition | Self::Aggregation => RelationshipCategory::Structural,
            Self::Flow | Self::Triggering | Self::Assignment => RelationshipCategory::Dynamic,
            Self::Serving | Self::Access | Self::Influence | Self::Realization => {
                RelationshipCategory::Dependency
            }
            Self::Association | Self::DirectedAssociation | Self::Specialization => {
                RelationshipCategory::General
            }
        }
    }

    /// Returns the Archi exchange-format type, e.g. `ServingRelationship`.
    ///
    /// A directed association is an association with the `directed` flag set,
    /// so it shares the association type.
    pub fn exchange_name(self) -> &'static str {
        match self {
            Self::Access => "AccessRelationship",
            Self::Aggregation => "AggregationRelationship",
            Self::Assignment => "AssignmentRelationship",
            Self::Association | Self::DirectedAssociation => "AssociationRelationship",
            Self::Composition => "CompositionRelationship",
            Self::Flow => "FlowRelationship",
            Self::Influence => "InfluenceRelationship",
            Self::Realization => "RealizationRelationship",
            Self::Serving => "ServingRelationship",
            Self::Specialization => "SpecializationRelationship",
            Self::Triggering => "TriggeringRelationship",
        }
    }

    /// Returns `true` if an element may relate to itself with this kind.
    pub fn allows_self_reference(self) -> bool {
        matches!(
            self,
            Self::Association
                | Self::DirectedAssociation
                | Self::Flow
                | Self::Triggering
                | Self::Influence
        )
    }

    /// Returns `true` if the relationship matrix permits this kind between
    /// `source` and `target`.
    pub fn permits(self, source: Endpoint, target: Endpoint) -> bool {
        let (Endpoint::Element(source), Endpoint::Element(target)) = (source, target) else {
            return true;
        };

        use Aspect::*;
        let (from, to) = (source.aspect(), target.aspect());
        let acting = |aspect: Aspect| matches!(aspect, ActiveStructure | Behavior | Composite);

        match self {
            Self::Association | Self::DirectedAssociation => true,
            Self::Composition | Self::Aggregation => {
                from == to || from == Composite || to == Composite
            }
            Self::Assignment => {
                matches!(from, ActiveStructure | Composite)
                    && matches!(to, Behavior | ActiveStructure)
            }
            Self::Realization => from != Motivation || to == Motivation,
            Self::Serving | Self::Triggering | Self::Flow => acting(from) && acting(to),
            Self::Access => acting(from) && matches!(to, PassiveStructure | Composite),
            Self::Influence => matches!(to, Motivation | Composite),
            Self::Specialization => source == target,
        }
    }
}

impl From<RelationshipKind> for &'static str {
    fn from(kind: RelationshipKind) -> Self {
        match kind {
            RelationshipKind::Access => "Access",
            RelationshipKind::Aggregation => "Aggregation",
            RelationshipKind::Assignment => "Assignment",
            RelationshipKind::Association => "Association",
            RelationshipKind::DirectedAssociation => "DirectedAssociation",
            RelationshipKind::Composition => "Composition",
            RelationshipKind::Flow => "Flow",
            RelationshipKind::Influence => "Influence",
            RelationshipKind::Realization => "Realization",
            RelationshipKind::Serving => "Serving",
            RelationshipKind::Specialization => "Specialization",
            RelationshipKind::Triggering => "Triggering",
        }
    }
}

impl FromStr for RelationshipKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or("unknown relationship kind")
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<RelationshipCategory> for &'static str {
    fn from(category: RelationshipCategory) -> Self {
        match category {
            RelationshipCategory::Structural => "structural",
            RelationshipCategory::Dynamic => "dynamic",
            RelationshipCategory::Dependency => "dependency",
            RelationshipCategory::General => "general",
        }
    }
}

impl fmt::Display for RelationshipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", <&'static str>::from(*self))
    }
}
