//! The universal fix pass.
//!
//! Importers of the exchange format reject relationships the ArchiMate
//! matrix does not allow. The pass rewrites each of those to an association,
//! which is permitted between any two concepts, and reports what it changed.

use log::{debug, warn};

use archiplant_core::{model::Model, relationship::RelationshipKind};

/// One rewritten relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    relationship_id: String,
    original: RelationshipKind,
    replacement: RelationshipKind,
}

impl Fix {
    pub fn relationship_id(&self) -> &str {
        &self.relationship_id
    }

    pub fn original(&self) -> RelationshipKind {
        self.original
    }

    pub fn replacement(&self) -> RelationshipKind {
        self.replacement
    }
}

/// Summary of a fix pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixReport {
    fixes: Vec<Fix>,
    total: usize,
}

impl FixReport {
    pub fn fixes(&self) -> &[Fix] {
        &self.fixes
    }

    /// Number of relationships examined.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of relationships exported with their original kind.
    pub fn preserved(&self) -> usize {
        self.total - self.fixes.len()
    }

    /// Share of relationships exported unchanged, from `0.0` to `1.0`.
    ///
    /// A model without relationships counts as fully preserved.
    pub fn preservation_rate(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.preserved() as f64 / self.total as f64
        }
    }
}

/// Returns the kind to export for each relationship, in model order.
///
/// With `enabled` unset every kind is kept and violations are only logged.
pub fn apply(model: &Model, enabled: bool) -> (Vec<RelationshipKind>, FixReport) {
    let mut report = FixReport {
        fixes: Vec::new(),
        total: model.relationships().len(),
    };

    let kinds = model
        .relationships()
        .iter()
        .map(|relationship| {
            let kind = relationship.kind();
            let permitted = match (
                model.endpoint(relationship.source()),
                model.endpoint(relationship.target()),
            ) {
                (Some(source), Some(target)) => kind.permits(source, target),
                _ => true,
            };

            if permitted {
                return kind;
            }
            if !enabled {
                warn!(
                    relationship = relationship.id(), kind:%;
                    "Exporting relationship the matrix rejects"
                );
                return kind;
            }

            debug!(
                relationship = relationship.id(), kind:%;
                "Rewriting relationship to association"
            );
            report.fixes.push(Fix {
                relationship_id: relationship.id().to_string(),
                original: kind,
                replacement: RelationshipKind::Association,
            });
            RelationshipKind::Association
        })
        .collect();

    (kinds, report)
}

#[cfg(test)]
mod tests {
    use archiplant_core::{
        element::ElementType,
        model::{Element, Relationship},
    };

    use super::*;

    fn element(id: &str, element_type: ElementType) -> Element {
        Element::new(id, id, element_type, element_type.layer())
    }

    fn model() -> Model {
        Model::new(None)
            .with_element(element("actor", ElementType::BusinessActor))
            .with_element(element("role", ElementType::BusinessRole))
            .with_element(element("data", ElementType::DataObject))
            .with_relationship(Relationship::new("ok", "actor", "data", RelationshipKind::Access))
            .with_relationship(Relationship::new("bad", "actor", "role", RelationshipKind::Access))
    }

    #[test]
    fn test_rewrites_rejected_relationships() {
        let (kinds, report) = apply(&model(), true);

        assert_eq!(kinds, vec![RelationshipKind::Access, RelationshipKind::Association]);
        assert_eq!(report.fixes().len(), 1);
        assert_eq!(report.fixes()[0].relationship_id(), "bad");
        assert_eq!(report.fixes()[0].original(), RelationshipKind::Access);
        assert_eq!(report.preserved(), 1);
        assert_eq!(report.total(), 2);
        assert!((report.preservation_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_disabled_keeps_kinds() {
        let (kinds, report) = apply(&model(), false);

        assert_eq!(kinds, vec![RelationshipKind::Access, RelationshipKind::Access]);
        assert!(report.fixes().is_empty());
        assert_eq!(report.preserved(), 2);
    }

    #[test]
    fn test_empty_model_fully_preserved() {
        let (kinds, report) = apply(&Model::new(None), true);

        assert!(kinds.is_empty());
        assert_eq!(report.preservation_rate(), 1.0);
    }
}
