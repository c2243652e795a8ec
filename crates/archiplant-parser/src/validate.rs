//! Structural validation of normalized models.
//!
//! Validation never modifies the model. It checks, in order:
//!
//! 1. identifiers: none empty, none declared twice across elements,
//!    relationships and groups;
//! 2. references: relationship endpoints and group memberships resolve;
//! 3. layers: each element type belongs to its declared layer;
//! 4. relationships: self-references and the ArchiMate relationship matrix;
//! 5. groups: no group is its own ancestor.
//!
//! Matrix violations are warnings unless [`ParseConfig::strict`] is set.
//! Every other finding is an error.
//!
//! [`ParseConfig::strict`]: crate::ParseConfig

use std::collections::HashMap;

use log::debug;
use petgraph::{algo::tarjan_scc, graph::DiGraph};

use archiplant_core::model::{Element, Group, Model, Relationship};

use crate::{
    ParseConfig,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError, Subject},
    lookup,
};

/// Validates `model`, returning its warnings.
///
/// # Errors
///
/// Returns a [`ParseError`] with every finding when any of them is an error.
pub(crate) fn validate(model: &Model, config: &ParseConfig) -> Result<Vec<Diagnostic>, ParseError> {
    let mut validator = Validator {
        model,
        strict: config.strict,
        collector: DiagnosticCollector::new(),
    };

    validator.check_identifiers();
    validator.check_references();
    validator.check_layers();
    validator.check_relationships();
    validator.check_group_cycles();

    let warnings = validator.collector.finish()?;
    debug!(warnings = warnings.len(), strict = config.strict; "Model validated");
    Ok(warnings)
}

struct Validator<'a> {
    model: &'a Model,
    strict: bool,
    collector: DiagnosticCollector,
}

impl<'a> Validator<'a> {
    fn check_identifiers(&mut self) {
        let mut seen: HashMap<String, Subject> = HashMap::new();

        for subject in declarations(self.model) {
            let Some(id) = subject.id().map(str::to_string) else {
                continue;
            };

            if id.trim().is_empty() {
                let what = subject_kind(&subject);
                self.collector.emit(
                    Diagnostic::error(format!("{what} with an empty id"))
                        .with_code(ErrorCode::E203)
                        .with_label(subject, "id is empty")
                        .with_help(format!("give every {what} a non-empty `id`")),
                );
                continue;
            }

            match seen.get(&id) {
                Some(first) => {
                    self.collector.emit(
                        Diagnostic::error(format!("id `{id}` is declared more than once"))
                            .with_code(ErrorCode::E202)
                            .with_label(subject.clone(), "duplicate declaration")
                            .with_secondary_label(first.clone(), "first declared here")
                            .with_help(
                                "give every element, relationship and group a unique id",
                            ),
                    );
                }
                None => {
                    seen.insert(id, subject);
                }
            }
        }
    }

    fn check_references(&mut self) {
        let model = self.model;

        for relationship in model.relationships() {
            for (end, id) in [("source", relationship.source()), ("target", relationship.target())] {
                if model.endpoint(id).is_none() {
                    self.missing_endpoint(relationship, end, id);
                }
            }
        }

        for element in model.elements() {
            if let Some(group_id) = element.group_id() {
                if model.group(group_id).is_none() {
                    self.missing_group(Subject::element(element.id()), group_id);
                }
            }
        }

        for group in model.groups() {
            if let Some(parent_id) = group.parent_id() {
                if model.group(parent_id).is_none() {
                    self.missing_group(Subject::group(group.id()), parent_id);
                }
            }
        }
    }

    fn missing_endpoint(&mut self, relationship: &Relationship, end: &str, id: &str) {
        let subject = Subject::relationship(relationship.id());

        let mut diag = if id.trim().is_empty() {
            Diagnostic::error(format!("relationship `{}` has no {end}", relationship.id()))
                .with_code(ErrorCode::E200)
                .with_label(subject, format!("{end} is empty"))
        } else {
            Diagnostic::error(format!(
                "relationship `{}` refers to undefined {end} `{id}`",
                relationship.id()
            ))
            .with_code(ErrorCode::E200)
            .with_label(subject, format!("`{id}` is not declared"))
        };

        let candidates = self
            .model
            .elements()
            .iter()
            .map(Element::id)
            .chain(self.model.groups().iter().map(Group::id));
        if let Some(closest) = lookup::closest(id, candidates) {
            diag = diag.with_help(format!("did you mean `{closest}`?"));
        }

        self.collector.emit(diag);
    }

    fn missing_group(&mut self, subject: Subject, group_id: &str) {
        let mut diag = Diagnostic::error(format!("{subject} refers to undefined group `{group_id}`"))
            .with_code(ErrorCode::E201)
            .with_label(subject, format!("`{group_id}` is not declared"));

        if let Some(closest) = lookup::closest(group_id, self.model.groups().iter().map(Group::id)) {
            diag = diag.with_help(format!("did you mean `{closest}`?"));
        }

        self.collector.emit(diag);
    }

    fn check_layers(&mut self) {
        for element in self.model.elements() {
            let element_type = element.element_type();
            if element_type.is_valid_for(element.layer()) {
                continue;
            }

            self.collector.emit(
                Diagnostic::error(format!(
                    "element type `{element_type}` is not valid in the {} layer",
                    element.layer()
                ))
                .with_code(ErrorCode::E204)
                .with_label(
                    Subject::element(element.id()),
                    format!("declared in the {} layer", element.layer()),
                )
                .with_help(format!(
                    "`{element_type}` belongs to the {} layer",
                    element_type.layer()
                )),
            );
        }
    }

    fn check_relationships(&mut self) {
        let model = self.model;

        for relationship in model.relationships() {
            let (Some(source), Some(target)) = (
                model.endpoint(relationship.source()),
                model.endpoint(relationship.target()),
            ) else {
                continue;
            };
            let kind = relationship.kind();
            let subject = Subject::relationship(relationship.id());

            if relationship.is_self_reference() {
                if !kind.allows_self_reference() {
                    self.collector.emit(
                        Diagnostic::error(format!(
                            "{kind} relationship `{}` connects `{}` to itself",
                            relationship.id(),
                            relationship.source()
                        ))
                        .with_code(ErrorCode::E206)
                        .with_label(subject, "self-relationship")
                        .with_help(
                            "only association, directed association, flow, triggering and influence \
                             may connect an element to itself",
                        ),
                    );
                }
                continue;
            }

            if kind.permits(source, target) {
                continue;
            }

            let message = format!(
                "{kind} is not permitted from {} to {}",
                describe(model, relationship.source()),
                describe(model, relationship.target()),
            );
            let diag = if self.strict {
                Diagnostic::error(message)
            } else {
                Diagnostic::warning(message)
            };
            self.collector.emit(
                diag.with_code(ErrorCode::E205)
                    .with_label(subject, "violates the relationship matrix")
                    .with_help("use an association or a permitted relationship type"),
            );
        }
    }

    fn check_group_cycles(&mut self) {
        let groups = self.model.groups();
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let mut nodes = HashMap::new();

        for (index, group) in groups.iter().enumerate() {
            nodes
                .entry(group.id())
                .or_insert_with(|| graph.add_node(index));
        }
        for group in groups {
            if let (Some(&child), Some(parent)) = (
                nodes.get(group.id()),
                group.parent_id().and_then(|parent| nodes.get(parent)),
            ) {
                graph.update_edge(child, *parent, ());
            }
        }

        let mut cycles: Vec<Vec<usize>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1 || graph.contains_edge(component[0], component[0])
            })
            .map(|component| {
                let mut members: Vec<usize> = component.iter().map(|node| graph[*node]).collect();
                members.sort_unstable();
                members
            })
            .collect();
        cycles.sort();

        for members in cycles {
            let path = self.cycle_path(members[0]);
            let first = &groups[members[0]];

            let mut diag = Diagnostic::error(format!("group cycle: {}", path.join(" -> ")))
                .with_code(ErrorCode::E207)
                .with_label(Subject::group(first.id()), "group is its own ancestor");
            for &member in &members[1..] {
                diag = diag.with_secondary_label(
                    Subject::group(groups[member].id()),
                    "part of the cycle",
                );
            }
            self.collector.emit(
                diag.with_help("remove one `parent_group_id` to break the cycle"),
            );
        }
    }

    /// Follows parent links from the group at `start` until it repeats.
    fn cycle_path(&self, start: usize) -> Vec<&'a str> {
        let model = self.model;
        let origin = model.groups()[start].id();
        let mut path = vec![origin];
        let mut current = model.group(origin);

        while let Some(parent_id) = current.and_then(Group::parent_id) {
            path.push(parent_id);
            if parent_id == origin || path.len() > model.groups().len() {
                break;
            }
            current = model.group(parent_id);
        }

        path
    }
}

fn subject_kind(subject: &Subject) -> &'static str {
    match subject {
        Subject::Element(_) => "element",
        Subject::Relationship(_) => "relationship",
        Subject::Group(_) => "group",
        Subject::Location { .. } => "entry",
    }
}

/// Every declared id with its subject, in declaration order.
fn declarations(model: &Model) -> Vec<Subject> {
    let groups = model.groups().iter().map(|g| Subject::group(g.id()));
    let elements = model.elements().iter().map(|e| Subject::element(e.id()));
    let relationships = model
        .relationships()
        .iter()
        .map(|r| Subject::relationship(r.id()));
    groups.chain(elements).chain(relationships).collect()
}

/// Names an endpoint by id and type for matrix messages.
fn describe(model: &Model, id: &str) -> String {
    match model.element(id) {
        Some(element) => format!("`{id}` ({})", element.element_type()),
        None => format!("`{id}` (group)"),
    }
}

#[cfg(test)]
mod tests {
    use archiplant_core::{
        element::ElementType,
        layer::Layer,
        relationship::RelationshipKind,
        style::GroupType,
    };

    use super::*;
    use crate::error::Severity;

    fn element(id: &str, element_type: ElementType) -> Element {
        Element::new(id, id, element_type, element_type.layer())
    }

    fn serving(id: &str, source: &str, target: &str) -> Relationship {
        Relationship::new(id, source, target, RelationshipKind::Serving)
    }

    fn codes(err: &ParseError) -> Vec<ErrorCode> {
        err.diagnostics().iter().filter_map(|d| d.code()).collect()
    }

    #[test]
    fn test_valid_model_has_no_findings() {
        let model = Model::new(None)
            .with_element(element("crm", ElementType::ApplicationComponent))
            .with_element(element("sales", ElementType::BusinessProcess))
            .with_relationship(serving("r1", "crm", "sales"));

        let warnings = validate(&model, &ParseConfig::default()).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_endpoint_reported_once() {
        let model = Model::new(None)
            .with_element(element("crm", ElementType::ApplicationComponent))
            .with_relationship(serving("r1", "crm", "ghost"));

        let err = validate(&model, &ParseConfig::default()).unwrap_err();

        assert_eq!(codes(&err), vec![ErrorCode::E200]);
        assert!(err.diagnostics()[0].message().contains("`ghost`"));
        assert_eq!(err.diagnostics()[0].entity_id(), Some("r1"));
    }

    #[test]
    fn test_missing_endpoint_suggests_closest_id() {
        let model = Model::new(None)
            .with_element(element("customer", ElementType::BusinessActor))
            .with_element(element("sales", ElementType::BusinessProcess))
            .with_relationship(Relationship::new(
                "r1",
                "custmer",
                "sales",
                RelationshipKind::Assignment,
            ));

        let err = validate(&model, &ParseConfig::default()).unwrap_err();
        assert_eq!(err.diagnostics()[0].help(), Some("did you mean `customer`?"));
    }

    #[test]
    fn test_duplicate_ids_across_kinds() {
        let model = Model::new(None)
            .with_group(Group::new("x", "X", GroupType::Package))
            .with_element(element("x", ElementType::Goal));

        let err = validate(&model, &ParseConfig::default()).unwrap_err();
        let diag = &err.diagnostics()[0];

        assert_eq!(diag.code(), Some(ErrorCode::E202));
        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(diag.labels()[1].subject(), &Subject::group("x"));
    }

    #[test]
    fn test_empty_id_rejected() {
        let model = Model::new(None).with_element(element("", ElementType::Goal));

        let err = validate(&model, &ParseConfig::default()).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E203]);
    }

    #[test]
    fn test_undefined_group() {
        let model = Model::new(None)
            .with_group(Group::new("core", "Core", GroupType::Package))
            .with_element(element("crm", ElementType::ApplicationComponent).with_group("cor"));

        let err = validate(&model, &ParseConfig::default()).unwrap_err();

        assert_eq!(codes(&err), vec![ErrorCode::E201]);
        assert_eq!(err.diagnostics()[0].help(), Some("did you mean `core`?"));
    }

    #[test]
    fn test_layer_mismatch() {
        let model = Model::new(None).with_element(Element::new(
            "db",
            "DB",
            ElementType::Node,
            Layer::Business,
        ));

        let err = validate(&model, &ParseConfig::default()).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E204]);
    }

    #[test]
    fn test_matrix_violation_is_warning_by_default() {
        let model = Model::new(None)
            .with_element(element("doc", ElementType::BusinessObject))
            .with_element(element("sales", ElementType::BusinessProcess))
            .with_relationship(serving("r1", "doc", "sales"));

        let warnings = validate(&model, &ParseConfig::default()).unwrap();

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity(), Severity::Warning);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E205));
    }

    #[test]
    fn test_matrix_violation_is_error_when_strict() {
        let model = Model::new(None)
            .with_element(element("doc", ElementType::BusinessObject))
            .with_element(element("sales", ElementType::BusinessProcess))
            .with_relationship(serving("r1", "doc", "sales"));

        let err = validate(&model, &ParseConfig::new(true)).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E205]);
    }

    #[test]
    fn test_self_reference() {
        let model = Model::new(None)
            .with_element(element("p", ElementType::BusinessProcess))
            .with_relationship(Relationship::new("r1", "p", "p", RelationshipKind::Triggering))
            .with_relationship(Relationship::new("r2", "p", "p", RelationshipKind::Composition));

        let err = validate(&model, &ParseConfig::default()).unwrap_err();

        assert_eq!(codes(&err), vec![ErrorCode::E206]);
        assert_eq!(err.diagnostics()[0].entity_id(), Some("r2"));
    }

    #[test]
    fn test_group_endpoints_always_permitted() {
        let model = Model::new(None)
            .with_group(Group::new("g", "G", GroupType::Package))
            .with_element(element("goal", ElementType::Goal))
            .with_relationship(Relationship::new("r1", "g", "goal", RelationshipKind::Access));

        assert!(validate(&model, &ParseConfig::new(true)).unwrap().is_empty());
    }

    #[test]
    fn test_two_group_cycle() {
        let model = Model::new(None)
            .with_group(Group::new("g1", "G1", GroupType::Package).with_parent("g2"))
            .with_group(Group::new("g2", "G2", GroupType::Package).with_parent("g1"));

        let err = validate(&model, &ParseConfig::default()).unwrap_err();
        let diag = &err.diagnostics()[0];

        assert_eq!(codes(&err), vec![ErrorCode::E207]);
        assert_eq!(diag.message(), "group cycle: g1 -> g2 -> g1");
        assert_eq!(diag.entity_id(), Some("g1"));
        assert_eq!(diag.labels().len(), 2);
    }

    #[test]
    fn test_self_parented_group() {
        let model = Model::new(None)
            .with_group(Group::new("g", "G", GroupType::Frame).with_parent("g"));

        let err = validate(&model, &ParseConfig::default()).unwrap_err();
        assert_eq!(err.diagnostics()[0].message(), "group cycle: g -> g");
    }

    #[test]
    fn test_nested_groups_without_cycle() {
        let model = Model::new(None)
            .with_group(Group::new("outer", "Outer", GroupType::Package))
            .with_group(Group::new("inner", "Inner", GroupType::Node).with_parent("outer"));

        assert!(validate(&model, &ParseConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_all_findings_collected() {
        let model = Model::new(None)
            .with_element(element("a", ElementType::Goal))
            .with_element(element("a", ElementType::Goal))
            .with_relationship(serving("r1", "a", "missing"))
            .with_group(Group::new("g", "G", GroupType::Package).with_parent("g"));

        let err = validate(&model, &ParseConfig::default()).unwrap_err();
        assert_eq!(
            codes(&err),
            vec![ErrorCode::E202, ErrorCode::E200, ErrorCode::E207]
        );
    }
}
