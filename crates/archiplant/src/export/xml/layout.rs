//! Positions for the overview view.
//!
//! Layers are stacked top to bottom. Small layers are a single centred row.
//! Larger ones are clustered by relationship so connected elements end up in
//! the same or neighbouring rows.

use indexmap::IndexMap;
use log::debug;
use petgraph::unionfind::UnionFind;

use archiplant_core::{layer::Layer, model::Model};

pub const BOX_WIDTH: i32 = 200;
pub const BOX_HEIGHT: i32 = 60;

const MARGIN: i32 = 80;
const CANVAS_WIDTH: i32 = 1200;
const COLUMN_PITCH: i32 = 300;
const ROW_PITCH: i32 = 100;
const LAYER_PITCH: i32 = 160;
const PER_ROW: usize = 3;

/// Top-to-bottom stacking order of the layers in the view.
pub const LAYER_ORDER: [Layer; 7] = [
    Layer::Motivation,
    Layer::Strategy,
    Layer::Business,
    Layer::Application,
    Layer::Technology,
    Layer::Physical,
    Layer::Implementation,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            width: BOX_WIDTH,
            height: BOX_HEIGHT,
        }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// A placed diagram node and the band (layer row block) it sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub bounds: Bounds,
    pub band: usize,
}

/// Computes positions for every element, then every group, keyed by model id.
///
/// Groups get their own band below the layers.
pub fn layout(model: &Model) -> IndexMap<String, Placement> {
    let mut placements = IndexMap::new();
    let mut y = MARGIN;
    let mut band = 0;

    let mut bands: Vec<Vec<&str>> = LAYER_ORDER
        .iter()
        .map(|layer| {
            model
                .elements()
                .iter()
                .filter(|element| element.layer() == *layer)
                .map(|element| element.id())
                .collect()
        })
        .collect();
    bands.push(model.groups().iter().map(|group| group.id()).collect());

    for members in bands {
        if members.is_empty() {
            continue;
        }

        let ordered = by_connections(model, members);
        let rows = if ordered.len() <= PER_ROW {
            place_centered(&ordered, y, band, &mut placements);
            1
        } else {
            let clustered = clustered(model, ordered);
            place_rows(&clustered, y, band, &mut placements)
        };

        debug!(band, rows, y; "Placed view band");
        y += LAYER_PITCH.max(rows as i32 * ROW_PITCH + 60);
        band += 1;
    }

    placements
}

/// Number of relationship ends attached to `id`.
fn connections(model: &Model, id: &str) -> usize {
    model
        .relationships()
        .iter()
        .map(|relationship| {
            usize::from(relationship.source() == id) + usize::from(relationship.target() == id)
        })
        .sum()
}

/// Most connected first. The sort is stable, so ties keep input order.
fn by_connections<'a>(model: &Model, mut members: Vec<&'a str>) -> Vec<&'a str> {
    members.sort_by_key(|id| std::cmp::Reverse(connections(model, id)));
    members
}

/// Reorders members so that each connected cluster is contiguous.
///
/// Clusters appear in the order of their first member.
fn clustered<'a>(model: &Model, members: Vec<&'a str>) -> Vec<&'a str> {
    let index: IndexMap<&str, usize> = members
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();

    let mut sets = UnionFind::new(members.len());
    for relationship in model.relationships() {
        if let (Some(&a), Some(&b)) = (
            index.get(relationship.source()),
            index.get(relationship.target()),
        ) {
            sets.union(a, b);
        }
    }

    let mut clusters: IndexMap<usize, Vec<&str>> = IndexMap::new();
    for (i, id) in members.iter().enumerate() {
        clusters.entry(sets.find(i)).or_default().push(*id);
    }
    clusters.into_values().flatten().collect()
}

fn place_centered(
    members: &[&str],
    y: i32,
    band: usize,
    placements: &mut IndexMap<String, Placement>,
) {
    let count = members.len() as i32;
    let width = (count - 1) * COLUMN_PITCH + BOX_WIDTH;
    let start = (CANVAS_WIDTH - width) / 2;

    for (i, id) in members.iter().enumerate() {
        let bounds = Bounds::at(start + i as i32 * COLUMN_PITCH, y);
        placements.insert(id.to_string(), Placement { bounds, band });
    }
}

fn place_rows(
    members: &[&str],
    y: i32,
    band: usize,
    placements: &mut IndexMap<String, Placement>,
) -> usize {
    for (i, id) in members.iter().enumerate() {
        let column = (i % PER_ROW) as i32;
        let row = (i / PER_ROW) as i32;
        let bounds = Bounds::at(MARGIN + column * COLUMN_PITCH, y + row * ROW_PITCH);
        placements.insert(id.to_string(), Placement { bounds, band });
    }
    members.len().div_ceil(PER_ROW)
}

#[cfg(test)]
mod tests {
    use archiplant_core::{
        element::ElementType,
        model::{Element, Group, Relationship},
        relationship::RelationshipKind,
        style::GroupType,
    };

    use super::*;

    fn element(id: &str, element_type: ElementType) -> Element {
        Element::new(id, id, element_type, element_type.layer())
    }

    fn bounds(placements: &IndexMap<String, Placement>, id: &str) -> Bounds {
        placements[id].bounds
    }

    #[test]
    fn test_small_layer_centered() {
        let model = Model::new(None)
            .with_element(element("a", ElementType::BusinessActor))
            .with_element(element("b", ElementType::BusinessRole));

        let placements = layout(&model);
        assert_eq!(bounds(&placements, "a"), Bounds::at(350, 80));
        assert_eq!(bounds(&placements, "b"), Bounds::at(650, 80));
    }

    #[test]
    fn test_layers_stacked_in_order() {
        let model = Model::new(None)
            .with_element(element("app", ElementType::ApplicationComponent))
            .with_element(element("goal", ElementType::Goal))
            .with_element(element("actor", ElementType::BusinessActor));

        let placements = layout(&model);
        assert_eq!(bounds(&placements, "goal").y, 80);
        assert_eq!(bounds(&placements, "actor").y, 240);
        assert_eq!(bounds(&placements, "app").y, 400);
        assert_eq!(placements["app"].band, 2);
    }

    #[test]
    fn test_most_connected_first() {
        let model = Model::new(None)
            .with_element(element("a", ElementType::BusinessActor))
            .with_element(element("b", ElementType::BusinessRole))
            .with_element(element("c", ElementType::BusinessProcess))
            .with_relationship(Relationship::new("r1", "a", "c", RelationshipKind::Assignment))
            .with_relationship(Relationship::new("r2", "b", "c", RelationshipKind::Assignment));

        let placements = layout(&model);
        let order: Vec<&str> = placements.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_large_layer_rows_and_clusters() {
        let mut model = Model::new(None);
        for id in ["p", "q", "x", "y", "z"] {
            model = model.with_element(element(id, ElementType::ApplicationComponent));
        }
        model = model
            .with_element(element("node", ElementType::Node))
            .with_relationship(Relationship::new("r1", "p", "z", RelationshipKind::Flow));

        let placements = layout(&model);
        let order: Vec<&str> = placements.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["p", "z", "q", "x", "y", "node"]);

        assert_eq!(bounds(&placements, "p"), Bounds::at(80, 80));
        assert_eq!(bounds(&placements, "z"), Bounds::at(380, 80));
        assert_eq!(bounds(&placements, "x"), Bounds::at(80, 180));
        assert_eq!(bounds(&placements, "node").y, 80 + 260);
    }

    #[test]
    fn test_groups_in_last_band() {
        let model = Model::new(None)
            .with_group(Group::new("g", "Front", GroupType::Package))
            .with_element(element("a", ElementType::BusinessActor));

        let placements = layout(&model);
        assert_eq!(bounds(&placements, "g").y, 240);
        assert_eq!(placements["g"].band, 1);
    }
}
