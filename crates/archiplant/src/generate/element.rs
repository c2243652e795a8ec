//! PlantUML forms for a single element and its attachments.
//!
//! An element is written in the first matching form:
//!
//! | Condition | Form |
//! |---|---|
//! | has ports | `component "Name" as id { portin … }` |
//! | `show_as_component` | `[Name] #Color <<stereotype>> as id` |
//! | color or stereotype | `archimate #Color "Name" <<sprite>> <<stereotype>> as id` |
//! | otherwise | `Macro(id, "Name")` |
//!
//! Interfaces and notes follow the declaration. A `grouping_style` wraps the
//! whole result in a container block.

use archiplant_core::model::{Element, Note, Port};

use super::theme::layer_color;
use crate::ident;

/// Turns an id into a PlantUML alias.
///
/// Distinct ids always get distinct aliases.
pub fn alias(id: &str) -> String {
    ident::escape(id, |c| c.is_ascii_alphanumeric())
}

/// Escapes text for use inside a double-quoted PlantUML string or a one-line
/// label.
///
/// Line breaks become PlantUML's literal `\n`, so user text can never start a
/// new source line.
pub fn quoted(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace(['\r', '\n'], "\\n")
        .replace('"', "'")
}

/// Renders `element` and its attachments, unindented.
pub fn element_lines(element: &Element, show_element_types: bool) -> Vec<String> {
    let id = alias(element.id());
    let label = label(element, show_element_types);

    let mut lines = Vec::new();
    if element.ports().is_empty() {
        lines.push(declaration(element, &id, &label));
    } else {
        lines.push(format!(
            "component \"{label}\" as {id}{} {{",
            color_suffix(element)
        ));
        lines.extend(
            element
                .ports()
                .iter()
                .map(|port| format!("  {}", port_line(port, &id))),
        );
        lines.push("}".to_string());
    }

    for interface in element.interfaces() {
        let interface_id = format!("{id}_if_{}", alias(interface.id()));
        lines.push(format!(
            "() \"{}\" as {interface_id}",
            quoted(interface.name())
        ));
        lines.push(format!("{interface_id} - {id}"));
    }

    for (index, note) in element.notes().iter().enumerate() {
        lines.push(note_line(note, &id, index + 1));
    }

    match element.grouping_style() {
        Some(style) => {
            let mut wrapped = vec![format!("{style} \"{}\" {{", quoted(element.name()))];
            wrapped.extend(lines.into_iter().map(|line| format!("  {line}")));
            wrapped.push("}".to_string());
            wrapped
        }
        None => lines,
    }
}

fn label(element: &Element, show_element_types: bool) -> String {
    let name = quoted(element.name());
    if show_element_types {
        format!("{name}\\n<<{}>>", element.element_type().exchange_name())
    } else {
        name
    }
}

fn declaration(element: &Element, id: &str, label: &str) -> String {
    let stereotype = element
        .stereotype()
        .map(|stereotype| format!(" <<{}>>", quoted(stereotype)))
        .unwrap_or_default();

    if element.show_as_component() {
        return format!("[{label}]{}{stereotype} as {id}", color_suffix(element));
    }

    if element.color().is_some() || element.stereotype().is_some() {
        let color = element
            .color()
            .map(|color| color.to_hex())
            .unwrap_or_else(|| format!("#{}", element.layer()));
        return format!(
            "archimate {color} \"{label}\" <<{}>>{stereotype} as {id}",
            element.element_type().sprite_stereotype()
        );
    }

    format!(
        "{}({id}, \"{label}\")",
        element.element_type().plantuml_macro()
    )
}

/// ` #RRGGBB` for an explicit color, the layer color otherwise.
fn color_suffix(element: &Element) -> String {
    match element.color() {
        Some(color) => format!(" {}", color.to_hex()),
        None => format!(" {}", layer_color(element.layer())),
    }
}

/// Port aliases are scoped to their owner, like interface and note aliases.
fn port_line(port: &Port, owner: &str) -> String {
    let name = match port.interface_type() {
        Some(interface_type) => format!("{} ({interface_type})", port.name()),
        None => port.name().to_string(),
    };
    format!(
        "{} \"{}\" as {owner}_port_{}",
        port.direction().keyword(),
        quoted(&name),
        alias(port.id())
    )
}

fn note_line(note: &Note, owner: &str, ordinal: usize) -> String {
    let style = match (note.background_color(), note.border_color()) {
        (Some(background), Some(border)) => format!(" {background};line:{border}"),
        (Some(background), None) => format!(" {background}"),
        (None, Some(border)) => format!(" #line:{border}"),
        (None, None) => String::new(),
    };
    let content = quoted(note.content());

    if note.is_floating() {
        format!("note \"{content}\" as {owner}_note_{ordinal}{style}")
    } else {
        format!("note {} of {owner}{style} : {content}", note.position())
    }
}
