//! Cleanup passes for UML diagram exports.
//!
//! The passes run in a fixed order: view box, shared transform discovery,
//! the recursive group cleaner, then empty group pruning.

use std::ops::AddAssign;

use crate::Options;
use crate::ast::*;
use crate::fonts::{FontRule, retarget_fonts};
use crate::matrix::{Matrix, format_coord};
use crate::path::{collapse_close_paths, transform_path_data};

/// Attributes word processors choke on, removed wherever they appear.
const UNSUPPORTED_ATTRS: [&str; 2] = ["paint-order", "vector-effect"];

/// Attributes removed only when their value is blank.
const BLANK_STRIPPED_ATTRS: [&str; 2] = ["stroke-miterlimit", "stroke-dasharray"];

/// What a cleanup run changed in one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub viewbox_added: bool,
    pub rects_removed: usize,
    pub fonts_changed: usize,
    pub attributes_cleaned: usize,
    /// Children whose coordinates absorbed the shared transform
    pub transforms_applied: usize,
    /// Groups whose `transform` attribute was folded away
    pub groups_folded: usize,
    pub empty_groups_removed: usize,
}

impl Changes {
    /// Whether the document differs from what was parsed.
    pub fn is_modified(&self) -> bool {
        self.viewbox_added
            || self.rects_removed > 0
            || self.fonts_changed > 0
            || self.attributes_cleaned > 0
            || self.transforms_applied > 0
            || self.groups_folded > 0
            || self.empty_groups_removed > 0
    }
}

impl AddAssign for Changes {
    fn add_assign(&mut self, rhs: Self) {
        self.viewbox_added |= rhs.viewbox_added;
        self.rects_removed += rhs.rects_removed;
        self.fonts_changed += rhs.fonts_changed;
        self.attributes_cleaned += rhs.attributes_cleaned;
        self.transforms_applied += rhs.transforms_applied;
        self.groups_folded += rhs.groups_folded;
        self.empty_groups_removed += rhs.empty_groups_removed;
    }
}

/// Run every cleanup pass over the document.
pub fn clean(doc: &mut Document, options: &Options) -> Changes {
    let mut changes = Changes {
        viewbox_added: normalize_viewbox(&mut doc.root),
        ..Changes::default()
    };

    let shared = extract_shared_matrix(&doc.root);
    if let Some(m) = &shared {
        log::debug!("shared transform: {:?}", m.components());
    }

    let fonts = options.font_rule();
    for group in doc.root.child_elements_mut().filter(|e| e.is("g")) {
        clean_group(group, shared.as_ref(), fonts.as_ref(), &mut changes);
    }

    changes.empty_groups_removed = remove_empty_groups(&mut doc.root);
    changes
}

/// Add `viewBox="0 0 w h"` derived from `width`/`height` when missing.
pub fn normalize_viewbox(root: &mut Element) -> bool {
    if root.get_attr("viewBox").is_some() {
        return false;
    }
    let (Some(width), Some(height)) = (root.get_attr("width"), root.get_attr("height")) else {
        return false;
    };

    // "800px" -> "800"
    let width = strip_units(width);
    let height = strip_units(height);
    let view_box = format!("0 0 {} {}", width, height);
    log::debug!("adding viewBox {}", view_box);
    root.set_attr("viewBox", view_box);
    true
}

fn strip_units(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Find the transform the exporter repeated across the first layer of groups.
///
/// It is read from the first group of the root's first group.
pub fn extract_shared_matrix(root: &Element) -> Option<Matrix> {
    root.first_child("g")?
        .first_child("g")?
        .get_attr("transform")
        .and_then(Matrix::from_transform)
}

/// Clean one group, then recurse into its child groups.
///
/// The shared matrix keeps propagating below a group that folded it, so a
/// nested group declaring the same matrix again is folded as well.
pub fn clean_group(
    group: &mut Element,
    shared: Option<&Matrix>,
    fonts: Option<&FontRule>,
    changes: &mut Changes,
) {
    if let Some(shared) = shared
        && group
            .get_attr("transform")
            .and_then(Matrix::from_transform)
            .is_some_and(|m| m.fuzzy_eq(shared))
    {
        fold_into_children(group, shared, changes);
        group.remove_attr("transform");
        changes.groups_folded += 1;
    }

    changes.rects_removed += remove_invisible_rects(group);

    changes.attributes_cleaned += sanitize_attrs(group);
    for child in group
        .child_elements_mut()
        .filter(|e| e.is("rect") || e.is("path") || e.is("text"))
    {
        changes.attributes_cleaned += sanitize_attrs(child);
    }

    if let Some(rule) = fonts {
        changes.fonts_changed += retarget_fonts(group, rule);
    }

    for child in group.child_elements_mut().filter(|e| e.is("g")) {
        clean_group(child, shared, fonts, changes);
    }
}

/// Bake `matrix` into the group's own rect, text and path children.
///
/// Only the `x`/`y` corner of a rect moves; `width`/`height` are left as they
/// are, which is exact for the translations UML exporters emit.
fn fold_into_children(group: &mut Element, matrix: &Matrix, changes: &mut Changes) {
    for child in group.child_elements_mut() {
        match child.name.local.as_str() {
            "rect" | "text" => {
                let (x, y) = matrix.apply(number_attr(child, "x"), number_attr(child, "y"));
                child.set_attr("x", format_coord(x));
                child.set_attr("y", format_coord(y));
                child.remove_attr("transform");
                changes.transforms_applied += 1;
            }
            "path" => {
                let transformed = child.get_attr("d").and_then(|d| {
                    let new_d = transform_path_data(d, matrix);
                    (new_d != d).then_some(new_d)
                });
                if let Some(d) = transformed {
                    child.set_attr("d", d);
                    changes.transforms_applied += 1;
                }
                child.remove_attr("transform");
            }
            _ => {}
        }
    }
}

/// Read a numeric attribute, treating missing or malformed values as zero.
fn number_attr(elem: &Element, name: &str) -> f64 {
    elem.get_attr(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0.0)
}

/// Remove the group's direct rects that cannot be visible.
///
/// Everything else stays, white and stroked rects included: class diagrams
/// draw their borders with them.
fn remove_invisible_rects(group: &mut Element) -> usize {
    let before = group.children.len();
    group.children.retain(|node| match node {
        Node::Element(e) if e.is("rect") && is_invisible_rect(e) => {
            log::debug!("removing invisible rect {:?}", e.get_attr("id"));
            false
        }
        _ => true,
    });
    before - group.children.len()
}

pub fn is_invisible_rect(rect: &Element) -> bool {
    rect.get_attr("fill").is_some_and(is_transparent_fill)
        || rect.get_attr("opacity") == Some("0")
        || rect.get_attr("fill-opacity") == Some("0")
}

/// `#RRGGBB00`
fn is_transparent_fill(fill: &str) -> bool {
    fill.strip_prefix('#').is_some_and(|hex| {
        hex.len() == 8 && hex.bytes().all(|b| b.is_ascii_hexdigit()) && hex.ends_with("00")
    })
}

/// Strip unsupported attributes and repeated close commands in path data.
fn sanitize_attrs(elem: &mut Element) -> usize {
    let before = elem.attributes.len();
    elem.attributes.retain(|attr| {
        let name = attr.name.local.as_str();
        !(UNSUPPORTED_ATTRS.contains(&name)
            || (BLANK_STRIPPED_ATTRS.contains(&name) && attr.value.trim().is_empty()))
    });
    let mut cleaned = before - elem.attributes.len();

    if elem.is("path")
        && let Some(d) = elem.get_attr("d").and_then(collapse_close_paths)
    {
        elem.set_attr("d", d);
        cleaned += 1;
    }

    cleaned
}

/// Remove groups with nothing left to render, in a single pre-order pass.
///
/// A group is empty when none of its child elements has text or children of
/// its own and it owns no rect or path. Each group is judged before its
/// children, so a parent whose only child group gets removed is still kept
/// until the next run. Groups inside a removed group are judged and counted
/// as well.
pub fn remove_empty_groups(elem: &mut Element) -> usize {
    let mut removed = 0;
    elem.children.retain_mut(|node| {
        let Node::Element(e) = node else {
            return true;
        };
        let empty = e.is("g") && is_empty_group(e);
        removed += remove_empty_groups(e);
        if empty {
            log::debug!("removing empty group {:?}", e.get_attr("id"));
            removed += 1;
        }
        !empty
    });
    removed
}

fn is_empty_group(group: &Element) -> bool {
    let has_content = group
        .child_elements()
        .any(|e| e.has_child_elements() || !e.text_content().trim().is_empty());
    let has_shape = group.child_elements().any(|e| e.is("rect") || e.is("path"));
    !has_content && !has_shape
}
