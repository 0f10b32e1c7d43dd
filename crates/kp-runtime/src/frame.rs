#![forbid(unsafe_code)]

//! DOM property frames and diffing.
//!
//! The page markup is rendered once; after that the model only ever changes
//! *properties* of existing elements: toggling classes, setting attributes,
//! inline styles and text. A [`Frame`] records the full set of managed
//! properties for one render, keyed by element id. Diffing two frames yields
//! the minimal list of [`DomPatch`] operations the host applies.
//!
//! # Invariants
//!
//! 1. Only properties written into a frame are managed. Classes and
//!    attributes present in the static markup but never written by `view`
//!    are never touched by a patch.
//! 2. `diff(a, a)` is empty.
//! 3. Applying `diff(a, b)` to a DOM in state `a` yields state `b` for every
//!    managed class, attribute and style. Text is the exception: text set in
//!    `b` converges, but text managed in `a` and absent from `b` is not
//!    cleared and keeps its last value.
//! 4. Patch order is deterministic (elements and keys in sorted order).

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Managed properties of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeProps {
    pub classes: BTreeSet<String>,
    pub attrs: BTreeMap<String, String>,
    pub styles: BTreeMap<String, String>,
    pub text: Option<String>,
}

/// The managed DOM properties of one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    nodes: BTreeMap<String, NodeProps>,
}

/// Builder handle for one element inside a [`Frame`].
pub struct NodeMut<'a> {
    props: &'a mut NodeProps,
}

impl Frame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or continue) writing properties of element `id`.
    pub fn node(&mut self, id: impl Into<String>) -> NodeMut<'_> {
        NodeMut {
            props: self.nodes.entry(id.into()).or_default(),
        }
    }

    /// Properties recorded for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&NodeProps> {
        self.nodes.get(id)
    }

    /// Whether `id` has class `class` in this frame.
    #[must_use]
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|n| n.classes.contains(class))
    }

    #[must_use]
    pub fn attr(&self, id: &str, name: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|n| n.attrs.get(name))
            .map(String::as_str)
    }

    #[must_use]
    pub fn style(&self, id: &str, name: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|n| n.styles.get(name))
            .map(String::as_str)
    }

    #[must_use]
    pub fn text(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.text.as_deref())
    }

    /// Number of elements with managed properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Patches that turn `self` into `next`.
    #[must_use]
    pub fn diff(&self, next: &Frame) -> Vec<DomPatch> {
        let empty = NodeProps::default();
        let ids: BTreeSet<&String> = self.nodes.keys().chain(next.nodes.keys()).collect();
        let mut out = Vec::new();
        for id in ids {
            let old = self.nodes.get(id).unwrap_or(&empty);
            let new = next.nodes.get(id).unwrap_or(&empty);
            if old == new {
                continue;
            }
            diff_node(id, old, new, &mut out);
        }
        out
    }
}

impl<'a> NodeMut<'a> {
    /// Add a class.
    pub fn class(self, class: impl Into<String>) -> Self {
        self.props.classes.insert(class.into());
        self
    }

    /// Add a class only when `on` holds.
    pub fn class_if(self, class: impl Into<String>, on: bool) -> Self {
        if on { self.class(class) } else { self }
    }

    pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.attrs.insert(name.into(), value.into());
        self
    }

    pub fn style(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.styles.insert(name.into(), value.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.props.text = Some(text.into());
        self
    }
}

/// One DOM mutation, serialised for the host as
/// `{"op":"addClass","id":"…","class":"…"}` and similar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DomPatch {
    AddClass { id: String, class: String },
    RemoveClass { id: String, class: String },
    SetAttr { id: String, name: String, value: String },
    RemoveAttr { id: String, name: String },
    SetStyle { id: String, name: String, value: String },
    RemoveStyle { id: String, name: String },
    SetText { id: String, text: String },
}

impl DomPatch {
    /// Target element id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::AddClass { id, .. }
            | Self::RemoveClass { id, .. }
            | Self::SetAttr { id, .. }
            | Self::RemoveAttr { id, .. }
            | Self::SetStyle { id, .. }
            | Self::RemoveStyle { id, .. }
            | Self::SetText { id, .. } => id,
        }
    }
}

fn diff_node(id: &str, old: &NodeProps, new: &NodeProps, out: &mut Vec<DomPatch>) {
    for class in old.classes.difference(&new.classes) {
        out.push(DomPatch::RemoveClass {
            id: id.to_owned(),
            class: class.clone(),
        });
    }
    for class in new.classes.difference(&old.classes) {
        out.push(DomPatch::AddClass {
            id: id.to_owned(),
            class: class.clone(),
        });
    }
    diff_map(&old.attrs, &new.attrs, |name, value| match value {
        Some(value) => out.push(DomPatch::SetAttr {
            id: id.to_owned(),
            name: name.to_owned(),
            value: value.to_owned(),
        }),
        None => out.push(DomPatch::RemoveAttr {
            id: id.to_owned(),
            name: name.to_owned(),
        }),
    });
    diff_map(&old.styles, &new.styles, |name, value| match value {
        Some(value) => out.push(DomPatch::SetStyle {
            id: id.to_owned(),
            name: name.to_owned(),
            value: value.to_owned(),
        }),
        None => out.push(DomPatch::RemoveStyle {
            id: id.to_owned(),
            name: name.to_owned(),
        }),
    });
    // Text that stops being managed keeps its last value.
    if let Some(text) = &new.text
        && old.text.as_ref() != Some(text)
    {
        out.push(DomPatch::SetText {
            id: id.to_owned(),
            text: text.clone(),
        });
    }
}

fn diff_map(
    old: &BTreeMap<String, String>,
    new: &BTreeMap<String, String>,
    mut emit: impl FnMut(&str, Option<&str>),
) {
    for name in old.keys() {
        if !new.contains_key(name) {
            emit(name, None);
        }
    }
    for (name, value) in new {
        if old.get(name) != Some(value) {
            emit(name, Some(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frame_with(build: impl FnOnce(&mut Frame)) -> Frame {
        let mut f = Frame::new();
        build(&mut f);
        f
    }

    #[test]
    fn identical_frames_produce_no_patches() {
        let a = frame_with(|f| {
            f.node("nav-9").class("active").attr("aria-current", "true");
        });
        assert!(a.diff(&a.clone()).is_empty());
    }

    #[test]
    fn class_moves_between_elements() {
        let a = frame_with(|f| {
            f.node("nav-9").class("active");
            f.node("nav-12");
        });
        let b = frame_with(|f| {
            f.node("nav-9");
            f.node("nav-12").class("active");
        });
        assert_eq!(
            a.diff(&b),
            vec![
                DomPatch::AddClass {
                    id: "nav-12".into(),
                    class: "active".into()
                },
                DomPatch::RemoveClass {
                    id: "nav-9".into(),
                    class: "active".into()
                },
            ]
        );
    }

    #[test]
    fn removed_node_drops_managed_properties() {
        let a = frame_with(|f| {
            f.node("lightbox").class("open").style("opacity", "1");
        });
        let b = Frame::new();
        assert_eq!(
            a.diff(&b),
            vec![
                DomPatch::RemoveClass {
                    id: "lightbox".into(),
                    class: "open".into()
                },
                DomPatch::RemoveStyle {
                    id: "lightbox".into(),
                    name: "opacity".into()
                },
            ]
        );
    }

    #[test]
    fn attribute_and_text_changes() {
        let a = frame_with(|f| {
            f.node("pill-key").text("9").attr("data-index", "0");
        });
        let b = frame_with(|f| {
            f.node("pill-key").text("12").attr("data-index", "1");
        });
        assert_eq!(
            a.diff(&b),
            vec![
                DomPatch::SetAttr {
                    id: "pill-key".into(),
                    name: "data-index".into(),
                    value: "1".into()
                },
                DomPatch::SetText {
                    id: "pill-key".into(),
                    text: "12".into()
                },
            ]
        );
    }

    #[test]
    fn unmanaged_text_is_left_in_place() {
        let a = frame_with(|f| {
            f.node("error-detail").text("boom").class("shown");
        });
        let b = frame_with(|f| {
            f.node("error-detail");
        });
        assert_eq!(
            a.diff(&b),
            vec![DomPatch::RemoveClass {
                id: "error-detail".into(),
                class: "shown".into()
            }]
        );
    }

    #[test]
    fn patches_serialise_with_op_tag() {
        let patch = DomPatch::SetStyle {
            id: "to-top-ring".into(),
            name: "stroke-dashoffset".into(),
            value: "62.83".into(),
        };
        let json = serde_json::to_string(&patch).expect("serialise");
        assert_eq!(
            json,
            r#"{"op":"setStyle","id":"to-top-ring","name":"stroke-dashoffset","value":"62.83"}"#
        );
    }

    #[test]
    fn class_if_respects_condition() {
        let f = frame_with(|f| {
            f.node("x").class_if("on", false).class_if("shown", true);
        });
        assert!(!f.has_class("x", "on"));
        assert!(f.has_class("x", "shown"));
    }
}
