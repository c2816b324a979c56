//! # Editor State
//!
//! The single aggregate every editor view reads from. It is never edited in
//! place: each transition builds a new value (see [`StatePatch`]), which is
//! what lets history keep plain clones as snapshots.

use crate::tools::ToolDescriptor;
use indexmap::IndexSet;
use scene_parser::{Node, NodeId, StyleMap};
use scene_sandbox::StructureChange;
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.3;
pub const MAX_ZOOM: f64 = 2.5;
pub const ZOOM_STEP: f64 = 0.1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// The three source files a page is edited from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFiles {
    pub html: SourceFile,
    pub css: SourceFile,
    pub js: SourceFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListenerKind {
    /// `target.addEventListener('event', ...)`
    AddEventListener,
    /// `target.onevent = ...`
    OnProperty,
}

/// An event listener found in the page script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerBinding {
    pub target: String,
    pub event: String,
    #[serde(rename = "type")]
    pub kind: ListenerKind,
}

/// Tool palette contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub families: IndexSet<String>,
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
}

impl Registry {
    pub fn tool(&self, id: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|tool| tool.id == id)
    }

    /// Tools belonging to `family`, in registry order
    pub fn family<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a ToolDescriptor> {
        self.tools.iter().filter(move |tool| tool.family == family)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub grid: bool,
    pub wireframe: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            grid: false,
            wireframe: false,
        }
    }
}

impl Viewport {
    /// Copy with zoom moved by `delta` and clamped to the supported range
    pub fn zoomed(&self, delta: f64) -> Self {
        let zoom = ((self.zoom + delta) * 100.0).round() / 100.0;
        Self {
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            ..self.clone()
        }
    }

    pub fn panned(&self, dx: f64, dy: f64) -> Self {
        Self {
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
            ..self.clone()
        }
    }

    /// Zoom as a whole percentage, the way the toolbar shows it
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}

/// Last inline style edit made through a style tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleChange {
    pub selected_id: NodeId,
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub files: Option<ProjectFiles>,
    pub document_model: Option<Node>,
    pub css_rules: StyleMap,
    pub js_analysis: Vec<ListenerBinding>,
    pub selected_node_id: Option<NodeId>,
    pub registry: Registry,
    pub viewport: Viewport,
    pub last_action: Option<StructureChange>,
    pub last_style_change: Option<StyleChange>,
}

/// Field replacements merged over the current state.
///
/// Unset fields carry over unchanged.
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    files: Option<Option<ProjectFiles>>,
    document_model: Option<Option<Node>>,
    css_rules: Option<StyleMap>,
    js_analysis: Option<Vec<ListenerBinding>>,
    selected_node_id: Option<Option<NodeId>>,
    registry: Option<Registry>,
    viewport: Option<Viewport>,
    last_action: Option<Option<StructureChange>>,
    last_style_change: Option<Option<StyleChange>>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(mut self, files: ProjectFiles) -> Self {
        self.files = Some(Some(files));
        self
    }

    pub fn document_model(mut self, model: Node) -> Self {
        self.document_model = Some(Some(model));
        self
    }

    pub fn css_rules(mut self, rules: StyleMap) -> Self {
        self.css_rules = Some(rules);
        self
    }

    pub fn js_analysis(mut self, listeners: Vec<ListenerBinding>) -> Self {
        self.js_analysis = Some(listeners);
        self
    }

    /// `None` clears the selection
    pub fn selected(mut self, id: Option<NodeId>) -> Self {
        self.selected_node_id = Some(id);
        self
    }

    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn last_action(mut self, change: Option<StructureChange>) -> Self {
        self.last_action = Some(change);
        self
    }

    pub fn last_style_change(mut self, change: Option<StyleChange>) -> Self {
        self.last_style_change = Some(change);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_none()
            && self.document_model.is_none()
            && self.css_rules.is_none()
            && self.js_analysis.is_none()
            && self.selected_node_id.is_none()
            && self.registry.is_none()
            && self.viewport.is_none()
            && self.last_action.is_none()
            && self.last_style_change.is_none()
    }

    /// `base ⊕ self`
    pub fn apply_to(self, base: EditorState) -> EditorState {
        EditorState {
            files: self.files.unwrap_or(base.files),
            document_model: self.document_model.unwrap_or(base.document_model),
            css_rules: self.css_rules.unwrap_or(base.css_rules),
            js_analysis: self.js_analysis.unwrap_or(base.js_analysis),
            selected_node_id: self.selected_node_id.unwrap_or(base.selected_node_id),
            registry: self.registry.unwrap_or(base.registry),
            viewport: self.viewport.unwrap_or(base.viewport),
            last_action: self.last_action.unwrap_or(base.last_action),
            last_style_change: self.last_style_change.unwrap_or(base.last_style_change),
        }
    }
}
