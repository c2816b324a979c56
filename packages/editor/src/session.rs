//! # Edit Session
//!
//! One user's editing session over one page: the state store, the sandbox
//! holding the live tree, and the collaborators used to load, save and fetch
//! tools.
//!
//! Loading goes collaborator → parser → store → sandbox. Every later edit
//! acts on the live tree and is recorded in the store.

use crate::collab::{FileTransfer, LoadPaths, SaveReceipt, ToolRegistry};
use crate::engine::{self, ToolEngine, ToolOutcome};
use crate::errors::{EditorError, EditorResult};
use crate::state::{EditorState, ProjectFiles, Registry, SourceFile, StatePatch, Viewport, ZOOM_STEP};
use crate::store::{labels, StateStore};
use crate::tools::ToolDescriptor;
use scene_parser::{parse, IdAllocator, NodeId};
use scene_sandbox::{LiveNode, Sandbox, StructureAction, StructureChange, DEFAULT_CONTAINER_TAG};
use serde_json::Value;
use tracing::{debug, info};

/// Attribute marking an element as locked in the editor
pub const LOCK_ATTR: &str = "data-locked";

pub struct EditSession<F, R> {
    store: StateStore,
    sandbox: Sandbox,
    files: F,
    tools: ToolEngine<R>,
}

impl<F: FileTransfer, R: ToolRegistry> EditSession<F, R> {
    pub fn new(files: F, registry: R) -> Self {
        Self {
            store: StateStore::new(),
            sandbox: Sandbox::new(IdAllocator::new()),
            files,
            tools: ToolEngine::new(registry),
        }
    }

    pub fn state(&self) -> &EditorState {
        self.store.state()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// For subscribing listeners
    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// Load the page files, rebuild the model and project it.
    ///
    /// A collaborator or parse failure leaves the state untouched. Returns the
    /// number of stamped elements.
    pub async fn initial_load(&mut self, paths: &LoadPaths) -> EditorResult<usize> {
        let loaded = self.files.load_files(paths).await?;
        let (model, rules) = parse(
            &loaded.files.html.content,
            &loaded.files.css.content,
            self.sandbox.ids(),
        )?;

        let html = loaded.files.html.content.clone();
        let css = loaded.files.css.content.clone();
        let js = loaded.files.js.content.clone();

        self.store.set(
            StatePatch::new()
                .files(loaded.files)
                .document_model(model.clone())
                .css_rules(rules)
                .js_analysis(loaded.js_analysis),
            labels::INITIAL_LOAD,
            false,
        );

        let stamped = self.sandbox.project(&html, &css, &js, &model).await?;
        info!(
            html = %paths.html_path,
            nodes = model.node_count(),
            stamped,
            "page loaded"
        );
        Ok(stamped)
    }

    /// Write the live markup and style back. The script is saved unchanged.
    pub async fn save(&self) -> EditorResult<SaveReceipt> {
        let current = self.store.state().files.as_ref().ok_or(EditorError::NotLoaded)?;
        let serialized = self.sandbox.serialize()?;

        let files = ProjectFiles {
            html: SourceFile::new(current.html.path.clone(), serialized.html),
            css: SourceFile::new(current.css.path.clone(), serialized.css),
            js: current.js.clone(),
        };
        let receipt = self.files.save_files(&files).await?;
        info!(html = %files.html.path, saved = receipt.saved, "page saved");
        Ok(receipt)
    }

    pub async fn load_registry(&mut self) -> EditorResult<Registry> {
        Ok(self.tools.load_registry(&mut self.store).await?)
    }

    pub async fn add_tool(&mut self, tool: ToolDescriptor) -> EditorResult<Registry> {
        Ok(self.tools.add_tool(&mut self.store, tool).await?)
    }

    /// Change the selection; `None` deselects
    pub fn select(&mut self, id: Option<NodeId>) {
        debug!(selected = ?id, "select");
        self.store
            .set(StatePatch::new().selected(id), labels::SELECT_NODE, false);
    }

    pub fn apply_tool(&mut self, tool: &ToolDescriptor, value: &Value) -> Option<ToolOutcome> {
        let selected = self.store.state().selected_node_id.clone();
        engine::apply_tool(
            &mut self.store,
            &mut self.sandbox,
            tool,
            selected.as_ref(),
            value,
        )
    }

    /// Apply a registry tool by id
    pub fn apply_tool_by_id(
        &mut self,
        tool_id: &str,
        value: &Value,
    ) -> EditorResult<Option<ToolOutcome>> {
        let tool = self
            .store
            .state()
            .registry
            .tool(tool_id)
            .cloned()
            .ok_or_else(|| EditorError::UnknownTool(tool_id.to_string()))?;
        Ok(self.apply_tool(&tool, value))
    }

    /// Structural context-menu action on the selection, recorded like a script tool
    pub fn context_action(&mut self, action: StructureAction) -> Option<StructureChange> {
        let selected = self.store.state().selected_node_id.clone()?;
        let change = self
            .sandbox
            .execute(&selected, action, DEFAULT_CONTAINER_TAG)?;
        engine::record_structure_change(&mut self.store, change.clone());
        Some(change)
    }

    /// Attach `code` as the selection's click handler. Not recorded in history.
    pub fn inject_script(&mut self, code: &str) -> bool {
        let Some(selected) = self.store.state().selected_node_id.clone() else {
            return false;
        };
        self.sandbox.set_attribute(&selected, "onclick", code)
    }

    /// Mark the selection as locked. Not recorded in history.
    pub fn lock_selected(&mut self) -> bool {
        let Some(selected) = self.store.state().selected_node_id.clone() else {
            return false;
        };
        self.sandbox.set_attribute(&selected, LOCK_ATTR, "true")
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.update_viewport(|v| v.zoomed(ZOOM_STEP)).zoom
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.update_viewport(|v| v.zoomed(-ZOOM_STEP)).zoom
    }

    pub fn set_grid(&mut self, enabled: bool) {
        self.update_viewport(|v| Viewport {
            grid: enabled,
            ..v.clone()
        });
    }

    pub fn set_wireframe(&mut self, enabled: bool) {
        self.update_viewport(|v| Viewport {
            wireframe: enabled,
            ..v.clone()
        });
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.update_viewport(|v| v.panned(dx, dy));
    }

    fn update_viewport(&mut self, change: impl FnOnce(&Viewport) -> Viewport) -> &Viewport {
        let next = change(&self.store.state().viewport);
        self.store
            .set(StatePatch::new().viewport(next), labels::VIEWPORT, false);
        &self.store.state().viewport
    }

    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    /// Element outline of the live tree
    pub fn outline(&self) -> Option<LiveNode> {
        self.sandbox.outline()
    }
}
