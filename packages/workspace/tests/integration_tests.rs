/// Filesystem collaborators driving a full edit session
use scene_editor::{
    CollabError, EditSession, EditorError, FileTransfer, ListenerKind, LoadPaths, NodeId,
    ProjectFiles, SourceFile, StructureAction, ToolDescriptor, ToolKind, ToolRegistry,
};
use scene_workspace::{FsFileTransfer, JsonToolRegistry};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "site/index.html", "<main><h1>Title</h1><p>Body</p></main>");
    write(dir.path(), "site/style.css", "h1 { font-size: 2rem; }");
    write(
        dir.path(),
        "site/app.js",
        "document.addEventListener('DOMContentLoaded', init);\nbtn.onclick = () => go();",
    );
    write(
        dir.path(),
        "public/modules/tools.json",
        &serde_json::to_string_pretty(&json!({
            "families": ["Typography"],
            "tools": [{
                "id": "tool_color",
                "name": "Text color",
                "family": "Typography",
                "type": "color",
                "property": "color",
                "defaultValue": "#000000"
            }]
        }))
        .unwrap(),
    );
    dir
}

fn paths() -> LoadPaths {
    LoadPaths::new("site/index.html", "site/style.css", "site/app.js")
}

#[tokio::test]
async fn test_load_reads_files_and_listeners() {
    let dir = project();
    let transfer = FsFileTransfer::new(dir.path());

    let loaded = transfer.load_files(&paths()).await.unwrap();

    assert_eq!(loaded.files.html.path, "site/index.html");
    assert!(loaded.files.css.content.contains("font-size"));
    assert_eq!(loaded.js_analysis.len(), 2);
    assert_eq!(loaded.js_analysis[0].event, "DOMContentLoaded");
    assert_eq!(loaded.js_analysis[1].kind, ListenerKind::OnProperty);
}

#[tokio::test]
async fn test_load_refuses_escaping_paths() {
    let dir = project();
    let transfer = FsFileTransfer::new(dir.path().join("site"));

    let err = transfer
        .load_files(&LoadPaths::new("../public/modules/tools.json", "style.css", "app.js"))
        .await
        .unwrap_err();
    assert!(matches!(err, CollabError::InvalidPath(_)));
}

#[tokio::test]
async fn test_load_missing_file_is_io_error() {
    let dir = project();
    let transfer = FsFileTransfer::new(dir.path());

    let err = transfer
        .load_files(&LoadPaths::new("site/nope.html", "site/style.css", "site/app.js"))
        .await
        .unwrap_err();
    assert!(matches!(err, CollabError::Io(_)));
}

#[tokio::test]
async fn test_save_refuses_before_writing() {
    let dir = project();
    let transfer = FsFileTransfer::new(dir.path());
    let files = ProjectFiles {
        html: SourceFile::new("site/index.html", "<p>overwritten</p>"),
        css: SourceFile::new("site/style.css", ""),
        js: SourceFile::new("/etc/app.js", ""),
    };

    assert!(transfer.save_files(&files).await.is_err());
    let html = fs::read_to_string(dir.path().join("site/index.html")).unwrap();
    assert!(html.contains("Title"));
}

#[tokio::test]
async fn test_registry_add_tool_persists() {
    let dir = project();
    let registry = JsonToolRegistry::new(dir.path().join("public/modules/tools.json"));

    let tool = ToolDescriptor::new(
        "Remove",
        "Structure",
        ToolKind::Script {
            action: StructureAction::DeleteNode,
        },
    );
    let updated = registry.add_tool(tool).await.unwrap();

    assert_eq!(updated.tools.len(), 2);
    assert!(updated.tools[1].id.starts_with("tool_"));
    assert!(updated.families.contains("Structure"));

    let reread = registry.get_tools().await.unwrap();
    assert_eq!(reread, updated);

    let raw = fs::read_to_string(registry.path()).unwrap();
    assert!(raw.contains("\n  \"families\""));
}

#[tokio::test]
async fn test_corrupt_registry_is_json_error() {
    let dir = project();
    write(dir.path(), "public/modules/tools.json", "{ not json");
    let registry = JsonToolRegistry::new(dir.path().join("public/modules/tools.json"));

    assert!(matches!(
        registry.get_tools().await,
        Err(CollabError::Json(_))
    ));
}

#[tokio::test]
async fn test_session_edit_and_save_to_disk() {
    let dir = project();
    let mut session = EditSession::new(
        FsFileTransfer::new(dir.path()),
        JsonToolRegistry::new(dir.path().join("public/modules/tools.json")),
    );

    session.initial_load(&paths()).await.unwrap();
    session.load_registry().await.unwrap();

    // body, main, h1, "Title", p, "Body"
    session.select(Some(NodeId::from("node_3")));
    session.apply_tool_by_id("tool_color", &json!("rebeccapurple")).unwrap();
    session.select(Some(NodeId::from("node_5")));
    session.context_action(StructureAction::DuplicateNode).unwrap();

    let receipt = session.save().await.unwrap();
    assert!(receipt.saved);

    let html = fs::read_to_string(dir.path().join("site/index.html")).unwrap();
    assert!(html.contains("color: rebeccapurple"));
    assert_eq!(html.matches("<p").count(), 2);
    let js = fs::read_to_string(dir.path().join("site/app.js")).unwrap();
    assert!(js.starts_with("document.addEventListener"));
}

#[tokio::test]
async fn test_session_load_failure_leaves_state() {
    let dir = project();
    let mut session = EditSession::new(
        FsFileTransfer::new(dir.path()),
        JsonToolRegistry::new(dir.path().join("missing.json")),
    );

    let err = session
        .initial_load(&LoadPaths::new("", "site/style.css", "site/app.js"))
        .await
        .unwrap_err();
    assert!(matches!(err, EditorError::Collab(CollabError::InvalidPath(_))));
    assert!(session.state().files.is_none());

    assert!(session.load_registry().await.is_err());
}
