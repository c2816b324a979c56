//! Page files read from and written to a project root.
//!
//! Every requested path is resolved lexically under the root. Paths that are
//! empty, absolute, or climb out of the root with `..` are refused before any
//! file is touched.

use crate::analysis::analyze_listeners;
use async_trait::async_trait;
use scene_editor::{
    CollabError, CollabResult, FileTransfer, LoadPaths, LoadedFiles, ProjectFiles, SaveReceipt,
    SourceFile,
};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct FsFileTransfer {
    root: PathBuf,
}

impl FsFileTransfer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of `relative` under the root
    pub fn resolve(&self, relative: &str) -> CollabResult<PathBuf> {
        Ok(self.root.join(confine(relative)?))
    }
}

/// Normalize `relative` into a root-relative path, refusing anything that
/// would leave the root.
fn confine(relative: &str) -> CollabResult<PathBuf> {
    let invalid = || CollabError::InvalidPath(relative.to_string());

    let mut normalized = PathBuf::new();
    for component in Path::new(relative.trim()).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return Err(invalid());
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(invalid()),
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(invalid());
    }
    Ok(normalized)
}

fn display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[async_trait(?Send)]
impl FileTransfer for FsFileTransfer {
    async fn load_files(&self, paths: &LoadPaths) -> CollabResult<LoadedFiles> {
        let html_path = confine(&paths.html_path)?;
        let css_path = confine(&paths.css_path)?;
        let js_path = confine(&paths.js_path)?;

        let (html, css, js) = tokio::try_join!(
            fs::read_to_string(self.root.join(&html_path)),
            fs::read_to_string(self.root.join(&css_path)),
            fs::read_to_string(self.root.join(&js_path)),
        )?;

        let js_analysis = analyze_listeners(&js);
        info!(
            html = %html_path.display(),
            bytes = html.len() + css.len() + js.len(),
            listeners = js_analysis.len(),
            "loaded page files"
        );

        Ok(LoadedFiles {
            files: ProjectFiles {
                html: SourceFile::new(display(&html_path), html),
                css: SourceFile::new(display(&css_path), css),
                js: SourceFile::new(display(&js_path), js),
            },
            js_analysis,
        })
    }

    async fn save_files(&self, files: &ProjectFiles) -> CollabResult<SaveReceipt> {
        // Validate all three before writing any
        let html_path = self.resolve(&files.html.path)?;
        let css_path = self.resolve(&files.css.path)?;
        let js_path = self.resolve(&files.js.path)?;

        tokio::try_join!(
            fs::write(&html_path, &files.html.content),
            fs::write(&css_path, &files.css.content),
            fs::write(&js_path, &files.js.content),
        )?;

        debug!(root = %self.root.display(), "wrote page files");
        info!(html = %files.html.path, "saved page files");
        Ok(SaveReceipt { saved: true })
    }
}
