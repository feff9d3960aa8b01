use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::snippet::Snippet;
use crate::types::{Error, Result};

/// File-backed snippet collection: one JSON file per snippet
///
/// A snippet's filename is its title with spaces replaced by underscores,
/// plus a `.json` extension.
pub struct SnippetStore {
    dir: PathBuf,
}

impl SnippetStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every snippet file in the store directory
    pub fn load_all(&self) -> Result<Vec<Snippet>> {
        let mut snippets = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                snippets.push(Self::load_file(&path)?);
            }
        }
        snippets.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(snippets)
    }

    /// All snippet titles, sorted
    pub fn titles(&self) -> Result<Vec<String>> {
        Ok(self.load_all()?.into_iter().map(|s| s.title).collect())
    }

    /// Resolve a title to a snippet
    pub fn find(&self, title: &str) -> Result<Snippet> {
        let path = self.path_for(title);
        if path.exists() {
            let snippet = Self::load_file(&path)?;
            if snippet.title == title {
                return Ok(snippet);
            }
        }

        // fall back to scanning for files whose name does not match the
        // derived filename (e.g. hand-renamed snippets)
        self.load_all()?
            .into_iter()
            .find(|s| s.title == title)
            .ok_or_else(|| Error::SnippetNotFound {
                title: title.to_string(),
            })
    }

    /// Serialize a snippet into the store, recording its storage location
    pub fn save(&self, snippet: &mut Snippet) -> Result<()> {
        snippet.validate()?;
        let path = self.path_for(&snippet.title);
        let data = serde_json::to_string_pretty(snippet)?;
        fs::write(&path, data)?;
        snippet.set_file_location(path.clone());

        info!(title = %snippet.title, path = %path.display(), "snippet saved");
        Ok(())
    }

    /// Delete a snippet's file from the store
    pub fn remove(&self, title: &str) -> Result<()> {
        // resolve through find() so hand-renamed files are removed too
        let snippet = self.find(title)?;
        let path = snippet
            .file_location()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.path_for(title));
        fs::remove_file(&path)?;

        info!(title = %title, path = %path.display(), "snippet removed");
        Ok(())
    }

    fn load_file(path: &Path) -> Result<Snippet> {
        debug!(path = %path.display(), "loading snippet file");
        let content = fs::read_to_string(path)?;
        let mut snippet: Snippet = serde_json::from_str(&content)?;
        snippet.validate()?;
        snippet.set_file_location(path.to_path_buf());
        Ok(snippet)
    }

    fn path_for(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{}.json", title.replace(' ', "_")))
    }
}
