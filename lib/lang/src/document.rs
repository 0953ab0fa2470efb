//! Input documents and training file discovery

use std::fs;
use std::path::{Path, PathBuf};

use globset::Glob;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{LangError, Result};
use crate::frontend::ParsedDocument;
use crate::registry::Language;
use crate::text::expand_tabs;

/// One source file: raw text, tab-expanded text and its parse
#[derive(Debug, Clone)]
pub struct InputDocument {
    pub file_name: String,
    pub raw: String,
    /// Text the front end saw, tabs expanded
    pub content: String,
    pub parsed: ParsedDocument,
}

impl InputDocument {
    pub fn from_source(file_name: impl Into<String>, raw: impl Into<String>, lang: &Language) -> Result<Self> {
        let raw = raw.into();
        let content = expand_tabs(&raw, lang.tab_size());
        let parsed = lang.front_end().parse(&content)?;
        Ok(Self {
            file_name: file_name.into(),
            raw,
            content,
            parsed,
        })
    }

    pub fn load(path: &Path, lang: &Language) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| LangError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(path.display().to_string(), raw, lang)
    }

    #[inline]
    pub fn real_count(&self) -> usize {
        self.parsed.real_count()
    }
}

/// Files under `dir` whose name matches `pattern`, sorted by path
pub fn discover_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Glob::new(pattern)?.compile_matcher();

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if matcher.is_match(entry.file_name()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    debug!("Discovered {} files matching {} under {:?}", files.len(), pattern, dir);
    Ok(files)
}
