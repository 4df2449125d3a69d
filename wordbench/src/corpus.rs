use std::fs;
use std::path::Path;
use tracing::{debug, info, trace};

use crate::errors::{SearchError, SearchResult};

/// File read from each document directory unless configured otherwise
pub const DEFAULT_DOCUMENT_FILE: &str = "merged.txt";

/// One text of the corpus. Its content never changes after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    content: Box<[u8]>,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into().into_boxed_slice(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// The ordered, read-only document set searched in one run.
///
/// Order does not affect counts but fixes which documents land in which
/// partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Loads one document per subdirectory of `root`.
    ///
    /// Each subdirectory `D` contributes the contents of `D/<file_name>` under
    /// the name `D`. Plain files directly under `root` are skipped. Documents
    /// are sorted by name; `limit` keeps only the first `limit` of them.
    ///
    /// Any unreadable directory or document aborts the load.
    pub fn load(root: &Path, file_name: &str, limit: Option<usize>) -> SearchResult<Self> {
        info!("Loading corpus from {}", root.display());

        let entries = fs::read_dir(root).map_err(|e| SearchError::from_io(root, e))?;
        let mut directories = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SearchError::from_io(root, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| SearchError::from_io(entry.path(), e))?;
            if file_type.is_dir() {
                directories.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
            } else {
                trace!("Skipping non-directory entry: {}", entry.path().display());
            }
        }
        directories.sort_by(|a, b| a.0.cmp(&b.0));
        if let Some(limit) = limit {
            directories.truncate(limit);
        }

        let mut documents = Vec::with_capacity(directories.len());
        for (name, dir) in directories {
            let path = dir.join(file_name);
            let content = fs::read(&path).map_err(|e| SearchError::from_io(&path, e))?;
            trace!("Loaded {} ({} bytes)", path.display(), content.len());
            documents.push(Document::new(name, content));
        }

        let corpus = Self::from_documents(documents);
        debug!(
            "Loaded {} documents, {} bytes total",
            corpus.len(),
            corpus.total_bytes()
        );
        Ok(corpus)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.documents.iter().map(Document::len).sum()
    }
}
