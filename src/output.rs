//! output writer
//!
//! persists synthesized documents as one file per root field, grouped into
//! `queries/`, `mutations/`, and `subscriptions/`, plus an `index.json`
//! describing every file and its variables.

use crate::document::OperationDocument;
use crate::error::{Error, Result};
use crate::schema::OperationKind;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// name of the index written next to the operation directories
pub const INDEX_FILE: &str = "index.json";

/// index entry for one written document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub kind: OperationKind,
    pub name: String,
    /// path relative to the destination directory, `/` separated
    pub path: String,
    /// variable name to type text, in binding order
    pub variables: IndexMap<String, String>,
    pub has_arguments: bool,
}

/// contents of `index.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Index {
    pub operations: Vec<IndexEntry>,
}

impl Index {
    pub fn from_documents(documents: &[OperationDocument], extension: &str) -> Self {
        let operations = documents
            .iter()
            .map(|doc| IndexEntry {
                kind: doc.kind,
                name: doc.name.clone(),
                path: relative_path(doc.kind, &doc.name, extension),
                variables: doc.variable_types(),
                has_arguments: doc.has_arguments,
            })
            .collect();
        Self { operations }
    }
}

fn relative_path(kind: OperationKind, name: &str, extension: &str) -> String {
    format!("{}/{name}.{extension}", kind.directory())
}

/// write every document under `dest` and return the index path
///
/// only directories for kinds that produced documents are created.
pub fn write_documents(
    dest: &Path,
    documents: &[OperationDocument],
    extension: &str,
) -> Result<PathBuf> {
    let kinds: BTreeSet<OperationKind> = documents.iter().map(|doc| doc.kind).collect();
    for kind in &kinds {
        let dir = dest.join(kind.directory());
        fs::create_dir_all(&dir).map_err(|err| Error::io(&dir, err))?;
    }

    for doc in documents {
        let path = dest
            .join(doc.kind.directory())
            .join(format!("{}.{extension}", doc.name));
        fs::write(&path, format!("{}\n", doc.text)).map_err(|err| Error::io(&path, err))?;
        tracing::debug!("wrote {}", path.display());
    }

    let index = Index::from_documents(documents, extension);
    let index_path = dest.join(INDEX_FILE);
    let json = serde_json::to_string_pretty(&index)?;
    fs::write(&index_path, json).map_err(|err| Error::io(&index_path, err))?;

    tracing::info!(
        "wrote {} documents and {}",
        documents.len(),
        index_path.display()
    );
    Ok(index_path)
}
