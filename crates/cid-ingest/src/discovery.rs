//! File discovery for DataSUS export folders.
//!
//! The official export ships one CSV per table, named after the table
//! (`CID-10-CAPITULOS.CSV`, `CID-10-GRUPOS.CSV`, ...). Files are picked by a
//! fragment of their name; the matching rule lives in [`find_file_by_fragment`]
//! so it can be exercised without touching the filesystem.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};
use crate::tables::TableKind;

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        // Check for .csv extension (case-insensitive)
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            files.push(path);
        }
    }

    // Sort by filename
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Outcome of matching a filename fragment against a set of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentMatch {
    Found(PathBuf),
    Missing,
    Ambiguous(Vec<PathBuf>),
}

/// Picks the file whose name contains `fragment` (case-insensitive).
///
/// A file with a name token (split on anything non-alphanumeric) equal to the
/// fragment wins over plain substring matches, so `CATEGORIAS` selects
/// `CID-10-CATEGORIAS.CSV` and not `CID-10-SUBCATEGORIAS.CSV`. For substring
/// matches, names containing one of the `shadowing` fragments are ignored.
pub fn find_file_by_fragment(
    files: &[PathBuf],
    fragment: &str,
    shadowing: &[&str],
) -> FragmentMatch {
    let fragment = fragment.to_uppercase();
    let shadowing: Vec<String> = shadowing.iter().map(|s| s.to_uppercase()).collect();

    let stems: Vec<(&PathBuf, String)> = files
        .iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .and_then(|v| v.to_str())
                .unwrap_or("")
                .to_uppercase();
            (path, stem)
        })
        .collect();

    let exact: Vec<PathBuf> = stems
        .iter()
        .filter(|(_, stem)| {
            stem.split(|c: char| !c.is_ascii_alphanumeric())
                .any(|token| token == fragment)
        })
        .map(|(path, _)| (*path).clone())
        .collect();
    if !exact.is_empty() {
        return single_or_ambiguous(exact);
    }

    let partial: Vec<PathBuf> = stems
        .iter()
        .filter(|(_, stem)| stem.contains(&fragment))
        .filter(|(_, stem)| !shadowing.iter().any(|other| stem.contains(other.as_str())))
        .map(|(path, _)| (*path).clone())
        .collect();
    single_or_ambiguous(partial)
}

fn single_or_ambiguous(mut matches: Vec<PathBuf>) -> FragmentMatch {
    match matches.len() {
        0 => FragmentMatch::Missing,
        1 => FragmentMatch::Found(matches.remove(0)),
        _ => FragmentMatch::Ambiguous(matches),
    }
}

/// Paths of the four official tables found in a DataSUS folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficialSources {
    pub chapters: PathBuf,
    pub blocks: PathBuf,
    pub categories: PathBuf,
    pub subcategories: PathBuf,
}

/// Locates the four official tables by filename fragment.
///
/// Fails if any fragment is missing or ambiguous.
pub fn discover_official_sources(dir: &Path) -> Result<OfficialSources> {
    let files = list_csv_files(dir)?;
    debug!(dir = %dir.display(), file_count = files.len(), "listing DataSUS folder");

    let locate = |kind: TableKind| -> Result<PathBuf> {
        let fragment = kind.fragment();
        let shadowing = kind.shadowing_fragments();
        match find_file_by_fragment(&files, fragment, &shadowing) {
            FragmentMatch::Found(path) => {
                debug!(table = %kind, path = %path.display(), "discovered table");
                Ok(path)
            }
            FragmentMatch::Missing => Err(IngestError::SourceNotFound {
                fragment: fragment.to_string(),
                dir: dir.to_path_buf(),
            }),
            FragmentMatch::Ambiguous(candidates) => Err(IngestError::AmbiguousSource {
                fragment: fragment.to_string(),
                candidates,
            }),
        }
    };

    Ok(OfficialSources {
        chapters: locate(TableKind::Chapters)?,
        blocks: locate(TableKind::Blocks)?,
        categories: locate(TableKind::Categories)?,
        subcategories: locate(TableKind::Subcategories)?,
    })
}
