use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use regex::Regex;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::ScanConfig,
    parser::{parse_source_with, SourceUnit},
    Error, InternalResult,
};

/// The search result for one file on disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub unit: SourceUnit,
}

/// Source files under `root`.
///
/// A file is returned as-is whatever its name. A directory is walked
/// recursively and only files whose name matches `config.source_pattern`
/// are kept. The result is sorted.
#[instrument(level = "debug", skip(config))]
pub fn collect_source_files(root: &Path, config: &ScanConfig) -> InternalResult<Vec<PathBuf>> {
    let metadata = fs::metadata(root)?;
    if metadata.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let source_pattern = Regex::new(&config.source_pattern)?;
    let root_text = root
        .to_str()
        .ok_or_else(|| Error::internal(format!("non UTF-8 path: {}", root.display())))?;
    let pattern = format!("{}/**/*", glob::Pattern::escape(root_text));

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| Error::Io(e.into_error()))?;
        if !path.is_file() {
            continue;
        }
        let is_source = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| source_pattern.is_match(name));
        if is_source {
            files.push(path);
        } else {
            debug!("Skipping {}", path.display());
        }
    }
    files.sort();

    info!("Found {} source files under {}", files.len(), root.display());
    Ok(files)
}

/// Reads, sanitizes and searches one file. Invalid UTF-8 is replaced.
#[instrument(level = "debug", skip(config))]
pub fn parse_file(path: &Path, config: &ScanConfig) -> InternalResult<ParsedFile> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let unit = parse_source_with(&text, &config.sanitizer);
    debug!(
        "Parsed {}: {} type definitions, {} diagnostics",
        path.display(),
        unit.type_definitions.len(),
        unit.diagnostics.len()
    );
    Ok(ParsedFile {
        path: path.to_path_buf(),
        unit,
    })
}

/// Parses every file on the blocking pool. A file that cannot be read is
/// logged and left out; the rest come back sorted by path.
pub async fn parse_files(paths: Vec<PathBuf>, config: &ScanConfig) -> Vec<ParsedFile> {
    let config = Arc::new(config.clone());
    let mut tasks = JoinSet::new();
    for path in paths {
        let config = Arc::clone(&config);
        tasks.spawn_blocking(move || {
            let result = parse_file(&path, &config);
            (path, result)
        });
    }

    let mut parsed = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(file))) => parsed.push(file),
            Ok((path, Err(e))) => warn!("Skipping {}: {}", path.display(), e),
            Err(e) => warn!("Parse task failed: {}", e),
        }
    }
    parsed.sort_by(|a, b| a.path.cmp(&b.path));

    info!("Parsed {} files", parsed.len());
    parsed
}
