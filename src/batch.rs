//! Extraction over many files at once.
//!
//! Every file gets its own stream, reader and builder, so workers share nothing but the config.

use crate::builder::{extract_path, Metadata};
use crate::config::{BatchConfig, Config};
use crate::error::{BatchError, Result};
use crate::source::ContainerKind;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct BatchItem {
    pub path: PathBuf,
    pub result: Result<Metadata>,
}

/// Collects the audio files under `root`, sorted by path. Files are kept when their extension is both
/// configured and recognized.
pub fn scan(root: &Path, config: &BatchConfig) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(config.follow_links)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| config.accepts_extension(ext) && ContainerKind::from_extension(ext).is_some())
        })
        .collect();
    paths.sort();
    paths
}

/// Extracts every path in parallel. Results come back in the order of `paths`.
pub fn extract_all(paths: &[PathBuf], config: &Config) -> std::result::Result<Vec<BatchItem>, BatchError> {
    let threads = config.batch.thread_count();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    let start = Instant::now();

    let items: Vec<BatchItem> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| BatchItem { path: path.clone(), result: extract_path(path, &config.extract) })
            .collect()
    });

    let failed = items.iter().filter(|item| item.result.is_err()).count();
    info!("Extracted {} files ({} failed) on {} threads in {:?}", items.len(), failed, threads, start.elapsed());
    Ok(items)
}
