//! Where asset text comes from. The parsers never touch the filesystem
//! directly; the orchestrator hands them a source so tests and alternative
//! transports can swap one in.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Text-fetching seam. `Sync` because material-library fetches for one
/// geometry file fan out across threads.
pub trait AssetSource: Sync {
    /// Fetch the full text of the asset at `path`.
    fn fetch_text(&self, path: &Path) -> Result<String>;
}

/// Plain filesystem source; paths are used as given.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSource;

impl AssetSource for FsSource {
    fn fetch_text(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read asset file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_its_path() {
        let err = FsSource.fetch_text(Path::new("no/such/file.obj")).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/file.obj"));
    }
}
