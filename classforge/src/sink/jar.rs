//! Jar archive output.

use super::ArtifactSink;
use crate::error::{ConfigurationError, EmissionError};
use classforge_codegen::Artifact;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Manifest entry name.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Manifest written first in every archive.
pub const MANIFEST: &str = "Manifest-Version: 1.0\r\nCreated-By: classforge\r\n\r\n";

/// Packs all classes of one invocation into a jar.
///
/// Classes are buffered until [`ArtifactSink::finalize`], which writes the
/// archive in one pass. Entries carry a fixed timestamp so identical input
/// produces an identical archive. An existing file is never overwritten.
#[derive(Debug)]
pub struct JarSink {
    path: PathBuf,
    entries: Vec<(String, Vec<u8>)>,
}

impl JarSink {
    /// Creates a sink writing to `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            entries: Vec::new(),
        }
    }

    /// Returns the archive path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_archive(&self, file: File) -> Result<(), EmissionError> {
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        zip.start_file(MANIFEST_PATH, options)?;
        zip.write_all(MANIFEST.as_bytes())
            .map_err(|e| EmissionError::io(&self.path, e))?;
        for (name, bytes) in &self.entries {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(bytes).map_err(|e| EmissionError::io(&self.path, e))?;
        }

        let mut out = zip.finish()?;
        out.flush().map_err(|e| EmissionError::io(&self.path, e))?;
        Ok(())
    }
}

impl ArtifactSink for JarSink {
    fn prepare(&mut self) -> Result<(), ConfigurationError> {
        if self.path.exists() {
            return Err(ConfigurationError::OutputExists {
                path: self.path.clone(),
            });
        }
        self.entries.clear();
        Ok(())
    }

    fn receive(&mut self, artifact: &Artifact) -> Result<(), EmissionError> {
        self.entries
            .push((artifact.resource_path(), artifact.bytes.clone()));
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), EmissionError> {
        let file = File::create_new(&self.path).map_err(|e| EmissionError::io(&self.path, e))?;
        if let Err(e) = self.write_archive(file) {
            if let Err(remove) = std::fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %remove, "failed to remove partial archive");
            }
            return Err(e);
        }
        tracing::info!(
            path = %self.path.display(),
            classes = self.entries.len(),
            "jar written"
        );
        self.entries.clear();
        Ok(())
    }

    fn abort(&mut self) {
        self.entries.clear();
    }
}
