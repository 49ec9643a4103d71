//! Loose class files under a class path root.

use super::ArtifactSink;
use crate::error::{ConfigurationError, EmissionError};
use classforge_codegen::Artifact;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Writes `<root>/<package path>/<Type>.class`, replacing existing files.
///
/// Replaced files keep their previous contents until the invocation
/// finishes, so an aborted invocation restores them.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    written: Vec<PathBuf>,
    replaced: HashMap<PathBuf, Vec<u8>>,
}

impl DirectorySink {
    /// Creates a sink rooted at `root`. Missing directories are created on write.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            written: Vec::new(),
            replaced: HashMap::new(),
        }
    }

    /// Returns the class path root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files written by the current invocation.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ArtifactSink for DirectorySink {
    fn prepare(&mut self) -> Result<(), ConfigurationError> {
        if self.root.exists() && !self.root.is_dir() {
            return Err(ConfigurationError::NotADirectory {
                path: self.root.clone(),
            });
        }
        self.written.clear();
        self.replaced.clear();
        Ok(())
    }

    fn receive(&mut self, artifact: &Artifact) -> Result<(), EmissionError> {
        let path = self.root.join(artifact.resource_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| EmissionError::io(parent, e))?;
        }
        match fs::read(&path) {
            Ok(previous) => {
                self.replaced.entry(path.clone()).or_insert(previous);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(EmissionError::io(&path, e)),
        }
        fs::write(&path, &artifact.bytes).map_err(|e| EmissionError::io(&path, e))?;
        tracing::debug!(path = %path.display(), bytes = artifact.bytes.len(), "class written");
        self.written.push(path);
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), EmissionError> {
        tracing::info!(
            root = %self.root.display(),
            classes = self.written.len(),
            "class files written"
        );
        self.replaced.clear();
        Ok(())
    }

    fn abort(&mut self) {
        for path in self.written.drain(..) {
            let result = match self.replaced.remove(&path) {
                Some(previous) => fs::write(&path, previous),
                None => fs::remove_file(&path),
            };
            if let Err(e) = result {
                tracing::warn!(path = %path.display(), error = %e, "failed to roll back class file");
            }
        }
        self.replaced.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(internal_name: &str) -> Artifact {
        Artifact {
            type_name: internal_name.replace('/', "."),
            internal_name: internal_name.to_string(),
            bytes: vec![0xCA, 0xFE, 0xBA, 0xBE],
        }
    }

    #[test]
    fn test_writes_package_tree() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("classes"));

        sink.prepare().unwrap();
        sink.receive(&artifact("com/example/Person")).unwrap();
        sink.finalize().unwrap();

        let written = dir.path().join("classes/com/example/Person.class");
        assert_eq!(fs::read(&written).unwrap(), vec![0xCA, 0xFE, 0xBA, 0xBE]);
        assert_eq!(sink.written(), &[written]);
    }

    #[test]
    fn test_prepare_rejects_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taken");
        fs::write(&file, b"x").unwrap();

        let mut sink = DirectorySink::new(&file);
        assert!(matches!(
            sink.prepare(),
            Err(ConfigurationError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_abort_removes_written_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());

        sink.prepare().unwrap();
        sink.receive(&artifact("Person")).unwrap();
        sink.receive(&artifact("Person_address")).unwrap();
        sink.abort();

        assert!(!dir.path().join("Person.class").exists());
        assert!(!dir.path().join("Person_address.class").exists());
        assert!(sink.written().is_empty());
    }

    #[test]
    fn test_abort_restores_replaced_files() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("Person.class");
        fs::write(&existing, b"previous").unwrap();

        let mut sink = DirectorySink::new(dir.path());
        sink.prepare().unwrap();
        sink.receive(&artifact("Person")).unwrap();
        sink.receive(&artifact("Person_address")).unwrap();
        assert_eq!(fs::read(&existing).unwrap(), vec![0xCA, 0xFE, 0xBA, 0xBE]);
        sink.abort();

        assert_eq!(fs::read(&existing).unwrap(), b"previous");
        assert!(!dir.path().join("Person_address.class").exists());
    }

    #[test]
    fn test_finalize_keeps_replacements() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("Person.class");
        fs::write(&existing, b"previous").unwrap();

        let mut sink = DirectorySink::new(dir.path());
        sink.prepare().unwrap();
        sink.receive(&artifact("Person")).unwrap();
        sink.finalize().unwrap();

        assert_eq!(fs::read(&existing).unwrap(), vec![0xCA, 0xFE, 0xBA, 0xBE]);
    }
}
