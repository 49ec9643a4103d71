//! Artifact sinks.
//!
//! A sink receives the class files of one compile invocation in two
//! phases: [`ArtifactSink::prepare`] runs before any class is generated so
//! a sink can refuse its destination early, and [`ArtifactSink::finalize`]
//! runs once after the last class. When anything fails after `prepare`,
//! [`ArtifactSink::abort`] is called instead of `finalize`.

pub mod directory;
pub mod jar;
pub mod memory;

pub use directory::DirectorySink;
pub use jar::JarSink;
pub use memory::MemorySink;

use crate::error::{ConfigurationError, EmissionError};
use classforge_codegen::Artifact;
use std::path::Path;

/// Destination for generated class files.
pub trait ArtifactSink {
    /// Checks the destination before any output is produced.
    ///
    /// # Errors
    /// Returns [`ConfigurationError`] if the destination cannot be used.
    fn prepare(&mut self) -> Result<(), ConfigurationError>;

    /// Accepts one class file. Called once per schema, root first.
    ///
    /// # Arguments
    /// * `artifact` - Type name and class file bytes
    ///
    /// # Errors
    /// Returns [`EmissionError`] if the class cannot be stored.
    fn receive(&mut self, artifact: &Artifact) -> Result<(), EmissionError>;

    /// Completes the output after the last class.
    ///
    /// # Errors
    /// Returns [`EmissionError`] if the output cannot be completed.
    fn finalize(&mut self) -> Result<(), EmissionError>;

    /// Discards output of a failed invocation. Best effort.
    fn abort(&mut self) {}
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for &mut S {
    fn prepare(&mut self) -> Result<(), ConfigurationError> {
        (**self).prepare()
    }

    fn receive(&mut self, artifact: &Artifact) -> Result<(), EmissionError> {
        (**self).receive(artifact)
    }

    fn finalize(&mut self) -> Result<(), EmissionError> {
        (**self).finalize()
    }

    fn abort(&mut self) {
        (**self).abort();
    }
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for Box<S> {
    fn prepare(&mut self) -> Result<(), ConfigurationError> {
        (**self).prepare()
    }

    fn receive(&mut self, artifact: &Artifact) -> Result<(), EmissionError> {
        (**self).receive(artifact)
    }

    fn finalize(&mut self) -> Result<(), EmissionError> {
        (**self).finalize()
    }

    fn abort(&mut self) {
        (**self).abort();
    }
}

/// Picks a sink for an output path: a `.jar` suffix (any case) selects a
/// [`JarSink`], anything else a [`DirectorySink`].
#[must_use]
pub fn sink_for_path(path: &Path) -> Box<dyn ArtifactSink> {
    let is_jar = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jar"));
    if is_jar {
        Box::new(JarSink::new(path))
    } else {
        Box::new(DirectorySink::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_for_path_selects_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let jar = dir.path().join("out.JAR");
        let mut sink = sink_for_path(&jar);
        sink.prepare().unwrap();
        sink.finalize().unwrap();
        assert!(jar.is_file());

        let classes = dir.path().join("classes");
        let mut sink = sink_for_path(&classes);
        sink.prepare().unwrap();
        sink.finalize().unwrap();
        assert!(!classes.exists() || classes.is_dir());
    }
}
