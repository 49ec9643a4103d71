//! In-memory sink.

use super::ArtifactSink;
use crate::error::{ConfigurationError, EmissionError};
use classforge_codegen::Artifact;

/// Collects artifacts in memory. Only finalized invocations are kept.
#[derive(Debug, Default)]
pub struct MemorySink {
    pending: Vec<Artifact>,
    artifacts: Vec<Artifact>,
    finalized: bool,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts of the last finalized invocation.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Returns true once an invocation has been finalized.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Consumes the sink, returning the finalized artifacts.
    #[must_use]
    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts
    }
}

impl ArtifactSink for MemorySink {
    fn prepare(&mut self) -> Result<(), ConfigurationError> {
        self.pending.clear();
        self.finalized = false;
        Ok(())
    }

    fn receive(&mut self, artifact: &Artifact) -> Result<(), EmissionError> {
        self.pending.push(artifact.clone());
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), EmissionError> {
        self.artifacts = std::mem::take(&mut self.pending);
        self.finalized = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(name: &str) -> Artifact {
        Artifact {
            type_name: name.to_string(),
            internal_name: name.to_string(),
            bytes: vec![0],
        }
    }

    #[test]
    fn test_collects_after_finalize() {
        let mut sink = MemorySink::new();
        sink.prepare().unwrap();
        sink.receive(&artifact("A")).unwrap();
        sink.receive(&artifact("B")).unwrap();
        assert!(sink.artifacts().is_empty());

        sink.finalize().unwrap();
        assert!(sink.is_finalized());
        let names: Vec<String> = sink.into_artifacts().into_iter().map(|a| a.type_name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_abort_discards_pending() {
        let mut sink = MemorySink::new();
        sink.prepare().unwrap();
        sink.receive(&artifact("A")).unwrap();
        sink.abort();
        assert!(!sink.is_finalized());
        assert!(sink.artifacts().is_empty());
    }
}
