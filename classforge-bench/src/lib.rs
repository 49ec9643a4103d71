//! # classforge Bench
//!
//! Benchmarking utilities for classforge performance testing.
//!
//! This crate provides:
//! - Synthetic schema fixtures of configurable width and depth
//! - Helpers shared by the criterion benches

pub mod fixtures;

pub use fixtures::{nested_schema, wide_schema};

/// Compiles a fixture in memory and returns the total class-file size.
///
/// # Errors
/// Returns the compile error if the fixture is rejected.
pub fn compiled_size(schema: &serde_json::Value) -> Result<usize, classforge::CompileError> {
    let mut sink = classforge::MemorySink::new();
    classforge::Compiler::default().compile_value(schema, &mut sink)?;
    Ok(sink.artifacts().iter().map(|a| a.bytes.len()).sum())
}
