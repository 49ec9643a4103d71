//! Human-readable class file summaries.

use classforge_core::ClassFile;
use classforge_core::reader::{BootstrapArgument, Member};
use std::fmt::Write;

/// Renders a summary of a class file.
///
/// Lists the version, the class and super class, fields with their
/// annotations, methods with their code sizes, and bootstrap methods with
/// their static arguments.
///
/// # Errors
/// Returns an error if the bytes are not a well-formed class file.
pub fn summarize(bytes: &[u8]) -> anyhow::Result<String> {
    let class = ClassFile::parse(bytes)?;
    let mut out = String::new();

    writeln!(out, "class {}", class.this_class())?;
    writeln!(out, "  version: {}.{}", class.major_version, class.minor_version)?;
    writeln!(out, "  flags: 0x{:04x}", class.access_flags)?;
    writeln!(out, "  super: {}", class.super_class().unwrap_or("-"))?;

    writeln!(out, "fields ({})", class.fields.len())?;
    for field in &class.fields {
        writeln!(out, "  {}", member_line(field))?;
        for annotation in class.annotations(field)? {
            writeln!(out, "    @{} {:?}", annotation.type_descriptor, annotation.elements)?;
        }
    }

    writeln!(out, "methods ({})", class.methods.len())?;
    for method in &class.methods {
        match class.code(method)? {
            Some(code) => writeln!(
                out,
                "  {} [stack={}, locals={}, code={}]",
                member_line(method),
                code.max_stack,
                code.max_locals,
                code.bytes.len()
            )?,
            None => writeln!(out, "  {}", member_line(method))?,
        }
    }

    let bootstrap = class.bootstrap_methods()?;
    if !bootstrap.is_empty() {
        writeln!(out, "bootstrap methods ({})", bootstrap.len())?;
        for (index, entry) in bootstrap.iter().enumerate() {
            writeln!(
                out,
                "  #{index} {:?} {}.{}{}",
                entry.kind, entry.method.owner, entry.method.name, entry.method.descriptor
            )?;
            for argument in &entry.arguments {
                writeln!(out, "    {}", argument_text(argument))?;
            }
        }
    }

    Ok(out)
}

fn member_line(member: &Member) -> String {
    format!(
        "0x{:04x} {} {}",
        member.access_flags, member.name, member.descriptor
    )
}

fn argument_text(argument: &BootstrapArgument) -> String {
    match argument {
        // recipe tags are control characters
        BootstrapArgument::String(s) => format!("{:?}", s),
        BootstrapArgument::Integer(i) => i.to_string(),
        BootstrapArgument::Class(c) => format!("class {c}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classforge::prelude::*;

    fn person_class() -> Vec<u8> {
        let json = r#"{
            "title": "Person",
            "properties": {"name": {"type": "string"}, "age": {"type": "integer"}}
        }"#;
        let mut sink = MemorySink::new();
        Compiler::default().compile_str(json, &mut sink).unwrap();
        sink.into_artifacts().remove(0).bytes
    }

    #[test]
    fn test_summary_lists_members() {
        let summary = summarize(&person_class()).unwrap();

        assert!(summary.starts_with("class Person\n"));
        assert!(summary.contains("version: 61.0"));
        assert!(summary.contains("super: java/lang/Record"));
        assert!(summary.contains("fields (2)"));
        assert!(summary.contains("0x0012 age Ljava/lang/Integer;"));
        assert!(summary.contains("@Lcom/fasterxml/jackson/annotation/JsonProperty;"));
        assert!(summary.contains("equals (Ljava/lang/Object;)Z"));
        assert!(summary.contains("toString ()Ljava/lang/String;"));
    }

    #[test]
    fn test_summary_shows_recipe() {
        let summary = summarize(&person_class()).unwrap();
        assert!(summary.contains("bootstrap methods (1)"));
        assert!(summary.contains("java/lang/invoke/StringConcatFactory.makeConcatWithConstants"));
        assert!(summary.contains(r#""Person[age=\u{1}, name=\u{1}]""#));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(summarize(&[0x00, 0x01, 0x02]).is_err());
    }
}
