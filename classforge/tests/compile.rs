//! End-to-end compilation tests.

use classforge::core::ClassFile;
use classforge::core::reader::BootstrapArgument;
use classforge::prelude::*;
use std::io::Read;

const PERSON: &str = r#"{
    "title": "Person",
    "properties": {
        "lastName": {"type": "string"},
        "firstName": {"type": "string"},
        "age": {"type": "integer"}
    }
}"#;

const ORDER: &str = r#"{
    "title": "order",
    "properties": {
        "id": {"type": "string", "format": "uuid"},
        "placed-at": {"type": "string", "format": "date-time"},
        "billing": {
            "type": "object",
            "title": "address",
            "properties": {"city": {"type": "string"}, "zip": {"type": "string"}}
        },
        "shipping": {
            "type": "object",
            "title": "address",
            "properties": {"city": {"type": "string"}, "zip": {"type": "string"}}
        },
        "customer": {
            "type": "object",
            "properties": {"name": {"type": "string"}}
        },
        "lines": {
            "type": "array",
            "items": {
                "type": "object",
                "properties": {"sku": {"type": "string"}, "quantity": {"type": "integer"}}
            }
        },
        "notes": {"type": "array"}
    }
}"#;

fn generate(json: &str, compiler: &Compiler) -> Vec<Artifact> {
    let mut sink = MemorySink::new();
    compiler.compile_str(json, &mut sink).unwrap();
    sink.into_artifacts()
}

fn parse(artifact: &Artifact) -> ClassFile {
    ClassFile::parse(&artifact.bytes).unwrap()
}

#[test]
fn test_output_is_deterministic() {
    let compiler = Compiler::builder().package_name("com.example").build().unwrap();
    let first = generate(ORDER, &compiler);
    let second = generate(ORDER, &compiler);
    assert_eq!(first, second);
}

#[test]
fn test_person_record() {
    let artifacts = generate(PERSON, &Compiler::default());
    assert_eq!(artifacts.len(), 1);
    let class = parse(&artifacts[0]);

    assert_eq!(class.major_version, 61);
    assert_eq!(class.this_class(), "Person");
    assert_eq!(class.super_class(), Some("java/lang/Record"));

    let fields: Vec<(&str, &str)> = class
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.descriptor.as_str()))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("age", "Ljava/lang/Integer;"),
            ("firstName", "Ljava/lang/String;"),
            ("lastName", "Ljava/lang/String;"),
        ]
    );

    assert!(
        class
            .method("<init>", "(Ljava/lang/Integer;Ljava/lang/String;Ljava/lang/String;)V")
            .is_some()
    );
    assert!(class.method("equals", "(Ljava/lang/Object;)Z").is_some());
    assert!(class.method("hashCode", "()I").is_some());
    assert!(class.method("toString", "()Ljava/lang/String;").is_some());

    let bootstrap = class.bootstrap_methods().unwrap();
    assert_eq!(
        bootstrap[0].arguments,
        vec![BootstrapArgument::String(
            "Person[age=\u{1}, firstName=\u{1}, lastName=\u{1}]".into()
        )]
    );
}

#[test]
fn test_nested_types_and_dedup() {
    let compiler = Compiler::builder().package_name("com.example").build().unwrap();
    let artifacts = generate(ORDER, &compiler);

    let names: Vec<&str> = artifacts.iter().map(|a| a.type_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "com.example.Order",
            "com.example.Address",
            "com.example.OrderCustomer",
            "com.example.OrderItem",
        ]
    );

    let order = parse(&artifacts[0]);
    let descriptor = |name: &str| order.field(name).unwrap().descriptor.clone();
    assert_eq!(descriptor("billing"), "Lcom/example/Address;");
    assert_eq!(descriptor("shipping"), "Lcom/example/Address;");
    assert_eq!(descriptor("customer"), "Lcom/example/OrderCustomer;");
    assert_eq!(descriptor("lines"), "[Lcom/example/OrderItem;");
    assert_eq!(descriptor("notes"), "[Ljava/lang/Object;");
    assert_eq!(descriptor("id"), "Ljava/util/UUID;");
    assert_eq!(descriptor("placedAt"), "Ljava/time/OffsetDateTime;");

    let item = parse(&artifacts[3]);
    assert_eq!(item.this_class(), "com/example/OrderItem");
    assert!(item.method("equals", "(Ljava/lang/Object;)Z").is_some());
}

#[test]
fn test_original_keys_are_annotated() {
    let artifacts = generate(ORDER, &Compiler::default());
    let order = parse(&artifacts[0]);

    let field = order.field("placedAt").unwrap();
    let annotations = order.annotations(field).unwrap();
    assert_eq!(annotations[0].string("value"), Some("placed-at"));

    let compiler = Compiler::builder().original_keys(false).build().unwrap();
    let order = parse(&generate(ORDER, &compiler)[0]);
    assert!(order.annotations(order.field("placedAt").unwrap()).unwrap().is_empty());
}

#[test]
fn test_duplicate_key_produces_nothing() {
    let json = r#"{"title": "Dup", "properties": {"a": {"type": "string"}, "a": {"type": "string"}}}"#;
    let mut sink = MemorySink::new();
    let err = Compiler::default().compile_str(json, &mut sink).unwrap_err();

    assert!(matches!(
        err,
        CompileError::Schema(SchemaError::DuplicateProperty { ref key, .. }) if key == "a"
    ));
    assert!(!sink.is_finalized());
    assert!(sink.artifacts().is_empty());
}

#[test]
fn test_accessor_clashing_with_hash_code_fails() {
    let json = r#"{"title": "Tally", "properties": {"hashCode": {"type": "integer"}}}"#;
    let compiler = Compiler::builder().primitive_values(true).build().unwrap();
    let mut sink = MemorySink::new();
    let err = compiler.compile_str(json, &mut sink).unwrap_err();

    assert!(matches!(
        err,
        CompileError::Emission(EmissionError::Codegen(CodegenError::ReservedMember { ref name, ref descriptor }))
            if name == "hashCode" && descriptor == "()I"
    ));
    assert!(!sink.is_finalized());
    assert!(sink.artifacts().is_empty());

    // boxed, the accessor returns Integer and no longer clashes
    let names = Compiler::default().compile_str(json, &mut MemorySink::new()).unwrap();
    assert_eq!(names, vec!["Tally"]);
}

#[test]
fn test_conflicting_nested_shapes_fail() {
    let json = r#"{
        "title": "Root",
        "properties": {
            "a": {"type": "object", "title": "Shared", "properties": {"x": {"type": "string"}}},
            "b": {"type": "object", "title": "Shared", "properties": {"y": {"type": "string"}}}
        }
    }"#;
    let err = Compiler::default().compile_str(json, &mut MemorySink::new()).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Schema(SchemaError::ConflictingDefinition { .. })
    ));
}

#[test]
fn test_jar_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.jar");
    let compiler = Compiler::builder().package_name("com.example").build().unwrap();

    let mut sink = sink_for_path(&path);
    compiler.compile_str(ORDER, &mut sink).unwrap();

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(archive.len(), 5);
    assert_eq!(archive.by_index(0).unwrap().name(), "META-INF/MANIFEST.MF");

    let mut bytes = Vec::new();
    archive
        .by_name("com/example/Order.class")
        .unwrap()
        .read_to_end(&mut bytes)
        .unwrap();
    assert_eq!(ClassFile::parse(&bytes).unwrap().this_class(), "com/example/Order");

    // a second run refuses to overwrite
    let mut sink = sink_for_path(&path);
    let err = compiler.compile_str(ORDER, &mut sink).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Configuration(ConfigurationError::OutputExists { .. })
    ));
}

#[test]
fn test_directory_output() {
    let dir = tempfile::tempdir().unwrap();
    let compiler = Compiler::builder().package_name("com.example").build().unwrap();

    let mut sink = DirectorySink::new(dir.path());
    let names = compiler.compile_str(PERSON, &mut sink).unwrap();
    assert_eq!(names, vec!["com.example.Person"]);

    let bytes = std::fs::read(dir.path().join("com/example/Person.class")).unwrap();
    assert_eq!(&bytes[..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
}

#[test]
fn test_failed_compile_leaves_no_directory_output() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"{"title": "Odd", "properties": {"toString": {"type": "string"}}}"#;

    let mut sink = DirectorySink::new(dir.path());
    let err = Compiler::default().compile_str(json, &mut sink).unwrap_err();

    assert!(matches!(
        err,
        CompileError::Emission(EmissionError::Codegen(CodegenError::ReservedMember { .. }))
    ));
    assert!(!dir.path().join("Odd.class").exists());
}
