//! End-to-end post-processing flows over a project tree.

use std::sync::Arc;

use atelier_engines::{CapabilityId, EngineRegistry};
use atelier_project::{Directory, FileContent, FileType, Node, Project, SourceFile};
use atelier_workbench::Workbench;

fn module_bytes() -> Vec<u8> {
    wat::parse_str(
        r#"(module
             (func $add (export "add") (param i32 i32) (result i32)
               local.get 0
               local.get 1
               i32.add))"#,
    )
    .unwrap()
}

fn with_scratch_section(mut module: Vec<u8>) -> Vec<u8> {
    let name = b"scratch";
    let mut body = vec![name.len() as u8];
    body.extend_from_slice(name);
    body.extend_from_slice(&[0xaa; 24]);
    module.push(0);
    module.push(body.len() as u8);
    module.extend_from_slice(&body);
    module
}

fn project_with(module: Vec<u8>) -> Project {
    let mut project = Project::new("demo");
    let mut out = Directory::new("out");
    out.push(Node::File(SourceFile::binary(
        "a.wasm",
        FileType::Wasm,
        module,
    )));
    project.root.push(Node::Directory(out));
    project
}

fn workbench() -> Workbench {
    Workbench::new(Arc::new(EngineRegistry::with_defaults()))
}

#[tokio::test]
async fn disassemble_creates_a_readable_sibling() {
    let mut project = project_with(module_bytes());
    let bench = workbench();

    let name = bench.disassemble(&mut project, "out/a.wasm").await.unwrap();
    assert_eq!(name, "a.wasm.wat");

    let sibling = project.find_file("out/a.wasm.wat").unwrap();
    let text = sibling.content.as_text().unwrap();
    assert!(text.contains("(func"));
    assert!(text.contains("i32.add"));
    assert!(sibling
        .description
        .as_deref()
        .unwrap()
        .contains("wat toolkit"));
    assert!(bench.engines().is_ready(CapabilityId::ModuleText));
}

#[tokio::test]
async fn rerunning_an_operation_replaces_the_sibling() {
    let mut project = project_with(module_bytes());
    let bench = workbench();

    bench.disassemble(&mut project, "out/a.wasm").await.unwrap();
    bench.disassemble(&mut project, "out/a.wasm").await.unwrap();

    let out = project.root.dir("out").unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out.children()[0].name(), "a.wasm");
    assert_eq!(out.children()[1].name(), "a.wasm.wat");
}

#[tokio::test]
async fn assembling_a_disassembly_round_trips() {
    let mut project = project_with(module_bytes());
    let bench = workbench();

    bench.disassemble(&mut project, "out/a.wasm").await.unwrap();
    let assembled = bench
        .assemble(&mut project, "out/a.wasm.wat")
        .await
        .unwrap();
    assert_eq!(assembled, "a.wasm.wat.wasm");
    bench
        .validate(&project, "out/a.wasm.wat.wasm")
        .await
        .unwrap();

    // Structural comparison: the re-disassembly must match the first one,
    // symbolic names included.
    let first = project
        .find_file("out/a.wasm.wat")
        .unwrap()
        .content
        .as_text()
        .unwrap()
        .to_string();
    assert!(first.contains("$add"));
    bench
        .disassemble(&mut project, "out/a.wasm.wat.wasm")
        .await
        .unwrap();
    let second = project
        .find_file("out/a.wasm.wat.wasm.wat")
        .unwrap()
        .content
        .as_text()
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn convert_emits_a_script_without_touching_the_source() {
    let original = module_bytes();
    let mut project = project_with(original.clone());
    let bench = workbench();

    let name = bench.convert(&mut project, "out/a.wasm").await.unwrap();
    assert_eq!(name, "a.wasm.js");

    let script = project
        .find_file("out/a.wasm.js")
        .unwrap()
        .content
        .as_text()
        .unwrap();
    assert!(script.contains("export const add"));
    assert!(script.contains("WebAssembly.instantiate"));

    let source = project.find_file("out/a.wasm").unwrap();
    assert_eq!(source.content.as_bytes(), original.as_slice());
}

#[tokio::test]
async fn optimize_rewrites_the_source_in_place() {
    let noisy = with_scratch_section(module_bytes());
    let mut project = project_with(noisy.clone());
    let bench = workbench();

    bench.optimize(&mut project, "out/a.wasm").await.unwrap();

    let file = project.find_file("out/a.wasm").unwrap();
    let FileContent::Binary(optimized) = &file.content else {
        panic!("optimized module should stay binary");
    };
    assert!(optimized.len() < noisy.len());
    bench.validate(&project, "out/a.wasm").await.unwrap();

    // In place: no sibling appears.
    assert_eq!(project.root.dir("out").unwrap().len(), 1);
}

#[tokio::test]
async fn render_markdown_supports_tables() {
    let bench = workbench();
    let html = bench
        .render_markdown("# Title\n\n| a | b |\n|---|---|\n| 1 | 2 |")
        .await
        .unwrap();
    assert!(html.contains("<h1>Title</h1>"));
    assert!(html.contains("<table>"));
}

#[tokio::test]
async fn capabilities_activate_independently() {
    let mut project = project_with(module_bytes());
    let bench = workbench();

    bench.disassemble(&mut project, "out/a.wasm").await.unwrap();
    bench.convert(&mut project, "out/a.wasm").await.unwrap();

    assert!(bench.engines().is_ready(CapabilityId::ModuleText));
    assert!(bench.engines().is_ready(CapabilityId::ModuleOpt));
    assert!(!bench.engines().is_ready(CapabilityId::Markdown));
}
