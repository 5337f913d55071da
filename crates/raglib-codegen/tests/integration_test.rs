//! Integration tests for raglib-codegen
//!
//! These tests drive the generators from a real registry and patch
//! realistic documents end to end.

use raglib_codegen::{
    Anchor, CatalogGenerator, ExampleScriptGenerator, PatchOutcome, SectionPatcher,
    SectionRenderer, insert_section,
};
use raglib_core::config::{CatalogConfig, DocsConfig, ScriptsConfig, TechniqueSpec};
use raglib_introspector::{CatalogSnapshot, TechniqueIntrospector};
use raglib_registry::{TechniqueRegistry, register_manifest};
use regex::Regex;

fn spec(name: &str, category: &str, identifier: &str) -> TechniqueSpec {
    TechniqueSpec {
        name: name.to_string(),
        category: category.to_string(),
        description: format!("{identifier} technique"),
        version: "1.0.0".to_string(),
        dependencies: vec![],
        identifier: identifier.to_string(),
        module: format!("raglib::techniques::{name}"),
        parameters: vec!["chunk_size".to_string()],
        docs: None,
    }
}

fn snapshot() -> CatalogSnapshot {
    let registry = TechniqueRegistry::new();
    register_manifest(
        &registry,
        &[
            spec("bm25", "retrieval", "Bm25"),
            spec("fixed_size_chunker", "chunking", "FixedSizeChunker"),
            spec("parent_document_chunker", "chunking", "ParentDocumentChunker"),
        ],
    )
    .unwrap();
    CatalogSnapshot::capture(
        &registry,
        &TechniqueIntrospector::new(),
        &CatalogConfig::default().category_order,
    )
}

fn section_patcher(config: &DocsConfig, index: usize) -> SectionPatcher {
    let target = &config.patches[index];
    let mut patcher = SectionPatcher::new(Anchor::sentinel(&target.name));
    if let (Some(start), Some(stop)) = (&target.start, &target.stop) {
        patcher = patcher.with_fallback(Anchor::heading(start, stop).unwrap());
    }
    patcher
}

/// Tests that the catalog lists chunking before retrieval
#[test]
fn test_catalog_orders_preferred_categories_first() {
    let generator = CatalogGenerator::new(CatalogConfig::default()).unwrap();
    let markdown = generator.render(&snapshot()).unwrap();

    let chunking = markdown.find("## Chunking").unwrap();
    let retrieval = markdown.find("## Retrieval").unwrap();
    assert!(chunking < retrieval);
    assert!(markdown.contains("**Total Techniques:** 3"));
    assert!(markdown.contains("**Categories:** 2"));

    let fixed = markdown.find("### fixed_size_chunker").unwrap();
    let parent = markdown.find("### parent_document_chunker").unwrap();
    assert!(fixed < parent);
}

/// Tests patching the techniques document through the default heading anchor
#[test]
fn test_techniques_doc_patched_via_heading_fallback() {
    let config = DocsConfig::default();
    let renderer = SectionRenderer::new().unwrap();
    let body = renderer.technique_list(snapshot().category("chunking")).unwrap();

    let document = "# Techniques\n\n### Chunking Techniques\n\n#### Stale\n- old\n\n### Retrieval Techniques\n\nBM25 and friends.\n";
    let patcher = section_patcher(&config, 0);

    let PatchOutcome::Replaced(patched) = patcher.apply(document, &body) else {
        panic!("expected replacement");
    };
    assert!(patched.starts_with(
        "# Techniques\n\n### Chunking Techniques\n\
         <!-- raglib:begin chunking-techniques -->\n#### FixedSizeChunker\n"
    ));
    assert!(patched.ends_with(
        "\n<!-- raglib:end chunking-techniques -->\n\
         ### Retrieval Techniques\n\nBM25 and friends.\n"
    ));
    assert!(!patched.contains("Stale"));

    assert_eq!(patcher.apply(&patched, &body), PatchOutcome::Unchanged);
}

/// Tests the README list keeps the following heading intact
#[test]
fn test_readme_section_round_trip() {
    let config = DocsConfig::default();
    let renderer = SectionRenderer::new().unwrap();
    let body = renderer.readme_list(snapshot().category("chunking")).unwrap();

    let readme = "# RAGLib\n\n### 🔨 Document Processing\n- **Old**: gone\n\n### 🔍 Retrieval\n- **BM25**: keyword search\n";
    let patched = section_patcher(&config, 1)
        .apply(readme, &body)
        .into_document()
        .unwrap();

    assert_eq!(
        patched,
        "# RAGLib\n\n### 🔨 Document Processing\n\
         <!-- raglib:begin document-processing -->\n\
         - **Fixed Size Chunking**: FixedSizeChunker technique\n\
         - **Parent-Document Chunking**: ParentDocumentChunker technique\n\
         \n\
         <!-- raglib:end document-processing -->\n\
         ### 🔍 Retrieval\n- **BM25**: keyword search\n"
    );
}

/// Tests that documents without anchors are reported, not modified
#[test]
fn test_missing_anchor_reports_skip() {
    let config = DocsConfig::default();
    let outcome = section_patcher(&config, 0).apply("# Unrelated\n\nText.\n", "body");
    assert!(outcome.is_skipped());
}

/// Tests that the guide is inserted once
#[test]
fn test_guide_insertion_is_idempotent() {
    let config = DocsConfig::default();
    let renderer = SectionRenderer::new().unwrap();
    let section = renderer
        .guide(
            &config.guide.heading,
            &config.guide.category,
            &config.scripts.registration_fn,
            snapshot().category("chunking"),
        )
        .unwrap();
    let before = Regex::new(&config.guide.insert_before).unwrap();

    let guide = "# Getting Started\n\n### 1. Basic Usage\n\n```rust\nlet x = 1;\n```\n\n### 2. Using the CLI\n\nRun it.\n";
    let patched = insert_section(guide, &config.guide.heading, &before, &section)
        .into_document()
        .unwrap();

    assert!(patched.contains("```\n\n### 2. Advanced Chunking Techniques\n"));
    assert!(patched.contains("|\n\n### 2. Using the CLI\n"));
    assert_eq!(
        insert_section(&patched, &config.guide.heading, &before, &section),
        PatchOutcome::Unchanged
    );
}

/// Tests that generated programs parse and cover every technique
#[test]
fn test_generated_programs_parse() {
    let config = DocsConfig::default();
    let generator =
        ExampleScriptGenerator::new(&ScriptsConfig::default(), config.showcase.overrides).unwrap();
    let snapshot = snapshot();
    let chunking = snapshot.category("chunking");

    let benchmark = generator
        .benchmark("chunking", chunking, "examples/chunking_benchmark_results_auto.json")
        .unwrap();
    let showcase = generator.showcase("chunking", chunking).unwrap();

    for script in [&benchmark, &showcase] {
        assert_eq!(script.technique_count, 2);
        assert!(syn::parse_file(&script.source).is_ok());
        assert!(script.source.contains(r#""fixed_size_chunker""#));
        assert!(script.source.contains(r#""parent_document_chunker""#));
    }
    assert!(showcase.source.contains(r#".with("chunk_size", 200i64)"#));
}
