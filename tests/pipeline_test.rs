//! End-to-end tests: source document -> nodes + images -> tree JSON.

mod common;

use std::collections::BTreeMap;

use common::{png_bytes, sample_docx, sample_pdf, write_file, DocxFixture};
use docpage::render::WidgetType;
use docpage::{
    build_output_tree, extract_structure, extract_structure_from_bytes,
    extract_structure_with_options,
    validate_tree_json, ContentNode, DistributionStrategy, DocPage, Error, ImageFormat,
    ParseOptions, RefId,
};

#[test]
fn test_docx_nodes_in_document_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "report.docx", &sample_docx());
    let options = ParseOptions::new().with_image_dir(dir.path().join("images"));

    let doc = extract_structure_with_options(&path, &options).unwrap();

    assert_eq!(
        doc.nodes,
        vec![
            ContentNode::heading(1, "Quarterly Report"),
            ContentNode::paragraph("Revenue grew in every region this quarter."),
            ContentNode::image(RefId::new(1)),
            ContentNode::heading(2, "Outlook"),
            ContentNode::paragraph("We expect steady demand."),
            ContentNode::paragraph("Hiring continues in the second half."),
        ]
    );
    assert_eq!(doc.metadata.title.as_deref(), Some("Quarterly Report"));
    assert_eq!(doc.metadata.format, "docx");
}

#[test]
fn test_docx_image_written_with_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "report.docx", &sample_docx());
    let image_dir = dir.path().join("images");
    let options = ParseOptions::new()
        .with_image_dir(&image_dir)
        .with_image_basename("report");

    let doc = extract_structure_with_options(&path, &options).unwrap();

    let asset = doc.get_image(RefId::new(1)).unwrap();
    assert_eq!((asset.width, asset.height), (4, 3));
    assert_eq!(asset.format, ImageFormat::Png);
    assert!(asset.stored_filename.ends_with("_report_001.png"));

    let written = std::fs::read(image_dir.join(&asset.stored_filename)).unwrap();
    assert_eq!(written, png_bytes(4, 3));
    assert!(doc.unresolved_images().is_empty());
}

#[test]
fn test_docx_missing_relationship_keeps_numbering() {
    let data = DocxFixture::new()
        .paragraph("Intro")
        .picture("rIdMissing")
        .picture("rId1")
        .media("rId1", png_bytes(2, 2))
        .build();
    let dir = tempfile::tempdir().unwrap();
    let options = ParseOptions::new().with_image_dir(dir.path());

    let doc = extract_structure_from_bytes(&data, &options).unwrap();

    assert_eq!(doc.image_node_count(), 2);
    assert!(doc.get_image(RefId::new(1)).is_none());
    assert!(doc.get_image(RefId::new(2)).is_some());
    assert_eq!(doc.unresolved_images(), vec![RefId::new(1)]);
}

#[test]
fn test_docx_corrupt_image_is_skipped() {
    let data = DocxFixture::new()
        .paragraph("Intro")
        .picture("rId1")
        .media("rId1", b"not an image".to_vec())
        .build();
    let dir = tempfile::tempdir().unwrap();
    let options = ParseOptions::new().with_image_dir(dir.path());

    let doc = extract_structure_from_bytes(&data, &options).unwrap();

    assert_eq!(doc.node_count(), 2);
    assert!(doc.images.is_empty());
}

#[test]
fn test_docx_blank_paragraphs_dropped() {
    let data = DocxFixture::new()
        .paragraph("   ")
        .heading("Heading1", "Only")
        .paragraph("")
        .build();
    let doc = extract_structure_from_bytes(&data, &ParseOptions::new().without_images()).unwrap();
    assert_eq!(doc.nodes, vec![ContentNode::heading(1, "Only")]);
}

#[test]
fn test_docx_without_content_is_empty() {
    let data = DocxFixture::new().paragraph("  ").build();
    let result = extract_structure_from_bytes(&data, &ParseOptions::new().without_images());
    assert!(matches!(result, Err(Error::EmptyDocument)));
}

#[test]
fn test_docx_picture_paragraph_drops_its_text() {
    let data = DocxFixture::new()
        .captioned_picture("Figure 1: regional revenue", "rId1")
        .paragraph("After")
        .media("rId1", png_bytes(2, 2))
        .build();
    let doc = extract_structure_from_bytes(&data, &ParseOptions::new().without_images()).unwrap();

    assert_eq!(
        doc.nodes,
        vec![
            ContentNode::image(RefId::new(1)),
            ContentNode::paragraph("After"),
        ]
    );
    assert!(doc
        .nodes
        .iter()
        .all(|n| n.text() != Some("Figure 1: regional revenue")));
}

#[test]
fn test_docx_extraction_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "report.docx", &sample_docx());

    let first = extract_structure_with_options(
        &path,
        &ParseOptions::new().with_image_dir(dir.path().join("run1")),
    )
    .unwrap();
    let second = extract_structure_with_options(
        &path,
        &ParseOptions::new().with_image_dir(dir.path().join("run2")),
    )
    .unwrap();

    assert_eq!(first.nodes, second.nodes);
    assert_eq!(
        first.images.keys().collect::<Vec<_>>(),
        second.images.keys().collect::<Vec<_>>()
    );
    let (a, b) = (&first.images[&RefId::new(1)], &second.images[&RefId::new(1)]);
    assert_eq!((a.width, a.height, &a.format), (b.width, b.height, &b.format));
}

#[test]
fn test_unknown_content_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "notes.txt", b"just some plain text");
    let result = extract_structure(&path);
    assert!(matches!(result, Err(Error::DocumentUnreadable(_))));

    let pdf = write_file(dir.path(), "odd.pdf", b"%PDF-x.y\nnot a version");
    let result = extract_structure(&pdf);
    assert!(matches!(result, Err(Error::DocumentUnreadable(msg)) if msg.contains("x.y")));
}

#[test]
fn test_pdf_nodes_follow_reading_order() {
    let dir = tempfile::tempdir().unwrap();
    let options = ParseOptions::new().with_image_dir(dir.path());

    let doc = extract_structure_from_bytes(&sample_pdf(), &options).unwrap();

    assert_eq!(
        doc.nodes,
        vec![
            ContentNode::heading(1, "Quarterly Report"),
            ContentNode::paragraph("Revenue grew in every region this quarter."),
            ContentNode::image(RefId::new(1)),
            ContentNode::paragraph("Thanks for reading."),
        ]
    );
    assert_eq!(doc.metadata.format, "pdf");
    assert_eq!(doc.metadata.page_count, Some(1));
    assert_eq!(doc.metadata.title.as_deref(), Some("Quarterly Report (PDF)"));
}

#[test]
fn test_pdf_raw_samples_reencoded_as_png() {
    let dir = tempfile::tempdir().unwrap();
    let options = ParseOptions::new().with_image_dir(dir.path());

    let doc = extract_structure_from_bytes(&sample_pdf(), &options).unwrap();

    let asset = doc.get_image(RefId::new(1)).unwrap();
    assert_eq!(asset.format, ImageFormat::Png);
    assert_eq!((asset.width, asset.height), (2, 2));

    let written = std::fs::read(dir.path().join(&asset.stored_filename)).unwrap();
    let decoded = image::load_from_memory(&written).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (2, 2));
}

#[test]
fn test_without_images_nothing_written() {
    let dir = tempfile::tempdir().unwrap();
    let image_dir = dir.path().join("images");
    let options = ParseOptions::new().with_image_dir(&image_dir).without_images();

    let doc = extract_structure_from_bytes(&sample_docx(), &options).unwrap();

    assert_eq!(doc.image_node_count(), 1);
    assert!(doc.images.is_empty());
    assert!(!image_dir.exists());
}

#[test]
fn test_tree_for_extracted_docx() {
    let dir = tempfile::tempdir().unwrap();
    let options = ParseOptions::new().with_image_dir(dir.path());
    let doc = extract_structure_from_bytes(&sample_docx(), &options).unwrap();

    let tree = build_output_tree(
        &doc.nodes,
        &doc.images,
        "two_columns_sidebar_right",
        DistributionStrategy::Auto,
        Some("https://cdn.example.com/uploads/"),
    );

    let section = &tree.content[0];
    assert_eq!(section.elements.len(), 2);
    // Title and intro land in the main (left) column.
    let main = &section.elements[0].elements;
    assert_eq!(main[0].widget_type, WidgetType::Heading);
    assert_eq!(main[0].heading_level(), Some(1));
    assert_eq!(main[1].widget_type, WidgetType::TextEditor);
    assert_eq!(tree.widget_count(), doc.node_count());

    let image = tree
        .widgets()
        .find(|w| w.widget_type == WidgetType::Image)
        .unwrap();
    let asset = doc.get_image(RefId::new(1)).unwrap();
    assert_eq!(
        image.image_url(),
        Some(format!("https://cdn.example.com/uploads/{}", asset.stored_filename).as_str())
    );
}

#[test]
fn test_docpage_convert_produces_valid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "report.docx", &sample_docx());

    let result = DocPage::new()
        .with_template("blog_article")
        .with_base_url("https://example.com/media")
        .with_image_dir(dir.path().join("images"))
        .with_stats()
        .convert(&path)
        .unwrap();

    let report = validate_tree_json(&result.content);
    assert!(report.is_valid(), "{:?}", report.errors);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.stats.widget_count, 6);
    assert_eq!(report.stats.widget_types["text-editor"], 3);

    let value: serde_json::Value = serde_json::from_str(&result.content).unwrap();
    assert_eq!(value["title"], "Quarterly Report");
    assert_eq!(value["content"][0]["settings"]["column_gap"], "30");

    let stats = result.stats.unwrap();
    assert_eq!(stats.layout.as_deref(), Some("blog_layout"));
    assert_eq!(stats.image_count, 1);
    assert_eq!(stats.resolved_image_count, 1);
}

#[test]
fn test_docpage_convert_pdf_bytes_placeholder_without_images() {
    let result = DocPage::new()
        .without_images()
        .with_title("Imported")
        .convert_bytes(&sample_pdf())
        .unwrap();

    assert_eq!(result.tree.title, "Imported");
    let image = result
        .tree
        .widgets()
        .find(|w| w.widget_type == WidgetType::Image)
        .unwrap();
    assert_eq!(image.image_url(), Some(""));
    assert_eq!(result.metadata().page_count, Some(1));
}

#[test]
fn test_empty_image_map_tree() {
    let nodes = vec![
        ContentNode::heading(1, "T"),
        ContentNode::image(RefId::new(3)),
    ];
    let tree = build_output_tree(
        &nodes,
        &BTreeMap::new(),
        "single_column",
        DistributionStrategy::Auto,
        Some("https://example.com"),
    );
    let image = tree.widgets().nth(1).unwrap();
    assert_eq!(image.image_url(), Some(""));
}
