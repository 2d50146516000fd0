//! Fixture builders shared by the integration tests.
//!
//! Documents are assembled in memory so the tests do not depend on any
//! binary files checked into the repository.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const W_NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/></Types>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style></w:styles>"#;

const IMAGE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// A PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([30, 120, 200]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

/// One body paragraph of a DOCX fixture.
pub enum Para<'a> {
    /// Paragraph with a style id (`None` for the default style)
    Text(Option<&'a str>, &'a str),
    /// Inline picture pointing at a relationship id
    Picture(&'a str),
    /// Text run followed by an inline picture in the same paragraph
    CaptionedPicture(&'a str, &'a str),
}

/// Builder for in-memory DOCX packages.
pub struct DocxFixture<'a> {
    body: Vec<Para<'a>>,
    title: Option<&'a str>,
    media: Vec<(&'a str, Vec<u8>)>,
}

impl<'a> DocxFixture<'a> {
    pub fn new() -> Self {
        Self {
            body: Vec::new(),
            title: None,
            media: Vec::new(),
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn heading(mut self, style: &'a str, text: &'a str) -> Self {
        self.body.push(Para::Text(Some(style), text));
        self
    }

    pub fn paragraph(mut self, text: &'a str) -> Self {
        self.body.push(Para::Text(None, text));
        self
    }

    /// Add a picture paragraph; `rel_id` must match a media entry to resolve.
    pub fn picture(mut self, rel_id: &'a str) -> Self {
        self.body.push(Para::Picture(rel_id));
        self
    }

    /// Add one paragraph holding both a caption run and a picture.
    pub fn captioned_picture(mut self, caption: &'a str, rel_id: &'a str) -> Self {
        self.body.push(Para::CaptionedPicture(caption, rel_id));
        self
    }

    /// Register `word/media/<name>` under relationship `rel_id`.
    pub fn media(mut self, rel_id: &'a str, data: Vec<u8>) -> Self {
        self.media.push((rel_id, data));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut body = String::new();
        for para in &self.body {
            match para {
                Para::Text(style, text) => {
                    body.push_str("<w:p>");
                    if let Some(style) = style {
                        body.push_str(&format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, style));
                    }
                    body.push_str(&format!(
                        r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                        text
                    ));
                }
                Para::Picture(rel_id) => body.push_str(&format!(
                    r#"<w:p><w:r><w:drawing><pic:pic><pic:blipFill><a:blip r:embed="{}"/></pic:blipFill></pic:pic></w:drawing></w:r></w:p>"#,
                    rel_id
                )),
                Para::CaptionedPicture(caption, rel_id) => body.push_str(&format!(
                    r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r><w:r><w:drawing><pic:pic><pic:blipFill><a:blip r:embed="{}"/></pic:blipFill></pic:pic></w:drawing></w:r></w:p>"#,
                    caption, rel_id
                )),
            }
        }
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document {}><w:body>{}<w:sectPr/></w:body></w:document>"#,
            W_NS, body
        );

        let mut rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (idx, (rel_id, _)) in self.media.iter().enumerate() {
            rels.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="media/image{}.png"/>"#,
                rel_id,
                IMAGE_REL,
                idx + 1
            ));
        }
        rels.push_str("</Relationships>");

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let mut add = |name: &str, data: &[u8]| {
            zip.start_file(name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        };

        add("[Content_Types].xml", CONTENT_TYPES.as_bytes());
        add("word/document.xml", document.as_bytes());
        add("word/styles.xml", STYLES.as_bytes());
        add("word/_rels/document.xml.rels", rels.as_bytes());
        if let Some(title) = self.title {
            let core = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>{}</dc:title></cp:coreProperties>"#,
                title
            );
            add("docProps/core.xml", core.as_bytes());
        }
        for (idx, (_, data)) in self.media.iter().enumerate() {
            add(&format!("word/media/image{}.png", idx + 1), data);
        }

        zip.finish().unwrap().into_inner()
    }

    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

/// A report-style DOCX: title, intro, picture, section heading, two paragraphs.
pub fn sample_docx() -> Vec<u8> {
    DocxFixture::new()
        .title("Quarterly Report")
        .heading("Title", "Quarterly Report")
        .paragraph("Revenue grew in every region this quarter.")
        .picture("rId10")
        .heading("Heading2", "Outlook")
        .paragraph("We expect steady demand.")
        .paragraph("Hiring continues in the second half.")
        .media("rId10", png_bytes(4, 3))
        .build()
}

/// A one-page PDF: 24pt title, a two-line 10pt paragraph, a 2x2 RGB image
/// and a closing 10pt paragraph, top to bottom.
pub fn sample_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let samples: Vec<u8> = [255u8, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255].to_vec();
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2,
            "Height" => 2,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        samples,
    ));

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
        "XObject" => dictionary! { "Im1" => image_id },
    });

    let text = |size: i64, x: i64, y: i64, lines: &[&str]| -> Vec<Operation> {
        let mut ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
        ];
        for (idx, line) in lines.iter().enumerate() {
            if idx > 0 {
                ops.push(Operation::new("Td", vec![0.into(), (-14).into()]));
            }
            ops.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        }
        ops.push(Operation::new("ET", vec![]));
        ops
    };

    let mut operations = Vec::new();
    operations.extend(text(24, 72, 750, &["Quarterly Report"]));
    operations.extend(text(
        10,
        72,
        700,
        &["Revenue grew in every", "region this quarter."],
    ));
    operations.extend(vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                100.into(),
                0.into(),
                0.into(),
                50.into(),
                72.into(),
                600.into(),
            ],
        ),
        Operation::new("Do", vec!["Im1".into()]),
        Operation::new("Q", vec![]),
    ]);
    operations.extend(text(10, 72, 560, &["Thanks for reading."]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Quarterly Report (PDF)"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}
