//! DOCX adapter.
//!
//! A DOCX file is a ZIP package; the body lives in `word/document.xml`,
//! style names in `word/styles.xml`, image relationships in
//! `word/_rels/document.xml.rels` and the title in `docProps/core.xml`.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::detect::SourceFormat;
use crate::error::{Error, Result};
use crate::model::Metadata;

use super::{DocumentSource, ImageHandle, SourceElement};

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const RELS_PART: &str = "word/_rels/document.xml.rels";
const CORE_PART: &str = "docProps/core.xml";

/// Built-in style names stored in lowercase, with their UI names.
const BUILTIN_STYLE_NAMES: &[(&str, &str)] = &[
    ("normal", "Normal"),
    ("title", "Title"),
    ("subtitle", "Subtitle"),
    ("caption", "Caption"),
    ("header", "Header"),
    ("footer", "Footer"),
    ("body text", "Body Text"),
    ("list paragraph", "List Paragraph"),
    ("list bullet", "List Bullet"),
    ("list number", "List Number"),
    ("toc heading", "TOC Heading"),
];

/// A DOCX document loaded into memory.
pub struct DocxSource {
    format: SourceFormat,
    elements: Vec<SourceElement>,
    media: HashMap<String, Vec<u8>>,
    title: Option<String>,
}

impl DocxSource {
    /// Open a DOCX file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Error::DocumentUnreadable(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(&data)
    }

    /// Parse a DOCX package from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let document_xml = read_part(&mut archive, DOCUMENT_PART)?
            .ok_or_else(|| Error::DocumentUnreadable(format!("missing {}", DOCUMENT_PART)))?;

        let styles = match read_part(&mut archive, STYLES_PART)? {
            Some(xml) => parse_styles(&xml)?,
            None => StyleTable::default(),
        };

        let relationships = match read_part(&mut archive, RELS_PART)? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        // The title is optional; a broken core part does not make the
        // document unreadable.
        let title = read_part(&mut archive, CORE_PART)
            .ok()
            .flatten()
            .and_then(|xml| parse_core_title(&xml));

        let paragraphs = parse_body(&document_xml)?;
        log::debug!("DOCX body: {} top-level paragraphs", paragraphs.len());

        let mut elements = Vec::with_capacity(paragraphs.len());
        let mut media = HashMap::new();

        for para in paragraphs {
            if let Some(embed) = para.picture {
                let handle = embed
                    .as_deref()
                    .and_then(|id| relationships.get(id))
                    .map(|part| ImageHandle::Part(part.clone()));

                if let Some(ImageHandle::Part(part)) = &handle {
                    if !media.contains_key(part) {
                        match read_binary_part(&mut archive, part) {
                            Ok(bytes) => {
                                media.insert(part.clone(), bytes);
                            }
                            Err(e) => log::warn!("Cannot read image part {}: {}", part, e),
                        }
                    }
                } else {
                    log::warn!("Image paragraph without resolvable relationship {:?}", embed);
                }

                elements.push(SourceElement::Picture { handle });
            } else {
                elements.push(SourceElement::Styled {
                    style: styles.name_for(para.style_id.as_deref()),
                    text: para.text,
                });
            }
        }

        Ok(Self {
            format: SourceFormat::Docx,
            elements,
            media,
            title,
        })
    }

    /// Number of embedded media parts loaded.
    pub fn media_count(&self) -> usize {
        self.media.len()
    }
}

impl DocumentSource for DocxSource {
    fn format(&self) -> &SourceFormat {
        &self.format
    }

    fn elements(&self) -> &[SourceElement] {
        &self.elements
    }

    fn image_bytes(&self, handle: &ImageHandle) -> Result<Vec<u8>> {
        match handle {
            ImageHandle::Part(part) => self
                .media
                .get(part)
                .cloned()
                .ok_or_else(|| Error::ImageDecode(format!("missing media part {}", part))),
            ImageHandle::Object(..) => Err(Error::ImageDecode(
                "PDF object handle in a DOCX document".into(),
            )),
        }
    }

    fn metadata(&self) -> Metadata {
        Metadata {
            title: self.title.clone(),
            format: self.format.name().to_string(),
            page_count: None,
        }
    }
}

/// A top-level `w:p` as read from the body.
#[derive(Debug, Default)]
struct RawParagraph {
    style_id: Option<String>,
    text: String,
    /// `Some` when the paragraph holds a picture; inner value is the
    /// first blip relationship id, if any.
    picture: Option<Option<String>>,
}

/// Read the direct `w:p` children of `w:body`.
fn parse_body(xml: &str) -> Result<Vec<RawParagraph>> {
    let mut reader = Reader::from_str(xml);

    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut current: Option<RawParagraph> = None;
    let mut para_depth = 0usize;
    let mut run_depth: Option<usize> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"body" if body_depth.is_none() => body_depth = Some(depth),
                    b"p" if current.is_none() && body_depth.map(|d| d + 1) == Some(depth) => {
                        current = Some(RawParagraph::default());
                        para_depth = depth;
                    }
                    b"t" if current.is_some() => in_text = true,
                    b"r" if current.is_some() && run_depth.is_none() => {
                        run_depth = Some(depth);
                    }
                    _ => {
                        if let Some(para) = current.as_mut() {
                            visit_paragraph_child(para, e, run_depth.is_some());
                        }
                    }
                }
                depth += 1;
            }
            Event::Empty(ref e) => {
                if let Some(para) = current.as_mut() {
                    visit_paragraph_child(para, e, run_depth.is_some());
                }
            }
            Event::Text(ref e) => {
                if in_text {
                    if let Some(para) = current.as_mut() {
                        para.text.push_str(&e.unescape()?);
                    }
                }
            }
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"r" if run_depth == Some(depth) => run_depth = None,
                    b"p" if current.is_some() && depth == para_depth => {
                        if let Some(para) = current.take() {
                            paragraphs.push(para);
                        }
                    }
                    b"body" if body_depth == Some(depth) => break,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

/// Record what a descendant element of a paragraph contributes.
///
/// Tabs and breaks only count inside a run; `w:pPr/w:tabs/w:tab` are
/// tab-stop definitions.
fn visit_paragraph_child(para: &mut RawParagraph, e: &BytesStart, in_run: bool) {
    match e.local_name().as_ref() {
        b"pStyle" => {
            if para.style_id.is_none() {
                para.style_id = get_attribute(e, "val");
            }
        }
        b"tab" if in_run => para.text.push('\t'),
        b"br" | b"cr" if in_run => para.text.push('\n'),
        b"pic" => {
            if para.picture.is_none() {
                para.picture = Some(None);
            }
        }
        b"blip" => {
            if let Some(slot) = para.picture.as_mut() {
                if slot.is_none() {
                    *slot = get_attribute(e, "embed");
                }
            }
        }
        _ => {}
    }
}

/// Style id to display name lookup.
#[derive(Debug, Default)]
struct StyleTable {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleTable {
    fn name_for(&self, style_id: Option<&str>) -> String {
        style_id
            .and_then(|id| self.names.get(id))
            .or(self.default_paragraph.as_ref())
            .cloned()
            .unwrap_or_else(|| "Normal".to_string())
    }
}

fn parse_styles(xml: &str) -> Result<StyleTable> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut table = StyleTable::default();
    // (style id, is the default paragraph style)
    let mut current: Option<(String, bool)> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"style" => {
                    current = get_attribute(e, "styleId").map(|id| {
                        let is_default = get_attribute(e, "type").as_deref() == Some("paragraph")
                            && matches!(get_attribute(e, "default").as_deref(), Some("1" | "true"));
                        (id, is_default)
                    });
                }
                b"name" => {
                    if let (Some((id, is_default)), Some(raw)) =
                        (current.as_ref(), get_attribute(e, "val"))
                    {
                        let name = ui_style_name(&raw);
                        if *is_default {
                            table.default_paragraph = Some(name.clone());
                        }
                        table.names.insert(id.clone(), name);
                    }
                }
                _ => {}
            },
            Event::End(ref e) => {
                if e.local_name().as_ref() == b"style" {
                    current = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(table)
}

/// Map a built-in lowercase style name to the name shown in Word.
fn ui_style_name(raw: &str) -> String {
    if let Some(level) = raw.strip_prefix("heading ") {
        if level.len() == 1 && level.chars().all(|c| c.is_ascii_digit()) {
            return format!("Heading {}", level);
        }
    }

    BUILTIN_STYLE_NAMES
        .iter()
        .find(|(internal, _)| *internal == raw)
        .map(|(_, ui)| ui.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Internal image relationships: id -> part name.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let is_image = get_attribute(e, "Type")
                    .map(|t| t.ends_with("/image"))
                    .unwrap_or(false);
                let is_external = get_attribute(e, "TargetMode").as_deref() == Some("External");
                if let (true, false, Some(id), Some(target)) = (
                    is_image,
                    is_external,
                    get_attribute(e, "Id"),
                    get_attribute(e, "Target"),
                ) {
                    rels.insert(id, resolve_part_name("word", &target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Resolve a relationship target against the source part's directory.
fn resolve_part_name(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn parse_core_title(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut in_title = false;
    let mut title = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"title" {
                    in_title = true;
                }
            }
            Ok(Event::End(ref e)) => {
                if e.local_name().as_ref() == b"title" {
                    in_title = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_title {
                    title = e.unescape().ok().map(|t| t.trim().to_string());
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    title.filter(|t| !t.is_empty())
}

/// Read a text part, `None` if the package has no such entry.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut content = String::new();
            file.read_to_string(&mut content)
                .map_err(|e| Error::DocumentUnreadable(format!("{}: {}", name, e)))?;
            Ok(Some(content))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn read_binary_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Vec<u8>> {
    let mut file = archive.by_name(name)?;
    let mut data = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut data)?;
    Ok(data)
}

/// Helper to get an attribute value by local name.
fn get_attribute(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == name.as_bytes() {
            return attr.unescape_value().ok().map(|v| v.into_owned());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const W_NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#;

    fn package(parts: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in parts {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document {}><w:body>{}<w:sectPr/></w:body></w:document>"#,
            W_NS, body
        )
    }

    #[test]
    fn test_parse_body_text_runs() {
        let xml = document(
            r#"<w:p><w:r><w:t xml:space="preserve">Hello </w:t></w:r><w:r><w:t>world</w:t><w:tab/><w:t>x</w:t></w:r></w:p>"#,
        );
        let paras = parse_body(&xml).unwrap();
        assert_eq!(paras.len(), 1);
        assert_eq!(paras[0].text, "Hello world\tx");
        assert!(paras[0].picture.is_none());
    }

    #[test]
    fn test_parse_body_skips_tables() {
        let xml = document(
            r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>After</w:t></w:r></w:p>"#,
        );
        let texts: Vec<_> = parse_body(&xml).unwrap().into_iter().map(|p| p.text).collect();
        assert_eq!(texts, vec!["Before", "After"]);
    }

    #[test]
    fn test_parse_body_picture() {
        let xml = document(
            r#"<w:p><w:r><w:t>caption</w:t><w:drawing><pic:pic><pic:blipFill><a:blip r:embed="rId7"/></pic:blipFill></pic:pic></w:drawing></w:r></w:p>"#,
        );
        let paras = parse_body(&xml).unwrap();
        assert_eq!(paras[0].picture, Some(Some("rId7".to_string())));
    }

    #[test]
    fn test_parse_body_tab_stops_are_not_text() {
        let xml = document(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr></w:p><w:p><w:pPr><w:tabs><w:tab w:val="center" w:pos="4320"/></w:tabs></w:pPr><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t></w:r></w:p>"#,
        );
        let paras = parse_body(&xml).unwrap();
        assert_eq!(paras[0].text, "");
        assert_eq!(paras[1].text, "a\tb");
    }

    #[test]
    fn test_style_resolution() {
        let xml = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
            <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
            <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style>
        </w:styles>"#;
        let table = parse_styles(xml).unwrap();
        assert_eq!(table.name_for(Some("Heading2")), "Heading 2");
        assert_eq!(table.name_for(Some("Title")), "Title");
        assert_eq!(table.name_for(Some("Missing")), "Normal");
        assert_eq!(table.name_for(None), "Normal");
        assert_eq!(StyleTable::default().name_for(None), "Normal");
    }

    #[test]
    fn test_relationships_only_internal_images() {
        let xml = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
            <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
            <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="http://example.com/a.png" TargetMode="External"/>
        </Relationships>"#;
        let rels = parse_relationships(xml).unwrap();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels["rId2"], "word/media/image1.png");
    }

    #[test]
    fn test_resolve_part_name() {
        assert_eq!(resolve_part_name("word", "media/a.png"), "word/media/a.png");
        assert_eq!(resolve_part_name("word", "../media/a.png"), "media/a.png");
        assert_eq!(resolve_part_name("word", "/word/media/a.png"), "word/media/a.png");
    }

    #[test]
    fn test_from_bytes_builds_elements() {
        let doc = document(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p><w:p><w:r><w:drawing><pic:pic><a:blip r:embed="rId2"/></pic:pic></w:drawing></w:r></w:p><w:p><w:r><w:t>Body</w:t></w:r></w:p>"#,
        );
        let styles = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style></w:styles>"#;
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/></Relationships>"#;
        let core = r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Report</dc:title></cp:coreProperties>"#;

        let data = package(&[
            ("word/document.xml", doc.as_bytes()),
            ("word/styles.xml", styles.as_bytes()),
            ("word/_rels/document.xml.rels", rels.as_bytes()),
            ("docProps/core.xml", core.as_bytes()),
            ("word/media/image1.png", b"not really a png"),
        ]);

        let source = DocxSource::from_bytes(&data).unwrap();
        assert_eq!(source.elements().len(), 3);
        assert_eq!(
            source.elements()[0],
            SourceElement::Styled {
                style: "Heading 1".into(),
                text: "Title".into()
            }
        );
        let handle = ImageHandle::Part("word/media/image1.png".into());
        assert_eq!(
            source.elements()[1],
            SourceElement::Picture {
                handle: Some(handle.clone())
            }
        );
        assert_eq!(source.image_bytes(&handle).unwrap(), b"not really a png");
        assert_eq!(source.metadata().title.as_deref(), Some("Report"));
        assert_eq!(source.media_count(), 1);
    }

    #[test]
    fn test_missing_document_part() {
        let data = package(&[("docProps/core.xml", b"<x/>")]);
        let result = DocxSource::from_bytes(&data);
        assert!(matches!(result, Err(Error::DocumentUnreadable(_))));
    }

    #[test]
    fn test_not_a_zip() {
        let result = DocxSource::from_bytes(b"plain text");
        assert!(matches!(result, Err(Error::DocumentUnreadable(_))));
    }
}
