//! PDF adapter.
//!
//! Reads text spans and image draws from page content streams, groups
//! spans into lines and lines into blocks, and orders blocks and images
//! top-to-bottom (then left-to-right) on each page.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Encoding, Object, ObjectId, Stream};

use crate::detect::SourceFormat;
use crate::error::{Error, Result};
use crate::model::Metadata;

use super::{DocumentSource, ImageHandle, SourceElement};

/// Word-gap threshold in TJ adjustments (thousandths of text space).
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.5;

/// Resource inheritance is followed at most this many parents up.
const MAX_PARENT_DEPTH: usize = 16;

/// A PDF document with its body flattened into source elements.
pub struct PdfSource {
    format: SourceFormat,
    doc: LopdfDocument,
    elements: Vec<SourceElement>,
    title: Option<String>,
    page_count: u32,
}

impl PdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path.as_ref())?;
        Self::from_document(doc)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            log::warn!("PDF is encrypted; text may not decode");
        }

        let pages = doc.get_pages();
        let page_count = pages.len() as u32;
        let mut elements = Vec::new();

        for (page_num, page_id) in pages {
            match page_elements(&doc, page_id) {
                Ok(page) => {
                    log::debug!("Page {}: {} elements", page_num, page.len());
                    elements.extend(page);
                }
                Err(e) => log::warn!("Skipping page {}: {}", page_num, e),
            }
        }

        let title = info_title(&doc);
        let format = SourceFormat::Pdf {
            version: doc.version.to_string(),
        };

        Ok(Self {
            format,
            doc,
            elements,
            title,
            page_count,
        })
    }
}

impl DocumentSource for PdfSource {
    fn format(&self) -> &SourceFormat {
        &self.format
    }

    fn elements(&self) -> &[SourceElement] {
        &self.elements
    }

    fn image_bytes(&self, handle: &ImageHandle) -> Result<Vec<u8>> {
        let id = match handle {
            ImageHandle::Object(num, gen) => (*num, *gen),
            ImageHandle::Part(part) => {
                return Err(Error::ImageDecode(format!(
                    "package part {} in a PDF document",
                    part
                )))
            }
        };

        let stream = self
            .doc
            .get_object(id)
            .and_then(Object::as_stream)
            .map_err(|e| Error::ImageDecode(format!("object {} {}: {}", id.0, id.1, e)))?;

        encode_image_stream(&self.doc, stream)
    }

    fn metadata(&self) -> Metadata {
        Metadata {
            title: self.title.clone(),
            format: self.format.name().to_string(),
            page_count: Some(self.page_count),
        }
    }
}

/// A text span with position and size information.
#[derive(Debug, Clone)]
struct TextSpan {
    text: String,
    /// X position (left edge)
    x: f32,
    /// Y position (baseline)
    y: f32,
    /// Estimated width
    width: f32,
    /// Effective font size in points
    font_size: f32,
}

/// Spans sharing a baseline, sorted by X.
#[derive(Debug, Clone)]
struct TextLine {
    spans: Vec<TextSpan>,
    y: f32,
    x: f32,
    font_size: f32,
}

impl TextLine {
    fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        let font_size = weighted_font_size(&spans);
        let y = spans.first().map_or(0.0, |s| s.y);
        let x = spans.first().map_or(0.0, |s| s.x);

        Self {
            spans,
            y,
            x,
            font_size,
        }
    }

    /// Combined text, with spaces inserted at visible gaps.
    fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - (prev.x + prev.width);
                let threshold = span.font_size * GLYPH_ADVANCE * 0.2;

                let spaceless = matches!(
                    (prev.text.chars().last(), span.text.chars().next()),
                    (Some(a), Some(b)) if is_spaceless_script_char(a) && is_spaceless_script_char(b)
                );
                let has_space = prev.text.ends_with([' ', '\u{00A0}'])
                    || span.text.starts_with([' ', '\u{00A0}']);

                if gap > threshold && !spaceless && !has_space {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }

        result
    }

    fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }
}

/// A drawn image XObject.
#[derive(Debug, Clone)]
struct ImageDraw {
    id: ObjectId,
    x: f32,
    top: f32,
}

/// Everything found on one page.
#[derive(Debug, Default)]
struct PageScan {
    spans: Vec<TextSpan>,
    images: Vec<ImageDraw>,
}

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        Some(Self {
            a: get_number(&operands[0])?,
            b: get_number(&operands[1])?,
            c: get_number(&operands[2])?,
            d: get_number(&operands[3])?,
            e: get_number(&operands[4])?,
            f: get_number(&operands[5])?,
        })
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`: apply `self` first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

/// Text object state (text matrix, line matrix, leading).
#[derive(Debug, Clone, Default)]
struct TextState {
    tm: Matrix,
    tlm: Matrix,
    leading: f32,
}

impl TextState {
    fn begin(&mut self) {
        self.tm = Matrix::IDENTITY;
        self.tlm = Matrix::IDENTITY;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }

    fn set_matrix(&mut self, m: Matrix) {
        self.tlm = m;
        self.tm = m;
    }

    fn next_line(&mut self, font_size: f32) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    fn advance(&mut self, tx: f32) {
        self.tm = Matrix::translation(tx, 0.0).then(&self.tm);
    }
}

/// Page content scanner.
struct PageScanner<'a> {
    encodings: HashMap<Vec<u8>, Encoding<'a>>,
    xobjects: HashMap<Vec<u8>, ObjectId>,
}

impl<'a> PageScanner<'a> {
    fn new(doc: &'a LopdfDocument, page_id: ObjectId) -> Result<Self> {
        let mut encodings = HashMap::new();
        for (name, font) in doc.get_page_fonts(page_id)? {
            match font.get_font_encoding(doc) {
                Ok(enc) => {
                    encodings.insert(name, enc);
                }
                Err(e) => log::debug!(
                    "No encoding for font {}: {}",
                    String::from_utf8_lossy(&name),
                    e
                ),
            }
        }

        Ok(Self {
            encodings,
            xobjects: page_image_xobjects(doc, page_id),
        })
    }

    fn decode(&self, font: &[u8], bytes: &[u8]) -> String {
        match self.encodings.get(font) {
            Some(enc) => {
                LopdfDocument::decode_text(enc, bytes).unwrap_or_else(|_| decode_text_simple(bytes))
            }
            None => decode_text_simple(bytes),
        }
    }

    /// Decode a TJ array, turning large negative adjustments into spaces.
    fn decode_array(&self, font: &[u8], items: &[Object]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode(font, bytes)),
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = -get_number(item).unwrap_or(0.0);
                    let needs_space = adjustment > TJ_SPACE_THRESHOLD
                        && !combined.ends_with([' ', '\u{00A0}'])
                        && combined
                            .chars()
                            .last()
                            .is_some_and(|c| !is_spaceless_script_char(c));
                    if needs_space {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        combined
    }

    fn scan(&self, content: &[u8]) -> Result<PageScan> {
        let content = lopdf::content::Content::decode(content)?;

        let mut scan = PageScan::default();
        let mut ctm = Matrix::IDENTITY;
        let mut ctm_stack: Vec<Matrix> = Vec::new();
        let mut text = TextState::default();
        let mut font_name: Vec<u8> = Vec::new();
        let mut font_size: f32 = 12.0;
        let mut in_text_block = false;

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => ctm_stack.push(ctm),
                "Q" => ctm = ctm_stack.pop().unwrap_or(Matrix::IDENTITY),
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        ctm = m.then(&ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    text.begin();
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if operands.len() >= 2 {
                        if let Object::Name(name) = &operands[0] {
                            font_name = name.clone();
                        }
                        font_size = get_number(&operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number) {
                        text.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if operands.len() >= 2 {
                        let tx = get_number(&operands[0]).unwrap_or(0.0);
                        let ty = get_number(&operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            text.leading = -ty;
                        }
                        text.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        text.set_matrix(m);
                    }
                }
                "T*" => text.next_line(font_size),
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "'" || op.operator == "\"" {
                        text.next_line(font_size);
                    }
                    if !in_text_block {
                        continue;
                    }

                    let shown = match (op.operator.as_str(), operands.as_slice()) {
                        ("TJ", [Object::Array(items), ..]) => self.decode_array(&font_name, items),
                        ("Tj" | "'", [Object::String(bytes, _), ..]) => {
                            self.decode(&font_name, bytes)
                        }
                        ("\"", [_, _, Object::String(bytes, _), ..]) => {
                            self.decode(&font_name, bytes)
                        }
                        _ => String::new(),
                    };

                    let advance = shown.chars().count() as f32 * font_size * GLYPH_ADVANCE;
                    if !shown.trim().is_empty() {
                        let device = text.tm.then(&ctm);
                        let (x, y) = device.apply(0.0, 0.0);
                        scan.spans.push(TextSpan {
                            text: shown,
                            x,
                            y,
                            width: advance * device.horizontal_scale(),
                            font_size: font_size * device.vertical_scale(),
                        });
                    }
                    text.advance(advance);
                }
                "Do" => {
                    let id = match operands.first() {
                        Some(Object::Name(name)) => self.xobjects.get(name).copied(),
                        _ => None,
                    };
                    if let Some(id) = id {
                        scan.images.push(image_draw(id, &ctm));
                    }
                }
                _ => {}
            }
        }

        Ok(scan)
    }
}

/// Position of an image drawn with the given CTM (unit square mapped).
fn image_draw(id: ObjectId, ctm: &Matrix) -> ImageDraw {
    let corners = [
        ctm.apply(0.0, 0.0),
        ctm.apply(1.0, 0.0),
        ctm.apply(0.0, 1.0),
        ctm.apply(1.0, 1.0),
    ];
    let x = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min);
    let top = corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max);
    ImageDraw { id, x, top }
}

/// Build the ordered elements of one page.
fn page_elements(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<SourceElement>> {
    let scanner = PageScanner::new(doc, page_id)?;
    let content = page_content(doc, page_id)?;
    let scan = scanner.scan(&content)?;

    // (top, x, element)
    let mut items: Vec<(f32, f32, SourceElement)> = Vec::new();

    for block in group_lines_into_blocks(group_spans_into_lines(scan.spans)) {
        let Some(first) = block.first() else {
            continue;
        };
        let top = first.top();
        let x = block
            .iter()
            .map(|l| l.x)
            .fold(f32::INFINITY, f32::min);
        let spans: Vec<TextSpan> = block.iter().flat_map(|l| l.spans.clone()).collect();
        let font_size = weighted_font_size(&spans);
        let lines = block.iter().map(TextLine::text).collect();
        items.push((top, x, SourceElement::Sized { font_size, lines }));
    }

    for draw in scan.images {
        items.push((
            draw.top,
            draw.x,
            SourceElement::Picture {
                handle: Some(ImageHandle::Object(draw.id.0, draw.id.1)),
            },
        ));
    }

    // PDF y grows upward: top-to-bottom is descending y.
    items.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    });

    Ok(items.into_iter().map(|(_, _, element)| element).collect())
}

/// Group spans into lines by baseline.
fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Group lines into blocks on spacing, font-size or indent breaks.
fn group_lines_into_blocks(lines: Vec<TextLine>) -> Vec<Vec<TextLine>> {
    let avg_spacing = average_line_spacing(&lines);
    let mut blocks: Vec<Vec<TextLine>> = Vec::new();

    for line in lines {
        let starts_block = match blocks.last().and_then(|b| b.last()) {
            Some(prev) => should_break_block(prev, &line, avg_spacing),
            None => true,
        };
        match blocks.last_mut() {
            Some(block) if !starts_block => block.push(line),
            _ => blocks.push(vec![line]),
        }
    }

    blocks
}

fn average_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev: &TextLine, curr: &TextLine, avg_spacing: f32) -> bool {
    let spacing = (prev.y - curr.y).abs();
    spacing > avg_spacing * 1.5
        || (prev.font_size - curr.font_size).abs() > 1.0
        || (prev.x - curr.x).abs() > 20.0
}

/// Character-weighted average font size.
fn weighted_font_size(spans: &[TextSpan]) -> f32 {
    let total_chars: usize = spans.iter().map(|s| s.text.chars().count()).sum();
    if total_chars == 0 {
        return spans.first().map_or(0.0, |s| s.font_size);
    }
    let weighted: f32 = spans
        .iter()
        .map(|s| s.font_size * s.text.chars().count() as f32)
        .sum();
    weighted / total_chars as f32
}

/// Get page content stream.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc.get_dictionary(page_id)?;
    let contents = page_dict.get(b"Contents")?;

    match contents {
        Object::Reference(r) => match doc.get_object(*r)? {
            Object::Stream(s) => Ok(s.decompressed_content().unwrap_or_else(|_| s.content.clone())),
            Object::Array(arr) => Ok(concat_streams(doc, arr)),
            _ => Err(Error::DocumentUnreadable("invalid content stream".into())),
        },
        Object::Array(arr) => Ok(concat_streams(doc, arr)),
        _ => Err(Error::DocumentUnreadable("invalid content stream".into())),
    }
}

fn concat_streams(doc: &LopdfDocument, refs: &[Object]) -> Vec<u8> {
    let mut content = Vec::new();
    for obj in refs {
        if let Ok(r) = obj.as_reference() {
            if let Ok(Object::Stream(s)) = doc.get_object(r) {
                if let Ok(data) = s.decompressed_content() {
                    content.extend_from_slice(&data);
                    content.push(b' ');
                }
            }
        }
    }
    content
}

/// Image XObjects reachable from a page's (possibly inherited) resources.
fn page_image_xobjects(doc: &LopdfDocument, page_id: ObjectId) -> HashMap<Vec<u8>, ObjectId> {
    let mut result = HashMap::new();

    let Some(xobjects) = page_resources(doc, page_id)
        .and_then(|res| res.get(b"XObject").ok())
        .and_then(|obj| resolve_dict(doc, obj))
    else {
        return result;
    };

    for (name, obj) in xobjects.iter() {
        let Ok(id) = obj.as_reference() else {
            continue;
        };
        let is_image = doc
            .get_object(id)
            .and_then(Object::as_stream)
            .ok()
            .and_then(|s| s.dict.get(b"Subtype").ok())
            .and_then(|s| s.as_name().ok())
            .is_some_and(|s| s == b"Image");
        if is_image {
            result.insert(name.clone(), id);
        }
    }

    result
}

/// Resources dictionary of a page, walking up `Parent` links if needed.
fn page_resources(doc: &LopdfDocument, page_id: ObjectId) -> Option<&Dictionary> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PARENT_DEPTH {
        if let Some(res) = node.get(b"Resources").ok().and_then(|o| resolve_dict(doc, o)) {
            return Some(res);
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn resolve_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(r) => doc.get_dictionary(*r).ok(),
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(r) => doc.get_object(*r).unwrap_or(obj),
        _ => obj,
    }
}

/// Turn an image XObject into bytes of a standard raster file.
///
/// JPEG streams pass through unchanged; 8-bit gray or RGB samples are
/// re-encoded as PNG.
fn encode_image_stream(doc: &LopdfDocument, stream: &Stream) -> Result<Vec<u8>> {
    let dict = &stream.dict;
    let filters = stream_filters(doc, dict);

    if filters.iter().any(|f| f == "DCTDecode") {
        if filters.len() == 1 {
            return Ok(stream.content.clone());
        }
        return Err(Error::ImageDecode(format!(
            "unsupported filter chain {:?}",
            filters
        )));
    }

    if let Some(other) = filters.iter().find(|f| *f != "FlateDecode") {
        return Err(Error::ImageDecode(format!("unsupported filter {}", other)));
    }

    let samples = if filters.is_empty() {
        stream.content.clone()
    } else {
        stream
            .decompressed_content()
            .map_err(|e| Error::ImageDecode(e.to_string()))?
    };

    let dimension = |key: &[u8]| -> Result<u32> {
        dict.get(key)
            .ok()
            .map(|o| resolve(doc, o))
            .and_then(|o| o.as_i64().ok())
            .filter(|v| *v > 0)
            .map(|v| v as u32)
            .ok_or_else(|| {
                Error::ImageDecode(format!("missing {}", String::from_utf8_lossy(key)))
            })
    };
    let width = dimension(b"Width")?;
    let height = dimension(b"Height")?;

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|b| b.as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        return Err(Error::ImageDecode(format!("{} bits per component", bits)));
    }

    let components = color_components(doc, dict)?;
    let expected = width as usize * height as usize * components;
    if samples.len() < expected {
        return Err(Error::ImageDecode(format!(
            "expected {} sample bytes, found {}",
            expected,
            samples.len()
        )));
    }
    let samples = samples[..expected].to_vec();

    let image = match components {
        1 => image::GrayImage::from_raw(width, height, samples).map(image::DynamicImage::ImageLuma8),
        _ => image::RgbImage::from_raw(width, height, samples).map(image::DynamicImage::ImageRgb8),
    }
    .ok_or_else(|| Error::ImageDecode("sample buffer too small".into()))?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| Error::ImageDecode(e.to_string()))?;
    Ok(png)
}

/// Filter names of a stream, outermost first.
fn stream_filters(doc: &LopdfDocument, dict: &Dictionary) -> Vec<String> {
    let Ok(filter) = dict.get(b"Filter") else {
        return Vec::new();
    };

    match resolve(doc, filter) {
        Object::Name(name) => vec![String::from_utf8_lossy(name).to_string()],
        Object::Array(arr) => arr
            .iter()
            .filter_map(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .collect(),
        _ => Vec::new(),
    }
}

/// Number of color components for DeviceGray, DeviceRGB or ICCBased spaces.
fn color_components(doc: &LopdfDocument, dict: &Dictionary) -> Result<usize> {
    let cs = dict
        .get(b"ColorSpace")
        .map(|o| resolve(doc, o))
        .map_err(|_| Error::ImageDecode("missing ColorSpace".into()))?;

    let unsupported = |name: &[u8]| {
        Error::ImageDecode(format!(
            "unsupported color space {}",
            String::from_utf8_lossy(name)
        ))
    };

    match cs {
        Object::Name(name) => match name.as_slice() {
            b"DeviceGray" => Ok(1),
            b"DeviceRGB" => Ok(3),
            other => Err(unsupported(other)),
        },
        Object::Array(arr) => match arr.first().and_then(|o| o.as_name().ok()) {
            Some(b"ICCBased") => {
                let n = arr
                    .get(1)
                    .map(|o| resolve(doc, o))
                    .and_then(|o| o.as_stream().ok())
                    .and_then(|s| s.dict.get(b"N").ok())
                    .and_then(|n| n.as_i64().ok());
                match n {
                    Some(1) => Ok(1),
                    Some(3) => Ok(3),
                    _ => Err(Error::ImageDecode("unsupported ICC component count".into())),
                }
            }
            Some(other) => Err(unsupported(other)),
            None => Err(unsupported(b"[]")),
        },
        _ => Err(Error::ImageDecode("invalid ColorSpace".into())),
    }
}

/// Document title from the Info dictionary.
fn info_title(doc: &LopdfDocument) -> Option<String> {
    let info = doc.trailer.get(b"Info").ok()?;
    let dict = resolve_dict(doc, info)?;
    match dict.get(b"Title").ok()? {
        Object::String(bytes, _) => {
            Some(decode_text_simple(bytes).trim().to_string()).filter(|t| !t.is_empty())
        }
        _ => None,
    }
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if a character is from a script that doesn't use word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2EBEF
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x3000..=0x303F)
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
