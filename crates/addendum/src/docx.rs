// src/docx.rs
//
// Minimal WordprocessingML support: body paragraph text out of an existing
// package, and a small self-contained package out of an OutputDocument.

use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::clauses::ReferenceDocument;
use crate::document::{
    unencodable_char, Alignment, DocumentDefaults, OutputDocument, ParagraphSpec, TabAlignment,
    FIRST_LINE_INDENT_CM,
};
use crate::error::{AddendumError, AddendumResult};

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// A4 portrait, in twips.
const PAGE_WIDTH: i64 = 11906;
const PAGE_HEIGHT: i64 = 16838;

pub fn cm_to_twips(cm: f32) -> i64 {
    (f64::from(cm) * 1440.0 / 2.54).round() as i64
}

pub fn pt_to_twips(pt: f32) -> i64 {
    (f64::from(pt) * 20.0).round() as i64
}

pub fn pt_to_half_points(pt: f32) -> i64 {
    (f64::from(pt) * 2.0).round() as i64
}

/// Line spacing multiple in 240ths of a line.
pub fn line_to_240ths(multiple: f32) -> i64 {
    (f64::from(multiple) * 240.0).round() as i64
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

impl ReferenceDocument {
    /// Opens a `.docx` file and collects the text of its top-level body
    /// paragraphs, in order.
    pub fn open<P: AsRef<Path>>(path: P) -> AddendumResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AddendumError::ReferenceOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let paragraphs =
            read_package(BufReader::new(file)).map_err(|message| AddendumError::ReferenceFormat {
                path: path.to_path_buf(),
                message,
            })?;
        debug!("read {} paragraphs from {:?}", paragraphs.len(), path);
        Ok(ReferenceDocument::from_paragraphs(paragraphs))
    }

    /// Same as [`ReferenceDocument::open`] for a package already in memory.
    pub fn from_docx_bytes(bytes: &[u8]) -> AddendumResult<Self> {
        let paragraphs =
            read_package(Cursor::new(bytes)).map_err(|message| AddendumError::ReferenceFormat {
                path: "<memory>".into(),
                message,
            })?;
        Ok(ReferenceDocument::from_paragraphs(paragraphs))
    }
}

fn read_package<R: Read + Seek>(reader: R) -> Result<Vec<String>, String> {
    let mut archive = ZipArchive::new(reader).map_err(|e| format!("not a ZIP package: {}", e))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| format!("missing {}: {}", DOCUMENT_PART, e))?
        .read_to_string(&mut xml)
        .map_err(|e| format!("failed to read {}: {}", DOCUMENT_PART, e))?;
    body_paragraphs(&xml)
}

/// Elements between a paragraph and its text must be a run, optionally
/// wrapped in a hyperlink. Text in nested structures (text boxes, fields'
/// alternate content) does not belong to the paragraph.
fn is_run_path(path: &[Vec<u8>]) -> bool {
    match path {
        [r] => r.as_slice() == b"r",
        [h, r] => h.as_slice() == b"hyperlink" && r.as_slice() == b"r",
        _ => false,
    }
}

fn parent_is_body(stack: &[Vec<u8>]) -> bool {
    stack.last().is_some_and(|n| n.as_slice() == b"body")
}

fn in_run(stack: &[Vec<u8>], paragraph_at: usize) -> bool {
    stack.get(paragraph_at + 1..).is_some_and(is_run_path)
}

/// Only a text-wrapping break (the default type) ends a line; page and
/// column breaks contribute no text.
fn is_line_break(e: &BytesStart) -> bool {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == b"type")
        .is_none_or(|a| a.value.as_ref() == b"textWrapping")
}

/// Plain-text rendering of an empty run element.
fn run_char(e: &BytesStart) -> Option<char> {
    match e.local_name().as_ref() {
        b"tab" | b"ptab" => Some('\t'),
        b"cr" => Some('\n'),
        b"br" if is_line_break(e) => Some('\n'),
        b"noBreakHyphen" => Some('-'),
        _ => None,
    }
}

/// Text of every paragraph that is a direct child of `w:body`. Tables and
/// content controls are skipped. `w:tab` becomes `\t`, line breaks become
/// `\n`, a non-breaking hyphen becomes `-`.
pub fn body_paragraphs(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraph: Option<(usize, String)> = None;
    let mut paragraphs = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            format!("XML error at position {}: {}", reader.buffer_position(), e)
        })?;
        match event {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if name.as_slice() == b"p" && paragraph.is_none() && parent_is_body(&stack) {
                    paragraph = Some((stack.len(), String::new()));
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"p" {
                    if paragraph.is_none() && parent_is_body(&stack) {
                        paragraphs.push(String::new());
                    }
                } else if let Some((at, text)) = paragraph.as_mut() {
                    if let Some(c) = run_char(&e).filter(|_| in_run(&stack, *at)) {
                        text.push(c);
                    }
                }
            }
            Event::Text(e) => {
                if let (Some((at, text)), Some((leaf, parents))) =
                    (paragraph.as_mut(), stack.split_last())
                {
                    if leaf.as_slice() == b"t" && in_run(parents, *at) {
                        let unescaped = e
                            .unescape()
                            .map_err(|e| format!("Text unescape error: {}", e))?;
                        text.push_str(&unescaped);
                    }
                }
            }
            Event::End(_) => {
                stack.pop();
                if paragraph.as_ref().is_some_and(|(at, _)| *at == stack.len()) {
                    if let Some((_, text)) = paragraph.take() {
                        paragraphs.push(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

type XmlWriter = Writer<Cursor<Vec<u8>>>;
type XmlResult = Result<(), quick_xml::Error>;

fn start(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> XmlResult {
    let mut elem = BytesStart::new(name);
    for attr in attrs {
        elem.push_attribute(*attr);
    }
    w.write_event(Event::Start(elem))
}

fn empty(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> XmlResult {
    let mut elem = BytesStart::new(name);
    for attr in attrs {
        elem.push_attribute(*attr);
    }
    w.write_event(Event::Empty(elem))
}

fn end(w: &mut XmlWriter, name: &str) -> XmlResult {
    w.write_event(Event::End(BytesEnd::new(name)))
}

fn declaration(w: &mut XmlWriter) -> XmlResult {
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
}

fn write_run_props(w: &mut XmlWriter, font: &str, size_pt: f32, bold: bool) -> XmlResult {
    let size = pt_to_half_points(size_pt).to_string();
    start(w, "w:rPr", &[])?;
    empty(
        w,
        "w:rFonts",
        &[
            ("w:ascii", font),
            ("w:hAnsi", font),
            ("w:eastAsia", font),
            ("w:cs", font),
        ],
    )?;
    if bold {
        empty(w, "w:b", &[])?;
        empty(w, "w:bCs", &[])?;
    }
    empty(w, "w:sz", &[("w:val", &size)])?;
    empty(w, "w:szCs", &[("w:val", &size)])?;
    end(w, "w:rPr")
}

fn flush_text(w: &mut XmlWriter, buf: &mut String) -> XmlResult {
    if buf.is_empty() {
        return Ok(());
    }
    start(w, "w:t", &[("xml:space", "preserve")])?;
    w.write_event(Event::Text(BytesText::new(buf)))?;
    end(w, "w:t")?;
    buf.clear();
    Ok(())
}

fn write_paragraph(
    w: &mut XmlWriter,
    p: &ParagraphSpec,
    defaults: &DocumentDefaults,
) -> XmlResult {
    let style = &p.style;
    start(w, "w:p", &[])?;
    start(w, "w:pPr", &[])?;

    if !style.tab_stops.is_empty() {
        start(w, "w:tabs", &[])?;
        for stop in &style.tab_stops {
            let val = match stop.alignment {
                TabAlignment::Left => "left",
                TabAlignment::Right => "right",
            };
            let pos = cm_to_twips(stop.position_cm).to_string();
            empty(w, "w:tab", &[("w:val", val), ("w:pos", &pos)])?;
        }
        end(w, "w:tabs")?;
    }

    let before = pt_to_twips(style.space_before_pt).to_string();
    let after = pt_to_twips(style.space_after_pt).to_string();
    let line = line_to_240ths(style.line_spacing).to_string();
    empty(
        w,
        "w:spacing",
        &[
            ("w:before", &before),
            ("w:after", &after),
            ("w:line", &line),
            ("w:lineRule", "auto"),
        ],
    )?;

    if style.first_line_indent {
        let indent = cm_to_twips(FIRST_LINE_INDENT_CM).to_string();
        empty(w, "w:ind", &[("w:firstLine", &indent)])?;
    }

    let jc = match style.alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justify => "both",
    };
    empty(w, "w:jc", &[("w:val", jc)])?;
    end(w, "w:pPr")?;

    if !p.text.is_empty() {
        start(w, "w:r", &[])?;
        write_run_props(w, &defaults.font_family, style.font_size_pt, style.bold)?;
        let mut buf = String::new();
        for c in p.text.chars() {
            match c {
                '\t' => {
                    flush_text(w, &mut buf)?;
                    empty(w, "w:tab", &[])?;
                }
                '\n' => {
                    flush_text(w, &mut buf)?;
                    empty(w, "w:br", &[])?;
                }
                _ => buf.push(c),
            }
        }
        flush_text(w, &mut buf)?;
        end(w, "w:r")?;
    }

    end(w, "w:p")
}

fn write_section(w: &mut XmlWriter, defaults: &DocumentDefaults) -> XmlResult {
    let width = PAGE_WIDTH.to_string();
    let height = PAGE_HEIGHT.to_string();
    let top = cm_to_twips(defaults.margin_top_cm).to_string();
    let bottom = cm_to_twips(defaults.margin_bottom_cm).to_string();
    let left = cm_to_twips(defaults.margin_left_cm).to_string();
    let right = cm_to_twips(defaults.margin_right_cm).to_string();

    start(w, "w:sectPr", &[])?;
    empty(w, "w:pgSz", &[("w:w", &width), ("w:h", &height)])?;
    empty(
        w,
        "w:pgMar",
        &[
            ("w:top", &top),
            ("w:right", &right),
            ("w:bottom", &bottom),
            ("w:left", &left),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    end(w, "w:sectPr")
}

fn write_document(w: &mut XmlWriter, doc: &OutputDocument) -> XmlResult {
    declaration(w)?;
    start(w, "w:document", &[("xmlns:w", NS_MAIN), ("xmlns:r", NS_REL)])?;
    start(w, "w:body", &[])?;
    for p in doc.paragraphs() {
        write_paragraph(w, p, &doc.defaults)?;
    }
    write_section(w, &doc.defaults)?;
    end(w, "w:body")?;
    end(w, "w:document")
}

fn write_styles(w: &mut XmlWriter, defaults: &DocumentDefaults) -> XmlResult {
    let font = defaults.font_family.as_str();
    declaration(w)?;
    start(w, "w:styles", &[("xmlns:w", NS_MAIN)])?;
    start(w, "w:docDefaults", &[])?;
    start(w, "w:rPrDefault", &[])?;
    write_run_props(w, font, defaults.font_size_pt, false)?;
    end(w, "w:rPrDefault")?;
    end(w, "w:docDefaults")?;

    start(
        w,
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    empty(w, "w:name", &[("w:val", "Normal")])?;
    empty(w, "w:qFormat", &[])?;
    write_run_props(w, font, defaults.font_size_pt, false)?;
    end(w, "w:style")?;
    end(w, "w:styles")
}

/// Serializes `word/document.xml`. Fails on paragraph text that XML cannot
/// carry rather than producing a package word processors refuse to open.
pub fn document_xml(doc: &OutputDocument) -> AddendumResult<Vec<u8>> {
    for (index, p) in doc.paragraphs().iter().enumerate() {
        if let Some(c) = unencodable_char(&p.text) {
            return Err(AddendumError::UnencodableChar {
                location: format!("paragraph {index}"),
                code: c.into(),
            });
        }
    }

    let mut w = Writer::new(Cursor::new(Vec::new()));
    write_document(&mut w, doc)
        .map_err(|e| AddendumError::Serialize(format!("document part: {}", e)))?;
    Ok(w.into_inner().into_inner())
}

/// Serializes `word/styles.xml`: the document-wide font and size.
pub fn styles_xml(defaults: &DocumentDefaults) -> AddendumResult<Vec<u8>> {
    let mut w = Writer::new(Cursor::new(Vec::new()));
    write_styles(&mut w, defaults)
        .map_err(|e| AddendumError::Serialize(format!("styles part: {}", e)))?;
    Ok(w.into_inner().into_inner())
}

/// Writes the complete `.docx` package to `out`.
pub fn write_docx<W: Write + Seek>(doc: &OutputDocument, out: W) -> AddendumResult<W> {
    let zip_err = |e: zip::result::ZipError| AddendumError::Serialize(format!("zip: {}", e));
    let io_err = |e: std::io::Error| AddendumError::Serialize(format!("zip: {}", e));

    let parts: [(&str, Vec<u8>); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
        ("_rels/.rels", PACKAGE_RELS.as_bytes().to_vec()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes().to_vec()),
        (DOCUMENT_PART, document_xml(doc)?),
        (STYLES_PART, styles_xml(&doc.defaults)?),
    ];

    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(out);
    for (name, bytes) in parts {
        zip.start_file(name, options).map_err(zip_err)?;
        zip.write_all(&bytes).map_err(io_err)?;
    }
    zip.finish().map_err(zip_err)
}

/// The complete `.docx` package as bytes.
pub fn to_bytes(doc: &OutputDocument) -> AddendumResult<Vec<u8>> {
    Ok(write_docx(doc, Cursor::new(Vec::new()))?.into_inner())
}
