// src/document.rs
//
// In-memory model of the generated document: document-wide defaults plus an
// ordered list of styled paragraphs. Lengths are kept in the units people use
// for page setup (centimetres, points); the DOCX writer converts them.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    Left,
    Center,
    Right,
    #[default]
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabAlignment {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabStop {
    pub position_cm: f32,
    pub alignment: TabAlignment,
}

impl TabStop {
    pub fn left(position_cm: f32) -> Self {
        Self {
            position_cm,
            alignment: TabAlignment::Left,
        }
    }

    pub fn right(position_cm: f32) -> Self {
        Self {
            position_cm,
            alignment: TabAlignment::Right,
        }
    }
}

/// First character that XML 1.0 cannot carry: control characters other than
/// tab, newline and carriage return, plus U+FFFE and U+FFFF.
pub fn unencodable_char(text: &str) -> Option<char> {
    text.chars().find(|&c| {
        matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}')
            || c == '\u{fffe}'
            || c == '\u{ffff}'
    })
}

/// Indent applied to the first line when `first_line_indent` is set.
pub const FIRST_LINE_INDENT_CM: f32 = 1.25;

/// Visual properties of one paragraph.
///
/// Defaults describe an ordinary body paragraph: justified, regular weight,
/// 12 pt, no space before, 6 pt after, 1.15 line spacing, first-line indent,
/// no tab stops.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphStyle {
    pub alignment: Alignment,
    pub bold: bool,
    pub font_size_pt: f32,
    pub space_before_pt: f32,
    pub space_after_pt: f32,
    pub line_spacing: f32,
    pub first_line_indent: bool,
    pub tab_stops: Vec<TabStop>,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            alignment: Alignment::Justify,
            bold: false,
            font_size_pt: 12.0,
            space_before_pt: 0.0,
            space_after_pt: 6.0,
            line_spacing: 1.15,
            first_line_indent: true,
            tab_stops: Vec::new(),
        }
    }
}

impl ParagraphStyle {
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn size(mut self, pt: f32) -> Self {
        self.font_size_pt = pt;
        self
    }

    pub fn before(mut self, pt: f32) -> Self {
        self.space_before_pt = pt;
        self
    }

    pub fn after(mut self, pt: f32) -> Self {
        self.space_after_pt = pt;
        self
    }

    pub fn no_indent(mut self) -> Self {
        self.first_line_indent = false;
        self
    }

    pub fn tab(mut self, stop: TabStop) -> Self {
        self.tab_stops.push(stop);
        self
    }
}

/// What role a paragraph plays in the addendum. Informational only; the
/// style carries the formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphKind {
    Title,
    Subtitle,
    CityDate,
    Body,
    Heading,
    Bullet,
    SignatureRow,
}

/// One paragraph to append. Text may contain `\t` (tab) and `\n` (line break).
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphSpec {
    pub kind: ParagraphKind,
    pub text: String,
    pub style: ParagraphStyle,
}

impl ParagraphSpec {
    pub fn new(kind: ParagraphKind, text: impl Into<String>, style: ParagraphStyle) -> Self {
        Self {
            kind,
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDefaults {
    pub margin_top_cm: f32,
    pub margin_bottom_cm: f32,
    pub margin_left_cm: f32,
    pub margin_right_cm: f32,
    pub font_family: String,
    pub font_size_pt: f32,
}

impl Default for DocumentDefaults {
    fn default() -> Self {
        Self {
            margin_top_cm: 2.0,
            margin_bottom_cm: 2.0,
            margin_left_cm: 2.0,
            margin_right_cm: 2.0,
            font_family: "Times New Roman".to_string(),
            font_size_pt: 12.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputDocument {
    pub defaults: DocumentDefaults,
    paragraphs: Vec<ParagraphSpec>,
}

impl OutputDocument {
    pub fn new(defaults: DocumentDefaults) -> Self {
        Self {
            defaults,
            paragraphs: Vec::new(),
        }
    }

    pub fn append(&mut self, paragraph: ParagraphSpec) {
        self.paragraphs.push(paragraph);
    }

    pub fn paragraphs(&self) -> &[ParagraphSpec] {
        &self.paragraphs
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.paragraphs.iter().map(|p| p.text.as_str())
    }
}

impl Extend<ParagraphSpec> for OutputDocument {
    fn extend<T: IntoIterator<Item = ParagraphSpec>>(&mut self, iter: T) {
        for paragraph in iter {
            self.append(paragraph);
        }
    }
}
