//! Document Renderer: lays annotated plain text out on A4 pages and encodes it as PDF.
//!
//! Layout and encoding are separate steps: `layout_document` decides where every line goes
//! (including page breaks), `encode_pdf` only serializes the result.

use std::path::Path;

use lazy_static::lazy_static;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use regex::Regex;
use tracing::debug;

use crate::normalize::BULLET;
use crate::render::font_metrics::{get_metrics, FontFace};
use crate::render::RenderError;

const MM: f32 = 72.0 / 25.4;

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"^[A-Z\s]+:$").unwrap();
}

/// Page geometry and type sizes. All lengths in PDF points.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    /// Left, right and top margin.
    pub margin_pt: f32,
    /// Content may not extend below this distance from the bottom edge.
    pub bottom_margin_pt: f32,
    pub title_size_pt: f32,
    pub title_height_pt: f32,
    pub title_gap_pt: f32,
    pub body_size_pt: f32,
    pub line_height_pt: f32,
    /// Vertical gap after every rendered source line.
    pub line_gap_pt: f32,
}

/// A4 portrait, 10 mm margins, 20 mm bottom break margin, 12 pt body on 8 mm lines.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        page_width_pt: 210.0 * MM,
        page_height_pt: 297.0 * MM,
        margin_pt: 10.0 * MM,
        bottom_margin_pt: 20.0 * MM,
        title_size_pt: 16.0,
        title_height_pt: 10.0 * MM,
        title_gap_pt: 10.0 * MM,
        body_size_pt: 12.0,
        line_height_pt: 8.0 * MM,
        line_gap_pt: 2.0 * MM,
    }
}

impl PageConfig {
    pub fn content_width_pt(&self) -> f32 {
        self.page_width_pt - 2.0 * self.margin_pt
    }
}

/// How a non-blank source line is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Uppercase letters and spaces ending in `:`. Bold, never wrapped.
    Heading,
    Paragraph,
}

/// Classifies a source line. `None` for blank lines, which are skipped.
pub fn classify_line(line: &str) -> Option<LineKind> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else if HEADING.is_match(trimmed) {
        Some(LineKind::Heading)
    } else {
        Some(LineKind::Paragraph)
    }
}

/// One line of text at a fixed position. `baseline_pt` is measured from the page bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub face: FontFace,
    pub size_pt: f32,
    pub x_pt: f32,
    pub baseline_pt: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub pages: Vec<LaidOutPage>,
}

/// Tracks the write position; opens a new page when a line would cross the break margin.
struct PageCursor<'a> {
    config: &'a PageConfig,
    pages: Vec<LaidOutPage>,
    /// Distance of the write position from the top edge.
    top_pt: f32,
}

impl<'a> PageCursor<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            pages: vec![LaidOutPage::default()],
            top_pt: config.margin_pt,
        }
    }

    fn place(&mut self, text: String, face: FontFace, size_pt: f32, x_pt: f32, height_pt: f32) {
        let break_at = self.config.page_height_pt - self.config.bottom_margin_pt;
        let page_has_content = self
            .pages
            .last()
            .map(|p| !p.lines.is_empty())
            .unwrap_or(false);

        if page_has_content && self.top_pt + height_pt > break_at {
            self.pages.push(LaidOutPage::default());
            self.top_pt = self.config.margin_pt;
        }

        // Vertically centered in its cell, like a typewriter-style line box.
        let baseline_pt = self.config.page_height_pt - (self.top_pt + height_pt / 2.0 + 0.3 * size_pt);
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(PlacedLine {
                text,
                face,
                size_pt,
                x_pt,
                baseline_pt,
            });
        }
        self.top_pt += height_pt;
    }

    fn advance(&mut self, gap_pt: f32) {
        self.top_pt += gap_pt;
    }

    fn finish(self) -> LaidOutDocument {
        LaidOutDocument { pages: self.pages }
    }
}

/// Lays out `title` and the newline-separated `text`.
pub fn layout_document(text: &str, title: &str, config: &PageConfig) -> LaidOutDocument {
    let mut cursor = PageCursor::new(config);
    let body = get_metrics(FontFace::Helvetica);
    let bold = get_metrics(FontFace::HelveticaBold);
    let content_width = config.content_width_pt();

    let title_width = bold.measure_pt(title, config.title_size_pt);
    let title_x = config.margin_pt + ((content_width - title_width) / 2.0).max(0.0);
    cursor.place(
        title.to_string(),
        FontFace::HelveticaBold,
        config.title_size_pt,
        title_x,
        config.title_height_pt,
    );
    cursor.advance(config.title_gap_pt);

    for line in text.split('\n') {
        let Some(kind) = classify_line(line) else {
            continue;
        };
        let trimmed = line.trim();

        match kind {
            LineKind::Heading => cursor.place(
                trimmed.to_string(),
                FontFace::HelveticaBold,
                config.body_size_pt,
                config.margin_pt,
                config.line_height_pt,
            ),
            LineKind::Paragraph => {
                for wrapped in body.wrap_lines(trimmed, content_width, config.body_size_pt) {
                    cursor.place(
                        wrapped,
                        FontFace::Helvetica,
                        config.body_size_pt,
                        config.margin_pt,
                        config.line_height_pt,
                    );
                }
            }
        }
        cursor.advance(config.line_gap_pt);
    }

    cursor.finish()
}

/// Renders `text` under `title` as PDF bytes with the default page configuration.
pub fn render_document(text: &str, title: &str) -> Result<Vec<u8>, RenderError> {
    let config = default_page_config();
    let laid_out = layout_document(text, title, &config);
    debug!(
        "Laid out '{}' on {} page(s)",
        title,
        laid_out.pages.len()
    );
    encode_pdf(&laid_out, &config)
}

/// Renders and writes the PDF to `path`. Fails if the target cannot be written.
pub fn write_document(text: &str, title: &str, path: &Path) -> Result<(), RenderError> {
    let bytes = render_document(text, title)?;
    std::fs::write(path, bytes).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn font_dictionary(face: FontFace) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn page_operations(page: &LaidOutPage) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(page.lines.len() * 5);
    for line in &page.lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![line.face.resource_name().into(), Object::Real(line.size_pt)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(line.x_pt), Object::Real(line.baseline_pt)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&line.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

fn encode_pdf(laid_out: &LaidOutDocument, config: &PageConfig) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(FontFace::Helvetica));
    let bold_id = doc.add_object(font_dictionary(FontFace::HelveticaBold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FontFace::Helvetica.resource_name() => regular_id,
            FontFace::HelveticaBold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(laid_out.pages.len());
    for page in &laid_out.pages {
        let content = Content {
            operations: page_operations(page),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(config.page_width_pt),
            Object::Real(config.page_height_pt),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Encodes text for the standard fonts' WinAnsi encoding. Unmappable characters become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            BULLET => 0x95,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '–' => 0x96,
            '—' => 0x97,
            '\t' => b' ',
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
