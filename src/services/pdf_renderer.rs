use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, ObjectId, Stream, StringFormat,
};

use crate::{
    errors::{AppError, AppResult},
    models::domain::QuestionPaper,
};

// A4 in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const BODY_FONT_SIZE: f32 = 11.0;
const HEADING_FONT_SIZE: f32 = 13.0;
const LINE_HEIGHT: f32 = 15.0;
// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

#[cfg_attr(test, mockall::automock)]
pub trait PdfRenderer: Send + Sync {
    fn render(&self, paper: &QuestionPaper) -> AppResult<Vec<u8>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutLine {
    pub text: String,
    pub bold: bool,
}

/// Strips the markdown the model tends to emit. Headings come back bold,
/// emphasis markers are dropped, everything else is kept as typed.
fn normalize_markdown_line(raw: &str) -> LayoutLine {
    let trimmed = raw.trim_end();
    let without_hashes = trimmed.trim_start_matches('#');
    let is_heading = without_hashes.len() < trimmed.len()
        && (without_hashes.is_empty() || without_hashes.starts_with(' '));

    let text = if is_heading { without_hashes.trim() } else { trimmed };
    let text = text.replace("**", "").replace("__", "");

    LayoutLine {
        bold: is_heading,
        text,
    }
}

fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    // Indentation is capped so wrapped lines still fit the margin.
    let indent: String = text
        .chars()
        .take_while(|c| c.is_whitespace())
        .take(max_chars / 2)
        .collect();
    let indent_len = indent.chars().count();
    let room = max_chars - indent_len;
    let mut lines = Vec::new();
    let mut current = indent.clone();

    for word in text.split_whitespace() {
        let current_len = current.chars().count();
        let word_len = word.chars().count();

        if current_len > indent_len && current_len + 1 + word_len > max_chars {
            lines.push(std::mem::replace(&mut current, indent.clone()));
        }

        if current.chars().count() > indent_len {
            current.push(' ');
        }

        if word_len > room {
            // Hard-split tokens wider than a line (URLs, long formulas).
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(room) {
                if current.chars().count() > indent_len {
                    lines.push(std::mem::replace(&mut current, indent.clone()));
                }
                current.extend(chunk.iter());
            }
        } else {
            current.push_str(word);
        }
    }

    if !current.trim().is_empty() {
        lines.push(current);
    }
    lines
}

/// Turns free text into wrapped, styled lines.
pub fn layout(body: &str) -> Vec<LayoutLine> {
    let usable_width = PAGE_WIDTH - 2.0 * MARGIN;
    let body_chars = (usable_width / (BODY_FONT_SIZE * AVG_GLYPH_WIDTH)) as usize;
    let heading_chars = (usable_width / (HEADING_FONT_SIZE * AVG_GLYPH_WIDTH)) as usize;

    body.lines()
        .map(normalize_markdown_line)
        .flat_map(|line| {
            let max_chars = if line.bold { heading_chars } else { body_chars };
            wrap(&line.text, max_chars)
                .into_iter()
                .map(move |text| LayoutLine { text, bold: line.bold })
        })
        .collect()
}

pub fn lines_per_page() -> usize {
    ((PAGE_HEIGHT - 2.0 * MARGIN) / LINE_HEIGHT) as usize
}

/// Helvetica with WinAnsiEncoding only covers Latin-1; other characters
/// are replaced rather than emitted as garbage bytes.
fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => b'\'',
            '\u{201C}' | '\u{201D}' => b'"',
            '\u{2013}' | '\u{2014}' => b'-',
            '\t' => b' ',
            c if (c as u32) < 0x100 => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn page_operations(lines: &[LayoutLine]) -> Vec<Operation> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("TL", vec![LINE_HEIGHT.into()]),
        Operation::new(
            "Td",
            vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN - BODY_FONT_SIZE).into()],
        ),
    ];

    let mut current_bold: Option<bool> = None;
    for line in lines {
        if current_bold != Some(line.bold) {
            let (font, size) = if line.bold {
                ("F2", HEADING_FONT_SIZE)
            } else {
                ("F1", BODY_FONT_SIZE)
            };
            operations.push(Operation::new("Tf", vec![font.into(), size.into()]));
            current_bold = Some(line.bold);
        }

        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_latin1(&line.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("T*", vec![]));
    }

    operations.push(Operation::new("ET", vec![]));
    operations
}

/// Renders the paper as flowed text on as many A4 pages as needed.
pub struct LopdfRenderer;

impl LopdfRenderer {
    pub fn new() -> Self {
        LopdfRenderer
    }

    fn add_page(
        doc: &mut Document,
        pages_id: ObjectId,
        lines: &[LayoutLine],
    ) -> AppResult<ObjectId> {
        let content = Content {
            operations: page_operations(lines),
        };
        let encoded = content
            .encode()
            .map_err(|e| AppError::RenderingFailed(format!("Failed to encode page: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        Ok(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        }))
    }
}

impl Default for LopdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfRenderer for LopdfRenderer {
    fn render(&self, paper: &QuestionPaper) -> AppResult<Vec<u8>> {
        let lines = layout(&paper.body);
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        if lines.is_empty() {
            kids.push(Self::add_page(&mut doc, pages_id, &[])?.into());
        }
        for chunk in lines.chunks(lines_per_page()) {
            kids.push(Self::add_page(&mut doc, pages_id, chunk)?.into());
        }

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_latin1(&paper.title)),
            "Producer" => Object::string_literal(concat!("papercheck-server ", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| AppError::RenderingFailed(format!("Failed to write PDF: {}", e)))?;

        log::debug!(
            "Rendered '{}' into {} page(s), {} bytes",
            paper.title,
            page_count,
            buffer.len()
        );
        Ok(buffer)
    }
}
