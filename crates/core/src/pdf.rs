//! Minimal PDF 1.4 writer for fixed-layout documents.
//!
//! Supports A4 pages with text in the two standard Helvetica faces, filled
//! rectangles and stroked lines. Output carries no timestamps or random IDs:
//! the same pages always serialize to the same bytes.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner.

use std::fmt::Write as _;

/// A4 width in points.
pub const A4_WIDTH: f32 = 595.28;

/// A4 height in points.
pub const A4_HEIGHT: f32 = 841.89;

/// One of the two standard fonts the writer embeds by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }
}

/// RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);

    /// Build from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Rgb(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }
}

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Width of `text` at `size` points.
///
/// Uses Helvetica metrics for both faces; the bold face is slightly wider, so
/// right-aligned bold text may sit a point or two left of true alignment.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c as u32 {
            code @ 32..=126 => u32::from(HELVETICA_WIDTHS[(code - 32) as usize]),
            _ => 556,
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Break `text` into lines no wider than `max_width` at `size` points.
///
/// Lines break at whitespace; a word wider than a whole line is split
/// between characters. At most `max_lines` lines are returned, and when text
/// had to be dropped the last line ends in `...`.
pub fn wrap_text(text: &str, size: f32, max_width: f32, max_lines: usize) -> Vec<String> {
    let fits = |s: &str| text_width(s, size) <= max_width;
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current = word.to_string();
            continue;
        }
        for ch in word.chars() {
            current.push(ch);
            if !fits(&current) && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::replace(&mut current, ch.to_string()));
            }
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    let max_lines = max_lines.max(1);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = with_ellipsis(last, size, max_width);
        }
    }
    lines
}

/// `line` shortened until it fits with a trailing `...`.
fn with_ellipsis(line: &str, size: f32, max_width: f32) -> String {
    let mut kept: Vec<char> = line.chars().collect();
    loop {
        let candidate = format!("{}...", kept.iter().collect::<String>().trim_end());
        if kept.is_empty() || text_width(&candidate, size) <= max_width {
            return candidate;
        }
        kept.pop();
    }
}

/// A single page being drawn.
#[derive(Debug, Clone, Default)]
pub struct Page {
    content: String,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `text` with its baseline starting at `(x, y)`.
    pub fn text(&mut self, x: f32, y: f32, font: Font, size: f32, color: Rgb, text: &str) {
        let _ = writeln!(
            self.content,
            "BT /{} {} Tf {} {} {} rg {} {} Td ({}) Tj ET",
            font.resource_name(),
            num(size),
            num(color.0),
            num(color.1),
            num(color.2),
            num(x),
            num(y),
            escape_text(text),
        );
    }

    /// Draw `text` so that it ends at `right_x`.
    pub fn text_right(&mut self, right_x: f32, y: f32, font: Font, size: f32, color: Rgb, text: &str) {
        let x = right_x - text_width(text, size);
        self.text(x, y, font, size, color, text);
    }

    /// Draw `text` centred on `center_x`.
    pub fn text_centered(&mut self, center_x: f32, y: f32, font: Font, size: f32, color: Rgb, text: &str) {
        let x = center_x - text_width(text, size) / 2.0;
        self.text(x, y, font, size, color, text);
    }

    /// Fill a rectangle whose bottom-left corner is `(x, y)`.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        let _ = writeln!(
            self.content,
            "{} {} {} rg {} {} {} {} re f",
            num(color.0),
            num(color.1),
            num(color.2),
            num(x),
            num(y),
            num(width),
            num(height),
        );
    }

    /// Stroke a straight line.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Rgb) {
        let _ = writeln!(
            self.content,
            "{} {} {} RG {} w {} {} m {} {} l S",
            num(color.0),
            num(color.1),
            num(color.2),
            num(width),
            num(x1),
            num(y1),
            num(x2),
            num(y2),
        );
    }

    /// Raw content stream, mostly useful for inspecting layout in tests.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Assemble `pages` into a complete PDF file.
pub fn write_document(pages: &[Page]) -> Vec<u8> {
    // Object layout:
    //   1 catalog, 2 page tree, 3 regular font, 4 bold font,
    //   then a (page, content stream) pair per page.
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 5 + i * 2).collect();

    let mut objects: Vec<Vec<u8>> = Vec::with_capacity(4 + pages.len() * 2);
    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());

    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()).into_bytes());

    for font in [Font::Regular, Font::Bold] {
        objects.push(
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_font()
            )
            .into_bytes(),
        );
    }

    for (page, page_id) in pages.iter().zip(&page_ids) {
        let content_id = page_id + 1;
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {content_id} 0 R >>",
                num(A4_WIDTH),
                num(A4_HEIGHT),
            )
            .into_bytes(),
        );

        let stream = page.content.as_bytes();
        let mut obj = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        obj.extend_from_slice(stream);
        obj.extend_from_slice(b"endstream");
        objects.push(obj);
    }

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(xref, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

/// Format a number compactly with at most two decimals.
fn num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{rounded:.2}");
        s.trim_end_matches('0').to_string()
    }
}

/// Escape a string for a PDF literal.
///
/// Characters outside Latin-1 are replaced with `?`; Latin-1 characters above
/// ASCII are written as octal escapes so the WinAnsi font renders them.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", ch as u32);
            }
            _ => out.push('?'),
        }
    }
    out
}
