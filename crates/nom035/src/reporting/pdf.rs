//! Minimal PDF writer for risk reports; lines past the bottom margin continue on a new page.
//!
//! Output uses the standard Helvetica fonts with WinAnsi encoding, so Latin-1
//! text (accents, `ñ`, `¿`) renders without embedding fonts.

use super::views::UserRiskReport;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const WRAP_COLUMNS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Debug)]
struct Line {
    font: Font,
    size: f32,
    text: String,
    centered: bool,
}

/// Accumulates text lines top to bottom and serializes them into pages.
#[derive(Debug, Default)]
struct TextDocument {
    lines: Vec<Line>,
    gaps: Vec<usize>,
}

impl TextDocument {
    fn title(&mut self, text: &str) {
        self.lines.push(Line {
            font: Font::Bold,
            size: 18.0,
            text: text.to_string(),
            centered: true,
        });
    }

    fn text(&mut self, text: &str) {
        for chunk in wrap(text, WRAP_COLUMNS) {
            self.lines.push(Line {
                font: Font::Regular,
                size: 12.0,
                text: chunk,
                centered: false,
            });
        }
    }

    fn heading(&mut self, text: &str) {
        self.lines.push(Line {
            font: Font::Bold,
            size: 13.0,
            text: text.to_string(),
            centered: false,
        });
    }

    fn gap(&mut self) {
        self.gaps.push(self.lines.len());
    }

    /// One content stream per page; no baseline is placed below `MARGIN`.
    fn content_streams(&self) -> Vec<String> {
        let top = PAGE_HEIGHT - MARGIN;
        let mut pages = Vec::new();
        let mut stream = String::new();
        let mut y = top;

        for (index, line) in self.lines.iter().enumerate() {
            let extra = self.gaps.iter().filter(|gap| **gap == index).count() as f32;
            y -= extra * line.size;
            if y < MARGIN {
                pages.push(std::mem::take(&mut stream));
                y = top;
            }

            let x = if line.centered {
                // Helvetica averages roughly half an em per glyph.
                let estimated = line.text.chars().count() as f32 * line.size * 0.5;
                ((PAGE_WIDTH - estimated) / 2.0).max(MARGIN)
            } else {
                MARGIN
            };

            stream.push_str(&format!(
                "BT /{} {:.0} Tf {:.1} {:.1} Td ({}) Tj ET\n",
                line.font.resource(),
                line.size,
                x,
                y,
                escape(&line.text)
            ));
            y -= line.size * 1.5;
        }

        pages.push(stream);
        pages
    }

    fn finish(self) -> Vec<u8> {
        let streams = self.content_streams();
        // 1 catalog, 2 page tree, 3-4 fonts, then a page and its content per page.
        let page_object = |page: usize| 5 + 2 * page;
        let kids = (0..streams.len())
            .map(|page| format!("{} 0 R", page_object(page)))
            .collect::<Vec<_>>()
            .join(" ");

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", streams.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];
        for (page, content) in streams.iter().enumerate() {
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                page_object(page) + 1
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}endstream",
                content.len(),
                content
            ));
        }

        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", index + 1, body).as_bytes());
        }

        let xref_at = out.len();
        let mut trailer = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            trailer.push_str(&format!("{offset:010} 00000 n \n"));
        }
        trailer.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        ));
        out.extend_from_slice(trailer.as_bytes());
        out
    }
}

/// Escapes a string for a PDF literal; Latin-1 characters become octal escapes.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' '..='~' => escaped.push(ch),
            '\u{a0}'..='\u{ff}' => {
                escaped.push_str(&format!("\\{:03o}", ch as u32));
            }
            _ => escaped.push('?'),
        }
    }
    escaped
}

fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if needed > columns && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lays out the individual risk report.
pub fn render_user_report(report: &UserRiskReport) -> Vec<u8> {
    let mut page = TextDocument::default();

    page.title("Reporte de Evaluación de Riesgo Psicosocial");
    page.gap();
    page.text(&format!("Nombre: {}", report.user_name));
    page.text(&format!("Departamento: {}", report.department));
    page.text(&format!("Nivel de Riesgo: {}", report.risk_level));
    page.text(&format!("Puntaje Total: {}", report.total_score));
    page.text(&format!(
        "Fecha de evaluación: {}",
        report.submitted_at.format("%Y-%m-%d")
    ));
    page.gap();
    page.heading("Recomendaciones:");
    for (index, recommendation) in report.recommendations.iter().enumerate() {
        page.text(&format!("{}. {}", index + 1, recommendation));
    }

    page.finish()
}
