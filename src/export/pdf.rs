use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const PAGE_W: f32 = 595.0;
const PAGE_H: f32 = 842.0;
const MARGIN: f32 = 50.0;
const ROW_H: f32 = 22.0;
const BODY_SIZE: f32 = 11.0;
const LINE_H: f32 = 16.0;
const FONT: Name<'static> = Name(b"F1");

/// Minimal multi-page table writer on top of `pdf-writer` (A4, Helvetica).
pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    font_id: Ref,
    page_refs: Vec<Ref>,
    next_id: i32,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Helvetica is set up with WinAnsiEncoding; map text to Latin-1 bytes.
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}

impl PdfManager {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();
        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            font_id,
            page_refs: Vec::new(),
            next_id: 4,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn add_page(&mut self, content: Content) {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();
        self.page_refs.push(page_id);

        {
            let mut page = self.pdf.page(page_id);
            page.parent(self.pages_id)
                .media_box(Rect::new(0.0, 0.0, PAGE_W, PAGE_H))
                .contents(content_id);
            page.resources().fonts().pair(FONT, self.font_id);
        }

        self.pdf.stream(content_id, &content.finish());
    }

    fn text(content: &mut Content, x: f32, y: f32, size: f32, text: &str) {
        content.begin_text();
        content.set_font(FONT, size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&latin1(text)));
        content.end_text();
    }

    fn row(content: &mut Content, y: f32, widths: &[f32], cells: &[String], size: f32) {
        let mut x = MARGIN;
        for (i, w) in widths.iter().enumerate() {
            if let Some(cell) = cells.get(i) {
                Self::text(content, x + 4.0, y + 7.0, size, cell);
            }
            content.save_state();
            content.set_stroke_rgb(0.6, 0.6, 0.6);
            content.rect(x, y, *w, ROW_H);
            content.stroke();
            content.restore_state();
            x += w;
        }
    }

    /// `weights` are relative column widths scaled to the printable width.
    fn column_widths(weights: &[f32]) -> Vec<f32> {
        let total: f32 = weights.iter().sum();
        let avail = PAGE_W - 2.0 * MARGIN;
        weights.iter().map(|w| w / total * avail).collect()
    }

    /// Table spread over as many pages as needed. Every page repeats the
    /// title, the subtitle lines and the header row.
    pub fn write_table(
        &mut self,
        title: &str,
        subtitle: &[String],
        headers: &[&str],
        weights: &[f32],
        rows: &[Vec<String>],
    ) {
        let widths = Self::column_widths(weights);
        let header_row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let mut remaining = rows;
        let mut page_no = 1;

        loop {
            let mut content = Content::new();
            let mut y = PAGE_H - MARGIN;

            Self::text(&mut content, MARGIN, y, 16.0, title);
            y -= 22.0;
            for line in subtitle {
                Self::text(&mut content, MARGIN, y, 10.0, line);
                y -= 14.0;
            }
            y -= 10.0 + ROW_H;

            content.save_state();
            content.set_fill_rgb(0.85, 0.87, 0.90);
            content.rect(MARGIN, y, widths.iter().sum(), ROW_H);
            content.fill_nonzero();
            content.restore_state();
            Self::row(&mut content, y, &widths, &header_row, 11.0);

            let mut consumed = 0;
            for r in remaining {
                if y - ROW_H < MARGIN {
                    break;
                }
                y -= ROW_H;
                Self::row(&mut content, y, &widths, r, 10.0);
                consumed += 1;
            }

            Self::text(
                &mut content,
                PAGE_W - MARGIN - 50.0,
                MARGIN - 30.0,
                9.0,
                &format!("Page {page_no}"),
            );
            self.add_page(content);

            remaining = &remaining[consumed..];
            page_no += 1;
            if remaining.is_empty() {
                break;
            }
        }
    }

    /// Free text: a title, a label/value table, word-wrapped paragraphs and
    /// a signature line under the last one. Long bodies continue on new pages.
    pub fn write_letter(
        &mut self,
        title: &str,
        fields: &[(&str, String)],
        paragraphs: &[String],
        signature: &str,
    ) {
        let widths = Self::column_widths(&[1.0, 3.0]);
        // Helvetica averages about half an em per glyph.
        let columns = ((PAGE_W - 2.0 * MARGIN) / (BODY_SIZE * 0.5)) as usize;

        let mut content = Content::new();
        let mut y = PAGE_H - MARGIN;

        Self::text(&mut content, MARGIN, y, 18.0, title);
        y -= 30.0;
        for (label, value) in fields {
            y -= ROW_H;
            Self::row(&mut content, y, &widths, &[label.to_string(), value.clone()], 10.0);
        }
        y -= 20.0;

        for paragraph in paragraphs {
            for line in textwrap::wrap(paragraph, columns) {
                if y - LINE_H < MARGIN {
                    self.add_page(content);
                    content = Content::new();
                    y = PAGE_H - MARGIN;
                }
                y -= LINE_H;
                Self::text(&mut content, MARGIN, y, BODY_SIZE, &line);
            }
            y -= LINE_H * 0.75;
        }

        if y - 80.0 < MARGIN {
            self.add_page(content);
            content = Content::new();
            y = PAGE_H - MARGIN;
        }
        y -= 70.0;
        content.save_state();
        content.set_stroke_rgb(0.0, 0.0, 0.0);
        content.move_to(MARGIN, y);
        content.line_to(MARGIN + 220.0, y);
        content.stroke();
        content.restore_state();
        Self::text(&mut content, MARGIN, y - 14.0, 10.0, signature);

        self.add_page(content);
    }

    pub fn page_count(&self) -> usize {
        self.page_refs.len()
    }

    pub fn save(mut self, path: &Path) -> std::io::Result<()> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        let count = self.page_refs.len() as i32;
        self.pdf
            .pages(self.pages_id)
            .count(count)
            .kids(self.page_refs.iter().copied());

        let bytes = self.pdf.finish();
        let mut f = File::create(path)?;
        f.write_all(&bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_tables_spill_onto_more_pages() {
        let rows: Vec<Vec<String>> = (0..80).map(|i| vec![format!("Row {i}")]).collect();
        let mut pdf = PdfManager::new();
        pdf.write_table("T", &[], &["Name"], &[1.0], &rows);
        assert!(pdf.page_count() >= 2);

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("t.pdf");
        pdf.save(&out).unwrap();
        assert!(std::fs::read(&out).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn long_letters_continue_on_a_new_page() {
        let paragraph = "The excursion leaves at nine. ".repeat(40);
        let body: Vec<String> = (0..12).map(|_| paragraph.clone()).collect();

        let mut pdf = PdfManager::new();
        pdf.write_letter("NOTE", &[("Subject:", "Trip".into())], &body, "Signature");
        assert!(pdf.page_count() >= 2);

        let mut short = PdfManager::new();
        short.write_letter("NOTE", &[], &["Hello".into()], "Signature");
        assert_eq!(short.page_count(), 1);
    }

    #[test]
    fn non_latin_characters_are_replaced() {
        assert_eq!(latin1("Sí €"), vec![b'S', 0xED, b' ', b'?']);
    }
}
