//! PDF backend for the report canvas
//!
//! Emits the report with the base-14 Times faces (WinAnsi text, no embedded
//! fonts), FlateDecode-compressed content streams, and RGB image XObjects
//! with a soft mask when the source carries transparency. Glyph widths for
//! alignment come from the Adobe core-14 metrics inlined below.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str};

use crate::report::canvas::{Align, Face, PageCanvas, Pen, TextStyle};

const MM_TO_PT: f32 = 72.0 / 25.4;

/// Inner padding of left/right-aligned text cells.
const CELL_PAD: f32 = 1.0;

/// Page resource names and base fonts, indexed by [`Face`].
const FONT_NAMES: [&[u8]; 3] = [b"F1", b"F2", b"F3"];
const BASE_FONTS: [&str; 3] = ["Times-Roman", "Times-Bold", "Times-Italic"];

/// Deflate level for content and image streams.
const COMPRESSION: u8 = 6;

fn face_index(face: Face) -> usize {
    match face {
        Face::Regular => 0,
        Face::Bold => 1,
        Face::Italic => 2,
    }
}

/// Map text onto the single-byte encoding; glyphs outside the printable
/// ASCII range render as `?`.
fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Advance widths for 0x20..=0x7E in thousandths of an em (Adobe core-14
/// AFMs). Times-Italic tracks Times-Roman closely; the roman table serves
/// both.
#[rustfmt::skip]
const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

fn widths(face: Face) -> &'static [u16; 95] {
    match face {
        Face::Bold => &TIMES_BOLD_WIDTHS,
        _ => &TIMES_ROMAN_WIDTHS,
    }
}

#[derive(Clone, Copy)]
struct EmbeddedImage {
    id: Ref,
    px_w: u32,
    px_h: u32,
}

struct PageInProgress {
    content: Content,
    images: Vec<(String, Ref)>,
}

struct FinishedPage {
    content_id: Ref,
    images: Vec<(String, Ref)>,
}

/// A [`PageCanvas`] that accumulates a PDF document.
pub struct PdfCanvas {
    pdf: Pdf,
    next_ref: i32,
    catalog_id: Ref,
    tree_id: Ref,
    font_ids: [Ref; 3],
    /// Page size in millimetres.
    width: f32,
    height: f32,
    pages: Vec<FinishedPage>,
    current: Option<PageInProgress>,
    /// Decoded sources, keyed by path; `None` marks a source that failed to
    /// decode so it is not retried.
    images: HashMap<PathBuf, Option<EmbeddedImage>>,
}

impl PdfCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        let mut pdf = Pdf::new();
        let catalog_id = Ref::new(1);
        let tree_id = Ref::new(2);
        let font_ids = [Ref::new(3), Ref::new(4), Ref::new(5)];

        for (id, base) in font_ids.iter().zip(BASE_FONTS) {
            pdf.type1_font(*id)
                .base_font(Name(base.as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        Self {
            pdf,
            next_ref: 6,
            catalog_id,
            tree_id,
            font_ids,
            width,
            height,
            pages: Vec::new(),
            current: None,
            images: HashMap::new(),
        }
    }

    /// Close the document and return its bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.flush_page();

        let mut page_ids = Vec::with_capacity(self.pages.len());
        for _ in 0..self.pages.len() {
            page_ids.push(self.alloc());
        }

        self.pdf.catalog(self.catalog_id).pages(self.tree_id);
        self.pdf
            .pages(self.tree_id)
            .kids(page_ids.iter().copied())
            .count(self.pages.len() as i32);

        let media = Rect::new(0.0, 0.0, self.width * MM_TO_PT, self.height * MM_TO_PT);
        for (page, id) in self.pages.iter().zip(&page_ids) {
            let mut obj = self.pdf.page(*id);
            obj.media_box(media);
            obj.parent(self.tree_id);
            obj.contents(page.content_id);

            let mut resources = obj.resources();
            let mut fonts = resources.fonts();
            for (name, font_id) in FONT_NAMES.into_iter().zip(self.font_ids) {
                fonts.pair(Name(name), font_id);
            }
            fonts.finish();
            if !page.images.is_empty() {
                let mut xobjects = resources.x_objects();
                for (name, image_id) in &page.images {
                    xobjects.pair(Name(name.as_bytes()), *image_id);
                }
                xobjects.finish();
            }
            resources.finish();
            obj.finish();
        }

        self.pdf.finish()
    }

    fn alloc(&mut self) -> Ref {
        let id = Ref::new(self.next_ref);
        self.next_ref += 1;
        id
    }

    /// Horizontal millimetres to document points.
    fn x(&self, mm: f32) -> f32 {
        mm * MM_TO_PT
    }

    /// Vertical millimetres (top-down) to document points (bottom-up).
    fn y(&self, mm: f32) -> f32 {
        (self.height - mm) * MM_TO_PT
    }

    fn page(&mut self) -> &mut PageInProgress {
        self.current.get_or_insert_with(|| PageInProgress {
            content: Content::new(),
            images: Vec::new(),
        })
    }

    fn flush_page(&mut self) {
        if let Some(page) = self.current.take() {
            let content_id = self.alloc();
            let data = compress_to_vec_zlib(&page.content.finish(), COMPRESSION);
            self.pdf.stream(content_id, &data).filter(Filter::FlateDecode);
            self.pages.push(FinishedPage {
                content_id,
                images: page.images,
            });
        }
    }

    fn embed_image(&mut self, source: &Path) -> Option<EmbeddedImage> {
        if let Some(cached) = self.images.get(source) {
            return *cached;
        }
        let embedded = self.load_image(source);
        self.images.insert(source.to_path_buf(), embedded);
        embedded
    }

    fn load_image(&mut self, source: &Path) -> Option<EmbeddedImage> {
        let rgba = image::open(source).ok()?.to_rgba8();
        let (px_w, px_h) = (rgba.width(), rgba.height());
        if px_w == 0 || px_h == 0 {
            return None;
        }

        let mask_id = if rgba.pixels().any(|p| p.0[3] < 255) {
            let alpha: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
            let id = self.alloc();
            let compressed = compress_to_vec_zlib(&alpha, COMPRESSION);
            let mut mask = self.pdf.image_xobject(id, &compressed);
            mask.filter(Filter::FlateDecode);
            mask.width(px_w as i32);
            mask.height(px_h as i32);
            mask.color_space().device_gray();
            mask.bits_per_component(8);
            mask.finish();
            Some(id)
        } else {
            None
        };

        let rgb: Vec<u8> = rgba
            .pixels()
            .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
            .collect();
        let id = self.alloc();
        let compressed = compress_to_vec_zlib(&rgb, COMPRESSION);
        let mut xobject = self.pdf.image_xobject(id, &compressed);
        xobject.filter(Filter::FlateDecode);
        xobject.width(px_w as i32);
        xobject.height(px_h as i32);
        xobject.color_space().device_rgb();
        xobject.bits_per_component(8);
        if let Some(mask) = mask_id {
            xobject.s_mask(mask);
        }
        xobject.finish();

        Some(EmbeddedImage { id, px_w, px_h })
    }
}

impl PageCanvas for PdfCanvas {
    fn start_page(&mut self) {
        self.flush_page();
        self.current = Some(PageInProgress {
            content: Content::new(),
            images: Vec::new(),
        });
    }

    fn text_cell(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        style: TextStyle,
        align: Align,
        text: &str,
    ) {
        let encoded = encode(text);
        let text_width = self.text_width(style, text);
        let tx = match align {
            Align::Left => x + CELL_PAD,
            Align::Center => x + (w - text_width) / 2.0,
            Align::Right => x + w - text_width - CELL_PAD,
        };
        // Baseline sits a little below the vertical middle of the cell.
        let baseline = y + h / 2.0 + 0.35 * style.size / MM_TO_PT;
        let (px, py) = (self.x(tx), self.y(baseline));
        let font = FONT_NAMES[face_index(style.face)];

        let content = &mut self.page().content;
        content.begin_text();
        content.set_font(Name(font), style.size);
        content.next_line(px, py);
        content.show(Str(&encoded));
        content.end_text();
    }

    fn tag_cell(&mut self, x: f32, y: f32, w: f32, h: f32, style: TextStyle, text: &str) {
        let (rx, ry) = (self.x(x), self.y(y + h));
        let (rw, rh) = (w * MM_TO_PT, h * MM_TO_PT);
        {
            let content = &mut self.page().content;
            content.set_fill_rgb(1.0, 1.0, 1.0);
            content.rect(rx, ry, rw, rh);
            content.fill_nonzero();
            content.set_fill_rgb(0.0, 0.0, 0.0);
            content.set_line_width(0.05 * MM_TO_PT);
            content.rect(rx, ry, rw, rh);
            content.stroke();
        }
        self.text_cell(x, y, w, h, style, Align::Center, text);
    }

    fn image(&mut self, source: &Path, x: f32, y: f32, w: f32, h: f32) {
        let Some(img) = self.embed_image(source) else {
            return;
        };

        // Fit into the box preserving aspect ratio, centered.
        let scale = (w / img.px_w as f32).min(h / img.px_h as f32);
        let (dw, dh) = (img.px_w as f32 * scale, img.px_h as f32 * scale);
        let dx = x + (w - dw) / 2.0;
        let dy = y + (h - dh) / 2.0;

        let name = format!("Im{}", img.id.get());
        let (tx, ty) = (self.x(dx), self.y(dy + dh));

        let page = self.page();
        if !page.images.iter().any(|(n, _)| *n == name) {
            page.images.push((name.clone(), img.id));
        }
        let content = &mut page.content;
        content.save_state();
        content.transform([dw * MM_TO_PT, 0.0, 0.0, dh * MM_TO_PT, tx, ty]);
        content.x_object(Name(name.as_bytes()));
        content.restore_state();
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, pen: Pen) {
        let (ax, ay) = (self.x(x1), self.y(y1));
        let (bx, by) = (self.x(x2), self.y(y2));

        let content = &mut self.page().content;
        content.set_line_width(pen.width * MM_TO_PT);
        if pen.dashed {
            content.set_dash_pattern([MM_TO_PT, MM_TO_PT], 0.0);
        }
        content.move_to(ax, ay);
        content.line_to(bx, by);
        content.stroke();
        if pen.dashed {
            content.set_dash_pattern(std::iter::empty::<f32>(), 0.0);
        }
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, pen: Pen) {
        let (rx, ry) = (self.x(x), self.y(y + h));

        let content = &mut self.page().content;
        content.set_line_width(pen.width * MM_TO_PT);
        if pen.dashed {
            content.set_dash_pattern([MM_TO_PT, MM_TO_PT], 0.0);
        }
        content.rect(rx, ry, w * MM_TO_PT, h * MM_TO_PT);
        content.stroke();
        if pen.dashed {
            content.set_dash_pattern(std::iter::empty::<f32>(), 0.0);
        }
    }

    fn text_width(&self, style: TextStyle, text: &str) -> f32 {
        let table = widths(style.face);
        let units: u32 = encode(text)
            .iter()
            .map(|&b| u32::from(table[(b - 0x20) as usize]))
            .sum();
        units as f32 / 1000.0 * style.size / MM_TO_PT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUE: TextStyle = TextStyle::new(Face::Regular, 12.0);

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn empty_document_is_still_a_pdf() {
        let canvas = PdfCanvas::new(148.0, 210.0);
        let bytes = canvas.finish();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn one_page_object_per_started_page() {
        let mut canvas = PdfCanvas::new(148.0, 210.0);
        canvas.start_page();
        canvas.text_cell(10.0, 10.0, 100.0, 10.0, VALUE, Align::Left, "hello");
        canvas.start_page();
        canvas.line(10.0, 20.0, 100.0, 20.0, Pen::dashed(0.05));

        let bytes = canvas.finish();
        assert!(contains(&bytes, b"/Count 2"));
    }

    #[test]
    fn text_width_follows_the_metrics() {
        let canvas = PdfCanvas::new(148.0, 210.0);
        let narrow = canvas.text_width(VALUE, "iiii");
        let wide = canvas.text_width(VALUE, "WWWW");
        assert!(narrow < wide);

        // 4 x 500/1000 em at 12 pt, in millimetres.
        let digits = canvas.text_width(VALUE, "1234");
        assert!((digits - 4.0 * 0.5 * 12.0 / MM_TO_PT).abs() < 1e-4);
    }

    #[test]
    fn non_ascii_text_degrades_to_question_marks() {
        assert_eq!(encode("częsć"), b"cz?s?");
    }

    #[test]
    fn unreadable_image_draws_nothing() {
        let mut canvas = PdfCanvas::new(148.0, 210.0);
        canvas.start_page();
        canvas.image(Path::new("/nonexistent/part.png"), 100.0, 20.0, 30.0, 30.0);
        let bytes = canvas.finish();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(!contains(&bytes, b"/XObject"));
    }
}
