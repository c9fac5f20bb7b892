//! Report page layout
//!
//! A5 portrait pages, five fixed-geometry blocks per page. Each block holds
//! two caption/value row pairs on the left, a 30x30 thumbnail frame on the
//! right, a running `{rank}/{total}` tag over the thumbnail, dashed internal
//! separators and a solid outer border. The title and footer are reissued on
//! every page.

use chrono::{DateTime, Local};
use clap::ValueEnum;

use crate::core::detail::{Component, Detail, Profile};
use crate::report::canvas::{Align, Face, PageCanvas, Pen, TextStyle};

/// Page size in millimetres (A5 portrait).
pub const PAGE_WIDTH: f32 = 148.0;
pub const PAGE_HEIGHT: f32 = 210.0;

/// Records per physical page.
pub const SLOTS_PER_PAGE: usize = 5;

const MARGIN: f32 = 10.0;
const TITLE_HEIGHT: f32 = 10.0;
const FOOTER_TOP: f32 = PAGE_HEIGHT - 15.0;
const FOOTER_ROW: f32 = 5.0;

/// Vertical band of one block and the offset of the first one.
const SLOT_HEIGHT: f32 = 30.0;
const FIRST_SLOT_TOP: f32 = 20.0;

const LABEL_WIDTH: f32 = 75.0;
const COUNT_WIDTH: f32 = 15.0;
const DIVIDER_X: f32 = 85.0;
const IMAGE_X: f32 = 100.0;
const IMAGE_SIZE: f32 = 30.0;
const BLOCK_WIDTH: f32 = 120.0;

const CAPTION_HEIGHT: f32 = 6.0;
const VALUE_HEIGHT: f32 = 15.0;

/// Counter tag position within a slot.
const TAG_TOP: f32 = 25.5;
const TAG_HEIGHT: f32 = 4.5;
const TAG_PAD: f32 = 2.0;

const CAPTION: TextStyle = TextStyle::new(Face::Italic, 6.0);
const VALUE: TextStyle = TextStyle::new(Face::Regular, 12.0);
const TITLE: TextStyle = TextStyle::new(Face::Bold, 20.0);
const FOOTER: TextStyle = TextStyle::new(Face::Italic, 10.0);

const THIN: Pen = Pen::solid(0.05);
const DASH: Pen = Pen::dashed(0.05);
const BORDER: Pen = Pen::solid(0.4);

/// Glyphs the report font is known to cover; anything else is dropped from
/// printed labels.
const SUPPORTED: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789,.-!? '\"()[]{}#_+";

const DISCLAIMER: &str = "Generated automatically; the layout is still under evaluation.";
const CONTACT: &str = "Report any discrepancies to the production engineering office.";

/// Placement of the every-fifth page break. Both placements exist on the
/// shop machines, so the trigger is selectable rather than fixed.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageBreak {
    /// A page opens before records 1, 6, 11, ...
    BeforeGroup,
    /// One page opens up front; a new one opens after records 5, 10, ...
    AfterGroup,
}

impl PageBreak {
    /// The trigger placement each profile shipped with.
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Thickness => PageBreak::BeforeGroup,
            Profile::Sheet => PageBreak::AfterGroup,
        }
    }
}

pub struct LayoutOptions {
    pub page_break: PageBreak,
    pub generated_at: DateTime<Local>,
}

/// Lay the detail's components out onto report pages.
///
/// The caller guarantees at least one component; an empty detail must not
/// reach the layout engine.
pub fn render(detail: &Detail, canvas: &mut dyn PageCanvas, opts: &LayoutOptions) {
    let total = detail.components.len();

    if opts.page_break == PageBreak::AfterGroup {
        open_page(canvas, detail, opts);
    }

    for (index, component) in detail.components.iter().enumerate() {
        if opts.page_break == PageBreak::BeforeGroup && index % SLOTS_PER_PAGE == 0 {
            open_page(canvas, detail, opts);
        }

        draw_block(canvas, component, index, total);

        if opts.page_break == PageBreak::AfterGroup && (index + 1) % SLOTS_PER_PAGE == 0 {
            open_page(canvas, detail, opts);
        }
    }
}

/// Remove every glyph outside the supported set.
pub fn sanitize(label: &str) -> String {
    label.chars().filter(|c| SUPPORTED.contains(*c)).collect()
}

fn open_page(canvas: &mut dyn PageCanvas, detail: &Detail, opts: &LayoutOptions) {
    canvas.start_page();

    let span = PAGE_WIDTH - 2.0 * MARGIN;
    canvas.text_cell(
        MARGIN,
        MARGIN,
        span,
        TITLE_HEIGHT,
        TITLE,
        Align::Center,
        &format!("SN {}", detail.serial()),
    );

    canvas.text_cell(MARGIN, FOOTER_TOP, span, FOOTER_ROW, FOOTER, Align::Left, DISCLAIMER);
    canvas.text_cell(
        MARGIN,
        FOOTER_TOP,
        span,
        FOOTER_ROW,
        FOOTER,
        Align::Right,
        "Generated:",
    );
    canvas.text_cell(
        MARGIN,
        FOOTER_TOP + FOOTER_ROW,
        span,
        FOOTER_ROW,
        FOOTER,
        Align::Left,
        CONTACT,
    );
    canvas.text_cell(
        MARGIN,
        FOOTER_TOP + FOOTER_ROW,
        span,
        FOOTER_ROW,
        FOOTER,
        Align::Right,
        &opts.generated_at.format("%d.%m.%y %H:%M").to_string(),
    );
}

fn draw_block(canvas: &mut dyn PageCanvas, component: &Component, index: usize, total: usize) {
    let top = FIRST_SLOT_TOP + SLOT_HEIGHT * (index % SLOTS_PER_PAGE) as f32;

    canvas.text_cell(MARGIN, top, LABEL_WIDTH, CAPTION_HEIGHT, CAPTION, Align::Left, "Name:");
    canvas.text_cell(
        DIVIDER_X,
        top,
        COUNT_WIDTH,
        CAPTION_HEIGHT,
        CAPTION,
        Align::Left,
        "Per set:",
    );
    canvas.text_cell(
        MARGIN,
        top,
        LABEL_WIDTH,
        VALUE_HEIGHT,
        VALUE,
        Align::Left,
        &sanitize(&component.raw_name),
    );
    canvas.text_cell(
        DIVIDER_X,
        top,
        COUNT_WIDTH,
        VALUE_HEIGHT,
        VALUE,
        Align::Left,
        &component.count.to_string(),
    );

    let lower = top + VALUE_HEIGHT;
    canvas.text_cell(MARGIN, lower, LABEL_WIDTH, CAPTION_HEIGHT, CAPTION, Align::Left, "Sheet:");
    canvas.text_cell(
        DIVIDER_X,
        lower,
        COUNT_WIDTH,
        CAPTION_HEIGHT,
        CAPTION,
        Align::Left,
        "Engraver:",
    );
    canvas.text_cell(
        MARGIN,
        lower,
        LABEL_WIDTH,
        VALUE_HEIGHT,
        VALUE,
        Align::Left,
        &sanitize(&component.sheet),
    );
    canvas.text_cell(
        DIVIDER_X,
        lower,
        COUNT_WIDTH,
        VALUE_HEIGHT,
        VALUE,
        Align::Left,
        if component.engraver { "Yes" } else { "No" },
    );

    canvas.rect(IMAGE_X, top, IMAGE_SIZE, IMAGE_SIZE, THIN);
    canvas.image(&component.source, IMAGE_X, top, IMAGE_SIZE, IMAGE_SIZE);

    let tag = format!("{}/{}", index + 1, total);
    let tag_width = canvas.text_width(VALUE, &tag) + TAG_PAD;
    canvas.tag_cell(IMAGE_X, top + TAG_TOP, tag_width, TAG_HEIGHT, VALUE, &tag);

    canvas.line(MARGIN, top + VALUE_HEIGHT, IMAGE_X, top + VALUE_HEIGHT, DASH);
    canvas.line(DIVIDER_X, top, DIVIDER_X, top + SLOT_HEIGHT, DASH);

    canvas.rect(MARGIN, top, BLOCK_WIDTH, SLOT_HEIGHT, BORDER);
}
