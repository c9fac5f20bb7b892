//! Report generation
//!
//! The layout engine turns an ordered component list into drawing calls;
//! the assembler here owns the outer contract: no pages for an empty
//! detail, on-demand output directory, deterministic artifact name.

pub mod canvas;
pub mod layout;
pub mod pdf;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::detail::Detail;
use self::layout::LayoutOptions;
use self::pdf::PdfCanvas;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no components found for SN {0}")]
    Empty(String),

    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Render `detail` into `out_dir/SN_{serial}.pdf`, creating the directory
/// on demand. Fails with [`ReportError::Empty`] before any page exists when
/// the detail has no components.
pub fn write_report(
    detail: &Detail,
    opts: &LayoutOptions,
    out_dir: &Path,
) -> Result<PathBuf, ReportError> {
    if detail.components.is_empty() {
        return Err(ReportError::Empty(detail.serial().to_string()));
    }

    let mut canvas = PdfCanvas::new(layout::PAGE_WIDTH, layout::PAGE_HEIGHT);
    layout::render(detail, &mut canvas, opts);

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("SN_{}.pdf", detail.serial()));
    fs::write(&path, canvas.finish())?;
    Ok(path)
}
