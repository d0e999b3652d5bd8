// figures/mod.rs
// Pipelines that turn the comparison tables into PDF or SVG figures.

pub mod stats;
pub mod validation;

use std::error::Error;
use std::fs::create_dir_all;
use std::io::Write;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use svg2pdf::usvg;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{FigureError, Result};

pub(crate) type DrawResult = std::result::Result<(), Box<dyn Error>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FigureFormat {
    Pdf,
    Svg,
}

impl FigureFormat {
    /// `.svg` (any case) selects SVG; every other path is written as PDF.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Pdf,
        }
    }
}

/// Draw into an in-memory SVG, convert it when the output is PDF, and
/// move the finished bytes into place. A failed draw or conversion never
/// touches `out_path`.
pub(crate) fn write_figure<F>(out_path: &Path, size: (u32, u32), draw: F) -> Result<()>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> DrawResult,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw(&root).map_err(|e| FigureError::Render(e.to_string()))?;
        root.present().map_err(|e| FigureError::Render(e.to_string()))?;
    }
    let bytes = match FigureFormat::from_path(out_path) {
        FigureFormat::Svg => svg.into_bytes(),
        FigureFormat::Pdf => svg_to_pdf(&svg)?,
    };
    write_atomic(out_path, &bytes)
}

fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| FigureError::Render(format!("svg parse: {e}")))?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| FigureError::Render(format!("pdf conversion: {e}")))
}

/// Write through a temp file in the destination directory and rename it over
/// `out_path`, so readers see either the old file or the complete new one.
fn write_atomic(out_path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match out_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        Some(dir) => {
            create_dir_all(dir).map_err(|e| FigureError::file(dir, e))?;
            dir
        }
        None => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| FigureError::file(dir, e))?;
    tmp.write_all(bytes).map_err(|e| FigureError::file(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| FigureError::file(tmp.path(), e))?;
    tmp.persist(out_path).map_err(|e| FigureError::file(out_path, e.error))?;
    debug!(bytes = bytes.len(), "wrote {}", out_path.display());
    Ok(())
}

/// Min and max of a sample, `None` when empty.
pub fn extent(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().copied().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
