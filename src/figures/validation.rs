// figures/validation.rs
// Method-comparison scatter: distortion from this work against the reference.

use std::path::Path;

use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use tracing::info;

use crate::config::ValidationConfig;
use crate::core::partition::{Partition, partition_below};
use crate::core::table::load_comparisons;
use crate::error::Result;
use crate::figures::{DrawResult, write_figure};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationSummary {
    pub n_rows: usize,
    pub n_highlighted: usize,
}

pub fn run(cfg: &ValidationConfig) -> Result<ValidationSummary> {
    let records = load_comparisons(&cfg.input)?;
    let dist1: Vec<f64> = records.iter().map(|r| r.dist1).collect();
    let dist2: Vec<f64> = records.iter().map(|r| r.dist2).collect();

    let partition = partition_below(&dist1, &dist2, cfg.threshold)?;
    info!(
        rows = records.len(),
        highlighted = partition.highlighted.len(),
        threshold = cfg.threshold,
        "partitioned comparison table"
    );

    render_validation(&cfg.output, cfg, &dist1, &dist2, &partition)?;
    info!("Saved validation figure to {}", cfg.output.display());

    Ok(ValidationSummary {
        n_rows: records.len(),
        n_highlighted: partition.highlighted.len(),
    })
}

pub fn render_validation(
    out_path: &Path,
    cfg: &ValidationConfig,
    dist1: &[f64],
    dist2: &[f64],
    partition: &Partition,
) -> Result<()> {
    write_figure(out_path, (600, 500), |root| {
        draw_validation(root, cfg, dist1, dist2, partition)
    })
}

fn draw_validation<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    cfg: &ValidationConfig,
    dist1: &[f64],
    dist2: &[f64],
    partition: &Partition,
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let axis = cfg.axis_min..cfg.axis_max;

    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(axis.clone(), axis)?;

    chart
        .configure_mesh()
        .x_desc("Distortion (Smidt et al)")
        .y_desc("Distortion (This work)")
        .x_label_style(("sans-serif", 15).into_font().color(&BLUE))
        .y_label_style(("sans-serif", 15).into_font().color(&RED))
        .axis_desc_style(("sans-serif", 18))
        .draw()?;

    let (highlighted, rest) = partition.points(dist1, dist2);
    chart.draw_series(rest.map(|(x, y)| Circle::new((x, y), 2, BLUE.filled())))?;
    chart.draw_series(highlighted.map(|(x, y)| Circle::new((x, y), 2, GREEN.filled())))?;

    chart.draw_series(DashedLineSeries::new(
        vec![(0.0, 0.0), (cfg.guide_max, cfg.guide_max)],
        8,
        5,
        BLACK.mix(0.3).stroke_width(1),
    ))?;

    Ok(())
}
