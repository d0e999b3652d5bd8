// figures/stats.rs
// Structure-pair statistics: stoichiometry, distortion, energy and
// point-group relation panels.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info};

use crate::config::{PUBLISHED_STOICHIOMETRY, StatsConfig, StoichiometrySource};
use crate::core::formula::{MAX_ELEMENTS, STOICHIOMETRY_LABELS, StoichiometryCounts};
use crate::core::histogram::{Histogram, histogram};
use crate::core::joint::{JointCounts, count_joint};
use crate::core::point_group::{N_POINT_GROUPS, POINT_GROUP_SYMBOLS};
use crate::core::relations::PointGroupRelations;
use crate::core::table::{StructurePair, load_structure_pairs};
use crate::error::Result;
use crate::figures::{DrawResult, extent, write_figure};

const FIG_SIZE: (u32, u32) = (1800, 800);
const TOP_ROW_HEIGHT: u32 = 400;
// Width ratios of the top row panels (a), (b), (c).
const WIDTH_RATIOS: [f64; 3] = [1.8, 1.5, 1.5];

const ORANGE: RGBColor = RGBColor(255, 165, 0);
const PURPLE: RGBColor = RGBColor(128, 0, 128);
const BAR_COLORS: [RGBColor; MAX_ELEMENTS] = [RED, YELLOW, BLACK, BLUE, ORANGE, PURPLE, GREEN];

/// Everything the statistics figure shows, computed before any drawing.
#[derive(Clone, Debug)]
pub struct StructureStats {
    pub n_pairs: usize,
    pub stoichiometry: StoichiometryCounts,
    pub joint: JointCounts,
    pub distortion: Histogram,
    /// Energy histogram after clipping, in scaled units (meV/atom by default).
    pub energy: Histogram,
    pub energy_retained: usize,
    pub relations: PointGroupRelations,
}

impl StructureStats {
    pub fn compute(pairs: &[StructurePair], cfg: &StatsConfig) -> Result<Self> {
        let stoichiometry =
            StoichiometryCounts::from_formulas(pairs.iter().map(|p| p.formula.as_str()))?;
        info!(slots = ?stoichiometry.slots(), "stoichiometry counts");

        let de: Vec<f64> = pairs.iter().map(|p| p.de).collect();
        let dist: Vec<f64> = pairs.iter().map(|p| p.dist).collect();

        let joint = count_joint(&dist, &de, cfg.d_tol, cfg.e_tol)?;
        info!(
            "Good {} {:.4}; de {} {:.4}; dist {} {:.4}",
            joint.joint,
            joint.joint_frac(),
            joint.second,
            joint.second_frac(),
            joint.first,
            joint.first_frac()
        );

        let distortion = histogram(&dist, Some(cfg.distortion_bins), None)?;

        if let Some((lo, hi)) = extent(&de) {
            info!(n = de.len(), min = lo, max = hi, "energy difference before clipping");
        }
        let clipped = cfg.energy_clip.apply(&de);
        if let Some((lo, hi)) = extent(&clipped) {
            info!(n = clipped.len(), min = lo, max = hi, "energy difference after clipping");
        }
        let energy =
            histogram(&clipped, Some(cfg.energy_bins), None)?.scaled(cfg.energy_scale);

        let relations = PointGroupRelations::accumulate(
            pairs.iter().map(|p| (u32::from(p.spg1), u32::from(p.spg2))),
        )?;
        for (i, j, count) in relations.nonzero() {
            debug!(from = POINT_GROUP_SYMBOLS[i], to = POINT_GROUP_SYMBOLS[j], count, "relation");
        }

        Ok(Self {
            n_pairs: pairs.len(),
            stoichiometry,
            joint,
            distortion,
            energy,
            energy_retained: clipped.len(),
            relations,
        })
    }

    /// Bars for panel (a): at least up to pentanary, further when the data
    /// holds compounds with more elements.
    pub fn stoichiometry_bars(&self, source: StoichiometrySource) -> Vec<(&'static str, u64)> {
        match source {
            StoichiometrySource::Computed => {
                let n = self.stoichiometry.max_elements().max(5);
                (1..=n)
                    .map(|k| (STOICHIOMETRY_LABELS[k - 1], self.stoichiometry.get(k)))
                    .collect()
            }
            StoichiometrySource::Published => STOICHIOMETRY_LABELS
                .iter()
                .copied()
                .zip(PUBLISHED_STOICHIOMETRY)
                .collect(),
        }
    }
}

pub fn run(cfg: &StatsConfig) -> Result<StructureStats> {
    let pairs = load_structure_pairs(&cfg.input)?;
    let stats = StructureStats::compute(&pairs, cfg)?;
    render_stats(&cfg.output, cfg, &stats)?;
    info!("Saved statistics figure to {}", cfg.output.display());
    Ok(stats)
}

pub fn render_stats(out_path: &Path, cfg: &StatsConfig, stats: &StructureStats) -> Result<()> {
    write_figure(out_path, FIG_SIZE, |root| {
        root.fill(&WHITE)?;
        let (top, bottom) = root.split_vertically(TOP_ROW_HEIGHT);

        let total: f64 = WIDTH_RATIOS.iter().sum();
        let w_a = (FIG_SIZE.0 as f64 * WIDTH_RATIOS[0] / total).round() as u32;
        let w_b = (FIG_SIZE.0 as f64 * WIDTH_RATIOS[1] / total).round() as u32;
        let (panel_a, rest) = top.split_horizontally(w_a);
        let (panel_b, panel_c) = rest.split_horizontally(w_b);

        draw_stoichiometry(&panel_a, &stats.stoichiometry_bars(cfg.stoichiometry_source))?;
        draw_histogram(
            &panel_b,
            &stats.distortion,
            "(b) Distortion",
            "Atomic distortion (Å)",
            Some(cfg.distortion_x_max),
            RED,
        )?;
        draw_histogram(
            &panel_c,
            &stats.energy,
            "(c) Energy difference",
            "ΔE (meV/atom)",
            None,
            BLUE,
        )?;
        draw_relations(&bottom, &stats.relations, cfg.relation_weight)?;
        Ok(())
    })
}

fn draw_stoichiometry<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    bars: &[(&'static str, u64)],
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let n = bars.len() as u32;
    let y_max = bars
        .iter()
        .map(|(_, c)| *c as f64 * 2.0)
        .fold(8000.0f64, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption("(a) Stoichiometry", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..n).into_segmented(), (1.0f64..y_max).log_scale())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .y_desc("Count")
        .x_labels(bars.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => bars
                .get(*i as usize)
                .map(|(name, _)| name.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    let label_style = TextStyle::from(("sans-serif", 15).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    for (i, (_, count)) in bars.iter().enumerate() {
        // Log axis: an empty bar has nothing to draw.
        if *count == 0 {
            continue;
        }
        let i = i as u32;
        let height = *count as f64;
        let color = BAR_COLORS[i as usize % BAR_COLORS.len()];
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 1.0), (SegmentValue::Exact(i + 1), height)],
            color.filled(),
        );
        bar.set_margin(0, 0, 12, 12);
        chart.draw_series(std::iter::once(bar))?;
        chart.draw_series(std::iter::once(Text::new(
            count.to_string(),
            (SegmentValue::CenterOf(i), height * 1.1),
            label_style.clone(),
        )))?;
    }
    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    hist: &Histogram,
    caption: &str,
    x_desc: &str,
    x_max: Option<f64>,
    color: RGBColor,
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let (lo, hi) = hist.range();
    let (x_min, x_max) = match x_max {
        Some(m) => (lo.min(0.0), m),
        None => (lo, hi),
    };
    let y_max = (hist.max_count() as f64 * 1.1).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, 0.0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .x_label_style(("sans-serif", 14).into_font().color(&color))
        .axis_desc_style(("sans-serif", 16).into_font().color(&color))
        .draw()?;

    chart.draw_series(
        hist.bars()
            .filter(|(left, _, count)| *count > 0 && *left < x_max)
            .map(|(left, right, count)| {
                Rectangle::new([(left, 0.0), (right.min(x_max), count as f64)], color.filled())
            }),
    )?;
    Ok(())
}

fn draw_relations<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    relations: &PointGroupRelations,
    weight: f64,
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let last = (N_POINT_GROUPS - 1) as f64;
    let mut chart = ChartBuilder::on(area)
        .caption("(d) Point group relation", ("sans-serif", 22))
        .margin(10)
        .build_cartesian_2d(-0.5f64..last + 0.5, -0.3f64..1.3)?;

    // Each relation is a segment from its source group (bottom) to its
    // target group (top); stroke grows with the pair count.
    chart.draw_series(relations.nonzero().map(|(i, j, count)| {
        let w = weight * count as f64;
        let style = BLACK
            .mix(w.clamp(0.05, 1.0))
            .stroke_width((w.round() as u32).max(1));
        PathElement::new(vec![(i as f64, 0.0), (j as f64, 1.0)], style)
    }))?;

    let top_style = TextStyle::from(("sans-serif", 16).into_font())
        .color(&BLUE)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    let bottom_style = TextStyle::from(("sans-serif", 16).into_font())
        .color(&CYAN)
        .pos(Pos::new(HPos::Center, VPos::Top));
    chart.draw_series(POINT_GROUP_SYMBOLS.iter().enumerate().map(|(i, sym)| {
        Text::new(sym.to_string(), (i as f64, 1.05), top_style.clone())
    }))?;
    chart.draw_series(POINT_GROUP_SYMBOLS.iter().enumerate().map(|(i, sym)| {
        Text::new(sym.to_string(), (i as f64, -0.05), bottom_style.clone())
    }))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(formula: &str, de: f64, dist: f64, spg1: u16, spg2: u16) -> StructurePair {
        StructurePair {
            formula: formula.to_string(),
            de,
            dist,
            spg1,
            spg2,
        }
    }

    #[test]
    fn computed_bars_follow_the_data() {
        let pairs = vec![
            pair("Si", 0.01, 0.1, 227, 227),
            pair("NaCl", 0.3, 0.5, 225, 221),
            pair("GaAs", -0.05, 1.2, 216, 186),
        ];
        let stats = StructureStats::compute(&pairs, &StatsConfig::default()).unwrap();
        let bars = stats.stoichiometry_bars(StoichiometrySource::Computed);
        assert_eq!(bars.len(), 5);
        assert_eq!(bars[0], ("Elemental", 1));
        assert_eq!(bars[1], ("Binary", 2));
        assert_eq!(bars[2], ("Ternary", 0));

        let published = stats.stoichiometry_bars(StoichiometrySource::Published);
        assert_eq!(published[1], ("Binary", 934));
        assert_eq!(published.len(), 5);
    }

    #[test]
    fn energy_is_clipped_and_scaled() {
        let pairs = vec![
            pair("Si", 0.4, 0.1, 1, 1),
            pair("Si", -0.2, 0.1, 1, 1),
            pair("Si", 0.7, 0.1, 1, 1),
        ];
        let stats = StructureStats::compute(&pairs, &StatsConfig::default()).unwrap();
        assert_eq!(stats.energy_retained, 2);
        assert_eq!(stats.energy.total(), 2);
        let (lo, hi) = stats.energy.range();
        assert!((lo + 200.0).abs() < 1e-9 && (hi - 400.0).abs() < 1e-9);
        assert_eq!(stats.distortion.total(), 3);
        assert_eq!(stats.relations.get(0, 0), 3);
    }
}
