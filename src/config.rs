use crate::core::histogram::{Clip, ClipPolicy};
use crate::error::{FigureError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Literal counts from the published stoichiometry panel.
pub const PUBLISHED_STOICHIOMETRY: [u64; 5] = [20, 934, 2078, 1382, 100];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "ValidationConfig::default_input")]
    pub input: PathBuf,
    #[serde(default = "ValidationConfig::default_output")]
    pub output: PathBuf,
    /// Rows with `dist1` below this are drawn highlighted.
    #[serde(default = "ValidationConfig::default_threshold")]
    pub threshold: f64,
    #[serde(default = "ValidationConfig::default_axis_min")]
    pub axis_min: f64,
    #[serde(default = "ValidationConfig::default_axis_max")]
    pub axis_max: f64,
    /// The dashed y = x guide spans 0..guide_max.
    #[serde(default = "ValidationConfig::default_guide_max")]
    pub guide_max: f64,
}

impl ValidationConfig {
    fn default_input() -> PathBuf {
        PathBuf::from("Comp.csv")
    }
    fn default_output() -> PathBuf {
        PathBuf::from("Fig2-validation.pdf")
    }
    fn default_threshold() -> f64 {
        0.001
    }
    fn default_axis_min() -> f64 {
        -0.1
    }
    fn default_axis_max() -> f64 {
        2.3
    }
    fn default_guide_max() -> f64 {
        2.5
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            input: Self::default_input(),
            output: Self::default_output(),
            threshold: Self::default_threshold(),
            axis_min: Self::default_axis_min(),
            axis_max: Self::default_axis_max(),
            guide_max: Self::default_guide_max(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StoichiometrySource {
    /// Bars come from the formulas in the input table.
    #[default]
    Computed,
    /// Bars reproduce the published figure verbatim.
    Published,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "StatsConfig::default_input")]
    pub input: PathBuf,
    #[serde(default = "StatsConfig::default_output")]
    pub output: PathBuf,
    /// Distortion tolerance (Å) for the joint count.
    #[serde(default = "StatsConfig::default_d_tol")]
    pub d_tol: f64,
    /// |ΔE| tolerance (eV/atom) for the joint count.
    #[serde(default = "StatsConfig::default_e_tol")]
    pub e_tol: f64,
    #[serde(default = "StatsConfig::default_bins")]
    pub distortion_bins: usize,
    #[serde(default = "StatsConfig::default_distortion_x_max")]
    pub distortion_x_max: f64,
    #[serde(default = "StatsConfig::default_bins")]
    pub energy_bins: usize,
    #[serde(default = "StatsConfig::default_energy_clip")]
    pub energy_clip: Clip,
    /// eV/atom -> meV/atom.
    #[serde(default = "StatsConfig::default_energy_scale")]
    pub energy_scale: f64,
    #[serde(default)]
    pub stoichiometry_source: StoichiometrySource,
    /// Line width per relation count in the point-group panel.
    #[serde(default = "StatsConfig::default_relation_weight")]
    pub relation_weight: f64,
}

impl StatsConfig {
    fn default_input() -> PathBuf {
        PathBuf::from("2022_all_pairs.csv")
    }
    fn default_output() -> PathBuf {
        PathBuf::from("Fig3-stat.pdf")
    }
    fn default_d_tol() -> f64 {
        1.0
    }
    fn default_e_tol() -> f64 {
        0.2
    }
    fn default_bins() -> usize {
        50
    }
    fn default_distortion_x_max() -> f64 {
        1.8
    }
    fn default_energy_clip() -> Clip {
        Clip {
            lo: -0.5,
            hi: 0.5,
            policy: ClipPolicy::Discard,
        }
    }
    fn default_energy_scale() -> f64 {
        1000.0
    }
    fn default_relation_weight() -> f64 {
        0.01
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            input: Self::default_input(),
            output: Self::default_output(),
            d_tol: Self::default_d_tol(),
            e_tol: Self::default_e_tol(),
            distortion_bins: Self::default_bins(),
            distortion_x_max: Self::default_distortion_x_max(),
            energy_bins: Self::default_bins(),
            energy_clip: Self::default_energy_clip(),
            energy_scale: Self::default_energy_scale(),
            stoichiometry_source: StoichiometrySource::default(),
            relation_weight: Self::default_relation_weight(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FiguresConfig {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

impl FiguresConfig {
    /// Reads `path`. A missing file yields the defaults and leaves the
    /// filesystem untouched; an unreadable or invalid file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(FigureError::Config(format!(
                    "failed to read {}: {err}",
                    path.display()
                )));
            }
        };
        toml::from_str(&contents)
            .map_err(|err| FigureError::Config(format!("invalid {}: {err}", path.display())))
    }

    /// Writes the defaults to `path` as a commented template. An existing
    /// file is left alone unless `force` is set.
    pub fn write_template(path: impl AsRef<Path>, force: bool) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !force {
            return Err(FigureError::Config(format!(
                "{} already exists; pass --force to overwrite",
                path.display()
            )));
        }
        let text = toml::to_string_pretty(&Self::default())
            .map_err(|err| FigureError::Config(format!("failed to serialize defaults: {err}")))?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| FigureError::file(dir, e))?;
        }
        fs::write(path, comment_out(&text)).map_err(|e| FigureError::file(path, e))
    }
}

// Top-level table headers stay live; keys and nested tables are commented so
// the written file documents the defaults without pinning them.
fn comment_out(text: &str) -> String {
    let mut commented = String::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            commented.push('\n');
        } else if trimmed.starts_with('[') && trimmed.ends_with(']') && !trimmed.contains('.') {
            commented.push_str(line);
            commented.push('\n');
        } else {
            commented.push_str("# ");
            commented.push_str(line);
            commented.push('\n');
        }
    }
    commented
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "xtal_figures_config_test_{}_{}",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        p
    }

    #[test]
    fn missing_file_gives_defaults_without_writing() {
        let path = unique_path("missing.toml");
        let _ = fs::remove_file(&path);

        let cfg = FiguresConfig::load(&path).expect("defaults");
        assert!(!path.exists(), "loading must not create the config file");
        assert_eq!(cfg.validation.threshold, 0.001);
        assert_eq!(cfg.validation.input, PathBuf::from("Comp.csv"));
        assert_eq!(cfg.validation.output, PathBuf::from("Fig2-validation.pdf"));
        assert_eq!(cfg.stats.output, PathBuf::from("Fig3-stat.pdf"));
        assert_eq!(cfg.stats.d_tol, 1.0);
        assert_eq!(cfg.stats.e_tol, 0.2);
        assert_eq!(cfg.stats.distortion_bins, 50);
        assert_eq!(cfg.stats.energy_clip.lo, -0.5);
        assert_eq!(cfg.stats.stoichiometry_source, StoichiometrySource::Computed);
    }

    #[test]
    fn template_is_commented_and_parses_to_defaults() {
        let path = unique_path("template.toml");
        let _ = fs::remove_file(&path);

        FiguresConfig::write_template(&path, false).expect("write template");
        let contents = fs::read_to_string(&path).expect("read written config");
        assert!(contents.contains("[validation]"));
        assert!(contents.contains("# threshold = 0.001"));
        assert!(contents.contains("# stoichiometry_source = \"computed\""));

        let again = FiguresConfig::load(&path).expect("template parses");
        assert_eq!(again.stats.energy_bins, 50);

        // A second write without force keeps the existing file.
        fs::write(&path, "[stats]\nd_tol = 0.25\n").unwrap();
        let err = FiguresConfig::write_template(&path, false).unwrap_err();
        assert!(matches!(err, FigureError::Config(_)));
        assert_eq!(FiguresConfig::load(&path).unwrap().stats.d_tol, 0.25);

        FiguresConfig::write_template(&path, true).expect("forced write");
        assert_eq!(FiguresConfig::load(&path).unwrap().stats.d_tol, 1.0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_reads_existing() {
        let path = unique_path("custom.toml");
        let text = r#"
[validation]
threshold = 0.01
output = "out/validation.svg"

[stats]
d_tol = 0.5
stoichiometry_source = "published"
energy_clip = { lo = -1.0, hi = 1.0, policy = "clamp" }
"#;
        fs::write(&path, text).unwrap();

        let cfg = FiguresConfig::load(&path).expect("valid config");
        assert_eq!(cfg.validation.threshold, 0.01);
        assert_eq!(cfg.validation.output, PathBuf::from("out/validation.svg"));
        assert_eq!(cfg.validation.axis_max, 2.3);
        assert_eq!(cfg.stats.d_tol, 0.5);
        assert_eq!(cfg.stats.e_tol, 0.2);
        assert_eq!(cfg.stats.stoichiometry_source, StoichiometrySource::Published);
        assert_eq!(cfg.stats.energy_clip.policy, ClipPolicy::Clamp);
        assert_eq!(cfg.stats.energy_clip.hi, 1.0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let path = unique_path("broken.toml");
        fs::write(&path, "[stats\nd_tol = ").unwrap();
        let err = FiguresConfig::load(&path).unwrap_err();
        assert!(matches!(err, FigureError::Config(_)));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn mistyped_value_is_config_error() {
        let path = unique_path("mistyped.toml");
        fs::write(&path, "[validation]\nthreshold = \"0.01\"\n").unwrap();
        let err = FiguresConfig::load(&path).unwrap_err();
        match err {
            FigureError::Config(message) => assert!(message.contains("threshold"), "{message}"),
            other => panic!("expected config error, got {other:?}"),
        }
        let _ = fs::remove_file(&path);
    }
}
