use std::fs;
use std::path::PathBuf;

use xtal_figures::FigureError;
use xtal_figures::config::ValidationConfig;
use xtal_figures::figures::validation;

fn unique_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    // Name last so the extension picks the output format.
    path.push(format!(
        "xtal_figures_validation_{}_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos(),
        name
    ));
    path
}

#[test]
fn renders_scatter_with_highlighted_rows() {
    let input = unique_path("comp.csv");
    let output = unique_path("fig2.svg");
    fs::write(&input, "dist1,dist2\n0.0005,0.001\n1.0,1.2\n0.4,0.35\n").unwrap();

    let cfg = ValidationConfig {
        input: input.clone(),
        output: output.clone(),
        ..ValidationConfig::default()
    };
    let summary = validation::run(&cfg).unwrap();
    assert_eq!(summary.n_rows, 3);
    assert_eq!(summary.n_highlighted, 1);

    let svg = fs::read_to_string(&output).expect("figure written");
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Distortion (This work)"));

    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&output);
}

#[test]
fn default_output_is_pdf() {
    let input = unique_path("comp_pdf.csv");
    let output = unique_path("fig2.pdf");
    fs::write(&input, "dist1,dist2\n0.0005,0.001\n1.0,1.2\n").unwrap();

    let cfg = ValidationConfig {
        input: input.clone(),
        output: output.clone(),
        ..ValidationConfig::default()
    };
    assert_eq!(
        ValidationConfig::default().output.extension().and_then(|e| e.to_str()),
        Some("pdf")
    );
    validation::run(&cfg).unwrap();

    let bytes = fs::read(&output).expect("figure written");
    assert!(bytes.starts_with(b"%PDF-"));

    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&output);
}

#[test]
fn missing_input_writes_nothing() {
    let output = unique_path("never.svg");
    let cfg = ValidationConfig {
        input: unique_path("missing.csv"),
        output: output.clone(),
        ..ValidationConfig::default()
    };
    let err = validation::run(&cfg).unwrap_err();
    assert!(matches!(err, FigureError::File { .. }));
    assert!(!output.exists());
}

#[test]
fn malformed_row_is_parse_error() {
    let input = unique_path("ragged.csv");
    let output = unique_path("ragged.svg");
    fs::write(&input, "dist1,dist2\n0.1,0.2\n0.3\n").unwrap();

    let cfg = ValidationConfig {
        input: input.clone(),
        output: output.clone(),
        ..ValidationConfig::default()
    };
    let err = validation::run(&cfg).unwrap_err();
    assert!(matches!(err, FigureError::Parse { line: 3, .. }));
    assert!(!output.exists());

    let _ = fs::remove_file(&input);
}
