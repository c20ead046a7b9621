//! File-based pipeline validation: text matrices in, posterior matrix out

use loopypatch::io::cli::{Cli, InferenceRunner};
use loopypatch::io::matrix::read_matrix;
use std::fs;
use std::path::{Path, PathBuf};

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let dictionary_path = dir.join("dictionary.txt");
    let candidates_path = dir.join("candidates.txt");
    let priors_path = dir.join("priors.txt");

    // Two 2x2 patches: flat and checkerboard
    assert!(fs::write(&dictionary_path, "0 0 0 0\n0 255 255 0\n").is_ok());
    // 2x2 grid, two candidates per node
    assert!(fs::write(&candidates_path, "0 1\n0 1\n0 1\n0 1\n").is_ok());
    assert!(fs::write(&priors_path, "0.5 0.5\n0.5 0.5\n0.5 0.5\n0.5 0.5\n").is_ok());

    (dictionary_path, candidates_path, priors_path)
}

fn base_cli(dir: &Path) -> Cli {
    let (dictionary, candidates, priors) = write_inputs(dir);
    Cli {
        dictionary,
        candidates,
        priors,
        output: dir.join("posteriors.txt"),
        rows: 2,
        cols: 2,
        patch_size: 2,
        overlap: 1,
        k: 2,
        two_sigma2: 0.01,
        iterations: 10,
        seed: 42,
        quiet: true,
        render: None,
    }
}

#[test]
fn test_pipeline_writes_normalized_posteriors() {
    let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!("tempdir available"));
    let cli = base_cli(dir.path());
    let output = cli.output.clone();

    assert!(InferenceRunner::new(cli).process().is_ok());

    let posteriors = read_matrix::<f64>(&output, 2);
    let Ok(posteriors) = posteriors else {
        unreachable!("posterior matrix must parse back");
    };
    assert_eq!(posteriors.dim(), (4, 2));
    for row in posteriors.rows() {
        let total: f64 = row.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        // The flat patch matches all neighbors perfectly and should dominate
        assert!(row.get(0).copied().unwrap_or(0.0) >= 0.9);
    }
}

#[test]
fn test_pipeline_renders_map_png_when_requested() {
    let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!("tempdir available"));
    let mut cli = base_cli(dir.path());
    let render_path = dir.path().join("map.png");
    cli.render = Some(render_path.clone());

    assert!(InferenceRunner::new(cli).process().is_ok());
    assert!(render_path.exists());

    let Ok(rendered) = image::open(&render_path) else {
        unreachable!("rendered PNG must reopen");
    };
    // 2x2 grid of 2x2 patches at stride 1: 3x3 pixels
    assert_eq!(rendered.width(), 3);
    assert_eq!(rendered.height(), 3);
}

#[test]
fn test_pipeline_is_reproducible_across_runs() {
    let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!("tempdir available"));

    let mut outputs = Vec::new();
    for run in 0..2 {
        let mut cli = base_cli(dir.path());
        cli.output = dir.path().join(format!("posteriors_{run}.txt"));
        let output = cli.output.clone();
        assert!(InferenceRunner::new(cli).process().is_ok());
        outputs.push(fs::read_to_string(output).unwrap_or_default());
    }

    assert!(!outputs.iter().any(String::is_empty));
    assert_eq!(outputs.first(), outputs.last());
}

#[test]
fn test_pipeline_rejects_missing_dictionary_file() {
    let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!("tempdir available"));
    let mut cli = base_cli(dir.path());
    cli.dictionary = dir.path().join("absent.txt");

    assert!(InferenceRunner::new(cli).process().is_err());
}

#[test]
fn test_pipeline_rejects_candidate_priors_mismatch() {
    let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!("tempdir available"));
    let cli = base_cli(dir.path());
    // Priors matrix with too few rows for the 2x2 grid
    assert!(fs::write(&cli.priors, "0.5 0.5\n0.5 0.5\n").is_ok());

    assert!(InferenceRunner::new(cli).process().is_err());
}
