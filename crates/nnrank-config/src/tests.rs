use super::*;
use std::fs;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.scorer.interpreter, "python3");
    assert_eq!(config.scorer.parallel_workers, 1);
    assert_eq!(config.output.results_file, PathBuf::from("results.txt"));
    assert_eq!(config.output.top_n, None);
    assert_eq!(config.policy.on_malformed, MalformedPolicy::Skip);
    assert!(config.validate().is_ok());
}

#[test]
fn test_best_results_path_defaults_into_best_dir() {
    let mut output = OutputConfig::default();
    assert_eq!(output.best_results_path(), PathBuf::from("best_ligands/results.txt"));

    output.best_results_file = Some(PathBuf::from("top.txt"));
    assert_eq!(output.best_results_path(), PathBuf::from("top.txt"));
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nnrank.toml");
    fs::write(
        &path,
        r#"
[scorer]
receptor = "receptor.pdbqt"
vina_executable = "/usr/bin/vina"
parallel_workers = 4

[output]
top_n = 10
format = "csv"

[report]
value_suffix_width = 3

[policy]
on_malformed = "abort"
"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.scorer.parallel_workers, 4);
    assert_eq!(config.scorer.script, PathBuf::from("NNScore2.py"));
    assert_eq!(config.output.top_n, Some(10));
    assert_eq!(config.output.format, OutputFormat::Csv);
    assert_eq!(config.report.value_suffix_width, 3);
    assert_eq!(config.report.unit_width, 2);
    assert_eq!(config.policy.on_malformed, MalformedPolicy::Abort);
    assert!(config.validate_for_run().is_ok());
}

#[test]
fn test_yaml_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nnrank.yaml");
    fs::write(&path, "output:\n  top_n: 3\n  best_dir: best\n").unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.output.top_n, Some(3));
    assert_eq!(config.output.best_dir, PathBuf::from("best"));
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(Config::load(Some(&missing)), Err(ConfigError::NotFound(_))));
}

#[test]
fn test_bad_toml_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[output\ntop_n = ").unwrap();

    let err = Config::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_validate_rejects_zero_workers_and_timeout() {
    let mut config = Config::default();
    config.scorer.parallel_workers = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.scorer.timeout_secs = Some(0);
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_layout() {
    let mut config = Config::default();
    config.report.score_field = 7;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_run_requires_receptor_and_vina() {
    let mut config = Config::default();
    assert!(config.validate_for_run().is_err());

    config.scorer.receptor = Some(PathBuf::from("r.pdbqt"));
    assert!(config.validate_for_run().is_err());

    config.scorer.vina_executable = Some(PathBuf::from("vina"));
    assert!(config.validate_for_run().is_ok());
}

#[test]
fn test_config_error_converts() {
    let err: NnrankError = ConfigError::Invalid("x".into()).into();
    assert!(matches!(err, NnrankError::Config(_)));
}

#[test]
fn test_example_config_parses() {
    let config: Config = toml::from_str(include_str!("../../../nnrank.example.toml")).unwrap();
    assert_eq!(config.scorer.parallel_workers, 4);
    assert_eq!(config.report, ReportLayout::default());
    assert!(config.validate_for_run().is_ok());
}
