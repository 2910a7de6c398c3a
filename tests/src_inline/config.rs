use super::*;

#[test]
fn test_default_eval_config_matches_builtin_pairs() {
    let config = EvalConfig::default();
    assert_eq!(config.pairs.len(), 4);
    assert_eq!(
        config.pairs[0],
        DatasetPair::new("small_emuru_words", "iam_words__reference")
    );
    assert_eq!(
        config.pairs[3],
        DatasetPair::new("IAMLines_my_model", "iam_lines__reference")
    );
    assert_eq!(config.csv_path, PathBuf::from("eval_results.csv"));
    assert_eq!(config.scorer.program, "hwd-score");
}

#[test]
fn test_default_generate_config() {
    let config = GenerateConfig::default();
    assert_eq!(config.device, Device::Cuda);
    assert_eq!(config.max_new_tokens, 256);
    assert_eq!(config.style_height, 64);
    assert_eq!(config.num_style_samples, 1);
    assert_eq!(config.runs.len(), 2);
    assert_eq!(config.runs[0].benchmark, Benchmark::IamWords);
    assert_eq!(config.runs[0].out_dir, PathBuf::from("IAMWords_my_model"));
    assert_eq!(config.runs[1].benchmark, Benchmark::IamLines);
    assert_eq!(config.runs[1].out_dir, PathBuf::from("IAMLines_my_model"));
}

#[test]
fn test_partial_json_keeps_defaults() {
    let text = r#"{
        "evaluate": {
            "csv_path": "out/results.csv",
            "pairs": [{"fake_path": "gen/words", "real_key": "iam_words__reference"}],
            "scorer": {"program": "python3", "args": ["-m", "hwd_cli"]}
        },
        "generate": {"device": "cpu", "runs": [{"benchmark": "iam_lines", "out_dir": "lines"}]}
    }"#;
    let config = Config::parse(text, Path::new("test.json")).unwrap();

    assert_eq!(config.evaluate.pairs.len(), 1);
    assert_eq!(config.evaluate.csv_path, PathBuf::from("out/results.csv"));
    assert_eq!(config.evaluate.reference_root, PathBuf::from("references"));
    assert_eq!(config.evaluate.scorer.args, vec!["-m", "hwd_cli"]);

    assert_eq!(config.generate.device, Device::Cpu);
    assert_eq!(config.generate.max_new_tokens, 256);
    assert_eq!(config.generate.runs.len(), 1);
    assert_eq!(config.generate.runs[0].benchmark, Benchmark::IamLines);
}

#[test]
fn test_unknown_field_rejected() {
    let err = Config::parse(r#"{"evaluate": {"csv": "x.csv"}}"#, Path::new("bad.json"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn test_load_without_path_is_default() {
    assert_eq!(Config::load(None).unwrap(), Config::default());
}

#[test]
fn test_load_missing_file() {
    let err = Config::load(Some(Path::new("/nonexistent/hwbench/config.json"))).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
