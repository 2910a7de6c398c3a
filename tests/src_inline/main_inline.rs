use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::CommandFactory;

use super::*;
use crate::model::ModelError;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("hwbench_main_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_evaluate_defaults_and_csv_override() {
    let cli = Cli::try_parse_from(["hwbench", "evaluate", "--csv", "out.csv"]).unwrap();
    let Command::Evaluate(args) = cli.command else {
        panic!("expected evaluate");
    };
    let config = evaluate_config(&args).unwrap();
    assert_eq!(config.csv_path, PathBuf::from("out.csv"));
    assert_eq!(config.pairs.len(), 4);
    assert_eq!(config.reference_root, PathBuf::from("references"));
}

#[test]
fn test_parse_generate_overrides() {
    let cli = Cli::try_parse_from([
        "hwbench",
        "generate",
        "--device",
        "cpu",
        "--max-new-tokens",
        "64",
    ])
    .unwrap();
    let Command::Generate(args) = cli.command else {
        panic!("expected generate");
    };
    let config = generate_config(&args).unwrap();
    assert_eq!(config.device, Device::Cpu);
    assert_eq!(config.max_new_tokens, 64);
    assert_eq!(
        config.model_path,
        PathBuf::from("./emuru_result/head_t5_small_2e-5_ech5")
    );
}

#[test]
fn test_missing_subcommand_rejected() {
    assert!(Cli::try_parse_from(["hwbench"]).is_err());
}

#[test]
fn test_invalid_device_rejected() {
    assert!(Cli::try_parse_from(["hwbench", "generate", "--device", "tpu"]).is_err());
}

#[test]
fn test_flags_override_config_file() {
    let dir = make_temp_dir();
    let path = dir.join("hwbench.json");
    fs::write(
        &path,
        r#"{"evaluate": {"csv_path": "a.csv", "reference_root": "refs"}}"#,
    )
    .unwrap();

    let args = EvaluateArgs {
        config: Some(path),
        csv: Some(PathBuf::from("b.csv")),
        reference_root: None,
    };
    let config = evaluate_config(&args).unwrap();
    assert_eq!(config.csv_path, PathBuf::from("b.csv"));
    assert_eq!(config.reference_root, PathBuf::from("refs"));
}

#[test]
fn test_generate_fails_on_missing_model() {
    let dir = make_temp_dir();
    let path = dir.join("hwbench.json");
    let model = dir.join("no_model");
    fs::write(
        &path,
        format!(
            r#"{{"generate": {{"model_path": {}}}}}"#,
            serde_json::to_string(&model).unwrap()
        ),
    )
    .unwrap();

    let args = GenerateArgs {
        config: Some(path),
        device: None,
        max_new_tokens: None,
    };
    let err = run_generate(&args).unwrap_err();
    assert!(matches!(err, PipelineError::Model(ModelError::NotFound(_))));
}
