use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "phage-maze"])
        .status()
        .expect("failed to invoke cargo check for phage-maze CLI binary");

    assert!(status.success(), "cargo check --bin phage-maze should succeed");
}

fn generate(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_phage-maze"))
        .arg("generate")
        .args(args)
        .output()
        .expect("failed to run phage-maze generate")
}

#[test]
fn generate_prints_summary_for_seed() {
    let output = generate(&["--rings", "4", "--seed", "42"]);

    assert!(output.status.success(), "generate should succeed");
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.contains("seed:       42"));
    assert!(stdout.contains("rings:      4"));
}

#[test]
fn reported_seed_reproduces_the_maze() {
    let first = generate(&["--rings", "5", "--format", "json"]);
    assert!(first.status.success());
    let first = String::from_utf8(first.stdout).expect("utf-8 output");

    let report: serde_json::Value = serde_json::from_str(&first).expect("json report");
    let seed = report["seed"].as_u64().expect("seed is reported");
    assert_ne!(seed, 0);

    let seed = seed.to_string();
    let replay = generate(&["--rings", "5", "--format", "json", "--seed", &seed]);
    assert!(replay.status.success());
    assert_eq!(String::from_utf8(replay.stdout).expect("utf-8 output"), first);
}

#[test]
fn oversized_maze_is_refused() {
    let output = generate(&["--rings", "5000"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf-8 output");
    assert!(stderr.contains("above the limit"), "{stderr}");
}

#[test]
fn invalid_configuration_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_phage-maze"))
        .args(["generate", "--curviness", "3.0"])
        .output()
        .expect("failed to run phage-maze generate");

    assert!(!output.status.success());
}
