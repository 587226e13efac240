use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_scenarist"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "scenarist init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".scenarist.toml");
    assert!(config_path.exists(), ".scenarist.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[prompt]"));
    assert!(content.contains("[generator]"));

    let _raw: toml::Value = toml::from_str(&content).unwrap();
    let config = scenarist_core::ScenaristConfig::from_toml(&content).unwrap();
    assert_eq!(config.prompt.max_files, 5);
    assert_eq!(config.codegen.framework, "pytest");
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".scenarist.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_scenarist"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let content = std::fs::read_to_string(dir.path().join(".scenarist.toml")).unwrap();
    assert_eq!(content, "# existing");
}
