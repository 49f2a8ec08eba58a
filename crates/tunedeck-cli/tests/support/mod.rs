use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

pub fn new_command_with_temp_home() -> (Command, tempfile::TempDir) {
    let temp_home = tempfile::tempdir().expect("temp home");
    let binary = assert_cmd::cargo::cargo_bin!("tunedeck");
    let mut command = Command::new(binary);
    command.env("HOME", temp_home.path());
    command.env("XDG_CONFIG_HOME", temp_home.path().join(".config"));
    command.env_remove("RUST_LOG");
    (command, temp_home)
}

pub fn config_dir(home: &Path) -> PathBuf {
    let dir = home.join(".config").join("tunedeck");
    fs::create_dir_all(&dir).expect("create config dir");
    dir
}

pub fn write_config(home: &Path, contents: &str) {
    fs::write(config_dir(home).join("config.toml"), contents).expect("write config");
}

pub fn write_settings(home: &Path, contents: &str) {
    fs::write(config_dir(home).join("settings.json"), contents).expect("write settings");
}

pub fn write_catalog(home: &Path) {
    fs::write(
        config_dir(home).join("catalog.toml"),
        r#"
tags = ["rock", "roots", "rockabilly", "jazz"]

[[artists]]
id = 1
name = "Motorhead"

[[artists]]
id = 2
name = "Motorhead!"

[[artists]]
id = 3
name = "Motorpsycho"

[[artists]]
id = 4
name = "Miles Davis"
"#,
    )
    .expect("write catalog");
}

pub fn assert_timestamp_log_names(entries: &[std::fs::DirEntry]) {
    assert!(!entries.is_empty(), "expected at least one diagnostics log");

    for entry in entries {
        let name = entry
            .file_name()
            .into_string()
            .expect("diagnostics filename utf8");
        let stem = name
            .strip_suffix(".log")
            .unwrap_or_else(|| panic!("diagnostics file should end with .log: {name}"));
        assert!(
            !stem.is_empty() && stem.chars().all(|character| character.is_ascii_digit()),
            "diagnostics filename must be <timestamp>.log, got: {name}"
        );
    }
}
