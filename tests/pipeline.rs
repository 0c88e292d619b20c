//! Black-box checks of the built binary's `models` subcommand, driving the
//! config file through XDG_CONFIG_HOME and the enumeration through fake
//! ollama scripts.

// XDG_CONFIG_HOME only steers `dirs::config_dir` on Linux.
#![cfg(target_os = "linux")]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::Command;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scengen_it_{}_{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_config(home: &PathBuf, binary: &str) {
    let cfg_dir = home.join("scengen");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(
        cfg_dir.join("config.toml"),
        format!("[ollama]\nbinary = \"{}\"\n", binary),
    )
    .unwrap();
}

fn run_models(config_home: &PathBuf) -> String {
    let out = Command::new(env!("CARGO_BIN_EXE_scengen"))
        .arg("models")
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("HOME") // keep dirs from falling back to ~/.config
        .output()
        .expect("binary runs");
    assert!(out.status.success());
    String::from_utf8(out.stdout).unwrap()
}

#[test]
fn models_subcommand_prints_installed_models() {
    let dir = scratch_dir("models_ok");

    let fake = dir.join("ollama");
    fs::write(
        &fake,
        "#!/bin/sh\n\
         echo \"NAME            ID      SIZE\"\n\
         echo \"llama3:latest   abc123  4.7 GB\"\n\
         echo \"mistral:7b      def456  4.1 GB\"\n",
    )
    .unwrap();
    fs::set_permissions(&fake, fs::Permissions::from_mode(0o755)).unwrap();
    write_config(&dir, &fake.display().to_string());

    let stdout = run_models(&dir);
    assert_eq!(stdout, "llama3:latest\nmistral:7b\n");

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn models_subcommand_degrades_to_the_sentinel() {
    let dir = scratch_dir("models_missing");
    write_config(&dir, "/nonexistent/scengen/ollama");

    let stdout = run_models(&dir);
    // exactly one non-empty placeholder option
    assert_eq!(stdout, "No models found\n");

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn models_subcommand_degrades_when_enumeration_exits_nonzero() {
    let dir = scratch_dir("models_err");

    let fake = dir.join("ollama");
    fs::write(&fake, "#!/bin/sh\necho broken >&2\nexit 2\n").unwrap();
    fs::set_permissions(&fake, fs::Permissions::from_mode(0o755)).unwrap();
    write_config(&dir, &fake.display().to_string());

    let stdout = run_models(&dir);
    assert_eq!(stdout, "No models found\n");

    let _ = fs::remove_dir_all(dir);
}
