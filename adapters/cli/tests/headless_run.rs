use std::{env, fs, process::Command};

#[test]
fn short_run_reports_progress_and_writes_a_save() {
    let save = env::temp_dir().join(format!("desktop-defender-{}.save", std::process::id()));
    let output = Command::new(env!("CARGO_BIN_EXE_desktop-defender"))
        .args(["--seconds", "20", "--seed", "7", "--autopilot", "--save"])
        .arg(&save)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run desktop-defender");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("wave "), "{stdout}");

    let saved = fs::read_to_string(&save).expect("save written");
    assert!(saved.starts_with("defender:v1:"));

    let resumed = Command::new(env!("CARGO_BIN_EXE_desktop-defender"))
        .args(["--seconds", "1", "--load"])
        .arg(&save)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to resume desktop-defender");
    let _ = fs::remove_file(&save);
    assert!(resumed.status.success(), "{}", String::from_utf8_lossy(&resumed.stderr));
}

#[test]
fn locked_weapon_is_reported() {
    let output = Command::new(env!("CARGO_BIN_EXE_desktop-defender"))
        .args(["--seconds", "1", "--weapon", "tesla"])
        .output()
        .expect("failed to run desktop-defender");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("tesla"));
}
