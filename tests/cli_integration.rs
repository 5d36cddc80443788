use std::fs;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_van-solar-designer"))
        .args(args)
        .output()
        .expect("van-solar-designer process should run")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "run failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("stdout should be valid UTF-8")
}

fn parse_metric(stdout: &str, label: &str, unit: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing line `{label}` in output: {stdout}"));

    let raw = line
        .split_once(':')
        .map(|(_, right)| right.trim())
        .unwrap_or_else(|| panic!("invalid format for line `{line}`"));

    raw.trim_end_matches(unit)
        .trim()
        .parse::<f64>()
        .unwrap_or_else(|_| panic!("failed to parse `{raw}` from line `{line}`"))
}

#[test]
fn default_run_uses_weekender_preset() {
    let stdout = stdout_of(&run(&[]));
    // 400 W at 4.5 sun hours
    assert_eq!(parse_metric(&stdout, "Daily production:", "Wh"), 1800.0);
    assert!(stdout.contains("Roof [series x2]"));
    assert!(stdout.contains("Runtime w/ solar:   indefinite"));
}

#[test]
fn design_files_match_presets() {
    for name in ["weekender", "full_time"] {
        let path = format!("designs/{name}.toml");
        let from_file = stdout_of(&run(&["--design", path.as_str()]));
        let from_preset = stdout_of(&run(&["--preset", name]));
        assert_eq!(from_file, from_preset, "{name}");
    }
}

#[test]
fn json_catalog_gives_same_report_for_full_time() {
    let builtin = stdout_of(&run(&["--preset", "full_time"]));
    let json = stdout_of(&run(&["--preset", "full_time", "--catalog", "catalogs/demo.json"]));
    assert_eq!(
        parse_metric(&builtin, "Peak load:", "W"),
        parse_metric(&json, "Peak load:", "W")
    );
    assert!(json.contains("Recommended:        MultiPlus 12/3000"));
}

#[test]
fn csv_report_written() {
    let path = std::env::temp_dir().join(format!("van-solar-{}.csv", std::process::id()));
    let path_str = path.to_string_lossy().to_string();
    stdout_of(&run(&["--preset", "full_time", "--report-out", path_str.as_str()]));

    let csv = fs::read_to_string(&path).expect("csv written");
    fs::remove_file(&path).ok();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("string,topology,panels"));
    assert!(lines[1].starts_with("Roof front,series,2"));
    assert!(lines[2].starts_with("Roof rear,parallel,2"));
}

#[test]
fn design_and_preset_together_rejected() {
    let output = run(&["--design", "designs/weekender.toml", "--preset", "weekender"]);
    assert!(!output.status.success());
}

#[test]
fn unknown_preset_rejected() {
    let output = run(&["--preset", "mansion"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown preset"), "stderr: {stderr}");
}

#[test]
fn invalid_design_reports_every_error() {
    let path = std::env::temp_dir().join(format!("van-solar-bad-{}.toml", std::process::id()));
    fs::write(
        &path,
        "[location]\npeak_sun_hours = 30.0\n\n[battery]\nid = \"x\"\nquantity = 0\n",
    )
    .expect("temp file written");
    let path_str = path.to_string_lossy().to_string();
    let output = run(&["--design", path_str.as_str()]);
    fs::remove_file(&path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("location.peak_sun_hours"), "stderr: {stderr}");
    assert!(stderr.contains("battery.quantity"), "stderr: {stderr}");
}
