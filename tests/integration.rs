use std::fs;
use std::process::Command;

fn halodream() -> Command {
    Command::new(env!("CARGO_BIN_EXE_halodream"))
}

#[test]
fn generates_page_from_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("site.yaml");
    let output = dir.path().join("public");
    fs::write(
        &config,
        r#"
title: Night Garden
tagline: Stars answer the cursor.
faq:
  - question: Is it fast?
    answer: Twenty thousand points, every frame.
  - question: Does it work on phones?
    answer: The cloud moves below the copy on narrow screens.
effects:
  preset: cube
"#,
    )
    .unwrap();

    let status = halodream()
        .args(["generate", "--config"])
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .status()
        .expect("Failed to execute halodream");
    assert!(status.success(), "halodream exited with error");

    let html = fs::read_to_string(output.join("index.html")).expect("index.html was not generated");
    assert!(html.contains("Night Garden"), "Missing title");
    assert!(html.contains("Stars answer the cursor."), "Missing tagline");
    assert_eq!(html.matches("class=\"chat-turn\"").count(), 2);

    let effects: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.join("effects.json")).unwrap()).unwrap();
    assert_eq!(effects["particle_field"]["volume"], "cube");
    assert_eq!(effects["grid"]["grid_size"], 60.0);
}

#[test]
fn config_without_subcommand_generates() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("site.json");
    let output = dir.path().join("out");
    fs::write(&config, r#"{"title": "Json Site"}"#).unwrap();

    let status = halodream()
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let html = fs::read_to_string(output.join("index.html")).unwrap();
    assert!(html.contains("Json Site"));
}

#[test]
fn unsupported_config_format_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("site.toml");
    fs::write(&config, "title = 'nope'").unwrap();

    let result = halodream()
        .args(["generate", "--config"])
        .arg(&config)
        .arg("--output")
        .arg(dir.path().join("out"))
        .output()
        .unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("unsupported config format"), "stderr: {stderr}");
}

#[test]
fn simulate_prints_json_report() {
    let result = halodream()
        .args([
            "simulate", "--preset", "sphere", "--frames", "40", "--count", "200", "--sweep", "2",
        ])
        .output()
        .expect("Failed to execute halodream");
    assert!(result.status.success());

    let report: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(report["particle_count"], 200);
    assert_eq!(report["frames"].as_array().unwrap().len(), 40);
    assert!(report["summary"]["explosion_frames"].as_u64().unwrap() > 0);

    let exploding = report["frames"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["exploding"] == true)
        .unwrap();
    assert_eq!(exploding["radius"], 30.0);
    assert_eq!(exploding["force"], 1.0);
}

#[test]
fn simulate_is_reproducible_for_a_seed() {
    let run = || {
        halodream()
            .args(["simulate", "--frames", "30", "--count", "100", "--seed", "7"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn simulate_uses_count_and_volume_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("site.yaml");
    fs::write(
        &config,
        "effects:\n  particle_field:\n    particle_count: 50\n    volume: cube\n",
    )
    .unwrap();

    let result = halodream()
        .args(["simulate", "--frames", "5", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(result.status.success());

    let report: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(report["particle_count"], 50);
    assert_eq!(report["volume"], "cube");
}
