#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::path::Path;

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

fn write_sources(dir: &Path, json: &str) {
    std::fs::write(dir.join("sources.json"), json).unwrap();
}

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("streamgrid");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("preview"));
}

#[test]
fn test_version_flag() {
    let mut cmd = cargo_bin_cmd!("streamgrid");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("streamgrid"))
        .stdout(predicate::str::contains("rev:"));
}

#[test]
fn test_render_single_stream_to_stdout() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_sources(
        dir.path(),
        r#"{"streams":[{"id":"abc123","title":"Live Feed A","description":"Camera 1"}]}"#,
    );

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("streamgrid");
    cmd.arg("--dir")
        .arg(dir.path())
        .args(["render", "-o", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "src=\"https://www.youtube.com/embed/abc123?autoplay=1&amp;mute=1&amp;controls=0&amp;modestbranding=1&amp;rel=0&amp;showinfo=0&amp;loop=1&amp;playlist=abc123\"",
        ))
        .stdout(predicate::str::contains("allow=\"autoplay; encrypted-media\""))
        .stdout(predicate::str::contains("<h3>Live Feed A</h3>"))
        .stdout(predicate::str::contains("<p>Camera 1</p>"));
}

#[test]
fn test_render_empty_streams() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path(), r#"{"streams":[]}"#);

    // Act
    let output = cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .args(["render", "-o", "-"])
        .output()
        .unwrap();

    // Assert
    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).unwrap();
    assert!(html.contains("class=\"grid\""));
    assert!(!html.contains("<iframe"));
}

#[test]
fn test_render_is_stable_across_runs() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_sources(
        dir.path(),
        r#"{"streams":[{"id":"a","title":"A","description":""},{"id":"b","title":"B","description":""}]}"#,
    );
    let run = || {
        cargo_bin_cmd!("streamgrid")
            .arg("--dir")
            .arg(dir.path())
            .args(["render", "-o", "-", "--columns", "2"])
            .output()
            .unwrap()
            .stdout
    };

    // Act
    let first = run();
    let second = run();

    // Assert
    assert_eq!(first, second);
    assert!(String::from_utf8(first).unwrap().contains("repeat(2, 1fr)"));
}

#[test]
fn test_render_to_configured_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_sources(
        dir.path(),
        r#"{"streams":[{"id":"abc123","title":"Live Feed A","description":"Camera 1"}]}"#,
    );
    std::fs::write(
        dir.path().join("config.toml"),
        "[page]\ntitle = \"Wall\"\noutput = \"out/wall.html\"\n",
    )
    .unwrap();

    // Act
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .arg("render")
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote 1 cell(s)"));

    // Assert
    let html = std::fs::read_to_string(dir.path().join("out").join("wall.html")).unwrap();
    assert!(html.contains("<title>Wall</title>"));
    assert!(html.contains("data-key=\"abc123\""));
}

#[test]
fn test_check_rejects_duplicate_ids() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_sources(
        dir.path(),
        r#"{"streams":[{"id":"dup1","title":"A","description":""},{"id":"dup1","title":"B","description":""}]}"#,
    );

    // Act & Assert
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate id 'dup1'"));
}

#[test]
fn test_check_rejects_empty_id() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_sources(
        dir.path(),
        r#"{"streams":[{"id":"","title":"Blank","description":""}]}"#,
    );

    // Act & Assert
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("`id` must not be empty"));
}

#[test]
fn test_check_reports_missing_field() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path(), r#"{"streams":[{"id":"abc123","title":"A"}]}"#);

    // Act & Assert
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "missing required field `description`",
        ));
}

#[test]
fn test_lenient_render_skips_duplicates() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_sources(
        dir.path(),
        r#"{"streams":[{"id":"dup1","title":"First","description":""},{"id":"dup1","title":"Second","description":""}]}"#,
    );

    // Act
    let output = cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .args(["--policy", "lenient", "render", "-o", "-"])
        .output()
        .unwrap();

    // Assert
    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).unwrap();
    assert_eq!(html.matches("<iframe").count(), 1);
    assert!(html.contains("<h3>First</h3>"));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("skipping stream record"));
}

#[test]
fn test_check_warns_on_unusual_id() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_sources(
        dir.path(),
        r#"{"streams":[{"id":"abc123","title":"Live Feed A","description":"Camera 1"}]}"#,
    );

    // Act & Assert
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("does not look like a YouTube video id"))
        .stderr(predicate::str::contains("OK: 1 stream(s)"));
}

#[test]
fn test_toml_sources_override() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let sources = dir.path().join("cams.toml");
    std::fs::write(
        &sources,
        "[[streams]]\nid = \"jfKfPfyJRdk\"\ntitle = \"Lofi\"\ndescription = \"Radio\"\n",
    )
    .unwrap();

    // Act & Assert
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .arg("--sources")
        .arg(&sources)
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("jfKfPfyJRdk"))
        .stderr(predicate::str::contains("Total: 1 streams"));
}

#[test]
fn test_missing_sources_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_init_writes_config_and_sample() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .arg("init")
        .assert()
        .success();

    // Assert
    assert!(dir.path().join("config.toml").exists());
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("OK: 2 stream(s)"));
}

#[test]
fn test_render_zero_columns_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path(), r#"{"streams":[]}"#);
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .args(["render", "-o", "-", "--columns", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid column count"));
}

#[test]
fn test_completions_bash() {
    cargo_bin_cmd!("streamgrid")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("streamgrid"));
}

#[test]
fn test_check_rejects_padded_id() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_sources(
        dir.path(),
        r#"{"streams":[{"id":"abc123","title":"A","description":""},{"id":" abc123 ","title":"B","description":""}]}"#,
    );

    // Act & Assert
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("leading or trailing whitespace"));
}

#[test]
fn test_preview_rejects_huge_column_count() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_sources(
        dir.path(),
        r#"{"streams":[{"id":"abc123","title":"A","description":""}]}"#,
    );

    // Act & Assert
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .args(["preview", "--columns", "100000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most 64 columns"));
}

const QUAKE_PAGE: &str = r"<html><head><script type='text/javascript'>
VI.quakeInfo = [
{'t':new Date(2024,1-1,18,21,13,06),'a':1.5,'lat':63.876,'lon':-22.466,'dep':5.2,'s':0.84,'q':90.01,'dL':3.4,'dD':'NNV','dR':'Grindavík'},
{'t':new Date(2024,1-1,18,22,01,45),'a':0.7,'lat':63.912,'lon':-22.301,'dep':3.1,'s':1.92,'q':75.5,'dL':2.1,'dD':'A','dR':'Fagradalsfjall'}
];
</script></head><body></body></html>
";

#[test]
fn test_quakes_from_saved_page_to_csv() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("reykjanes.html");
    std::fs::write(&page, QUAKE_PAGE).unwrap();
    let csv = dir.path().join("out").join("quakes.csv");

    // Act
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .arg("quakes")
        .arg("--page")
        .arg(&page)
        .arg("-o")
        .arg(&csv)
        .assert()
        .success()
        .stderr(predicate::str::contains("Scraped 2 earthquake(s)"))
        .stderr(predicate::str::contains("Average magnitude: 1.38"))
        .stderr(predicate::str::contains("Maximum magnitude: 1.92"))
        .stderr(predicate::str::contains("Grindavík: 1 earthquakes"));

    // Assert
    let content = std::fs::read_to_string(&csv).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("timestamp,latitude,longitude,depth_km,magnitude"));
    assert!(lines[1].starts_with("2024-01-18 21:13:06,"));
}

#[test]
fn test_quakes_csv_to_stdout() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("page.html");
    std::fs::write(&page, QUAKE_PAGE).unwrap();

    // Act & Assert
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .args(["quakes", "-o", "-", "--page"])
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("Fagradalsfjall,A,"));
}

#[test]
fn test_quakes_page_without_table_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("page.html");
    std::fs::write(&page, "<html><body>maintenance</body></html>").unwrap();

    // Act & Assert
    cargo_bin_cmd!("streamgrid")
        .arg("--dir")
        .arg(dir.path())
        .arg("quakes")
        .arg("--page")
        .arg(&page)
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find VI.quakeInfo"));
}
