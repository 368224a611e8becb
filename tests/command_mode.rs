//! Integration tests for command mode (-c/--command, --recipe, --shape, --csv)

use std::path::PathBuf;
use std::process::Command;

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .arg("run")
        .arg("-q")
        .arg("--")
        // Tests must be deterministic and not depend on a user's ~/.config/exgrid/config.toml.
        .arg("--no-config")
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn temp_file(tag: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "exgrid_cli_{}_{}_{}_{:?}.{}",
        tag,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos(),
        std::thread::current().id(),
        ext,
    ))
}

struct Cleanup(Vec<PathBuf>);
impl Drop for Cleanup {
    fn drop(&mut self) {
        for path in &self.0 {
            let _ = std::fs::remove_file(path);
        }
    }
}

const REPORT: &str = r#"
[Report]
A1: "Region"
B1: "Q1"
C1: "Q2"
A2: "North"
B2: 0.25
C2: 0.5
A4: "South"
B4: 0.75
C4: 1
"#;

#[test]
fn test_commands_then_save() {
    let input = temp_file("cmd_in", "grd");
    let output = temp_file("cmd_out", "grd");
    let _cleanup = Cleanup(vec![input.clone(), output.clone()]);
    std::fs::write(&input, REPORT).unwrap();

    let (stdout, stderr, code) = run_command(&[
        input.to_str().unwrap(),
        "-c",
        "remove-empty-rows",
        "-c",
        "convert-column-to-percent B",
        "-o",
        output.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(
        stdout.trim(),
        "removed 1 empty row(s)\nconverted 2 cell(s) in column 2"
    );
    assert!(stderr.contains("Saved to"));

    let saved = std::fs::read_to_string(&output).unwrap();
    assert!(saved.contains("[Report]"));
    assert!(saved.contains("B2: 25.0"));
    assert!(saved.contains("A3: \"South\""));
    assert!(saved.contains("B3: 75.0"));
    assert!(saved.contains("C3: 1\n"));
}

#[test]
fn test_csv_export_and_shape() {
    let input = temp_file("shape_in", "grd");
    let csv = temp_file("shape_out", "csv");
    let _cleanup = Cleanup(vec![input.clone(), csv.clone()]);
    std::fs::write(&input, REPORT).unwrap();

    let (stdout, stderr, code) = run_command(&[
        input.to_str().unwrap(),
        "--shape",
        "--csv",
        csv.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("[Report]"));
    assert!(stdout.contains("last_column_letter = \"C\""));
    assert!(stdout.contains("last_row = 4"));

    let exported = std::fs::read_to_string(&csv).unwrap();
    assert_eq!(
        exported,
        "Region,Q1,Q2\nNorth,0.25,0.5\n,,\nSouth,0.75,1\n"
    );
}

#[test]
fn test_recipe() {
    let input = temp_file("recipe_in", "grd");
    let recipe = temp_file("recipe", "toml");
    let output = temp_file("recipe_out", "csv");
    let _cleanup = Cleanup(vec![input.clone(), recipe.clone(), output.clone()]);

    std::fs::write(
        &input,
        "[Sheet1]\nA1: \"Year\"\nB1: \"Year\"\nA2: \"Net Sales (USD)\"\nB2: \"Unit Price\"\nmerge: A1:B1\n",
    )
    .unwrap();
    std::fs::write(
        &recipe,
        r#"
[[step]]
op = "unmerge-row"
row = 1

[[step]]
op = "normalize-names"
row = 2

[[step]]
op = "combine-rows"
first = 1
second = 2
separator = "_"
"#,
    )
    .unwrap();

    let (stdout, stderr, code) = run_command(&[
        input.to_str().unwrap(),
        "--recipe",
        recipe.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(stdout.lines().count(), 3);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "Year_netSales,Year_unitPrice\n"
    );
}

#[test]
fn test_invalid_command_exits_with_error() {
    let input = temp_file("invalid", "grd");
    let _cleanup = Cleanup(vec![input.clone()]);
    std::fs::write(&input, REPORT).unwrap();

    let (_, stderr, code) = run_command(&[input.to_str().unwrap(), "-c", "explode 3"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("unknown command"));
}

#[test]
fn test_out_of_range_exits_with_error() {
    let input = temp_file("range", "grd");
    let _cleanup = Cleanup(vec![input.clone()]);
    std::fs::write(&input, REPORT).unwrap();

    let (_, stderr, code) = run_command(&[input.to_str().unwrap(), "-c", "delete-rows 9"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("out of range"));
}

#[test]
fn test_unknown_sheet() {
    let input = temp_file("sheet", "grd");
    let _cleanup = Cleanup(vec![input.clone()]);
    std::fs::write(&input, REPORT).unwrap();

    let (_, stderr, code) = run_command(&[
        input.to_str().unwrap(),
        "--sheet",
        "Missing",
        "-c",
        "reset-styling",
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Sheet not found: Missing"));
}

#[test]
fn test_missing_file_argument() {
    let (_, stderr, code) = run_command(&["-c", "reset-styling"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Usage: exgrid"));
}
