//! End-to-end runs of the `compute-spend-inputs` binary.

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use serde_json::{Map, Value};

struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str, transcript: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "spend-inputs-{name}-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("transcript.txt"), transcript).unwrap();
        let _removed = fs::remove_file(dir.join("input.json"));
        Self(dir)
    }

    fn transcript(&self) -> PathBuf {
        self.0.join("transcript.txt")
    }

    fn output(&self) -> PathBuf {
        self.0.join("input.json")
    }

    fn run(&self, depth: &str, nullifier: &str) -> Output {
        run_with(&[
            depth,
            path_str(&self.transcript()),
            nullifier,
            "-o",
            path_str(&self.output()),
        ])
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _removed = fs::remove_dir_all(&self.0);
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn run_with(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_compute-spend-inputs"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn writes_witness() {
    let scratch = Scratch::new("ok", "5\n7 9\n");
    let output = scratch.run("2", "7");
    assert!(output.status.success(), "{}", stderr(&output));

    let text = fs::read_to_string(scratch.output()).unwrap();
    assert!(text.ends_with("}\n"), "{text:?}");
    assert_eq!(text.lines().count(), 1, "compact single-line JSON");

    let record: Map<String, Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(record.len(), 7, "3 header keys + 2 per level");
    assert_eq!(record["nullifier"], "7");
    assert_eq!(record["nonce"], "9");
    for key in ["digest", "sibling[0]", "sibling[1]"] {
        let value = record[key].as_str().unwrap();
        assert!(value.bytes().all(|byte| byte.is_ascii_digit()), "{key}: {value}");
    }
    for key in ["direction[0]", "direction[1]"] {
        assert!(record[key] == "0" || record[key] == "1", "{key}");
    }
}

#[test]
fn two_record_known_answer() {
    let scratch = Scratch::new("known", "5\n7 9\n");
    let output = scratch.run("2", "7");
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        fs::read_to_string(scratch.output()).unwrap(),
        concat!(
            r#"{"digest":"27925548856416190810213757096398074583981226359358211792769941634551940844866","#,
            r#""nullifier":"7","nonce":"9","#,
            r#""sibling[0]":"5","direction[0]":"0","#,
            r#""sibling[1]":"1618998601779323952952423686159567693708961901481965191036859758705651569018","#,
            r#""direction[1]":"0"}"#,
            "\n",
        )
    );
}

#[test]
fn same_input_same_output() {
    let scratch = Scratch::new("repeat", "3\n7 9\n100 200\n44\n");
    assert!(scratch.run("16", "100").status.success());
    let first = fs::read_to_string(scratch.output()).unwrap();
    assert!(scratch.run("16", "100").status.success());
    let second = fs::read_to_string(scratch.output()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn failures_map_to_exit_codes() {
    let cases = [
        ("arity", "5\n1 2 3\n", "2", "1", 3, "InvalidRecordArity"),
        ("duplicate", "7 9\n7 10\n", "4", "7", 4, "DuplicateTargetMatch"),
        ("missing", "5\n8 9\n", "4", "7", 5, "NullifierNotFound"),
        ("evicted", "7 9\n5\n", "0", "7", 6, "LeafMismatch"),
        ("field", "5\n7 abc\n", "4", "7", 7, "InvalidFieldElement"),
        ("target", "7 9\n", "4", "7x", 7, "InvalidFieldElement"),
        ("depth", "7 9\n", "257", "7", 8, "DepthTooLarge"),
    ];

    for (name, transcript, depth, nullifier, code, kind) in cases {
        let scratch = Scratch::new(name, transcript);
        let output = scratch.run(depth, nullifier);
        assert_eq!(output.status.code(), Some(code), "{name}: {}", stderr(&output));
        assert!(
            stderr(&output).contains(&format!("error[{kind}]")),
            "{name}: {}",
            stderr(&output)
        );
        assert!(!scratch.output().exists(), "{name}: no partial output");
    }
}

#[test]
fn sequential_addressing_fills_up() {
    let scratch = Scratch::new("full", "1\n2\n7 9\n");
    let output = run_with(&[
        "1",
        path_str(&scratch.transcript()),
        "7",
        "--addressing",
        "sequential",
        "-o",
        path_str(&scratch.output()),
    ]);
    assert_eq!(output.status.code(), Some(8), "{}", stderr(&output));
    assert!(stderr(&output).contains("error[AccumulatorFull]"));
}

#[test]
fn unreadable_transcript_is_io_error() {
    let scratch = Scratch::new("io", "");
    let missing = scratch.0.join("nope.txt");
    let output = run_with(&[
        "4",
        path_str(&missing),
        "7",
        "-o",
        path_str(&scratch.output()),
    ]);
    assert_eq!(output.status.code(), Some(9), "{}", stderr(&output));
    assert!(stderr(&output).contains("error[Io]"));
}

#[test]
fn usage_errors_come_from_clap() {
    assert_eq!(run_with(&["4"]).status.code(), Some(2));
    assert_eq!(run_with(&["four", "t.txt", "7"]).status.code(), Some(2));
}
