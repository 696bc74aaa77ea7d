use base64::{Engine as _, engine::general_purpose};
use bzip2::Compression;
use bzip2::write::BzEncoder;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

fn bf_message(data: &[u8]) -> Vec<u8> {
    let mut encoder = BzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).unwrap();
    let compressed = encoder.finish().unwrap();

    let mut message = b"\x00\x01header BF=".to_vec();
    message.extend(general_purpose::STANDARD.encode(compressed).into_bytes());
    message.push(b'X');
    message
}

fn write_input(temp_dir: &TempDir, contents: &[u8]) -> PathBuf {
    let path = temp_dir.path().join("message.bin");
    fs::write(&path, contents).unwrap();
    path
}

/// Test the documented hello world scenario
#[test]
fn test_hello_world() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_input(&temp_dir, &bf_message(b"hello world"));

    assert_cmd::cargo_bin_cmd!("decmprss-b64z2")
        .arg(&path)
        .assert()
        .code(1)
        .stdout("b'hello world'\n");
}

/// Test that long messages are wrapped at 80 columns
#[test]
fn test_long_message_is_wrapped() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_input(&temp_dir, &bf_message(&[b'a'; 200]));

    let expected = format!(
        "b'{}\n{}\n{}'\n",
        "a".repeat(78),
        "a".repeat(80),
        "a".repeat(42)
    );

    assert_cmd::cargo_bin_cmd!("decmprss-b64z2")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::diff(expected));
}

/// Test that words are kept whole when wrapping
#[test]
fn test_wrap_on_spaces() {
    let temp_dir = TempDir::new().unwrap();
    let text = "The quick brown fox jumps over the lazy dog. ".repeat(3);
    let path = write_input(&temp_dir, &bf_message(text.as_bytes()));

    let output = assert_cmd::cargo_bin_cmd!("decmprss-b64z2")
        .arg(&path)
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();

    assert!(stdout.lines().count() > 1);
    for line in stdout.lines() {
        assert!(line.len() <= 80);
        assert!(!line.starts_with(' ') && !line.ends_with(' '));
    }
    assert_eq!(
        stdout.lines().collect::<Vec<_>>().join(" "),
        format!("b'{}'", text)
    );
}

/// Test that a double hyphen between words is a break point
#[test]
fn test_wrap_before_double_hyphen() {
    let temp_dir = TempDir::new().unwrap();
    let text = format!("{} foo--barbaz", "a".repeat(68));
    let path = write_input(&temp_dir, &bf_message(text.as_bytes()));

    assert_cmd::cargo_bin_cmd!("decmprss-b64z2")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::diff(format!(
            "b'{} foo--\nbarbaz'\n",
            "a".repeat(68)
        )));
}

/// Test that binary payloads are escaped
#[test]
fn test_binary_payload_is_escaped() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_input(&temp_dir, &bf_message(b"\x00\xffit's\n"));

    assert_cmd::cargo_bin_cmd!("decmprss-b64z2")
        .arg(&path)
        .assert()
        .code(1)
        .stdout("b\"\\x00\\xffit's\\n\"\n");
}

/// Test a file without the marker
#[test]
fn test_missing_marker() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_input(&temp_dir, b"nothing to see here\n");

    assert_cmd::cargo_bin_cmd!("decmprss-b64z2")
        .arg(&path)
        .assert()
        .code(0)
        .stdout("Failed to decompose message\n");
}

/// Test a payload that is not base64
#[test]
fn test_corrupt_base64() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_input(&temp_dir, b"BF=QlpoO\n");

    assert_cmd::cargo_bin_cmd!("decmprss-b64z2")
        .arg(&path)
        .assert()
        .code(0)
        .stdout("Failed to decompose message\n");
}

/// Test a payload whose bzip2 stream is cut short
#[test]
fn test_truncated_bzip2() {
    let temp_dir = TempDir::new().unwrap();
    let mut encoder = BzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&[b'z'; 512]).unwrap();
    let compressed = encoder.finish().unwrap();
    let truncated = &compressed[..compressed.len() - 8];

    let mut contents = b"BF=".to_vec();
    contents.extend(general_purpose::STANDARD.encode(truncated).into_bytes());
    contents.push(b'\n');
    let path = write_input(&temp_dir, &contents);

    assert_cmd::cargo_bin_cmd!("decmprss-b64z2")
        .arg(&path)
        .assert()
        .code(0)
        .stdout("Failed to decompose message\n");
}

/// Test that the failure reason is logged when asked for
#[test]
fn test_failure_reason_in_debug_log() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_input(&temp_dir, b"no marker\n");

    assert_cmd::cargo_bin_cmd!("decmprss-b64z2")
        .env("RUST_LOG", "aristarchos_tools=debug")
        .arg(&path)
        .assert()
        .code(0)
        .stdout("Failed to decompose message\n")
        .stderr(predicate::str::contains("not found"));
}

/// Test a message placed after the first 4096 bytes
#[test]
fn test_message_beyond_read_limit() {
    let temp_dir = TempDir::new().unwrap();
    let mut contents = vec![b'.'; 4096];
    contents.extend(bf_message(b"hello world"));
    let path = write_input(&temp_dir, &contents);

    assert_cmd::cargo_bin_cmd!("decmprss-b64z2")
        .arg(&path)
        .assert()
        .code(0)
        .stdout("Failed to decompose message\n");
}

/// Test a nonexistent input file
#[test]
fn test_nonexistent_file() {
    assert_cmd::cargo_bin_cmd!("decmprss-b64z2")
        .arg("/nonexistent/message.bin")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("failed to read"));
}

/// Test that the file argument is required
#[test]
fn test_requires_file_argument() {
    assert_cmd::cargo_bin_cmd!("decmprss-b64z2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
