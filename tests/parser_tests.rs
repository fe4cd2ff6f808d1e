//! Integration tests for the message parser, multipart splitting and rendering.

use std::path::Path;

use assert_fs::prelude::*;
use predicates::prelude::*;

use mimetree::{
    parse, parse_file, parse_str, MalformedKind, MediaTypeRegistry, Message, MimeError,
    ParseOptions,
};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn parse_fixture(name: &str) -> Message {
    parse_file(fixture(name), ParseOptions::default()).unwrap()
}

// ─── Test 1: Simple message headers and body ────────────────────────

#[test]
fn test_simple_fixture() {
    let msg = parse_fixture("simple.eml");
    assert!(!msg.is_multipart());

    let simple = msg.as_simple().unwrap();
    assert_eq!(simple.headers().len(), 5);
    assert_eq!(msg.header("from").unwrap().value(), "Alice <alice@example.com>");
    assert_eq!(
        msg.header("Subject").unwrap().value(),
        "Quarterly report attached"
    );
    assert_eq!(msg.header("X-Mailer").unwrap().line(), 6);
    assert_eq!(
        simple.body(),
        ["Hello Bob,\r\n", "\r\n", "See you soon.\r\n"]
    );
}

// ─── Test 2: Round trip after normalization ─────────────────────────

#[test]
fn test_simple_round_trip_is_byte_identical() {
    let text = "From: a@example.com\r\nSubject: Hello, World\r\n\r\nline one\r\n\r\nline two\r\n";
    let msg = parse_str(text).unwrap();
    assert_eq!(msg.render(), text);
}

#[test]
fn test_round_trip_normalizes_line_endings() {
    let msg = parse_str("Subject: x\nTo: y\r\rbody\n\r").unwrap();
    assert_eq!(msg.render(), "Subject: x\r\nTo: y\r\n\r\nbody\r\n");
}

#[test]
fn test_render_is_idempotent_for_fixtures() {
    for name in ["simple.eml", "multipart.eml", "nested.eml", "truncated.eml"] {
        let rendered = parse_fixture(name).render();
        let reparsed = parse_str(&rendered).unwrap();
        assert_eq!(reparsed.render(), rendered, "render not stable for {name}");
    }
}

// ─── Test 3: Header grammar ─────────────────────────────────────────

#[test]
fn test_folded_header() {
    let msg = parse_str("Subject: Hello,\r\n World\r\n\r\n").unwrap();
    let subject = msg.header("Subject").unwrap();
    assert_eq!(subject.name(), "Subject");
    assert_eq!(subject.value(), "Hello, World");
}

#[test]
fn test_duplicate_header_keeps_later_value() {
    let msg = parse_str("x-foo: first\r\nSubject: s\r\nX-FOO: second\r\n\r\n").unwrap();
    assert_eq!(msg.headers().len(), 2);
    assert_eq!(msg.header("X-Foo").unwrap().value(), "second");
}

#[test]
fn test_header_names_are_canonical() {
    let msg = parse_str("CoNTent-TYPE: text/plain\r\n\r\n").unwrap();
    let names: Vec<&str> = msg.headers().iter().map(|h| h.name()).collect();
    assert_eq!(names, vec!["Content-Type"]);
}

#[test]
fn test_quoted_parameter() {
    let msg = parse_str("Content-Type: text/plain; charset=\"utf-8\"\r\n\r\n").unwrap();
    let ct = msg.header("Content-Type").unwrap();
    assert_eq!(ct.value_without_parameters(), "text/plain");
    assert_eq!(ct.parameters()["charset"], "utf-8");
}

#[test]
fn test_continuation_as_first_line_fails() {
    let err = parse_str(" folded: nowhere\r\n\r\nbody\r\n").unwrap_err();
    assert!(matches!(
        err,
        MimeError::Malformed {
            line: 1,
            kind: MalformedKind::UnexpectedContinuation
        }
    ));
}

#[test]
fn test_non_header_line_fails() {
    let err = parse_str("Subject: ok\r\nnot a header\r\n\r\n").unwrap_err();
    assert_eq!(err.line(), Some(2));
    assert_eq!(err.malformed_kind(), Some(MalformedKind::ExpectedHeader));
}

#[test]
fn test_headers_without_blank_line_are_accepted() {
    let msg = parse_str("Subject: only headers\r\nFrom: a@example.com").unwrap();
    assert_eq!(msg.headers().len(), 2);
    assert!(msg.as_simple().unwrap().body().is_empty());
}

// ─── Test 4: Multipart splitting ────────────────────────────────────

#[test]
fn test_two_part_message() {
    let text = "Content-Type: multipart/mixed; boundary=X\r\n\r\n\
                --X\r\n\r\nA\r\n\r\n\
                --X\r\n\r\nB\r\n\r\n\
                --X--\r\n";
    let msg = parse_str(text).unwrap();
    let multi = msg.as_multipart().unwrap();

    assert_eq!(multi.boundary(), "X");
    assert_eq!(multi.parts().len(), 2);
    assert_eq!(multi.parts()[0].as_simple().unwrap().body(), ["A\r\n"]);
    assert_eq!(multi.parts()[1].as_simple().unwrap().body(), ["B\r\n"]);
    assert!(multi.preamble().is_empty());
    assert!(multi.epilogue().is_empty());
}

#[test]
fn test_line_break_before_delimiter_is_swallowed() {
    let text = "Content-Type: multipart/mixed; boundary=X\r\n\r\n\
                --X\r\n\r\nno trailing break\r\n\
                --X--\r\n";
    let msg = parse_str(text).unwrap();
    let body = msg.parts()[0].as_simple().unwrap().body().to_vec();
    assert_eq!(body, vec!["no trailing break"]);
    assert!(!body.last().unwrap().ends_with("\r\n"));
}

#[test]
fn test_multipart_fixture() {
    let msg = parse_fixture("multipart.eml");
    let multi = msg.as_multipart().unwrap();

    assert_eq!(multi.boundary(), "==frontier==");
    assert!(msg.header("mime-version").is_some());
    assert_eq!(
        multi.preamble(),
        ["This is a multi-part message in MIME format.\r\n"]
    );
    assert_eq!(multi.epilogue(), ["epilogue line\r\n"]);
    assert_eq!(multi.parts().len(), 2);

    let text = multi.parts()[0].as_simple().unwrap();
    assert_eq!(text.headers().content_type(), Some("text/plain"));
    assert_eq!(text.body(), ["This is the body of the message.\r\n"]);

    let binary = &multi.parts()[1];
    assert_eq!(
        binary.header("Content-Transfer-Encoding").unwrap().value(),
        "base64"
    );
    assert_eq!(
        binary.as_simple().unwrap().body(),
        ["PGh0bWw+CiAgPGhlYWQ+CiAgPC9oZWFkPgo="]
    );
}

#[test]
fn test_nested_fixture() {
    let msg = parse_fixture("nested.eml");

    let paths: Vec<Vec<usize>> = msg.walk().into_iter().map(|(p, _)| p).collect();
    assert_eq!(paths, vec![vec![], vec![0], vec![0, 0], vec![0, 1], vec![1]]);

    let alternative = msg.part(&[0]).unwrap().as_multipart().unwrap();
    assert_eq!(alternative.boundary(), "inner");
    assert!(alternative.epilogue().is_empty());
    assert_eq!(
        msg.part(&[0, 1]).unwrap().as_simple().unwrap().body(),
        ["<p>html</p>"]
    );

    let attachment = msg.part(&[1]).unwrap();
    let disposition = attachment.header("content-disposition").unwrap();
    assert_eq!(disposition.value_without_parameters(), "attachment");
    assert_eq!(disposition.parameters()["filename"], "notes.txt");
}

#[test]
fn test_missing_boundary_parameter() {
    let err = parse_file(fixture("missing_boundary.eml"), ParseOptions::default()).unwrap_err();
    assert_eq!(err.line(), Some(2));
    assert_eq!(
        err.malformed_kind(),
        Some(MalformedKind::MissingBoundaryParameter)
    );
}

#[test]
fn test_missing_terminal_delimiter_keeps_last_part() {
    let msg = parse_fixture("truncated.eml");
    let multi = msg.as_multipart().unwrap();
    assert_eq!(multi.parts().len(), 2);
    assert_eq!(multi.parts()[0].as_simple().unwrap().body(), ["first"]);
    assert_eq!(
        multi.parts()[1].as_simple().unwrap().body(),
        ["second part\r\n", "still going\r\n"]
    );
}

#[test]
fn test_consecutive_delimiters_give_empty_part() {
    let text = "Content-Type: multipart/mixed; boundary=X\r\n\r\n--X\r\n--X\r\n\r\nB\r\n--X--\r\n";
    let msg = parse_str(text).unwrap();
    assert_eq!(msg.parts().len(), 2);
    let empty = msg.parts()[0].as_simple().unwrap();
    assert!(empty.headers().is_empty());
    assert!(empty.body().is_empty());
}

#[test]
fn test_malformed_part_fails_whole_message() {
    let text = "Content-Type: multipart/mixed; boundary=X\r\n\r\n--X\r\ngarbage\r\n--X--\r\n";
    let err = parse_str(text).unwrap_err();
    assert_eq!(err.line(), Some(4));
    assert_eq!(err.malformed_kind(), Some(MalformedKind::ExpectedHeader));
}

#[test]
fn test_presplit_lines_are_not_renormalized() {
    let lines: Vec<String> = vec![
        "Content-Type: multipart/mixed; boundary=X\r\n".into(),
        "\r\n".into(),
        "--X\r\n".into(),
        "\r\n".into(),
        "trailing spaces   \n".into(),
        "--X--".into(),
    ];
    let msg = parse(lines, false).unwrap();
    assert_eq!(
        msg.parts()[0].as_simple().unwrap().body(),
        ["trailing spaces   "]
    );
}

// ─── Test 5: Encoding ───────────────────────────────────────────────

#[test]
fn test_eight_bit_input_fails_with_line() {
    let err = parse_str("Subject: ok\r\n\r\nna\u{ef}ve\r\n").unwrap_err();
    assert!(matches!(err, MimeError::Encoding { line: 3 }));
}

#[test]
fn test_eight_bit_presplit_line_fails_when_normalizing() {
    let lines: Vec<String> = vec![
        "Subject: ok\n".into(),
        "\n".into(),
        "plain\n".into(),
        "r\u{e9}sum\u{e9}\n".into(),
    ];
    let err = parse(lines, true).unwrap_err();
    assert!(matches!(err, MimeError::Encoding { line: 4 }));
    assert_eq!(err.line(), Some(4));
}

#[test]
fn test_eight_bit_file_fails_with_line() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("latin1.eml");
    file.write_binary(b"Subject: caf\xe9\r\n\r\nbody\r\n").unwrap();
    file.assert(predicate::path::exists());

    let err = parse_file(file.path(), ParseOptions::default()).unwrap_err();
    assert!(matches!(err, MimeError::Encoding { line: 1 }));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_file(dir.path().join("absent.eml"), ParseOptions::default()).unwrap_err();
    assert!(matches!(err, MimeError::FileNotFound(_)));
    assert!(err.line().is_none());
}

// ─── Test 6: Type registry and serialization ────────────────────────

#[test]
fn test_declared_content_type_lookup() {
    let registry = MediaTypeRegistry::builtin();

    let msg = parse_fixture("multipart.eml");
    let binary = msg.parts()[1].as_simple().unwrap();
    let media = binary.content_type(&registry);
    assert_eq!(media.name, "application/octet-stream");
    assert!(media.binary);

    let untyped = parse_str("Subject: none\r\n\r\nhi\r\n").unwrap();
    assert_eq!(
        untyped.as_simple().unwrap().content_type(&registry).name,
        "text/plain"
    );
}

#[test]
fn test_json_tree_shape() {
    let msg = parse_fixture("nested.eml");
    let json = serde_json::to_value(&msg).unwrap();

    assert_eq!(json["kind"], "multipart");
    assert_eq!(json["boundary"], "outer");
    assert_eq!(json["parts"][0]["kind"], "multipart");
    assert_eq!(json["parts"][1]["kind"], "simple");
    assert_eq!(
        json["headers"]["Content-Type"]["parameters"]["boundary"]["value"],
        "outer"
    );
    let text = json.to_string();
    assert!(predicate::str::contains("notes.txt").eval(&text));
}

// ─── Test 7: Configuration file ─────────────────────────────────────

#[test]
fn test_load_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[parser]\nmax_depth = 1\n").unwrap();

    let config = mimetree::config::load_config_from(&path);
    assert_eq!(config.parse_options().max_depth, 1);

    let err = parse_file(fixture("nested.eml"), config.parse_options()).unwrap_err();
    assert!(matches!(err, MimeError::TooDeep { limit: 1, .. }));
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[parser\nmax_depth = ").unwrap();

    let config = mimetree::config::load_config_from(&path);
    assert_eq!(config.parse_options(), ParseOptions::default());
}

#[test]
fn test_save_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = mimetree::config::Config::default();
    config.parser.max_depth = 7;
    mimetree::config::save_config_to(&config, &path).unwrap();

    let loaded = mimetree::config::load_config_from(&path);
    assert_eq!(loaded.parser.max_depth, 7);
}
