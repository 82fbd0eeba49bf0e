//! Trace decoding tests.

use std::io::{Cursor, Write};

use bpsim_core::Outcome::{self, NotTaken as N, Taken as T};
use bpsim_core::common::TraceError;
use bpsim_core::sim::trace::parse_line;
use bpsim_core::sim::{BranchEvent, TraceReader};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

#[rstest]
#[case("400 1", 0x400, T)]
#[case("0x400 0", 0x400, N)]
#[case("0XdeadBEEF 7", 0xDEAD_BEEF, T)]
#[case("  10\t1  ", 0x10, T)]
#[case("10 1 # loop back-edge", 0x10, T)]
fn short_lines(#[case] text: &str, #[case] pc: u32, #[case] outcome: Outcome) {
    assert_eq!(parse_line(1, text).unwrap(), Some(BranchEvent::conditional(pc, outcome)));
}

#[test]
fn long_line() {
    let event = parse_line(3, "0x1000 0x2000 1 0 1 0 1").unwrap().unwrap();
    assert_eq!(
        event,
        BranchEvent {
            pc: 0x1000,
            target: 0x2000,
            outcome: T,
            conditional: false,
            call: true,
            ret: false,
            direct: true,
        }
    );
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("# header comment")]
fn ignored_lines(#[case] text: &str) {
    assert_eq!(parse_line(1, text).unwrap(), None);
}

#[test]
fn wrong_field_count() {
    assert!(matches!(
        parse_line(4, "400 1 2"),
        Err(TraceError::FieldCount { line: 4, found: 3 })
    ));
    assert!(matches!(
        parse_line(5, "400"),
        Err(TraceError::FieldCount { line: 5, found: 1 })
    ));
}

#[test]
fn invalid_fields() {
    match parse_line(2, "xyz 1") {
        Err(TraceError::InvalidField { line, field, value }) => {
            assert_eq!(line, 2);
            assert_eq!(field, "pc");
            assert_eq!(value, "xyz");
        }
        other => panic!("expected InvalidField, got {other:?}"),
    }
    assert!(matches!(
        parse_line(1, "400 taken"),
        Err(TraceError::InvalidField { field: "outcome", .. })
    ));
    assert!(matches!(
        parse_line(1, "400 0 1 yes 0 0 1"),
        Err(TraceError::InvalidField { field: "conditional", .. })
    ));
    assert!(matches!(
        parse_line(1, "100000000 1"),
        Err(TraceError::InvalidField { field: "pc", .. })
    ));
}

#[rstest]
#[case("+10 1", "pc")]
#[case("-10 1", "pc")]
#[case("0x+10 1", "pc")]
#[case("10 +1", "outcome")]
#[case("10 0x40 1 -0 0 0 1", "conditional")]
#[case("10 +40 1 1 0 0 1", "target")]
fn signed_fields_are_rejected(#[case] text: &str, #[case] expected: &str) {
    match parse_line(7, text) {
        Err(TraceError::InvalidField { line, field, .. }) => {
            assert_eq!(line, 7);
            assert_eq!(field, expected);
        }
        other => panic!("expected InvalidField for `{text}`, got {other:?}"),
    }
}

#[test]
fn reader_skips_blank_and_comment_lines() {
    let text = "# trace\n400 1\n\n404 0\n   # trailing\n408 1\n";
    let events: Vec<BranchEvent> = TraceReader::new(Cursor::new(text))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        events,
        vec![
            BranchEvent::conditional(0x400, T),
            BranchEvent::conditional(0x404, N),
            BranchEvent::conditional(0x408, T),
        ]
    );
}

#[test]
fn reader_reports_physical_line_numbers() {
    let text = "400 1\n\n# gap\nbad line here\n";
    let results: Vec<_> = TraceReader::new(Cursor::new(text)).collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(TraceError::FieldCount { line: 4, found: 3 })
    ));
}

#[test]
fn reader_opens_files() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "0x10 1").unwrap();
    writeln!(file, "0x14 0x40 0 1 0 0 1").unwrap();
    file.flush().unwrap();

    let events: Vec<BranchEvent> = TraceReader::open(file.path())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].target, 0x40);
    assert_eq!(events[1].outcome, N);
    assert!(events[1].conditional);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TraceReader::open(dir.path().join("absent.trace")).unwrap_err();
    assert!(matches!(err, TraceError::Io(_)));
}
