//! Branch trace decoding.
//!
//! A trace is a text stream with one branch event per line, fields separated
//! by whitespace. Blank lines and `#` comments are ignored. Two layouts are
//! accepted:
//! 1. **Short:** `<pc> <outcome>`, always a conditional branch.
//! 2. **Long:** `<pc> <target> <outcome> <conditional> <call> <ret> <direct>`.
//!
//! Addresses are hexadecimal with an optional `0x` prefix. Outcome and flag
//! fields are decimal integers where any non-zero value means true.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::common::{Outcome, TraceError};

/// One decoded branch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchEvent {
    /// Address of the branch instruction.
    pub pc: u32,
    /// Resolved target address (0 when the trace does not record it).
    pub target: u32,
    /// Resolved direction.
    pub outcome: Outcome,
    /// Conditional branch, subject to direction prediction.
    pub conditional: bool,
    /// Function call.
    pub call: bool,
    /// Function return.
    pub ret: bool,
    /// Direct (PC-relative) control transfer.
    pub direct: bool,
}

impl BranchEvent {
    /// A conditional direct branch with no recorded target.
    pub const fn conditional(pc: u32, outcome: Outcome) -> Self {
        Self {
            pc,
            target: 0,
            outcome,
            conditional: true,
            call: false,
            ret: false,
            direct: true,
        }
    }
}

fn invalid(line: usize, field: &'static str, raw: &str) -> TraceError {
    TraceError::InvalidField {
        line,
        field,
        value: raw.to_owned(),
    }
}

/// Hex address with an optional `0x`. Signs are rejected.
fn parse_address(line: usize, field: &'static str, raw: &str) -> Result<u32, TraceError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid(line, field, raw));
    }
    u32::from_str_radix(digits, 16).map_err(|_| invalid(line, field, raw))
}

/// Unsigned decimal flag; any non-zero value is true.
fn parse_flag(line: usize, field: &'static str, raw: &str) -> Result<bool, TraceError> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(line, field, raw));
    }
    raw.parse::<u32>()
        .map(|v| v != 0)
        .map_err(|_| invalid(line, field, raw))
}

/// Decodes one trace line. Returns `Ok(None)` for blank and comment lines.
///
/// `line` is the 1-based line number used in error reports.
pub fn parse_line(line: usize, text: &str) -> Result<Option<BranchEvent>, TraceError> {
    let content = text.split('#').next().unwrap_or_default();
    let fields: Vec<&str> = content.split_whitespace().collect();

    match fields.as_slice() {
        [] => Ok(None),
        [pc, outcome] => Ok(Some(BranchEvent::conditional(
            parse_address(line, "pc", pc)?,
            parse_flag(line, "outcome", outcome)?.into(),
        ))),
        [pc, target, outcome, conditional, call, ret, direct] => Ok(Some(BranchEvent {
            pc: parse_address(line, "pc", pc)?,
            target: parse_address(line, "target", target)?,
            outcome: parse_flag(line, "outcome", outcome)?.into(),
            conditional: parse_flag(line, "conditional", conditional)?,
            call: parse_flag(line, "call", call)?,
            ret: parse_flag(line, "ret", ret)?,
            direct: parse_flag(line, "direct", direct)?,
        })),
        _ => Err(TraceError::FieldCount {
            line,
            found: fields.len(),
        }),
    }
}

/// Streaming iterator over the events of a trace.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<BranchEvent, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            match parse_line(self.line, &text) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
