//! Line scanning shared by the output parsers

use crate::error::PackageError;

/// Longest output line a parser accepts
pub(crate) const MAX_LINE_LEN: usize = 64 * 1024;

/// Iterates over query output lines with surrounding spaces and `'` trimmed.
///
/// Yields an error and stops at the first line longer than [`MAX_LINE_LEN`].
pub(crate) struct OutputScanner<'a> {
    lines: std::str::Lines<'a>,
    failed: bool,
}

impl<'a> OutputScanner<'a> {
    pub(crate) fn new(output: &'a str) -> Self {
        Self {
            lines: output.lines(),
            failed: false,
        }
    }
}

impl<'a> Iterator for OutputScanner<'a> {
    type Item = Result<&'a str, PackageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let line = self.lines.next()?;
        if line.len() > MAX_LINE_LEN {
            self.failed = true;
            return Some(Err(PackageError::OutputRead(format!(
                "line of {} bytes exceeds {MAX_LINE_LEN} byte limit",
                line.len()
            ))));
        }
        Some(Ok(line.trim_matches([' ', '\''])))
    }
}

/// Split a line on single spaces into exactly three fields
pub(crate) fn three_fields(line: &str) -> Option<[&str; 3]> {
    let mut fields = line.split(' ');
    let parsed = [fields.next()?, fields.next()?, fields.next()?];
    fields.next().is_none().then_some(parsed)
}
