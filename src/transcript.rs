use std::io::{Result as IoResult, Write};

/// Append-only record of interpreter output.
///
/// Implements [`Write`] so commands can `writeln!` into it like any stream; each `\n`
/// terminates a line. `clear` drops everything but marks stay valid, so a reader holding a
/// mark taken before the clear simply resumes from the first line written after it.
#[derive(Debug, Default)]
pub struct Transcript {
    lines: Vec<String>,
    partial: Vec<u8>,
    /// Lines appended since creation, including cleared ones.
    appended: usize,
    clears: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line; embedded newlines split it into several.
    pub fn line(&mut self, text: impl AsRef<str>) {
        self.flush_partial();
        for line in text.as_ref().split('\n') {
            self.push(line.to_string());
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.partial.clear();
        self.clears += 1;
    }

    /// Number of times the transcript has been cleared.
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Position after the last line appended so far.
    pub fn mark(&self) -> usize {
        self.appended
    }

    /// Lines appended after `mark` that are still present.
    pub fn since(&self, mark: usize) -> &[String] {
        let dropped = self.appended - self.lines.len();
        let start = mark.saturating_sub(dropped).min(self.lines.len());
        &self.lines[start..]
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
        self.appended += 1;
    }

    fn flush_partial(&mut self) {
        if !self.partial.is_empty() {
            let line = String::from_utf8_lossy(&self.partial).into_owned();
            self.partial.clear();
            self.push(line);
        }
    }
}

impl Write for Transcript {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        for &byte in data {
            if byte == b'\n' {
                let line = String::from_utf8_lossy(&self.partial).into_owned();
                self.partial.clear();
                self.push(line);
            } else {
                self.partial.push(byte);
            }
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        self.flush_partial();
        Ok(())
    }
}
