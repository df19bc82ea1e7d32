//! Input and output collaborators for a game session.
//!
//! The engine never touches a terminal directly: it pulls raw lines from an
//! [`InputSource`] and pushes messages to an [`OutputSink`].

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Supplies the player's raw text input, one line per request.
pub trait InputSource {
    /// Reads the next line, without its trailing newline.
    ///
    /// Returns `Ok(None)` once the input is exhausted.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Receives human-readable messages, one logical message per call.
pub trait OutputSink {
    fn say(&mut self, message: &str) -> io::Result<()>;
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }
}

impl<T: OutputSink + ?Sized> OutputSink for &mut T {
    fn say(&mut self, message: &str) -> io::Result<()> {
        (**self).say(message)
    }
}

/// Collects every message in memory.
impl OutputSink for Vec<String> {
    fn say(&mut self, message: &str) -> io::Result<()> {
        self.push(message.to_string());
        Ok(())
    }
}

/// Reads lines from any buffered reader, such as a locked stdin.
#[derive(Debug)]
pub struct LineInput<R> {
    reader: R,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        LineInput { reader }
    }
}

impl<R: BufRead> InputSource for LineInput<R> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        // Bytes that are not UTF-8 still make a line, just one nobody understands
        let mut bytes = Vec::new();
        if self.reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&bytes);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

/// Writes each message as its own line and flushes, so prompts show up
/// before the game blocks on input.
#[derive(Debug)]
pub struct LineOutput<W> {
    writer: W,
}

impl<W: Write> LineOutput<W> {
    pub fn new(writer: W) -> Self {
        LineOutput { writer }
    }
}

impl<W: Write> OutputSink for LineOutput<W> {
    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{message}")?;
        self.writer.flush()
    }
}

/// Replays a fixed list of lines, then reports end of input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines that have not been consumed yet.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}
