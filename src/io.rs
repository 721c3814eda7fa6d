//! The text sink dumps are written to.
//!
//! [`DumpWriter`] tracks an indentation level and a character budget. Indentation
//! is inserted lazily: after a newline nothing is written until the next
//! non-newline character arrives, so blank lines stay blank. Once the budget is
//! spent further content is discarded and a single truncation notice is
//! appended.

use std::borrow::Cow;
use std::fmt;

/// The only end-of-line sequence the writer accepts.
pub const NEWLINE: char = '\n';

/// Default indentation unit.
pub const DEFAULT_INDENT: &str = "  ";

#[derive(Debug)]
enum Target<'b> {
    Owned(String),
    Borrowed(&'b mut String),
}

impl Target<'_> {
    fn buffer(&mut self) -> &mut String {
        match self {
            Target::Owned(s) => s,
            Target::Borrowed(s) => s,
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Target::Owned(s) => s,
            Target::Borrowed(s) => s,
        }
    }
}

/// An indentation-aware, length-bounded text writer.
#[derive(Debug)]
pub struct DumpWriter<'b> {
    target: Target<'b>,
    indent_unit: Cow<'static, str>,
    level: usize,
    pending_indent: bool,
    max_length: Option<usize>,
    written: usize,
    truncated: bool,
    closed: bool,
}

impl Default for DumpWriter<'_> {
    fn default() -> Self {
        Self::from_target(Target::Owned(String::new()))
    }
}

impl<'b> DumpWriter<'b> {
    fn from_target(target: Target<'b>) -> Self {
        Self {
            target,
            indent_unit: Cow::Borrowed(DEFAULT_INDENT),
            level: 0,
            pending_indent: false,
            max_length: None,
            written: 0,
            truncated: false,
            closed: false,
        }
    }

    /// A writer that owns its buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer appending to a caller-supplied buffer.
    pub fn with_buffer(buffer: &'b mut String) -> Self {
        Self::from_target(Target::Borrowed(buffer))
    }

    /// Sets the indentation unit.
    pub fn indent_unit(mut self, unit: impl Into<Cow<'static, str>>) -> Self {
        self.indent_unit = unit.into();
        self
    }

    /// Sets the character budget.
    pub fn max_length(mut self, max: Option<usize>) -> Self {
        self.max_length = max;
        self
    }

    /// Writes text, honouring indentation and the budget.
    pub fn write_text(&mut self, text: &str) {
        if self.closed || self.truncated {
            return;
        }
        for c in text.chars() {
            debug_assert_ne!(c, '\r', "DumpWriter only accepts '\\n' line endings");
            if c == NEWLINE {
                if !self.push(c) {
                    return;
                }
                self.pending_indent = true;
                continue;
            }
            if self.pending_indent {
                self.pending_indent = false;
                let indentation = self.indent_unit.repeat(self.level);
                for ic in indentation.chars() {
                    if !self.push(ic) {
                        return;
                    }
                }
            }
            if !self.push(c) {
                return;
            }
        }
    }

    /// Starts a new line.
    pub fn newline(&mut self) {
        let mut buf = [0u8; 4];
        self.write_text(NEWLINE.encode_utf8(&mut buf));
    }

    /// Increases the indentation level.
    pub fn indent(&mut self) {
        self.level += 1;
    }

    /// Decreases the indentation level.
    pub fn unindent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Current indentation level.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Characters written since creation or the last reset.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Returns true once the budget was exceeded.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// The buffer contents.
    pub fn as_str(&self) -> &str {
        self.target.as_str()
    }

    /// Resets counters and flags so the writer can be reused against the same
    /// buffer. Buffer contents are kept.
    pub fn reset(&mut self) {
        self.level = 0;
        self.pending_indent = false;
        self.written = 0;
        self.truncated = false;
        self.closed = false;
    }

    /// Closes the writer. Later writes are ignored; closing twice is harmless.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Returns true once closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Consumes the writer. For a wrapped buffer this returns a copy of it.
    pub fn into_string(self) -> String {
        match self.target {
            Target::Owned(s) => s,
            Target::Borrowed(s) => s.clone(),
        }
    }

    fn push(&mut self, c: char) -> bool {
        if let Some(max) = self.max_length
            && self.written >= max
        {
            self.truncate(max);
            return false;
        }
        self.target.buffer().push(c);
        self.written += 1;
        true
    }

    fn truncate(&mut self, max: usize) {
        if self.truncated {
            return;
        }
        self.truncated = true;
        tracing::debug!(max_length = max, "dump output truncated");
        let notice = crate::format::truncation_notice(max);
        self.target.buffer().push_str(&notice);
    }
}

impl fmt::Write for DumpWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_text(s);
        Ok(())
    }
}
