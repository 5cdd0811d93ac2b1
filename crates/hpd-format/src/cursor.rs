//! Pull-based line reader with pushback
//!
//! The HPD format has no brackets or lengths, so the parser decides where a
//! container ends by looking at the next line and handing it back when it
//! belongs to someone else. [`LineCursor`] provides exactly that: peek,
//! consume, and restore to a saved [`Mark`].

/// A single line of input, without its terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number
    pub number: usize,
    /// Line text with `\n` / `\r\n` removed
    pub text: &'a str,
}

impl<'a> Line<'a> {
    /// Leading tag: the text up to the first tab
    pub fn tag(&self) -> &'a str {
        self.text.split('\t').next().unwrap_or_default()
    }
}

/// Saved cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    offset: usize,
    line: usize,
}

/// Cursor over the lines of an in-memory text
///
/// End of stream is `None`; an empty line in the text is `Some` with empty
/// text.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    text: &'a str,
    offset: usize,
    line: usize,
}

impl<'a> LineCursor<'a> {
    /// Create a cursor at the start of `text`
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            line: 0,
        }
    }

    /// Return the next line without consuming it
    pub fn peek(&self) -> Option<Line<'a>> {
        self.read_at(self.offset).map(|(line, _)| line)
    }

    /// Consume and return the next line
    pub fn advance(&mut self) -> Option<Line<'a>> {
        let (line, next) = self.read_at(self.offset)?;
        self.offset = next;
        self.line = line.number;
        Some(line)
    }

    /// Record the current position
    pub fn mark(&self) -> Mark {
        Mark {
            offset: self.offset,
            line: self.line,
        }
    }

    /// Restore a position recorded with [`LineCursor::mark`]
    pub fn pushback(&mut self, mark: Mark) {
        self.offset = mark.offset;
        self.line = mark.line;
    }

    /// Number of lines consumed so far
    pub fn lines_consumed(&self) -> usize {
        self.line
    }

    /// Whether all lines have been consumed
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.text.len()
    }

    fn read_at(&self, offset: usize) -> Option<(Line<'a>, usize)> {
        if offset >= self.text.len() {
            return None;
        }
        let rest = &self.text[offset..];
        let (raw, next) = match rest.find('\n') {
            Some(pos) => (&rest[..pos], offset + pos + 1),
            None => (rest, self.text.len()),
        };
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        Some((
            Line {
                number: self.line + 1,
                text,
            },
            next,
        ))
    }
}
