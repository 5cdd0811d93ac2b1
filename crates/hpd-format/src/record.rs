//! Record grammar: line tags, indents and positional fields
//!
//! Every HPD line starts with a literal tag followed by a fixed number of
//! tab characters, then the record's tab-separated fields:
//!
//! ```text
//! TGID\t\t\tChan1\tOff\t101\t...
//! ^tag ^indent ^fields
//! ```
//!
//! [`RecordTag`] is the registry of known tags. The hierarchical parser
//! looks up the tag of the next line here to decide whether the line
//! belongs to the current container.

use std::fmt::{self, Write as _};
use std::str::{FromStr, Split};

use crate::cursor::{Line, LineCursor};
use crate::error::ParseError;
use crate::service_type::ServiceType;
use crate::values::{parse_flag, AlertLight, AlertTone, Range};

/// Line tags known to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordTag {
    TargetModel,
    FormatVersion,
    TrunkSystem,
    ConventionalSystem,
    DqkStatus,
    Radio,
    Site,
    BandPlan,
    SiteFrequency,
    TrunkedGroup,
    TrunkedChannel,
    ConventionalGroup,
    ConventionalFrequency,
}

/// Literal tag to record type, consulted by the parser lookahead
const REGISTRY: &[(&str, RecordTag)] = &[
    ("TargetModel", RecordTag::TargetModel),
    ("FormatVersion", RecordTag::FormatVersion),
    ("Trunk", RecordTag::TrunkSystem),
    ("Conventional", RecordTag::ConventionalSystem),
    ("DQKs_Status", RecordTag::DqkStatus),
    ("UnitIds", RecordTag::Radio),
    ("Site", RecordTag::Site),
    ("BandPlan_P25", RecordTag::BandPlan),
    ("T-Freq", RecordTag::SiteFrequency),
    ("T-Group", RecordTag::TrunkedGroup),
    ("TGID", RecordTag::TrunkedChannel),
    ("C-Group", RecordTag::ConventionalGroup),
    ("C-Freq", RecordTag::ConventionalFrequency),
];

impl RecordTag {
    /// Literal tag text
    pub fn literal(&self) -> &'static str {
        match self {
            RecordTag::TargetModel => "TargetModel",
            RecordTag::FormatVersion => "FormatVersion",
            RecordTag::TrunkSystem => "Trunk",
            RecordTag::ConventionalSystem => "Conventional",
            RecordTag::DqkStatus => "DQKs_Status",
            RecordTag::Radio => "UnitIds",
            RecordTag::Site => "Site",
            RecordTag::BandPlan => "BandPlan_P25",
            RecordTag::SiteFrequency => "T-Freq",
            RecordTag::TrunkedGroup => "T-Group",
            RecordTag::TrunkedChannel => "TGID",
            RecordTag::ConventionalGroup => "C-Group",
            RecordTag::ConventionalFrequency => "C-Freq",
        }
    }

    /// Number of tabs between the tag and the first field
    pub fn indent(&self) -> usize {
        match self {
            RecordTag::TargetModel | RecordTag::FormatVersion => 1,
            RecordTag::DqkStatus | RecordTag::BandPlan => 2,
            _ => 3,
        }
    }

    /// Record type name used in error messages
    pub fn record_name(&self) -> &'static str {
        match self {
            RecordTag::TargetModel => "TargetModel",
            RecordTag::FormatVersion => "FormatVersion",
            RecordTag::TrunkSystem => "TrunkedSystem",
            RecordTag::ConventionalSystem => "ConventionalSystem",
            RecordTag::DqkStatus => "DQKStatus",
            RecordTag::Radio => "Radio",
            RecordTag::Site => "Site",
            RecordTag::BandPlan => "BandPlan",
            RecordTag::SiteFrequency => "SiteFrequency",
            RecordTag::TrunkedGroup => "TrunkedGroup",
            RecordTag::TrunkedChannel => "TrunkedChannel",
            RecordTag::ConventionalGroup => "ConventionalGroup",
            RecordTag::ConventionalFrequency => "ConventionalFrequency",
        }
    }

    /// Look up a literal tag
    pub fn lookup(tag: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|(literal, _)| *literal == tag)
            .map(|(_, record)| *record)
    }

    /// Tag of a line, if it is a known one
    pub fn of_line(line: &Line<'_>) -> Option<Self> {
        Self::lookup(line.tag())
    }

    /// Strip `tag + indent` from the line, failing with
    /// [`ParseError::Format`] if the line does not start with it
    pub fn strip<'a>(&self, line: Line<'a>) -> Result<&'a str, ParseError> {
        let format_error = || ParseError::Format {
            expected: self.record_name(),
            line: line.number,
        };
        let rest = line
            .text
            .strip_prefix(self.literal())
            .ok_or_else(format_error)?;
        let indent = self.indent();
        if rest.len() < indent || !rest.as_bytes()[..indent].iter().all(|&b| b == b'\t') {
            return Err(format_error());
        }
        Ok(&rest[indent..])
    }

    /// Strip the prefix and split the remainder into fields
    pub fn fields<'a>(&self, line: Line<'a>) -> Result<Fields<'a>, ParseError> {
        let rest = self.strip(line)?;
        Ok(Fields {
            record: self.record_name(),
            line: line.number,
            iter: rest.split('\t'),
        })
    }

    /// Consume the next line, which must be of this record type
    pub fn expect_line<'a>(&self, cursor: &mut LineCursor<'a>) -> Result<Line<'a>, ParseError> {
        cursor.advance().ok_or(ParseError::Format {
            expected: self.record_name(),
            line: cursor.lines_consumed() + 1,
        })
    }
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// Positional field reader for one record line
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    record: &'static str,
    line: usize,
    iter: Split<'a, char>,
}

impl<'a> Fields<'a> {
    /// Line number the fields came from
    pub fn line(&self) -> usize {
        self.line
    }

    /// Next field as raw text
    pub fn text(&mut self, field: &'static str) -> Result<&'a str, ParseError> {
        self.iter.next().ok_or(ParseError::MissingField {
            record: self.record,
            field,
            line: self.line,
        })
    }

    /// Next field as owned text
    pub fn string(&mut self, field: &'static str) -> Result<String, ParseError> {
        self.text(field).map(str::to_string)
    }

    /// Next field as an `On`/`Off` flag
    pub fn flag(&mut self, field: &'static str) -> Result<bool, ParseError> {
        let text = self.text(field)?;
        parse_flag(text).map_err(|source| ParseError::Value {
            line: self.line,
            source,
        })
    }

    /// Next field as a number
    pub fn number<T: FromStr>(&mut self, field: &'static str) -> Result<T, ParseError> {
        let text = self.text(field)?;
        text.parse::<T>().map_err(|_| ParseError::Value {
            line: self.line,
            source: crate::error::ValueError::InvalidNumber {
                field,
                value: text.to_string(),
            },
        })
    }

    /// Next four fields as a [`Range`]
    pub fn range(&mut self) -> Result<Range, ParseError> {
        Ok(Range {
            latitude: self.string("latitude")?,
            longitude: self.string("longitude")?,
            distance: self.string("distance")?,
            shape: self.string("shape")?,
        })
    }

    /// Next two fields as an [`AlertTone`]
    pub fn alert_tone(&mut self) -> Result<AlertTone, ParseError> {
        let tone = self.text("alert tone")?;
        let volume = self.text("alert volume")?;
        AlertTone::decode(tone, volume).map_err(|source| ParseError::Value {
            line: self.line,
            source,
        })
    }

    /// Next two fields as an [`AlertLight`]
    pub fn alert_light(&mut self) -> Result<AlertLight, ParseError> {
        let color = self.text("alert color")?;
        let pattern = self.text("alert pattern")?;
        Ok(AlertLight::decode(color, pattern))
    }

    /// Next field as a [`ServiceType`] code
    pub fn service_type(&mut self) -> Result<ServiceType, ParseError> {
        let text = self.text("service type")?;
        text.parse().map_err(|source| ParseError::Lookup {
            line: self.line,
            source,
        })
    }

    /// Remaining fields, kept verbatim
    pub fn rest(self) -> Vec<String> {
        self.iter.map(str::to_string).collect()
    }
}

/// Line terminator used by a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Detect the terminator from the first line of `text`
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(pos) if text[..pos].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Accumulates encoded record lines
#[derive(Debug, Clone, Default)]
pub struct RecordWriter {
    out: String,
    line_ending: LineEnding,
}

impl RecordWriter {
    pub fn new(line_ending: LineEnding) -> Self {
        Self {
            out: String::new(),
            line_ending,
        }
    }

    /// Start a line with `tag + indent`
    pub fn line(&mut self, tag: RecordTag) -> RecordLine<'_> {
        self.out.push_str(tag.literal());
        for _ in 0..tag.indent() {
            self.out.push('\t');
        }
        RecordLine {
            out: &mut self.out,
            line_ending: self.line_ending,
            first: true,
        }
    }

    /// Encoded text so far
    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// A line being written; fields are tab-separated
///
/// The line is terminated by [`RecordLine::end`].
#[must_use = "call end() to terminate the line"]
pub struct RecordLine<'w> {
    out: &'w mut String,
    line_ending: LineEnding,
    first: bool,
}

impl RecordLine<'_> {
    /// Append one field; composite values write their own inner tabs
    pub fn field(mut self, value: impl fmt::Display) -> Self {
        if !self.first {
            self.out.push('\t');
        }
        self.first = false;
        let _ = write!(self.out, "{}", value);
        self
    }

    /// Append a sequence of fields
    pub fn fields<I>(self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        values.into_iter().fold(self, |line, value| line.field(value))
    }

    /// Terminate the line
    pub fn end(self) {
        self.out.push_str(self.line_ending.as_str());
    }
}

/// Records that can be read from a [`LineCursor`]
pub trait ParseRecord: Sized {
    /// Parse one record, and for containers its children, from the cursor
    fn parse(cursor: &mut LineCursor<'_>) -> Result<Self, ParseError>;
}

/// Records that can be written back to HPD text
pub trait EncodeRecord {
    /// Write this record, and for containers its children
    fn encode(&self, out: &mut RecordWriter);

    /// Encode to a `\n`-terminated string
    fn to_hpd_string(&self) -> String {
        let mut out = RecordWriter::new(LineEnding::Lf);
        self.encode(&mut out);
        out.finish()
    }
}
