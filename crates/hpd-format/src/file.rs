//! HPD file container
//!
//! ```text
//! TargetModel\tBCD436HP
//! FormatVersion\t1.00
//! Trunk\t\t\t...        <- zero or more systems
//! ```

use std::io::{Read, Write};
use std::str::FromStr;

use crate::cursor::LineCursor;
use crate::error::{HpdError, ParseError};
use crate::group::{TrunkedChannel, TrunkedGroup};
use crate::record::{EncodeRecord, LineEnding, ParseRecord, RecordTag, RecordWriter};
use crate::system::System;

/// A complete HPD configuration file
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnidenFile {
    /// Scanner model the file targets
    pub target_model: String,
    pub format_version: String,
    /// Line terminator, reproduced on export
    #[cfg_attr(feature = "serde", serde(default))]
    pub line_ending: LineEnding,
    pub systems: Vec<System>,
}

impl Default for UnidenFile {
    fn default() -> Self {
        Self {
            target_model: "BCDx36HP".to_string(),
            format_version: "1.00".to_string(),
            line_ending: LineEnding::Lf,
            systems: Vec::new(),
        }
    }
}

impl UnidenFile {
    /// Read and parse a whole stream
    pub fn from_stream<R: Read>(mut reader: R) -> Result<Self, HpdError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(text.parse::<UnidenFile>()?)
    }

    /// Write the file to a stream
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), HpdError> {
        writer.write_all(self.export().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Encode the file as text
    pub fn export(&self) -> String {
        let mut out = RecordWriter::new(self.line_ending);
        self.encode(&mut out);
        out.finish()
    }

    /// Every trunked channel with its system and group, in file order
    pub fn trunked_channels(
        &self,
    ) -> impl Iterator<Item = (&System, &TrunkedGroup, &TrunkedChannel)> + '_ {
        self.systems.iter().flat_map(|system| {
            system.trunked_groups().iter().flat_map(move |group| {
                group
                    .channels
                    .iter()
                    .map(move |channel| (system, group, channel))
            })
        })
    }

    fn parse_header(cursor: &mut LineCursor<'_>, tag: RecordTag) -> Result<String, ParseError> {
        let line = cursor
            .advance()
            .ok_or(ParseError::MissingHeader(tag.literal()))?;
        Ok(tag.strip(line)?.to_string())
    }
}

impl FromStr for UnidenFile {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut cursor = LineCursor::new(text);
        let mut file = UnidenFile {
            target_model: Self::parse_header(&mut cursor, RecordTag::TargetModel)?,
            format_version: Self::parse_header(&mut cursor, RecordTag::FormatVersion)?,
            line_ending: LineEnding::detect(text),
            systems: Vec::new(),
        };

        while let Some(line) = cursor.peek() {
            match RecordTag::of_line(&line) {
                Some(RecordTag::TrunkSystem | RecordTag::ConventionalSystem) => {
                    file.systems.push(System::parse(&mut cursor)?);
                }
                _ => {
                    tracing::warn!(
                        "Line {}: unexpected line at file level, stopping after {} systems: {:?}",
                        line.number,
                        file.systems.len(),
                        line.text
                    );
                    break;
                }
            }
        }

        tracing::debug!(
            "Parsed {} file version {} with {} systems",
            file.target_model,
            file.format_version,
            file.systems.len()
        );
        Ok(file)
    }
}

impl EncodeRecord for UnidenFile {
    fn encode(&self, out: &mut RecordWriter) {
        out.line(RecordTag::TargetModel)
            .field(&self.target_model)
            .end();
        out.line(RecordTag::FormatVersion)
            .field(&self.format_version)
            .end();
        for system in &self.systems {
            system.encode(out);
        }
    }
}
