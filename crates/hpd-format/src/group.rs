//! Channel groups and their channels
//!
//! A trunked system holds `T-Group` groups of `TGID` channels, a
//! conventional system holds `C-Group` groups of `C-Freq` frequencies.
//! A group ends at the first line that is not one of its channels.
//!
//! Channels compare by their numeric identifier only (talkgroup id or
//! frequency), so two channels with the same id but different names are
//! equal. Storage order is always parse/insertion order.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::cursor::{Line, LineCursor};
use crate::error::ParseError;
use crate::record::{EncodeRecord, Fields, ParseRecord, RecordTag, RecordWriter};
use crate::service_type::ServiceType;
use crate::values::{flag_text, AlertLight, AlertTone, Range};

/// Talkgroup channel of a trunked group (`TGID`)
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrunkedChannel {
    pub name: String,
    pub avoid: bool,
    /// Talkgroup id
    pub tgid: u32,
    /// Audio type / TDMA mode (`ALL`, `Analog`, `Digital`, `None`)
    pub mode: String,
    pub service_type: ServiceType,
    /// Scan delay in seconds (negative values are resume modes)
    pub delay: i32,
    pub volume_offset: i32,
    pub alert_tone: AlertTone,
    pub alert_light: AlertLight,
    /// Number tag, `Off` when unset
    pub number_tag: String,
    /// Priority channel
    pub priority: bool,
    /// Trailing fields beyond the known shape, such as the TDMA slot
    pub extra: Vec<String>,
}

impl TrunkedChannel {
    /// Create a channel with default settings
    pub fn new(name: impl Into<String>, tgid: u32) -> Self {
        Self {
            name: name.into(),
            avoid: false,
            tgid,
            mode: "ALL".to_string(),
            service_type: ServiceType::default(),
            delay: 2,
            volume_offset: 0,
            alert_tone: AlertTone::default(),
            alert_light: AlertLight::default(),
            number_tag: "Off".to_string(),
            priority: false,
            extra: Vec::new(),
        }
    }

    /// Decode a `TGID` line
    pub fn from_line(line: Line<'_>) -> Result<Self, ParseError> {
        let mut f = RecordTag::TrunkedChannel.fields(line)?;
        Ok(Self {
            name: f.string("name")?,
            avoid: f.flag("avoid")?,
            tgid: f.number("tgid")?,
            mode: f.string("mode")?,
            service_type: f.service_type()?,
            delay: f.number("delay")?,
            volume_offset: f.number("volume offset")?,
            alert_tone: f.alert_tone()?,
            alert_light: f.alert_light()?,
            number_tag: f.string("number tag")?,
            priority: f.flag("priority")?,
            extra: f.rest(),
        })
    }
}

impl EncodeRecord for TrunkedChannel {
    fn encode(&self, out: &mut RecordWriter) {
        out.line(RecordTag::TrunkedChannel)
            .field(&self.name)
            .field(flag_text(self.avoid))
            .field(self.tgid)
            .field(&self.mode)
            .field(self.service_type.code())
            .field(self.delay)
            .field(self.volume_offset)
            .field(self.alert_tone)
            .field(self.alert_light)
            .field(&self.number_tag)
            .field(flag_text(self.priority))
            .fields(&self.extra)
            .end();
    }
}

impl fmt::Display for TrunkedChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} TGID: {}", self.name, self.tgid)
    }
}

impl PartialEq for TrunkedChannel {
    fn eq(&self, other: &Self) -> bool {
        self.tgid == other.tgid
    }
}

impl Eq for TrunkedChannel {}

impl Hash for TrunkedChannel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tgid.hash(state);
    }
}

impl PartialOrd for TrunkedChannel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TrunkedChannel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tgid.cmp(&other.tgid)
    }
}

/// Frequency of a conventional group (`C-Freq`)
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConventionalFrequency {
    pub name: String,
    pub avoid: bool,
    /// Frequency in Hz
    pub frequency: u64,
    /// Modulation (`AUTO`, `FM`, `NFM`, `AM`)
    pub modulation: String,
    /// Audio option (tone/code squelch setting)
    pub audio_option: String,
    pub service_type: ServiceType,
    pub attenuator: bool,
    pub delay: i32,
    pub volume_offset: i32,
    pub alert_tone: AlertTone,
    pub alert_light: AlertLight,
    pub number_tag: String,
    pub priority: bool,
    pub extra: Vec<String>,
}

impl ConventionalFrequency {
    /// Create a frequency with default settings
    pub fn new(name: impl Into<String>, frequency: u64) -> Self {
        Self {
            name: name.into(),
            avoid: false,
            frequency,
            modulation: "AUTO".to_string(),
            audio_option: String::new(),
            service_type: ServiceType::default(),
            attenuator: false,
            delay: 2,
            volume_offset: 0,
            alert_tone: AlertTone::default(),
            alert_light: AlertLight::default(),
            number_tag: "Off".to_string(),
            priority: false,
            extra: Vec::new(),
        }
    }

    /// Frequency in MHz, for display
    pub fn frequency_mhz(&self) -> f64 {
        self.frequency as f64 / 1_000_000.0
    }

    /// Decode a `C-Freq` line
    pub fn from_line(line: Line<'_>) -> Result<Self, ParseError> {
        let mut f = RecordTag::ConventionalFrequency.fields(line)?;
        Ok(Self {
            name: f.string("name")?,
            avoid: f.flag("avoid")?,
            frequency: f.number("frequency")?,
            modulation: f.string("modulation")?,
            audio_option: f.string("audio option")?,
            service_type: f.service_type()?,
            attenuator: f.flag("attenuator")?,
            delay: f.number("delay")?,
            volume_offset: f.number("volume offset")?,
            alert_tone: f.alert_tone()?,
            alert_light: f.alert_light()?,
            number_tag: f.string("number tag")?,
            priority: f.flag("priority")?,
            extra: f.rest(),
        })
    }
}

impl EncodeRecord for ConventionalFrequency {
    fn encode(&self, out: &mut RecordWriter) {
        out.line(RecordTag::ConventionalFrequency)
            .field(&self.name)
            .field(flag_text(self.avoid))
            .field(self.frequency)
            .field(&self.modulation)
            .field(&self.audio_option)
            .field(self.service_type.code())
            .field(flag_text(self.attenuator))
            .field(self.delay)
            .field(self.volume_offset)
            .field(self.alert_tone)
            .field(self.alert_light)
            .field(&self.number_tag)
            .field(flag_text(self.priority))
            .fields(&self.extra)
            .end();
    }
}

impl fmt::Display for ConventionalFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Frequency: {}", self.name, self.frequency_mhz())
    }
}

impl PartialEq for ConventionalFrequency {
    fn eq(&self, other: &Self) -> bool {
        self.frequency == other.frequency
    }
}

impl Eq for ConventionalFrequency {}

impl Hash for ConventionalFrequency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.frequency.hash(state);
    }
}

impl PartialOrd for ConventionalFrequency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConventionalFrequency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.frequency.cmp(&other.frequency)
    }
}

/// Quick key field: `Off` or a number
fn quick_key(fields: &mut Fields<'_>) -> Result<Option<u16>, ParseError> {
    let line = fields.line();
    match fields.text("quick key")? {
        "Off" => Ok(None),
        text => text.parse().map(Some).map_err(|_| ParseError::Value {
            line,
            source: crate::error::ValueError::InvalidNumber {
                field: "quick key",
                value: text.to_string(),
            },
        }),
    }
}

fn quick_key_text(quick_key: Option<u16>) -> String {
    quick_key.map_or_else(|| "Off".to_string(), |qk| qk.to_string())
}

/// Trunked talkgroup group (`T-Group`)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrunkedGroup {
    pub name: String,
    pub avoid: bool,
    pub range: Range,
    /// Quick key, `None` = `Off`
    pub quick_key: Option<u16>,
    pub extra: Vec<String>,
    pub channels: Vec<TrunkedChannel>,
}

impl TrunkedGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avoid: false,
            range: Range::default(),
            quick_key: None,
            extra: Vec::new(),
            channels: Vec::new(),
        }
    }

    /// Decode the `T-Group` header line only
    pub fn from_line(line: Line<'_>) -> Result<Self, ParseError> {
        let mut f = RecordTag::TrunkedGroup.fields(line)?;
        Ok(Self {
            name: f.string("name")?,
            avoid: f.flag("avoid")?,
            range: f.range()?,
            quick_key: quick_key(&mut f)?,
            extra: f.rest(),
            channels: Vec::new(),
        })
    }
}

impl fmt::Display for TrunkedGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} QK {} [{} Channels]",
            self.name,
            quick_key_text(self.quick_key),
            self.channels.len()
        )
    }
}

impl ParseRecord for TrunkedGroup {
    fn parse(cursor: &mut LineCursor<'_>) -> Result<Self, ParseError> {
        let header = RecordTag::TrunkedGroup.expect_line(cursor)?;
        let mut group = Self::from_line(header)?;
        loop {
            let mark = cursor.mark();
            match cursor.advance() {
                Some(line) if RecordTag::of_line(&line) == Some(RecordTag::TrunkedChannel) => {
                    group.channels.push(TrunkedChannel::from_line(line)?);
                }
                _ => {
                    cursor.pushback(mark);
                    return Ok(group);
                }
            }
        }
    }
}

impl EncodeRecord for TrunkedGroup {
    fn encode(&self, out: &mut RecordWriter) {
        out.line(RecordTag::TrunkedGroup)
            .field(&self.name)
            .field(flag_text(self.avoid))
            .field(&self.range)
            .field(quick_key_text(self.quick_key))
            .fields(&self.extra)
            .end();
        for channel in &self.channels {
            channel.encode(out);
        }
    }
}

/// Conventional frequency group (`C-Group`)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConventionalGroup {
    pub name: String,
    pub avoid: bool,
    pub range: Range,
    pub quick_key: Option<u16>,
    /// Filter setting (`Global`, `Normal`, `Invert`, ...)
    pub filter: String,
    pub extra: Vec<String>,
    pub frequencies: Vec<ConventionalFrequency>,
}

impl ConventionalGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avoid: false,
            range: Range::default(),
            quick_key: None,
            filter: "Global".to_string(),
            extra: Vec::new(),
            frequencies: Vec::new(),
        }
    }

    /// Decode the `C-Group` header line only
    pub fn from_line(line: Line<'_>) -> Result<Self, ParseError> {
        let mut f = RecordTag::ConventionalGroup.fields(line)?;
        Ok(Self {
            name: f.string("name")?,
            avoid: f.flag("avoid")?,
            range: f.range()?,
            quick_key: quick_key(&mut f)?,
            filter: f.string("filter")?,
            extra: f.rest(),
            frequencies: Vec::new(),
        })
    }
}

impl fmt::Display for ConventionalGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} QK {} [{} Frequencies]",
            self.name,
            quick_key_text(self.quick_key),
            self.frequencies.len()
        )
    }
}

impl ParseRecord for ConventionalGroup {
    fn parse(cursor: &mut LineCursor<'_>) -> Result<Self, ParseError> {
        let header = RecordTag::ConventionalGroup.expect_line(cursor)?;
        let mut group = Self::from_line(header)?;
        loop {
            let mark = cursor.mark();
            match cursor.advance() {
                Some(line)
                    if RecordTag::of_line(&line) == Some(RecordTag::ConventionalFrequency) =>
                {
                    group.frequencies.push(ConventionalFrequency::from_line(line)?);
                }
                _ => {
                    cursor.pushback(mark);
                    return Ok(group);
                }
            }
        }
    }
}

impl EncodeRecord for ConventionalGroup {
    fn encode(&self, out: &mut RecordWriter) {
        out.line(RecordTag::ConventionalGroup)
            .field(&self.name)
            .field(flag_text(self.avoid))
            .field(&self.range)
            .field(quick_key_text(self.quick_key))
            .field(&self.filter)
            .fields(&self.extra)
            .end();
        for frequency in &self.frequencies {
            frequency.encode(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueError;
    use crate::values::{AlertColor, AlertPattern};

    const TGID_LINE: &str = "TGID\t\t\tChan1\tOff\t101\tNone\t21\t2\t0\t0\tAuto\tOff\tOn\t\tOff";
    const CFREQ_LINE: &str =
        "C-Freq\t\t\tFire Ground\tOff\t154280000\tFM\tTONE=C156.7\t8\tOff\t2\t0\t3\t10\tRed\tSlow Blink\tOff\tOn";

    fn line(text: &str) -> Line<'_> {
        Line { number: 1, text }
    }

    #[test]
    fn test_parse_trunked_channel() {
        let ch = TrunkedChannel::from_line(line(TGID_LINE)).unwrap();
        assert_eq!(ch.name, "Chan1");
        assert!(!ch.avoid);
        assert_eq!(ch.tgid, 101);
        assert_eq!(ch.mode, "None");
        assert_eq!(ch.service_type.label(), "Other");
        assert_eq!(ch.delay, 2);
        assert_eq!(ch.alert_tone.tone, Some(0));
        assert_eq!(ch.alert_light, AlertLight::default());
        assert_eq!(ch.number_tag, "");
        assert!(!ch.priority);
        assert!(ch.extra.is_empty());
    }

    #[test]
    fn test_trunked_channel_round_trip() {
        let ch = TrunkedChannel::from_line(line(TGID_LINE)).unwrap();
        assert_eq!(ch.to_hpd_string(), format!("{}\n", TGID_LINE));
    }

    #[test]
    fn test_trunked_channel_keeps_tdma_slot() {
        let text = format!("{}\tAny", TGID_LINE);
        let ch = TrunkedChannel::from_line(line(&text)).unwrap();
        assert_eq!(ch.extra, vec!["Any"]);
        assert_eq!(ch.to_hpd_string(), format!("{}\n", text));
    }

    #[test]
    fn test_trunked_channel_truncated() {
        let err = TrunkedChannel::from_line(line("TGID\t\t\tChan1\tOff\t101")).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingField {
                record: "TrunkedChannel",
                field: "mode",
                line: 1
            }
        );
    }

    #[test]
    fn test_trunked_channel_bad_avoid_flag() {
        let text = TGID_LINE.replacen("\tOff\t101", "\tYes\t101", 1);
        let err = TrunkedChannel::from_line(line(&text)).unwrap_err();
        assert_eq!(
            err,
            ParseError::Value {
                line: 1,
                source: ValueError::InvalidFlag("Yes".to_string())
            }
        );
    }

    #[test]
    fn test_trunked_channel_unknown_service_type() {
        let text = TGID_LINE.replacen("\tNone\t21\t", "\tNone\t5\t", 1);
        let err = TrunkedChannel::from_line(line(&text)).unwrap_err();
        assert!(matches!(err, ParseError::Lookup { line: 1, .. }));
    }

    #[test]
    fn test_channel_identity_by_tgid() {
        let mut a = TrunkedChannel::new("Dispatch", 101);
        let b = TrunkedChannel::new("Something else", 101);
        a.mode = "Digital".to_string();
        assert_eq!(a, b);

        let c = TrunkedChannel::new("Dispatch", 102);
        assert_ne!(a, c);
        assert!(a < c);
    }

    #[test]
    fn test_sort_and_dedup_copy() {
        let group = TrunkedGroup {
            channels: vec![
                TrunkedChannel::new("C", 300),
                TrunkedChannel::new("A", 100),
                TrunkedChannel::new("A again", 100),
            ],
            ..TrunkedGroup::new("G")
        };
        let mut sorted = group.channels.clone();
        sorted.sort();
        sorted.dedup();
        let ids: Vec<_> = sorted.iter().map(|c| c.tgid).collect();
        assert_eq!(ids, vec![100, 300]);
        // storage order is untouched
        assert_eq!(group.channels[0].tgid, 300);
    }

    #[test]
    fn test_parse_conventional_frequency() {
        let freq = ConventionalFrequency::from_line(line(CFREQ_LINE)).unwrap();
        assert_eq!(freq.frequency, 154_280_000);
        assert_eq!(freq.frequency_mhz(), 154.28);
        assert_eq!(freq.modulation, "FM");
        assert_eq!(freq.audio_option, "TONE=C156.7");
        assert_eq!(freq.service_type.label(), "Fire-Tac");
        assert!(!freq.attenuator);
        assert_eq!(freq.alert_tone, AlertTone::new(3, 10));
        assert_eq!(freq.alert_light.color, AlertColor::Red);
        assert_eq!(freq.alert_light.pattern, AlertPattern::SlowBlink);
        assert!(freq.priority);
        assert_eq!(freq.to_hpd_string(), format!("{}\n", CFREQ_LINE));
    }

    #[test]
    fn test_display() {
        let mut group = TrunkedGroup::new("Fire");
        group.quick_key = Some(3);
        group.channels.push(TrunkedChannel::new("Dispatch", 1001));
        assert_eq!(group.to_string(), "Fire QK 3 [1 Channels]");
        assert_eq!(group.channels[0].to_string(), "Dispatch TGID: 1001");

        let mut conventional = ConventionalGroup::new("Marine");
        conventional
            .frequencies
            .push(ConventionalFrequency::new("Ch 16", 156_800_000));
        assert_eq!(conventional.to_string(), "Marine QK Off [1 Frequencies]");
        assert_eq!(conventional.frequencies[0].to_string(), "Ch 16 Frequency: 156.8");
    }

    #[test]
    fn test_frequency_identity() {
        let a = ConventionalFrequency::new("A", 460_000_000);
        let mut b = ConventionalFrequency::new("B", 460_000_000);
        b.modulation = "NFM".to_string();
        assert_eq!(a, b);
        assert_ne!(a, ConventionalFrequency::new("A", 460_012_500));
    }

    #[test]
    fn test_parse_trunked_group_stops_at_sibling() {
        let text = format!(
            "T-Group\t\t\tGrp1\tOff\t0.000000\t0.000000\t0.0\tCircle\t1\n{}\n{}\nT-Group\t\t\tGrp2\tOn\t0.000000\t0.000000\t0.0\tCircle\tOff\n",
            TGID_LINE,
            TGID_LINE.replace("101", "102")
        );
        let mut cursor = LineCursor::new(&text);
        let group = TrunkedGroup::parse(&mut cursor).unwrap();
        assert_eq!(group.name, "Grp1");
        assert_eq!(group.quick_key, Some(1));
        assert_eq!(group.channels.len(), 2);
        assert_eq!(group.channels[1].tgid, 102);

        let next = cursor.peek().unwrap();
        assert_eq!(next.number, 4);
        assert_eq!(next.tag(), "T-Group");

        let second = TrunkedGroup::parse(&mut cursor).unwrap();
        assert!(second.avoid);
        assert_eq!(second.quick_key, None);
        assert!(second.channels.is_empty());
        assert!(cursor.peek().is_none());
    }

    #[test]
    fn test_trunked_group_ignores_frequencies() {
        let text = format!(
            "T-Group\t\t\tGrp1\tOff\t0.000000\t0.000000\t0.0\tCircle\t1\n{}\n",
            CFREQ_LINE
        );
        let mut cursor = LineCursor::new(&text);
        let group = TrunkedGroup::parse(&mut cursor).unwrap();
        assert!(group.channels.is_empty());
        assert_eq!(cursor.peek().unwrap().tag(), "C-Freq");
    }

    #[test]
    fn test_group_bad_quick_key() {
        let err = TrunkedGroup::from_line(line(
            "T-Group\t\t\tGrp1\tOff\t0.000000\t0.000000\t0.0\tCircle\tQK",
        ))
        .unwrap_err();
        assert!(matches!(err, ParseError::Value { .. }));
    }

    #[test]
    fn test_conventional_group_round_trip() {
        let text = format!(
            "C-Group\t\t\tFireground\tOff\t-33.865143\t151.209900\t5.0\tCircle\t12\tGlobal\n{}\n",
            CFREQ_LINE
        );
        let mut cursor = LineCursor::new(&text);
        let group = ConventionalGroup::parse(&mut cursor).unwrap();
        assert_eq!(group.filter, "Global");
        assert_eq!(group.range.longitude, "151.209900");
        assert_eq!(group.frequencies.len(), 1);
        assert_eq!(group.to_hpd_string(), text);
    }

    #[test]
    fn test_group_header_mismatch_is_format_error() {
        let mut cursor = LineCursor::new("C-Group\t\t\tG\tOff\t0\t0\t0\tCircle\t1\tGlobal\n");
        let err = TrunkedGroup::parse(&mut cursor).unwrap_err();
        assert_eq!(
            err,
            ParseError::Format {
                expected: "TrunkedGroup",
                line: 1
            }
        );
    }
}
