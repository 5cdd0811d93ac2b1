//! Radio systems and their per-system records
//!
//! A system starts with a `Trunk` or `Conventional` line and owns every
//! following line up to the next system header. Its children are:
//!
//! - `DQKs_Status` (at most one)
//! - `UnitIds` radios
//! - `Site` headers, each followed by `BandPlan_P25` / `T-Freq` lines
//! - `T-Group` or `C-Group` groups, matching the system kind
//!
//! Any other line ends the system early. That is logged and the system
//! parsed so far is returned, unlike a malformed header which is an error.

use std::fmt;

use crate::cursor::{Line, LineCursor};
use crate::error::ParseError;
use crate::group::{ConventionalGroup, TrunkedGroup};
use crate::record::{EncodeRecord, ParseRecord, RecordTag, RecordWriter};
use crate::values::{AlertLight, AlertTone};

/// Radio unit id (`UnitIds`)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Radio {
    pub name: String,
    pub radio_id: u32,
    pub alert_tone: AlertTone,
    pub alert_light: AlertLight,
    pub extra: Vec<String>,
}

impl Radio {
    pub fn new(name: impl Into<String>, radio_id: u32) -> Self {
        Self {
            name: name.into(),
            radio_id,
            alert_tone: AlertTone::default(),
            alert_light: AlertLight::default(),
            extra: Vec::new(),
        }
    }

    /// Decode a `UnitIds` line
    pub fn from_line(line: Line<'_>) -> Result<Self, ParseError> {
        let mut f = RecordTag::Radio.fields(line)?;
        Ok(Self {
            name: f.string("name")?,
            radio_id: f.number("radio id")?,
            alert_tone: f.alert_tone()?,
            alert_light: f.alert_light()?,
            extra: f.rest(),
        })
    }
}

impl fmt::Display for Radio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} UID: {}", self.name, self.radio_id)
    }
}

impl EncodeRecord for Radio {
    fn encode(&self, out: &mut RecordWriter) {
        out.line(RecordTag::Radio)
            .field(&self.name)
            .field(self.radio_id)
            .field(self.alert_tone)
            .field(self.alert_light)
            .fields(&self.extra)
            .end();
    }
}

/// DQK status tokens (`DQKs_Status`), kept verbatim
///
/// A line with nothing after the tag decodes to an empty list, which is
/// also how an empty list is written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DqkStatus {
    pub statuses: Vec<String>,
}

impl DqkStatus {
    pub fn from_line(line: Line<'_>) -> Result<Self, ParseError> {
        let mut statuses = RecordTag::DqkStatus.fields(line)?.rest();
        if statuses.len() == 1 && statuses[0].is_empty() {
            statuses.clear();
        }
        Ok(Self { statuses })
    }
}

impl EncodeRecord for DqkStatus {
    fn encode(&self, out: &mut RecordWriter) {
        out.line(RecordTag::DqkStatus).fields(&self.statuses).end();
    }
}

/// P25 band plan of a site (`BandPlan_P25`), kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BandPlan {
    pub value: String,
}

impl BandPlan {
    pub fn from_line(line: Line<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            value: RecordTag::BandPlan.strip(line)?.to_string(),
        })
    }
}

impl EncodeRecord for BandPlan {
    fn encode(&self, out: &mut RecordWriter) {
        out.line(RecordTag::BandPlan).field(&self.value).end();
    }
}

/// Site control channel frequency (`T-Freq`), kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiteFrequency {
    pub value: String,
}

impl SiteFrequency {
    pub fn from_line(line: Line<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            value: RecordTag::SiteFrequency.strip(line)?.to_string(),
        })
    }
}

impl EncodeRecord for SiteFrequency {
    fn encode(&self, out: &mut RecordWriter) {
        out.line(RecordTag::SiteFrequency).field(&self.value).end();
    }
}

/// Trunked site (`Site`)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Site {
    /// Site fields after the tag, verbatim
    pub value: String,
    pub band_plan: Option<BandPlan>,
    pub frequencies: Vec<SiteFrequency>,
}

impl Site {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            band_plan: None,
            frequencies: Vec::new(),
        }
    }
}

impl ParseRecord for Site {
    fn parse(cursor: &mut LineCursor<'_>) -> Result<Self, ParseError> {
        let header = RecordTag::Site.expect_line(cursor)?;
        let mut site = Site::new(RecordTag::Site.strip(header)?);
        loop {
            let mark = cursor.mark();
            let Some(line) = cursor.advance() else {
                break;
            };
            match RecordTag::of_line(&line) {
                Some(RecordTag::SiteFrequency) => {
                    site.frequencies.push(SiteFrequency::from_line(line)?);
                }
                Some(RecordTag::BandPlan) => {
                    if site.band_plan.replace(BandPlan::from_line(line)?).is_some() {
                        tracing::warn!(
                            "Line {}: second BandPlan in site, keeping the last one",
                            line.number
                        );
                    }
                }
                _ => {
                    cursor.pushback(mark);
                    break;
                }
            }
        }
        Ok(site)
    }
}

impl EncodeRecord for Site {
    fn encode(&self, out: &mut RecordWriter) {
        out.line(RecordTag::Site).field(&self.value).end();
        if let Some(band_plan) = &self.band_plan {
            band_plan.encode(out);
        }
        for frequency in &self.frequencies {
            frequency.encode(out);
        }
    }
}

/// System kind, fixed by the header tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemKind {
    Trunked,
    Conventional,
}

impl SystemKind {
    /// Header tag for this kind
    pub fn tag(&self) -> RecordTag {
        match self {
            SystemKind::Trunked => RecordTag::TrunkSystem,
            SystemKind::Conventional => RecordTag::ConventionalSystem,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SystemKind::Trunked => "trunked",
            SystemKind::Conventional => "conventional",
        }
    }
}

/// Groups of a system; always homogeneous with the system kind
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemGroups {
    Trunked(Vec<TrunkedGroup>),
    Conventional(Vec<ConventionalGroup>),
}

impl SystemGroups {
    fn empty(kind: SystemKind) -> Self {
        match kind {
            SystemKind::Trunked => SystemGroups::Trunked(Vec::new()),
            SystemKind::Conventional => SystemGroups::Conventional(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SystemGroups::Trunked(groups) => groups.len(),
            SystemGroups::Conventional(groups) => groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A trunked or conventional radio system
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct System {
    /// System fields after the tag, verbatim
    pub value: String,
    pub dqk_status: Option<DqkStatus>,
    pub radios: Vec<Radio>,
    pub sites: Vec<Site>,
    pub groups: SystemGroups,
}

impl System {
    /// Create an empty system of the given kind
    pub fn new(kind: SystemKind, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            dqk_status: None,
            radios: Vec::new(),
            sites: Vec::new(),
            groups: SystemGroups::empty(kind),
        }
    }

    pub fn kind(&self) -> SystemKind {
        match self.groups {
            SystemGroups::Trunked(_) => SystemKind::Trunked,
            SystemGroups::Conventional(_) => SystemKind::Conventional,
        }
    }

    /// Trunked groups; empty for a conventional system
    pub fn trunked_groups(&self) -> &[TrunkedGroup] {
        match &self.groups {
            SystemGroups::Trunked(groups) => groups,
            SystemGroups::Conventional(_) => &[],
        }
    }

    /// Conventional groups; empty for a trunked system
    pub fn conventional_groups(&self) -> &[ConventionalGroup] {
        match &self.groups {
            SystemGroups::Conventional(groups) => groups,
            SystemGroups::Trunked(_) => &[],
        }
    }

    pub fn groups_len(&self) -> usize {
        self.groups.len()
    }

    /// Total channels or frequencies across all groups
    pub fn channel_count(&self) -> usize {
        match &self.groups {
            SystemGroups::Trunked(groups) => groups.iter().map(|g| g.channels.len()).sum(),
            SystemGroups::Conventional(groups) => {
                groups.iter().map(|g| g.frequencies.len()).sum()
            }
        }
    }

    /// Parse a group at the cursor, which must match the system kind
    fn parse_group(
        &mut self,
        tag: RecordTag,
        line: usize,
        cursor: &mut LineCursor<'_>,
    ) -> Result<(), ParseError> {
        let kind = self.kind();
        match (&mut self.groups, tag) {
            (SystemGroups::Trunked(groups), RecordTag::TrunkedGroup) => {
                groups.push(TrunkedGroup::parse(cursor)?);
            }
            (SystemGroups::Conventional(groups), RecordTag::ConventionalGroup) => {
                groups.push(ConventionalGroup::parse(cursor)?);
            }
            _ => {
                return Err(ParseError::GroupKindMismatch {
                    system: kind.name(),
                    group: tag.record_name(),
                    line,
                })
            }
        }
        Ok(())
    }
}

impl ParseRecord for System {
    fn parse(cursor: &mut LineCursor<'_>) -> Result<Self, ParseError> {
        let header = cursor.advance().ok_or(ParseError::Format {
            expected: "System",
            line: cursor.lines_consumed() + 1,
        })?;
        let kind = match RecordTag::of_line(&header) {
            Some(RecordTag::TrunkSystem) => SystemKind::Trunked,
            Some(RecordTag::ConventionalSystem) => SystemKind::Conventional,
            _ => {
                return Err(ParseError::Format {
                    expected: "System",
                    line: header.number,
                })
            }
        };
        let mut system = System::new(kind, kind.tag().strip(header)?);
        tracing::debug!("Line {}: start of {} system", header.number, kind.name());

        loop {
            let mark = cursor.mark();
            let Some(line) = cursor.advance() else {
                break;
            };
            let tag = RecordTag::of_line(&line);
            tracing::trace!("Line {}: {}", line.number, line.tag());
            match tag {
                Some(RecordTag::Radio) => system.radios.push(Radio::from_line(line)?),
                Some(RecordTag::DqkStatus) => {
                    if system.dqk_status.replace(DqkStatus::from_line(line)?).is_some() {
                        tracing::warn!(
                            "Line {}: second DQKs_Status in system, keeping the last one",
                            line.number
                        );
                    }
                }
                Some(RecordTag::Site) => {
                    cursor.pushback(mark);
                    system.sites.push(Site::parse(cursor)?);
                }
                Some(group @ (RecordTag::TrunkedGroup | RecordTag::ConventionalGroup)) => {
                    cursor.pushback(mark);
                    system.parse_group(group, line.number, cursor)?;
                }
                Some(RecordTag::TrunkSystem | RecordTag::ConventionalSystem) => {
                    cursor.pushback(mark);
                    break;
                }
                _ => {
                    tracing::warn!(
                        "Line {}: unexpected line in {} system, ending system here: {:?}",
                        line.number,
                        kind.name(),
                        line.text
                    );
                    cursor.pushback(mark);
                    break;
                }
            }
        }

        tracing::debug!(
            "Parsed {} system {:?}: {} radios, {} sites, {} groups, {} channels",
            kind.name(),
            system.value,
            system.radios.len(),
            system.sites.len(),
            system.groups.len(),
            system.channel_count()
        );
        Ok(system)
    }
}

impl EncodeRecord for System {
    fn encode(&self, out: &mut RecordWriter) {
        out.line(self.kind().tag()).field(&self.value).end();
        if let Some(dqk_status) = &self.dqk_status {
            dqk_status.encode(out);
        }
        for radio in &self.radios {
            radio.encode(out);
        }
        for site in &self.sites {
            site.encode(out);
        }
        match &self.groups {
            SystemGroups::Trunked(groups) => groups.iter().for_each(|g| g.encode(out)),
            SystemGroups::Conventional(groups) => groups.iter().for_each(|g| g.encode(out)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::TrunkedChannel;
    use crate::values::AlertColor;

    const GROUP: &str = "T-Group\t\t\tGrp1\tOff\t0.000000\t0.000000\t0.0\tCircle\t1";
    const CHANNEL: &str = "TGID\t\t\tChan1\tOff\t101\tNone\t21\t2\t0\t0\tAuto\tOff\tOn\t\tOff";

    fn parse(text: &str) -> (System, Option<usize>) {
        let mut cursor = LineCursor::new(text);
        let system = System::parse(&mut cursor).unwrap();
        (system, cursor.peek().map(|l| l.number))
    }

    #[test]
    fn test_parse_radio() {
        let radio = Radio::from_line(Line {
            number: 1,
            text: "UnitIds\t\t\tBattalion 1\t1234567\t2\t5\tBlue\tOn",
        })
        .unwrap();
        assert_eq!(radio.name, "Battalion 1");
        assert_eq!(radio.radio_id, 1_234_567);
        assert_eq!(radio.alert_tone, AlertTone::new(2, 5));
        assert_eq!(radio.alert_light.color, AlertColor::Blue);
        assert_eq!(radio.to_string(), "Battalion 1 UID: 1234567");
    }

    #[test]
    fn test_dqk_status_verbatim() {
        let dqk = DqkStatus::from_line(Line {
            number: 1,
            text: "DQKs_Status\t\tOn\tOff\tOn",
        })
        .unwrap();
        assert_eq!(dqk.statuses, vec!["On", "Off", "On"]);
        assert_eq!(dqk.to_hpd_string(), "DQKs_Status\t\tOn\tOff\tOn\n");
    }

    #[test]
    fn test_dqk_status_empty() {
        let empty = DqkStatus::default();
        assert_eq!(empty.to_hpd_string(), "DQKs_Status\t\t\n");

        let dqk = DqkStatus::from_line(Line {
            number: 1,
            text: "DQKs_Status\t\t",
        })
        .unwrap();
        assert_eq!(dqk, empty);

        let mut system = System::new(SystemKind::Trunked, "T");
        system.dqk_status = Some(empty);
        let text = system.to_hpd_string();
        let (reparsed, _) = parse(&text);
        assert_eq!(reparsed, system);
        assert_eq!(reparsed.to_hpd_string(), text);
    }

    #[test]
    fn test_site_collects_band_plan_and_frequencies() {
        let text = "Site\t\t\tSite 1\tOff\n\
                    T-Freq\t\t\t851012500\n\
                    BandPlan_P25\t\t851006250\t6250\n\
                    T-Freq\t\t\t851512500\n\
                    T-Group\t\t\tG\tOff\t0\t0\t0\tCircle\t1\n";
        let mut cursor = LineCursor::new(text);
        let site = Site::parse(&mut cursor).unwrap();
        assert_eq!(site.value, "Site 1\tOff");
        assert_eq!(site.frequencies.len(), 2);
        assert_eq!(site.band_plan.as_ref().unwrap().value, "851006250\t6250");
        assert_eq!(cursor.peek().unwrap().tag(), "T-Group");

        // band plan is written before the frequencies
        assert_eq!(
            site.to_hpd_string(),
            "Site\t\t\tSite 1\tOff\n\
             BandPlan_P25\t\t851006250\t6250\n\
             T-Freq\t\t\t851012500\n\
             T-Freq\t\t\t851512500\n"
        );
    }

    #[test]
    fn test_parse_trunked_system() {
        let text = format!(
            "Trunk\t\t\tMyTrunkSys\nDQKs_Status\t\tOn\nUnitIds\t\t\tU1\t10\tOff\tAuto\tOff\tOn\nSite\t\t\tS1\nT-Freq\t\t\t851012500\n{}\n{}\n",
            GROUP, CHANNEL
        );
        let (system, next) = parse(&text);
        assert_eq!(system.kind(), SystemKind::Trunked);
        assert_eq!(system.value, "MyTrunkSys");
        assert!(system.dqk_status.is_some());
        assert_eq!(system.radios.len(), 1);
        assert_eq!(system.sites.len(), 1);
        assert_eq!(system.trunked_groups().len(), 1);
        assert_eq!(system.channel_count(), 1);
        assert_eq!(system.groups_len(), 1);
        assert_eq!(next, None);
        assert_eq!(system.to_hpd_string(), text);
    }

    #[test]
    fn test_group_then_next_system() {
        let text = format!("Trunk\t\t\tA\n{}\nConventional\t\t\tB\n", GROUP);
        let (system, next) = parse(&text);
        assert_eq!(system.trunked_groups().len(), 1);
        assert!(system.trunked_groups()[0].channels.is_empty());
        assert_eq!(next, Some(3));
    }

    #[test]
    fn test_unknown_child_stops_system() {
        let text = format!(
            "Trunk\t\t\tA\nUnitIds\t\t\tU1\t10\tOff\tAuto\tOff\tOn\n{}\n{}\nAvoidTimes\t\t\tx\n{}\n",
            GROUP, CHANNEL, GROUP
        );
        let (system, next) = parse(&text);
        assert_eq!(system.radios.len(), 1);
        assert_eq!(system.trunked_groups().len(), 1);
        assert_eq!(system.channel_count(), 1);
        assert_eq!(next, Some(5));
    }

    #[test]
    fn test_misplaced_channel_stops_system() {
        let text = format!("Trunk\t\t\tA\n{}\n", CHANNEL);
        let (system, next) = parse(&text);
        assert!(system.groups.is_empty());
        assert_eq!(next, Some(2));
    }

    #[test]
    fn test_group_kind_mismatch() {
        let text = "Conventional\t\t\tA\nT-Group\t\t\tG\tOff\t0\t0\t0\tCircle\t1\n";
        let mut cursor = LineCursor::new(text);
        let err = System::parse(&mut cursor).unwrap_err();
        assert_eq!(
            err,
            ParseError::GroupKindMismatch {
                system: "conventional",
                group: "TrunkedGroup",
                line: 2
            }
        );
    }

    #[test]
    fn test_bad_header_is_format_error() {
        let mut cursor = LineCursor::new("Trunk\t\tA\n");
        assert_eq!(
            System::parse(&mut cursor).unwrap_err(),
            ParseError::Format {
                expected: "TrunkedSystem",
                line: 1
            }
        );

        let mut cursor = LineCursor::new("Site\t\t\tA\n");
        assert_eq!(
            System::parse(&mut cursor).unwrap_err(),
            ParseError::Format {
                expected: "System",
                line: 1
            }
        );
    }

    #[test]
    fn test_bad_child_record_fails_system() {
        let text = format!("Trunk\t\t\tA\n{}\nTGID\t\t\tbroken\n", GROUP);
        let mut cursor = LineCursor::new(&text);
        assert!(matches!(
            System::parse(&mut cursor),
            Err(ParseError::MissingField { line: 3, .. })
        ));
    }

    #[test]
    fn test_encode_order() {
        let mut system = System::new(SystemKind::Trunked, "Sys");
        let mut group = TrunkedGroup::new("G");
        group.channels.push(TrunkedChannel::new("C", 7));
        system.groups = SystemGroups::Trunked(vec![group]);
        system.sites.push(Site::new("S"));
        system.radios.push(Radio::new("R", 1));
        system.dqk_status = Some(DqkStatus {
            statuses: vec!["Off".into()],
        });

        let tags: Vec<String> = system
            .to_hpd_string()
            .lines()
            .map(|l| l.split('\t').next().unwrap().to_string())
            .collect();
        assert_eq!(
            tags,
            vec!["Trunk", "DQKs_Status", "UnitIds", "Site", "T-Group", "TGID"]
        );
    }
}
