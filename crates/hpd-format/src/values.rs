//! Typed values embedded in record fields
//!
//! These codecs cover the small composite fields that appear inside HPD
//! lines. Each composite occupies consecutive tab-separated slots:
//!
//! | Value        | Slots | Example                                  |
//! |--------------|-------|------------------------------------------|
//! | flag         | 1     | `On` / `Off`                             |
//! | [`Range`]    | 4     | `0.000000\t0.000000\t0.0\tCircle`        |
//! | [`AlertTone`]  | 2   | `Off\tAuto`, `3\t10`                     |
//! | [`AlertLight`] | 2   | `Red\tSlow Blink`                        |

use std::fmt;

use crate::error::ValueError;

/// Decode an `On`/`Off` flag
pub fn parse_flag(text: &str) -> Result<bool, ValueError> {
    match text {
        "On" => Ok(true),
        "Off" => Ok(false),
        other => Err(ValueError::InvalidFlag(other.to_string())),
    }
}

/// Encode a flag as `On`/`Off`
pub fn flag_text(value: bool) -> &'static str {
    if value {
        "On"
    } else {
        "Off"
    }
}

/// Location and range setting used by groups
///
/// Kept as text so that coordinates survive a round trip exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    /// Latitude in decimal degrees
    pub latitude: String,
    /// Longitude in decimal degrees
    pub longitude: String,
    /// Range distance
    pub distance: String,
    /// Area shape (`Circle`, `Rectangles`)
    pub shape: String,
}

impl Range {
    /// Number of tab slots a range occupies
    pub const SLOTS: usize = 4;

    pub fn new(
        latitude: impl Into<String>,
        longitude: impl Into<String>,
        distance: impl Into<String>,
        shape: impl Into<String>,
    ) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            distance: distance.into(),
            shape: shape.into(),
        }
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::new("0.000000", "0.000000", "0.0", "Circle")
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.latitude, self.longitude, self.distance, self.shape
        )
    }
}

/// Alert tone setting: tone selector and volume
///
/// `None` is the symbolic setting, written as `Off` for the tone and `Auto`
/// for the volume. A numeric value is written as digits, including a literal
/// `0` read from a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertTone {
    /// Tone selector, `None` = `Off`
    pub tone: Option<u8>,
    /// Tone volume, `None` = `Auto`
    pub volume: Option<u8>,
}

impl AlertTone {
    /// Create an alert tone from numeric settings, mapping 0 to `Off`/`Auto`
    pub fn new(tone: u8, volume: u8) -> Self {
        Self {
            tone: (tone != 0).then_some(tone),
            volume: (volume != 0).then_some(volume),
        }
    }

    /// Decode the tone and volume slots
    pub fn decode(tone: &str, volume: &str) -> Result<Self, ValueError> {
        Ok(Self {
            tone: decode_level(tone, "Off")?,
            volume: decode_level(volume, "Auto")?,
        })
    }

    /// Numeric tone selector, 0 when off
    pub fn tone_level(&self) -> u8 {
        self.tone.unwrap_or(0)
    }

    /// Numeric volume, 0 when automatic
    pub fn volume_level(&self) -> u8 {
        self.volume.unwrap_or(0)
    }

    /// Whether an alert tone is configured
    pub fn is_off(&self) -> bool {
        self.tone_level() == 0
    }
}

fn decode_level(text: &str, symbolic: &str) -> Result<Option<u8>, ValueError> {
    if text == symbolic {
        return Ok(None);
    }
    text.parse::<u8>()
        .map(Some)
        .map_err(|_| ValueError::InvalidTone(text.to_string()))
}

impl fmt::Display for AlertTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tone {
            Some(tone) => write!(f, "{}", tone)?,
            None => f.write_str("Off")?,
        }
        match self.volume {
            Some(volume) => write!(f, "\t{}", volume),
            None => f.write_str("\tAuto"),
        }
    }
}

/// Alert light colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlertColor {
    #[default]
    Off,
    Red,
    Green,
    Blue,
    White,
    Cyan,
    Magenta,
    Yellow,
}

impl AlertColor {
    pub const ALL: [AlertColor; 8] = [
        AlertColor::Off,
        AlertColor::Red,
        AlertColor::Green,
        AlertColor::Blue,
        AlertColor::White,
        AlertColor::Cyan,
        AlertColor::Magenta,
        AlertColor::Yellow,
    ];

    /// Wire name of the colour
    pub fn name(&self) -> &'static str {
        match self {
            AlertColor::Off => "Off",
            AlertColor::Red => "Red",
            AlertColor::Green => "Green",
            AlertColor::Blue => "Blue",
            AlertColor::White => "White",
            AlertColor::Cyan => "Cyan",
            AlertColor::Magenta => "Magenta",
            AlertColor::Yellow => "Yellow",
        }
    }

    /// Look up a colour by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Alert light blink pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlertPattern {
    /// Steady light
    #[default]
    On,
    SlowBlink,
    FastBlink,
}

impl AlertPattern {
    pub const ALL: [AlertPattern; 3] = [
        AlertPattern::On,
        AlertPattern::SlowBlink,
        AlertPattern::FastBlink,
    ];

    /// Wire name of the pattern
    pub fn name(&self) -> &'static str {
        match self {
            AlertPattern::On => "On",
            AlertPattern::SlowBlink => "Slow Blink",
            AlertPattern::FastBlink => "Fast Blink",
        }
    }

    /// Look up a pattern by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Alert light setting: colour and blink pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertLight {
    pub color: AlertColor,
    pub pattern: AlertPattern,
}

impl AlertLight {
    /// Decode the colour and pattern slots.
    ///
    /// Values outside the known sets are replaced by the defaults
    /// (`Off` colour, `On` pattern) instead of failing.
    pub fn decode(color: &str, pattern: &str) -> Self {
        let color = AlertColor::from_name(color).unwrap_or_else(|| {
            tracing::debug!("Unknown alert light colour {:?}, using Off", color);
            AlertColor::default()
        });
        let pattern = AlertPattern::from_name(pattern).unwrap_or_else(|| {
            tracing::debug!("Unknown alert light pattern {:?}, using On", pattern);
            AlertPattern::default()
        });
        Self { color, pattern }
    }
}

impl fmt::Display for AlertLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.color.name(), self.pattern.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_decode() {
        assert_eq!(parse_flag("On"), Ok(true));
        assert_eq!(parse_flag("Off"), Ok(false));
        assert_eq!(
            parse_flag("on"),
            Err(ValueError::InvalidFlag("on".to_string()))
        );
        assert!(parse_flag("").is_err());
    }

    #[test]
    fn test_flag_default_is_off() {
        assert_eq!(flag_text(bool::default()), "Off");
        assert_eq!(flag_text(true), "On");
    }

    #[test]
    fn test_range_default() {
        assert_eq!(Range::default().to_string(), "0.000000\t0.000000\t0.0\tCircle");
    }

    #[test]
    fn test_range_writes_longitude() {
        let range = Range::new("-33.865143", "151.209900", "5.0", "Circle");
        assert_eq!(range.to_string(), "-33.865143\t151.209900\t5.0\tCircle");
    }

    #[test]
    fn test_alert_tone_default() {
        let tone = AlertTone::default();
        assert_eq!(tone.tone_level(), 0);
        assert_eq!(tone.volume_level(), 0);
        assert!(tone.is_off());
        assert_eq!(tone.to_string(), "Off\tAuto");
    }

    #[test]
    fn test_alert_tone_new_maps_zero_to_symbolic() {
        assert_eq!(AlertTone::new(0, 0).to_string(), "Off\tAuto");
        assert_eq!(AlertTone::new(3, 0).to_string(), "3\tAuto");
        assert_eq!(AlertTone::new(0, 12).to_string(), "Off\t12");
    }

    #[test]
    fn test_alert_tone_decode() {
        let tone = AlertTone::decode("Off", "Auto").unwrap();
        assert_eq!(tone, AlertTone::default());

        let tone = AlertTone::decode("5", "9").unwrap();
        assert_eq!(tone.tone_level(), 5);
        assert_eq!(tone.volume_level(), 9);
    }

    #[test]
    fn test_alert_tone_keeps_numeric_zero() {
        let tone = AlertTone::decode("0", "Auto").unwrap();
        assert_eq!(tone.tone, Some(0));
        assert!(tone.is_off());
        assert_eq!(tone.to_string(), "0\tAuto");
    }

    #[test]
    fn test_alert_tone_rejects_garbage() {
        assert_eq!(
            AlertTone::decode("Loud", "Auto"),
            Err(ValueError::InvalidTone("Loud".to_string()))
        );
        assert!(AlertTone::decode("Off", "Off").is_err());
    }

    #[test]
    fn test_alert_light_default() {
        let light = AlertLight::default();
        assert_eq!(light.color, AlertColor::Off);
        assert_eq!(light.pattern, AlertPattern::On);
        assert_eq!(light.to_string(), "Off\tOn");
    }

    #[test]
    fn test_alert_light_decode() {
        let light = AlertLight::decode("Magenta", "Fast Blink");
        assert_eq!(light.color, AlertColor::Magenta);
        assert_eq!(light.pattern, AlertPattern::FastBlink);
        assert_eq!(light.to_string(), "Magenta\tFast Blink");
    }

    #[test]
    fn test_alert_light_repairs_invalid_values() {
        let light = AlertLight::decode("Purple", "Strobe");
        assert_eq!(light, AlertLight::default());

        let light = AlertLight::decode("Red", "Strobe");
        assert_eq!(light.color, AlertColor::Red);
        assert_eq!(light.pattern, AlertPattern::On);

        let light = AlertLight::decode("red", "Slow Blink");
        assert_eq!(light.color, AlertColor::Off);
        assert_eq!(light.pattern, AlertPattern::SlowBlink);
    }
}
