//! HPD Format Library
//!
//! This crate reads and writes the tab-delimited configuration files used
//! by Uniden digital trunking scanners (BCD436HP / BCD536HP and relatives).
//!
//! # Format
//!
//! An HPD file is a flat list of lines. Each line starts with a tag and a
//! fixed number of tabs, followed by positional fields:
//!
//! ```text
//! TargetModel	BCD436HP
//! FormatVersion	1.00
//! Trunk			MyTrunkSys
//! T-Group			Grp1	Off	0.000000	0.000000	0.0	Circle	1
//! TGID			Chan1	Off	101	None	21	2	0	0	Auto	Off	On		Off
//! ```
//!
//! Nesting is implicit: a `TGID` line belongs to the closest preceding
//! `T-Group`, which belongs to the closest preceding `Trunk`. The parser
//! rebuilds the tree by looking at the tag of each next line and handing it
//! back to the enclosing container when it does not belong to the current
//! one.
//!
//! # Architecture
//!
//! - [`values`]: small field codecs (flags, range, alert tone and light)
//! - [`service_type`]: the service type code table
//! - [`cursor`]: line reader with peek and pushback
//! - [`record`]: tag registry, field reader and line writer
//! - [`system`], [`group`]: the record tree
//! - [`file`]: the whole-file container
//!
//! Exporting an unmodified parsed file reproduces the input byte for byte.
//!
//! # Example
//!
//! ```rust
//! use hpd_format::UnidenFile;
//!
//! let text = "TargetModel\tBCD436HP\nFormatVersion\t1.00\nTrunk\t\t\tMyTrunkSys\n";
//! let file: UnidenFile = text.parse().unwrap();
//!
//! assert_eq!(file.systems.len(), 1);
//! assert_eq!(file.export(), text);
//! ```

pub mod cursor;
pub mod error;
pub mod file;
pub mod group;
pub mod record;
pub mod service_type;
pub mod system;
pub mod values;

pub use cursor::{Line, LineCursor, Mark};
pub use error::{HpdError, LookupError, ParseError, ValueError};
pub use file::UnidenFile;
pub use group::{ConventionalFrequency, ConventionalGroup, TrunkedChannel, TrunkedGroup};
pub use record::{EncodeRecord, LineEnding, ParseRecord, RecordTag, RecordWriter};
pub use service_type::ServiceType;
pub use system::{BandPlan, DqkStatus, Radio, Site, SiteFrequency, System, SystemGroups, SystemKind};
pub use values::{AlertColor, AlertLight, AlertPattern, AlertTone, Range};
