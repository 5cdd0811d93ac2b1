//! Catalog import and lookup
//!
//! The CSV has a header row. Only these columns are read, in any order:
//! `Decimal`, `Alpha Tag`, `Mode`, `Description`, `Tag`, `Category`.
//! Other columns (such as `Hex`) are ignored.

use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use hpd_format::{System, TrunkedChannel, TrunkedGroup, UnidenFile};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One talkgroup of the reference catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub tgid: u32,
    /// Short display label
    pub alpha_tag: String,
    /// Mode code (`A` analog, `D` digital, `T` TDMA, `E` encrypted...)
    pub mode: String,
    pub description: String,
    /// Service tag, e.g. `Fire Dispatch`
    pub tag: String,
    pub category: String,
}

impl CatalogEntry {
    /// Talkgroup id in hexadecimal, e.g. `0x3e9`
    pub fn tgid_hex(&self) -> String {
        format!("{:#x}", self.tgid)
    }

    /// Build a trunked channel named after this entry
    ///
    /// The service type is taken from the catalog tag when it names a known
    /// service type.
    pub fn to_channel(&self) -> TrunkedChannel {
        let mut channel = TrunkedChannel::new(&self.alpha_tag, self.tgid);
        if let Ok(service_type) = hpd_format::ServiceType::from_label(&self.tag) {
            channel.service_type = service_type;
        }
        channel
    }
}

impl std::fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.tgid, self.alpha_tag)
    }
}

/// CSV row as exported; the id is validated separately
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Decimal")]
    decimal: String,
    #[serde(rename = "Alpha Tag")]
    alpha_tag: String,
    #[serde(rename = "Mode", default)]
    mode: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Tag", default)]
    tag: String,
    #[serde(rename = "Category", default)]
    category: String,
}

/// A trunked channel of an HPD file paired with its catalog entry
#[derive(Debug, Clone, Copy)]
pub struct Annotation<'a> {
    pub system: &'a System,
    pub group: &'a TrunkedGroup,
    pub channel: &'a TrunkedChannel,
    /// `None` when the talkgroup is not in the catalog
    pub entry: Option<&'a CatalogEntry>,
}

/// Talkgroup catalog keyed by talkgroup id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<u32, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import a catalog from CSV data
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut catalog = Catalog::new();
        for (index, row) in csv.deserialize::<CsvRow>().enumerate() {
            let row = row?;
            // header is row 1
            let row_number = index + 2;
            let tgid = row
                .decimal
                .parse::<u32>()
                .map_err(|_| CatalogError::InvalidId {
                    row: row_number,
                    value: row.decimal.clone(),
                })?;
            let entry = CatalogEntry {
                tgid,
                alpha_tag: row.alpha_tag,
                mode: row.mode,
                description: row.description,
                tag: row.tag,
                category: row.category,
            };
            if catalog.insert(entry).is_some() {
                tracing::warn!(
                    "Row {}: duplicate talkgroup {}, keeping the last one",
                    row_number,
                    tgid
                );
            }
        }

        tracing::debug!("Imported {} catalog talkgroups", catalog.len());
        Ok(catalog)
    }

    /// Import a catalog from a CSV file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Insert an entry, returning the one it replaced
    pub fn insert(&mut self, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(entry.tgid, entry)
    }

    pub fn get(&self, tgid: u32) -> Option<&CatalogEntry> {
        self.entries.get(&tgid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in talkgroup order
    pub fn iter(&self) -> btree_map::Values<'_, u32, CatalogEntry> {
        self.entries.values()
    }

    /// Pair every trunked channel of `file` with its catalog entry
    pub fn annotate<'a>(&'a self, file: &'a UnidenFile) -> impl Iterator<Item = Annotation<'a>> + 'a {
        file.trunked_channels()
            .map(move |(system, group, channel)| Annotation {
                system,
                group,
                channel,
                entry: self.get(channel.tgid),
            })
    }

    /// Talkgroup ids used in `file` that the catalog does not know
    pub fn missing_from(&self, file: &UnidenFile) -> BTreeSet<u32> {
        self.annotate(file)
            .filter(|a| a.entry.is_none())
            .map(|a| a.channel.tgid)
            .collect()
    }

    /// Catalog entries not programmed anywhere in `file`
    pub fn unused_by(&self, file: &UnidenFile) -> Vec<&CatalogEntry> {
        let used: BTreeSet<u32> = file.trunked_channels().map(|(_, _, c)| c.tgid).collect();
        self.iter().filter(|e| !used.contains(&e.tgid)).collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = btree_map::Values<'a, u32, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
