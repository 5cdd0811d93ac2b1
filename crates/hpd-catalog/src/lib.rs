//! Talkgroup Catalog Library
//!
//! This crate imports a talkgroup reference catalog exported as CSV from an
//! online radio database, and cross-references the trunked channels of an
//! HPD file against it.
//!
//! The catalog is independent of the HPD format: it only maps a numeric
//! talkgroup id to a label and category. It never drives parsing.
//!
//! # Example
//!
//! ```rust
//! use hpd_catalog::Catalog;
//!
//! let csv = "Decimal,Hex,Alpha Tag,Mode,Description,Tag,Category\n\
//!            1001,3e9,FD Disp,D,Fire Dispatch,Fire Dispatch,Fire\n";
//! let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();
//!
//! assert_eq!(catalog.get(1001).unwrap().alpha_tag, "FD Disp");
//! ```

pub mod catalog;
pub mod error;

pub use catalog::{Annotation, Catalog, CatalogEntry};
pub use error::CatalogError;
