//! rafnote is a Fujifilm RAF makernote parsing library written in pure Rust
//! with [nom](https://github.com/rust-bakery/nom). It decodes the vendor
//! "private metadata" block embedded in RAF raw files — and in Adobe
//! DNG-converted copies of them — into white-balance calibration tables,
//! CCT curves, black levels and raw dimensions.
//!
//! The block's internal layout was never published, varies by camera body
//! and firmware revision, and regularly arrives truncated or damaged.
//! rafnote therefore treats every offset as hostile:
//!
//! ## Key Features
//!
//! - Defensive by construction
//!
//!   - Every read goes through a bounds-checked reader; there is no
//!     unchecked buffer access anywhere in the crate, including the
//!     heuristic marker scans.
//!
//!   - Best-effort extraction: a malformed directory, an unresolvable
//!     calibration section or a truncated block never fail the decode. The
//!     worst outcome is an empty calibration table — the photograph still
//!     develops, just without its white balance.
//!
//! - Layout-generation aware
//!
//!   - The calibration block comes in several incompatible generations,
//!     classified from a handful of header bytes
//!     ([`RafDataGeneration`]).
//!
//!   - The white-balance section offset is not declared anywhere in the
//!     block. rafnote resolves it in two stages: a per-version/per-model
//!     rule table proposes candidates, and a structural validator confirms
//!     the first one that really looks like white-balance data.
//!
//! - Both record-stream dialects
//!
//!   - Native RAF makernotes ([`parse_makernote`]) and the self-contained
//!     blocks Adobe's DNG converter produces
//!     ([`parse_adobe_makernote`]).
//!
//! ## Usage
//!
//! ```rust
//! use rafnote::*;
//!
//! fn main() -> Result<()> {
//!     // the 4-byte block length followed by a tiny, empty directory
//!     let data: &[u8] = &[
//!         0x00, 0x00, 0x00, 0x3e, // block length
//!         b'M', b'M', 0x00, 0x00, 0x00, 0x30, // order mark, directory at 0x30+6
//!         0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // serial
//!         b'X', b'1', b'0', b'0', b'F', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // model,
//!         0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 32 bytes
//!         0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
//!         b'0', b'1', b'0', b'0', // firmware version
//!         0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, // directory: len, 0 entries
//!     ];
//!     let note = parse_adobe_makernote(data, 0)?;
//!
//!     assert_eq!(note.camera.as_ref().unwrap().model, "X100F");
//!     assert!(note.wb(Illuminant::AsShot).is_none());
//!     assert!(note.cct.is_empty());
//!     Ok(())
//! }
//! ```
//!
//! Decoding is synchronous, single-threaded and allocation-light: one owned
//! copy of the block plus the output tables. Re-running a decode over the
//! same bytes produces an identical result; there is no hidden state.

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use generation::RafDataGeneration;
pub use makernote::{parse_adobe_makernote, parse_makernote};
pub use values::{BlackLevels, CameraIdent, CctEntry, Illuminant, Makernote, WbCoeffs};

mod calib;
mod error;
mod generation;
mod makernote;
mod reader;
mod values;

#[cfg(test)]
mod testkit;
