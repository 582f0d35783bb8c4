//! Streaming Exif/IPTC/XMP and ICC metadata I/O for JPEG-2000 (JP2) containers.
//!
//! This crate reads and rewrites the metadata of JP2 files without
//! touching the compressed codestream. JP2 files are a sequence of
//! length-prefixed boxes; the metadata of interest lives in the `jp2h`
//! header super-box (image dimensions and ICC colour profile) and in
//! three `uuid` boxes distinguished by fixed 16-byte identifiers (Exif,
//! IPTC IIM and XMP).
//!
//! # Design Principles
//!
//! - **Streaming**: one pass over the container, boxes are only loaded
//!   when their content is needed
//! - **Adversarial inputs**: every declared length is validated against
//!   its enclosing bounds before use, with a budget on the number of
//!   boxes visited
//! - **Atomic writes**: rewritten output is staged and swapped into the
//!   backing store in one step; on failure the input is left unchanged
//!
//! # Quick Start
//!
//! ```no_run
//! use jp2_io::{Jp2Image, exif_tags};
//!
//! # fn main() -> jp2_io::Result<()> {
//! let mut image = Jp2Image::from_path("image.jp2");
//! image.read_metadata()?;
//! println!("{}x{}", image.pixel_width(), image.pixel_height());
//!
//! image.exif_data_mut().set_ascii(exif_tags::ARTIST, "Alice");
//! image.write_metadata()?;
//! # Ok(())
//! # }
//! ```
//!
//! Reading populates the image's Exif, IPTC and XMP collections plus
//! the ICC profile; writing produces a fresh container that strips the
//! old metadata UUID boxes and injects up-to-date ones right after the
//! rewritten `jp2h`. All other boxes, the codestream included, are
//! copied verbatim.

mod boxes;
mod bytes;
mod error;
mod image;
mod io;
mod writer;

pub mod iptc;
pub mod tiff;
pub mod xmp;

pub use boxes::{
    BoxType, BoxWalker, RawBox, SubBox, SubBoxes, UuidKind, BOX_HEADER_SIZE, DEFAULT_BOX_BUDGET,
    JP2_SIGNATURE, UUID_EXIF, UUID_IPTC, UUID_XMP,
};
pub use error::{Error, Result};
pub use image::{Jp2Image, PrintStructureOption, BLANK_JP2};
pub use io::MediaIo;
pub use iptc::{IptcData, IptcDataset};
pub use tiff::tags as exif_tags;
pub use tiff::{ByteOrder, ExifData, ExifDatum, ExifValue};
pub use xmp::{XmpData, XmpProperty};
