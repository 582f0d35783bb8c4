//! Minimal TIFF/Exif datum codec
//!
//! Just enough TIFF parsing to round-trip the IFD0 tags that JP2 Exif
//! UUID payloads carry. Values live in an owned datum collection; the
//! encoder emits a fresh TIFF stream with deterministic tag ordering.
//!
//! TIFF structure:
//! - Header: byte order (II/MM), magic (0x002A), IFD offset
//! - IFD: tag count, entries (12 bytes each), next IFD offset
//! - Entry: tag ID (2), type (2), count (4), value/offset (4)

use crate::error::{Error, Result};
use std::io::Write;

/// Byte order of a TIFF stream
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    fn read_u16(&self, data: &[u8], off: usize) -> Result<u16> {
        let end = off
            .checked_add(2)
            .ok_or_else(|| Error::corrupted(off as u64, "TIFF offset overflow"))?;
        let b = data
            .get(off..end)
            .ok_or_else(|| Error::corrupted(off as u64, "TIFF read out of bounds"))?;
        Ok(match self {
            ByteOrder::LittleEndian => u16::from_le_bytes([b[0], b[1]]),
            ByteOrder::BigEndian => u16::from_be_bytes([b[0], b[1]]),
        })
    }

    fn read_u32(&self, data: &[u8], off: usize) -> Result<u32> {
        let end = off
            .checked_add(4)
            .ok_or_else(|| Error::corrupted(off as u64, "TIFF offset overflow"))?;
        let b = data
            .get(off..end)
            .ok_or_else(|| Error::corrupted(off as u64, "TIFF read out of bounds"))?;
        Ok(match self {
            ByteOrder::LittleEndian => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            ByteOrder::BigEndian => u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
        })
    }

    fn push_u16(&self, out: &mut Vec<u8>, v: u16) {
        out.extend_from_slice(&match self {
            ByteOrder::LittleEndian => v.to_le_bytes(),
            ByteOrder::BigEndian => v.to_be_bytes(),
        });
    }

    fn push_u32(&self, out: &mut Vec<u8>, v: u32) {
        out.extend_from_slice(&match self {
            ByteOrder::LittleEndian => v.to_le_bytes(),
            ByteOrder::BigEndian => v.to_be_bytes(),
        });
    }
}

/// TIFF/Exif tag IDs for the common IFD0 tags
pub mod tags {
    pub const IMAGE_WIDTH: u16 = 0x0100;
    pub const IMAGE_LENGTH: u16 = 0x0101;
    pub const IMAGE_DESCRIPTION: u16 = 0x010E;
    pub const MAKE: u16 = 0x010F;
    pub const MODEL: u16 = 0x0110;
    pub const ORIENTATION: u16 = 0x0112;
    pub const X_RESOLUTION: u16 = 0x011A;
    pub const Y_RESOLUTION: u16 = 0x011B;
    pub const RESOLUTION_UNIT: u16 = 0x0128;
    pub const SOFTWARE: u16 = 0x0131;
    pub const DATE_TIME: u16 = 0x0132;
    pub const ARTIST: u16 = 0x013B;
    pub const COPYRIGHT: u16 = 0x8298;
}

/// Human-readable name for a known tag.
pub fn tag_name(tag: u16) -> Option<&'static str> {
    Some(match tag {
        tags::IMAGE_WIDTH => "ImageWidth",
        tags::IMAGE_LENGTH => "ImageLength",
        tags::IMAGE_DESCRIPTION => "ImageDescription",
        tags::MAKE => "Make",
        tags::MODEL => "Model",
        tags::ORIENTATION => "Orientation",
        tags::X_RESOLUTION => "XResolution",
        tags::Y_RESOLUTION => "YResolution",
        tags::RESOLUTION_UNIT => "ResolutionUnit",
        tags::SOFTWARE => "Software",
        tags::DATE_TIME => "DateTime",
        tags::ARTIST => "Artist",
        tags::COPYRIGHT => "Copyright",
        _ => return None,
    })
}

/// Look up a tag by name, accepting `Artist`, `Image.Artist` or
/// `Exif.Image.Artist` spellings.
pub fn tag_by_key(key: &str) -> Option<u16> {
    let name = key
        .strip_prefix("Exif.")
        .unwrap_or(key)
        .strip_prefix("Image.")
        .unwrap_or(key.rsplit('.').next()?);
    [
        tags::IMAGE_WIDTH,
        tags::IMAGE_LENGTH,
        tags::IMAGE_DESCRIPTION,
        tags::MAKE,
        tags::MODEL,
        tags::ORIENTATION,
        tags::X_RESOLUTION,
        tags::Y_RESOLUTION,
        tags::RESOLUTION_UNIT,
        tags::SOFTWARE,
        tags::DATE_TIME,
        tags::ARTIST,
        tags::COPYRIGHT,
    ]
    .into_iter()
    .find(|&t| tag_name(t) == Some(name))
}

/// Maximum number of entries in an IFD (prevents DOS attacks)
const MAX_IFD_TAGS: u16 = 1000;

/// A typed Exif value
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExifValue {
    /// Type 1
    Byte(Vec<u8>),
    /// Type 2; stored without the trailing NUL
    Ascii(String),
    /// Type 3
    Short(Vec<u16>),
    /// Type 4
    Long(Vec<u32>),
    /// Type 5, (numerator, denominator) pairs
    Rational(Vec<(u32, u32)>),
    /// Type 7
    Undefined(Vec<u8>),
}

impl ExifValue {
    fn type_id(&self) -> u16 {
        match self {
            ExifValue::Byte(_) => 1,
            ExifValue::Ascii(_) => 2,
            ExifValue::Short(_) => 3,
            ExifValue::Long(_) => 4,
            ExifValue::Rational(_) => 5,
            ExifValue::Undefined(_) => 7,
        }
    }

    fn count(&self) -> u32 {
        match self {
            ExifValue::Byte(v) => v.len() as u32,
            ExifValue::Ascii(s) => s.len() as u32 + 1,
            ExifValue::Short(v) => v.len() as u32,
            ExifValue::Long(v) => v.len() as u32,
            ExifValue::Rational(v) => v.len() as u32,
            ExifValue::Undefined(v) => v.len() as u32,
        }
    }

    fn to_bytes(&self, order: ByteOrder) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            ExifValue::Byte(v) | ExifValue::Undefined(v) => out.extend_from_slice(v),
            ExifValue::Ascii(s) => {
                out.extend_from_slice(s.as_bytes());
                out.push(0);
            }
            ExifValue::Short(v) => {
                for &x in v {
                    order.push_u16(&mut out, x);
                }
            }
            ExifValue::Long(v) => {
                for &x in v {
                    order.push_u32(&mut out, x);
                }
            }
            ExifValue::Rational(v) => {
                for &(n, d) in v {
                    order.push_u32(&mut out, n);
                    order.push_u32(&mut out, d);
                }
            }
        }
        out
    }

    /// Short human-readable rendering for structure dumps.
    pub fn summary(&self) -> String {
        fn join<T: std::fmt::Display>(items: &[T]) -> String {
            let mut s = items
                .iter()
                .take(4)
                .map(|x| x.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            if items.len() > 4 {
                s.push_str(" ...");
            }
            s
        }
        match self {
            ExifValue::Byte(v) | ExifValue::Undefined(v) => join(v),
            ExifValue::Ascii(s) => {
                let mut t: String = s.chars().take(32).collect();
                if s.chars().count() > 32 {
                    t.push_str("...");
                }
                t
            }
            ExifValue::Short(v) => join(v),
            ExifValue::Long(v) => join(v),
            ExifValue::Rational(v) => {
                let pairs: Vec<String> =
                    v.iter().take(4).map(|(n, d)| format!("{}/{}", n, d)).collect();
                pairs.join(" ")
            }
        }
    }
}

fn type_size(type_id: u16) -> Option<usize> {
    match type_id {
        1 | 2 | 7 => Some(1),
        3 => Some(2),
        4 => Some(4),
        5 => Some(8),
        _ => None,
    }
}

/// A single tag/value pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExifDatum {
    pub tag: u16,
    pub value: ExifValue,
}

/// An ordered collection of Exif datums
///
/// Insertion keeps the collection sorted by tag so that encoding is
/// deterministic and repeated writes are byte-identical.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExifData {
    datums: Vec<ExifDatum>,
}

impl ExifData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.datums.is_empty()
    }

    pub fn len(&self) -> usize {
        self.datums.len()
    }

    pub fn clear(&mut self) {
        self.datums.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExifDatum> {
        self.datums.iter()
    }

    pub fn get(&self, tag: u16) -> Option<&ExifValue> {
        self.datums
            .iter()
            .find(|d| d.tag == tag)
            .map(|d| &d.value)
    }

    /// Set `tag` to `value`, replacing any existing datum.
    pub fn set(&mut self, tag: u16, value: ExifValue) {
        match self.datums.binary_search_by_key(&tag, |d| d.tag) {
            Ok(i) => self.datums[i].value = value,
            Err(i) => self.datums.insert(i, ExifDatum { tag, value }),
        }
    }

    pub fn set_ascii(&mut self, tag: u16, value: &str) {
        self.set(tag, ExifValue::Ascii(value.to_string()));
    }

    pub fn remove(&mut self, tag: u16) -> bool {
        match self.datums.binary_search_by_key(&tag, |d| d.tag) {
            Ok(i) => {
                self.datums.remove(i);
                true
            }
            Err(_) => false,
        }
    }
}

/// Decode a TIFF stream into a datum collection and its byte order.
///
/// Only IFD0 is walked; entries with unknown value types are skipped.
pub fn decode(data: &[u8]) -> Result<(ExifData, ByteOrder)> {
    if data.len() < 8 {
        return Err(Error::corrupted(0, "TIFF header truncated"));
    }
    let order = match &data[0..2] {
        b"II" => ByteOrder::LittleEndian,
        b"MM" => ByteOrder::BigEndian,
        _ => return Err(Error::corrupted(0, "invalid TIFF byte order mark")),
    };
    if order.read_u16(data, 2)? != 0x002A {
        return Err(Error::corrupted(2, "invalid TIFF magic"));
    }
    let ifd = order.read_u32(data, 4)? as usize;
    if ifd < 8 || ifd >= data.len() {
        return Err(Error::corrupted(4, "IFD offset out of bounds"));
    }

    let count = order.read_u16(data, ifd)?;
    if count > MAX_IFD_TAGS {
        return Err(Error::corrupted(ifd as u64, "too many IFD entries"));
    }

    let mut exif = ExifData::new();
    for i in 0..count as usize {
        let entry = ifd + 2 + i * 12;
        let tag = order.read_u16(data, entry)?;
        let type_id = order.read_u16(data, entry + 2)?;
        let value_count = order.read_u32(data, entry + 4)? as usize;

        let Some(tsize) = type_size(type_id) else {
            continue;
        };
        let byte_len = value_count
            .checked_mul(tsize)
            .ok_or_else(|| Error::corrupted(entry as u64, "IFD value size overflow"))?;

        let value_bytes: &[u8] = if byte_len <= 4 {
            data.get(entry + 8..entry + 8 + byte_len)
                .ok_or_else(|| Error::corrupted(entry as u64, "IFD entry truncated"))?
        } else {
            let off = order.read_u32(data, entry + 8)? as usize;
            let end = off
                .checked_add(byte_len)
                .ok_or_else(|| Error::corrupted(entry as u64, "IFD value offset overflow"))?;
            data.get(off..end)
                .ok_or_else(|| Error::corrupted(entry as u64, "IFD value out of bounds"))?
        };

        let value = match type_id {
            1 => ExifValue::Byte(value_bytes.to_vec()),
            2 => {
                let text = value_bytes
                    .split(|&b| b == 0)
                    .next()
                    .unwrap_or(value_bytes);
                ExifValue::Ascii(String::from_utf8_lossy(text).into_owned())
            }
            3 => {
                let mut v = Vec::with_capacity(value_count);
                for j in 0..value_count {
                    v.push(order.read_u16(value_bytes, j * 2)?);
                }
                ExifValue::Short(v)
            }
            4 => {
                let mut v = Vec::with_capacity(value_count);
                for j in 0..value_count {
                    v.push(order.read_u32(value_bytes, j * 4)?);
                }
                ExifValue::Long(v)
            }
            5 => {
                let mut v = Vec::with_capacity(value_count);
                for j in 0..value_count {
                    let n = order.read_u32(value_bytes, j * 8)?;
                    let d = order.read_u32(value_bytes, j * 8 + 4)?;
                    v.push((n, d));
                }
                ExifValue::Rational(v)
            }
            _ => ExifValue::Undefined(value_bytes.to_vec()),
        };
        exif.set(tag, value);
    }

    Ok((exif, order))
}

/// Encode a datum collection as a fresh TIFF stream in `order`.
pub fn encode(exif: &ExifData, order: ByteOrder) -> Vec<u8> {
    let n = exif.len();
    let mut out = Vec::with_capacity(32 + n * 16);
    out.extend_from_slice(match order {
        ByteOrder::LittleEndian => b"II",
        ByteOrder::BigEndian => b"MM",
    });
    order.push_u16(&mut out, 0x002A);
    order.push_u32(&mut out, 8); // IFD0 directly after the header
    order.push_u16(&mut out, n as u16);

    let value_area = 8 + 2 + n * 12 + 4;
    let mut tail: Vec<u8> = Vec::new();
    for d in exif.iter() {
        order.push_u16(&mut out, d.tag);
        order.push_u16(&mut out, d.value.type_id());
        order.push_u32(&mut out, d.value.count());
        let bytes = d.value.to_bytes(order);
        if bytes.len() <= 4 {
            out.extend_from_slice(&bytes);
            out.resize(out.len() + 4 - bytes.len(), 0);
        } else {
            order.push_u32(&mut out, (value_area + tail.len()) as u32);
            tail.extend_from_slice(&bytes);
        }
    }
    order.push_u32(&mut out, 0); // no next IFD
    out.extend_from_slice(&tail);
    out
}

/// Dump the IFD0 structure of a TIFF stream for diagnostics.
pub fn print_structure(out: &mut dyn Write, data: &[u8], depth: usize) -> Result<()> {
    let indent = "  ".repeat(depth);
    let (exif, order) = decode(data)?;
    writeln!(
        out,
        "{}TIFF {} with {} entries",
        indent,
        match order {
            ByteOrder::LittleEndian => "II",
            ByteOrder::BigEndian => "MM",
        },
        exif.len()
    )?;
    for d in exif.iter() {
        writeln!(
            out,
            "{}  0x{:04x} {:<18} | {}",
            indent,
            d.tag,
            tag_name(d.tag).unwrap_or("(unknown)"),
            d.value.summary()
        )?;
    }
    Ok(())
}
