//! Minimal IPTC IIM dataset codec
//!
//! IIM record format (each dataset):
//!   Byte 0:    0x1C (tag marker)
//!   Byte 1:    Record number
//!   Byte 2:    Dataset number
//!   Bytes 3-4: Data length (big-endian u16)
//!   Bytes 5+:  Data
//!
//! Extended (>32767 byte) dataset lengths are not supported and are
//! reported as corrupt.

use crate::bytes;
use crate::error::{Error, Result};
use std::io::Write;

const DATASET_MARKER: u8 = 0x1C;

/// Record 2 (application) dataset numbers
pub mod datasets {
    /// Application record number.
    pub const APPLICATION_RECORD: u8 = 2;

    pub const RECORD_VERSION: u8 = 0;
    pub const OBJECT_NAME: u8 = 5;
    pub const URGENCY: u8 = 10;
    pub const CATEGORY: u8 = 15;
    pub const KEYWORDS: u8 = 25;
    pub const SPECIAL_INSTRUCTIONS: u8 = 40;
    pub const DATE_CREATED: u8 = 55;
    pub const BYLINE: u8 = 80;
    pub const CITY: u8 = 90;
    pub const COUNTRY_NAME: u8 = 101;
    pub const HEADLINE: u8 = 105;
    pub const CREDIT: u8 = 110;
    pub const SOURCE: u8 = 115;
    pub const COPYRIGHT_NOTICE: u8 = 116;
    pub const CAPTION: u8 = 120;
}

/// One IIM dataset
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IptcDataset {
    pub record: u8,
    pub dataset: u8,
    pub data: Vec<u8>,
}

impl IptcDataset {
    /// Dataset payload as text, lossily decoded.
    pub fn as_str(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

/// An ordered collection of IIM datasets
///
/// Datasets keep their insertion order; repeatable datasets (keywords)
/// may appear more than once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IptcData {
    datasets: Vec<IptcDataset>,
}

impl IptcData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn clear(&mut self) {
        self.datasets.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IptcDataset> {
        self.datasets.iter()
    }

    /// First dataset matching `(record, dataset)`.
    pub fn get(&self, record: u8, dataset: u8) -> Option<&IptcDataset> {
        self.datasets
            .iter()
            .find(|d| d.record == record && d.dataset == dataset)
    }

    /// First matching dataset payload as text.
    pub fn get_string(&self, record: u8, dataset: u8) -> Option<String> {
        self.get(record, dataset).map(IptcDataset::as_str)
    }

    /// Replace the first matching dataset, or append a new one.
    pub fn set(&mut self, record: u8, dataset: u8, data: impl Into<Vec<u8>>) {
        let data = data.into();
        match self
            .datasets
            .iter_mut()
            .find(|d| d.record == record && d.dataset == dataset)
        {
            Some(existing) => existing.data = data,
            None => self.datasets.push(IptcDataset {
                record,
                dataset,
                data,
            }),
        }
    }

    /// Append a dataset without replacing existing ones (repeatable
    /// datasets such as keywords).
    pub fn push(&mut self, record: u8, dataset: u8, data: impl Into<Vec<u8>>) {
        self.datasets.push(IptcDataset {
            record,
            dataset,
            data: data.into(),
        });
    }
}

/// Decode raw IIM bytes into a dataset collection.
pub fn decode(data: &[u8]) -> Result<IptcData> {
    let mut iptc = IptcData::new();
    let mut pos = 0usize;
    while pos < data.len() {
        if data[pos] != DATASET_MARKER {
            return Err(Error::corrupted(pos as u64, "invalid IPTC dataset marker"));
        }
        if pos + 5 > data.len() {
            return Err(Error::corrupted(pos as u64, "IPTC dataset header truncated"));
        }
        let record = data[pos + 1];
        let dataset = data[pos + 2];
        let len = bytes::read_u16_be(data, pos + 3)?;
        if len & 0x8000 != 0 {
            return Err(Error::corrupted(
                pos as u64,
                "extended IPTC dataset length is not supported",
            ));
        }
        let start = pos + 5;
        let end = bytes::checked_add(start, len as usize)?;
        if end > data.len() {
            return Err(Error::corrupted(pos as u64, "IPTC dataset data truncated"));
        }
        iptc.push(record, dataset, &data[start..end]);
        pos = end;
    }
    Ok(iptc)
}

/// Encode a dataset collection as raw IIM bytes, in collection order.
pub fn encode(iptc: &IptcData) -> Vec<u8> {
    let mut out = Vec::new();
    for d in iptc.iter() {
        out.push(DATASET_MARKER);
        out.push(d.record);
        out.push(d.dataset);
        out.extend_from_slice(&(d.data.len().min(0x7FFF) as u16).to_be_bytes());
        out.extend_from_slice(&d.data[..d.data.len().min(0x7FFF)]);
    }
    out
}

/// Dump the dataset list for diagnostics.
pub fn print_structure(out: &mut dyn Write, data: &[u8], depth: usize) -> Result<()> {
    let indent = "  ".repeat(depth);
    let iptc = decode(data)?;
    writeln!(out, "{}IPTC with {} datasets", indent, iptc.len())?;
    for d in iptc.iter() {
        let preview: String = d
            .as_str()
            .chars()
            .take(40)
            .map(|c| if c.is_control() { '.' } else { c })
            .collect();
        writeln!(
            out,
            "{}  {}:{:03} | {:4} | {}",
            indent,
            d.record,
            d.dataset,
            d.data.len(),
            preview
        )?;
    }
    Ok(())
}
