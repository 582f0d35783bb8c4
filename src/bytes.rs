//! Bounds-checked big-endian scalar access on untrusted byte slices
//!
//! Box payloads come from adversarial files, so every offset is checked
//! before dereferencing and all arithmetic on declared sizes is checked.

use crate::error::{Error, Result};

/// Read a big-endian `u16` at `off`.
pub fn read_u16_be(data: &[u8], off: usize) -> Result<u16> {
    let end = off
        .checked_add(2)
        .ok_or_else(|| Error::corrupted(off as u64, "offset overflow"))?;
    let bytes = data
        .get(off..end)
        .ok_or_else(|| Error::corrupted(off as u64, "u16 read out of bounds"))?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Read a big-endian `u32` at `off`.
pub fn read_u32_be(data: &[u8], off: usize) -> Result<u32> {
    let end = off
        .checked_add(4)
        .ok_or_else(|| Error::corrupted(off as u64, "offset overflow"))?;
    let bytes = data
        .get(off..end)
        .ok_or_else(|| Error::corrupted(off as u64, "u32 read out of bounds"))?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Write a big-endian `u32` at `off`.
pub fn write_u32_be(data: &mut [u8], off: usize, v: u32) -> Result<()> {
    let end = off
        .checked_add(4)
        .ok_or_else(|| Error::corrupted(off as u64, "offset overflow"))?;
    let dst = data
        .get_mut(off..end)
        .ok_or_else(|| Error::corrupted(off as u64, "u32 write out of bounds"))?;
    dst.copy_from_slice(&v.to_be_bytes());
    Ok(())
}

/// `a + b` with overflow mapped to `CorruptedMetadata`.
pub fn checked_add(a: usize, b: usize) -> Result<usize> {
    a.checked_add(b)
        .ok_or_else(|| Error::corrupted(a as u64, "size arithmetic overflow"))
}
