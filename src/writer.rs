//! JP2 header re-encoding and box emission for the rewrite path

use crate::boxes::{BoxType, SubBoxes, BOX_HEADER_SIZE};
use crate::bytes;
use crate::error::{Error, Result};
use crate::image::{COLR_METHOD_ICC, COLR_PAD};

/// Payload of the `colr` placeholder written when no ICC profile is
/// held. Historical bytes of the reference implementation, kept
/// verbatim.
const COLR_PLACEHOLDER: [u8; 15] = [
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x05, 0x1c, b'u', b'u', b'i', b'd',
];

/// Append one box (explicit length, 8-byte header, payload) to `out`.
pub(crate) fn push_box(out: &mut Vec<u8>, box_type: BoxType, payload: &[u8]) -> Result<()> {
    let total = payload
        .len()
        .checked_add(BOX_HEADER_SIZE as usize)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(Error::ImageWriteFailed)?;
    out.extend_from_slice(&total.to_be_bytes());
    out.extend_from_slice(&u32::from(box_type).to_be_bytes());
    out.extend_from_slice(payload);
    Ok(())
}

/// Append a `uuid` box carrying `identifier || data` to `out`.
pub(crate) fn write_uuid_box(out: &mut Vec<u8>, identifier: &[u8; 16], data: &[u8]) -> Result<()> {
    let mut body = Vec::with_capacity(16 + data.len());
    body.extend_from_slice(identifier);
    body.extend_from_slice(data);
    push_box(out, BoxType::UuidBox, &body)
}

/// Rebuild a `jp2h` super-box from its original payload.
///
/// Sub-boxes are copied in order up to and including the first `colr`,
/// which is replaced: with no profile held, by the historical
/// placeholder; with a profile, by `02 00 00` followed by the raw ICC
/// bytes. Sub-boxes after the first `colr` are dropped. When the
/// payload has no `colr` at all, every sub-box is copied unchanged.
/// The returned box carries a re-patched length field.
pub(crate) fn encode_jp2_header(payload: &[u8], icc_profile: Option<&[u8]>) -> Result<Vec<u8>> {
    let mut out: Vec<u8> = Vec::with_capacity(
        payload.len() + icc_profile.map_or(COLR_PLACEHOLDER.len(), <[u8]>::len) + 16,
    );
    out.extend_from_slice(&[0u8; BOX_HEADER_SIZE as usize]);

    for sub in SubBoxes::new(payload) {
        let sub = sub?;
        if sub.box_type == BoxType::ColourSpecBox {
            match icc_profile {
                None => push_box(&mut out, BoxType::ColourSpecBox, &COLR_PLACEHOLDER)?,
                Some(profile) => {
                    let mut colr = Vec::with_capacity(COLR_PAD + profile.len());
                    colr.extend_from_slice(&[COLR_METHOD_ICC, 0x00, 0x00]);
                    colr.extend_from_slice(profile);
                    push_box(&mut out, BoxType::ColourSpecBox, &colr)?;
                }
            }
            break;
        }
        out.extend_from_slice(sub.raw(payload));
    }

    // Patch the super-box header to the final total length.
    let total = u32::try_from(out.len()).map_err(|_| Error::ImageWriteFailed)?;
    bytes::write_u32_be(&mut out, 0, total)?;
    bytes::write_u32_be(&mut out, 4, BoxType::Jp2HeaderBox.into())?;
    Ok(out)
}
