//! Shared builders for synthesised JP2 fixtures
#![allow(dead_code)]

use jp2_io::{JP2_SIGNATURE, UUID_EXIF, UUID_IPTC, UUID_XMP};

/// One box: explicit length, FourCC, payload.
pub fn box_bytes(box_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(&(payload.len() as u32 + 8).to_be_bytes());
    out.extend_from_slice(box_type);
    out.extend_from_slice(payload);
    out
}

/// A `uuid` box with the given identifier and body.
pub fn uuid_box(identifier: &[u8; 16], body: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(16 + body.len());
    payload.extend_from_slice(identifier);
    payload.extend_from_slice(body);
    box_bytes(b"uuid", &payload)
}

/// A 14-byte `ihdr` payload for the given dimensions.
pub fn ihdr_payload(height: u32, width: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(14);
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes()); // components
    out.extend_from_slice(&[7, 7, 0, 0]); // bpc, compression, unkC, ipr
    out
}

/// A `jp2h` super-box with an `ihdr` and the given `colr` payload.
pub fn jp2h_box(height: u32, width: u32, colr_payload: &[u8]) -> Vec<u8> {
    let mut body = box_bytes(b"ihdr", &ihdr_payload(height, width));
    body.extend(box_bytes(b"colr", colr_payload));
    box_bytes(b"jp2h", &body)
}

/// Fake ICC profile whose first four bytes carry its own size, as the
/// ICC format requires.
pub fn fake_icc(len: usize) -> Vec<u8> {
    assert!(len >= 4);
    let mut out = (len as u32).to_be_bytes().to_vec();
    out.resize(len, 0xA5);
    out
}

/// `colr` payload carrying an inline ICC profile.
pub fn colr_with_icc(profile: &[u8]) -> Vec<u8> {
    let mut out = vec![2, 0, 0];
    out.extend_from_slice(profile);
    out
}

/// Enumerated-colourspace `colr` payload (sRGB); yields a 15-byte box.
pub fn colr_enumerated() -> Vec<u8> {
    vec![1, 0, 0, 0, 0, 0, 0x10]
}

/// A complete JP2: signature, `ftyp`, the given `jp2h`, any extra
/// boxes, and a zero-length `jp2c` tail.
pub fn jp2_file(jp2h: &[u8], extra_boxes: &[Vec<u8>]) -> Vec<u8> {
    let mut out = JP2_SIGNATURE.to_vec();
    out.extend(box_bytes(b"ftyp", b"jp2 \x00\x00\x00\x00jp2 "));
    out.extend_from_slice(jp2h);
    for bx in extra_boxes {
        out.extend_from_slice(bx);
    }
    // Zero-length codestream box running to end of file.
    out.extend_from_slice(&[0, 0, 0, 0]);
    out.extend_from_slice(b"jp2c");
    out.extend_from_slice(&[0xFF, 0x4F, 0xFF, 0xD9]);
    out
}

/// Collect `(fourcc, payload)` of every top-level box after the
/// signature of a finished file.
pub fn list_boxes(data: &[u8]) -> Vec<(String, Vec<u8>)> {
    use std::io::Cursor;

    let mut cursor = Cursor::new(&data[12..]);
    let mut walker = jp2_io::BoxWalker::new(&mut cursor, jp2_io::DEFAULT_BOX_BUDGET).unwrap();
    let mut boxes = Vec::new();
    while let Some(bx) = walker.next_box().unwrap() {
        let payload = walker.read_payload(&bx).unwrap();
        boxes.push((bx.box_type.to_string(), payload));
    }
    boxes
}

/// Count UUID boxes carrying a recognised metadata identifier.
pub fn count_metadata_uuids(data: &[u8]) -> (usize, usize, usize) {
    let mut counts = (0, 0, 0);
    for (fourcc, payload) in list_boxes(data) {
        if fourcc == "uuid" && payload.len() >= 16 {
            if payload[..16] == UUID_EXIF {
                counts.0 += 1;
            } else if payload[..16] == UUID_IPTC {
                counts.1 += 1;
            } else if payload[..16] == UUID_XMP {
                counts.2 += 1;
            }
        }
    }
    counts
}
