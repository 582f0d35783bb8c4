//! The JP2 image model: owns the I/O adapter and all metadata state
//!
//! Reading walks the top-level boxes, pulls pixel dimensions and the
//! ICC profile out of the `jp2h` super-box, and dispatches the three
//! recognised UUID payloads to the metadata codecs. Parser failures
//! inside a payload are local: the affected collection is cleared, a
//! warning is logged, and the walk continues. Container-grammar
//! violations abort the call.

use crate::boxes::{
    BoxType, BoxWalker, SubBoxes, UuidKind, BOX_HEADER_SIZE, DEFAULT_BOX_BUDGET, JP2_SIGNATURE,
};
use crate::bytes;
use crate::error::{Error, Result};
use crate::io::MediaIo;
use crate::writer;
use crate::{iptc, tiff, xmp};
use crate::iptc::IptcData;
use crate::tiff::{ByteOrder, ExifData};
use crate::xmp::XmpData;
use std::io::{Read, Seek, SeekFrom, Write};

/// Colour-specification method byte for an inline ICC profile.
pub(crate) const COLR_METHOD_ICC: u8 = 2;

/// Pad bytes before the ICC data in a `colr` payload (method,
/// precedence, approximation).
pub(crate) const COLR_PAD: usize = 3;

/// The minimal blank JP2 written when an image is created without
/// source bytes: signature, `ftyp`, `jp2h` with a 1x1 `ihdr` and a
/// placeholder `colr`, and a tiny codestream.
pub const BLANK_JP2: [u8; 249] = [
    0x00, 0x00, 0x00, 0x0c, 0x6a, 0x50, 0x20, 0x20, 0x0d, 0x0a, 0x87, 0x0a,
    0x00, 0x00, 0x00, 0x14, 0x66, 0x74, 0x79, 0x70, 0x6a, 0x70, 0x32, 0x20,
    0x00, 0x00, 0x00, 0x00, 0x6a, 0x70, 0x32, 0x20, 0x00, 0x00, 0x00, 0x2d,
    0x6a, 0x70, 0x32, 0x68, 0x00, 0x00, 0x00, 0x16, 0x69, 0x68, 0x64, 0x72,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x07, 0x07,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x0f, 0x63, 0x6f, 0x6c, 0x72, 0x01, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x11, 0x00, 0x00, 0x00, 0x00, 0x6a, 0x70, 0x32,
    0x63, 0xff, 0x4f, 0xff, 0x51, 0x00, 0x29, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x07, 0x01, 0x01, 0xff, 0x64,
    0x00, 0x23, 0x00, 0x01, 0x43, 0x72, 0x65, 0x61, 0x74, 0x6f, 0x72, 0x3a,
    0x20, 0x4a, 0x61, 0x73, 0x50, 0x65, 0x72, 0x20, 0x56, 0x65, 0x72, 0x73,
    0x69, 0x6f, 0x6e, 0x20, 0x31, 0x2e, 0x39, 0x30, 0x30, 0x2e, 0x31, 0xff,
    0x52, 0x00, 0x0c, 0x00, 0x00, 0x00, 0x01, 0x00, 0x05, 0x04, 0x04, 0x00,
    0x01, 0xff, 0x5c, 0x00, 0x13, 0x40, 0x40, 0x48, 0x48, 0x50, 0x48, 0x48,
    0x50, 0x48, 0x48, 0x50, 0x48, 0x48, 0x50, 0x48, 0x48, 0x50, 0xff, 0x90,
    0x00, 0x0a, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2d, 0x00, 0x01, 0xff, 0x5d,
    0x00, 0x14, 0x00, 0x40, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0x93, 0xcf, 0xb4,
    0x04, 0x00, 0x80, 0x80, 0x80, 0x80, 0x80, 0xff, 0xd9,
];

/// What to emit when printing the container structure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrintStructureOption {
    /// Box table only.
    Basic,
    /// Box table plus nested Exif/IPTC structure.
    Recursive,
    /// Write the embedded ICC profile bytes to the output.
    IccProfile,
    /// Write the raw XMP packet to the output.
    Xmp,
    /// Walk without printing (used when locating IPTC for erasure).
    IptcErase,
}

/// Result of probing a stream for the 12-byte JP2 signature
enum SignatureCheck {
    Matched,
    Mismatch,
    Short,
}

fn check_signature(io: &mut MediaIo, advance: bool) -> Result<SignatureCheck> {
    let start = io.tell()?;
    let mut buf = [0u8; 12];
    let mut n = 0;
    while n < buf.len() {
        match io.read(&mut buf[n..]) {
            Ok(0) => break,
            Ok(k) => n += k,
            Err(e) => return Err(e.into()),
        }
    }
    if n < buf.len() {
        io.seek(SeekFrom::Start(start))?;
        return Ok(SignatureCheck::Short);
    }
    let matched = buf == JP2_SIGNATURE;
    if !advance || !matched {
        io.seek(SeekFrom::Start(start))?;
    }
    Ok(if matched {
        SignatureCheck::Matched
    } else {
        SignatureCheck::Mismatch
    })
}

/// Fields of an `ihdr` sub-box payload
#[derive(Clone, Copy, Debug)]
struct ImageHeader {
    height: u32,
    width: u32,
    components: u16,
    bits_per_component: u8,
    compression: u8,
    colourspace_unknown: u8,
    ipr: u8,
}

impl ImageHeader {
    fn parse(payload: &[u8], at: u64) -> Result<ImageHeader> {
        if payload.len() < 14 {
            return Err(Error::corrupted(at, "image header box truncated"));
        }
        Ok(ImageHeader {
            height: bytes::read_u32_be(payload, 0)?,
            width: bytes::read_u32_be(payload, 4)?,
            components: bytes::read_u16_be(payload, 8)?,
            bits_per_component: payload[10],
            compression: payload[11],
            colourspace_unknown: payload[12],
            ipr: payload[13],
        })
    }
}

/// Extract the ICC profile from a `colr` payload, if it carries one.
///
/// The `u32` at payload offset 3 is the profile's own embedded size
/// field and is included in the extracted blob. Enumerated colourspaces
/// (method != 2) carry no profile.
fn parse_colr(payload: &[u8], at: u64) -> Result<Option<Vec<u8>>> {
    if payload.len() < COLR_PAD + 4 {
        return Err(Error::corrupted(at, "colour specification box truncated"));
    }
    if payload[0] != COLR_METHOD_ICC {
        log::debug!("colour specification at {} uses method {}, no ICC profile", at, payload[0]);
        return Ok(None);
    }
    let icc_length = bytes::read_u32_be(payload, COLR_PAD)? as usize;
    if icc_length > payload.len() - COLR_PAD {
        return Err(Error::corrupted(at, "ICC length exceeds colour box"));
    }
    Ok(Some(payload[COLR_PAD..COLR_PAD + icc_length].to_vec()))
}

fn decode_exif_payload(exif: &mut ExifData, byte_order: &mut ByteOrder, body: &[u8]) {
    const EXIF_HEADER: [u8; 6] = [0x45, 0x78, 0x69, 0x66, 0x00, 0x00];

    if body.len() <= 8 {
        log::warn!("failed to decode Exif metadata");
        exif.clear();
        return;
    }
    let mut pos = None;
    if body[0] == body[1] && (body[0] == b'I' || body[0] == b'M') {
        pos = Some(0);
    } else if let Some(i) = body.windows(EXIF_HEADER.len()).position(|w| w == EXIF_HEADER) {
        // Some producers prepend a stray Exif marker before the TIFF stream.
        log::warn!("reading non-standard UUID-EXIF_bad box");
        pos = Some(i + EXIF_HEADER.len());
    }
    match pos {
        Some(p) => match tiff::decode(&body[p..]) {
            Ok((decoded, order)) => {
                *exif = decoded;
                *byte_order = order;
            }
            Err(e) => {
                log::warn!("failed to decode Exif metadata: {}", e);
                exif.clear();
            }
        },
        None => exif.clear(),
    }
}

fn decode_xmp_payload(
    xmp_data: &mut XmpData,
    xmp_packet: &mut String,
    write_xmp_from_packet: &mut bool,
    body: &[u8],
) {
    let mut packet = String::from_utf8_lossy(body).into_owned();
    match packet.find('<') {
        Some(idx) if idx > 0 => {
            log::warn!(
                "removing {} characters from the beginning of the XMP packet",
                idx
            );
            packet = packet.split_off(idx);
        }
        _ => {}
    }
    *xmp_packet = packet;
    *write_xmp_from_packet = true;
    if !xmp_packet.is_empty() {
        match xmp::decode(xmp_packet) {
            Ok(decoded) => *xmp_data = decoded,
            Err(e) => {
                log::warn!("failed to decode XMP metadata: {}", e);
                xmp_data.clear();
            }
        }
    }
}

fn binary_preview(data: &[u8], limit: usize) -> String {
    data.iter()
        .take(limit)
        .map(|&b| {
            if (0x20..0x7f).contains(&b) {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}

/// A JP2 image: the I/O adapter plus all metadata collections
///
/// The image exclusively owns its adapter and buffers. `read_metadata`
/// populates the collections from the container; setters mutate them;
/// `write_metadata` produces a fresh container and atomically swaps it
/// into the backing store.
pub struct Jp2Image {
    io: MediaIo,
    pixel_width: u32,
    pixel_height: u32,
    exif: ExifData,
    iptc: IptcData,
    xmp_packet: String,
    xmp: XmpData,
    write_xmp_from_packet: bool,
    icc_profile: Option<Vec<u8>>,
    byte_order: ByteOrder,
    box_budget: usize,
}

impl Jp2Image {
    fn with_io(io: MediaIo) -> Self {
        Jp2Image {
            io,
            pixel_width: 0,
            pixel_height: 0,
            exif: ExifData::new(),
            iptc: IptcData::new(),
            xmp_packet: String::new(),
            xmp: XmpData::new(),
            write_xmp_from_packet: false,
            icc_profile: None,
            byte_order: ByteOrder::default(),
            box_budget: DEFAULT_BOX_BUDGET,
        }
    }

    /// Wrap an adapter. With `create`, the backing store is replaced by
    /// the blank JP2 template first.
    pub fn new(io: MediaIo, create: bool) -> Result<Self> {
        let mut image = Self::with_io(io);
        if create {
            image.io.transfer(&BLANK_JP2)?;
        }
        Ok(image)
    }

    /// Image over a file path. The file is opened lazily.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Self {
        Self::with_io(MediaIo::from_path(path))
    }

    /// Image over an in-memory buffer.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::with_io(MediaIo::from_bytes(data))
    }

    pub fn mime_type(&self) -> &'static str {
        "image/jp2"
    }

    /// Maximum boxes visited per walk; shared by read and write.
    pub fn set_box_budget(&mut self, budget: usize) {
        self.box_budget = budget;
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    /// Byte order of the inner TIFF stream of the last Exif payload read.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn exif_data(&self) -> &ExifData {
        &self.exif
    }

    pub fn exif_data_mut(&mut self) -> &mut ExifData {
        &mut self.exif
    }

    pub fn set_exif_data(&mut self, exif: ExifData) {
        self.exif = exif;
    }

    pub fn iptc_data(&self) -> &IptcData {
        &self.iptc
    }

    pub fn iptc_data_mut(&mut self) -> &mut IptcData {
        &mut self.iptc
    }

    pub fn set_iptc_data(&mut self, iptc: IptcData) {
        self.iptc = iptc;
    }

    pub fn xmp_packet(&self) -> &str {
        &self.xmp_packet
    }

    /// Set the raw packet; it will be written verbatim.
    pub fn set_xmp_packet(&mut self, packet: impl Into<String>) {
        self.xmp_packet = packet.into();
        self.write_xmp_from_packet = true;
    }

    pub fn xmp_data(&self) -> &XmpData {
        &self.xmp
    }

    /// Edit the property collection; the packet is re-encoded from it
    /// on the next write.
    pub fn xmp_data_mut(&mut self) -> &mut XmpData {
        self.write_xmp_from_packet = false;
        &mut self.xmp
    }

    pub fn set_xmp_data(&mut self, xmp: XmpData) {
        self.xmp = xmp;
        self.write_xmp_from_packet = false;
    }

    /// Remove all XMP state.
    pub fn clear_xmp(&mut self) {
        self.xmp.clear();
        self.xmp_packet.clear();
        self.write_xmp_from_packet = false;
    }

    pub fn icc_profile(&self) -> Option<&[u8]> {
        self.icc_profile.as_deref()
    }

    pub fn set_icc_profile(&mut self, profile: Vec<u8>) {
        self.icc_profile = Some(profile);
    }

    pub fn clear_icc_profile(&mut self) {
        self.icc_profile = None;
    }

    /// JP2 has no comment field.
    pub fn set_comment(&mut self, _comment: &str) -> Result<()> {
        Err(Error::InvalidSettingForImage("Image comment"))
    }

    /// Borrow the backing bytes of a memory-backed image.
    pub fn memory_bytes(&self) -> Option<&[u8]> {
        self.io.as_bytes()
    }

    /// Consume the image, returning the bytes of a memory-backed store.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        self.io.into_bytes()
    }

    /// Populate all metadata collections from the container.
    ///
    /// Fails only on container-grammar violations; payload decode
    /// failures clear the affected collection and continue.
    pub fn read_metadata(&mut self) -> Result<()> {
        self.io.open()?;
        let result = self.read_metadata_impl();
        self.io.close();
        result
    }

    fn read_metadata_impl(&mut self) -> Result<()> {
        match check_signature(&mut self.io, true)? {
            SignatureCheck::Matched => {}
            SignatureCheck::Short => return Err(Error::FailedToReadImageData),
            SignatureCheck::Mismatch => return Err(Error::NotAnImage),
        }

        let mut walker = BoxWalker::new(&mut self.io, self.box_budget)?;
        while let Some(bx) = walker.next_box()? {
            if bx.declared_zero {
                // Tail box: the walk ends here, its content is not examined.
                break;
            }
            match bx.box_type {
                BoxType::Jp2HeaderBox => {
                    let payload = walker.read_payload(&bx)?;
                    for sub in SubBoxes::new(&payload) {
                        let sub = sub?;
                        let at = bx.offset + u64::from(BOX_HEADER_SIZE) + sub.offset as u64;
                        walker.charge(at)?;
                        match sub.box_type {
                            BoxType::ImageHeaderBox => {
                                let ihdr = ImageHeader::parse(sub.payload(&payload), at)?;
                                self.pixel_height = ihdr.height;
                                self.pixel_width = ihdr.width;
                            }
                            BoxType::ColourSpecBox if sub.length != 15 => {
                                if let Some(profile) = parse_colr(sub.payload(&payload), at)? {
                                    self.icc_profile = Some(profile);
                                }
                            }
                            _ => {}
                        }
                    }
                }
                BoxType::UuidBox => {
                    if bx.length < BOX_HEADER_SIZE + 16 {
                        return Err(Error::corrupted(
                            bx.offset,
                            "uuid box too small for its identifier",
                        ));
                    }
                    let payload = walker.read_payload(&bx)?;
                    let kind = UuidKind::classify(&payload[..16]);
                    let body = &payload[16..];
                    match kind {
                        UuidKind::Exif => {
                            decode_exif_payload(&mut self.exif, &mut self.byte_order, body)
                        }
                        UuidKind::Iptc => match iptc::decode(body) {
                            Ok(iptc) => self.iptc = iptc,
                            Err(e) => {
                                log::warn!("failed to decode IPTC metadata: {}", e);
                                self.iptc.clear();
                            }
                        },
                        UuidKind::Xmp => decode_xmp_payload(
                            &mut self.xmp,
                            &mut self.xmp_packet,
                            &mut self.write_xmp_from_packet,
                            body,
                        ),
                        UuidKind::Unknown => {}
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Produce a fresh JP2 with the current metadata state and swap it
    /// atomically into the backing store.
    pub fn write_metadata(&mut self) -> Result<()> {
        self.io.open()?;
        let staged = self.write_metadata_impl();
        self.io.close();
        match staged {
            Ok(buf) => self.io.transfer(&buf),
            Err(e) => Err(e),
        }
    }

    fn write_metadata_impl(&mut self) -> Result<Vec<u8>> {
        match check_signature(&mut self.io, true)? {
            SignatureCheck::Matched => {}
            SignatureCheck::Short => return Err(Error::InputDataReadFailed),
            SignatureCheck::Mismatch => return Err(Error::NoImageInInputData),
        }

        let mut out = Vec::with_capacity(self.io.size()? as usize + 1024);
        out.extend_from_slice(&JP2_SIGNATURE);

        let mut walker = BoxWalker::new(&mut self.io, self.box_budget)?;
        while let Some(bx) = walker.next_box()? {
            let payload = walker.read_payload(&bx)?;
            match bx.box_type {
                BoxType::Jp2HeaderBox => {
                    let header = writer::encode_jp2_header(&payload, self.icc_profile.as_deref())?;
                    out.extend_from_slice(&header);

                    // Fresh metadata boxes go immediately after the header.
                    if !self.exif.is_empty() {
                        let raw = tiff::encode(&self.exif, ByteOrder::LittleEndian);
                        if !raw.is_empty() {
                            writer::write_uuid_box(&mut out, &crate::boxes::UUID_EXIF, &raw)?;
                        }
                    }
                    if !self.iptc.is_empty() {
                        let raw = iptc::encode(&self.iptc);
                        if !raw.is_empty() {
                            writer::write_uuid_box(&mut out, &crate::boxes::UUID_IPTC, &raw)?;
                        }
                    }
                    if !self.write_xmp_from_packet {
                        self.xmp_packet = xmp::encode(&self.xmp);
                    }
                    if !self.xmp_packet.is_empty() {
                        writer::write_uuid_box(
                            &mut out,
                            &crate::boxes::UUID_XMP,
                            self.xmp_packet.as_bytes(),
                        )?;
                    }
                }
                BoxType::UuidBox => {
                    if payload.len() < 16 {
                        return Err(Error::corrupted(
                            bx.offset,
                            "uuid box too small for its identifier",
                        ));
                    }
                    match UuidKind::classify(&payload[..16]) {
                        UuidKind::Exif | UuidKind::Iptc | UuidKind::Xmp => {
                            log::debug!("stripping {} uuid box at {}", bx.box_type, bx.offset);
                        }
                        UuidKind::Unknown => {
                            writer::push_box(&mut out, bx.box_type, &payload)?;
                        }
                    }
                }
                _ => {
                    // Zero-length tails get an explicit length on the way out.
                    writer::push_box(&mut out, bx.box_type, &payload)?;
                }
            }
        }
        Ok(out)
    }

    /// Print a human-readable box tree to `out`.
    ///
    /// `IccProfile` writes the embedded ICC bytes to `out`; `Xmp` writes
    /// the raw packet; `IptcErase` walks without printing.
    pub fn print_structure(
        &mut self,
        out: &mut dyn Write,
        option: PrintStructureOption,
        depth: usize,
    ) -> Result<()> {
        self.io.open()?;
        let result = self.print_structure_impl(out, option, depth);
        self.io.close();
        result
    }

    fn print_structure_impl(
        &mut self,
        out: &mut dyn Write,
        option: PrintStructureOption,
        depth: usize,
    ) -> Result<()> {
        match check_signature(&mut self.io, false)? {
            SignatureCheck::Matched => {}
            SignatureCheck::Short => return Err(Error::FailedToReadImageData),
            SignatureCheck::Mismatch => return Err(Error::NotAnImage),
        }

        let print = matches!(
            option,
            PrintStructureOption::Basic | PrintStructureOption::Recursive
        );
        let recursive = option == PrintStructureOption::Recursive;
        let want_icc = option == PrintStructureOption::IccProfile;
        let want_xmp = option == PrintStructureOption::Xmp;

        if print {
            writeln!(out, "STRUCTURE OF JPEG2000 FILE")?;
            writeln!(out, " address |   length | box       | data")?;
        }

        let mut walker = BoxWalker::new(&mut self.io, self.box_budget)?;
        while let Some(bx) = walker.next_box()? {
            let shown_length = if bx.declared_zero { 0 } else { bx.length };
            if print {
                writeln!(
                    out,
                    "{:8} | {:8} | {:<9} | ",
                    bx.offset, shown_length, bx.box_type
                )?;
            }
            if bx.box_type == BoxType::CodestreamBox {
                break;
            }
            match bx.box_type {
                BoxType::Jp2HeaderBox => {
                    let payload = walker.read_payload(&bx)?;
                    for sub in SubBoxes::new(&payload) {
                        let sub = sub?;
                        let at = bx.offset + u64::from(BOX_HEADER_SIZE) + sub.offset as u64;
                        walker.charge(at)?;
                        let sub_payload = sub.payload(&payload);
                        if print {
                            write!(
                                out,
                                "{:8} | {:8} |  sub:{} | {}",
                                at,
                                sub.length,
                                sub.box_type,
                                binary_preview(sub_payload, 30)
                            )?;
                        }
                        if print && sub.box_type == BoxType::ImageHeaderBox {
                            let ihdr = ImageHeader::parse(sub_payload, at)?;
                            write!(
                                out,
                                " | height: {} width: {} components: {} bpc: {} \
                                 compression: {} unkC: {} ipr: {}",
                                ihdr.height,
                                ihdr.width,
                                ihdr.components,
                                ihdr.bits_per_component,
                                ihdr.compression,
                                ihdr.colourspace_unknown,
                                ihdr.ipr
                            )?;
                        }
                        if sub.box_type == BoxType::ColourSpecBox && sub.length != 15 {
                            if sub_payload.len() < COLR_PAD + 4 {
                                return Err(Error::corrupted(
                                    at,
                                    "colour specification box truncated",
                                ));
                            }
                            let icc_length = bytes::read_u32_be(sub_payload, COLR_PAD)? as usize;
                            if print {
                                write!(
                                    out,
                                    " | pad: {} {} {} | iccLength: {}",
                                    sub_payload[0], sub_payload[1], sub_payload[2], icc_length
                                )?;
                            }
                            if sub_payload[0] == COLR_METHOD_ICC {
                                if icc_length > sub_payload.len() - COLR_PAD {
                                    return Err(Error::corrupted(
                                        at,
                                        "ICC length exceeds colour box",
                                    ));
                                }
                                if want_icc {
                                    out.write_all(&sub_payload[COLR_PAD..COLR_PAD + icc_length])?;
                                }
                            }
                        }
                        if print {
                            writeln!(out)?;
                        }
                    }
                }
                BoxType::UuidBox => {
                    if bx.length < BOX_HEADER_SIZE + 16 {
                        return Err(Error::corrupted(
                            bx.offset,
                            "uuid box too small for its identifier",
                        ));
                    }
                    let payload = walker.read_payload(&bx)?;
                    let kind = UuidKind::classify(&payload[..16]);
                    let body = &payload[16..];
                    if print {
                        let label = match kind {
                            UuidKind::Exif => "Exif: ",
                            UuidKind::Iptc => "IPTC: ",
                            UuidKind::Xmp => "XMP : ",
                            UuidKind::Unknown => "????: ",
                        };
                        writeln!(out, "{}{}", label, binary_preview(body, 40))?;
                    }
                    if recursive && kind == UuidKind::Exif && body.len() > 8 {
                        if body[0] == body[1] && (body[0] == b'I' || body[0] == b'M') {
                            tiff::print_structure(out, body, depth + 1)?;
                        }
                    }
                    if recursive && kind == UuidKind::Iptc {
                        if iptc::print_structure(out, body, depth + 1).is_err() {
                            writeln!(out, "  (invalid IPTC data)")?;
                        }
                    }
                    if want_xmp && kind == UuidKind::Xmp {
                        out.write_all(body)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}
