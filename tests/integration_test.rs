//! End-to-end read/write round-trips over synthesised JP2 files

mod common;

use common::*;
use jp2_io::{
    exif_tags, ExifData, ExifValue, IptcData, Jp2Image, PrintStructureOption, BLANK_JP2,
    UUID_EXIF, UUID_XMP,
};

#[test]
fn test_blank_template_reads_as_1x1_with_no_metadata() {
    let mut image = Jp2Image::from_bytes(BLANK_JP2.to_vec());
    image.read_metadata().unwrap();

    assert_eq!(image.pixel_width(), 1);
    assert_eq!(image.pixel_height(), 1);
    assert!(image.exif_data().is_empty());
    assert!(image.iptc_data().is_empty());
    assert!(image.xmp_data().is_empty());
    assert!(image.xmp_packet().is_empty());
    assert!(image.icc_profile().is_none());
}

#[test]
fn test_set_artist_and_round_trip() {
    let mut image = Jp2Image::from_bytes(BLANK_JP2.to_vec());
    image.read_metadata().unwrap();
    image.exif_data_mut().set_ascii(exif_tags::ARTIST, "Alice");
    image.write_metadata().unwrap();

    let written = image.memory_bytes().unwrap().to_vec();

    // Exactly one Exif UUID box, immediately after jp2h.
    let boxes = list_boxes(&written);
    let names: Vec<&str> = boxes.iter().map(|(n, _)| n.as_str()).collect();
    let jp2h_pos = names.iter().position(|&n| n == "jp2h").unwrap();
    assert_eq!(names[jp2h_pos + 1], "uuid");
    assert_eq!(&boxes[jp2h_pos + 1].1[..16], &UUID_EXIF);
    assert_eq!(count_metadata_uuids(&written), (1, 0, 0));

    let mut reread = Jp2Image::from_bytes(written);
    reread.read_metadata().unwrap();
    assert_eq!(
        reread.exif_data().get(exif_tags::ARTIST),
        Some(&ExifValue::Ascii("Alice".into()))
    );
    assert_eq!(reread.pixel_width(), 1);
    assert_eq!(reread.pixel_height(), 1);
}

#[test]
fn test_xmp_payload_with_leading_garbage_is_trimmed() {
    let packet = "   <x:xmpmeta xmlns:x=\"adobe:ns:meta/\">\
                  <rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">\
                  <rdf:Description rdf:about=\"\" \
                  xmlns:dc=\"http://purl.org/dc/elements/1.1/\" dc:title=\"Boat\"/>\
                  </rdf:RDF></x:xmpmeta>";
    let file = jp2_file(
        &jp2h_box(3, 4, &colr_enumerated()),
        &[uuid_box(&UUID_XMP, packet.as_bytes())],
    );

    let mut image = Jp2Image::from_bytes(file);
    image.read_metadata().unwrap();
    assert!(image.xmp_packet().starts_with('<'));
    assert_eq!(image.xmp_data().get("dc:title"), Some("Boat"));
    assert_eq!(image.pixel_height(), 3);
    assert_eq!(image.pixel_width(), 4);
}

#[test]
fn test_full_round_trip_preserves_all_collections() {
    let mut exif = ExifData::new();
    exif.set_ascii(exif_tags::ARTIST, "Alice");
    exif.set_ascii(exif_tags::MAKE, "Jp2Works");
    exif.set(exif_tags::ORIENTATION, ExifValue::Short(vec![1]));
    let exif_raw = jp2_io::tiff::encode(&exif, jp2_io::ByteOrder::BigEndian);

    let mut iptc = IptcData::new();
    iptc.set(2, jp2_io::iptc::datasets::OBJECT_NAME, "Harbour".as_bytes());
    iptc.push(2, jp2_io::iptc::datasets::KEYWORDS, "boat".as_bytes());
    let iptc_raw = jp2_io::iptc::encode(&iptc);

    let mut xmp = jp2_io::XmpData::new();
    xmp.set("dc:title", "Harbour");
    let packet = jp2_io::xmp::encode(&xmp);

    let profile = fake_icc(128);
    let file = jp2_file(
        &jp2h_box(480, 640, &colr_with_icc(&profile)),
        &[
            uuid_box(&UUID_EXIF, &exif_raw),
            uuid_box(&jp2_io::UUID_IPTC, &iptc_raw),
            uuid_box(&UUID_XMP, packet.as_bytes()),
        ],
    );

    let mut image = Jp2Image::from_bytes(file);
    image.read_metadata().unwrap();
    assert_eq!(image.pixel_width(), 640);
    assert_eq!(image.pixel_height(), 480);
    assert_eq!(image.byte_order(), jp2_io::ByteOrder::BigEndian);
    assert_eq!(image.exif_data(), &exif);
    assert_eq!(image.iptc_data(), &iptc);
    assert_eq!(image.xmp_packet(), packet);
    assert_eq!(image.icc_profile(), Some(&profile[..]));

    image.write_metadata().unwrap();
    let written = image.memory_bytes().unwrap().to_vec();
    assert_eq!(count_metadata_uuids(&written), (1, 1, 1));

    let mut reread = Jp2Image::from_bytes(written);
    reread.read_metadata().unwrap();
    assert_eq!(reread.exif_data(), &exif);
    assert_eq!(reread.iptc_data(), &iptc);
    assert_eq!(reread.xmp_data().get("dc:title"), Some("Harbour"));
    assert_eq!(reread.xmp_packet(), packet);
    assert_eq!(reread.icc_profile(), Some(&profile[..]));
    assert_eq!(reread.pixel_width(), 640);
    assert_eq!(reread.pixel_height(), 480);
    // Output is written little-endian regardless of the input stream.
    assert_eq!(reread.byte_order(), jp2_io::ByteOrder::LittleEndian);
}

#[test]
fn test_write_is_idempotent() {
    let mut image = Jp2Image::from_bytes(BLANK_JP2.to_vec());
    image.read_metadata().unwrap();
    image.exif_data_mut().set_ascii(exif_tags::ARTIST, "Alice");
    image
        .iptc_data_mut()
        .set(2, jp2_io::iptc::datasets::CAPTION, "caption".as_bytes());

    image.write_metadata().unwrap();
    let first = image.memory_bytes().unwrap().to_vec();

    image.write_metadata().unwrap();
    let second = image.memory_bytes().unwrap().to_vec();
    assert_eq!(first, second);
}

#[test]
fn test_clearing_metadata_strips_uuid_boxes() {
    let mut exif = ExifData::new();
    exif.set_ascii(exif_tags::ARTIST, "gone");
    let exif_raw = jp2_io::tiff::encode(&exif, jp2_io::ByteOrder::LittleEndian);
    let file = jp2_file(
        &jp2h_box(2, 2, &colr_enumerated()),
        &[
            uuid_box(&UUID_EXIF, &exif_raw),
            uuid_box(&UUID_XMP, b"<x/>"),
        ],
    );

    let mut image = Jp2Image::from_bytes(file);
    image.read_metadata().unwrap();
    assert!(!image.exif_data().is_empty());

    image.set_exif_data(ExifData::new());
    image.set_iptc_data(IptcData::new());
    image.clear_xmp();
    image.clear_icc_profile();
    image.write_metadata().unwrap();

    let written = image.memory_bytes().unwrap().to_vec();
    assert_eq!(count_metadata_uuids(&written), (0, 0, 0));

    let mut reread = Jp2Image::from_bytes(written);
    reread.read_metadata().unwrap();
    assert!(reread.exif_data().is_empty());
    assert!(reread.xmp_packet().is_empty());
}

#[test]
fn test_duplicate_metadata_boxes_collapse_to_one() {
    let mut exif = ExifData::new();
    exif.set_ascii(exif_tags::ARTIST, "first");
    let raw_a = jp2_io::tiff::encode(&exif, jp2_io::ByteOrder::LittleEndian);
    exif.set_ascii(exif_tags::ARTIST, "second");
    let raw_b = jp2_io::tiff::encode(&exif, jp2_io::ByteOrder::LittleEndian);

    let file = jp2_file(
        &jp2h_box(2, 2, &colr_enumerated()),
        &[uuid_box(&UUID_EXIF, &raw_a), uuid_box(&UUID_EXIF, &raw_b)],
    );

    let mut image = Jp2Image::from_bytes(file);
    image.read_metadata().unwrap();
    // Last box wins on read, as the walk dispatches in file order.
    assert_eq!(
        image.exif_data().get(exif_tags::ARTIST),
        Some(&ExifValue::Ascii("second".into()))
    );

    image.write_metadata().unwrap();
    let written = image.memory_bytes().unwrap().to_vec();
    assert_eq!(count_metadata_uuids(&written), (1, 0, 0));
}

#[test]
fn test_icc_profile_round_trip() {
    let profile = fake_icc(256);
    let mut image = Jp2Image::from_bytes(BLANK_JP2.to_vec());
    image.read_metadata().unwrap();
    image.set_icc_profile(profile.clone());
    image.write_metadata().unwrap();

    let mut reread = Jp2Image::from_bytes(image.memory_bytes().unwrap().to_vec());
    reread.read_metadata().unwrap();
    assert_eq!(reread.icc_profile(), Some(&profile[..]));
}

#[test]
fn test_unknown_uuid_box_is_preserved() {
    let other = uuid_box(&[0x42; 16], b"opaque payload");
    let file = jp2_file(&jp2h_box(2, 2, &colr_enumerated()), &[other.clone()]);

    let mut image = Jp2Image::from_bytes(file);
    image.read_metadata().unwrap();
    image.write_metadata().unwrap();

    let written = image.memory_bytes().unwrap().to_vec();
    let kept = list_boxes(&written)
        .into_iter()
        .any(|(n, p)| n == "uuid" && p[..16] == [0x42; 16] && &p[16..] == b"opaque payload");
    assert!(kept);
}

#[test]
fn test_codestream_is_copied_verbatim() {
    let mut image = Jp2Image::from_bytes(BLANK_JP2.to_vec());
    image.read_metadata().unwrap();
    image.write_metadata().unwrap();
    let written = image.memory_bytes().unwrap().to_vec();

    let input_codestream = &BLANK_JP2[85..]; // after the zero-length jp2c header
    let boxes = list_boxes(&written);
    let (_, codestream) = boxes.iter().find(|(n, _)| n == "jp2c").unwrap();
    assert_eq!(&codestream[..], input_codestream);
}

#[test]
fn test_set_xmp_packet_is_written_verbatim() {
    let packet = "<?xpacket begin=\"\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?><x:xmpmeta \
                  xmlns:x=\"adobe:ns:meta/\"><rdf:RDF \
                  xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">\
                  <rdf:Description rdf:about=\"\"/></rdf:RDF></x:xmpmeta>";
    let mut image = Jp2Image::from_bytes(BLANK_JP2.to_vec());
    image.read_metadata().unwrap();
    image.set_xmp_packet(packet);
    image.write_metadata().unwrap();

    let mut reread = Jp2Image::from_bytes(image.memory_bytes().unwrap().to_vec());
    reread.read_metadata().unwrap();
    assert_eq!(reread.xmp_packet(), packet);
}

#[test]
fn test_file_backed_round_trip_swaps_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.jp2");
    std::fs::write(&path, BLANK_JP2).unwrap();

    let mut image = Jp2Image::from_path(&path);
    image.read_metadata().unwrap();
    image.exif_data_mut().set_ascii(exif_tags::ARTIST, "Alice");
    image.write_metadata().unwrap();

    let mut reread = Jp2Image::from_path(&path);
    reread.read_metadata().unwrap();
    assert_eq!(
        reread.exif_data().get(exif_tags::ARTIST),
        Some(&ExifValue::Ascii("Alice".into()))
    );
}

#[test]
fn test_failed_write_leaves_input_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.jp2");
    // Valid signature, then a box declaring more data than the file has.
    let mut data = jp2_io::JP2_SIGNATURE.to_vec();
    data.extend_from_slice(&[0, 0, 1, 0]);
    data.extend_from_slice(b"ftyp");
    std::fs::write(&path, &data).unwrap();

    let mut image = Jp2Image::from_path(&path);
    assert!(image.write_metadata().is_err());
    assert_eq!(std::fs::read(&path).unwrap(), data);
}

#[test]
fn test_print_structure_options() {
    let profile = fake_icc(64);
    let packet = b"<x:xmpmeta xmlns:x=\"adobe:ns:meta/\"></x:xmpmeta>";
    let file = jp2_file(
        &jp2h_box(2, 2, &colr_with_icc(&profile)),
        &[uuid_box(&UUID_XMP, packet)],
    );

    let mut image = Jp2Image::from_bytes(file);

    let mut out = Vec::new();
    image
        .print_structure(&mut out, PrintStructureOption::Basic, 0)
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("jp2h"));
    assert!(text.contains("XMP : "));

    let mut icc_out = Vec::new();
    image
        .print_structure(&mut icc_out, PrintStructureOption::IccProfile, 0)
        .unwrap();
    assert_eq!(icc_out, profile);

    let mut xmp_out = Vec::new();
    image
        .print_structure(&mut xmp_out, PrintStructureOption::Xmp, 0)
        .unwrap();
    assert_eq!(xmp_out, packet);

    let mut quiet = Vec::new();
    image
        .print_structure(&mut quiet, PrintStructureOption::IptcErase, 0)
        .unwrap();
    assert!(quiet.is_empty());
}

#[test]
fn test_print_structure_recursive_dumps_exif() {
    let mut exif = ExifData::new();
    exif.set_ascii(exif_tags::ARTIST, "Alice");
    let raw = jp2_io::tiff::encode(&exif, jp2_io::ByteOrder::LittleEndian);
    let file = jp2_file(
        &jp2h_box(2, 2, &colr_enumerated()),
        &[uuid_box(&UUID_EXIF, &raw)],
    );

    let mut image = Jp2Image::from_bytes(file);
    let mut out = Vec::new();
    image
        .print_structure(&mut out, PrintStructureOption::Recursive, 0)
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Exif: "));
    assert!(text.contains("Artist"));
    assert!(text.contains("Alice"));
}
