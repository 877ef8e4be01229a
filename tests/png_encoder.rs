use image::{ColorType, ImageBuffer, Rgba, RgbaImage};
use miniz_oxide::inflate::decompress_to_vec_zlib;
use pwa_icons::badge::render_badge;
use pwa_icons::png::{
    chunk, chunk_crc, compress, encode_png, encode_rgba, read_chunks, scanlines, Ihdr,
    PNG_SIGNATURE,
};

const GREEN: Rgba<u8> = Rgba([76, 175, 80, 255]);

#[test]
fn test_iend_chunk_bytes() {
    // The empty IEND chunk is the same in every PNG ever written.
    assert_eq!(
        chunk(b"IEND", &[]),
        vec![0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
    );
}

#[test]
fn test_chunk_layout() {
    let payload = [1u8, 2, 3, 4, 5];
    let bytes = chunk(b"tEST", &payload);

    assert_eq!(bytes.len(), payload.len() + 12);
    assert_eq!(&bytes[0..4], &5u32.to_be_bytes());
    assert_eq!(&bytes[4..8], b"tEST");
    assert_eq!(&bytes[8..13], &payload);
    assert_eq!(&bytes[13..17], &chunk_crc(b"tEST", &payload).to_be_bytes());
}

#[test]
fn test_scanlines_layout() {
    let img: RgbaImage = ImageBuffer::from_fn(3, 2, |x, y| Rgba([x as u8, y as u8, 7, 9]));
    let raw = scanlines(&img);

    assert_eq!(raw.len(), 2 * (1 + 3 * 4));
    assert_eq!(
        raw,
        vec![
            0, 0, 0, 7, 9, 1, 0, 7, 9, 2, 0, 7, 9, //
            0, 0, 1, 7, 9, 1, 1, 7, 9, 2, 1, 7, 9,
        ]
    );
}

#[test]
fn test_compress_inflates_back() {
    let raw = scanlines(&render_badge(96, GREEN));
    let compressed = compress(&raw);

    assert!(compressed.len() < raw.len());
    assert_eq!(decompress_to_vec_zlib(&compressed).unwrap(), raw);
}

#[test]
fn test_encode_png_structure() {
    let idat = compress(&[0, 1, 2, 3, 4]);
    let png = encode_png(1, 1, &idat);

    assert_eq!(&png[..8], &PNG_SIGNATURE);

    let chunks = read_chunks(&png).unwrap();
    let tags: Vec<&str> = chunks.iter().map(|c| c.tag_str()).collect();
    assert_eq!(tags, ["IHDR", "IDAT", "IEND"]);
    assert!(chunks.iter().all(|c| c.crc_matches()));

    assert_eq!(
        chunks[0].payload,
        vec![0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0]
    );
    assert_eq!(chunks[1].payload, idat);
    assert!(chunks[2].payload.is_empty());
}

#[test]
fn test_encoded_length_is_signature_plus_three_chunks() {
    let idat = compress(&scanlines(&render_badge(72, GREEN)));
    let png = encode_png(72, 72, &idat);

    // signature + IHDR(12 + 13) + IDAT(12 + payload) + IEND(12)
    assert_eq!(png.len(), 8 + 25 + 12 + idat.len() + 12);
}

#[test]
fn test_ihdr_parse() {
    let chunks = read_chunks(&encode_rgba(&render_badge(144, GREEN))).unwrap();
    let ihdr = Ihdr::parse(&chunks[0].payload).unwrap();

    assert_eq!(ihdr.width, 144);
    assert_eq!(ihdr.height, 144);
    assert_eq!(ihdr.bit_depth, 8);
    assert_eq!(ihdr.color_type, 6);
    assert_eq!(ihdr.compression, 0);
    assert_eq!(ihdr.filter, 0);
    assert_eq!(ihdr.interlace, 0);

    assert!(Ihdr::parse(&[0; 12]).is_err());
}

#[test]
fn test_encoded_badge_decodes_with_image_crate() {
    let badge = render_badge(96, GREEN);
    let png = encode_rgba(&badge);

    let decoded = image::load_from_memory(&png).expect("encoded badge should decode");
    assert_eq!(decoded.color(), ColorType::Rgba8);
    assert_eq!(decoded.to_rgba8(), badge);
}

#[test]
fn test_encoding_is_deterministic() {
    let badge = render_badge(152, GREEN);
    assert_eq!(encode_rgba(&badge), encode_rgba(&badge));
}

#[test]
fn test_read_chunks_rejects_bad_input() {
    assert!(read_chunks(b"not a png").is_err());

    let mut png = encode_rgba(&render_badge(72, GREEN));
    png.truncate(png.len() - 3);
    assert!(read_chunks(&png).is_err());
}

#[test]
fn test_corrupted_crc_is_detected() {
    let mut png = encode_rgba(&render_badge(72, GREEN));
    // Flip a bit inside the IHDR width field.
    png[8 + 8 + 3] ^= 0x01;

    let chunks = read_chunks(&png).unwrap();
    assert!(!chunks[0].crc_matches());
    assert!(chunks[1].crc_matches());
}
