//! Minimal PNG container encoder.
//!
//! Produces truecolor-with-alpha, 8-bit, non-interlaced PNGs made of exactly
//! three chunks (IHDR, IDAT, IEND). Scanlines are stored unfiltered and the
//! IDAT payload is a single zlib stream.

use anyhow::{bail, Context, Result};
use image::RgbaImage;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub const BIT_DEPTH: u8 = 8;
/// Truecolor with alpha.
pub const COLOR_TYPE_RGBA: u8 = 6;

const FILTER_NONE: u8 = 0;

/// Length, type tag and CRC fields around every chunk payload.
const CHUNK_OVERHEAD: usize = 12;
const IHDR_LEN: usize = 13;

/// Flatten an RGBA raster into unfiltered PNG scanlines.
///
/// Each row is a filter byte (0) followed by `width * 4` channel bytes, so the
/// result is always `height * (1 + width * 4)` bytes long.
pub fn scanlines(image: &RgbaImage) -> Vec<u8> {
    let row_len = 1 + image.width() as usize * 4;
    let mut raw = Vec::with_capacity(row_len * image.height() as usize);

    for row in image.rows() {
        raw.push(FILTER_NONE);
        for pixel in row {
            raw.extend_from_slice(&pixel.0);
        }
    }

    raw
}

/// Deflate `data` into a zlib stream at the best compression level.
pub fn compress(data: &[u8]) -> Vec<u8> {
    compress_to_vec_zlib(data, CompressionLevel::BestCompression as u8)
}

/// Serialize a single chunk: length, type tag, payload, CRC32(tag ++ payload).
pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + CHUNK_OVERHEAD);
    write_chunk(&mut out, tag, payload);
    out
}

/// Append a chunk to `out`.
pub fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    out.extend_from_slice(&chunk_crc(tag, payload).to_be_bytes());
}

/// CRC32 over the chunk type tag followed by its payload.
pub fn chunk_crc(tag: &[u8], payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(tag);
    hasher.update(payload);
    hasher.finalize()
}

/// Wrap an already-compressed IDAT payload in a complete PNG stream.
pub fn encode_png(width: u32, height: u32, compressed_idat: &[u8]) -> Vec<u8> {
    let mut png = Vec::with_capacity(
        PNG_SIGNATURE.len() + IHDR_LEN + compressed_idat.len() + 3 * CHUNK_OVERHEAD,
    );
    png.extend_from_slice(&PNG_SIGNATURE);

    let ihdr = Ihdr {
        width,
        height,
        bit_depth: BIT_DEPTH,
        color_type: COLOR_TYPE_RGBA,
        compression: 0,
        filter: 0,
        interlace: 0,
    };
    write_chunk(&mut png, b"IHDR", &ihdr.to_bytes());
    write_chunk(&mut png, b"IDAT", compressed_idat);
    write_chunk(&mut png, b"IEND", &[]);

    png
}

/// Encode an RGBA raster: scanlines, deflate, then chunk framing.
pub fn encode_rgba(image: &RgbaImage) -> Vec<u8> {
    let raw = scanlines(image);
    let compressed = compress(&raw);
    log::debug!(
        "{}x{}: {} raw bytes -> {} compressed",
        image.width(),
        image.height(),
        raw.len(),
        compressed.len()
    );
    encode_png(image.width(), image.height(), &compressed)
}

/// IHDR payload fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ihdr {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression: u8,
    pub filter: u8,
    pub interlace: u8,
}

impl Ihdr {
    pub fn to_bytes(&self) -> [u8; IHDR_LEN] {
        let mut bytes = [0u8; IHDR_LEN];
        bytes[0..4].copy_from_slice(&self.width.to_be_bytes());
        bytes[4..8].copy_from_slice(&self.height.to_be_bytes());
        bytes[8] = self.bit_depth;
        bytes[9] = self.color_type;
        bytes[10] = self.compression;
        bytes[11] = self.filter;
        bytes[12] = self.interlace;
        bytes
    }

    pub fn parse(payload: &[u8]) -> Result<Self> {
        if payload.len() != IHDR_LEN {
            bail!("IHDR payload must be {IHDR_LEN} bytes, got {}", payload.len());
        }
        Ok(Self {
            width: be_u32(&payload[0..4]),
            height: be_u32(&payload[4..8]),
            bit_depth: payload[8],
            color_type: payload[9],
            compression: payload[10],
            filter: payload[11],
            interlace: payload[12],
        })
    }
}

/// A chunk as read back from an encoded stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngChunk {
    pub tag: [u8; 4],
    pub payload: Vec<u8>,
    pub crc: u32,
}

impl PngChunk {
    pub fn tag_str(&self) -> &str {
        std::str::from_utf8(&self.tag).unwrap_or("????")
    }

    pub fn crc_matches(&self) -> bool {
        chunk_crc(&self.tag, &self.payload) == self.crc
    }
}

/// Split a PNG stream into its chunks, checking the signature and chunk
/// bounds. CRCs are returned as stored, not validated.
pub fn read_chunks(bytes: &[u8]) -> Result<Vec<PngChunk>> {
    if bytes.len() < PNG_SIGNATURE.len() || bytes[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
        bail!("Missing PNG signature");
    }

    let mut chunks = Vec::new();
    let mut rest = &bytes[PNG_SIGNATURE.len()..];
    while !rest.is_empty() {
        if rest.len() < CHUNK_OVERHEAD {
            bail!("Truncated chunk header at offset {}", bytes.len() - rest.len());
        }
        let len = be_u32(&rest[0..4]) as usize;
        let end = len
            .checked_add(CHUNK_OVERHEAD)
            .filter(|&end| end <= rest.len())
            .with_context(|| format!("Chunk of {len} bytes runs past end of stream"))?;

        let mut tag = [0u8; 4];
        tag.copy_from_slice(&rest[4..8]);
        chunks.push(PngChunk {
            tag,
            payload: rest[8..8 + len].to_vec(),
            crc: be_u32(&rest[8 + len..end]),
        });
        rest = &rest[end..];
    }

    Ok(chunks)
}

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
