//! Deterministic PNG encoding for RGBA tile rasters.
//!
//! A hand-rolled writer: 8-bit depth, color type 6 (RGBA), a single
//! zlib-compressed IDAT at a fixed compression level, no ancillary
//! chunks. Identical pixel input yields byte-identical output, which the
//! tile regression tests rely on.

use std::io::Write;

use toe_common::{ToeError, ToeResult};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Encode an RGBA pixel buffer (4 bytes per pixel, row-major) as a PNG.
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> ToeResult<Vec<u8>> {
    if pixels.len() != width * height * 4 {
        return Err(ToeError::EncodeError(format!(
            "pixel buffer is {} bytes, expected {} for {}x{} RGBA",
            pixels.len(),
            width * height * 4,
            width,
            height
        )));
    }

    let mut png = Vec::with_capacity(pixels.len() / 8 + 128);
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(6); // color type: RGBA
    ihdr.push(0); // compression method
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr);

    let idat = compress_scanlines(pixels, width)?;
    write_chunk(&mut png, b"IDAT", &idat);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Prefix each scanline with filter type 0 (none) and zlib-compress.
fn compress_scanlines(pixels: &[u8], width: usize) -> ToeResult<Vec<u8>> {
    let stride = width * 4;
    let mut raw = Vec::with_capacity(pixels.len() + pixels.len() / stride.max(1));
    for row in pixels.chunks_exact(stride) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&raw)
        .map_err(|e| ToeError::EncodeError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| ToeError::EncodeError(e.to_string()))
}

/// Write one PNG chunk: length, type, data, CRC over type + data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}
