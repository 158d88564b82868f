// Tagmap
// Copyright (c) 2026 The Tagmap Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Image utilities.

use tagmap_core::errors::{decode_error, unsupported_error, Result};
use tagmap_core::io::{BufReader, ReadBytes};

use log::debug;

/// Image information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    /// The Media Type (MIME Type) of the image format.
    pub media_type: &'static str,
    /// The width of the image in pixels.
    pub width: u32,
    /// The height of the image in pixels.
    pub height: u32,
    /// The number of bits-per-pixel.
    pub bits_per_pixel: u32,
    /// The number of colors in the color palette, or 0 if the image does not use indexed colors.
    pub indexed_colors: u32,
}

/// Try to get basic information about an image from an image buffer.
pub fn try_get_image_info(buf: &[u8]) -> Option<ImageInfo> {
    struct Parser {
        parse: for<'a> fn(BufReader<'a>) -> Result<ImageInfo>,
        marker: &'static [u8],
    }

    const IMAGE_PARSERS: &[Parser] = &[
        Parser { marker: &[0x42, 0x4d], parse: parse_bitmap },
        Parser { marker: &[0xff, 0xd8], parse: parse_jpeg },
        Parser { marker: &[0x47, 0x49, 0x46, 0x38, 0x37, 0x61], parse: parse_gif },
        Parser { marker: &[0x47, 0x49, 0x46, 0x38, 0x39, 0x61], parse: parse_gif },
        Parser { marker: &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a], parse: parse_png },
    ];

    debug!("detecting format of image starting with: {:02x?}", &buf[..8.min(buf.len())]);

    // Find the first image parser that has a marker that matches the beginning of the image
    // buffer, and attempt to parse it for image information.
    IMAGE_PARSERS
        .iter()
        .filter(|parser| buf.starts_with(parser.marker))
        .find_map(|parser| (parser.parse)(BufReader::new(&buf[parser.marker.len()..])).ok())
}

/// Parse a JPEG for image information.
fn parse_jpeg(mut reader: BufReader<'_>) -> Result<ImageInfo> {
    while reader.read_u8()? == 0xff {
        let chunk_type = reader.read_u8()?;

        // Skip parameter-less markers.
        if chunk_type >= 0xd0 && chunk_type <= 0xd9 {
            continue;
        }

        let chunk_len = reader.read_be_u16()?;
        if chunk_len < 2 {
            return decode_error("meta (jpeg): invalid chunk length");
        }

        // Baseline, and progressive DCT.
        if chunk_type == 0xc0 || chunk_type == 0xc2 {
            let precision = reader.read_u8()?;
            let height = reader.read_be_u16()?;
            let width = reader.read_be_u16()?;
            let components = reader.read_u8()?;

            return Ok(ImageInfo {
                media_type: "image/jpeg",
                width: u32::from(width),
                height: u32::from(height),
                bits_per_pixel: u32::from(precision) * u32::from(components),
                indexed_colors: 0,
            });
        }

        // Ignore the chunk. Exclude the chunk length that has already been read.
        reader.ignore_bytes(u64::from(chunk_len) - 2)?;
    }

    decode_error("meta (jpeg): invalid data")
}

/// Parse a PNG for image information.
fn parse_png(mut reader: BufReader<'_>) -> Result<ImageInfo> {
    // A PNG must start with an IHDR chunk.
    reader.ignore_bytes(4)?;
    if reader.read_quad_bytes()? != *b"IHDR" {
        return decode_error("meta (png): invalid data");
    }

    let width = reader.read_be_u32()?;
    let height = reader.read_be_u32()?;
    let bit_depth = u32::from(reader.read_u8()?);
    let color_type = reader.read_u8()?;

    // Only certain bit-depths are valid for each color type.
    let (bits_per_pixel, indexed_colors) = match color_type {
        // Greyscale (0)
        0 if [1, 2, 4, 8, 16].contains(&bit_depth) => (bit_depth, 0),
        // Truecolor (2)
        2 if [8, 16].contains(&bit_depth) => (3 * bit_depth, 0),
        // Indexed (3)
        3 if [1, 2, 4, 8].contains(&bit_depth) => (bit_depth, 1 << bit_depth),
        // Greyscale with alpha (4)
        4 if [8, 16].contains(&bit_depth) => (2 * bit_depth, 0),
        // Truecolor with alpha (6)
        6 if [8, 16].contains(&bit_depth) => (4 * bit_depth, 0),
        _ => return decode_error("meta (png): invalid color type and bit depth combination"),
    };

    Ok(ImageInfo { media_type: "image/png", width, height, bits_per_pixel, indexed_colors })
}

/// Parse a Bitmap for image information.
fn parse_bitmap(mut reader: BufReader<'_>) -> Result<ImageInfo> {
    // Ignore the BITMAPFILEHEADER contents after the signature.
    reader.ignore_bytes(12)?;

    // The header size differentiates the version/type of bitmap header.
    let size = reader.read_u32()?;

    // Support the 5 versions of the Windows BITMAPINFOHEADER. Each subsequent version is an
    // incremental extension of the previous, however, only the fields from the base header are
    // needed.
    if ![40, 52, 56, 108, 124].contains(&size) {
        return decode_error("meta (bmp): unsupported bitmap header");
    }

    // Height can be negative to indicate a top-down bitmap instead of a bottom-up bitmap. This
    // makes no difference to the actual size.
    let width = reader.read_i32()?.unsigned_abs();
    let height = reader.read_i32()?.unsigned_abs();

    // The number of color planes should always be 1.
    if reader.read_u16()? != 1 {
        return decode_error("meta (bmp): invalid number of planes");
    }

    let bit_count = u32::from(reader.read_u16()?);
    let compression = reader.read_u32()?;

    let indexed_colors = match compression {
        // BI_RGB = 0x0 (RGB uncompressed)
        0 if bit_count > 0 && bit_count <= 8 => 1 << bit_count,
        0 if [16, 24, 32].contains(&bit_count) => 0,
        0 => return decode_error("meta (bmp): invalid bit count"),
        // BI_RLE8 = 0x1, and BI_RLE4 = 0x2 (run-length encoded color table indicies)
        1 => 1 << 8,
        2 => 1 << 4,
        _ => return unsupported_error("meta (bmp): compression is unsupported"),
    };

    Ok(ImageInfo {
        media_type: "image/bmp",
        width,
        height,
        bits_per_pixel: bit_count,
        indexed_colors,
    })
}

/// Parse a GIF for image information.
fn parse_gif(mut reader: BufReader<'_>) -> Result<ImageInfo> {
    let width = reader.read_u16()?;
    let height = reader.read_u16()?;
    // Flags specify if a global color table (GCT) is used, and its size.
    let flags = reader.read_u8()?;

    if flags & 0x80 == 0 {
        return unsupported_error("meta (gif): local color tables are unsupported");
    }

    // GCT is enabled. The lower flag bits indicate the bits per pixel.
    let bpp = u32::from(flags & 0x7) + 1;

    Ok(ImageInfo {
        media_type: "image/gif",
        width: u32::from(width),
        height: u32::from(height),
        bits_per_pixel: bpp,
        indexed_colors: 1 << bpp,
    })
}
