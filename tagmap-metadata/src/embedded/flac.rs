// Tagmap
// Copyright (c) 2026 The Tagmap Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! FLAC picture metadata block reading and writing.
//!
//! The picture block is also the payload of the `METADATA_BLOCK_PICTURE` Vorbis comment, where
//! it is Base64 encoded.

use log::debug;

use tagmap_core::errors::{decode_error, limit_error, Result};
use tagmap_core::io::{FiniteStream, ReadBytes};
use tagmap_core::meta::{AttachedPicture, MetadataOptions, PictureType};

use crate::utils::images::try_get_image_info;

/// The default maximum size in bytes of the image data of a picture.
pub const DEFAULT_VISUAL_LIMIT_BYTES: usize = 16 * 1024 * 1024;

/// A FLAC picture metadata block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlacPicture {
    /// The APIC picture type number.
    pub picture_type: u32,
    /// The Media Type (MIME Type) of the image data. May be empty.
    pub media_type: String,
    /// The description of the picture. May be empty.
    pub description: String,
    /// The width of the picture in pixels, or 0 if unknown.
    pub width: u32,
    /// The height of the picture in pixels, or 0 if unknown.
    pub height: u32,
    /// The color depth of the picture in bits-per-pixel, or 0 if unknown.
    pub color_depth: u32,
    /// The number of colors used for indexed-color pictures, or 0 for non-indexed pictures.
    pub indexed_colors: u32,
    /// The image data.
    pub data: Box<[u8]>,
}

impl FlacPicture {
    /// Write the picture block, excluding the metadata block header, to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        let write_buf = |out: &mut Vec<u8>, buf: &[u8]| {
            out.extend_from_slice(&(buf.len() as u32).to_be_bytes());
            out.extend_from_slice(buf);
        };

        out.extend_from_slice(&self.picture_type.to_be_bytes());
        write_buf(out, self.media_type.as_bytes());
        write_buf(out, self.description.as_bytes());
        out.extend_from_slice(&self.width.to_be_bytes());
        out.extend_from_slice(&self.height.to_be_bytes());
        out.extend_from_slice(&self.color_depth.to_be_bytes());
        out.extend_from_slice(&self.indexed_colors.to_be_bytes());
        write_buf(out, &self.data);
    }
}

impl From<FlacPicture> for AttachedPicture {
    fn from(picture: FlacPicture) -> Self {
        AttachedPicture::new(
            picture.data,
            PictureType::from(picture.picture_type),
            Some(picture.description),
        )
    }
}

impl From<&AttachedPicture> for FlacPicture {
    /// Create a picture block from an attached picture. The media type, dimensions, and colors
    /// are detected from the image data, and left empty or zero if the format is not recognized.
    fn from(picture: &AttachedPicture) -> Self {
        let info = try_get_image_info(&picture.data);

        FlacPicture {
            picture_type: picture.picture_type.as_u32(),
            media_type: info.as_ref().map(|info| info.media_type.to_string()).unwrap_or_default(),
            description: picture.description.clone().unwrap_or_default(),
            width: info.as_ref().map_or(0, |info| info.width),
            height: info.as_ref().map_or(0, |info| info.height),
            color_depth: info.as_ref().map_or(0, |info| info.bits_per_pixel),
            indexed_colors: info.as_ref().map_or(0, |info| info.indexed_colors),
            data: picture.data.clone(),
        }
    }
}

/// Converts a string of bytes to an ASCII string if all characters are within the printable ASCII
/// range. If a null byte is encounted, the string terminates at that point.
fn printable_ascii_to_string(bytes: &[u8]) -> Option<String> {
    let mut result = String::with_capacity(bytes.len());

    for c in bytes {
        match c {
            0x00 => break,
            0x20..=0x7e => result.push(char::from(*c)),
            _ => return None,
        }
    }

    Some(result)
}

/// Read the length of a variable length field, and validate it against the remaining length of
/// the block.
fn read_field_len<B: ReadBytes + FiniteStream>(reader: &mut B) -> Result<usize> {
    let len = reader.read_be_u32()?;

    if u64::from(len) > reader.bytes_available() {
        return decode_error("meta (flac): picture field length exceeds block length");
    }

    Ok(len as usize)
}

/// Read a picture metadata block.
pub fn read_flac_picture_block<B: ReadBytes + FiniteStream>(
    reader: &mut B,
    options: &MetadataOptions,
) -> Result<FlacPicture> {
    let picture_type = reader.read_be_u32()?;

    // Read the Media Type bytes.
    let media_type_len = read_field_len(reader)?;
    let media_type_buf = reader.read_boxed_slice_exact(media_type_len)?;

    // Convert Media Type bytes to an ASCII string. Non-printable ASCII characters are invalid.
    let Some(media_type) = printable_ascii_to_string(&media_type_buf)
    else {
        return decode_error("meta (flac): picture mime-type contains invalid characters");
    };

    // Read the description bytes, and convert them to a UTF-8 string.
    let desc_len = read_field_len(reader)?;
    let desc_buf = reader.read_boxed_slice_exact(desc_len)?;
    let description = String::from_utf8_lossy(&desc_buf).into_owned();

    // Read the width, height, bits-per-pixel, and number of indexed colors of the visual.
    let width = reader.read_be_u32()?;
    let height = reader.read_be_u32()?;
    let color_depth = reader.read_be_u32()?;
    let indexed_colors = reader.read_be_u32()?;

    // Read the image data.
    let data_len = read_field_len(reader)?;

    if let Some(limit) = options.limit_visual_bytes.limit_or_default(DEFAULT_VISUAL_LIMIT_BYTES) {
        if data_len > limit {
            debug!("picture data is {} bytes, limit is {} bytes", data_len, limit);
            return limit_error("meta (flac): picture exceeds the visual size limit");
        }
    }

    let data = reader.read_boxed_slice_exact(data_len)?;

    Ok(FlacPicture {
        picture_type,
        media_type,
        description,
        width,
        height,
        color_depth,
        indexed_colors,
        data,
    })
}

#[cfg(test)]
mod tests {
    use tagmap_core::errors::Error;
    use tagmap_core::io::BufReader;
    use tagmap_core::meta::Limit;

    use super::*;

    fn front_cover() -> FlacPicture {
        FlacPicture {
            picture_type: 3,
            media_type: "image/jpeg".to_string(),
            description: "Cover".to_string(),
            width: 500,
            height: 500,
            color_depth: 24,
            indexed_colors: 0,
            data: Box::new([0xff, 0xd8, 0xff, 0xd9]),
        }
    }

    #[test]
    fn verify_read_picture_block() {
        let mut buf = Vec::new();
        front_cover().write_to(&mut buf);

        // Type, two length-prefixed strings, four integers, and the length-prefixed data.
        assert_eq!(buf.len(), 4 + (4 + 10) + (4 + 5) + 16 + (4 + 4));

        let picture =
            read_flac_picture_block(&mut BufReader::new(&buf), &Default::default()).unwrap();

        assert_eq!(picture, front_cover());
    }

    #[test]
    fn verify_read_truncated_picture_block() {
        let mut buf = Vec::new();
        front_cover().write_to(&mut buf);

        for len in [0, 3, 8, 20, buf.len() - 1] {
            let mut reader = BufReader::new(&buf[..len]);
            let result = read_flac_picture_block(&mut reader, &Default::default());
            assert!(result.is_err(), "truncated at {} bytes", len);
        }
    }

    #[test]
    fn verify_read_picture_block_with_bad_lengths() {
        // Picture type, then a media type length far beyond the end of the block.
        let mut buf = Vec::new();
        buf.extend_from_slice(&3u32.to_be_bytes());
        buf.extend_from_slice(&u32::MAX.to_be_bytes());

        match read_flac_picture_block(&mut BufReader::new(&buf), &Default::default()) {
            Err(Error::DecodeError(_)) => (),
            _ => panic!("expected a decode error"),
        }

        // Non-printable media type.
        let mut picture = front_cover();
        picture.media_type = "image/\u{7f}".to_string();

        let mut buf = Vec::new();
        picture.write_to(&mut buf);

        assert!(read_flac_picture_block(&mut BufReader::new(&buf), &Default::default()).is_err());
    }

    #[test]
    fn verify_picture_limit() {
        let mut buf = Vec::new();
        front_cover().write_to(&mut buf);

        let options =
            MetadataOptions { limit_visual_bytes: Limit::Maximum(3), ..Default::default() };

        match read_flac_picture_block(&mut BufReader::new(&buf), &options) {
            Err(Error::LimitError(_)) => (),
            _ => panic!("expected a limit error"),
        }

        let options =
            MetadataOptions { limit_visual_bytes: Limit::Maximum(4), ..Default::default() };

        assert!(read_flac_picture_block(&mut BufReader::new(&buf), &options).is_ok());
    }

    #[test]
    fn verify_attached_picture_conversion() {
        let attached = AttachedPicture::from(front_cover());

        assert_eq!(attached.picture_type, PictureType::FrontCover);
        assert_eq!(attached.description.as_deref(), Some("Cover"));
        assert_eq!(attached.data.as_ref(), &[0xff, 0xd8, 0xff, 0xd9]);

        // The JPEG above has no frame header, so no image information can be detected.
        let block = FlacPicture::from(&attached);

        assert_eq!(block.picture_type, 3);
        assert_eq!(block.media_type, "");
        assert_eq!(block.description, "Cover");
        assert_eq!((block.width, block.height), (0, 0));

        let mut no_desc = front_cover();
        no_desc.description.clear();

        assert!(AttachedPicture::from(no_desc).description.is_none());
    }
}
