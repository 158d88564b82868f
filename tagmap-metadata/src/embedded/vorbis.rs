// Tagmap
// Copyright (c) 2026 The Tagmap Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vorbis Comment (Xiph comment) reading, writing, and mapping.
//!
//! A Vorbis Comment is a list of `NAME=value` pairs. Names are case-insensitive, and a name may
//! appear more than once. [`XiphComment`] holds the comments grouped by name, and
//! [`add_xiph_comment_to_dictionary`] maps them into a [`MetadataDictionary`] and a list of
//! [`AttachedPicture`]s.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::{debug, warn};
use smallvec::{smallvec, SmallVec};

use tagmap_core::errors::{decode_error, Result};
use tagmap_core::io::{BufReader, ReadBytes};
use tagmap_core::meta::{
    AdditionalMetadata, AttachedPicture, MetadataDictionary, MetadataKey, MetadataOptions,
};

use crate::embedded::flac::{self, FlacPicture};
use crate::utils::base64;
use crate::utils::std_tag::*;

/// The default maximum size in bytes of a single comment.
pub const DEFAULT_COMMENT_LIMIT_BYTES: usize = 1024 * 1024;

/// The field name of a Base64 encoded FLAC picture block.
const PICTURE_FIELD_NAME: &str = "METADATA_BLOCK_PICTURE";

/// Returns `true` if `name` is a field name that is read back unchanged after it is written: not
/// empty, and without `=` or control characters.
fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('=') && !name.chars().any(char::is_control)
}

lazy_static! {
    static ref VORBIS_COMMENT_MAP: FieldActionMap = {
        use Coercion::*;
        use FieldAction::*;
        use MetadataKey::*;

        let mut m: FieldActionMap = HashMap::new();

        m.insert("album"                        , Store(AlbumTitle, String));
        m.insert("albumartist"                  , Store(AlbumArtist, String));
        m.insert("albumartistsort"              , Store(AlbumArtistSortOrder, String));
        m.insert("albumtitlesort"               , Store(AlbumTitleSortOrder, String));
        m.insert("artist"                       , Store(Artist, String));
        m.insert("artistsort"                   , Store(ArtistSortOrder, String));
        m.insert("bpm"                          , Store(Bpm, Integer));
        m.insert("compilation"                  , Store(Compilation, Boolean));
        m.insert("composer"                     , Store(Composer, String));
        m.insert("composersort"                 , Store(ComposerSortOrder, String));
        m.insert("date"                         , Store(ReleaseDate, String));
        m.insert("description"                  , Store(Comment, String));
        m.insert("discnumber"                   , Store(DiscNumber, Integer));
        m.insert("disctotal"                    , Store(DiscTotal, Integer));
        m.insert("genre"                        , Store(Genre, String));
        m.insert("grouping"                     , Store(Grouping, String));
        m.insert("isrc"                         , Store(Isrc, String));
        m.insert("lyrics"                       , Store(Lyrics, String));
        m.insert("mcn"                          , Store(Mcn, String));
        m.insert("metadata_block_picture"       , Picture);
        m.insert("musicbrainz_albumid"          , Store(MusicBrainzReleaseId, String));
        m.insert("musicbrainz_trackid"          , Store(MusicBrainzRecordingId, String));
        m.insert("rating"                       , Store(Rating, Integer));
        m.insert("replaygain_album_gain"        , Store(AlbumGain, Double));
        m.insert("replaygain_album_peak"        , Store(AlbumPeak, Double));
        m.insert("replaygain_reference_loudness", Store(ReferenceLoudness, Double));
        m.insert("replaygain_track_gain"        , Store(TrackGain, Double));
        m.insert("replaygain_track_peak"        , Store(TrackPeak, Double));
        m.insert("title"                        , Store(Title, String));
        m.insert("titlesort"                    , Store(TitleSortOrder, String));
        m.insert("tracknumber"                  , Store(TrackNumber, Integer));
        m.insert("tracktotal"                   , Store(TrackTotal, Integer));
        m
    };
}

/// Gets the Vorbis Comment field name a canonical key is written under.
fn vorbis_field_name(key: MetadataKey) -> Option<&'static str> {
    use MetadataKey::*;

    let name = match key {
        Title => "TITLE",
        AlbumTitle => "ALBUM",
        Artist => "ARTIST",
        AlbumArtist => "ALBUMARTIST",
        Genre => "GENRE",
        Composer => "COMPOSER",
        ReleaseDate => "DATE",
        Compilation => "COMPILATION",
        TrackNumber => "TRACKNUMBER",
        TrackTotal => "TRACKTOTAL",
        DiscNumber => "DISCNUMBER",
        DiscTotal => "DISCTOTAL",
        Lyrics => "LYRICS",
        Bpm => "BPM",
        Rating => "RATING",
        Comment => "DESCRIPTION",
        Isrc => "ISRC",
        Mcn => "MCN",
        MusicBrainzReleaseId => "MUSICBRAINZ_ALBUMID",
        MusicBrainzRecordingId => "MUSICBRAINZ_TRACKID",
        TitleSortOrder => "TITLESORT",
        AlbumTitleSortOrder => "ALBUMTITLESORT",
        ArtistSortOrder => "ARTISTSORT",
        AlbumArtistSortOrder => "ALBUMARTISTSORT",
        ComposerSortOrder => "COMPOSERSORT",
        Grouping => "GROUPING",
        ReferenceLoudness => "REPLAYGAIN_REFERENCE_LOUDNESS",
        TrackGain => "REPLAYGAIN_TRACK_GAIN",
        TrackPeak => "REPLAYGAIN_TRACK_PEAK",
        AlbumGain => "REPLAYGAIN_ALBUM_GAIN",
        AlbumPeak => "REPLAYGAIN_ALBUM_PEAK",
        MetadataKey::AdditionalMetadata => return None,
    };

    Some(name)
}

/// A field of a Xiph comment: a name, and one or more values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XiphField {
    name: String,
    values: SmallVec<[String; 1]>,
}

impl XiphField {
    /// Gets the name of the field, as first spelled.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets all values of the field in the order they were added. Never empty.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Gets the first value of the field.
    pub fn first_value(&self) -> &str {
        &self.values[0]
    }
}

/// A Xiph comment: a vendor string, and an ordered list of fields.
///
/// Fields are kept in the order their names first appeared. Field names are compared
/// case-insensitively, so adding a value under `"artist"` to a comment that already has an
/// `"ARTIST"` field appends the value to that field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XiphComment {
    vendor: String,
    fields: Vec<XiphField>,
}

impl XiphComment {
    /// Instantiate a new, empty, `XiphComment`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Instantiate a new, empty, `XiphComment` with a vendor string.
    pub fn with_vendor<S: Into<String>>(vendor: S) -> Self {
        XiphComment { vendor: vendor.into(), fields: Vec::new() }
    }

    /// Gets the vendor string.
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Add a value to a field, creating the field if necessary.
    ///
    /// The name should not be empty, nor contain `=` or control characters. Otherwise, the field
    /// is skipped when the comment is read back.
    pub fn add_field<N, V>(&mut self, name: N, value: V)
    where
        N: AsRef<str> + Into<String>,
        V: Into<String>,
    {
        let existing =
            self.fields.iter_mut().find(|field| field.name.eq_ignore_ascii_case(name.as_ref()));

        match existing {
            Some(field) => field.values.push(value.into()),
            None => {
                self.fields.push(XiphField { name: name.into(), values: smallvec![value.into()] })
            }
        }
    }

    /// Gets the values of a field by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
            .map(XiphField::values)
    }

    /// Remove a field by case-insensitive name. Returns `true` if the field existed.
    pub fn remove_field(&mut self, name: &str) -> bool {
        let len = self.fields.len();
        self.fields.retain(|field| !field.name.eq_ignore_ascii_case(name));
        self.fields.len() != len
    }

    /// Gets all fields.
    pub fn fields(&self) -> &[XiphField] {
        &self.fields
    }

    /// Gets the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Write the comment in the Vorbis Comment packet layout, excluding any framing, to `out`.
    ///
    /// Each value is written as a separate `NAME=value` comment.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.vendor.len() as u32).to_le_bytes());
        out.extend_from_slice(self.vendor.as_bytes());

        let num_comments: usize = self.fields.iter().map(|field| field.values.len()).sum();
        out.extend_from_slice(&(num_comments as u32).to_le_bytes());

        for field in &self.fields {
            for value in &field.values {
                let len = field.name.len() + 1 + value.len();

                out.extend_from_slice(&(len as u32).to_le_bytes());
                out.extend_from_slice(field.name.as_bytes());
                out.push(b'=');
                out.extend_from_slice(value.as_bytes());
            }
        }
    }
}

/// Parse the given Vorbis Comment into a key-value pair.
fn parse_vorbis_comment(buf: &[u8]) -> Result<(String, String)> {
    // Vorbis Comments are stored as <Key>=<Value> pairs. <Key> is nominally an ASCII identifier,
    // but is decoded as UTF-8 along with <Value>.
    //
    // Convert the entire comment into a UTF-8 string.
    let comment = String::from_utf8_lossy(buf);

    // Split the comment into key and value at the first '=' character.
    let Some((key, value)) = comment.split_once('=')
    else {
        return decode_error("meta (vorbis): malformed comment");
    };

    // The key is kept as-is, or the comment is rejected.
    if !is_valid_field_name(key) {
        return decode_error("meta (vorbis): comment key is empty or has control characters");
    }

    Ok((key.to_string(), value.to_string()))
}

/// Read a Vorbis Comment packet, excluding any framing, into a `XiphComment`.
///
/// Malformed comments, and comments exceeding the limits set in `options`, are skipped. Comments
/// with the `METADATA_BLOCK_PICTURE` key are subject to the visual size limit, all others to the
/// metadata size limit.
pub fn read_vorbis_comment<B: ReadBytes>(
    reader: &mut B,
    options: &MetadataOptions,
) -> Result<XiphComment> {
    let tag_limit = options.limit_metadata_bytes.limit_or_default(DEFAULT_COMMENT_LIMIT_BYTES);
    let visual_limit =
        options.limit_visual_bytes.limit_or_default(flac::DEFAULT_VISUAL_LIMIT_BYTES);

    // The picture comment is only known after it has been read, so the largest of the limits
    // applies while reading.
    let read_limit = match (tag_limit, visual_limit) {
        (Some(tag_limit), Some(visual_limit)) => Some(tag_limit.max(visual_limit)),
        _ => None,
    };

    let exceeds = |len: usize, limit: Option<usize>| limit.is_some_and(|limit| len > limit);

    // Read the vendor string.
    let vendor_len = reader.read_u32()? as usize;

    let vendor = if exceeds(vendor_len, tag_limit) {
        warn!("meta (vorbis): vendor string exceeds the metadata size limit");
        reader.ignore_bytes(vendor_len as u64)?;
        String::new()
    }
    else {
        String::from_utf8_lossy(&reader.read_boxed_slice_exact(vendor_len)?).into_owned()
    };

    let mut comment = XiphComment::with_vendor(vendor);

    // Read the number of comments.
    let num_comments = reader.read_u32()?;

    debug!("reading {} vorbis comments", num_comments);

    // Read each comment.
    for _ in 0..num_comments {
        // Read the comment string length in bytes.
        let comment_len = reader.read_u32()? as usize;

        if exceeds(comment_len, read_limit) {
            warn!("meta (vorbis): skipping comment of {} bytes, exceeds size limit", comment_len);
            reader.ignore_bytes(comment_len as u64)?;
            continue;
        }

        // Read the comment string.
        let comment_data = reader.read_boxed_slice_exact(comment_len)?;

        match parse_vorbis_comment(&comment_data) {
            Ok((key, value)) => {
                let limit = match key.eq_ignore_ascii_case(PICTURE_FIELD_NAME) {
                    true => visual_limit,
                    false => tag_limit,
                };

                if exceeds(comment_len, limit) {
                    warn!("meta (vorbis): skipping {} comment, exceeds size limit", key);
                    continue;
                }

                comment.add_field(key, value);
            }
            Err(err) => warn!("{}", err),
        }
    }

    Ok(comment)
}

/// Parse a string containing a base64 encoded FLAC picture block into an attached picture.
fn parse_base64_picture_block(b64: &str, options: &MetadataOptions) -> Result<AttachedPicture> {
    // Decode the Base64 encoded FLAC metadata block.
    let Some(data) = base64::decode(b64)
    else {
        return decode_error("meta (vorbis): the base64 encoding of a picture block is invalid");
    };

    flac::read_flac_picture_block(&mut BufReader::new(&data), options).map(AttachedPicture::from)
}

/// Map the fields of a Xiph comment into a metadata dictionary and a list of attached pictures.
///
/// Returns `false`, without modifying `dictionary` or `pictures`, if either `dictionary` or
/// `comment` is `None`. Otherwise, the comment is mapped as per [`map_xiph_comment`] using the
/// default [`MetadataOptions`], and `true` is returned.
pub fn add_xiph_comment_to_dictionary(
    dictionary: Option<&mut MetadataDictionary>,
    pictures: &mut Vec<AttachedPicture>,
    comment: Option<&XiphComment>,
) -> bool {
    match (dictionary, comment) {
        (Some(dictionary), Some(comment)) => {
            map_xiph_comment(dictionary, pictures, comment, &Default::default());
            true
        }
        _ => false,
    }
}

/// Map the fields of a Xiph comment into a metadata dictionary and a list of attached pictures.
///
/// Field names are matched case-insensitively against the canonical Vorbis Comment fields. For
/// each recognized field, only the first value is coerced and stored under the field's canonical
/// key. Every value of a `METADATA_BLOCK_PICTURE` field is decoded, and appended to `pictures` in
/// order. A picture that cannot be decoded is skipped. All unrecognized fields are collected, by
/// their original name and first value, into a nested dictionary that is stored under
/// [`MetadataKey::AdditionalMetadata`] if it is not empty.
pub fn map_xiph_comment(
    dictionary: &mut MetadataDictionary,
    pictures: &mut Vec<AttachedPicture>,
    comment: &XiphComment,
    options: &MetadataOptions,
) {
    let mut additional = AdditionalMetadata::new();

    for field in comment.fields() {
        // Vorbis allows multiple values for one field, but the canonical schema holds one value
        // per key. Only the first value is used.
        let value = field.first_value();

        match VORBIS_COMMENT_MAP.get(field.name().to_ascii_lowercase().as_str()) {
            Some(FieldAction::Store(key, coercion)) => {
                dictionary.insert(*key, coerce(value, *coercion));
            }
            Some(FieldAction::Picture) => {
                for b64 in field.values() {
                    match parse_base64_picture_block(b64, options) {
                        Ok(picture) => pictures.push(picture),
                        Err(err) => warn!("meta (vorbis): skipping picture, {}", err),
                    }
                }
            }
            None => {
                additional.insert(field.name().to_string(), value.to_string());
            }
        }
    }

    if !additional.is_empty() {
        dictionary.insert(MetadataKey::AdditionalMetadata, additional);
    }
}

/// Create a Xiph comment from a metadata dictionary and a list of attached pictures.
///
/// This is the reverse of [`map_xiph_comment`]. Canonical keys are written under their Vorbis
/// Comment field names in key order, followed by the additional metadata sorted by name, and
/// finally one Base64 encoded `METADATA_BLOCK_PICTURE` value per picture.
///
/// Additional metadata is skipped if its name is not a valid field name, is a known Vorbis
/// Comment field name, or case-insensitively equals the name of another additional metadata
/// field.
pub fn dictionary_to_xiph_comment(
    dictionary: &MetadataDictionary,
    pictures: &[AttachedPicture],
    vendor: &str,
) -> XiphComment {
    let mut comment = XiphComment::with_vendor(vendor);

    let mut entries = dictionary.iter().collect::<Vec<_>>();
    entries.sort_by_key(|(key, _)| *key);

    for (key, value) in entries {
        if let Some(name) = vorbis_field_name(key) {
            comment.add_field(name, format_value(value));
        }
    }

    if let Some(additional) = dictionary.additional_metadata() {
        let mut additional = additional.iter().collect::<Vec<_>>();
        additional.sort();

        for (name, value) in additional {
            // Skip names that would be merged into another field, or not be read back at all.
            let is_known = VORBIS_COMMENT_MAP.contains_key(name.to_ascii_lowercase().as_str());

            if !is_valid_field_name(name) || is_known || comment.get(name).is_some() {
                warn!("meta (vorbis): skipping additional metadata field {:?}", name);
                continue;
            }

            comment.add_field(name.as_str(), value.as_str());
        }
    }

    for picture in pictures {
        let mut block = Vec::new();
        FlacPicture::from(picture).write_to(&mut block);

        comment.add_field(PICTURE_FIELD_NAME, base64::encode(&block));
    }

    comment
}
