// Tagmap
// Copyright (c) 2026 The Tagmap Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `meta` module defines the canonical metadata schema shared by all tag format handlers.
//!
//! A tag format handler translates the fields of its format into a [`MetadataDictionary`], a
//! mapping from a closed set of canonical [`MetadataKey`]s to typed [`Value`]s, and appends any
//! embedded images to a list of [`AttachedPicture`]s.

use std::borrow::Cow;
use std::fmt;

use hashbrown::HashMap;

/// Limit defines how a metadata reader should handle resource allocation when the amount of that
/// resource to be allocated is dictated by untrusted data. Limits are used to prevent
/// denial-of-service attacks whereby the data requests the reader to allocate large amounts of a
/// resource, usually memory. A limit will place an upper-bound on this allocation at the risk of
/// breaking potentially valid metadata.
///
/// All limits can be defaulted to a reasonable value specific to the situation. These defaults will
/// generally not break any normal metadata.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Limit {
    /// Do not impose any limit.
    None,
    /// Use the (reasonable) default specified by the reader.
    Default,
    /// Specify the upper limit of the resource. Units are use-case specific.
    Maximum(usize),
}

impl Limit {
    /// Gets the numeric limit of the limit, or default value. If there is no limit, None is
    /// returned.
    pub fn limit_or_default(&self, default: usize) -> Option<usize> {
        match self {
            Limit::None => None,
            Limit::Default => Some(default),
            Limit::Maximum(max) => Some(*max),
        }
    }
}

/// `MetadataOptions` is a common set of options that all metadata readers use.
#[derive(Copy, Clone, Debug)]
pub struct MetadataOptions {
    /// The maximum size limit in bytes that a single tag (comment) may occupy. Tags exceeding
    /// this limit will be skipped by the reader.
    pub limit_metadata_bytes: Limit,

    /// The maximum size limit in bytes that a visual (picture) may occupy.
    pub limit_visual_bytes: Limit,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        MetadataOptions { limit_metadata_bytes: Limit::Default, limit_visual_bytes: Limit::Default }
    }
}

/// `MetadataKey` is the closed enumeration of canonical metadata keys.
///
/// Keys are independent of the source tag format. A tag format handler maps the fields it
/// recognizes to one of these keys, and collects every other field into the
/// [`MetadataKey::AdditionalMetadata`] sub-dictionary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataKey {
    // Basic metadata.
    Title,
    AlbumTitle,
    Artist,
    AlbumArtist,
    Genre,
    Composer,
    ReleaseDate,
    Compilation,
    TrackNumber,
    TrackTotal,
    DiscNumber,
    DiscTotal,
    Lyrics,
    Bpm,
    Rating,
    Comment,
    Isrc,
    Mcn,
    MusicBrainzReleaseId,
    MusicBrainzRecordingId,
    // Sorting dictionary.
    TitleSortOrder,
    AlbumTitleSortOrder,
    ArtistSortOrder,
    AlbumArtistSortOrder,
    ComposerSortOrder,
    // Grouping dictionary.
    Grouping,
    // ReplayGain dictionary.
    ReferenceLoudness,
    TrackGain,
    TrackPeak,
    AlbumGain,
    AlbumPeak,
    /// Reserved key for the nested dictionary of fields without a canonical key.
    AdditionalMetadata,
}

/// The nested dictionary stored under [`MetadataKey::AdditionalMetadata`]. Keys are the original,
/// case-preserved, field names.
pub type AdditionalMetadata = HashMap<String, String>;

/// A `MetadataDictionary` value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A boolean value.
    Boolean(bool),
    /// A floating point number.
    Float(f64),
    /// A signed integer.
    SignedInt(i64),
    /// A string.
    String(String),
    /// A nested dictionary of string values.
    Dictionary(AdditionalMetadata),
}

macro_rules! impl_from_for_value {
    ($value:ident, $from:ty, $conv:expr) => {
        impl From<$from> for Value {
            fn from($value: $from) -> Self {
                $conv
            }
        }
    };
}

impl_from_for_value!(v, bool, Value::Boolean(v));
impl_from_for_value!(v, f32, Value::Float(f64::from(v)));
impl_from_for_value!(v, f64, Value::Float(v));
impl_from_for_value!(v, i32, Value::SignedInt(i64::from(v)));
impl_from_for_value!(v, i64, Value::SignedInt(v));
impl_from_for_value!(v, u32, Value::SignedInt(i64::from(v)));
impl_from_for_value!(v, &str, Value::String(String::from(v)));
impl_from_for_value!(v, String, Value::String(v));
impl_from_for_value!(v, Cow<'_, str>, Value::String(String::from(v)));
impl_from_for_value!(v, AdditionalMetadata, Value::Dictionary(v));

impl Value {
    /// Gets the value as a string slice if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Gets the value as an integer if it is a signed integer.
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Value::SignedInt(int) => Some(int),
            _ => None,
        }
    }

    /// Gets the value as a float if it is a floating point number.
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Value::Float(float) => Some(float),
            _ => None,
        }
    }

    /// Gets the value as a boolean if it is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Boolean(boolean) => Some(boolean),
            _ => None,
        }
    }

    /// Gets the value as a nested dictionary if it is one.
    pub fn as_dictionary(&self) -> Option<&AdditionalMetadata> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Implement default formatters for each type.
        match self {
            Value::Boolean(boolean) => fmt::Display::fmt(boolean, f),
            Value::Float(float) => fmt::Display::fmt(float, f),
            Value::SignedInt(int) => fmt::Display::fmt(int, f),
            Value::String(ref string) => fmt::Display::fmt(string, f),
            Value::Dictionary(ref dict) => {
                // Sort the entries so the output is stable.
                let mut entries = dict.iter().collect::<Vec<_>>();
                entries.sort();

                f.write_str("{")?;
                for (i, (key, value)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// `MetadataDictionary` maps canonical metadata keys to values.
///
/// Each key holds at most one value. Inserting a value for a key that already has one replaces
/// it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataDictionary {
    entries: HashMap<MetadataKey, Value>,
}

impl MetadataDictionary {
    /// Instantiate a new, empty, `MetadataDictionary`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the value of a key, returning the previous value if there was one.
    pub fn insert<V: Into<Value>>(&mut self, key: MetadataKey, value: V) -> Option<Value> {
        self.entries.insert(key, value.into())
    }

    /// Gets the value of a key.
    pub fn get(&self, key: MetadataKey) -> Option<&Value> {
        self.entries.get(&key)
    }

    /// Removes a key, returning its value if there was one.
    pub fn remove(&mut self, key: MetadataKey) -> Option<Value> {
        self.entries.remove(&key)
    }

    /// Returns `true` if the key has a value.
    pub fn contains_key(&self, key: MetadataKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Gets the nested dictionary of fields without a canonical key, if present.
    pub fn additional_metadata(&self) -> Option<&AdditionalMetadata> {
        self.get(MetadataKey::AdditionalMetadata).and_then(Value::as_dictionary)
    }

    /// Gets the number of keys with a value.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no key has a value.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all key-value pairs in an arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (MetadataKey, &Value)> + '_ {
        self.entries.iter().map(|(key, value)| (*key, value))
    }
}

/// The type of an attached picture.
///
/// The numeric value of each type is that of the ID3v2 APIC frame picture type, which is shared
/// by the FLAC picture block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PictureType {
    Other,
    FileIcon,
    OtherFileIcon,
    FrontCover,
    BackCover,
    LeafletPage,
    Media,
    LeadArtist,
    Artist,
    Conductor,
    Band,
    Composer,
    Lyricist,
    RecordingLocation,
    DuringRecording,
    DuringPerformance,
    MovieScreenCapture,
    ColouredFish,
    Illustration,
    BandLogotype,
    PublisherLogotype,
    /// A picture type number with no assigned meaning. The number is preserved.
    Unknown(u32),
}

impl PictureType {
    /// Gets the APIC picture type number.
    pub fn as_u32(&self) -> u32 {
        match *self {
            PictureType::Other => 0x00,
            PictureType::FileIcon => 0x01,
            PictureType::OtherFileIcon => 0x02,
            PictureType::FrontCover => 0x03,
            PictureType::BackCover => 0x04,
            PictureType::LeafletPage => 0x05,
            PictureType::Media => 0x06,
            PictureType::LeadArtist => 0x07,
            PictureType::Artist => 0x08,
            PictureType::Conductor => 0x09,
            PictureType::Band => 0x0a,
            PictureType::Composer => 0x0b,
            PictureType::Lyricist => 0x0c,
            PictureType::RecordingLocation => 0x0d,
            PictureType::DuringRecording => 0x0e,
            PictureType::DuringPerformance => 0x0f,
            PictureType::MovieScreenCapture => 0x10,
            PictureType::ColouredFish => 0x11,
            PictureType::Illustration => 0x12,
            PictureType::BandLogotype => 0x13,
            PictureType::PublisherLogotype => 0x14,
            PictureType::Unknown(num) => num,
        }
    }
}

impl From<u32> for PictureType {
    fn from(apic: u32) -> Self {
        match apic {
            0x00 => PictureType::Other,
            0x01 => PictureType::FileIcon,
            0x02 => PictureType::OtherFileIcon,
            0x03 => PictureType::FrontCover,
            0x04 => PictureType::BackCover,
            0x05 => PictureType::LeafletPage,
            0x06 => PictureType::Media,
            0x07 => PictureType::LeadArtist,
            0x08 => PictureType::Artist,
            0x09 => PictureType::Conductor,
            0x0a => PictureType::Band,
            0x0b => PictureType::Composer,
            0x0c => PictureType::Lyricist,
            0x0d => PictureType::RecordingLocation,
            0x0e => PictureType::DuringRecording,
            0x0f => PictureType::DuringPerformance,
            0x10 => PictureType::MovieScreenCapture,
            0x11 => PictureType::ColouredFish,
            0x12 => PictureType::Illustration,
            0x13 => PictureType::BandLogotype,
            0x14 => PictureType::PublisherLogotype,
            _ => PictureType::Unknown(apic),
        }
    }
}

/// An `AttachedPicture` is an image embedded in the metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct AttachedPicture {
    /// The encoded image data.
    pub data: Box<[u8]>,
    /// The type of the picture.
    pub picture_type: PictureType,
    /// An optional textual description of the picture. Never an empty string.
    pub description: Option<String>,
}

impl AttachedPicture {
    /// Instantiate a new `AttachedPicture`. An empty description is stored as no description.
    pub fn new<D: Into<Box<[u8]>>>(
        data: D,
        picture_type: PictureType,
        description: Option<String>,
    ) -> Self {
        AttachedPicture {
            data: data.into(),
            picture_type,
            description: description.filter(|desc| !desc.is_empty()),
        }
    }
}
