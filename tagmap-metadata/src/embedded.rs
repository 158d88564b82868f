// Tagmap
// Copyright (c) 2026 The Tagmap Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reading, writing, and mapping of metadata formats that are embedded into other containers.

#[cfg(feature = "flac")]
pub mod flac;
#[cfg(feature = "vorbis")]
pub mod vorbis;
