// Tagmap
// Copyright (c) 2026 The Tagmap Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! This crate implements readers for metadata formats that are embedded into another container,
//! and the mapping of their fields into the canonical metadata schema defined by
//! [`tagmap_core::meta`].
//!
//! # Embedded Metadata Formats
//!
//! An embedded metadata format is one that is embedded into the media container. This crate
//! implements reading, writing, and mapping functions for these metadata formats in the
//! [`embedded`] module.

pub mod embedded;
pub mod utils;
