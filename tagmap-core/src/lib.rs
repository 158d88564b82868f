// Tagmap
// Copyright (c) 2026 The Tagmap Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared types for the Tagmap metadata crates.
//!
//! This crate defines the canonical metadata schema ([`meta`]), the common error type
//! ([`errors`]), byte-level readers for untrusted buffers ([`io`]), and lenient text
//! conversions ([`util::text`]).

pub mod errors;
pub mod io;
pub mod meta;
pub mod util;
