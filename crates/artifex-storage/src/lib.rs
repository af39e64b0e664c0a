// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem blob store.
//!
//! Artifacts are laid out as `<root>/<item-id>/<kind>/<index>.<ext>`, with
//! the extension derived from the image MIME type. Bytes are stored decoded
//! on disk and re-encoded to base64 on load, so the directory doubles as a
//! browsable export of everything the engine has produced.

mod fs_store;

pub use fs_store::FsBlobStore;
