// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for XZZ PCB decoding.
 *  Copyright (C) 2026  The xzzpcb developers
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Reasons a decode can fail. The first error anywhere in the pipeline
/// aborts the whole decode; a malformed file never yields a partially
/// populated board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A length or offset taken from the file would require reading past
    /// the end of the buffer. All lengths are untrusted, so every
    /// multi-byte read is checked before it happens.
    #[error(
        "truncated file: read of {needed} bytes at offset {offset:#x} exceeds buffer length {available:#x}"
    )]
    Truncated { offset: usize, needed: usize, available: usize },

    /// Neither the supplied key nor the built-in default satisfies the
    /// per-byte parity mask.
    #[error("invalid XZZ PCB key: {key:#018x}")]
    InvalidKey { key: u64 },

    /// A part block did not start with the mandatory 0x06 label
    /// sub-block carrying the part name.
    #[error(
        "part block at offset {offset:#x} is missing its name sub-block (found tag {found:#04x})"
    )]
    MissingNameSubBlock { offset: usize, found: u8 },

    /// A net record declared a total length shorter than its own 8-byte
    /// header.
    #[error("net record at offset {offset:#x} declares impossible length {length}")]
    NetRecordTooShort { offset: usize, length: u32 },
}
