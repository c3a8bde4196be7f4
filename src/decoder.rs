// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/decoder.rs - Descrambler and format probe for XZZ PCB files.
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

/*!
 * # `decoder` Module
 *
 * First stage of the pipeline: validates the decryption key and removes
 * the single-byte XOR scrambling applied to the head of the file.
 *
 * Scrambled files carry the XOR key at offset 0x10; the scrambled region
 * runs from the start of the file up to (but not including) the first
 * occurrence of the marker string `v6v6555v6v6`, or to the end of the
 * file if the marker is absent. Legacy files store a zero at offset 0x10
 * and need no transform.
 */

use crate::crypto;
use crate::error::{DecodeError, Result};

/// The magic value at offset 0, possibly XOR-scrambled on disk.
pub const MAGIC: &[u8; 6] = b"XZZPCB";

/// Offset of the single-byte XOR key in the file header.
const XOR_KEY_OFFSET: usize = 0x10;

/// Marker string that ends the scrambled region.
const SCRAMBLE_END_MARKER: &[u8; 11] = b"v6v6555v6v6";

/// A descrambled XZZ PCB file, ready for container parsing.
#[derive(Debug)]
pub struct DecodedXzzPcbFile {
    /// The whole file with the XOR scrambling removed.
    pub content: Vec<u8>,
    /// The validated DES key for part blocks.
    pub key: u64,
}

impl DecodedXzzPcbFile {
    /// Checks whether a buffer looks like an XZZ PCB file, in either the
    /// plain or the scrambled variant, without decoding it.
    pub fn verify_format(buf: &[u8]) -> bool {
        if buf.len() < 6 {
            return false;
        }

        if &buf[..6] == MAGIC {
            return true;
        }

        if buf.len() > XOR_KEY_OFFSET && buf[XOR_KEY_OFFSET] != 0x00 {
            let xor_key = buf[XOR_KEY_OFFSET];
            let mut head = [0u8; 6];
            for (out, &b) in head.iter_mut().zip(&buf[..6]) {
                *out = b ^ xor_key;
            }
            return &head == MAGIC;
        }

        false
    }

    /// Descrambles a raw file buffer.
    ///
    /// `key` overrides the built-in DES key; an override that fails the
    /// parity check falls back to the built-in key, and if that also
    /// fails the decode is rejected. The buffer is taken by value and
    /// descrambled in place.
    pub fn from_bytes(mut buf: Vec<u8>, key: Option<u64>) -> Result<Self> {
        let key = match key {
            Some(candidate) if crypto::key_is_valid(candidate) => candidate,
            candidate => {
                if !crypto::key_is_valid(crypto::DEFAULT_KEY) {
                    return Err(DecodeError::InvalidKey { key: candidate.unwrap_or(0) });
                }
                crypto::DEFAULT_KEY
            }
        };

        if buf.len() <= XOR_KEY_OFFSET {
            return Err(DecodeError::Truncated {
                offset: XOR_KEY_OFFSET,
                needed: 1,
                available: buf.len(),
            });
        }

        if buf[XOR_KEY_OFFSET] != 0x00 {
            let xor_key = buf[XOR_KEY_OFFSET];
            let end = buf
                .windows(SCRAMBLE_END_MARKER.len())
                .position(|window| window == SCRAMBLE_END_MARKER)
                .unwrap_or(buf.len());
            for b in &mut buf[..end] {
                *b ^= xor_key;
            }
        }

        Ok(Self { content: buf, key })
    }
}
