// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/crypto.rs - DES block cipher and key material for XZZ PCB files.
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

//! DES as used by the XZZ PCB format: part blocks are encrypted in ECB
//! mode with the 8 bytes of every block in reversed order, keyed by a
//! 64-bit key that must satisfy a fixed per-byte parity mask.

/// Built-in fallback key, used when the caller supplies no key or an
/// invalid one. Satisfies [`key_is_valid`].
pub const DEFAULT_KEY: u64 = 0x573c_c3aa_9955_33c6;

/// Expected complemented-parity per key byte, indexed from the
/// least-significant byte.
const KEY_PARITY: [u8; 8] = [1, 1, 1, 1, 1, 1, 1, 0];

/// Checks a candidate key against the format's parity mask.
///
/// For each byte of the key, the XOR-fold of its bits is complemented and
/// compared against the expected parity vector; all 8 bytes must match.
pub fn key_is_valid(key: u64) -> bool {
    KEY_PARITY.iter().enumerate().all(|(i, &expected)| {
        let mut b = (key >> (i * 8)) as u8;
        b ^= b >> 4;
        b ^= b >> 2;
        b ^= b >> 1;
        (!b) & 1 == expected
    })
}

const INITIAL_PERMUTATION: [u8; 64] = [
    58, 50, 42, 34, 26, 18, 10, 2, 60, 52, 44, 36, 28, 20, 12, 4, //
    62, 54, 46, 38, 30, 22, 14, 6, 64, 56, 48, 40, 32, 24, 16, 8, //
    57, 49, 41, 33, 25, 17, 9, 1, 59, 51, 43, 35, 27, 19, 11, 3, //
    61, 53, 45, 37, 29, 21, 13, 5, 63, 55, 47, 39, 31, 23, 15, 7,
];

const FINAL_PERMUTATION: [u8; 64] = [
    40, 8, 48, 16, 56, 24, 64, 32, 39, 7, 47, 15, 55, 23, 63, 31, //
    38, 6, 46, 14, 54, 22, 62, 30, 37, 5, 45, 13, 53, 21, 61, 29, //
    36, 4, 44, 12, 52, 20, 60, 28, 35, 3, 43, 11, 51, 19, 59, 27, //
    34, 2, 42, 10, 50, 18, 58, 26, 33, 1, 41, 9, 49, 17, 57, 25,
];

const EXPANSION: [u8; 48] = [
    32, 1, 2, 3, 4, 5, 4, 5, 6, 7, 8, 9, //
    8, 9, 10, 11, 12, 13, 12, 13, 14, 15, 16, 17, //
    16, 17, 18, 19, 20, 21, 20, 21, 22, 23, 24, 25, //
    24, 25, 26, 27, 28, 29, 28, 29, 30, 31, 32, 1,
];

const ROUND_PERMUTATION: [u8; 32] = [
    16, 7, 20, 21, 29, 12, 28, 17, 1, 15, 23, 26, 5, 18, 31, 10, //
    2, 8, 24, 14, 32, 27, 3, 9, 19, 13, 30, 6, 22, 11, 4, 25,
];

const KEY_PERMUTATION_1: [u8; 56] = [
    57, 49, 41, 33, 25, 17, 9, 1, 58, 50, 42, 34, 26, 18, //
    10, 2, 59, 51, 43, 35, 27, 19, 11, 3, 60, 52, 44, 36, //
    63, 55, 47, 39, 31, 23, 15, 7, 62, 54, 46, 38, 30, 22, //
    14, 6, 61, 53, 45, 37, 29, 21, 13, 5, 28, 20, 12, 4,
];

const KEY_PERMUTATION_2: [u8; 48] = [
    14, 17, 11, 24, 1, 5, 3, 28, 15, 6, 21, 10, //
    23, 19, 12, 4, 26, 8, 16, 7, 27, 20, 13, 2, //
    41, 52, 31, 37, 47, 55, 30, 40, 51, 45, 33, 48, //
    44, 49, 39, 56, 34, 53, 46, 42, 50, 36, 29, 32,
];

const KEY_SHIFTS: [u32; 16] = [1, 1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1];

#[rustfmt::skip]
const SBOX: [[u8; 64]; 8] = [
    [
        14,  4, 13,  1,  2, 15, 11,  8,  3, 10,  6, 12,  5,  9,  0,  7,
         0, 15,  7,  4, 14,  2, 13,  1, 10,  6, 12, 11,  9,  5,  3,  8,
         4,  1, 14,  8, 13,  6,  2, 11, 15, 12,  9,  7,  3, 10,  5,  0,
        15, 12,  8,  2,  4,  9,  1,  7,  5, 11,  3, 14, 10,  0,  6, 13,
    ],
    [
        15,  1,  8, 14,  6, 11,  3,  4,  9,  7,  2, 13, 12,  0,  5, 10,
         3, 13,  4,  7, 15,  2,  8, 14, 12,  0,  1, 10,  6,  9, 11,  5,
         0, 14,  7, 11, 10,  4, 13,  1,  5,  8, 12,  6,  9,  3,  2, 15,
        13,  8, 10,  1,  3, 15,  4,  2, 11,  6,  7, 12,  0,  5, 14,  9,
    ],
    [
        10,  0,  9, 14,  6,  3, 15,  5,  1, 13, 12,  7, 11,  4,  2,  8,
        13,  7,  0,  9,  3,  4,  6, 10,  2,  8,  5, 14, 12, 11, 15,  1,
        13,  6,  4,  9,  8, 15,  3,  0, 11,  1,  2, 12,  5, 10, 14,  7,
         1, 10, 13,  0,  6,  9,  8,  7,  4, 15, 14,  3, 11,  5,  2, 12,
    ],
    [
         7, 13, 14,  3,  0,  6,  9, 10,  1,  2,  8,  5, 11, 12,  4, 15,
        13,  8, 11,  5,  6, 15,  0,  3,  4,  7,  2, 12,  1, 10, 14,  9,
        10,  6,  9,  0, 12, 11,  7, 13, 15,  1,  3, 14,  5,  2,  8,  4,
         3, 15,  0,  6, 10,  1, 13,  8,  9,  4,  5, 11, 12,  7,  2, 14,
    ],
    [
         2, 12,  4,  1,  7, 10, 11,  6,  8,  5,  3, 15, 13,  0, 14,  9,
        14, 11,  2, 12,  4,  7, 13,  1,  5,  0, 15, 10,  3,  9,  8,  6,
         4,  2,  1, 11, 10, 13,  7,  8, 15,  9, 12,  5,  6,  3,  0, 14,
        11,  8, 12,  7,  1, 14,  2, 13,  6, 15,  0,  9, 10,  4,  5,  3,
    ],
    [
        12,  1, 10, 15,  9,  2,  6,  8,  0, 13,  3,  4, 14,  7,  5, 11,
        10, 15,  4,  2,  7, 12,  9,  5,  6,  1, 13, 14,  0, 11,  3,  8,
         9, 14, 15,  5,  2,  8, 12,  3,  7,  0,  4, 10,  1, 13, 11,  6,
         4,  3,  2, 12,  9,  5, 15, 10, 11, 14,  1,  7,  6,  0,  8, 13,
    ],
    [
         4, 11,  2, 14, 15,  0,  8, 13,  3, 12,  9,  7,  5, 10,  6,  1,
        13,  0, 11,  7,  4,  9,  1, 10, 14,  3,  5, 12,  2, 15,  8,  6,
         1,  4, 11, 13, 12,  3,  7, 14, 10, 15,  6,  8,  0,  5,  9,  2,
         6, 11, 13,  8,  1,  4, 10,  7,  9,  5,  0, 15, 14,  2,  3, 12,
    ],
    [
        13,  2,  8,  4,  6, 15, 11,  1, 10,  9,  3, 14,  5,  0, 12,  7,
         1, 15, 13,  8, 10,  3,  7,  4, 12,  5,  6, 11,  0, 14,  9,  2,
         7, 11,  4,  1,  9, 12, 14,  2,  0,  6, 10, 13, 15,  3,  5,  8,
         2,  1, 14,  7,  4, 10,  8, 13, 15, 12,  9,  0,  3,  5,  6, 11,
    ],
];

/// Gathers the bits named by `table` (1-based, counted from the most
/// significant bit of a `width`-bit value) into a new value.
fn permute(value: u64, width: u32, table: &[u8]) -> u64 {
    let mut out = 0u64;
    for &src in table {
        out = (out << 1) | ((value >> (width - u32::from(src))) & 1);
    }
    out
}

/// Derives the 16 48-bit round subkeys, in encryption order.
fn subkeys(key: u64) -> [u64; 16] {
    let permuted = permute(key, 64, &KEY_PERMUTATION_1);
    let mut c = (permuted >> 28) & 0x0fff_ffff;
    let mut d = permuted & 0x0fff_ffff;

    let mut keys = [0u64; 16];
    for (round_key, &shift) in keys.iter_mut().zip(&KEY_SHIFTS) {
        c = ((c << shift) | (c >> (28 - shift))) & 0x0fff_ffff;
        d = ((d << shift) | (d >> (28 - shift))) & 0x0fff_ffff;
        *round_key = permute((c << 28) | d, 56, &KEY_PERMUTATION_2);
    }
    keys
}

fn feistel(half: u32, subkey: u64) -> u32 {
    let expanded = permute(u64::from(half), 32, &EXPANSION) ^ subkey;

    let mut substituted = 0u32;
    for (i, sbox) in SBOX.iter().enumerate() {
        let chunk = ((expanded >> (42 - 6 * i)) & 0x3f) as usize;
        let row = ((chunk >> 4) & 0x2) | (chunk & 0x1);
        let col = (chunk >> 1) & 0xf;
        substituted = (substituted << 4) | u32::from(sbox[row * 16 + col]);
    }

    permute(u64::from(substituted), 32, &ROUND_PERMUTATION) as u32
}

/// Runs one 64-bit block through the 16 Feistel rounds with the subkeys
/// in the given order (forward to encrypt, reversed to decrypt).
fn des_block(block: u64, keys: &[u64; 16]) -> u64 {
    let permuted = permute(block, 64, &INITIAL_PERMUTATION);
    let mut left = (permuted >> 32) as u32;
    let mut right = permuted as u32;

    for subkey in keys {
        let next = left ^ feistel(right, *subkey);
        left = right;
        right = next;
    }

    // The halves are swapped once more before the final permutation.
    permute((u64::from(right) << 32) | u64::from(left), 64, &FINAL_PERMUTATION)
}

/// Decrypts a part-block payload.
///
/// The buffer is processed in 8-byte blocks, each read into a `u64` in
/// reversed byte order, run through DES in decrypt mode, and written back
/// in reversed byte order. A trailing block shorter than 8 bytes is
/// processed over its available bytes only, with the missing tail treated
/// as zero; the format tolerates such truncation and so does this decoder.
pub fn decrypt(data: &[u8], key: u64) -> Vec<u8> {
    let mut keys = subkeys(key);
    keys.reverse();

    let mut result = Vec::with_capacity(data.len());
    for chunk in data.chunks(8) {
        let mut block = [0u8; 8];
        block[..chunk.len()].copy_from_slice(chunk);
        let output = des_block(u64::from_be_bytes(block), &keys);
        result.extend_from_slice(&output.to_be_bytes()[..chunk.len()]);
    }
    result
}

#[cfg(test)]
pub(crate) fn encrypt(data: &[u8], key: u64) -> Vec<u8> {
    let keys = subkeys(key);

    let mut result = Vec::with_capacity(data.len());
    for chunk in data.chunks(8) {
        let mut block = [0u8; 8];
        block[..chunk.len()].copy_from_slice(chunk);
        let output = des_block(u64::from_be_bytes(block), &keys);
        result.extend_from_slice(&output.to_be_bytes()[..chunk.len()]);
    }
    result
}
