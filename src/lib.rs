// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Decoder and parser library for XZZ PCB boardview files.
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
 * # `xzzpcb` Crate
 *
 * A library for decoding and parsing XZZ PCB boardview files.
 *
 * This crate provides a full pipeline for working with the proprietary
 * XZZ PCB format:
 *
 * 1. [decoder]: Validates the key and removes the XOR scrambling.
 * 2. [parser]: Walks the typed-block container into structured records,
 *    DES-decrypting part blocks along the way.
 * 3. [board]: Normalizes coordinates into a usable board model.
 *
 * ## Usage Example
 *
 * ```no_run
 * use xzzpcb::board::BoardModel;
 * use xzzpcb::decoder::DecodedXzzPcbFile;
 * use xzzpcb::parser::ParsedXzzPcbFile;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Read the file
 *     let raw = std::fs::read("example.pcb")?;
 *
 *     // Descramble the file
 *     let decoded = DecodedXzzPcbFile::from_bytes(raw, None)?;
 *
 *     // Parse the container
 *     let parsed = ParsedXzzPcbFile::from_decoded(&decoded)?;
 *
 *     // Normalize coordinates
 *     let board = BoardModel::from_parsed(parsed);
 *
 *     // Access parts and pins
 *     for part in &board.parts {
 *         println!("Part: {}", part.name);
 *     }
 *     for pin in &board.pins {
 *         println!("  Pin: {} at ({}, {})", pin.name, pin.pos.x, pin.pos.y);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

pub mod board;
pub mod crypto;
pub mod decoder;
pub mod error;
pub mod geometry;
pub mod parser;
