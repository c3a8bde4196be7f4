// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/board.rs - Normalized board model built from parsed records.
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
 * # `board` Module
 *
 * Final stage of the pipeline: takes the parsed records and shifts all
 * coordinates into the first quadrant, so the minimum outline corner
 * lands on the origin.
 *
 * ## Usage Example
 *
 * ```no_run
 * use xzzpcb::board::BoardModel;
 * use xzzpcb::decoder::DecodedXzzPcbFile;
 * use xzzpcb::parser::ParsedXzzPcbFile;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let raw = std::fs::read("example.pcb")?;
 *     let decoded = DecodedXzzPcbFile::from_bytes(raw, None)?;
 *     let parsed = ParsedXzzPcbFile::from_decoded(&decoded)?;
 *     let board = BoardModel::from_parsed(parsed);
 *
 *     println!("{} parts, {} pins", board.num_parts, board.num_pins);
 *
 *     Ok(())
 * }
 * ```
 */

use crate::geometry::{self, OutlineSegment};
use crate::parser::{ParsedXzzPcbFile, Part, Pin};

/// A board with origin-normalized coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardModel {
    pub parts: Vec<Part>,
    pub pins: Vec<Pin>,
    pub outline_segments: Vec<OutlineSegment>,
    pub num_parts: usize,
    pub num_pins: usize,
    pub num_segments: usize,
}

impl BoardModel {
    /// Normalizes coordinates of the parsed records.
    ///
    /// The translation is the minimum x and y over the outline
    /// endpoints; the outline is assumed to enclose every pin. An empty
    /// outline leaves coordinates untouched.
    pub fn from_parsed(parsed: ParsedXzzPcbFile) -> Self {
        let ParsedXzzPcbFile { parts, mut pins, mut outline_segments, nets: _ } = parsed;

        let translation = geometry::find_translation(&outline_segments);
        geometry::translate_segments(&mut outline_segments, translation);
        for pin in &mut pins {
            pin.pos -= translation;
        }

        let num_parts = parts.len();
        let num_pins = pins.len();
        let num_segments = outline_segments.len();
        Self { parts, pins, outline_segments, num_parts, num_pins, num_segments }
    }
}
