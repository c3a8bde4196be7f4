// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/parser.rs - Container and record parser for XZZ PCB files.
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
 * # `parser` Module
 *
 * Second stage of the pipeline: walks the typed-block container of a
 * descrambled XZZ PCB file and collects parts, pins, and board-outline
 * geometry.
 *
 * ## Usage Example
 *
 * ```no_run
 * use xzzpcb::decoder::DecodedXzzPcbFile;
 * use xzzpcb::parser::ParsedXzzPcbFile;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let raw = std::fs::read("example.pcb")?;
 *
 *     // Descramble the file
 *     let decoded = DecodedXzzPcbFile::from_bytes(raw, None)?;
 *
 *     // Parse the container
 *     let parsed = ParsedXzzPcbFile::from_decoded(&decoded)?;
 *
 *     for pin in &parsed.pins {
 *         println!("Pin: {} on net {:?}", pin.name, pin.net);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use std::collections::HashMap;

use tracing::warn;

use crate::crypto;
use crate::decoder::DecodedXzzPcbFile;
use crate::error::{DecodeError, Result};
use crate::geometry::{self, OutlineSegment, Point};

/// Fixed divisor converting on-disk integer coordinates to display units.
///
/// Arc and line-segment blocks carry a scale field of their own, but the
/// field is read and then ignored by design: every known file stores the
/// same value and the original renderer hardcodes it too.
pub const GLOBAL_SCALE: u32 = 10_000;

// Layers:
// 1->16 Trace layers (used in order, excluding the last which is always 16)
// 17 Silkscreen
// 18->27 Unknown
// 28 Board edges
const BOARD_EDGE_LAYER: u32 = 28;

/// Prefix put in front of test-pad part names so downstream consumers
/// classify them as test pads.
pub const TEST_PAD_PREFIX: &str = "...";

/// Net name given to pins whose net table entry is the `"NC"` sentinel.
pub const UNCONNECTED_NET: &str = "UNCONNECTED";

const HEADER_BASE: usize = 0x20;
const MAIN_DATA_OFFSET_POS: usize = 0x20;
const NET_DATA_OFFSET_POS: usize = 0x28;

/// Top-level block types of the main data region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockType {
    Arc,
    Via,
    LineSegment,
    Text,
    Part,
    TestPad,
    Unknown(u8),
}

impl From<u8> for BlockType {
    fn from(tag: u8) -> Self {
        match tag {
            0x01 => Self::Arc,
            0x02 => Self::Via,
            0x05 => Self::LineSegment,
            0x06 => Self::Text,
            0x07 => Self::Part,
            0x09 => Self::TestPad,
            other => Self::Unknown(other),
        }
    }
}

/// Sub-block types inside a decrypted part block. This is a separate
/// namespace from [`BlockType`]: tag 0x09 means "pin" here but "test pad"
/// at the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartSubBlockType {
    Padding,
    Reserved,
    LineSegment,
    Label,
    Pin,
    Unknown(u8),
}

impl From<u8> for PartSubBlockType {
    fn from(tag: u8) -> Self {
        match tag {
            0x00 => Self::Padding,
            0x01 => Self::Reserved,
            0x05 => Self::LineSegment,
            0x06 => Self::Label,
            0x09 => Self::Pin,
            other => Self::Unknown(other),
        }
    }
}

/// Bounds-checked reader over a byte buffer.
///
/// Every multi-byte read goes through [`Cursor::take`], which fails with
/// [`DecodeError::Truncated`] before touching memory past the end of the
/// buffer. Seeking and skipping never fail on their own; a cursor moved
/// out of bounds fails on the next read.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n);
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.buf.len()).ok_or(
            DecodeError::Truncated { offset: self.pos, needed: n, available: self.buf.len() },
        )?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a length-prefixed string (`u32` length, then that many bytes).
    fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()?;
        let bytes = self.take(len as usize)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Mapping from net index to net name, built once from the net data
/// region and read-only afterwards.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NetTable {
    nets: HashMap<u32, String>,
}

impl NetTable {
    /// Parses the net data payload: a flat sequence of records, each a
    /// `u32` total length, a `u32` net index, and `length - 8` bytes of
    /// name. A duplicate index overwrites the earlier entry.
    fn from_bytes(buf: &[u8]) -> Result<Self> {
        let mut nets = HashMap::new();

        let mut cursor = Cursor::new(buf);
        while cursor.position() < buf.len() {
            let offset = cursor.position();
            let net_size = cursor.read_u32()?;
            let net_index = cursor.read_u32()?;

            let name_len = (net_size as usize)
                .checked_sub(8)
                .ok_or(DecodeError::NetRecordTooShort { offset, length: net_size })?;
            let name = cursor.take(name_len)?;
            nets.insert(net_index, String::from_utf8_lossy(name).into_owned());
        }

        Ok(Self { nets })
    }

    /// Looks up a net name by index.
    pub fn name(&self, index: u32) -> Option<&str> {
        self.nets.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }
}

/// Side of the board a pin or part sits on. The XZZ format only ever
/// describes the top side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Top,
}

/// Part kind. Everything in this format is surface-mounted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PartType {
    #[default]
    Smd,
}

/// A pin or pad position with its resolved net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    /// Position in display units (translated by the board stage).
    pub pos: Point,
    /// Display name of the pin.
    pub name: String,
    /// Resolved net name. Empty when the net index is absent from the
    /// net table, or for test pads whose net is the not-connected
    /// sentinel.
    pub net: String,
    pub side: Side,
    /// One-based index of the owning part.
    pub part: usize,
}

/// A component or synthetic test-pad part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Display name. Test pads are prefixed with [`TEST_PAD_PREFIX`].
    pub name: String,
    pub mounting_side: Side,
    pub part_type: PartType,
    /// Pin-table size at the time this part was completed; together with
    /// the previous part's value this bounds the half-open range of pins
    /// owned by this part.
    pub end_of_pins: usize,
}

/// Parsed content of a descrambled XZZ PCB file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedXzzPcbFile {
    /// Parts in encounter order.
    pub parts: Vec<Part>,
    /// Pins in encounter order, each linked to its part by index.
    pub pins: Vec<Pin>,
    /// Board-outline segments (layer 28), untranslated.
    pub outline_segments: Vec<OutlineSegment>,
    /// The net lookup table.
    pub nets: NetTable,
}

impl ParsedXzzPcbFile {
    /// Parses the container of a descrambled file.
    ///
    /// Reads the region offsets from the header, builds the net table,
    /// then walks the main data region dispatching each typed block to
    /// its record decoder. The first error aborts the parse.
    pub fn from_decoded(decoded: &DecodedXzzPcbFile) -> Result<Self> {
        let buf = decoded.content.as_slice();

        let mut header = Cursor::new(buf);
        header.seek(MAIN_DATA_OFFSET_POS);
        let main_data_offset = header.read_u32()?;
        header.seek(NET_DATA_OFFSET_POS);
        let net_data_offset = header.read_u32()?;

        let main_data_start = main_data_offset as usize + HEADER_BASE;
        let net_data_start = net_data_offset as usize + HEADER_BASE;

        let mut net_cursor = Cursor::new(buf);
        net_cursor.seek(net_data_start);
        let net_block_size = net_cursor.read_u32()?;
        let nets = NetTable::from_bytes(net_cursor.take(net_block_size as usize)?)?;

        let mut collector = BlockCollector {
            key: decoded.key,
            nets: &nets,
            parts: Vec::new(),
            pins: Vec::new(),
            outline_segments: Vec::new(),
        };
        collector.process_blocks(buf, main_data_start)?;

        Ok(Self {
            parts: collector.parts,
            pins: collector.pins,
            outline_segments: collector.outline_segments,
            nets,
        })
    }
}

/// Accumulates records while walking the main data region.
struct BlockCollector<'a> {
    key: u64,
    nets: &'a NetTable,
    parts: Vec<Part>,
    pins: Vec<Pin>,
    outline_segments: Vec<OutlineSegment>,
}

impl BlockCollector<'_> {
    /// Walks the type/length/payload blocks of the main data region.
    fn process_blocks(&mut self, buf: &[u8], main_data_start: usize) -> Result<()> {
        let mut cursor = Cursor::new(buf);
        cursor.seek(main_data_start);
        let blocks_size = cursor.read_u32()?;

        let end = main_data_start + 4 + blocks_size as usize;
        if buf.len() < end {
            return Err(DecodeError::Truncated {
                offset: main_data_start + 4,
                needed: blocks_size as usize,
                available: buf.len(),
            });
        }

        while cursor.position() < end {
            let block_type = BlockType::from(cursor.read_u8()?);
            let block_size = cursor.read_u32()?;
            let payload = cursor.take(block_size as usize)?;
            self.process_block(block_type, payload)?;
        }

        Ok(())
    }

    fn process_block(&mut self, block_type: BlockType, payload: &[u8]) -> Result<()> {
        match block_type {
            BlockType::Arc => self.parse_arc_block(payload)?,
            BlockType::Via => {} // not part of the outline or connectivity model
            BlockType::LineSegment => self.parse_line_segment_block(payload)?,
            BlockType::Text => {} // cosmetic only
            BlockType::Part => self.parse_part_block(payload)?,
            BlockType::TestPad => self.parse_test_pad_block(payload)?,
            BlockType::Unknown(tag) => {
                warn!("unhandled block type: {tag:#04x}");
            }
        }
        Ok(())
    }

    /// Arc block: layer, center, radius, start/end angles, scale. Only
    /// board-edge arcs contribute geometry; other layers are read (the
    /// fields are untrusted and must still bounds-check) and discarded.
    fn parse_arc_block(&mut self, buf: &[u8]) -> Result<()> {
        let mut cursor = Cursor::new(buf);
        let layer = cursor.read_u32()?;
        let x = cursor.read_u32()?;
        let y = cursor.read_u32()?;
        let r = cursor.read_u32()?;
        let angle_start = cursor.read_u32()?;
        let angle_end = cursor.read_u32()?;
        let _scale = cursor.read_u32()?; // overridden by GLOBAL_SCALE

        if layer != BOARD_EDGE_LAYER {
            return Ok(());
        }

        let center = Point::new((x / GLOBAL_SCALE) as i32, (y / GLOBAL_SCALE) as i32);
        let segments = geometry::arc_to_segments(
            (angle_start / GLOBAL_SCALE) as i32,
            (angle_end / GLOBAL_SCALE) as i32,
            (r / GLOBAL_SCALE) as i32,
            center,
        );
        self.outline_segments.extend(segments);
        Ok(())
    }

    /// Line-segment block: layer, two endpoints, scale. A trailing net
    /// index exists in the format but is unused here.
    fn parse_line_segment_block(&mut self, buf: &[u8]) -> Result<()> {
        let mut cursor = Cursor::new(buf);
        let layer = cursor.read_u32()?;
        let x1 = cursor.read_u32()?;
        let y1 = cursor.read_u32()?;
        let x2 = cursor.read_u32()?;
        let y2 = cursor.read_u32()?;
        let _scale = cursor.read_u32()?; // overridden by GLOBAL_SCALE

        if layer != BOARD_EDGE_LAYER {
            return Ok(());
        }

        self.outline_segments.push(OutlineSegment {
            start: Point::new((x1 / GLOBAL_SCALE) as i32, (y1 / GLOBAL_SCALE) as i32),
            end: Point::new((x2 / GLOBAL_SCALE) as i32, (y2 / GLOBAL_SCALE) as i32),
        });
        Ok(())
    }

    /// Part block: the payload is DES-encrypted. The plaintext starts
    /// with a declared total size and a skipped group name, must continue
    /// with a 0x06 label sub-block carrying the part name, and then holds
    /// typed sub-blocks until the declared size is reached.
    fn parse_part_block(&mut self, encrypted: &[u8]) -> Result<()> {
        let buf = crypto::decrypt(encrypted, self.key);
        let mut cursor = Cursor::new(&buf);

        let part_size = cursor.read_u32()?;
        cursor.skip(18);
        let group_name_len = cursor.read_u32()?;
        cursor.skip(group_name_len as usize);

        // The label sub-block has always come first so far; it carries
        // the part name, which must be known before pins are attributed.
        let tag_offset = cursor.position();
        let tag = cursor.read_u8()?;
        if tag != 0x06 {
            return Err(DecodeError::MissingNameSubBlock { offset: tag_offset, found: tag });
        }

        // 31 reserved bytes, counted from the tag byte itself.
        cursor.seek(tag_offset + 31);
        let part_name = cursor.read_string()?;

        let end = part_size as usize + 4;
        if buf.len() < end {
            return Err(DecodeError::Truncated { offset: 0, needed: end, available: buf.len() });
        }

        while cursor.position() < end {
            let sub_offset = cursor.position();
            match PartSubBlockType::from(cursor.read_u8()?) {
                PartSubBlockType::Reserved
                | PartSubBlockType::LineSegment
                | PartSubBlockType::Label => {
                    let len = cursor.read_u32()?;
                    cursor.skip(len as usize);
                }
                PartSubBlockType::Pin => {
                    let mut pin = self.parse_pin_block(&mut cursor)?;
                    pin.part = self.parts.len() + 1;
                    self.pins.push(pin);
                }
                PartSubBlockType::Padding => {}
                PartSubBlockType::Unknown(tag) => {
                    warn!(
                        "unknown sub-block type {tag:#04x} at offset {sub_offset:#x} in part {part_name}"
                    );
                }
            }
        }

        self.parts.push(Part {
            name: part_name,
            mounting_side: Side::Top,
            part_type: PartType::Smd,
            end_of_pins: self.pins.len(),
        });
        Ok(())
    }

    /// Pin sub-block of a part. The declared size gives an absolute end
    /// offset used for resynchronization: trailing unknown fields are
    /// skipped by jumping there rather than parsed field by field.
    fn parse_pin_block(&self, cursor: &mut Cursor) -> Result<Pin> {
        let start = cursor.position();
        let pin_size = cursor.read_u32()?;
        let pin_end = start + pin_size as usize + 4;

        cursor.skip(4); // unknown
        let x = cursor.read_u32()?;
        let y = cursor.read_u32()?;
        cursor.skip(8); // unknown
        let name = cursor.read_string()?;
        cursor.skip(32); // reserved
        let net_index = cursor.read_u32()?;
        cursor.seek(pin_end);

        let net = match self.nets.name(net_index) {
            Some("NC") => UNCONNECTED_NET.to_string(),
            Some(net) => net.to_string(),
            // An index absent from the table resolves to an empty net.
            None => String::new(),
        };

        Ok(Pin {
            pos: Point::new((x / GLOBAL_SCALE) as i32, (y / GLOBAL_SCALE) as i32),
            name,
            net,
            side: Side::Top,
            part: 0, // fixed up by the caller
        })
    }

    /// Test-pad block, a top-level block despite sharing the 0x09 tag
    /// value with the pin sub-block namespace. Produces a synthetic
    /// one-pin part whose name carries the test-pad prefix.
    fn parse_test_pad_block(&mut self, buf: &[u8]) -> Result<()> {
        let mut cursor = Cursor::new(buf);
        let _pad_number = cursor.read_u32()?;
        let x = cursor.read_u32()?;
        let y = cursor.read_u32()?;
        cursor.skip(8); // inner diameter + unknown
        let name = cursor.read_string()?;

        // The net index sits in the last 4 bytes of the payload,
        // whatever lies in between.
        cursor.seek(buf.len() - 4);
        let net_index = cursor.read_u32()?;

        // A test pad is classified by its name prefix; a not-connected
        // net is left empty so consumers can tell the two apart.
        let net = match self.nets.name(net_index) {
            Some(UNCONNECTED_NET) | Some("NC") => String::new(),
            Some(net) => net.to_string(),
            None => String::new(),
        };

        let part_name = format!("{TEST_PAD_PREFIX}{name}");
        self.pins.push(Pin {
            pos: Point::new((x / GLOBAL_SCALE) as i32, (y / GLOBAL_SCALE) as i32),
            name,
            net,
            side: Side::Top,
            part: self.parts.len() + 1,
        });
        self.parts.push(Part {
            name: part_name,
            mounting_side: Side::Top,
            part_type: PartType::Smd,
            end_of_pins: self.pins.len(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DEFAULT_KEY;

    /// Builds a minimal file: header with magic and region offsets, a
    /// length-prefixed main data region, then a length-prefixed net data
    /// region.
    fn container(main_blocks: &[u8], net_records: &[u8]) -> Vec<u8> {
        let mut buf = vec![0u8; 0x30];
        buf[..6].copy_from_slice(b"XZZPCB");

        let main_start = buf.len();
        buf.extend_from_slice(&(main_blocks.len() as u32).to_le_bytes());
        buf.extend_from_slice(main_blocks);

        let net_start = buf.len();
        buf.extend_from_slice(&(net_records.len() as u32).to_le_bytes());
        buf.extend_from_slice(net_records);

        buf[MAIN_DATA_OFFSET_POS..MAIN_DATA_OFFSET_POS + 4]
            .copy_from_slice(&((main_start - HEADER_BASE) as u32).to_le_bytes());
        buf[NET_DATA_OFFSET_POS..NET_DATA_OFFSET_POS + 4]
            .copy_from_slice(&((net_start - HEADER_BASE) as u32).to_le_bytes());
        buf
    }

    fn block(tag: u8, payload: &[u8]) -> Vec<u8> {
        let mut buf = vec![tag];
        buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(payload);
        buf
    }

    fn line_block(layer: u32, x1: u32, y1: u32, x2: u32, y2: u32) -> Vec<u8> {
        let mut payload = Vec::new();
        for field in [layer, x1, y1, x2, y2, 1] {
            payload.extend_from_slice(&field.to_le_bytes());
        }
        block(0x05, &payload)
    }

    fn net_record(index: u32, name: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&((8 + name.len()) as u32).to_le_bytes());
        buf.extend_from_slice(&index.to_le_bytes());
        buf.extend_from_slice(name.as_bytes());
        buf
    }

    fn parse(main_blocks: &[u8], net_records: &[u8]) -> Result<ParsedXzzPcbFile> {
        let decoded =
            DecodedXzzPcbFile::from_bytes(container(main_blocks, net_records), None).unwrap();
        ParsedXzzPcbFile::from_decoded(&decoded)
    }

    /// Builds an encrypted part block with one pin sub-block.
    fn part_block(part_name: &str, pin_name: &str, x: u32, y: u32, net_index: u32) -> Vec<u8> {
        let mut plain = Vec::new();
        plain.extend_from_slice(&[0; 4]); // part_size, patched below
        plain.extend_from_slice(&[0; 18]); // reserved
        plain.extend_from_slice(&0u32.to_le_bytes()); // empty group name

        plain.push(0x06); // label sub-block
        plain.extend_from_slice(&[0; 30]); // reserved run
        plain.extend_from_slice(&(part_name.len() as u32).to_le_bytes());
        plain.extend_from_slice(part_name.as_bytes());

        plain.push(0x09); // pin sub-block
        let pin_size = 60 + pin_name.len() as u32;
        plain.extend_from_slice(&pin_size.to_le_bytes());
        plain.extend_from_slice(&[0; 4]); // unknown
        plain.extend_from_slice(&x.to_le_bytes());
        plain.extend_from_slice(&y.to_le_bytes());
        plain.extend_from_slice(&[0; 8]); // unknown
        plain.extend_from_slice(&(pin_name.len() as u32).to_le_bytes());
        plain.extend_from_slice(pin_name.as_bytes());
        plain.extend_from_slice(&[0; 32]); // reserved
        plain.extend_from_slice(&net_index.to_le_bytes());

        let part_size = (plain.len() - 4) as u32;
        plain[..4].copy_from_slice(&part_size.to_le_bytes());

        // Pad to a whole number of cipher blocks; the padding lies past
        // the declared size and is never parsed.
        while plain.len() % 8 != 0 {
            plain.push(0);
        }

        block(0x07, &crypto::encrypt(&plain, DEFAULT_KEY))
    }

    #[test]
    fn test_minimal_line_segment_board() {
        let main = line_block(28, 0, 0, 100 * GLOBAL_SCALE, 50 * GLOBAL_SCALE);
        let parsed = parse(&main, &[]).unwrap();

        assert_eq!(
            parsed.outline_segments,
            vec![OutlineSegment { start: Point::new(0, 0), end: Point::new(100, 50) }]
        );
        assert!(parsed.parts.is_empty());
        assert!(parsed.pins.is_empty());
        assert!(parsed.nets.is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let mut main = line_block(28, 10_000, 20_000, 30_000, 40_000);
        main.extend_from_slice(&part_block("U1", "1", 70_000, 80_000, 3));
        let nets = net_record(3, "GND");

        assert_eq!(parse(&main, &nets).unwrap(), parse(&main, &nets).unwrap());
    }

    #[test]
    fn test_non_edge_layers_discarded() {
        let mut main = line_block(17, 0, 0, 10_000, 10_000);
        main.extend_from_slice(&line_block(1, 0, 0, 10_000, 10_000));
        let parsed = parse(&main, &[]).unwrap();
        assert!(parsed.outline_segments.is_empty());
    }

    #[test]
    fn test_arc_block_tessellates_board_edge() {
        let mut payload = Vec::new();
        for field in [
            28,
            0,
            0,
            100 * GLOBAL_SCALE, // radius 100
            0,
            180 * GLOBAL_SCALE, // half circle
            1,
        ] {
            payload.extend_from_slice(&field.to_le_bytes());
        }
        let main = block(0x01, &payload);
        let parsed = parse(&main, &[]).unwrap();

        assert_eq!(parsed.outline_segments.len(), 9);
        let first = parsed.outline_segments.first().unwrap().start;
        let last = parsed.outline_segments.last().unwrap().end;
        assert!((first.x - 100).abs() <= 1 && first.y.abs() <= 1);
        assert!((last.x + 100).abs() <= 1 && last.y.abs() <= 1);
    }

    #[test]
    fn test_net_table_lookup_and_overwrite() {
        let mut nets = net_record(1, "VCC");
        nets.extend_from_slice(&net_record(2, "SDA"));
        nets.extend_from_slice(&net_record(1, "VBAT")); // overwrites index 1
        let parsed = parse(&[], &nets).unwrap();

        assert_eq!(parsed.nets.len(), 2);
        assert_eq!(parsed.nets.name(1), Some("VBAT"));
        assert_eq!(parsed.nets.name(2), Some("SDA"));
        assert_eq!(parsed.nets.name(7), None);
    }

    #[test]
    fn test_net_record_too_short() {
        let mut nets = Vec::new();
        nets.extend_from_slice(&4u32.to_le_bytes()); // length below the 8-byte header
        nets.extend_from_slice(&1u32.to_le_bytes());
        let err = parse(&[], &nets).unwrap_err();
        assert_eq!(err, DecodeError::NetRecordTooShort { offset: 0, length: 4 });
    }

    #[test]
    fn test_block_length_past_end_of_buffer() {
        // One block claiming far more payload than the file holds.
        let mut main = vec![0x05];
        main.extend_from_slice(&0xffff_u32.to_le_bytes());
        main.extend_from_slice(&[0; 8]);

        let err = parse(&main, &[]).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));
    }

    #[test]
    fn test_unknown_block_skipped() {
        let mut main = block(0x0c, &[0xaa; 12]);
        main.extend_from_slice(&line_block(28, 0, 0, 10_000, 0));
        let parsed = parse(&main, &[]).unwrap();
        // The unknown block is skipped; the line after it still parses.
        assert_eq!(parsed.outline_segments.len(), 1);
    }

    #[test]
    fn test_part_block_with_pin() {
        let main = part_block("U1", "1", 7 * GLOBAL_SCALE, 9 * GLOBAL_SCALE, 3);
        let nets = net_record(3, "GND");
        let parsed = parse(&main, &nets).unwrap();

        assert_eq!(parsed.parts.len(), 1);
        let part = &parsed.parts[0];
        assert_eq!(part.name, "U1");
        assert_eq!(part.part_type, PartType::Smd);
        assert_eq!(part.end_of_pins, 1);

        assert_eq!(parsed.pins.len(), 1);
        let pin = &parsed.pins[0];
        assert_eq!(pin.name, "1");
        assert_eq!(pin.net, "GND");
        assert_eq!(pin.pos, Point::new(7, 9));
        assert_eq!(pin.part, 1);
    }

    #[test]
    fn test_part_block_missing_label_sub_block() {
        let mut plain = Vec::new();
        plain.extend_from_slice(&64u32.to_le_bytes());
        plain.extend_from_slice(&[0; 18]);
        plain.extend_from_slice(&0u32.to_le_bytes());
        plain.push(0x07); // anything but the mandatory 0x06
        while plain.len() % 8 != 0 {
            plain.push(0);
        }
        let main = block(0x07, &crypto::encrypt(&plain, DEFAULT_KEY));

        let err = parse(&main, &[]).unwrap_err();
        assert_eq!(err, DecodeError::MissingNameSubBlock { offset: 26, found: 0x07 });
    }

    #[test]
    fn test_pin_net_sentinel_and_missing_index() {
        // "NC" maps to the UNCONNECTED sentinel.
        let main = part_block("U2", "A1", 0, 0, 5);
        let nets = net_record(5, "NC");
        let parsed = parse(&main, &nets).unwrap();
        assert_eq!(parsed.pins[0].net, UNCONNECTED_NET);

        // An index absent from the table resolves to an empty net.
        let main = part_block("U3", "A2", 0, 0, 99);
        let parsed = parse(&main, &[]).unwrap();
        assert_eq!(parsed.pins[0].net, "");
    }

    #[test]
    fn test_test_pad_block() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&17u32.to_le_bytes()); // pad number, unused
        payload.extend_from_slice(&(3 * GLOBAL_SCALE).to_le_bytes());
        payload.extend_from_slice(&(4 * GLOBAL_SCALE).to_le_bytes());
        payload.extend_from_slice(&[0; 8]); // inner diameter + unknown
        payload.extend_from_slice(&3u32.to_le_bytes());
        payload.extend_from_slice(b"TP1");
        payload.extend_from_slice(&[0xee; 5]); // ignored trailing fields
        payload.extend_from_slice(&9u32.to_le_bytes()); // net index, last 4 bytes
        let main = block(0x09, &payload);
        let nets = net_record(9, "SCL");

        let parsed = parse(&main, &nets).unwrap();
        assert_eq!(parsed.parts.len(), 1);
        assert_eq!(parsed.parts[0].name, "...TP1");
        assert_eq!(parsed.parts[0].end_of_pins, 1);
        assert_eq!(parsed.pins.len(), 1);
        assert_eq!(parsed.pins[0].name, "TP1");
        assert_eq!(parsed.pins[0].net, "SCL");
        assert_eq!(parsed.pins[0].pos, Point::new(3, 4));
        assert_eq!(parsed.pins[0].part, 1);
    }

    #[test]
    fn test_test_pad_not_connected_nets_are_empty() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&1u32.to_le_bytes());
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(&[0; 8]);
        payload.extend_from_slice(&3u32.to_le_bytes());
        payload.extend_from_slice(b"TP2");
        payload.extend_from_slice(&6u32.to_le_bytes());
        let main = block(0x09, &payload);
        let nets = net_record(6, "NC");

        let parsed = parse(&main, &nets).unwrap();
        assert_eq!(parsed.pins[0].net, "");
    }
}
