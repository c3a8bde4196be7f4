// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  boarddump.rs - Board model dump demo for XZZ PCB files.
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

use std::fs;

use clap::Parser;

use xzzpcb::board::*;
use xzzpcb::decoder::*;
use xzzpcb::parser::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to read.
    file: String,

    /// Override the built-in DES key (hexadecimal).
    #[arg(long, value_parser = parse_hex_key)]
    key: Option<u64>,
}

fn parse_hex_key(arg: &str) -> Result<u64, std::num::ParseIntError> {
    u64::from_str_radix(arg.trim_start_matches("0x"), 16)
}

fn main() {
    let args = Args::parse();

    let raw = match fs::read(&args.file) {
        Ok(raw) => raw,
        Err(error) => {
            eprintln!("Error opening file {:?}: {:?}", &args.file, error);
            return;
        }
    };

    let decoded = match DecodedXzzPcbFile::from_bytes(raw, args.key) {
        Ok(pf) => pf,
        Err(error) => {
            eprintln!("Error decoding file {:?}: {:?}", &args.file, error);
            return;
        }
    };

    let parsed = match ParsedXzzPcbFile::from_decoded(&decoded) {
        Ok(pf) => pf,
        Err(error) => {
            eprintln!("Error parsing file {:?}: {:?}", &args.file, error);
            return;
        }
    };

    let board = BoardModel::from_parsed(parsed);

    println!(
        "{}: {} parts, {} pins, {} outline segments",
        &args.file, board.num_parts, board.num_pins, board.num_segments
    );

    let mut start_of_pins = 0;
    for part in &board.parts {
        println!("{} ({:?}, {:?})", part.name, part.mounting_side, part.part_type);
        for pin in &board.pins[start_of_pins..part.end_of_pins] {
            println!("  {} at ({}, {}) on net {:?}", pin.name, pin.pos.x, pin.pos.y, pin.net);
        }
        start_of_pins = part.end_of_pins;
    }
}
