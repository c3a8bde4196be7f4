// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  probe.rs - Format probe demo for XZZ PCB files.
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
use std::process::ExitCode;

use clap::Parser;

use xzzpcb::decoder::DecodedXzzPcbFile;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The files to probe.
    files: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut all_recognized = true;
    for file in &args.files {
        let raw = match fs::read(file) {
            Ok(raw) => raw,
            Err(error) => {
                eprintln!("Error opening file {:?}: {:?}", file, error);
                all_recognized = false;
                continue;
            }
        };

        if DecodedXzzPcbFile::verify_format(&raw) {
            println!("{}: XZZ PCB", file);
        } else {
            println!("{}: not an XZZ PCB file", file);
            all_recognized = false;
        }
    }

    if all_recognized { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
