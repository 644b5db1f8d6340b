// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use log::{error, info, warn};
use sh2_core::core::cpu::{FileTracer, Sh2};
use sh2_core::core::error::Result;
use sh2_core::core::memory::RamBus;
use sh2_core::core::Sh2Config;
use std::path::PathBuf;

/// Run a raw SH-2 memory image on a single core
#[derive(Parser)]
#[command(name = "sh2-run")]
#[command(about = "Hitachi SH-2 interpreter", long_about = None)]
struct Args {
    /// Big-endian memory image (vector table at address 0 unless --entry is given)
    image: PathBuf,

    /// Address the image is loaded at
    #[arg(short = 'l', long, default_value = "0", value_parser = parse_address)]
    load_address: u32,

    /// Start execution here instead of the reset vector
    #[arg(short = 'e', long, value_parser = parse_address)]
    entry: Option<u32>,

    /// Initial stack pointer when --entry is given
    #[arg(long, value_parser = parse_address)]
    stack: Option<u32>,

    /// Size of the emulated external memory in bytes
    #[arg(short = 'm', long, default_value = "0x1000000", value_parser = parse_address)]
    memory_size: u32,

    /// Number of cycles to execute
    #[arg(short = 'n', long, default_value = "1000000")]
    cycles: u64,

    /// Write an execution trace to this file
    #[arg(short = 't', long)]
    trace: Option<PathBuf>,

    /// Core configuration (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Save the final state to this file
    #[arg(short = 's', long)]
    save_state: Option<PathBuf>,

    /// Print the final registers as JSON
    #[arg(long)]
    json: bool,
}

/// Parse a decimal or 0x-prefixed hexadecimal number
fn parse_address(value: &str) -> std::result::Result<u32, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{}': {}", value, e))
}

fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("sh2-run v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Sh2Config::load(path)?
        }
        None => Sh2Config::default(),
    };

    let image = std::fs::read(&args.image).map_err(|e| {
        error!("Failed to read image {}: {}", args.image.display(), e);
        e
    })?;

    let mut bus = RamBus::new(args.memory_size as usize);
    bus.load(args.load_address, &image)?;
    info!(
        "Loaded {} bytes at 0x{:08X} ({} bytes of memory)",
        image.len(),
        args.load_address,
        bus.size()
    );

    let mut cpu = Sh2::new(config);
    if let Some(path) = &args.trace {
        info!("Tracing to: {}", path.display());
        cpu.set_tracer(Box::new(FileTracer::new(path)?));
    }

    cpu.reset(&mut bus, true);
    if let Some(entry) = args.entry {
        cpu.set_pc(entry);
        match args.stack {
            Some(stack) => cpu.set_reg(15, stack),
            None => warn!("--entry given without --stack; SP taken from the vector table"),
        }
    }

    let executed = cpu.advance(&mut bus, args.cycles);

    info!("Executed {} cycles", executed);
    info!("Final PC: 0x{:08X}", cpu.pc());
    if cpu.is_sleeping() {
        info!("Core is sleeping");
    }

    // Dropping the tracer flushes the trace file
    drop(cpu.take_tracer());

    if let Some(path) = &args.save_state {
        cpu.save_state("sh2-run").save_to_file(path)?;
        info!("Saved state to: {}", path.display());
    }

    if args.json {
        match serde_json::to_string_pretty(&cpu.register_dump()) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize registers: {}", e),
        }
    } else {
        cpu.dump_registers();
    }

    Ok(())
}
