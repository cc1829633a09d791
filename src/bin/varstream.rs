//! varstream - inspect varints and typed value streams from the command line.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{Level, debug, warn};
use tracing_subscriber::EnvFilter;
use varstream::encoding::{VarintBuf, encode_varint64_into, zigzag};
use varstream::{Slot, parse_layout};

/// Inspect varint encodings and decode typed value streams.
#[derive(Parser, Debug)]
#[command(name = "varstream")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the varint encoding of each number
    Varint {
        /// Zigzag-transform the numbers before encoding
        #[arg(long)]
        signed: bool,

        /// Numbers to encode
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<String>,
    },
    /// Decode a file against a comma-separated slot layout (e.g. `bool,i32?,string`)
    Decode {
        /// Slot layout; a trailing `?` marks a nullable slot
        #[arg(short, long)]
        layout: String,

        /// Repeat the layout until the file is exhausted
        #[arg(long)]
        repeat: bool,

        /// File holding the encoded values
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    match cli.command {
        Command::Varint { signed, values } => print_varints(signed, &values),
        Command::Decode {
            layout,
            repeat,
            file,
        } => decode_file(&layout, repeat, &file),
    }
}

fn print_varints(signed: bool, values: &[String]) -> Result<()> {
    for text in values {
        let raw = if signed {
            let value: i64 = text
                .parse()
                .with_context(|| format!("`{text}` is not a signed 64-bit integer"))?;
            zigzag::encode64(value)
        } else {
            text.parse()
                .with_context(|| format!("`{text}` is not an unsigned 64-bit integer"))?
        };
        let mut buf = VarintBuf::new();
        let len = encode_varint64_into(raw, &mut buf);
        let hex: Vec<String> = buf.iter().map(|byte| format!("{byte:02x}")).collect();
        println!("{text:>20} -> {} ({len} bytes)", hex.join(" "));
    }
    Ok(())
}

fn decode_file(layout: &str, repeat: bool, path: &Path) -> Result<()> {
    let slots: Vec<Slot> = parse_layout(layout)?;
    if slots.is_empty() {
        bail!("layout `{layout}` has no slots");
    }
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let total = data.len() as u64;
    debug!(bytes = total, slots = slots.len(), "decoding");

    let mut cursor = Cursor::new(data);
    loop {
        for slot in &slots {
            let offset = cursor.position();
            let value = slot
                .read(&mut cursor)
                .with_context(|| format!("failed to decode `{slot}` at offset {offset}"))?;
            match value {
                Some(value) => println!("{offset:>8}  {:<12} {value}", slot.to_string()),
                None => println!("{offset:>8}  {:<12} null", slot.to_string()),
            }
        }
        if !repeat || cursor.position() >= total {
            break;
        }
    }

    let trailing = total.saturating_sub(cursor.position());
    if trailing > 0 {
        warn!(trailing, "bytes left after the last slot");
    }
    Ok(())
}
