use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use bytechomp::error::ChompError;
use bytechomp::{compiled, plan_to_json, to_json, ByteOrder, Reader};

mod sqlite;

use sqlite::SqliteHeader;

#[derive(Parser)]
#[command(name = "bchomp")]
#[command(about = "Decode fixed binary records and inspect their layouts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode the header of a SQLite database file to JSON (printed to stdout)
    SqliteHeader {
        /// Input SQLite database file
        #[arg(short, long)]
        input: PathBuf,

        /// Byte order of the header fields
        #[arg(short, long, value_enum, default_value_t = Order::Big)]
        byte_order: Order,
    },

    /// Print the compiled plan and packed layout of a built-in record
    Layout {
        #[arg(short, long, value_enum)]
        record: Known,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Native,
    Big,
    Little,
}

impl From<Order> for ByteOrder {
    fn from(order: Order) -> ByteOrder {
        match order {
            Order::Native => ByteOrder::Native,
            Order::Big => ByteOrder::Big,
            Order::Little => ByteOrder::Little,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Known {
    SqliteHeader,
}

fn main() -> Result<(), ChompError> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::SqliteHeader { input, byte_order } => {
            let mut reader = Reader::<SqliteHeader>::new((*byte_order).into()).allocate()?;
            let mut file = File::open(input)?;

            // Feed small chunks until the reader has a whole header
            let mut chunk = [0u8; 16];
            while !reader.is_complete() {
                let read = file.read(&mut chunk)?;
                if read == 0 {
                    break;
                }
                reader.feed(&chunk[..read])?;
            }

            let header = reader.build_value()?.ok_or_else(|| {
                ChompError::DecodeError(format!(
                    "{} is shorter than a SQLite header ({} of {} bytes)",
                    input.display(),
                    reader.buffered_len(),
                    reader.record_size().unwrap_or_default()
                ))
            })?;
            if header.get("header").map(|magic| magic.as_bytes()) != Some(&sqlite::MAGIC[..]) {
                eprintln!("warning: {} does not start with the SQLite magic string", input.display());
            }
            println!("{}", to_json(&header)?);
            Ok(())
        }

        Commands::Layout { record } => {
            match record {
                Known::SqliteHeader => {
                    let compiled = compiled::<SqliteHeader>()?;
                    let layout = &compiled.layout;
                    println!("pattern: {}", layout.pattern(ByteOrder::Big));
                    println!("size:    {} bytes", layout.size);
                    println!("{}", plan_to_json::<SqliteHeader>()?);
                }
            }
            Ok(())
        }
    }
}
