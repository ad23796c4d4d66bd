use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;
use crate::value::ValueType;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode values and print their wire bytes.
    Encode(EncodeArgs),
    /// Decode back-to-back records and print each one.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Wire type of every value.
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub ty: ValueType,
    /// Values to encode, written back-to-back.
    #[arg(required = true, allow_hyphen_values = true)]
    pub values: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Wire type of every record.
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub ty: ValueType,
    /// Encoded input as hex. Whitespace is ignored.
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read encoded input from file. Stdin is used when neither source is given.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,
    /// Stop after N records.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
