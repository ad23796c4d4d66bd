use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

use crate::exit::{io_error, CliResult};
use crate::value::{display, ValueType};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    #[serde(rename = "type")]
    ty: &'a str,
    count: usize,
    size: usize,
    hex: String,
}

/// One decoded record and where it sat in the input.
#[derive(Debug, Serialize)]
pub struct Record {
    pub offset: u64,
    pub size: u64,
    #[serde(rename = "type")]
    pub ty: &'static str,
    pub value: Value,
}

pub fn print_encoded(
    ty: ValueType,
    count: usize,
    bytes: &[u8],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                ty: ty.name(),
                count,
                size: bytes.len(),
                hex: hex::encode(bytes),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "COUNT", "SIZE", "HEX"])
                .add_row(vec![
                    ty.name().to_string(),
                    count.to_string(),
                    bytes.len().to_string(),
                    hex::encode(bytes),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "type={} count={} size={} hex={}",
                ty.name(),
                count,
                bytes.len(),
                hex::encode(bytes)
            );
        }
        OutputFormat::Raw => print_raw(bytes)?,
    }
    Ok(())
}

pub fn print_records(records: &[Record], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for record in records {
                println!(
                    "{}",
                    serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET", "SIZE", "TYPE", "VALUE"]);
            for record in records {
                table.add_row(vec![
                    record.offset.to_string(),
                    record.size.to_string(),
                    record.ty.to_string(),
                    display(&record.value),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for record in records {
                println!(
                    "offset={} size={} type={} value={}",
                    record.offset,
                    record.size,
                    record.ty,
                    display(&record.value)
                );
            }
        }
        OutputFormat::Raw => {
            for record in records {
                println!("{}", display(&record.value));
            }
        }
    }
}

pub fn print_raw(data: &[u8]) -> CliResult<()> {
    let mut out = std::io::stdout();
    out.write_all(data)
        .and_then(|()| out.flush())
        .map_err(|err| io_error("failed writing to stdout", err))
}
