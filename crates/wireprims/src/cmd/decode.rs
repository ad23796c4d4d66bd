use std::fs;
use std::io::Read;

use tracing::{debug, warn};
use wireprims_codec::Reader;

use crate::cmd::DecodeArgs;
use crate::exit::{codec_error, io_error, CliResult, SUCCESS};
use crate::output::{print_records, OutputFormat, Record};
use crate::value::{self, parse_hex};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = resolve_input(&args)?;
    let limit = args.count.unwrap_or(usize::MAX);

    let mut reader = Reader::new(input.as_slice());
    let mut records = Vec::new();
    while records.len() < limit {
        let exhausted = reader
            .is_exhausted()
            .map_err(|err| codec_error("read failed", err))?;
        if exhausted {
            break;
        }

        let offset = reader.consumed();
        let value = value::decode_next(args.ty, &mut reader).map_err(|err| {
            codec_error(&format!("decode failed at offset {offset}"), err)
        })?;
        records.push(Record {
            offset,
            size: reader.consumed() - offset,
            ty: args.ty.name(),
            value,
        });
    }

    let trailing = input.len() as u64 - reader.consumed();
    if trailing > 0 {
        warn!(trailing, "stopped before end of input");
    }
    debug!(records = records.len(), size = input.len(), "decoded input");

    print_records(&records, format);
    Ok(SUCCESS)
}

fn resolve_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(text) = &args.hex {
        return parse_hex(text);
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(buf)
}
