use tracing::debug;
use wireprims_codec::Writer;

use crate::cmd::EncodeArgs;
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};
use crate::value;

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut writer = Writer::new(Vec::new());
    for text in &args.values {
        value::encode(args.ty, text, &mut writer)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| codec_error("encode failed", err))?;

    debug!(
        ty = args.ty.name(),
        count = args.values.len(),
        size = bytes.len(),
        "encoded values"
    );
    print_encoded(args.ty, args.values.len(), &bytes, format)?;
    Ok(SUCCESS)
}
