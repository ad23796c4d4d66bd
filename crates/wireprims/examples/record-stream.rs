//! Writes a small log of typed records to a file, then reads them back one
//! at a time.
//!
//! Run with: `cargo run -p wireprims --example record-stream`

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};

use wireprims::codec::{Complex, ErrorKind};
use wireprims::{deserialize, serialize, Reader, Writer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join(format!(
        "wireprims-records-{}.bin",
        std::process::id()
    ));

    let mut tags = BTreeMap::new();
    tags.insert("host".to_string(), "edge-01".to_string());
    tags.insert("zone".to_string(), "west".to_string());

    {
        let mut writer = Writer::new(BufWriter::new(File::create(&path)?));
        serialize(&1_700_000_000u64, &mut writer)?;
        serialize(&tags, &mut writer)?;
        let samples = vec![Complex::new(1.0f64, -0.5), Complex::new(f64::INFINITY, 0.0)];
        serialize(&samples, &mut writer)?;
        serialize(&vec![true, false, true], &mut writer)?;
    }

    let mut reader = Reader::new(BufReader::new(File::open(&path)?));
    let mut timestamp = 0u64;
    let mut decoded_tags = BTreeMap::<String, String>::new();
    let mut samples = Vec::<Complex<f64>>::new();
    let mut flags = Vec::<bool>::new();
    deserialize(&mut timestamp, &mut reader)?;
    deserialize(&mut decoded_tags, &mut reader)?;
    deserialize(&mut samples, &mut reader)?;
    deserialize(&mut flags, &mut reader)?;

    println!("timestamp: {timestamp}");
    println!("tags: {decoded_tags:?}");
    println!("samples: {samples:?}");
    println!("flags: {flags:?}");
    println!("bytes read: {}", reader.consumed());

    // The stream is exhausted; one more read reports truncation.
    let mut extra = 0u32;
    if let Err(err) = deserialize(&mut extra, &mut reader) {
        assert_eq!(err.kind(), ErrorKind::Truncated);
        println!("end of stream: {err}");
    }

    std::fs::remove_file(&path)?;
    Ok(())
}
