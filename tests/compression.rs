use flightdelay::io::compression::{decompress, Bzip2Codec, CompressionCodec};
use flightdelay::io::csv::parse;
use flightdelay::testing::{compress_csv, sample_csv, truncated_archive};
use flightdelay::ErrorKind;
use std::io::{Cursor, Read};

#[test]
fn bzip2_archive_decodes_to_input_text() -> anyhow::Result<()> {
    let text = sample_csv();
    let archive = compress_csv(&text)?;
    assert!(archive.starts_with(Bzip2Codec.magic_bytes()));

    let mut out = String::new();
    decompress(Cursor::new(archive), &Bzip2Codec)?.read_to_string(&mut out)?;
    assert_eq!(out, text);
    Ok(())
}

#[test]
fn plain_text_is_rejected_before_decoding() {
    let err = decompress(Cursor::new(sample_csv().into_bytes()), &Bzip2Codec)
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Decompression);
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn empty_payload_is_rejected() {
    let err = decompress(Cursor::new(Vec::new()), &Bzip2Codec).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Decompression);
}

#[test]
fn garbage_after_signature_fails_while_reading() -> anyhow::Result<()> {
    let mut payload = b"BZh9".to_vec();
    payload.extend((0..512u32).map(|i| (i * 31 % 251) as u8));
    let stream = decompress(Cursor::new(payload), &Bzip2Codec)?;
    let err = parse(stream).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Decompression);
    Ok(())
}

#[test]
fn truncated_archive_fails_while_reading() -> anyhow::Result<()> {
    let text = sample_csv().repeat(50);
    let stream = decompress(Cursor::new(truncated_archive(&text)?), &Bzip2Codec)?;
    let result = parse(stream).and_then(|rows| rows.collect::<Result<Vec<_>, _>>());
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Decompression);
    Ok(())
}

#[test]
fn decoding_stops_after_first_stream() -> anyhow::Result<()> {
    let first = "Dest,Cancelled,ArrDelay\nLAX,0,10\n";
    let mut payload = compress_csv(first)?;
    payload.extend(compress_csv("LAX,0,20\n")?);
    let mut out = String::new();
    decompress(Cursor::new(payload), &Bzip2Codec)?.read_to_string(&mut out)?;
    assert_eq!(out, first);
    Ok(())
}

#[test]
fn codec_is_usable_as_trait_object() -> anyhow::Result<()> {
    let codec: &dyn CompressionCodec = &Bzip2Codec;
    assert_eq!(codec.name(), "bzip2");
    let mut out = String::new();
    decompress(Cursor::new(compress_csv("a,b\n1,2\n")?), codec)?.read_to_string(&mut out)?;
    assert_eq!(out, "a,b\n1,2\n");
    Ok(())
}
