use npu_regdump::config::DecoderConfig;
use npu_regdump::soc::decode::InstructionStream;
use npu_regdump::soc::record::{DumpDecoder, Record, RecordCodec, RecordError};

use crate::common::{load_rknpu, temp_file_with, words_le};

#[test]
fn stream_records_replay_through_dump_decoder() {
    let db = load_rknpu();
    let config = DecoderConfig::default();
    let words = [
        (1u64 << 59) | (0x0002_0001 << 16) | 0x3000,
        (1u64 << 59) | (0x201 << 16) | 0x3010,
        (1u64 << 63) | (0x7 << 16) | 0x9000,
    ];
    let listing = InstructionStream::new(&db, &config).decode(&words_le(&words));

    let mut bytes = Vec::new();
    RecordCodec::write_all(&mut bytes, &listing.records).expect("encode records");
    let file = temp_file_with(&bytes);

    let lines = DumpDecoder::new(&db).decode(file.path()).expect("decode dump");
    assert_eq!(
        lines,
        [
            "EMIT(REG_CORE_S_STATUS, CORE_S_STATUS_STATUS_0(1) | CORE_S_STATUS_STATUS_1(2));",
            "EMIT(REG_CORE_MISC_CFG, CORE_MISC_CFG_QD_EN | CORE_MISC_CFG_PROC_PRECISION(2));",
            "-8000 -7000 7",
        ]
    );
}

#[test]
fn write_listing_matches_decode() {
    let db = load_rknpu();
    let records = [
        Record::from_unsigned(0x1004, 0x1, 0x200),
        Record::from_unsigned(0x0200, 0xabc, 0x0),
    ];
    let mut bytes = Vec::new();
    RecordCodec::write_all(&mut bytes, &records).expect("encode records");
    let file = temp_file_with(&bytes);

    let decoder = DumpDecoder::new(&db);
    let mut out = Vec::new();
    let count = decoder.write_listing(file.path(), &mut out).expect("write listing");
    assert_eq!(count, 2);
    let text = String::from_utf8(out).expect("utf8 listing");
    assert_eq!(
        text,
        "EMIT(REG_CNA_S_POINTER, CNA_S_POINTER_POINTER_PP_EN);\n0 200 abc\n"
    );
    let decoded = decoder.decode(file.path()).expect("decode dump");
    assert_eq!(decoded.join("\n") + "\n", text);
}

#[test]
fn truncated_dump_is_rejected() {
    let db = load_rknpu();
    let file = temp_file_with(&[0u8; 13]);
    let err = DumpDecoder::new(&db).decode(file.path()).unwrap_err();
    assert!(matches!(err, RecordError::TrailingBytes { len: 13, trailing: 5 }));
}

#[test]
fn missing_dump_reports_path() {
    let db = load_rknpu();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.bin");
    let err = DumpDecoder::new(&db).decode(&path).unwrap_err();
    match err {
        RecordError::File { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn config_file_loads_from_disk() {
    let file = temp_file_with(b"block_bytes = 32\n");
    let config = DecoderConfig::load(file.path()).expect("load config");
    assert_eq!(config.block_bytes, 32);
    assert_eq!(config.emit_column, 50);
}
