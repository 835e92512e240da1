use npu_regdump::config::DecoderConfig;
use npu_regdump::soc::decode::{InstructionStream, hex_listing};
use npu_regdump::soc::record::Record;

use crate::common::{load_rknpu, words_le};

const CNA_POINTER: u64 = (1 << 57) | (0xe << 16) | 0x1004;
const CNA_CONV: u64 = (1 << 57) | (0x4000_0003 << 16) | 0x100c;
const PC_ENABLE: u64 = (1 << 56) | (1 << 55) | (1 << 16) | 0x0008;
const DPU_UNKNOWN: u64 = (1 << 60) | (0x10 << 16) | 0x4444;

#[test]
fn annotates_command_buffer() {
    let db = load_rknpu();
    let config = DecoderConfig::default();
    let stream = InstructionStream::new(&db, &config);
    let buffer = words_le(&[CNA_POINTER, CNA_CONV, 0, PC_ENABLE, DPU_UNKNOWN]);

    let listing = stream.decode(&buffer);
    let lines = &listing.lines;
    assert_eq!(lines.len(), 4, "zero word is skipped");

    let first = format!("[ffef0000] lsb {CNA_POINTER:016x} - CNA");
    assert!(lines[0].starts_with(&first));
    assert_eq!(lines[0].find("EMIT"), Some(config.emit_column));
    assert!(lines[0].ends_with(
        "EMIT(REG_CNA_S_POINTER, CNA_S_POINTER_POINTER | CNA_S_POINTER_POINTER_PP_MODE | CNA_S_POINTER_EXECUTER_PP_EN);"
    ));
    assert!(lines[1].ends_with(
        "EMIT(REG_CNA_CONV_CON1, CNA_CONV_CON1_CONV_MODE(3) | CNA_CONV_CON1_NONALIGN_DMA);"
    ));
    assert!(lines[2].starts_with("[ffef0018] lsb 0180000000010008 - PC"));
    assert!(lines[2].ends_with("EMIT(REG_PC_OPERATION_ENABLE, 0x00000001);"));
    assert_eq!(lines[3], format!("[ffef0020] lsb {DPU_UNKNOWN:016x} - DPU Unknown"));

    assert_eq!(
        listing.records,
        vec![
            Record::from_unsigned(0x1004, 0xe, 0x200),
            Record::from_unsigned(0x100c, 0x4000_0003, 0x200),
            Record::from_unsigned(0x0008, 1, 0x100),
            Record::from_unsigned(0x4444, 0x10, 0x1000),
        ]
    );
}

#[test]
fn configured_base_and_column_are_honoured() {
    let db = load_rknpu();
    let config = DecoderConfig::from_toml_str("stream_base_address = 0x1000\nemit_column = 60\n")
        .expect("valid config");
    let listing = InstructionStream::new(&db, &config).decode(&words_le(&[CNA_POINTER]));
    assert!(listing.lines[0].starts_with("[1000] lsb"));
    assert_eq!(listing.lines[0].find("EMIT"), Some(60));
}

#[test]
fn hex_listing_summarises_zero_tail() {
    let mut buffer = words_le(&[CNA_POINTER, CNA_CONV]);
    buffer.resize(0x100, 0);
    let lines = hex_listing(&buffer, &DecoderConfig::default());
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "[00000000] = 000e1004 02000000 0003100c 02004000");
    assert_eq!(lines[1], "[00000010] = 00000000 00000000 00000000 00000000");
    assert_eq!(
        lines[2],
        "... 15 blocks (240 bytes) from 0x00000010 to 0x000000ff are all zeros"
    );
}
