use std::fs;

use npu_regdump::loader::schema::SchemaLoader;
use npu_regdump::soc::decode::{BitfieldDecoder, FieldToken};
use npu_regdump::soc::regdb::SchemaError;

use crate::common::{defs_root, load_rknpu};

#[test]
fn imports_resolve_and_later_definitions_win() {
    let db = load_rknpu();

    let status = db.register(0x3000).expect("CORE_S_STATUS");
    assert_eq!(status.full_name, "CORE_S_STATUS");
    assert_eq!(status.bitset.len(), 2, "registers.xml redefinition replaces the import");

    let op_en = db.register(0x3008).expect("imported CORE_OPERATION_ENABLE");
    assert_eq!(op_en.symbol(), "REG_CORE_OPERATION_ENABLE");

    let conv = db.register_by_name("CNA_CONV_CON1").expect("conv_con1 user");
    assert!(conv.bitset.is_shared());
    assert_eq!(conv.bitset.name, "conv_con1");
    assert!(db.bitset("conv_con1").is_some());

    assert_eq!(db.target_value("CORE"), Some(0x800));
    assert_eq!(db.target_value("DPU"), Some(0x1000));
    assert_eq!(db.target_value("PPU"), None);
}

#[test]
fn array_members_stay_out_of_offset_index() {
    let db = load_rknpu();
    let lut: Vec<_> = db.array_registers().iter().map(|reg| reg.full_name.as_str()).collect();
    assert_eq!(lut, ["DPU_LUT_DATA"]);
    assert!(db.register(0x4100).is_none());
    assert!(db.registers().all(|reg| !reg.is_array_member()));
}

#[test]
fn core_misc_cfg_emit_lines() {
    let db = load_rknpu();
    let reg = db.register(0x3010).expect("CORE_MISC_CFG");
    let emit = BitfieldDecoder::emit();
    assert_eq!(
        emit.emit_line(reg, 0x201),
        "EMIT(REG_CORE_MISC_CFG, CORE_MISC_CFG_QD_EN | CORE_MISC_CFG_PROC_PRECISION(2));"
    );
    assert_eq!(emit.emit_line(reg, 0), "EMIT(REG_CORE_MISC_CFG, 0x00000000);");
    assert_eq!(emit.emit_line(reg, 0x800), "EMIT(REG_CORE_MISC_CFG, );");

    let tokens = BitfieldDecoder::standalone().decode(reg, 0x301);
    let formatted: Vec<_> = tokens
        .iter()
        .map(|token| (token.name().to_string(), token.formatted()))
        .collect();
    assert_eq!(
        formatted,
        [
            ("CORE_MISC_CFG_QD_EN".to_string(), "ENABLED".to_string()),
            ("CORE_MISC_CFG_PROC_PRECISION".to_string(), "3".to_string()),
        ]
    );
}

#[test]
fn single_boolean_core_ctrl_emits_raw_value() {
    let db = SchemaLoader::new(defs_root())
        .load_str(
            "core_ctrl.xml",
            r#"<domain name="CORE"><reg32 name="CTRL" offset="0x10"><bitfield name="EN" pos="0" type="boolean"/></reg32></domain>"#,
        )
        .expect("load CORE_CTRL schema");
    let reg = db.register(0x10).expect("CORE_CTRL");
    assert_eq!(reg.bitset.len(), 1);
    assert_eq!(
        BitfieldDecoder::emit().emit_line(reg, 0x1),
        "EMIT(REG_CORE_CTRL, 0x00000001);"
    );
    assert_eq!(
        BitfieldDecoder::standalone().decode(reg, 0x1),
        vec![FieldToken::Raw(0x1)]
    );
}

#[test]
fn single_field_registers_decode_raw() {
    let db = load_rknpu();
    let base = db.register(0x0010).expect("PC_BASE_ADDRESS");
    assert_eq!(base.bitset.fields[0].name, "base_address");
    let tokens = BitfieldDecoder::standalone().decode(base, 0xdead_0000);
    assert_eq!(tokens, vec![FieldToken::Raw(0xdead_0000)]);
    assert_eq!(tokens[0].formatted(), "0xdead0000");
}

#[test]
fn import_cycle_is_loaded_once() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("a.xml"),
        r#"<database><import file="b.xml"/><domain name="A">
            <reg32 name="ONE" offset="0x4" type="uint"/>
        </domain></database>"#,
    )
    .expect("write a.xml");
    fs::write(
        dir.path().join("b.xml"),
        r#"<database><import file="a.xml"/><domain name="B">
            <reg32 name="ONE" offset="0x4" type="uint"/>
            <reg32 name="TWO" offset="0x8" type="uint"/>
        </domain></database>"#,
    )
    .expect("write b.xml");

    let loader = SchemaLoader::new(dir.path());
    let docs = loader.load_documents("a.xml").expect("cyclic imports load");
    assert_eq!(docs.len(), 2);
    assert!(docs[0].path.ends_with("b.xml"));

    let db = loader.load("a.xml").expect("cyclic imports load");
    assert_eq!(db.register(0x4).map(|reg| reg.full_name.as_str()), Some("A_ONE"));
    assert_eq!(db.register(0x8).map(|reg| reg.full_name.as_str()), Some("B_TWO"));
}

#[test]
fn missing_import_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("top.xml"),
        r#"<database><import file="gone.xml"/></database>"#,
    )
    .expect("write top.xml");
    let err = SchemaLoader::new(dir.path()).load("top.xml").unwrap_err();
    match err {
        SchemaError::Io { path, .. } => assert!(path.ends_with("gone.xml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn fixtures_are_present() {
    assert!(defs_root().join("registers.xml").is_file());
    assert!(defs_root().join("common.xml").is_file());
}
