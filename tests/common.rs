use std::io::Write;
use std::path::PathBuf;

use npu_regdump::loader::schema::SchemaLoader;
use npu_regdump::soc::regdb::RegisterDatabase;
use tempfile::NamedTempFile;

/// Directory holding the checked-in RKNPU schema fixtures.
pub fn defs_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("defs/rknpu")
}

pub fn load_rknpu() -> RegisterDatabase {
    SchemaLoader::new(defs_root())
        .load("registers.xml")
        .expect("load rknpu schema + imports")
}

/// Writes `bytes` to a fresh temporary file that lives as long as the returned handle.
pub fn temp_file_with(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

pub fn words_le(words: &[u64]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}
