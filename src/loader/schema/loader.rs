use std::path::{Path, PathBuf};

use tracing::debug;

use crate::soc::regdb::{RegisterDatabase, SchemaDocument, SchemaError};

use super::parser::ParserContext;

/// Loads a register schema rooted at `root_dir`. `<import file="…">` paths are resolved
/// relative to the root directory and every file is parsed at most once.
pub struct SchemaLoader {
    root_dir: PathBuf,
}

impl SchemaLoader {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Parses `entry` and its imports. Documents come back in parse order; a file that imports
    /// others is split around each import so later definitions stay later.
    pub fn load_documents(&self, entry: impl AsRef<Path>) -> Result<Vec<SchemaDocument>, SchemaError> {
        let mut ctx = ParserContext::new(self.root_dir.clone());
        ctx.parse_file(self.root_dir.join(entry.as_ref()))?;
        Ok(ctx.into_documents())
    }

    pub fn load(&self, entry: impl AsRef<Path>) -> Result<RegisterDatabase, SchemaError> {
        let docs = self.load_documents(entry)?;
        let db = RegisterDatabase::from_documents(docs);
        debug!(
            registers = db.register_count(),
            arrays = db.array_registers().len(),
            "register database ready"
        );
        Ok(db)
    }

    /// Parses schema text held in memory. `name` is only used for diagnostics; imports still
    /// resolve against the root directory.
    pub fn load_str(&self, name: impl Into<PathBuf>, text: &str) -> Result<RegisterDatabase, SchemaError> {
        let mut ctx = ParserContext::new(self.root_dir.clone());
        ctx.parse_source(name.into(), text)?;
        Ok(RegisterDatabase::from_documents(ctx.into_documents()))
    }
}

/// Convenience wrapper around [`SchemaLoader::load`].
pub fn load(root_dir: impl Into<PathBuf>, entry: impl AsRef<Path>) -> Result<RegisterDatabase, SchemaError> {
    SchemaLoader::new(root_dir).load(entry)
}
