//! Explicit parser state threaded through the recursive walk of every schema file.

use std::fs;
use std::mem;
use std::path::PathBuf;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use roxmltree::{Document, Node};
use tracing::debug;

use crate::soc::regdb::{
    BitsetTemplate, EnumDef, PrefixMode, Register, SchemaDocument, SchemaError, SchemaItem,
    SourceLocation,
};

use super::literals::{parse_signed_literal, parse_unsigned_literal};

/// File currently being parsed; the position is updated per element for diagnostics.
pub(super) struct OpenFile {
    pub(super) path: PathBuf,
    pub(super) line: u32,
    pub(super) column: u32,
    pub(super) items: Vec<SchemaItem>,
}

pub(super) struct DomainScope {
    pub(super) name: String,
    pub(super) prefix: Option<String>,
    pub(super) prefix_mode: Option<PrefixMode>,
}

pub(super) struct ArrayScope {
    pub(super) name: String,
    pub(super) variant: Option<String>,
}

pub(super) struct OpenEnum {
    pub(super) def: EnumDef,
    pub(super) counter: i64,
}

pub(crate) struct ParserContext {
    pub(super) root_dir: PathBuf,
    pub(super) visited: AHashSet<PathBuf>,
    pub(super) files: Vec<OpenFile>,
    pub(super) documents: Vec<SchemaDocument>,
    pub(super) enums: AHashMap<String, EnumDef>,
    pub(super) bitsets: AHashMap<String, Arc<BitsetTemplate>>,
    pub(super) domain: Option<DomainScope>,
    /// Varset in effect for each open `<domain>` / `<stripe>`.
    pub(super) varsets: Vec<Option<String>>,
    pub(super) stripe: Option<String>,
    pub(super) array: Option<ArrayScope>,
    pub(super) bit_size: u32,
    pub(super) open_enum: Option<OpenEnum>,
    pub(super) open_bitset: Option<BitsetTemplate>,
    pub(super) open_register: Option<Register>,
}

impl ParserContext {
    pub(crate) fn new(root_dir: PathBuf) -> Self {
        Self {
            root_dir,
            visited: AHashSet::new(),
            files: Vec::new(),
            documents: Vec::new(),
            enums: AHashMap::new(),
            bitsets: AHashMap::new(),
            domain: None,
            varsets: Vec::new(),
            stripe: None,
            array: None,
            bit_size: 32,
            open_enum: None,
            open_bitset: None,
            open_register: None,
        }
    }

    /// Parses `path` unless it was already visited (import cycles and repeated imports).
    pub(crate) fn parse_file(&mut self, path: PathBuf) -> Result<(), SchemaError> {
        let canonical = fs::canonicalize(&path).map_err(|source| SchemaError::Io {
            path: path.clone(),
            source,
        })?;
        if !self.visited.insert(canonical) {
            debug!(path = %path.display(), "schema file already loaded, skipping");
            return Ok(());
        }
        let text = fs::read_to_string(&path).map_err(|source| SchemaError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), depth = self.files.len(), "loading schema file");
        self.parse_source(path, &text)
    }

    /// Parses in-memory schema text as if it were read from `path`.
    pub(crate) fn parse_source(&mut self, path: PathBuf, text: &str) -> Result<(), SchemaError> {
        // Items of the importing file stay ahead of the imported ones.
        self.flush_current_file();
        self.files.push(OpenFile {
            path,
            line: 1,
            column: 1,
            items: Vec::new(),
        });
        let result = self.parse_text(text);
        if let Some(file) = self.files.pop() {
            if !file.items.is_empty() {
                self.documents.push(SchemaDocument::new(file.path, file.items));
            }
        }
        result
    }

    pub(crate) fn into_documents(mut self) -> Vec<SchemaDocument> {
        self.flush_current_file();
        self.documents
    }

    fn parse_text(&mut self, text: &str) -> Result<(), SchemaError> {
        let doc = Document::parse(text).map_err(|err| {
            let pos = err.pos();
            SchemaError::Xml {
                location: self.location_at(pos.row, pos.col),
                message: err.to_string(),
            }
        })?;
        self.visit(&doc, doc.root_element())
    }

    fn visit<'a, 'input>(
        &mut self,
        doc: &'a Document<'input>,
        node: Node<'a, 'input>,
    ) -> Result<(), SchemaError> {
        self.mark_position(doc, node);
        self.start_element(node)?;
        for child in node.children().filter(|child| child.is_element()) {
            self.visit(doc, child)?;
        }
        self.end_element(node);
        Ok(())
    }

    fn mark_position(&mut self, doc: &Document<'_>, node: Node<'_, '_>) {
        let pos = doc.text_pos_at(node.range().start);
        if let Some(file) = self.files.last_mut() {
            file.line = pos.row;
            file.column = pos.col;
        }
    }

    fn flush_current_file(&mut self) {
        if let Some(file) = self.files.last_mut() {
            if !file.items.is_empty() {
                let items = mem::take(&mut file.items);
                self.documents
                    .push(SchemaDocument::new(file.path.clone(), items));
            }
        }
    }

    pub(super) fn emit(&mut self, item: SchemaItem) {
        if let Some(file) = self.files.last_mut() {
            file.items.push(item);
        }
    }

    pub(super) fn location(&self) -> SourceLocation {
        match self.files.last() {
            Some(file) => SourceLocation::new(file.path.clone(), file.line, file.column),
            None => SourceLocation::new(PathBuf::new(), 0, 0),
        }
    }

    fn location_at(&self, line: u32, column: u32) -> SourceLocation {
        let file = self
            .files
            .last()
            .map(|file| file.path.clone())
            .unwrap_or_default();
        SourceLocation::new(file, line, column)
    }

    pub(super) fn active_varset(&self) -> Option<&str> {
        self.varsets.last().and_then(|varset| varset.as_deref())
    }

    pub(super) fn required_attr<'a>(
        &self,
        node: Node<'a, '_>,
        name: &str,
    ) -> Result<&'a str, SchemaError> {
        node.attribute(name)
            .ok_or_else(|| SchemaError::MissingAttribute {
                location: self.location(),
                element: node.tag_name().name().to_string(),
                attribute: name.to_string(),
            })
    }

    pub(super) fn unsigned_attr(
        &self,
        node: Node<'_, '_>,
        name: &str,
    ) -> Result<Option<u64>, SchemaError> {
        let Some(text) = node.attribute(name) else {
            return Ok(None);
        };
        parse_unsigned_literal(text)
            .map(Some)
            .map_err(|reason| self.invalid_integer(name, text, reason))
    }

    pub(super) fn signed_attr(
        &self,
        node: Node<'_, '_>,
        name: &str,
    ) -> Result<Option<i64>, SchemaError> {
        let Some(text) = node.attribute(name) else {
            return Ok(None);
        };
        parse_signed_literal(text)
            .map(Some)
            .map_err(|reason| self.invalid_integer(name, text, reason))
    }

    pub(super) fn required_unsigned_attr(
        &self,
        node: Node<'_, '_>,
        name: &str,
    ) -> Result<u64, SchemaError> {
        let text = self.required_attr(node, name)?;
        parse_unsigned_literal(text).map_err(|reason| self.invalid_integer(name, text, reason))
    }

    pub(super) fn invalid_integer(
        &self,
        attribute: &str,
        text: &str,
        reason: &'static str,
    ) -> SchemaError {
        SchemaError::InvalidInteger {
            location: self.location(),
            attribute: attribute.to_string(),
            text: text.to_string(),
            reason,
        }
    }
}
