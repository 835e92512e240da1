//! Per-element handlers. `start_element` / `end_element` mirror the open and close tags of the
//! schema tree; nested state lives in [`ParserContext`].

use std::sync::Arc;

use roxmltree::Node;
use tracing::debug;

use crate::soc::regdb::{
    BitsetHandle, BitsetTemplate, Domain, EnumDef, Field, FieldType, PrefixMode, RegWidth,
    Register, SchemaError, SchemaItem, default_field_name,
};

use super::context::{ArrayScope, DomainScope, OpenEnum, ParserContext};

impl ParserContext {
    pub(super) fn start_element(&mut self, node: Node<'_, '_>) -> Result<(), SchemaError> {
        match node.tag_name().name() {
            "import" => self.import(node),
            "domain" => self.open_domain(node),
            "stripe" => self.open_stripe(node),
            "array" => self.open_array(node),
            "enum" => self.open_enum(node),
            "value" => self.enum_value(node),
            "bitset" => self.open_bitset(node),
            "bitfield" => self.bitfield(node),
            "reg32" => self.open_register(node, RegWidth::W32),
            "reg64" => self.open_register(node, RegWidth::W64),
            _ => Ok(()),
        }
    }

    pub(super) fn end_element(&mut self, node: Node<'_, '_>) {
        match node.tag_name().name() {
            "domain" => {
                self.domain = None;
                self.varsets.pop();
            }
            "stripe" => {
                self.stripe = None;
                self.varsets.pop();
            }
            "array" => self.array = None,
            "enum" => {
                if let Some(open) = self.open_enum.take() {
                    self.enums.insert(open.def.name.clone(), open.def.clone());
                    self.emit(SchemaItem::Enum(open.def));
                }
            }
            "bitset" => {
                if let Some(template) = self.open_bitset.take() {
                    let template = Arc::new(template);
                    self.bitsets
                        .insert(template.name.clone(), Arc::clone(&template));
                    if !template.inline {
                        self.emit(SchemaItem::Bitset(template));
                    }
                }
            }
            "reg32" | "reg64" => {
                if let Some(reg) = self.open_register.take() {
                    self.emit(SchemaItem::Register(reg));
                }
            }
            _ => {}
        }
    }

    fn import(&mut self, node: Node<'_, '_>) -> Result<(), SchemaError> {
        let file = self.required_attr(node, "file")?;
        let path = self.root_dir.join(file);
        self.parse_file(path)
    }

    fn open_domain(&mut self, node: Node<'_, '_>) -> Result<(), SchemaError> {
        let name = self.required_attr(node, "name")?.to_string();
        let varset = self.scoped_varset(node)?;
        self.varsets.push(varset.clone());

        let (prefix, prefix_mode) = match node.attribute("prefix") {
            Some(mode) => (self.resolve_variant(node)?, Some(PrefixMode::parse(mode))),
            None => (None, None),
        };
        self.domain = Some(DomainScope {
            name: name.clone(),
            prefix: prefix.clone(),
            prefix_mode: prefix_mode.clone(),
        });
        self.emit(SchemaItem::Domain(Domain {
            name,
            prefix,
            prefix_mode,
            varset,
        }));
        Ok(())
    }

    fn open_stripe(&mut self, node: Node<'_, '_>) -> Result<(), SchemaError> {
        let varset = self.scoped_varset(node)?;
        self.varsets.push(varset);
        self.stripe = self.resolve_variant(node)?;
        Ok(())
    }

    fn open_array(&mut self, node: Node<'_, '_>) -> Result<(), SchemaError> {
        let name = self.required_attr(node, "name")?.to_string();
        let offset = self.required_unsigned_attr(node, "offset")?;
        let stride = self.required_unsigned_attr(node, "stride")?;
        let length = self.required_unsigned_attr(node, "length")?;
        let variant = self.resolve_variant(node)?;
        debug!(%name, offset, stride, length, "array scope opened");
        self.array = Some(ArrayScope { name, variant });
        Ok(())
    }

    fn open_enum(&mut self, node: Node<'_, '_>) -> Result<(), SchemaError> {
        let name = self.required_attr(node, "name")?;
        self.open_enum = Some(OpenEnum {
            def: EnumDef::new(name),
            counter: 0,
        });
        Ok(())
    }

    fn enum_value(&mut self, node: Node<'_, '_>) -> Result<(), SchemaError> {
        if self.open_enum.is_none() {
            return Ok(());
        }
        let name = self.required_attr(node, "name")?;
        let explicit = self.signed_attr(node, "value")?;
        if let Some(open) = self.open_enum.as_mut() {
            let value = explicit.unwrap_or(open.counter);
            open.def.push_value(name, value);
            open.counter += 1;
        }
        Ok(())
    }

    fn open_bitset(&mut self, node: Node<'_, '_>) -> Result<(), SchemaError> {
        let name = self.required_attr(node, "name")?;
        let inline = node.attribute("inline") == Some("yes");
        self.open_bitset = Some(BitsetTemplate::new(name, inline));
        Ok(())
    }

    fn bitfield(&mut self, node: Node<'_, '_>) -> Result<(), SchemaError> {
        if self.open_register.is_none() && self.open_bitset.is_none() {
            return Ok(());
        }
        let name = self.required_attr(node, "name")?.to_string();
        let field = self.parse_field(node, name)?;
        if let Some(reg) = self.open_register.as_mut() {
            reg.bitset.push_field(field);
        } else if let Some(template) = self.open_bitset.as_mut() {
            template.push_field(field);
        }
        Ok(())
    }

    fn open_register(&mut self, node: Node<'_, '_>, width: RegWidth) -> Result<(), SchemaError> {
        self.bit_size = width.bits();
        let name = self.required_attr(node, "name")?;
        let offset_attr = self.required_unsigned_attr(node, "offset")?;
        let offset = u32::try_from(offset_attr).map_err(|_| {
            self.invalid_integer("offset", &offset_attr.to_string(), "offset does not fit in 32 bits")
        })?;

        let ty = node.attribute("type");
        let bitset = match ty.and_then(|ty| self.bitsets.get(ty)) {
            Some(template) => BitsetHandle::from_template(template),
            None => {
                let mut template = BitsetTemplate::new(name, true);
                if ty.is_some() {
                    template.push_field(self.parse_field(node, default_field_name(name))?);
                }
                BitsetHandle::Inline(template)
            }
        };

        let variant = match self.resolve_variant(node)? {
            Some(variant) => Some(variant),
            None => self
                .array
                .as_ref()
                .and_then(|array| array.variant.clone())
                .or_else(|| self.stripe.clone()),
        };
        let domain = self.domain_prefix(variant.as_deref());
        let (reg_name, array) = match &self.array {
            Some(array) => (format!("{}_{name}", array.name), Some(array.name.clone())),
            None => (name.to_string(), None),
        };

        let mut reg = Register::new(reg_name, offset, domain, width, bitset);
        reg.variant = variant;
        reg.array = array;
        self.open_register = Some(reg);
        Ok(())
    }

    fn parse_field(&self, node: Node<'_, '_>, name: String) -> Result<Field, SchemaError> {
        let max = u64::from(self.bit_size - 1);
        let (low, high) = match self.unsigned_attr(node, "pos")? {
            Some(pos) => (pos, pos),
            None => match (self.unsigned_attr(node, "low")?, self.unsigned_attr(node, "high")?) {
                (Some(low), Some(high)) => (low, high),
                _ => (0, max),
            },
        };
        if low > max {
            return Err(self.field_error(&name, format!("low bit {low} out of range 0..={max}")));
        }
        if high > max {
            return Err(self.field_error(&name, format!("high bit {high} out of range 0..={max}")));
        }
        if high < low {
            return Err(self.field_error(&name, format!("low bit {low} is greater than high bit {high}")));
        }
        let shr = self.unsigned_attr(node, "shr")?.unwrap_or(0);
        let shr = u32::try_from(shr)
            .map_err(|_| self.invalid_integer("shr", &shr.to_string(), "shift out of range"))?;
        let ty = node.attribute("type").map(FieldType::parse);
        // Both bounds were checked against a bit size of at most 64.
        Ok(Field::new(name, low as u32, high as u32, ty).with_shr(shr))
    }

    fn field_error(&self, field: &str, reason: String) -> SchemaError {
        SchemaError::FieldRange {
            location: self.location(),
            field: field.to_string(),
            reason,
        }
    }

    /// Varset for a new domain/stripe scope: local `varset` attribute or the inherited one.
    fn scoped_varset(&self, node: Node<'_, '_>) -> Result<Option<String>, SchemaError> {
        match node.attribute("varset") {
            Some(name) => {
                self.lookup_varset(name)?;
                Ok(Some(name.to_string()))
            }
            None => Ok(self.active_varset().map(str::to_string)),
        }
    }

    fn lookup_varset(&self, name: &str) -> Result<&EnumDef, SchemaError> {
        self.enums.get(name).ok_or_else(|| SchemaError::UnknownVarset {
            location: self.location(),
            name: name.to_string(),
        })
    }

    /// First variant of a `variants` attribute (range start when given as `A-B`), checked
    /// against the active varset.
    fn resolve_variant(&self, node: Node<'_, '_>) -> Result<Option<String>, SchemaError> {
        let Some(variants) = node.attribute("variants") else {
            return Ok(None);
        };
        let first = variants.split(',').next().unwrap_or_default();
        let variant = first.split_once('-').map_or(first, |(start, _)| start).trim();

        let varset_name = match node.attribute("varset") {
            Some(name) => name,
            None => self.active_varset().ok_or_else(|| SchemaError::MissingVarset {
                location: self.location(),
                variants: variants.to_string(),
            })?,
        };
        let varset = self.lookup_varset(varset_name)?;
        if !varset.has_name(variant) {
            return Err(SchemaError::UnknownVariant {
                location: self.location(),
                variant: variant.to_string(),
                varset: varset_name.to_string(),
            });
        }
        Ok(Some(variant.to_string()))
    }

    fn domain_prefix(&self, variant: Option<&str>) -> String {
        let Some(domain) = self.domain.as_ref() else {
            return self.stripe.clone().unwrap_or_default();
        };
        if let (Some(PrefixMode::Variant), Some(variant)) = (&domain.prefix_mode, variant) {
            return variant.to_string();
        }
        if let Some(stripe) = &self.stripe {
            return format!("{stripe}_{}", domain.name);
        }
        if let Some(prefix) = &domain.prefix {
            return format!("{prefix}_{}", domain.name);
        }
        domain.name.clone()
    }
}
