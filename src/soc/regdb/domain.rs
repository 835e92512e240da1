use smallvec::SmallVec;

/// How a domain's register prefix is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrefixMode {
    /// `prefix="variant"`: the active variant name replaces the domain prefix.
    Variant,
    /// Any other mode (`chip`, ...): the configured prefix is joined with the domain name.
    Other(String),
}

impl PrefixMode {
    pub fn parse(text: &str) -> Self {
        match text {
            "variant" => PrefixMode::Variant,
            other => PrefixMode::Other(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Domain {
    pub name: String,
    pub prefix: Option<String>,
    pub prefix_mode: Option<PrefixMode>,
    pub varset: Option<String>,
}

/// Named value list; also used as a varset and for the `target` destination table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub values: SmallVec<[(String, i64); 8]>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: SmallVec::new(),
        }
    }

    pub fn push_value(&mut self, name: impl Into<String>, value: i64) {
        self.values.push((name.into(), value));
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.values.iter().any(|(entry, _)| entry == name)
    }

    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.values
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| *value)
    }
}
