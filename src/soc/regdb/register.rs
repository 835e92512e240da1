use super::bitset::BitsetHandle;

/// Register access width as declared by `<reg32>` / `<reg64>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegWidth {
    W32,
    W64,
}

impl RegWidth {
    pub fn bits(self) -> u32 {
        match self {
            RegWidth::W32 => 32,
            RegWidth::W64 => 64,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Register {
    pub name: String,
    pub offset: u32,
    /// Resolved domain prefix, e.g. `CORE` or `A6XX_CORE`.
    pub domain: String,
    pub full_name: String,
    pub width: RegWidth,
    pub variant: Option<String>,
    /// Enclosing `<array>` name for registers declared inside an array.
    pub array: Option<String>,
    pub bitset: BitsetHandle,
}

impl Register {
    pub fn new(
        name: impl Into<String>,
        offset: u32,
        domain: impl Into<String>,
        width: RegWidth,
        bitset: BitsetHandle,
    ) -> Self {
        let name = name.into();
        let domain = domain.into();
        let full_name = if domain.is_empty() {
            name.clone()
        } else {
            format!("{domain}_{name}")
        };
        Self {
            name,
            offset,
            domain,
            full_name,
            width,
            variant: None,
            array: None,
            bitset,
        }
    }

    pub fn bit_size(&self) -> u32 {
        self.width.bits()
    }

    /// Uppercase symbol used in EMIT lines, e.g. `REG_CORE_CTRL`.
    pub fn symbol(&self) -> String {
        format!("REG_{}", self.full_name.to_uppercase())
    }

    pub fn is_array_member(&self) -> bool {
        self.array.is_some()
    }
}
