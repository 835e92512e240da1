/// Parses a schema integer attribute: decimal, `0x`, `0b` or `0o` with optional `_` separators.
pub(crate) fn parse_unsigned_literal(text: &str) -> Result<u64, &'static str> {
    let trimmed = text.trim();
    if trimmed.starts_with('-') {
        return Err("negative values are not supported here");
    }
    let cleaned = trimmed.trim_start_matches('+').replace('_', "");
    let lowered = cleaned.to_ascii_lowercase();
    let (radix, digits) = if let Some(stripped) = lowered.strip_prefix("0x") {
        (16, stripped)
    } else if let Some(stripped) = lowered.strip_prefix("0b") {
        (2, stripped)
    } else if let Some(stripped) = lowered.strip_prefix("0o") {
        (8, stripped)
    } else {
        (10, lowered.as_str())
    };
    if digits.is_empty() {
        return Err("numeric literal missing digits");
    }
    u64::from_str_radix(digits, radix).map_err(|_| "not a valid number or out of range")
}

/// Same as [`parse_unsigned_literal`] but accepts a leading minus sign (enum values).
pub(crate) fn parse_signed_literal(text: &str) -> Result<i64, &'static str> {
    let trimmed = text.trim();
    if let Some(magnitude) = trimmed.strip_prefix('-') {
        let value = parse_unsigned_literal(magnitude)?;
        if value > i64::MAX as u64 + 1 {
            return Err("numeric literal out of range");
        }
        return Ok((value as i64).wrapping_neg());
    }
    let value = parse_unsigned_literal(trimmed)?;
    i64::try_from(value).map_err(|_| "numeric literal out of range")
}
