/// Parses an unsigned integer literal: decimal, `0x` hex, `0o` octal or `0b` binary,
/// with optional `_` separators.
pub fn parse_numeric_literal(text: &str) -> Result<u64, &'static str> {
    let text = text.trim();
    if text.starts_with('-') {
        return Err("negative values are not supported here");
    }
    let cleaned = text.replace('_', "");
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
    if digits.starts_with('+') {
        return Err("unexpected sign");
    }
    u64::from_str_radix(digits, radix).map_err(|err| match err.kind() {
        std::num::IntErrorKind::PosOverflow => "numeric literal out of range",
        _ => "invalid digit for radix",
    })
}
