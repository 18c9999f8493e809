// Hex comparator
//
// Deployed code and addresses are compared as hex text: case-folded, with an
// optional `0x` prefix removed. Empty input is a valid value ("no code here")
// and simply fails to match anything non-empty.

/// Strip an optional `0x`/`0X` prefix and lowercase the remainder
pub fn normalize_hex(value: &str) -> String {
    let trimmed = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    trimmed.to_ascii_lowercase()
}

/// Compare two hex strings modulo case and `0x` prefix
pub fn equal_hex(a: &str, b: &str) -> bool {
    normalize_hex(a) == normalize_hex(b)
}

/// Render raw bytes as a `0x`-prefixed lowercase hex string
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
