//! Number parsing for command-line arguments.

/// Parses an unsigned number written in decimal or `0x`-prefixed hex, with
/// optional `_` separators.
fn parse_number(s: &str) -> Result<u64, String> {
    let digits: String = s.trim().chars().filter(|&c| c != '_').collect();
    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => digits.parse(),
    };
    parsed.map_err(|e| format!("invalid number `{s}`: {e}"))
}

/// Parses a 32-bit physical address.
pub fn parse_u32(s: &str) -> Result<u32, String> {
    let value = parse_number(s)?;
    u32::try_from(value).map_err(|_| format!("`{s}` does not fit in 32 bits"))
}

/// Parses a byte count.
pub fn parse_usize(s: &str) -> Result<usize, String> {
    let value = parse_number(s)?;
    usize::try_from(value).map_err(|_| format!("`{s}` is too large"))
}
