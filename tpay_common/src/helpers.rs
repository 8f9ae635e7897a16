/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Returns at most `max_chars` characters of `value`.
///
/// The gateway limits field lengths in characters, not bytes, so multibyte (e.g. Cyrillic) text is never split
/// in the middle of a code point.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_pos, _)) => value[..byte_pos].to_string(),
        None => value.to_string(),
    }
}
