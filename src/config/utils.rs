/// Parse a boolean flag from an environment value
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off"
/// (case insensitive, surrounding whitespace ignored)
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
