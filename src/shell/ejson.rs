use lazy_static::lazy_static;
use regex::Regex;

/// JSON string that replaces every shell-only extended type literal
pub const EXTENDED_TYPE_PLACEHOLDER: &str = "\"extended\"";

lazy_static! {
    static ref EXTENDED_TYPE_RE: Regex = Regex::new(
        r"(Timestamp|NumberLong|NumberInt|NumberDecimal|BinData|Binary\.createFromBase64|Long|ObjectId|ISODate)\([^\)]*\)"
    )
    .expect("static regex");
}

/// Replace shell-style extended type constructors such as
/// `Timestamp(1711095775, 2)` or `BinData(0, "...")` with a plain JSON string
/// so the legacy shell's output can be parsed as JSON.
///
/// Canonical extended JSON (`{"$timestamp": {...}}`) is already valid JSON
/// and passes through unchanged.
pub fn normalize_extended_types(raw: &str) -> String {
    EXTENDED_TYPE_RE
        .replace_all(raw, EXTENDED_TYPE_PLACEHOLDER)
        .into_owned()
}
