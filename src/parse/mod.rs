//! Filename grammar for part images
//!
//! The cutting machines store one preview image per part, and the filename
//! stem carries the manufacturing metadata: a parenthesized quantity, a
//! marker-introduced thickness/grade field group, and an engraving mark.
//! A typical stem looks like `700 bracket#2,5_Stal_gr(4)`.
//!
//! Parsing is total: a field that cannot be decoded falls back to its
//! sentinel so one legacy or malformed name never aborts a whole folder.

/// Token delimiter within a normalized name.
const SEPARATOR: char = '_';

/// Introduces the thickness/sheet-type field group.
const MARKER: char = '#';

/// Substring marking a part for the engraving station.
const ENGRAVE_MARK: &str = "gr";

/// Alloy code whose grade name may continue one token further.
const ALLOY_CODE: &str = "almg3";

/// Thickness sentinel for names that do not encode one.
pub const THICKNESS_UNKNOWN: f64 = 999.0;

/// Sheet-type sentinel for names that do not encode one.
pub const SHEET_UNKNOWN: &str = "???";

/// Fields decoded from one filename stem.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    pub count: u32,
    pub thickness: f64,
    pub sheet: String,
    pub engraver: bool,
}

/// Decode a filename stem (extension already stripped). Never fails.
pub fn parse_stem(stem: &str) -> ParsedName {
    let name = normalize(stem);
    let tokens = marker_tokens(&name);

    ParsedName {
        count: parse_count(&name),
        thickness: tokens
            .as_deref()
            .map_or(THICKNESS_UNKNOWN, parse_thickness),
        sheet: tokens
            .as_deref()
            .map_or_else(|| SHEET_UNKNOWN.to_string(), parse_sheet),
        engraver: name.to_ascii_lowercase().contains(ENGRAVE_MARK),
    }
}

/// Canonical token form: spaces become separators, a stray separator right
/// after the marker is dropped, a trailing separator terminates the last
/// field, and doubled separators collapse.
fn normalize(stem: &str) -> String {
    let mut name = stem.replace(' ', "_").replace("#_", "#");
    name.push(SEPARATOR);
    while name.contains("__") {
        name = name.replace("__", "_");
    }
    name
}

/// First parenthesized run of digits anywhere in the name; 1 when absent.
fn parse_count(name: &str) -> u32 {
    for (open, _) in name.match_indices('(') {
        let rest = &name[open + 1..];
        let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits > 0 && rest[digits..].starts_with(')') {
            return rest[..digits].parse().unwrap_or(1);
        }
    }
    1
}

/// Separator-split tokens following the first marker. The trailing separator
/// appended by [`normalize`] guarantees at least one token after the marker.
fn marker_tokens(name: &str) -> Option<Vec<&str>> {
    let at = name.find(MARKER)?;
    Some(name[at + MARKER.len_utf8()..].split(SEPARATOR).collect())
}

/// The token directly after the marker, with a comma accepted as the decimal
/// point.
fn parse_thickness(tokens: &[&str]) -> f64 {
    tokens
        .first()
        .and_then(|t| t.replace(',', ".").parse().ok())
        .unwrap_or(THICKNESS_UNKNOWN)
}

/// The grade token after the thickness token, with the alloy-code special
/// cases applied.
fn parse_sheet(tokens: &[&str]) -> String {
    let grade = match tokens.get(1) {
        Some(t) if !t.is_empty() => (*t).to_string(),
        _ => return SHEET_UNKNOWN.to_string(),
    };

    let lower = grade.to_ascii_lowercase();
    if lower.ends_with(ALLOY_CODE) {
        // The bare alloy code may carry a concrete grade name one token
        // further (`AlMg3_H111`). The engraving mark is not a grade name.
        match tokens.get(2) {
            Some(next) if !next.is_empty() && !next.eq_ignore_ascii_case(ENGRAVE_MARK) => {
                format!("{} {}", grade, next)
            }
            _ => grade,
        }
    } else if let Some(at) = lower.find(ALLOY_CODE) {
        // Code buried mid-token: split the grade name off with a space,
        // consuming nothing.
        let cut = at + ALLOY_CODE.len();
        format!("{} {}", &grade[..cut], &grade[cut..])
    } else {
        grade
    }
}
