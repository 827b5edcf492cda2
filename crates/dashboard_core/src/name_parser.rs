//! Naming convention parser
//!
//! Workflow names of the form `Group - Category - Display Name` carry their
//! own place in the dashboard hierarchy. Anything else lands in
//! `Uncategorized / Other`.

pub const NAME_DELIMITER: &str = " - ";
pub const UNCATEGORIZED: &str = "Uncategorized";
pub const OTHER_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub group: String,
    pub category: String,
    pub display_name: String,
}

/// Splits a raw workflow name into group, category and display name.
///
/// Everything after the second delimiter is the display name, so a display
/// name may itself contain the delimiter. A group or category cannot.
pub fn parse(raw_name: &str) -> ParsedName {
    let segments: Vec<&str> = raw_name.split(NAME_DELIMITER).collect();
    if segments.len() >= 3 {
        ParsedName {
            group: segments[0].to_string(),
            category: segments[1].to_string(),
            display_name: segments[2..].join(NAME_DELIMITER),
        }
    } else {
        ParsedName {
            group: UNCATEGORIZED.to_string(),
            category: OTHER_CATEGORY.to_string(),
            display_name: raw_name.to_string(),
        }
    }
}
