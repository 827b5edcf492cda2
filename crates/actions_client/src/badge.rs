//! Status badge label extraction
//!
//! A workflow badge is a small SVG whose last `<text>` element carries the
//! status label ("passing", "failing", ...). Earlier text elements hold the
//! workflow name and drop shadows.

use roxmltree::Document;

use crate::error::BadgeError;

/// Returns the trimmed content of the document's last `<text>` element
pub fn extract_label(svg: &str) -> Result<String, BadgeError> {
    let document = Document::parse(svg).map_err(|e| BadgeError::Parse(e.to_string()))?;
    let last_text = document
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "text")
        .last()
        .ok_or(BadgeError::NoText)?;

    let label: String = last_text
        .descendants()
        .filter(|node| node.is_text())
        .filter_map(|node| node.text())
        .collect();
    Ok(label.trim().to_string())
}
