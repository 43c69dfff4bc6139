//! Rule-based extraction stages for ILS alarm faxes.

pub mod address;
pub mod normalize;
pub mod patterns;
pub mod resources;
pub mod sections;

pub use address::resolve_address;
pub use normalize::normalize;
pub use resources::ResourceRules;
pub use sections::segment;

/// Escape HTML special characters.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
