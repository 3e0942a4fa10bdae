//! ML Parser Tags
//!
//! Tag-property oracle consumed by the parser

/// Classification of tag names. Names passed in are already normalized
/// (see [`normalize_tag_name`]).
pub trait HtmlTagRules {
    /// Void element: never has content or an end tag (`br`, `img`, ...)
    fn is_single_tag(&self, name: &str) -> bool;
    /// The end tag may be omitted (`p`, `li`, `td`, ...)
    fn is_optional_end(&self, name: &str) -> bool;
    fn is_block_tag(&self, name: &str) -> bool;
    /// Element that may only hold inline content (`p`, `h1`..`h6`, `pre`)
    fn is_inline_tag_container(&self, name: &str) -> bool;
    fn is_possibly_inline(&self, name: &str) -> bool;
    /// Opening `child` implicitly ends an open `parent`
    fn can_terminate(&self, child: &str, parent: &str) -> bool;
}

/// HTML tag names are matched case-insensitively
pub fn normalize_tag_name(name: &str) -> String {
    name.to_lowercase()
}
