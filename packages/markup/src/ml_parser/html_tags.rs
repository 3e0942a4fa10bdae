//! HTML Tag Definitions
//!
//! Default classification tables for HTML tags

use std::collections::{HashMap, HashSet};

use bitflags::bitflags;
use once_cell::sync::Lazy;

use super::tags::HtmlTagRules;

bitflags! {
    /// Static properties of an HTML tag
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TagFlags: u8 {
        const SINGLE = 0b0000_0001;
        const OPTIONAL_END = 0b0000_0010;
        const BLOCK = 0b0000_0100;
        const INLINE_CONTAINER = 0b0000_1000;
        const POSSIBLY_INLINE = 0b0001_0000;
    }
}

/// HTML tag definition with specific parsing rules
#[derive(Debug, Clone, Default)]
pub struct HtmlTagDefinition {
    pub flags: TagFlags,
    /// Opening one of these tags implicitly ends this one
    pub closed_by_children: HashSet<String>,
}

impl HtmlTagDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(mut self, flags: TagFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_closed_by_children(mut self, children: &[&str]) -> Self {
        self.closed_by_children
            .extend(children.iter().map(|child| child.to_lowercase()));
        self
    }

    pub fn is_closed_by_child(&self, name: &str) -> bool {
        self.closed_by_children.contains(name)
    }
}

const SINGLE_TAGS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "embed", "frame", "hr", "img", "input", "isindex",
    "link", "meta", "param", "source", "track", "wbr",
];

const OPTIONAL_END_TAGS: &[&str] = &[
    "html", "head", "body", "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p",
    "rb", "rp", "rt", "rtc", "tbody", "td", "tfoot", "th", "thead", "tr",
];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "dir", "div", "dl", "fieldset",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "isindex",
    "main", "menu", "nav", "noframes", "noscript", "ol", "p", "pre", "section", "table", "ul",
];

const INLINE_CONTAINERS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6", "pre"];

const POSSIBLY_INLINE_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "applet", "b", "basefont", "bdo", "big", "br", "button", "cite",
    "code", "del", "dfn", "em", "font", "i", "iframe", "img", "input", "ins", "kbd", "label",
    "map", "object", "q", "s", "samp", "select", "small", "span", "strike", "strong", "sub",
    "sup", "textarea", "tt", "u", "var",
];

const P_CLOSERS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dir", "div", "dl", "fieldset", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "main", "menu", "nav", "ol", "p",
    "pre", "section", "table", "ul",
];

const RUBY_CLOSERS: &[&str] = &["rb", "rt", "rtc", "rp"];

/// Tag definitions registry
static TAG_DEFINITIONS: Lazy<HashMap<String, HtmlTagDefinition>> = Lazy::new(|| {
    let mut defs: HashMap<String, HtmlTagDefinition> = HashMap::new();

    let tables = [
        (SINGLE_TAGS, TagFlags::SINGLE),
        (OPTIONAL_END_TAGS, TagFlags::OPTIONAL_END),
        (BLOCK_TAGS, TagFlags::BLOCK),
        (INLINE_CONTAINERS, TagFlags::INLINE_CONTAINER),
        (POSSIBLY_INLINE_TAGS, TagFlags::POSSIBLY_INLINE),
    ];
    for (names, flags) in tables {
        for name in names {
            let def = defs.remove(*name).unwrap_or_default().with_flags(flags);
            defs.insert(name.to_string(), def);
        }
    }

    let closers: &[(&str, &[&str])] = &[
        ("p", P_CLOSERS),
        ("li", &["li"]),
        ("dt", &["dt", "dd"]),
        ("dd", &["dt", "dd"]),
        ("td", &["td", "th", "tr", "thead", "tbody", "tfoot"]),
        ("th", &["td", "th", "tr", "thead", "tbody", "tfoot"]),
        ("tr", &["tr", "thead", "tbody", "tfoot"]),
        ("thead", &["tbody", "tfoot"]),
        ("tbody", &["tbody", "tfoot"]),
        ("tfoot", &["tbody"]),
        ("option", &["option", "optgroup"]),
        ("optgroup", &["optgroup"]),
        ("head", &["body"]),
        ("rb", RUBY_CLOSERS),
        ("rt", RUBY_CLOSERS),
        ("rtc", &["rb", "rtc", "rp"]),
        ("rp", RUBY_CLOSERS),
    ];
    for (name, children) in closers {
        let def = defs
            .remove(*name)
            .unwrap_or_default()
            .with_closed_by_children(children);
        defs.insert(name.to_string(), def);
    }

    defs
});

static DEFAULT_DEFINITION: Lazy<HtmlTagDefinition> = Lazy::new(HtmlTagDefinition::new);

/// Definition for a normalized tag name; unknown tags get an empty definition
pub fn get_html_tag_definition(tag_name: &str) -> &'static HtmlTagDefinition {
    TAG_DEFINITIONS
        .get(tag_name)
        .or_else(|| TAG_DEFINITIONS.get(&tag_name.to_lowercase()))
        .unwrap_or_else(|| &*DEFAULT_DEFINITION)
}

/// [`HtmlTagRules`] backed by the static HTML tables
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHtmlTagRules;

impl DefaultHtmlTagRules {
    fn has(&self, name: &str, flag: TagFlags) -> bool {
        get_html_tag_definition(name).flags.contains(flag)
    }
}

impl HtmlTagRules for DefaultHtmlTagRules {
    fn is_single_tag(&self, name: &str) -> bool {
        self.has(name, TagFlags::SINGLE)
    }

    fn is_optional_end(&self, name: &str) -> bool {
        self.has(name, TagFlags::OPTIONAL_END)
    }

    fn is_block_tag(&self, name: &str) -> bool {
        self.has(name, TagFlags::BLOCK)
    }

    fn is_inline_tag_container(&self, name: &str) -> bool {
        self.has(name, TagFlags::INLINE_CONTAINER)
    }

    fn is_possibly_inline(&self, name: &str) -> bool {
        self.has(name, TagFlags::POSSIBLY_INLINE)
    }

    fn can_terminate(&self, child: &str, parent: &str) -> bool {
        get_html_tag_definition(parent).is_closed_by_child(child)
    }
}
