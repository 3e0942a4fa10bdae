//! Tag matching
//!
//! Decides whether opening a tag implicitly closes a tag that is still open

use super::tags::HtmlTagRules;

fn is_table_section(name: &str) -> bool {
    matches!(name, "thead" | "tbody" | "tfoot")
}

/// Does opening `child` terminate the open `parent`?
///
/// `Some(false)` pins the answer for table, list and definition-list
/// structure regardless of the generic tables. `None` means this pairing
/// has no opinion and the caller should look further out.
pub fn child_terminates_parent(child: &str, parent: &str, rules: &dyn HtmlTagRules) -> Option<bool> {
    let is_cell = matches!(child, "td" | "th");
    let is_row = child == "tr";
    let is_section = is_table_section(child);

    let parent_is_table = parent == "table";
    let parent_is_section = is_table_section(parent);

    if (is_cell && (parent == "tr" || parent_is_section || parent_is_table))
        || (is_row && (parent_is_section || parent_is_table))
        || (is_section && parent_is_table)
    {
        return Some(false);
    }

    if child == "li" && matches!(parent, "ul" | "ol") {
        return Some(false);
    }

    if parent == "dl" && matches!(child, "dd" | "dt") {
        return Some(false);
    }

    if rules.can_terminate(child, parent) {
        return Some(true);
    }

    None
}

/// Scan `stack` (outermost first) from the innermost entry outward and
/// return the first definite answer of `policy`. The policy receives the
/// parent name and its 1-based stack level.
pub fn child_terminates_parent_in_stack<'a, I, F>(child: &str, stack: I, mut policy: F) -> bool
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: DoubleEndedIterator + ExactSizeIterator,
    F: FnMut(&str, &str, usize) -> Option<bool>,
{
    stack
        .into_iter()
        .enumerate()
        .rev()
        .find_map(|(idx, parent)| policy(child, parent, idx + 1))
        .unwrap_or(false)
}
