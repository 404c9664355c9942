//! One-shot CSS injection for the highlight states.
//!
//! Installs the rules rendering the default highlight, the "current"
//! highlight, and their dark-theme variants. Markers pick up the default
//! state from their `mark` tag; the spotlighted marker additionally
//! carries the [`CURRENT_CLASS`] class.

use crate::dom::{Document, NodeId};
use crate::spotlight::CURRENT_CLASS;

/// Attribute marking the injected style element, so repeated installs
/// find the existing one instead of stacking duplicates.
pub const STYLE_MARKER_ATTR: &str = "data-pagemark-style";

const STYLE_TAG: &str = "style";

fn stylesheet() -> String {
    format!(
        "\
mark.{current} {{
  border-width: 2px;
  border-style: solid;
  padding: 5px;
}}

._theme-default mark.{current} {{
  border-color: #000;
}}

._theme-dark mark {{
  background-color: #fff;
  color: #000;
}}

._theme-dark mark.{current} {{
  background-color: #000;
  border-color: #fff;
  color: #fff;
}}
",
        current = CURRENT_CLASS
    )
}

/// Installs the highlight stylesheet into the document head.
///
/// Idempotent: returns the existing style element when already installed.
pub fn install_styles(document: &mut Document) -> NodeId {
    let head = document.head();
    let existing = document
        .children(head)
        .iter()
        .copied()
        .find(|&child| document.attribute(child, STYLE_MARKER_ATTR).is_some());
    if let Some(style) = existing {
        return style;
    }

    let style = document.append_element(head, STYLE_TAG);
    document.set_attribute(style, "type", "text/css");
    document.set_attribute(style, STYLE_MARKER_ATTR, "true");
    let css = stylesheet();
    document.append_text(style, css);
    style
}
