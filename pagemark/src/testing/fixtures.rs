//! Document fixtures.

use crate::dom::{Document, NodeId, SharedDocument};

/// Builds a shared document whose content root holds one paragraph per
/// entry of `paragraphs`.
#[must_use]
pub fn article(paragraphs: &[&str]) -> SharedDocument {
    let mut document = Document::new();
    let main = document.content_root();
    for text in paragraphs {
        let p = document.append_element(main, "p");
        document.append_text(p, *text);
    }
    document.into_shared()
}

/// Appends a visible paragraph under the content root and returns its id.
pub fn append_paragraph(document: &SharedDocument, text: &str) -> NodeId {
    let mut doc = document.write();
    let main = doc.content_root();
    let p = doc.append_element(main, "p");
    doc.append_text(p, text);
    p
}

/// Appends an invisible paragraph under the content root.
pub fn append_hidden_paragraph(document: &SharedDocument, text: &str) -> NodeId {
    let p = append_paragraph(document, text);
    document.write().set_visible(p, false);
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn article_builds_paragraphs_in_order() {
        let document = article(&["first", "second"]);
        let doc = document.read();
        let paragraphs = doc.elements_by_tag(doc.content_root(), "p");
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(doc.text_content(paragraphs[0]), "first");
        assert_eq!(doc.text_content(paragraphs[1]), "second");
    }

    #[test]
    fn hidden_paragraphs_are_invisible() {
        let document = article(&[]);
        let p = append_hidden_paragraph(&document, "secret");
        assert!(!document.read().is_visible(p));
    }
}
