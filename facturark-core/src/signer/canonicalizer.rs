//! Exclusive XML canonicalization (1.0, without comments).
use super::SignerError;
use libxml::tree::{
    Document, Node,
    c14n::{CanonicalizationMode, CanonicalizationOptions},
};

fn options() -> CanonicalizationOptions {
    CanonicalizationOptions {
        mode: CanonicalizationMode::ExclusiveCanonical1_0,
        inclusive_ns_prefixes: vec![],
        with_comments: false,
    }
}

/// Canonical form of a whole document (the XML declaration is never part of it).
pub fn canonicalize(document: &Document) -> Result<String, SignerError> {
    document
        .canonicalize(options(), None)
        .map_err(|e| SignerError::Canonicalization(format!("failed to canonicalize xml: {e:?}")))
}

/// Canonical form of the subtree rooted at `element`.
///
/// Exclusive canonicalization does not depend on the element's ancestors, so the subtree is
/// copied out of a duplicate of `document` and canonicalized on its own. The source document is
/// not modified.
pub fn canonicalize_element(document: &Document, element: &Node) -> Result<String, SignerError> {
    let path = element_path(element);

    let copy = document
        .dup()
        .map_err(|e| SignerError::Canonicalization(format!("failed to duplicate xml: {e:?}")))?;
    let mut node = copy
        .get_root_element()
        .ok_or_else(|| SignerError::MissingElement("document has no root element".into()))?;
    for index in path {
        node = node
            .get_child_elements()
            .into_iter()
            .nth(index)
            .ok_or_else(|| SignerError::MissingElement("element not found in copy".into()))?;
    }

    node.unlink();
    let mut detached = Document::new()
        .map_err(|e| SignerError::Canonicalization(format!("failed to create document: {e:?}")))?;
    let root = detached
        .import_node(&mut node)
        .map_err(|e| SignerError::Canonicalization(format!("failed to copy element: {e:?}")))?;
    detached.set_root_element(&root);
    canonicalize(&detached)
}

// Child-element indexes leading from the root element down to `element`.
fn element_path(element: &Node) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = element.clone();
    while let Some(parent) = current.get_parent() {
        if !parent.is_element_node() {
            break;
        }
        if let Some(index) = parent
            .get_child_elements()
            .iter()
            .position(|child| *child == current)
        {
            path.push(index);
        }
        current = parent;
    }
    path.reverse();
    path
}
