//! Page lookup and exportable-node collection.

use iconsync_core::{ExportableNode, RemoteNode};

use crate::SyncError;

/// Find the top-level page named `page_name`.
///
/// Only direct children of `root` with kind `CANVAS` are
/// candidates. On a miss the error lists every page name that does exist.
pub fn find_page<'a>(root: &'a RemoteNode, page_name: &str) -> Result<&'a RemoteNode, SyncError> {
    root.pages()
        .find(|page| page.name == page_name)
        .ok_or_else(|| SyncError::PageNotFound {
            page: page_name.to_string(),
            available: root.pages().map(|p| p.name.clone()).collect(),
        })
}

/// Pre-order walk of `page` collecting every component and instance.
///
/// Uses an explicit stack, so tree depth is bounded only by memory.
pub fn collect_exportable(page: &RemoteNode) -> Vec<ExportableNode> {
    let mut found = Vec::new();
    let mut stack: Vec<&RemoteNode> = vec![page];
    while let Some(node) = stack.pop() {
        if node.kind.is_exportable() {
            found.push(ExportableNode::from(node));
        }
        // Reverse so the leftmost child is visited first.
        stack.extend(node.children.iter().rev());
    }
    found
}

/// [`find_page`] followed by [`collect_exportable`].
pub fn collect(root: &RemoteNode, page_name: &str) -> Result<Vec<ExportableNode>, SyncError> {
    let page = find_page(root, page_name)?;
    Ok(collect_exportable(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use iconsync_core::{NodeId, NodeKind};

    fn node(id: &str, name: &str, kind: NodeKind, children: Vec<RemoteNode>) -> RemoteNode {
        RemoteNode {
            id: NodeId::from(id),
            name: name.to_string(),
            kind,
            children,
        }
    }

    fn document(pages: Vec<RemoteNode>) -> RemoteNode {
        node("0:0", "Document", NodeKind::Document, pages)
    }

    #[test]
    fn preorder_traversal_order() {
        let page = node(
            "1:0",
            "Icons",
            NodeKind::Canvas,
            vec![
                node(
                    "1:1",
                    "Group",
                    NodeKind::Other,
                    vec![
                        node("1:2", "a", NodeKind::Component, vec![]),
                        node(
                            "1:3",
                            "b",
                            NodeKind::Component,
                            vec![node("1:4", "b-inner", NodeKind::Instance, vec![])],
                        ),
                    ],
                ),
                node("1:5", "c", NodeKind::Instance, vec![]),
            ],
        );
        let root = document(vec![page]);

        let names: Vec<_> = collect(&root, "Icons")
            .unwrap()
            .into_iter()
            .map(|n| n.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "b-inner", "c"]);
    }

    #[test]
    fn missing_page_lists_available_pages() {
        let root = document(vec![
            node("1:0", "Cover", NodeKind::Canvas, vec![]),
            node("2:0", "Glyphs", NodeKind::Canvas, vec![]),
        ]);
        let err = collect(&root, "Icons").expect_err("no Icons page");
        match err {
            SyncError::PageNotFound { page, available } => {
                assert_eq!(page, "Icons");
                assert_eq!(available, vec!["Cover", "Glyphs"]);
            }
            other => panic!("expected PageNotFound, got {other:?}"),
        }
    }

    #[test]
    fn non_canvas_with_matching_name_is_not_a_page() {
        let root = document(vec![node("1:0", "Icons", NodeKind::Other, vec![])]);
        assert!(matches!(
            find_page(&root, "Icons"),
            Err(SyncError::PageNotFound { .. })
        ));
    }

    #[test]
    fn nested_pages_are_not_matched() {
        let inner = node("2:0", "Icons", NodeKind::Canvas, vec![]);
        let root = document(vec![node("1:0", "Cover", NodeKind::Canvas, vec![inner])]);
        assert!(find_page(&root, "Icons").is_err());
    }

    #[test]
    fn empty_page_collects_nothing() {
        let root = document(vec![node("1:0", "Icons", NodeKind::Canvas, vec![])]);
        assert!(collect(&root, "Icons").unwrap().is_empty());
    }

    #[test]
    fn deep_tree_does_not_overflow() {
        let mut current = node("leaf", "leaf", NodeKind::Component, vec![]);
        for i in 0..50_000 {
            current = node(&format!("n{i}"), "wrap", NodeKind::Other, vec![current]);
        }
        let page = node("1:0", "Icons", NodeKind::Canvas, vec![current]);
        let found = collect_exportable(&page);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "leaf");
        // Dismantle iteratively; the derived Drop would recurse.
        let mut stack = vec![page];
        while let Some(mut n) = stack.pop() {
            stack.append(&mut n.children);
        }
    }
}
