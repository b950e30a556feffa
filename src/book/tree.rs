//! The book's page tree, stored as an arena of nodes addressed by [`Uid`].

use std::fmt;

/// Identifier of a page in the book.
///
/// Uids are arena indices, handed out in creation order starting at 0. The
/// packager names each page's file `<uid>.xhtml`, so a uid doubles as the
/// page's link target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uid(pub u32);

impl Uid {
    fn index(self) -> usize {
        self.0 as usize
    }

    /// Uid for the node stored at `index`. Uids are 32 bits wide; indices
    /// past `u32::MAX` saturate, so such pages share the last uid.
    fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(n) => Uid(n),
            Err(_) => {
                log::error!("page tree holds more than {} pages", u32::MAX);
                Uid(u32::MAX)
            }
        }
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of the book: a table of contents entry with a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub uid: Uid,
    pub title: String,
    /// Page body, HTML.
    pub content: String,
    /// Child pages, in reading order.
    pub children: Vec<Uid>,
}

/// Ordered forest of pages.
///
/// Every node has at most one parent and is only ever appended below an
/// existing node, so the structure cannot contain cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTree {
    nodes: Vec<TreeNode>,
    roots: Vec<Uid>,
}

impl PageTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new page under `parent`, or as a new top-level page.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        parent: Option<Uid>,
    ) -> Uid {
        let uid = Uid::from_index(self.nodes.len());
        self.nodes.push(TreeNode {
            uid,
            title: title.into(),
            content: content.into(),
            children: Vec::new(),
        });

        match parent.and_then(|p| self.nodes.get_mut(p.index())) {
            Some(parent_node) => parent_node.children.push(uid),
            None => {
                if let Some(p) = parent {
                    log::warn!("unknown parent page {p}, adding page {uid} at the top level");
                }
                self.roots.push(uid);
            }
        }
        uid
    }

    /// Get a node by uid.
    pub fn node(&self, uid: Uid) -> Option<&TreeNode> {
        self.nodes.get(uid.index())
    }

    pub(crate) fn node_mut(&mut self, uid: Uid) -> Option<&mut TreeNode> {
        self.nodes.get_mut(uid.index())
    }

    /// Top-level pages, in reading order.
    pub fn roots(&self) -> &[Uid] {
        &self.roots
    }

    /// Children of a page, in reading order.
    pub fn children(&self, uid: Uid) -> &[Uid] {
        self.node(uid).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every uid in document (pre-)order, each exactly once.
    pub fn flatten(&self) -> Vec<Uid> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<Uid> = self.roots.iter().rev().copied().collect();
        while let Some(uid) = stack.pop() {
            out.push(uid);
            stack.extend(self.children(uid).iter().rev());
        }
        out
    }

    /// Nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.flatten().into_iter().filter_map(|uid| self.node(uid))
    }

    /// Depth of the deepest page (a lone top-level page has depth 1).
    pub fn depth(&self) -> usize {
        fn depth_of(tree: &PageTree, uid: Uid) -> usize {
            1 + tree
                .children(uid)
                .iter()
                .map(|&c| depth_of(tree, c))
                .max()
                .unwrap_or(0)
        }
        self.roots
            .iter()
            .map(|&r| depth_of(self, r))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uids_are_sequential() {
        let mut tree = PageTree::new();
        let a = tree.add("A", "", None);
        let b = tree.add("B", "", Some(a));
        assert_eq!((a, b), (Uid(0), Uid(1)));
        assert_eq!(tree.roots(), &[a]);
        assert_eq!(tree.children(a), &[b]);
    }

    #[test]
    fn test_uid_from_index_saturates() {
        assert_eq!(Uid::from_index(7), Uid(7));
        assert_eq!(Uid::from_index(u32::MAX as usize), Uid(u32::MAX));
        if let Some(past) = (u32::MAX as usize).checked_add(1) {
            assert_eq!(Uid::from_index(past), Uid(u32::MAX));
        }
    }

    #[test]
    fn test_flatten_is_document_order() {
        let mut tree = PageTree::new();
        let a = tree.add("A", "", None);
        let b = tree.add("B", "", None);
        let a1 = tree.add("A1", "", Some(a));
        let b1 = tree.add("B1", "", Some(b));
        let a2 = tree.add("A2", "", Some(a));
        let a1x = tree.add("A1x", "", Some(a1));

        assert_eq!(tree.flatten(), vec![a, a1, a1x, a2, b, b1]);
        let titles: Vec<_> = tree.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "A1", "A1x", "A2", "B", "B1"]);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_unknown_parent_falls_back_to_root() {
        let mut tree = PageTree::new();
        let uid = tree.add("Orphan", "", Some(Uid(99)));
        assert_eq!(tree.roots(), &[uid]);
    }

    #[test]
    fn test_uid_display() {
        assert_eq!(format!("{}.xhtml", Uid(7)), "7.xhtml");
    }
}
