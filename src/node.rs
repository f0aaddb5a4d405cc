use std::ops::Deref;

/// Node corresponds to a single element in a [`SplayTree`] instance.
///
/// [`SplayTree`]: crate::SplayTree
pub(crate) struct Node<T> {
    pub(crate) elem: T,
    pub(crate) size: usize,                // store: nodes in this subtree
    pub(crate) left: Option<Box<Node<T>>>, // store: left child
    pub(crate) right: Option<Box<Node<T>>>, // store: right child
}

impl<T> Node<T> {
    // CREATE operation
    pub(crate) fn new(elem: T) -> Box<Node<T>> {
        Box::new(Node {
            elem,
            size: 1,
            left: None,
            right: None,
        })
    }

    #[inline]
    pub(crate) fn left_deref(&self) -> Option<&Node<T>> {
        self.left.as_ref().map(Deref::deref)
    }

    #[inline]
    pub(crate) fn right_deref(&self) -> Option<&Node<T>> {
        self.right.as_ref().map(Deref::deref)
    }

    #[inline]
    pub(crate) fn left_size(&self) -> usize {
        size(self.left_deref())
    }

    #[inline]
    pub(crate) fn right_size(&self) -> usize {
        size(self.right_deref())
    }

    /// Recompute size from the children, whose sizes must be exact.
    #[inline]
    pub(crate) fn update_size(&mut self) {
        self.size = 1 + self.left_size() + self.right_size();
    }

    /// Leftmost descendant, self included.
    pub(crate) fn leftmost(&self) -> &Node<T> {
        let mut node = self;
        while let Some(left) = node.left_deref() {
            node = left;
        }
        node
    }

    /// Rightmost descendant, self included.
    pub(crate) fn rightmost(&self) -> &Node<T> {
        let mut node = self;
        while let Some(right) = node.right_deref() {
            node = right;
        }
        node
    }

    /// Structural predecessor within this subtree.
    #[inline]
    pub(crate) fn prev(&self) -> Option<&Node<T>> {
        self.left_deref().map(Node::rightmost)
    }

    /// Structural successor within this subtree.
    #[inline]
    pub(crate) fn next(&self) -> Option<&Node<T>> {
        self.right_deref().map(Node::leftmost)
    }
}

#[inline]
pub(crate) fn size<T>(node: Option<&Node<T>>) -> usize {
    node.map_or(0, |node| node.size)
}
