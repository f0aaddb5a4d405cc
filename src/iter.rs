use std::iter::FusedIterator;

use crate::node::Node;
use crate::splay::SplayTree;

/// In-order iterator over a [`SplayTree`], borrowing the tree without
/// restructuring it.
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Iter<'a, T> {
        let mut iter = Iter { stack: vec![] };
        iter.push_left(root);
        iter
    }

    fn push_left(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(nref) = node {
            self.stack.push(nref);
            node = nref.left_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right_deref());
        Some(&node.elem)
    }
}

impl<'a, T> FusedIterator for Iter<'a, T> {}

/// Cursor walks the elements of `[low, high]` in ascending order.
///
/// The cursor keeps no reference into the tree, only a copy of the
/// last element it returned, and each step searches for the least
/// element greater than that copy. Hence the tree can be modified
/// between two steps, elements inserted ahead of the cursor are
/// visited and deleted ones are skipped.
///
/// ```
/// use splay_index::{Cursor, SplayTree};
///
/// let mut tree: SplayTree<i64> = SplayTree::with_ord("cursor");
/// for elem in vec![1, 3, 5, 7, 9] {
///     tree.insert(elem).unwrap();
/// }
/// let mut cursor = Cursor::new(2, 7);
/// assert_eq!(cursor.next(&mut tree), Some(3));
/// tree.insert(4).unwrap();
/// assert!(tree.delete(&5));
/// assert_eq!(cursor.next(&mut tree), Some(4));
/// assert_eq!(cursor.next(&mut tree), Some(7));
/// assert_eq!(cursor.next(&mut tree), None);
/// ```
#[derive(Clone, Debug)]
pub struct Cursor<T> {
    low: T,
    high: T,
    last: Option<T>,
    done: bool,
}

impl<T> Cursor<T>
where
    T: Clone,
{
    /// Create a cursor over `[low, high]`, both inclusive.
    pub fn new(low: T, high: T) -> Cursor<T> {
        Cursor {
            low,
            high,
            last: None,
            done: false,
        }
    }

    /// Return the element returned by the previous step.
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Step to the next element in `tree`. Once this returns None,
    /// it always returns None.
    pub fn next<F>(&mut self, tree: &mut SplayTree<T, F>) -> Option<T>
    where
        F: Fn(&T, &T) -> bool,
    {
        if self.done {
            return None;
        }

        let found = match &self.last {
            None => tree.find_least_ge(&self.low),
            Some(last) => tree.find_least_gt(last),
        };
        let item = match tree.current() {
            Some(elem) if found && tree.le(elem, &self.high) => Some(elem.clone()),
            _ => None,
        };

        match item {
            Some(elem) => {
                self.last = Some(elem.clone());
                Some(elem)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// Iterator over `[low, high]`, created by [`SplayTree::range`]. Each
/// step splays the returned element to the root.
pub struct Range<'a, T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    tree: &'a mut SplayTree<T, F>,
    cursor: Cursor<T>,
}

impl<'a, T, F> Range<'a, T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    pub(crate) fn new(tree: &'a mut SplayTree<T, F>, cursor: Cursor<T>) -> Range<'a, T, F> {
        Range { tree, cursor }
    }
}

impl<'a, T, F> Iterator for Range<'a, T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next(self.tree)
    }
}

impl<'a, T, F> FusedIterator for Range<'a, T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
}
