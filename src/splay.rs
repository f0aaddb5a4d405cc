use std::{cmp::Ordering, fmt, mem};

use log::debug;
use rand::Rng;

use crate::depth::Depth;
use crate::error::SplayError;
use crate::iter::{Cursor, Iter, Range};
use crate::node::{self, Node};

/// Comparator used by trees built with [`SplayTree::with_ord`].
pub type OrdLe<T> = fn(&T, &T) -> bool;

fn le_ord<T: Ord>(a: &T, b: &T) -> bool {
    a <= b
}

/// SplayTree manage a single instance of in-memory ordered set using
/// a size augmented, [top-down splay tree][splay].
///
/// Elements are ordered by a caller supplied predicate `le(a, b)`,
/// "a is less than or equal to b". Two elements are equal when each
/// is less than or equal to the other, and equal elements are
/// rejected on insert. Every node tracks the size of its subtree,
/// which gives rank and range-count queries in amortized logarithmic
/// time.
///
/// Lookups restructure the tree, hence most read operations take
/// `&mut self`. The element located by the last search sits at the
/// root and is read back with [`SplayTree::current`].
///
/// ```
/// use splay_index::SplayTree;
///
/// let mut tree: SplayTree<i64> = SplayTree::with_ord("scores");
/// for elem in vec![5, 3, 8, 1, 4] {
///     tree.insert(elem).unwrap();
/// }
/// assert_eq!(tree.count(&3, &8), 4);
/// assert!(tree.find_least_ge(&6));
/// assert_eq!(tree.current(), Some(&8));
/// ```
///
/// [splay]: https://en.wikipedia.org/wiki/Splay_tree
pub struct SplayTree<T, F = OrdLe<T>>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    name: String,
    root: Option<Box<Node<T>>>,
    min: Option<T>, // copy of the leftmost element.
    max: Option<T>, // copy of the rightmost element.
    le: F,
}

/// Different ways to construct a new SplayTree instance.
impl<T, F> SplayTree<T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    /// Create an empty instance of SplayTree, identified by `name` and
    /// ordered by `le`. Applications can choose unique names.
    pub fn new<S>(name: S, le: F) -> SplayTree<T, F>
    where
        S: AsRef<str>,
    {
        SplayTree {
            name: name.as_ref().to_string(),
            root: Default::default(),
            min: Default::default(),
            max: Default::default(),
            le,
        }
    }

    /// Create a new instance of SplayTree and load it with elements
    /// from `iter`. Elements must be ``unique``, the first duplicate
    /// aborts the load.
    pub fn load_from<S, I>(name: S, le: F, iter: I) -> Result<SplayTree<T, F>, SplayError<T>>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = T>,
    {
        let mut tree = SplayTree::new(name, le);
        for elem in iter {
            tree.insert(elem)?;
        }
        Ok(tree)
    }
}

impl<T> SplayTree<T>
where
    T: Clone + Ord,
{
    /// Create an empty instance of SplayTree ordered by `T`'s own
    /// [`Ord`] implementation.
    pub fn with_ord<S>(name: S) -> SplayTree<T>
    where
        S: AsRef<str>,
    {
        let le: OrdLe<T> = le_ord::<T>;
        SplayTree::new(name, le)
    }
}

/// Maintenance API.
impl<T, F> SplayTree<T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    /// Identify this instance. Applications can choose unique names while
    /// creating SplayTree instances.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Return number of elements in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        node::size(self.root.as_deref())
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        // dismantle iteratively, a splay tree can be as deep as it is large.
        let mut stack: Vec<Box<Node<T>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
        self.min = None;
        self.max = None;
    }

    /// Return quickly with basic statisics, only entries() method is valid
    /// with this statisics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.len(), mem::size_of::<Node<T>>())
    }

    #[inline]
    pub(crate) fn le(&self, a: &T, b: &T) -> bool {
        (self.le)(a, b)
    }

    #[inline]
    fn same(&self, a: &T, b: &T) -> bool {
        (self.le)(a, b) && (self.le)(b, a)
    }
}

/// Write operations on SplayTree instance.
impl<T, F> SplayTree<T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    /// Insert a new element into the index. If an equal element is
    /// already present return [`SplayError::DuplicateKey`], handing back
    /// `elem`. On success the new element is the root.
    pub fn insert(&mut self, elem: T) -> Result<(), SplayError<T>> {
        let root = match self.root.take() {
            Some(root) => root,
            None => {
                self.min = Some(elem.clone());
                self.max = Some(elem.clone());
                self.root = Some(Node::new(elem));
                return Ok(());
            }
        };

        let mut t = SplayTree::splay_node(root, &elem, &self.le);
        if self.same(&t.elem, &elem) {
            self.root = Some(t);
            debug!("{}: insert rejected, duplicate key", self.name);
            return Err(SplayError::DuplicateKey(elem));
        }

        let mut node = Node::new(elem);
        if (self.le)(&t.elem, &node.elem) {
            node.right = t.right.take();
            t.update_size();
            node.left = Some(t);
        } else {
            node.left = t.left.take();
            t.update_size();
            node.right = Some(t);
        }
        node.update_size();

        if node.left.is_none() {
            self.min = Some(node.elem.clone());
        }
        if node.right.is_none() {
            self.max = Some(node.elem.clone());
        }
        self.root = Some(node);
        Ok(())
    }

    /// Delete element equal to `elem` from this instance. Return false
    /// if there is no such element.
    pub fn delete(&mut self, elem: &T) -> bool {
        let root = match self.root.take() {
            Some(root) => root,
            None => {
                debug!("{}: delete on empty index", self.name);
                return false;
            }
        };

        let total = root.size;
        let mut t = SplayTree::splay_node(root, elem, &self.le);
        if !self.same(&t.elem, elem) {
            self.root = Some(t);
            debug!("{}: delete failed, element not found", self.name);
            return false;
        }

        self.root = match (t.left.take(), t.right.take()) {
            (None, None) => None,
            (None, Some(right)) => {
                self.min = Some(right.leftmost().elem.clone());
                Some(right)
            }
            (Some(left), None) => {
                self.max = Some(left.rightmost().elem.clone());
                Some(left)
            }
            (Some(left), Some(right)) => {
                // `elem` exceeds everything on the left, its maximum surfaces.
                let mut node = SplayTree::splay_node(left, elem, &self.le);
                debug_assert!(node.right.is_none());
                node.right = Some(right);
                Some(node)
            }
        };

        match self.root.as_mut() {
            Some(root) => root.size = total - 1,
            None => {
                self.min = None;
                self.max = None;
            }
        }
        true
    }

    /// Validate SplayTree with following rules:
    ///
    /// * Every node's size is one more than the sizes of its children.
    /// * Elements are in strictly ascending order.
    /// * Cached minimum and maximum match the tree's end points.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, SplayError<T>> {
        let root = self.root.as_deref();
        let mut stats = Stats::new(self.len(), mem::size_of::<Node<T>>());
        let mut depths = Depth::new();
        SplayTree::<T, F>::validate_tree(root, &mut depths)?;
        stats.set_depths(depths);

        let mut iter = self.iter();
        if let Some(mut prev) = iter.next() {
            for elem in iter {
                if !(self.le)(prev, elem) || (self.le)(elem, prev) {
                    return Err(SplayError::SortError(prev.clone(), elem.clone()));
                }
                prev = elem;
            }
        }

        let first = root.map(|r| &r.leftmost().elem);
        if !self.same_bound(first, self.min.as_ref()) {
            return Err(SplayError::StaleMin);
        }
        let last = root.map(|r| &r.rightmost().elem);
        if !self.same_bound(last, self.max.as_ref()) {
            return Err(SplayError::StaleMax);
        }

        Ok(stats)
    }

    /// Count elements in `[low, high]` by scanning them one by one and
    /// check the result against [`SplayTree::count`].
    pub fn validate_count(&mut self, low: &T, high: &T) -> Result<usize, SplayError<T>> {
        let scan = self.range(low, high).count();
        let fast = self.count(low, high);
        if fast != scan {
            return Err(SplayError::CountMismatch { fast, scan });
        }
        Ok(fast)
    }
}

/// Read operations on SplayTree instance.
impl<T, F> SplayTree<T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    /// Bring the element equal to `key` to the root. If there is no
    /// such element, the last element reached while searching for
    /// `key`, one of its neighbours, becomes the root.
    pub fn splay(&mut self, key: &T) {
        if let Some(root) = self.root.take() {
            self.root = Some(SplayTree::splay_node(root, key, &self.le));
        }
    }

    /// Return the element at the root, located by the last search.
    #[inline]
    pub fn current(&self) -> Option<&T> {
        self.root.as_ref().map(|root| &root.elem)
    }

    /// Check whether the root holds an element equal to `elem`.
    pub fn is_current(&self, elem: &T) -> bool {
        self.current().map_or(false, |root| self.same(root, elem))
    }

    /// Return the smallest element.
    #[inline]
    pub fn min(&self) -> Option<&T> {
        self.min.as_ref()
    }

    /// Return the largest element.
    #[inline]
    pub fn max(&self) -> Option<&T> {
        self.max.as_ref()
    }

    /// Search for an element equal to `elem`, on success it becomes
    /// the root.
    pub fn search(&mut self, elem: &T) -> bool {
        let within = match (&self.min, &self.max) {
            (Some(min), Some(max)) => (self.le)(min, elem) && (self.le)(elem, max),
            _ => false,
        };
        if !within {
            return false;
        }
        self.splay(elem);
        self.is_current(elem)
    }

    /// Splay the smallest element to the root.
    pub fn find_min(&mut self) -> bool {
        match (self.root.take(), &self.min) {
            (Some(root), Some(min)) => {
                self.root = Some(SplayTree::splay_node(root, min, &self.le));
                true
            }
            (root, _) => {
                self.root = root;
                false
            }
        }
    }

    /// Splay the largest element to the root.
    pub fn find_max(&mut self) -> bool {
        match (self.root.take(), &self.max) {
            (Some(root), Some(max)) => {
                self.root = Some(SplayTree::splay_node(root, max, &self.le));
                true
            }
            (root, _) => {
                self.root = root;
                false
            }
        }
    }

    /// Move the root's in-order predecessor to the root. Return false,
    /// leaving the tree as is, if the root is the smallest element.
    pub fn find_prev(&mut self) -> bool {
        let mut root = match self.root.take() {
            Some(root) => root,
            None => return false,
        };
        match root.left.take() {
            None => {
                self.root = Some(root);
                false
            }
            Some(left) => {
                let mut prev = SplayTree::splay_node(left, &root.elem, &self.le);
                root.left = prev.right.take();
                root.update_size();
                prev.right = Some(root);
                prev.update_size();
                self.root = Some(prev);
                true
            }
        }
    }

    /// Move the root's in-order successor to the root. Return false,
    /// leaving the tree as is, if the root is the largest element.
    pub fn find_next(&mut self) -> bool {
        let mut root = match self.root.take() {
            Some(root) => root,
            None => return false,
        };
        match root.right.take() {
            None => {
                self.root = Some(root);
                false
            }
            Some(right) => {
                let mut next = SplayTree::splay_node(right, &root.elem, &self.le);
                root.right = next.left.take();
                root.update_size();
                next.left = Some(root);
                next.update_size();
                self.root = Some(next);
                true
            }
        }
    }

    /// Set root to the least element greater than or equal to `elem`.
    /// If no such element exists, return false.
    pub fn find_least_ge(&mut self, elem: &T) -> bool {
        match &self.max {
            Some(max) if (self.le)(elem, max) => (),
            _ => return false,
        }

        self.splay(elem);
        let below = self.current().map_or(false, |root| !(self.le)(elem, root));
        if below {
            return self.find_next();
        }
        while self.prev_matches(|prev| (self.le)(elem, prev)) {
            self.find_prev();
        }
        true
    }

    /// Set root to the greatest element less than or equal to `elem`.
    /// If no such element exists, return false.
    pub fn find_greatest_le(&mut self, elem: &T) -> bool {
        match &self.min {
            Some(min) if (self.le)(min, elem) => (),
            _ => return false,
        }

        self.splay(elem);
        let above = self.current().map_or(false, |root| !(self.le)(root, elem));
        if above {
            return self.find_prev();
        }
        while self.next_matches(|next| (self.le)(next, elem)) {
            self.find_next();
        }
        true
    }

    /// Set root to the least element strictly greater than `elem`.
    /// If no such element exists, return false.
    pub fn find_least_gt(&mut self, elem: &T) -> bool {
        if !self.find_least_ge(elem) {
            return false;
        }
        if !self.is_current(elem) {
            return true;
        }
        while self.next_matches(|next| self.same(next, elem)) {
            self.find_next();
        }
        self.find_next()
    }

    /// Return the number of elements strictly less than the root.
    #[inline]
    pub fn rank(&self) -> usize {
        self.root.as_deref().map_or(0, Node::left_size)
    }

    /// Return the number of elements within `[low, high]`, without
    /// visiting them.
    pub fn count(&mut self, low: &T, high: &T) -> usize {
        if !self.find_least_ge(low) {
            return 0;
        }
        let start = self.rank();
        if !self.find_greatest_le(high) {
            return 0;
        }
        let end = self.rank();
        (end + 1).saturating_sub(start)
    }

    /// Return the number of elements equal to `elem`, zero or one.
    pub fn count_elem(&mut self, elem: &T) -> usize {
        self.count(elem, elem)
    }

    /// Return the element with `rank` smaller elements. Does not
    /// restructure the tree.
    pub fn nth(&self, mut rank: usize) -> Option<&T> {
        let mut node = self.root.as_deref();
        while let Some(nref) = node {
            let left = nref.left_size();
            node = match rank.cmp(&left) {
                Ordering::Less => nref.left_deref(),
                Ordering::Equal => return Some(&nref.elem),
                Ordering::Greater => {
                    rank -= left + 1;
                    nref.right_deref()
                }
            };
        }
        None
    }

    /// Return a random element from this index, every element being
    /// equally likely.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<&T> {
        match self.len() {
            0 => None,
            n => self.nth(rng.gen_range(0, n)),
        }
    }

    /// Return an iterator over all elements in ascending order. Does
    /// not restructure the tree.
    pub fn iter(&self) -> Iter<T> {
        Iter::new(self.root.as_deref())
    }

    /// Range over all elements from `low` to `high`, both inclusive.
    /// Every step is a fresh search, refer to [`Cursor`] for a variant
    /// that allows mutation between steps.
    pub fn range(&mut self, low: &T, high: &T) -> Range<T, F> {
        Range::new(self, Cursor::new(low.clone(), high.clone()))
    }

    /// Call `f` on every element within `[low, high]`, skipping the
    /// element equal to `except`, if any.
    pub fn apply_to_range<G>(&mut self, low: &T, high: &T, except: Option<&T>, mut f: G)
    where
        G: FnMut(&T),
    {
        let mut cursor = Cursor::new(low.clone(), high.clone());
        while let Some(elem) = cursor.next(self) {
            if except.map_or(true, |except| !self.same(&elem, except)) {
                f(&elem)
            }
        }
    }

    /// Call `f` on the element equal to `elem`, unless it is also equal
    /// to `except`.
    pub fn apply_to_elem<G>(&mut self, elem: &T, except: Option<&T>, f: G)
    where
        G: FnMut(&T),
    {
        self.apply_to_range(elem, elem, except, f)
    }

    fn prev_matches<P>(&self, pred: P) -> bool
    where
        P: Fn(&T) -> bool,
    {
        let prev = self.root.as_deref().and_then(Node::prev);
        prev.map_or(false, |node| pred(&node.elem))
    }

    fn next_matches<P>(&self, pred: P) -> bool
    where
        P: Fn(&T) -> bool,
    {
        let next = self.root.as_deref().and_then(Node::next);
        next.map_or(false, |node| pred(&node.elem))
    }

    fn same_bound(&self, a: Option<&T>, b: Option<&T>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.same(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T, F> SplayTree<T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    // Top-down splay. Nodes that are confirmed smaller than the final
    // root are collected on `lspine`, each waiting for its right child;
    // nodes confirmed larger are collected on `rspine`, each waiting for
    // its left child.
    fn splay_node(mut t: Box<Node<T>>, key: &T, le: &F) -> Box<Node<T>> {
        let mut lspine: Vec<Box<Node<T>>> = vec![];
        let mut rspine: Vec<Box<Node<T>>> = vec![];

        loop {
            if le(key, &t.elem) {
                if le(&t.elem, key) {
                    break;
                }
                let zigzig = t.left_deref().map_or(false, |l| !le(&l.elem, key));
                if zigzig {
                    t = rotate_right(t);
                }
                match t.left.take() {
                    Some(left) => {
                        rspine.push(t);
                        t = left;
                    }
                    None => break,
                }
            } else {
                let zigzig = t.right_deref().map_or(false, |r| !le(key, &r.elem));
                if zigzig {
                    t = rotate_left(t);
                }
                match t.right.take() {
                    Some(right) => {
                        lspine.push(t);
                        t = right;
                    }
                    None => break,
                }
            }
        }

        // reassemble, sizes are repaired walking each spine bottom-up.
        let mut left = t.left.take();
        while let Some(mut node) = lspine.pop() {
            node.right = left;
            node.update_size();
            left = Some(node);
        }
        let mut right = t.right.take();
        while let Some(mut node) = rspine.pop() {
            node.left = right;
            node.update_size();
            right = Some(node);
        }
        t.left = left;
        t.right = right;
        t.update_size();
        t
    }

    // Post-order walk with an explicit stack, return the subtree size.
    fn validate_tree(root: Option<&Node<T>>, depths: &mut Depth) -> Result<usize, SplayError<T>> {
        let mut sizes: Vec<usize> = vec![];
        let mut stack = vec![(root, 0, false)];
        while let Some((node, depth, visited)) = stack.pop() {
            match node {
                None => {
                    depths.sample(depth);
                    sizes.push(0);
                }
                Some(nref) if !visited => {
                    stack.push((Some(nref), depth, true));
                    stack.push((nref.right_deref(), depth + 1, false));
                    stack.push((nref.left_deref(), depth + 1, false));
                }
                Some(nref) => {
                    let right = sizes.pop().unwrap_or(0);
                    let left = sizes.pop().unwrap_or(0);
                    let actual = 1 + left + right;
                    if nref.size != actual {
                        let stored = nref.size;
                        return Err(SplayError::SizeMismatch { stored, actual });
                    }
                    sizes.push(actual);
                }
            }
        }
        Ok(sizes.pop().unwrap_or(0))
    }
}

//              (i)                       (i)
//               |                         |
//              node                       x
//              /  \                      / \
//             /    \                    /   \
//            /      \                  /     \
//          left      x              node      xr
//                   / \             /  \
//                 xl   xr        left   xl
//
fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    match node.right.take() {
        None => node,
        Some(mut x) => {
            node.right = x.left.take();
            node.update_size();
            x.left = Some(node);
            x.update_size();
            x
        }
    }
}

//              (i)                       (i)
//               |                         |
//              node                       x
//              /  \                      / \
//             /    \                    /   \
//            /      \                  /     \
//           x      right             xl      node
//          / \                               / \
//        xl   xr                           xr  right
//
fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    match node.left.take() {
        None => node,
        Some(mut x) => {
            node.left = x.right.take();
            node.update_size();
            x.right = Some(node);
            x.update_size();
            x
        }
    }
}

impl<T, F> Drop for SplayTree<T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    fn drop(&mut self) {
        self.clear()
    }
}

impl<T, F> fmt::Display for SplayTree<T, F>
where
    T: Clone + fmt::Display,
    F: Fn(&T, &T) -> bool,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, elem) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", elem)?;
        }
        Ok(())
    }
}

/// Statistics on [`SplayTree`]. Serves two purpose:
///
/// * To get partial but quick statistics via [`SplayTree::stats`] method.
/// * To get full statisics via [`SplayTree::validate`] method.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize, // number of entries in the tree.
    node_size: usize,
    depths: Option<Depth>,
}

impl Stats {
    fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            depths: Default::default(),
        }
    }

    #[inline]
    fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number entries in [`SplayTree`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `SplayTree<T>`. Although
    /// the node overhead is constant, the node size varies based on
    /// element type. EG:
    ///
    /// ```
    /// use splay_index::SplayTree;
    /// let tree: SplayTree<u64> = SplayTree::with_ord("myinstance");
    ///
    /// // size of element: 8 bytes
    /// // overhead is 24 bytes
    /// assert_eq!(tree.stats().node_size(), 32);
    /// ```
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return [`Depth`] statistics, available only from
    /// [`SplayTree::validate`].
    pub fn depths(&self) -> Option<Depth> {
        match &self.depths {
            Some(depths) if depths.samples() > 0 => Some(depths.clone()),
            _ => None,
        }
    }
}
