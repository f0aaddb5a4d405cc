//! Size augmented splay tree, an in-memory ordered set that answers
//! rank and range-count queries in amortized logarithmic time.

mod depth;
mod error;
mod iter;
mod node;
mod splay;

pub use crate::depth::Depth;
pub use crate::error::SplayError;
pub use crate::iter::{Cursor, Iter, Range};
pub use crate::splay::{OrdLe, SplayTree, Stats};
