use std::{error, fmt};

/// SplayError enumerates over all possible errors that this package
/// shall return.
#[derive(Debug, PartialEq)]
pub enum SplayError<T> {
    /// Returned by insert() API when an equal element is already
    /// present. The rejected element is handed back.
    DuplicateKey(T),
    /// Fatal case, index entries are not in sort-order.
    SortError(T, T),
    /// Fatal case, a node's size field does not match the number of
    /// nodes in its subtree.
    SizeMismatch { stored: usize, actual: usize },
    /// Fatal case, cached minimum is not the leftmost element.
    StaleMin,
    /// Fatal case, cached maximum is not the rightmost element.
    StaleMax,
    /// Fatal case, range count computed from ranks does not match the
    /// number of elements scanned in the same range.
    CountMismatch { fast: usize, scan: usize },
}

impl<T> fmt::Display for SplayError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplayError::DuplicateKey(_) => write!(f, "duplicate key"),
            SplayError::SortError(_, _) => write!(f, "entries out of sort order"),
            SplayError::SizeMismatch { stored, actual } => {
                write!(f, "size mismatch stored:{} actual:{}", stored, actual)
            }
            SplayError::StaleMin => write!(f, "cached minimum is stale"),
            SplayError::StaleMax => write!(f, "cached maximum is stale"),
            SplayError::CountMismatch { fast, scan } => {
                write!(f, "count mismatch fast:{} scan:{}", fast, scan)
            }
        }
    }
}

impl<T> error::Error for SplayError<T> where T: fmt::Debug {}
