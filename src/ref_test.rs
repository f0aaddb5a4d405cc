// Brute force reference for SplayTree<i64>, one slot per key in
// 0..capacity, a negative slot marks an absent key.
#[derive(Clone)]
struct RefNode {
    key: i64,
}

struct RefNodes {
    entries: Vec<RefNode>,
}

impl RefNodes {
    fn new(capacity: usize) -> RefNodes {
        let mut entries: Vec<RefNode> = Vec::with_capacity(capacity);
        (0..capacity).for_each(|_| entries.push(RefNode { key: -1 }));
        RefNodes { entries }
    }

    fn len(&self) -> usize {
        self.entries.iter().filter(|item| item.key >= 0).count()
    }

    fn contains(&self, key: i64) -> bool {
        self.entries[key as usize].key >= 0
    }

    fn insert(&mut self, key: i64) -> bool {
        let entry = &mut self.entries[key as usize];
        if entry.key < 0 {
            entry.key = key;
            true
        } else {
            false
        }
    }

    fn delete(&mut self, key: i64) -> bool {
        let entry = &mut self.entries[key as usize];
        if entry.key < 0 {
            false
        } else {
            entry.key = -1;
            true
        }
    }

    fn iter(&self) -> std::vec::IntoIter<i64> {
        self.range(std::i64::MIN, std::i64::MAX)
    }

    fn range(&self, low: i64, high: i64) -> std::vec::IntoIter<i64> {
        self.entries
            .iter()
            .filter_map(|item| {
                if item.key >= 0 && item.key >= low && item.key <= high {
                    Some(item.key)
                } else {
                    None
                }
            })
            .collect::<Vec<i64>>()
            .into_iter()
    }

    // number of keys strictly less than key.
    fn rank(&self, key: i64) -> usize {
        self.range(std::i64::MIN, key - 1).count()
    }

    fn min(&self) -> Option<i64> {
        self.iter().next()
    }

    fn max(&self) -> Option<i64> {
        self.iter().last()
    }

    fn least_ge(&self, key: i64) -> Option<i64> {
        self.range(key, std::i64::MAX).next()
    }

    fn least_gt(&self, key: i64) -> Option<i64> {
        self.range(key + 1, std::i64::MAX).next()
    }

    fn greatest_le(&self, key: i64) -> Option<i64> {
        self.range(std::i64::MIN, key).last()
    }
}

// inclusive bounds, either may lie just outside 0..size, low may
// exceed high.
fn random_low_high(size: usize) -> (i64, i64) {
    let size = (size + 2) as u64;
    let low = (random::<u64>() % size) as i64 - 1;
    let high = (random::<u64>() % size) as i64 - 1;
    (low, high)
}
