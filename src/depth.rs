use log::info;

/// Depth histogram of the empty links in a [`SplayTree`], gathered by
/// [`SplayTree::validate`]. Every missing child is one sample, its depth
/// being the length of the path from the root.
///
/// Splay trees are not balanced, an ascending load leaves a single path
/// as deep as the tree is large, so the histogram grows with the deepest
/// sample instead of using a fixed table.
///
/// [`SplayTree`]: crate::SplayTree
/// [`SplayTree::validate`]: crate::SplayTree::validate
#[derive(Clone, Debug, Default)]
pub struct Depth {
    total: usize,
    shallowest: Option<usize>,
    histogram: Vec<usize>, // histogram[d]: empty links at depth d
}

impl Depth {
    pub(crate) fn new() -> Depth {
        Default::default()
    }

    pub(crate) fn sample(&mut self, depth: usize) {
        if self.histogram.len() <= depth {
            self.histogram.resize(depth + 1, 0);
        }
        self.histogram[depth] += 1;
        self.total += depth;
        self.shallowest = Some(self.shallowest.map_or(depth, |d| d.min(depth)));
    }

    /// Return number of empty links sampled.
    pub fn samples(&self) -> usize {
        self.histogram.iter().sum()
    }

    /// Return the depth of the shallowest empty link.
    pub fn min(&self) -> usize {
        self.shallowest.unwrap_or(0)
    }

    /// Return the depth of the deepest empty link.
    pub fn max(&self) -> usize {
        self.histogram.len().saturating_sub(1)
    }

    /// Return the average depth, rounded down.
    pub fn mean(&self) -> usize {
        match self.samples() {
            0 => 0,
            n => self.total / n,
        }
    }

    /// Return the tail of the distribution as (percentile, depth) pairs,
    /// one pair for every depth at which the cumulative share of samples
    /// reaches a new percentile of 90 or above.
    pub fn percentiles(&self) -> Vec<(u8, usize)> {
        let samples = self.samples();
        let mut acc = 0;
        let mut last = 89_u8;
        let mut percentiles = vec![];
        for (depth, n) in self.histogram.iter().enumerate() {
            if *n == 0 {
                continue;
            }
            acc += *n;
            let perc = (acc * 100 / samples) as u8;
            if perc > last {
                percentiles.push((perc, depth));
                last = perc;
            }
        }
        percentiles
    }

    /// Log depth statistics in human readable format.
    pub fn pretty_print(&self, prefix: &str) {
        info!(
            "{}depth min:{} mean:{} max:{}",
            prefix,
            self.min(),
            self.mean(),
            self.max()
        );
        for (perc, depth) in self.percentiles() {
            info!("{}  {}th percentile at depth {}", prefix, perc, depth);
        }
    }

    /// Render depth statistics as a JSON object, useful for plotting.
    pub fn json(&self) -> String {
        let percentiles: Vec<String> = self
            .percentiles()
            .into_iter()
            .map(|(perc, depth)| format!("\"{}\": {}", perc, depth))
            .collect();
        format!(
            "{{ \"min\": {}, \"mean\": {}, \"max\": {}, \"percentiles\": {{ {} }} }}",
            self.min(),
            self.mean(),
            self.max(),
            percentiles.join(", ")
        )
    }
}
