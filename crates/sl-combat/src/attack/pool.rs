//! Itemised dice-pool assembly.

/// A dice pool built from labelled terms, kept for narration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolBreakdown {
    terms: Vec<(String, i32)>,
}

impl PoolBreakdown {
    /// An empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a labelled term. Zero terms are kept out of the narration.
    pub fn add(mut self, label: impl Into<String>, value: i32) -> Self {
        if value != 0 {
            self.terms.push((label.into(), value));
        }
        self
    }

    /// Add a term only when `condition` holds.
    pub fn add_if(self, condition: bool, label: impl Into<String>, value: i32) -> Self {
        if condition { self.add(label, value) } else { self }
    }

    /// Signed sum of all terms.
    pub fn raw_total(&self) -> i32 {
        self.terms.iter().map(|(_, v)| v).sum()
    }

    /// Dice actually rolled: the sum floored at one.
    pub fn dice(&self) -> u32 {
        self.raw_total().max(1) as u32
    }
}

impl std::fmt::Display for PoolBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (label, value)) in self.terms.iter().enumerate() {
            match (i, *value < 0) {
                (0, _) => write!(f, "{label} {value}")?,
                (_, false) => write!(f, " + {label} {value}")?,
                (_, true) => write!(f, " - {label} {}", value.unsigned_abs())?,
            }
        }
        if self.terms.is_empty() {
            write!(f, "nothing")?;
        }
        let total = self.raw_total();
        if total < 1 {
            write!(f, " = {total}, floored to 1")
        } else {
            write!(f, " = {total}")
        }
    }
}
