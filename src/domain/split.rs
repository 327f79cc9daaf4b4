// ============================================================
// Layer 3 — Split Ratios and Split Assignment
// ============================================================
// A class with n images is divided into three contiguous blocks
// of a shuffled list:
//
//   train = floor(n * ratios.train)
//   val   = floor(n * ratios.val)
//   test  = n - train - val          (the remainder)
//
// The test ratio is nominal only; crediting the remainder to
// test means every image is always assigned somewhere.

use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitRatios {
    pub train: f64,
    pub val:   f64,
    pub test:  f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self { train: 0.8, val: 0.1, test: 0.1 }
    }
}

impl SplitRatios {
    pub fn validate(&self) -> Result<(), PipelineError> {
        for (name, r) in [("train", self.train), ("val", self.val), ("test", self.test)] {
            if !(0.0..=1.0).contains(&r) {
                return Err(PipelineError::InvalidConfig(format!(
                    "{name} ratio must be within [0, 1], got {r}"
                )));
            }
        }
        if self.train + self.val > 1.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "train + val ratios exceed 1.0 ({} + {})",
                self.train, self.val
            )));
        }
        Ok(())
    }

    /// Subset sizes for a class of `n` images: (train, val, test)
    pub fn counts(&self, n: usize) -> (usize, usize, usize) {
        let train = ((n as f64) * self.train).floor() as usize;
        let val   = ((n as f64) * self.val).floor() as usize;
        // Clamp so a pathological float never pushes past n
        let train = train.min(n);
        let val   = val.min(n - train);
        (train, val, n - train - val)
    }
}

/// The three disjoint subsets produced for one class
#[derive(Debug, Clone, PartialEq)]
pub struct SplitAssignment<T> {
    pub train: Vec<T>,
    pub val:   Vec<T>,
    pub test:  Vec<T>,
}

impl<T> SplitAssignment<T> {
    /// Cut an already shuffled list into contiguous blocks
    pub fn from_ordered(mut items: Vec<T>, ratios: &SplitRatios) -> Self {
        let (train_n, val_n, _) = ratios.counts(items.len());
        let test = items.split_off(train_n + val_n);
        let val  = items.split_off(train_n);
        Self { train: items, val, test }
    }

    pub fn total(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }

    /// (subset name, items) in train, val, test order
    pub fn subsets(&self) -> [(&'static str, &[T]); 3] {
        [
            ("train", self.train.as_slice()),
            ("val",   self.val.as_slice()),
            ("test",  self.test.as_slice()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_follow_floor_rule() {
        let r = SplitRatios::default();
        for n in 0..200usize {
            let (train, val, test) = r.counts(n);
            assert_eq!(train, ((n as f64) * 0.8).floor() as usize, "n={n}");
            assert_eq!(val,   ((n as f64) * 0.1).floor() as usize, "n={n}");
            assert_eq!(train + val + test, n, "n={n}");
        }
    }

    #[test]
    fn test_ten_images_split_8_1_1() {
        assert_eq!(SplitRatios::default().counts(10), (8, 1, 1));
    }

    #[test]
    fn test_remainder_goes_to_test() {
        // 7 * 0.8 = 5.6 → 5, 7 * 0.1 = 0.7 → 0, remainder 2
        assert_eq!(SplitRatios::default().counts(7), (5, 0, 2));
    }

    #[test]
    fn test_from_ordered_is_contiguous() {
        let items: Vec<usize> = (0..10).collect();
        let split = SplitAssignment::from_ordered(items, &SplitRatios::default());
        assert_eq!(split.train, (0..8).collect::<Vec<_>>());
        assert_eq!(split.val,   vec![8]);
        assert_eq!(split.test,  vec![9]);
    }

    #[test]
    fn test_empty_class() {
        let split = SplitAssignment::<usize>::from_ordered(Vec::new(), &SplitRatios::default());
        assert_eq!(split.total(), 0);
    }

    #[test]
    fn test_rejects_over_allocated_ratios() {
        assert!(SplitRatios { train: 0.9, val: 0.2, test: 0.0 }.validate().is_err());
        assert!(SplitRatios { train: -0.1, val: 0.5, test: 0.5 }.validate().is_err());
        assert!(SplitRatios { train: 0.7, val: 0.2, test: 0.1 }.validate().is_ok());
    }
}
