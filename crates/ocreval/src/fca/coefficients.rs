//! Penalty coefficients and the grid searched over them.

use crate::error::{OcrEvalError, Result};
use serde::{Deserialize, Serialize};

/// Weights of the penalty used to rank candidate line pairs.
///
/// Higher `edit_dist` and `length_diff` punish dissimilar pairs; `offset` penalizes
/// substrings matched near the middle of a longer line; `length` rewards long overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coefficients {
    pub edit_dist: u32,
    pub length_diff: u32,
    pub offset: u32,
    pub length: u32,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            edit_dist: 25,
            length_diff: 20,
            offset: 1,
            length: 4,
        }
    }
}

/// Half-open range `[start, end)` visited in increments of `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoefficientRange {
    pub start: u32,
    pub end: u32,
    #[serde(default = "default_step")]
    pub step: u32,
}

fn default_step() -> u32 {
    1
}

impl CoefficientRange {
    pub const fn new(start: u32, end: u32, step: u32) -> Self {
        Self { start, end, step }
    }

    /// A range holding only `value`.
    pub const fn single(value: u32) -> Self {
        Self::new(value, value.saturating_add(1), 1)
    }

    pub fn values(&self) -> impl Iterator<Item = u32> + Clone + use<> {
        let step = self.step.max(1) as usize;
        (self.start..self.end).step_by(step)
    }

    pub fn len(&self) -> usize {
        if self.step == 0 || self.start >= self.end {
            return 0;
        }
        (self.end - self.start).div_ceil(self.step) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.step == 0 {
            return Err(OcrEvalError::validation(format!("{} step must be positive", name)));
        }
        if self.start >= self.end {
            return Err(OcrEvalError::validation(format!(
                "{} range is empty: start {} must be below end {}",
                name, self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Cartesian product of one range per coefficient.
///
/// Iteration order is lexicographic: `edit_dist` varies slowest and `length` fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoefficientGrid {
    pub edit_dist: CoefficientRange,
    pub length_diff: CoefficientRange,
    pub offset: CoefficientRange,
    pub length: CoefficientRange,
}

impl Default for CoefficientGrid {
    fn default() -> Self {
        Self {
            edit_dist: CoefficientRange::new(15, 31, 5),
            length_diff: CoefficientRange::new(0, 24, 3),
            offset: CoefficientRange::new(0, 4, 1),
            length: CoefficientRange::new(0, 6, 1),
        }
    }
}

impl CoefficientGrid {
    /// A grid with exactly one point.
    pub fn single(coefficients: Coefficients) -> Self {
        Self {
            edit_dist: CoefficientRange::single(coefficients.edit_dist),
            length_diff: CoefficientRange::single(coefficients.length_diff),
            offset: CoefficientRange::single(coefficients.offset),
            length: CoefficientRange::single(coefficients.length),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Coefficients> + use<> {
        let grid = *self;
        grid.edit_dist.values().flat_map(move |edit_dist| {
            grid.length_diff.values().flat_map(move |length_diff| {
                grid.offset.values().flat_map(move |offset| {
                    grid.length.values().map(move |length| Coefficients {
                        edit_dist,
                        length_diff,
                        offset,
                        length,
                    })
                })
            })
        })
    }

    pub fn len(&self) -> usize {
        self.edit_dist.len() * self.length_diff.len() * self.offset.len() * self.length.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<()> {
        self.edit_dist.validate("edit_dist")?;
        self.length_diff.validate("length_diff")?;
        self.offset.validate("offset")?;
        self.length.validate("length")?;
        Ok(())
    }
}
