//! # Posterior draws
//!
//! An explicit labelled-array model for sampler output. Values are stored
//! row-major alongside an ordered list of named dimensions. The `chain` and
//! `draw` dimensions are reserved: they are sampling artifacts and get pooled
//! away. Every other dimension is retained, and its positions are flattened
//! row-major into one position index shared by all summaries.
//!
//! # Examples
//!
//! ```
//! use posterior_intervals::Draws;
//!
//! let draws = Draws::from_fn("mu", [("chain", 2), ("draw", 3), ("time", 4)], |index| {
//!     index[2] as f64
//! })
//! .unwrap();
//!
//! assert_eq!(draws.n_samples(), 6);
//! assert_eq!(draws.n_positions(), 4);
//! let pooled = draws.pooled();
//! assert_eq!(pooled[(5, 3)], 3.0);
//! ```
//!
//! ```
//! use posterior_intervals::Draws;
//!
//! // Three values cannot fill a 1 x 4 shape.
//! assert!(Draws::new("mu", vec![1.0, 2.0, 3.0], [("chain", 1), ("draw", 4)]).is_err());
//! ```

use std::collections::HashSet;

use faer::Mat;

use crate::error::SummaryError;

pub mod bundle;

pub use bundle::PosteriorBundle;

/// Reserved name of the chain dimension.
pub const CHAIN_DIM: &str = "chain";
/// Reserved name of the draw dimension.
pub const DRAW_DIM: &str = "draw";

/// A named axis and its length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub size: usize,
}

impl Dimension {
    #[must_use]
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    fn is_sampling(&self) -> bool {
        self.name == CHAIN_DIM || self.name == DRAW_DIM
    }
}

/// Sampled values for one named variable.
#[derive(Debug, Clone)]
pub struct Draws {
    name: String,
    values: Vec<f64>,
    dims: Vec<Dimension>,
    chain_axis: usize,
    draw_axis: usize,
}

impl Draws {
    /// Wrap row-major `values` laid out according to `dims`.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError` if a dimension name repeats, the reserved
    /// `chain`/`draw` dimensions are absent, or the shape does not match
    /// the number of values.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        values: Vec<f64>,
        dims: impl IntoIterator<Item = (S, usize)>,
    ) -> Result<Self, SummaryError> {
        let name = name.into();
        let dims: Vec<Dimension> = dims
            .into_iter()
            .map(|(dim, size)| Dimension::new(dim, size))
            .collect();

        check_unique(&dims)?;

        let chain_axis = find_axis(&dims, CHAIN_DIM).ok_or_else(|| {
            SummaryError::MissingDimension {
                variable: name.clone(),
                dim: CHAIN_DIM,
            }
        })?;
        let draw_axis =
            find_axis(&dims, DRAW_DIM).ok_or_else(|| SummaryError::MissingDimension {
                variable: name.clone(),
                dim: DRAW_DIM,
            })?;

        let expected = dims.iter().map(|dim| dim.size).product::<usize>();
        if expected != values.len() {
            return Err(SummaryError::ShapeMismatch {
                expected,
                found: values.len(),
            });
        }

        Ok(Self {
            name,
            values,
            dims,
            chain_axis,
            draw_axis,
        })
    }

    /// Build draws by evaluating `f` at every multi-index of the shape.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Draws::new`], except that the shape always
    /// matches.
    pub fn from_fn<S: Into<String>>(
        name: impl Into<String>,
        dims: impl IntoIterator<Item = (S, usize)>,
        mut f: impl FnMut(&[usize]) -> f64,
    ) -> Result<Self, SummaryError> {
        let dims: Vec<(String, usize)> = dims
            .into_iter()
            .map(|(dim, size)| (dim.into(), size))
            .collect();
        let sizes: Vec<usize> = dims.iter().map(|(_, size)| *size).collect();
        let total = sizes.iter().product::<usize>();

        let mut index = vec![0usize; sizes.len()];
        let mut values = Vec::with_capacity(total);
        for flat in 0..total {
            let mut rem = flat;
            for axis in (0..sizes.len()).rev() {
                index[axis] = rem % sizes[axis];
                rem /= sizes[axis];
            }
            values.push(f(&index));
        }

        Self::new(name, values, dims)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    /// Axis index of the dimension called `name`.
    #[must_use]
    pub fn axis(&self, name: &str) -> Option<usize> {
        find_axis(&self.dims, name)
    }

    #[must_use]
    pub fn n_chains(&self) -> usize {
        self.dims[self.chain_axis].size
    }

    #[must_use]
    pub fn n_draws(&self) -> usize {
        self.dims[self.draw_axis].size
    }

    /// Pooled sample count per position (`chains * draws`).
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.n_chains() * self.n_draws()
    }

    /// Dimensions other than `chain` and `draw`, in storage order.
    #[must_use]
    pub fn retained_dims(&self) -> Vec<Dimension> {
        self.dims
            .iter()
            .filter(|dim| !dim.is_sampling())
            .cloned()
            .collect()
    }

    /// Number of retained positions; a variable without retained dimensions
    /// has exactly one.
    #[must_use]
    pub fn n_positions(&self) -> usize {
        self.dims
            .iter()
            .filter(|dim| !dim.is_sampling())
            .map(|dim| dim.size)
            .product()
    }

    /// Value at a full multi-index in storage order.
    #[must_use]
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.dims.len() {
            return None;
        }
        let strides = self.strides();
        let mut offset = 0;
        for (axis, &i) in index.iter().enumerate() {
            if i >= self.dims[axis].size {
                return None;
            }
            offset += i * strides[axis];
        }
        self.values.get(offset).copied()
    }

    /// Pool chains and draws into an `n_samples x n_positions` matrix.
    ///
    /// Row `chain * n_draws + draw` holds one sample; column `p` is the
    /// row-major flattening of the retained dimensions.
    #[must_use]
    pub fn pooled(&self) -> Mat<f64> {
        let strides = self.strides();
        let retained: Vec<usize> = (0..self.dims.len())
            .filter(|&axis| axis != self.chain_axis && axis != self.draw_axis)
            .collect();
        let n_draws = self.n_draws();
        let chain_stride = strides[self.chain_axis];
        let draw_stride = strides[self.draw_axis];

        Mat::from_fn(self.n_samples(), self.n_positions(), |row, col| {
            let mut offset = (row / n_draws) * chain_stride + (row % n_draws) * draw_stride;
            let mut rem = col;
            for &axis in retained.iter().rev() {
                let size = self.dims[axis].size;
                offset += (rem % size) * strides[axis];
                rem /= size;
            }
            self.values[offset]
        })
    }

    fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1usize; self.dims.len()];
        for axis in (0..self.dims.len().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * self.dims[axis + 1].size;
        }
        strides
    }
}

fn check_unique(dims: &[Dimension]) -> Result<(), SummaryError> {
    let mut seen = HashSet::with_capacity(dims.len());
    for dim in dims {
        if !seen.insert(dim.name.as_str()) {
            return Err(SummaryError::DuplicateDimension {
                dim: dim.name.clone(),
            });
        }
    }
    Ok(())
}

fn find_axis(dims: &[Dimension], name: &str) -> Option<usize> {
    dims.iter().position(|dim| dim.name == name)
}
