use std::cmp::Ordering;

use num_traits::Float;

/// Index-sorted sparse vector over a fixed logical dimension.
///
/// Stored as structure-of-arrays (indices + values), ascending by index.
/// Zero entries are never stored, so `nnz()` counts only meaningful weights.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVec<N = f64>
where
    N: Float,
{
    dim: usize,
    inds: Vec<u32>,
    vals: Vec<N>,
}

impl<N> SparseVec<N>
where
    N: Float,
{
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    pub fn with_capacity(dim: usize, capacity: usize) -> Self {
        Self {
            dim,
            inds: Vec::with_capacity(capacity),
            vals: Vec::with_capacity(capacity),
        }
    }

    /// Append an entry. Indices must arrive in strictly ascending order;
    /// zero values are skipped.
    #[inline]
    pub fn push(&mut self, ind: u32, val: N) {
        debug_assert!((ind as usize) < self.dim, "index {} out of dim {}", ind, self.dim);
        debug_assert!(self.inds.last().map_or(true, |&last| last < ind));
        if val != N::zero() {
            self.inds.push(ind);
            self.vals.push(val);
        }
    }

    /// Logical dimension, not the stored entry count.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Stored (non-zero) entry count.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.inds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter().copied())
    }

    /// Dot product by merge walk over the two sorted index lists.
    pub fn dot(&self, other: &Self) -> N {
        let mut acc = N::zero();
        let (mut i, mut j) = (0usize, 0usize);
        while i < self.inds.len() && j < other.inds.len() {
            match self.inds[i].cmp(&other.inds[j]) {
                Ordering::Equal => {
                    acc = acc + self.vals[i] * other.vals[j];
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        acc
    }

    /// Euclidean norm.
    pub fn norm(&self) -> N {
        self.vals
            .iter()
            .fold(N::zero(), |acc, &v| acc + v * v)
            .sqrt()
    }

    /// Multiply every stored value by `factor`.
    pub fn scale(&mut self, factor: N) {
        for v in &mut self.vals {
            *v = *v * factor;
        }
    }
}
