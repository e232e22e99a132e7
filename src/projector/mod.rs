pub(crate) mod linalg;

use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, warn};

use crate::sparse::SparseVec;

/// Default latent dimension count, matching the original engine configuration.
pub const DEFAULT_COMPONENTS: usize = 100;

/// Seed for the iteration start block. Fixed so fitting the same input with
/// the same component count always produces the same basis.
const START_BLOCK_SEED: u64 = 0x1a7e_a4c8;

const MAX_SWEEPS: usize = 64;
const CONVERGENCE_TOL: f64 = 1e-10;

/// Truncated-SVD projection basis over TF-IDF rows.
///
/// Learns the top right-singular directions of the row collection by
/// orthogonal iteration on the Gram matrix `X^T X`. The only constructor is
/// [`SvdProjector::fit`], so transform-before-fit is unrepresentable and the
/// basis is immutable once learned.
#[derive(Debug, Clone)]
pub struct SvdProjector {
    /// One column per latent component (dim x k).
    components: Array2<f64>,
}

impl SvdProjector {
    /// Learn the top `n_components` latent directions of `rows`.
    ///
    /// `n_components` is clamped to `min(dim, rows.len())`; directions beyond
    /// the input's rank come out as zero columns. Fitting is deterministic for
    /// a fixed input and component count.
    pub fn fit(rows: &[SparseVec], dim: usize, n_components: usize) -> Self {
        let k = n_components.min(dim).min(rows.len());
        if k < n_components {
            warn!(
                requested = n_components,
                clamped = k,
                "component count exceeds input bounds"
            );
        }
        if k == 0 {
            return Self {
                components: Array2::zeros((dim, 0)),
            };
        }

        let g = linalg::gram(rows, dim);

        let mut rng = StdRng::seed_from_u64(START_BLOCK_SEED);
        let mut v = Array2::from_shape_fn((dim, k), |_| rng.random_range(-1.0..1.0));
        linalg::orthonormalize_columns(&mut v);

        for sweep in 0..MAX_SWEEPS {
            let mut w = g.dot(&v);
            linalg::orthonormalize_columns(&mut w);
            // largest per-column rotation since the previous sweep
            let mut delta = 0.0_f64;
            for c in 0..k {
                let wc = w.column(c);
                if wc.dot(&wc) == 0.0 {
                    // rank-deficient direction, already settled at zero
                    continue;
                }
                let d = 1.0 - wc.dot(&v.column(c)).abs();
                if d > delta {
                    delta = d;
                }
            }
            v = w;
            if delta <= CONVERGENCE_TOL {
                debug!(sweeps = sweep + 1, "orthogonal iteration converged");
                break;
            }
        }

        // order components by captured variance, descending
        let gv = g.dot(&v);
        let rayleigh: Vec<f64> = (0..k).map(|c| gv.column(c).dot(&v.column(c))).collect();
        let mut order: Vec<usize> = (0..k).collect();
        order.sort_by(|&a, &b| rayleigh[b].total_cmp(&rayleigh[a]).then(a.cmp(&b)));

        let mut components = Array2::zeros((dim, k));
        for (dst, &src) in order.iter().enumerate() {
            let mut col = v.column(src).to_owned();
            // sign convention: largest-magnitude coefficient positive
            let mut lead = 0.0_f64;
            for &x in col.iter() {
                if x.abs() > lead.abs() {
                    lead = x;
                }
            }
            if lead < 0.0 {
                col.mapv_inplace(|x| -x);
            }
            components.column_mut(dst).assign(&col);
        }

        Self { components }
    }

    /// Number of latent components (output dimension).
    #[inline]
    pub fn n_components(&self) -> usize {
        self.components.ncols()
    }

    /// Expected input dimension.
    #[inline]
    pub fn input_dim(&self) -> usize {
        self.components.nrows()
    }

    pub fn components(&self) -> &Array2<f64> {
        &self.components
    }

    /// Project one sparse row into the latent space.
    pub fn transform(&self, row: &SparseVec) -> Array1<f64> {
        linalg::project_row(row, &self.components)
    }

    /// Project a whole collection, one output row per input row.
    pub fn transform_all(&self, rows: &[SparseVec]) -> Array2<f64> {
        linalg::project_rows(rows, &self.components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse(dim: usize, entries: &[(u32, f64)]) -> SparseVec {
        let mut v = SparseVec::new(dim);
        for &(i, x) in entries {
            v.push(i, x);
        }
        v
    }

    fn unit_rows() -> Vec<SparseVec> {
        vec![
            sparse(4, &[(0, 1.0), (1, 0.5)]),
            sparse(4, &[(1, 1.0), (2, 0.5)]),
            sparse(4, &[(3, 1.0)]),
        ]
    }

    #[test]
    fn component_count_is_clamped_to_input_bounds() {
        let rows = unit_rows();
        let p = SvdProjector::fit(&rows, 4, 100);
        assert_eq!(p.n_components(), 3); // min(dim=4, rows=3)
        assert_eq!(p.input_dim(), 4);
    }

    #[test]
    fn fitting_is_deterministic() {
        let rows = unit_rows();
        let a = SvdProjector::fit(&rows, 4, 3);
        let b = SvdProjector::fit(&rows, 4, 3);
        assert_eq!(a.components(), b.components());
        assert_eq!(a.transform(&rows[0]), b.transform(&rows[0]));
    }

    #[test]
    fn zero_row_projects_to_zero() {
        let rows = unit_rows();
        let p = SvdProjector::fit(&rows, 4, 3);
        let out = p.transform(&sparse(4, &[]));
        assert!(out.iter().all(|&x| x == 0.0));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn full_rank_projection_preserves_dot_products() {
        // k = row count >= rank, so the basis spans the whole row space and
        // pairwise dot products survive the projection
        let rows = unit_rows();
        let p = SvdProjector::fit(&rows, 4, 3);
        let projected = p.transform_all(&rows);
        for i in 0..rows.len() {
            for j in 0..rows.len() {
                let sparse_dot = rows[i].dot(&rows[j]);
                let dense_dot = projected.row(i).dot(&projected.row(j));
                assert!(
                    (sparse_dot - dense_dot).abs() < 1e-9,
                    "dot mismatch at ({i},{j}): {sparse_dot} vs {dense_dot}"
                );
            }
        }
    }

    #[test]
    fn components_are_orthonormal_up_to_rank() {
        let rows = unit_rows();
        let p = SvdProjector::fit(&rows, 4, 3);
        let c = p.components();
        for a in 0..3 {
            for b in 0..3 {
                let dot = c.column(a).dot(&c.column(b));
                let expected = if a == b { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn empty_input_yields_an_empty_basis() {
        let p = SvdProjector::fit(&[], 0, 100);
        assert_eq!(p.n_components(), 0);
        assert_eq!(p.input_dim(), 0);
        let out = p.transform(&SparseVec::new(0));
        assert_eq!(out.len(), 0);
    }

    #[test]
    fn first_component_captures_the_dominant_direction() {
        // many copies of one direction, a single copy of another
        let rows = vec![
            sparse(2, &[(0, 1.0)]),
            sparse(2, &[(0, 1.0)]),
            sparse(2, &[(0, 1.0)]),
            sparse(2, &[(1, 1.0)]),
        ];
        let p = SvdProjector::fit(&rows, 2, 2);
        let c0 = p.components().column(0);
        assert!(c0[0].abs() > 0.99);
        assert!(c0[1].abs() < 0.01);
    }
}
