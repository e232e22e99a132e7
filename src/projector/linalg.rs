use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::sparse::SparseVec;

/// Rows per parallel chunk when accumulating the Gram matrix.
const GRAM_CHUNK: usize = 64;

/// Threshold under which a column is treated as linearly dependent.
const RANK_EPS: f64 = 1e-12;

/// Gram matrix `X^T X` of a sparse row collection.
///
/// Partial sums are computed per chunk in parallel, then combined in chunk
/// order so the result is bit-for-bit reproducible.
pub fn gram(rows: &[SparseVec], dim: usize) -> Array2<f64> {
    let partials: Vec<Array2<f64>> = rows
        .par_chunks(GRAM_CHUNK)
        .map(|chunk| {
            let mut g = Array2::<f64>::zeros((dim, dim));
            for row in chunk {
                for (i, vi) in row.iter() {
                    for (j, vj) in row.iter() {
                        g[(i as usize, j as usize)] += vi * vj;
                    }
                }
            }
            g
        })
        .collect();

    let mut g = Array2::<f64>::zeros((dim, dim));
    for partial in partials {
        g += &partial;
    }
    g
}

/// Modified Gram-Schmidt over the columns of `m`, in place.
///
/// Columns whose residual falls below the rank threshold (the input had fewer
/// independent directions than columns) are zeroed instead of divided by a
/// vanishing norm.
pub fn orthonormalize_columns(m: &mut Array2<f64>) {
    for c in 0..m.ncols() {
        for p in 0..c {
            let prev = m.column(p).to_owned();
            let proj = m.column(c).dot(&prev);
            m.column_mut(c).scaled_add(-proj, &prev);
        }
        let norm = m.column(c).dot(&m.column(c)).sqrt();
        if norm > RANK_EPS {
            m.column_mut(c).mapv_inplace(|v| v / norm);
        } else {
            m.column_mut(c).fill(0.0);
        }
    }
}

/// Project one sparse row onto the columns of `basis` (dim x k).
pub fn project_row(row: &SparseVec, basis: &Array2<f64>) -> Array1<f64> {
    let mut out = Array1::<f64>::zeros(basis.ncols());
    for (i, v) in row.iter() {
        out.scaled_add(v, &basis.row(i as usize));
    }
    out
}

/// Project every row in parallel, one output row per input row.
pub fn project_rows(rows: &[SparseVec], basis: &Array2<f64>) -> Array2<f64> {
    let projected: Vec<Array1<f64>> = rows
        .par_iter()
        .map(|row| project_row(row, basis))
        .collect();
    let mut out = Array2::<f64>::zeros((rows.len(), basis.ncols()));
    for (i, p) in projected.into_iter().enumerate() {
        out.row_mut(i).assign(&p);
    }
    out
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

    #[test]
    fn gram_of_unit_rows_is_diagonal() {
        let rows = vec![sparse(3, &[(0, 1.0)]), sparse(3, &[(2, 1.0)])];
        let g = gram(&rows, 3);
        assert_eq!(g[(0, 0)], 1.0);
        assert_eq!(g[(1, 1)], 0.0);
        assert_eq!(g[(2, 2)], 1.0);
        assert_eq!(g[(0, 2)], 0.0);
    }

    #[test]
    fn gram_is_symmetric() {
        let rows = vec![
            sparse(4, &[(0, 0.5), (1, 1.5), (3, -1.0)]),
            sparse(4, &[(1, 2.0), (2, 0.25)]),
        ];
        let g = gram(&rows, 4);
        for i in 0..4 {
            for j in 0..4 {
                assert!((g[(i, j)] - g[(j, i)]).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn orthonormalize_produces_orthonormal_columns() {
        let mut m = ndarray::arr2(&[[1.0, 1.0], [1.0, 0.0], [0.0, 1.0]]);
        orthonormalize_columns(&mut m);
        let c0 = m.column(0);
        let c1 = m.column(1);
        assert!((c0.dot(&c0) - 1.0).abs() < 1e-12);
        assert!((c1.dot(&c1) - 1.0).abs() < 1e-12);
        assert!(c0.dot(&c1).abs() < 1e-12);
    }

    #[test]
    fn dependent_columns_collapse_to_zero() {
        let mut m = ndarray::arr2(&[[1.0, 2.0], [1.0, 2.0]]);
        orthonormalize_columns(&mut m);
        assert!((m.column(0).dot(&m.column(0)) - 1.0).abs() < 1e-12);
        assert_eq!(m.column(1).dot(&m.column(1)), 0.0);
    }

    #[test]
    fn project_row_is_a_linear_map() {
        let basis = ndarray::arr2(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
        let p = project_row(&sparse(3, &[(0, 2.0), (2, 3.0)]), &basis);
        assert_eq!(p[0], 2.0 + 3.0);
        assert_eq!(p[1], 3.0);
    }

    #[test]
    fn project_rows_preserves_row_order() {
        let basis = ndarray::arr2(&[[1.0], [2.0]]);
        let rows = vec![sparse(2, &[(0, 1.0)]), sparse(2, &[(1, 1.0)])];
        let m = project_rows(&rows, &basis);
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(1, 0)], 2.0);
    }
}
