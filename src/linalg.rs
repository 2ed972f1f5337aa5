//! Dense 4x4 linear solve for the Procrustes normal equations.
//!
//! The system size is fixed, so the solve is a plain Gaussian elimination
//! with partial pivoting on stack arrays. The singularity test is relative to
//! the largest entry, so callers should hand it a well-scaled system; the
//! Procrustes solver does this by centering and rescaling its inputs.

/// Pivots smaller than this fraction of the largest matrix entry are treated
/// as zero.
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// A 4x4 matrix stored row-major.
pub type Matrix4 = [[f64; 4]; 4];

/// Solve `a · x = b`.
///
/// Returns `None` when the matrix is singular (or numerically close to it)
/// or contains non-finite entries.
pub fn solve4(a: &Matrix4, b: &[f64; 4]) -> Option<[f64; 4]> {
    let scale = a
        .iter()
        .flatten()
        .map(|v| v.abs())
        .fold(0.0_f64, f64::max);
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    let tolerance = scale * SINGULAR_TOLERANCE;

    let mut m = *a;
    let mut rhs = *b;

    for col in 0..4 {
        // Partial pivoting: bring the largest remaining entry onto the diagonal
        let pivot_row = (col..4)
            .max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))
            .unwrap_or(col);
        if m[pivot_row][col].abs() <= tolerance {
            return None;
        }
        m.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        for row in (col + 1)..4 {
            let factor = m[row][col] / m[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..4 {
                m[row][k] -= factor * m[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut x = [0.0; 4];
    for row in (0..4).rev() {
        let tail: f64 = ((row + 1)..4).map(|k| m[row][k] * x[k]).sum();
        x[row] = (rhs[row] - tail) / m[row][row];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}
