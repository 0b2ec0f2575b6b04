//! Small dense linear algebra used by the polynomial smoothers.

/// Solve symmetric positive definite system using Cholesky decomposition.
///
/// Solves A @ x = b where A is symmetric positive definite. Returns `None`
/// when A is not positive definite or the shapes disagree.
pub fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n || a.iter().any(|row| row.len() != n) {
        return None;
    }

    // Cholesky decomposition A = L @ L'
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn solves_small_spd_system() {
        // [4 2; 2 3] x = [2; 1]  ->  x = [0.5, 0]
        let a = vec![vec![4.0, 2.0], vec![2.0, 3.0]];
        let x = solve_symmetric(&a, &[2.0, 1.0]).unwrap();
        assert_relative_eq!(x[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(x[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_indefinite_and_misshapen_input() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
        assert!(solve_symmetric(&a, &[1.0, 1.0]).is_none());
        assert!(solve_symmetric(&[vec![1.0]], &[1.0, 2.0]).is_none());
        assert!(solve_symmetric(&[], &[]).is_none());
    }
}
