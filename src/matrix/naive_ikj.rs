use super::Matrix;

/// Scalar baseline using i-k-j loop order.
///
/// `A[i][k]` is loaded once per k step, and the innermost loop then walks
/// a row of B and a row of C together with stride 1. No SIMD, no
/// blocking. Every other kernel is measured against this one.
///
/// Computes C += A * B for N×N matrices.
pub fn dgemm_naive(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    let n = a.dim();
    for i in 0..n {
        let c_row = c.row_mut(i);
        for (k, &a_ik) in a.row(i).iter().enumerate() {
            for (c_ij, &b_kj) in c_row.iter_mut().zip(b.row(k)) {
                *c_ij += a_ik * b_kj;
            }
        }
    }
}
