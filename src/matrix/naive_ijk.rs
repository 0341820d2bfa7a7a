use super::Matrix;

/// Textbook i-j-k triple sum.
///
/// Each output element is the dot product of a row of A and a column of B,
/// summed into a local before being added to C. The column walk through B
/// has stride N, so this is slow; it exists as an independent reference to
/// check the benchmarked kernels against.
pub fn dgemm_reference(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    let n = a.dim();
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0;
            for p in 0..n {
                sum += a[(i, p)] * b[(p, j)];
            }
            c[(i, j)] += sum;
        }
    }
}
