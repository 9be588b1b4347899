/// Textbook GEMM used as a correctness oracle.
///
/// Materialises op(A) and op(B) with [`transposed`](super::transpose::transposed)
/// and then runs the plain i-j-k triple loop, so it shares none of the
/// kernel's reindexing logic. Slow on purpose; use it to check results, not
/// to compute them.
///
/// Computes `C = alpha * op(A) * op(B) + beta * C` with buffers laid out as
/// described on [`GemmParams`](crate::GemmParams). Buffer lengths are not
/// checked here; callers validate first.
pub fn gemm_reference(params: &crate::GemmParams, a: &[f32], b: &[f32], c: &mut [f32]) {
    let (m, n, k) = (params.m, params.n, params.k);

    let a_op = if params.transpose_a {
        super::transpose::transposed(a, k, m)
    } else {
        a.to_vec()
    };
    let b_op = if params.transpose_b {
        super::transpose::transposed(b, n, k)
    } else {
        b.to_vec()
    };

    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0f32;
            for p in 0..k {
                sum += a_op[i * k + p] * b_op[p * n + j];
            }
            c[i * n + j] = params.alpha * sum + params.beta * c[i * n + j];
        }
    }
}
