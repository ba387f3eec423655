//! Fixed-lane-width inner loops for the layers' flat-buffer arithmetic.
//!
//! Each kernel processes `LANES` elements per chunk and finishes with a
//! scalar remainder loop, so results never depend on whether the chosen
//! width matches the target's vector registers. `LANES` is a tuning knob,
//! not a correctness parameter.

pub(crate) const LANES: usize = 8;

/// `dst[k] += scale * src[k]` for all `k`.
pub(crate) fn axpy(dst: &mut [f32], scale: f32, src: &[f32]) {
    debug_assert_eq!(dst.len(), src.len());

    let mut dst_chunks = dst.chunks_exact_mut(LANES);
    let mut src_chunks = src.chunks_exact(LANES);

    for (d, s) in dst_chunks.by_ref().zip(src_chunks.by_ref()) {
        for (dv, &sv) in d.iter_mut().zip(s) {
            *dv += scale * sv;
        }
    }

    for (dv, &sv) in dst_chunks
        .into_remainder()
        .iter_mut()
        .zip(src_chunks.remainder())
    {
        *dv += scale * sv;
    }
}

/// Dot product with per-lane accumulators folded at the end.
pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let mut acc = [0.0f32; LANES];
    let mut a_chunks = a.chunks_exact(LANES);
    let mut b_chunks = b.chunks_exact(LANES);

    for (ca, cb) in a_chunks.by_ref().zip(b_chunks.by_ref()) {
        for ((lane, &x), &y) in acc.iter_mut().zip(ca).zip(cb) {
            *lane += x * y;
        }
    }

    let mut sum: f32 = acc.iter().sum();

    for (&x, &y) in a_chunks.remainder().iter().zip(b_chunks.remainder()) {
        sum += x * y;
    }

    sum
}
