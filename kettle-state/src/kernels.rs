//! Gate kernels over a dense amplitude slice
//!
//! Every kernel visits amplitude pairs `(i, i | 1 << target)` with bit
//! `target` of `i` clear. Pairs are disjoint, so they can be updated in any
//! order: the parallel path splits them across rayon workers and produces
//! bit-identical results to the sequential path. A kernel returns only after
//! every pair has been written, which orders consecutive gates.

use num_complex::Complex64;
use rayon::prelude::*;

/// Amplitudes per parallel work item when pairs are close together
const PAR_BLOCK: usize = 1 << 12;

/// Visit every amplitude pair of `target`
///
/// `f` receives the global index of the low amplitude (target bit clear)
/// followed by mutable references to the low and high amplitudes.
#[inline]
pub fn for_each_pair<F>(state: &mut [Complex64], target: usize, parallel: bool, f: F)
where
    F: Fn(usize, &mut Complex64, &mut Complex64) + Send + Sync,
{
    let stride = 1usize << target;
    let block = stride * 2;
    debug_assert!(state.len() >= block);

    if !parallel {
        for_each_pair_in(state, stride, 0, &f);
        return;
    }

    if block < PAR_BLOCK {
        // many small blocks: hand out runs of whole blocks
        state
            .par_chunks_mut(PAR_BLOCK)
            .enumerate()
            .for_each(|(c, chunk)| for_each_pair_in(chunk, stride, c * PAR_BLOCK, &f));
    } else {
        // few large blocks: split the pairs inside each block
        for (c, chunk) in state.chunks_mut(block).enumerate() {
            let base = c * block;
            let (lo, hi) = chunk.split_at_mut(stride);
            lo.par_iter_mut()
                .zip(hi.par_iter_mut())
                .enumerate()
                .for_each(|(j, (a, b))| f(base + j, a, b));
        }
    }
}

fn for_each_pair_in<F>(state: &mut [Complex64], stride: usize, offset: usize, f: &F)
where
    F: Fn(usize, &mut Complex64, &mut Complex64),
{
    let block = stride * 2;
    for (c, chunk) in state.chunks_mut(block).enumerate() {
        let base = offset + c * block;
        let (lo, hi) = chunk.split_at_mut(stride);
        for (j, (a, b)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
            f(base + j, a, b);
        }
    }
}

#[inline(always)]
fn apply_matrix(m: &[[Complex64; 2]; 2], a: &mut Complex64, b: &mut Complex64) {
    let amp0 = *a;
    let amp1 = *b;
    *a = m[0][0] * amp0 + m[0][1] * amp1;
    *b = m[1][0] * amp0 + m[1][1] * amp1;
}

/// Apply a 2×2 matrix to `target`
///
/// # Algorithm
/// For each pair differing only in bit `target`:
/// `(a₀, a₁) ← (m₀₀·a₀ + m₀₁·a₁, m₁₀·a₀ + m₁₁·a₁)`
pub fn apply_single_qubit(
    state: &mut [Complex64],
    matrix: &[[Complex64; 2]; 2],
    target: usize,
    parallel: bool,
) {
    let m = *matrix;
    for_each_pair(state, target, parallel, move |_, a, b| apply_matrix(&m, a, b));
}

/// Apply a 2×2 matrix to `target` on pairs whose `control` bit is set
pub fn apply_controlled(
    state: &mut [Complex64],
    matrix: &[[Complex64; 2]; 2],
    control: usize,
    target: usize,
    parallel: bool,
) {
    let m = *matrix;
    let mask_control = 1usize << control;
    for_each_pair(state, target, parallel, move |i, a, b| {
        if i & mask_control != 0 {
            apply_matrix(&m, a, b);
        }
    });
}

/// Negate every amplitude whose bits `a` and `b` are both set (CZ)
pub fn apply_phase_flip(state: &mut [Complex64], a: usize, b: usize, parallel: bool) {
    let mask_a = 1usize << a;
    for_each_pair(state, b, parallel, move |i, _, high| {
        if i & mask_a != 0 {
            *high = -*high;
        }
    });
}

/// Squared magnitudes of all amplitudes
pub fn probabilities(state: &[Complex64], parallel: bool) -> Vec<f64> {
    if parallel {
        state.par_iter().map(|amp| amp.norm_sqr()).collect()
    } else {
        state.iter().map(|amp| amp.norm_sqr()).collect()
    }
}

/// Sum of squared magnitudes
pub fn norm_sqr(state: &[Complex64], parallel: bool) -> f64 {
    if parallel {
        state.par_iter().map(|amp| amp.norm_sqr()).sum()
    } else {
        state.iter().map(|amp| amp.norm_sqr()).sum()
    }
}
