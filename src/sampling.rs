//! Bounded subsampling of tensor values for histograms.

use ndarray::{ArrayBase, Data, Dimension};
use rand::Rng;

/// Draw at most `k` values from the flattened (row-major) contents of `tensor`.
///
/// When the tensor holds `k` or fewer elements they are all returned in their
/// original order. Otherwise `k` positions are drawn uniformly *with
/// replacement*, so duplicates can appear. This is an approximation meant for
/// visualization, not an unbiased subsample.
pub fn sample_flat<S, D, R>(tensor: &ArrayBase<S, D>, k: usize, rng: &mut R) -> Vec<f32>
where
    S: Data<Elem = f32>,
    D: Dimension,
    R: Rng + ?Sized,
{
    let n = tensor.len();
    if n <= k {
        return tensor.iter().copied().collect();
    }

    match tensor.as_slice() {
        Some(flat) => draw(flat, k, rng),
        None => {
            let flat: Vec<f32> = tensor.iter().copied().collect();
            draw(&flat, k, rng)
        }
    }
}

fn draw<R: Rng + ?Sized>(flat: &[f32], k: usize, rng: &mut R) -> Vec<f32> {
    (0..k).map(|_| flat[rng.gen_range(0..flat.len())]).collect()
}
