//! One-pass filtering used as ground truth for the block-wise filter

#![allow(dead_code)]

use halofir::config::WindowAlignment;

/// Filter a whole sequence at once with zero history before the first sample
///
/// Products are summed in tap order, matching the block filter, so results
/// compare bit for bit.
pub fn filter_whole(input: &[f64], weights: &[f64], alignment: WindowAlignment) -> Vec<f64> {
    let taps = weights.len() as isize;
    let shift = match alignment {
        WindowAlignment::Preceding => 0,
        WindowAlignment::Inclusive => 1,
    };

    (0..input.len() as isize)
        .map(|i| {
            weights
                .iter()
                .enumerate()
                .map(|(k, w)| {
                    let idx = i - taps + shift + k as isize;
                    let x = if idx < 0 { 0.0 } else { input[idx as usize] };
                    w * x
                })
                .sum()
        })
        .collect()
}

/// Explicit inner product of `weights` with `input[start..start + L]`,
/// treating negative positions as zero
pub fn window_dot(input: &[f64], weights: &[f64], start: isize) -> f64 {
    weights
        .iter()
        .enumerate()
        .map(|(k, w)| {
            let idx = start + k as isize;
            if idx < 0 { 0.0 } else { w * input[idx as usize] }
        })
        .sum()
}
