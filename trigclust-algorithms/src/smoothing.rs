//! Histogram smoothing passes.
//!
//! Two independent passes, each producing a new histogram so the raw
//! one stays available: a circular sliding sum along phi with a
//! per-r-bin window width, and a 3x3 weighted kernel over the r-phi
//! neighborhood (phi wraps, r clips at the edges).

use trigclust_core::Side;

use crate::histogram::Histogram;

/// Phi-direction smoothing: per (side, r-bin), each bin becomes the
/// circular sum of the `bin_sums[r_bin]`-wide phi window around it.
///
/// `bin_sums` holds one odd window width per radial bin (validated by
/// the configuration).
pub fn smooth_phi(histogram: &Histogram, bin_sums: &[usize]) -> Histogram {
    let n_bins_r = histogram.n_bins_r();
    let n_bins_phi = histogram.n_bins_phi();
    let mut smoothed = Histogram::new(n_bins_r, n_bins_phi);

    for side in [Side::Minus, Side::Plus] {
        for r_bin in 0..n_bins_r {
            let half = (bin_sums[r_bin] / 2) as isize;
            for phi_bin in 0..n_bins_phi {
                let mut content = 0.0;
                for offset in -half..=half {
                    let wrapped = histogram.wrap_phi_bin(phi_bin as isize + offset);
                    content += histogram.get(side, r_bin, wrapped);
                }
                smoothed.set(side, r_bin, phi_bin, content);
            }
        }
    }
    smoothed
}

/// R-phi smoothing: each bin becomes the weighted sum of itself and its
/// up-to-8 neighbors, with a row-major 3x3 kernel
/// (rows r-1, r, r+1; columns phi-1, phi, phi+1).
///
/// Phi neighbors wrap; radial rows outside the histogram contribute
/// nothing.
pub fn smooth_r_phi(histogram: &Histogram, kernel: &[f64; 9]) -> Histogram {
    let n_bins_r = histogram.n_bins_r();
    let n_bins_phi = histogram.n_bins_phi();
    let mut smoothed = Histogram::new(n_bins_r, n_bins_phi);

    for side in [Side::Minus, Side::Plus] {
        for r_bin in 0..n_bins_r {
            for phi_bin in 0..n_bins_phi {
                let mut content = 0.0;
                for dr in -1_isize..=1 {
                    let r_neighbor = r_bin as isize + dr;
                    if r_neighbor < 0 || r_neighbor >= n_bins_r as isize {
                        continue;
                    }
                    for dphi in -1_isize..=1 {
                        let phi_neighbor = histogram.wrap_phi_bin(phi_bin as isize + dphi);
                        let weight = kernel[((dr + 1) * 3 + dphi + 1) as usize];
                        content += weight * histogram.get(side, r_neighbor as usize, phi_neighbor);
                    }
                }
                smoothed.set(side, r_bin, phi_bin, content);
            }
        }
    }
    smoothed
}
