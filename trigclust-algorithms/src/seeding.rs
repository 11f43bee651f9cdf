//! Seed finding over the energy histogram.

use trigclust_core::{AlgoConfig, SeedingStrategy, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::histogram::Histogram;

/// A multicluster nucleation point found in the histogram.
///
/// Positions are bin centers, except under `InterpolatedMax` where they
/// carry sub-bin refinement. Seeds are produced in discovery order
/// (side, then r-bin, then phi), which downstream tie-breaking relies
/// on.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Seed {
    /// Endcap side.
    pub side: Side,
    /// Radial-proxy position.
    pub r_over_z: f64,
    /// Azimuthal position.
    pub phi: f64,
    /// Energy estimate (central bin content).
    pub energy: f64,
}

impl Seed {
    /// Projected x/z coordinate for association distances.
    #[inline]
    pub fn x_over_z(&self) -> f64 {
        self.r_over_z * self.phi.cos()
    }

    /// Projected y/z coordinate for association distances.
    #[inline]
    pub fn y_over_z(&self) -> f64 {
        self.r_over_z * self.phi.sin()
    }
}

/// Locates local energy maxima in the histogram using the configured
/// strategy.
#[derive(Debug, Clone)]
pub struct SeedFinder {
    strategy: SeedingStrategy,
    threshold: f64,
    secondary_phi_gap: usize,
}

impl SeedFinder {
    /// Creates a seed finder from the algorithm configuration.
    pub fn new(config: &AlgoConfig) -> Self {
        Self {
            strategy: config.seeding_strategy,
            threshold: config.histo_threshold,
            secondary_phi_gap: config.secondary_phi_gap,
        }
    }

    /// Finds seeds in discovery order. An empty or all-sub-threshold
    /// histogram yields no seeds.
    pub fn find(&self, histogram: &Histogram) -> Vec<Seed> {
        let mut seeds = Vec::new();
        for side in [Side::Minus, Side::Plus] {
            for r_bin in 0..histogram.n_bins_r() {
                match self.strategy {
                    SeedingStrategy::MaxPerRBin => {
                        self.max_per_r_bin(histogram, side, r_bin, false, &mut seeds);
                    }
                    SeedingStrategy::SecondaryMax => {
                        self.max_per_r_bin(histogram, side, r_bin, true, &mut seeds);
                    }
                    SeedingStrategy::Threshold => {
                        self.threshold_seeds(histogram, side, r_bin, &mut seeds);
                    }
                    SeedingStrategy::InterpolatedMax => {
                        self.interpolated_max(histogram, side, r_bin, &mut seeds);
                    }
                }
            }
        }
        seeds
    }

    fn bin_seed(histogram: &Histogram, side: Side, r_bin: usize, phi_bin: usize) -> Seed {
        Seed {
            side,
            r_over_z: histogram.r_bin_center(r_bin),
            phi: histogram.phi_bin_center(phi_bin),
            energy: histogram.get(side, r_bin, phi_bin),
        }
    }

    /// Largest phi bin of the radial window, optionally followed by a
    /// second local maximum separated from it by at least the
    /// configured phi gap.
    fn max_per_r_bin(
        &self,
        histogram: &Histogram,
        side: Side,
        r_bin: usize,
        secondary: bool,
        seeds: &mut Vec<Seed>,
    ) {
        let n_bins_phi = histogram.n_bins_phi();
        let mut max_bin = 0;
        let mut max_energy = f64::NEG_INFINITY;
        for phi_bin in 0..n_bins_phi {
            let energy = histogram.get(side, r_bin, phi_bin);
            if energy > max_energy {
                max_energy = energy;
                max_bin = phi_bin;
            }
        }
        if max_energy <= self.threshold {
            return;
        }
        seeds.push(Self::bin_seed(histogram, side, r_bin, max_bin));

        if !secondary {
            return;
        }
        let mut second: Option<(usize, f64)> = None;
        for phi_bin in 0..n_bins_phi {
            let gap = max_bin.abs_diff(phi_bin);
            if gap.min(n_bins_phi - gap) < self.secondary_phi_gap {
                continue;
            }
            let energy = histogram.get(side, r_bin, phi_bin);
            if energy <= self.threshold {
                continue;
            }
            // a secondary seed must be a local maximum, not a slope bin
            let left = histogram.get(side, r_bin, histogram.wrap_phi_bin(phi_bin as isize - 1));
            let right = histogram.get(side, r_bin, histogram.wrap_phi_bin(phi_bin as isize + 1));
            if energy <= left || energy <= right {
                continue;
            }
            if second.is_none_or(|(_, best)| energy > best) {
                second = Some((phi_bin, energy));
            }
        }
        if let Some((phi_bin, _)) = second {
            seeds.push(Self::bin_seed(histogram, side, r_bin, phi_bin));
        }
    }

    /// Every bin above threshold is an independent seed.
    fn threshold_seeds(
        &self,
        histogram: &Histogram,
        side: Side,
        r_bin: usize,
        seeds: &mut Vec<Seed>,
    ) {
        for phi_bin in 0..histogram.n_bins_phi() {
            if histogram.get(side, r_bin, phi_bin) > self.threshold {
                seeds.push(Self::bin_seed(histogram, side, r_bin, phi_bin));
            }
        }
    }

    /// Strict local maxima versus both phi neighbors, refined to
    /// sub-bin positions by quadratic interpolation.
    fn interpolated_max(
        &self,
        histogram: &Histogram,
        side: Side,
        r_bin: usize,
        seeds: &mut Vec<Seed>,
    ) {
        let n_bins_r = histogram.n_bins_r();
        for phi_bin in 0..histogram.n_bins_phi() {
            let center = histogram.get(side, r_bin, phi_bin);
            if center <= self.threshold {
                continue;
            }
            let left = histogram.get(side, r_bin, histogram.wrap_phi_bin(phi_bin as isize - 1));
            let right = histogram.get(side, r_bin, histogram.wrap_phi_bin(phi_bin as isize + 1));
            if center <= left || center <= right {
                continue;
            }

            let phi = histogram.phi_bin_center(phi_bin)
                + quadratic_vertex(left, center, right) * histogram.phi_bin_width();

            let mut r_over_z = histogram.r_bin_center(r_bin);
            if r_bin > 0 && r_bin + 1 < n_bins_r {
                let inner = histogram.get(side, r_bin - 1, phi_bin);
                let outer = histogram.get(side, r_bin + 1, phi_bin);
                if center > inner && center > outer {
                    r_over_z += quadratic_vertex(inner, center, outer) * histogram.r_bin_width();
                }
            }

            seeds.push(Seed {
                side,
                r_over_z,
                phi,
                energy: center,
            });
        }
    }
}

/// Vertex offset (in bin widths) of the parabola through three equally
/// spaced samples with a strict central maximum.
#[inline]
fn quadratic_vertex(left: f64, center: f64, right: f64) -> f64 {
    0.5 * (left - right) / (left - 2.0 * center + right)
}
