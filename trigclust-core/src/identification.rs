//! Identification capability for finalized multiclusters.

use crate::multicluster::Multicluster;

/// Shower-identification scoring capability.
///
/// The classifier itself lives outside this crate; the finalizer only
/// needs a score and an accept decision for each candidate. The score is
/// recorded on the emitted multicluster either way, the decision sets
/// its accept flag.
pub trait Identification: Send + Sync {
    /// Model name.
    fn name(&self) -> &'static str;

    /// Identification score for a multicluster.
    fn score(&self, multicluster: &Multicluster) -> f64;

    /// Accept decision for a multicluster.
    fn decision(&self, multicluster: &Multicluster) -> bool {
        self.score(multicluster) > 0.0
    }
}

/// Trivial identification that accepts every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Identification for AcceptAll {
    fn name(&self) -> &'static str {
        "AcceptAll"
    }

    fn score(&self, _multicluster: &Multicluster) -> f64 {
        1.0
    }

    fn decision(&self, _multicluster: &Multicluster) -> bool {
        true
    }
}
