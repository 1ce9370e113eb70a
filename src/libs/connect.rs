//! Classifies every base of a transcript by how well sequencing reads connect it to the parts
//! covered by assembled contigs.

/// Depth a base needs to count as supported by reads
pub const MIN_DEPTH: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Connectedness {
    LowDepth = 0,
    TranscriptCovered = 1,
    Disconnected = 2,
    Connected = 3,
}

impl Connectedness {
    fn is_anchor(self) -> bool {
        matches!(
            self,
            Connectedness::Connected | Connectedness::TranscriptCovered
        )
    }
}

/// States of every base of a transcript.
///
/// Bases with alignment coverage are `TranscriptCovered` and never change. Any other base with
/// enough read depth is `Connected` when its left neighbour is covered or connected, otherwise
/// `Disconnected`. A right to left pass then promotes bases next to an anchor on their right,
/// but only to `Connected`; a base left `LowDepth` by the first pass stays there.
///
/// Read depths beyond `read_depth`'s end are zero.
///
/// ```
/// # use seqcov::libs::connect::{classify, Connectedness::*};
/// let coverage = [0, 0, 1, 1, 0, 0];
/// let depth = [9, 9, 9, 9, 9, 2];
/// assert_eq!(
///     classify(&coverage, &depth, 5),
///     vec![Connected, Connected, TranscriptCovered, TranscriptCovered, Connected, LowDepth]
/// );
/// ```
pub fn classify(coverage: &[u32], read_depth: &[u32], min_depth: u32) -> Vec<Connectedness> {
    let depth_at = |i: usize| read_depth.get(i).copied().unwrap_or(0);

    let mut states: Vec<Connectedness> = coverage
        .iter()
        .map(|&c| {
            if c > 0 {
                Connectedness::TranscriptCovered
            } else {
                Connectedness::LowDepth
            }
        })
        .collect();

    let mut prev = Connectedness::LowDepth;
    for i in 0..states.len() {
        if states[i] != Connectedness::TranscriptCovered && depth_at(i) >= min_depth {
            states[i] = if prev.is_anchor() {
                Connectedness::Connected
            } else {
                Connectedness::Disconnected
            };
        }
        prev = states[i];
    }

    let mut prev = Connectedness::LowDepth;
    for i in (0..states.len()).rev() {
        if states[i] != Connectedness::TranscriptCovered
            && depth_at(i) >= min_depth
            && prev.is_anchor()
        {
            states[i] = Connectedness::Connected;
        }
        prev = states[i];
    }

    states
}

/// Number of bases in every state
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StateCounts {
    pub low_depth: usize,
    pub transcript_covered: usize,
    pub disconnected: usize,
    pub connected: usize,
}

impl StateCounts {
    pub fn from_states(states: &[Connectedness]) -> Self {
        let mut counts = Self::default();
        for state in states {
            match state {
                Connectedness::LowDepth => counts.low_depth += 1,
                Connectedness::TranscriptCovered => counts.transcript_covered += 1,
                Connectedness::Disconnected => counts.disconnected += 1,
                Connectedness::Connected => counts.connected += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.low_depth + self.transcript_covered + self.disconnected + self.connected
    }
}

pub fn count_states(coverage: &[u32], read_depth: &[u32], min_depth: u32) -> StateCounts {
    StateCounts::from_states(&classify(coverage, read_depth, min_depth))
}
