fn is_gc(base: &u8) -> bool {
    matches!(base, b'G' | b'C' | b'g' | b'c')
}

/// Proportion of G and C bases, case insensitive. `0.0` for an empty sequence.
///
/// ```
/// # use seqcov::libs::gc::gc_content;
/// assert_eq!(gc_content(b"ACgtNN"), 2.0 / 6.0);
/// assert_eq!(gc_content(b""), 0.0);
/// ```
pub fn gc_content(seq: &[u8]) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    seq.iter().filter(|e| is_gc(e)).count() as f64 / seq.len() as f64
}

/// GC proportion of every window of `k` bases, left to right.
///
/// A sequence shorter than `k` is one window on its own, unless it is also shorter than
/// `min_size`, then there are no windows at all.
///
/// ```
/// # use seqcov::libs::gc::kmer_gc_frequencies;
/// assert_eq!(kmer_gc_frequencies(b"AACCGG", 4, 0), vec![0.5, 0.75, 1.0]);
/// assert_eq!(kmer_gc_frequencies(b"AAC", 4, 0), vec![1.0 / 3.0]);
/// assert!(kmer_gc_frequencies(b"AAC", 4, 5).is_empty());
/// ```
pub fn kmer_gc_frequencies(seq: &[u8], k: usize, min_size: usize) -> Vec<f64> {
    if seq.is_empty() || k == 0 {
        return vec![];
    }
    if k > seq.len() {
        if seq.len() < min_size {
            return vec![];
        }
        return vec![gc_content(seq)];
    }

    let mut gc = seq[..k].iter().filter(|e| is_gc(e)).count();
    let mut freqs = Vec::with_capacity(seq.len() - k + 1);
    freqs.push(gc as f64 / k as f64);
    for i in k..seq.len() {
        if is_gc(&seq[i - k]) {
            gc -= 1;
        }
        if is_gc(&seq[i]) {
            gc += 1;
        }
        freqs.push(gc as f64 / k as f64);
    }
    freqs
}

/// Highest GC proportion among the `k`-mers of `seq`
pub fn max_kmer_gc(seq: &[u8], k: usize) -> Option<f64> {
    kmer_gc_frequencies(seq, k, 0)
        .into_iter()
        .max_by(|a, b| a.total_cmp(b))
}

/// GC of a window next to the read depth over the same bases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GcDepthWindow {
    /// 0-based
    pub start: usize,
    pub gc_bases: usize,
    pub gc: f64,
    /// Mean depth of the window over the mean depth of the whole row
    pub relative_depth: f64,
}

/// Every `k`-base window of `seq` with its relative read depth.
///
/// Positions past the end of `depths` have depth 0. Nothing is returned for a sequence shorter
/// than `k` or a row with a mean depth of 0.
///
/// ```
/// # use seqcov::libs::gc::gc_depth_windows;
/// let windows = gc_depth_windows(b"AAGG", &[1, 1, 3, 3], 2);
/// assert_eq!(windows.len(), 3);
/// assert_eq!((windows[0].gc, windows[0].relative_depth), (0.0, 0.5));
/// assert_eq!((windows[2].gc, windows[2].relative_depth), (1.0, 1.5));
/// ```
pub fn gc_depth_windows(seq: &[u8], depths: &[u32], k: usize) -> Vec<GcDepthWindow> {
    if k == 0 || seq.len() < k || depths.is_empty() {
        return vec![];
    }
    let depth_sum: u64 = depths.iter().map(|&d| d as u64).sum();
    if depth_sum == 0 {
        return vec![];
    }
    let mean = depth_sum as f64 / depths.len() as f64;
    let depth_at = |i: usize| depths.get(i).copied().unwrap_or(0) as u64;

    let mut gc = seq[..k].iter().filter(|e| is_gc(e)).count();
    let mut window_depth: u64 = (0..k).map(depth_at).sum();
    let mut windows = Vec::with_capacity(seq.len() - k + 1);
    for start in 0..=(seq.len() - k) {
        if start > 0 {
            let (out, inn) = (start - 1, start + k - 1);
            if is_gc(&seq[out]) {
                gc -= 1;
            }
            if is_gc(&seq[inn]) {
                gc += 1;
            }
            window_depth = window_depth - depth_at(out) + depth_at(inn);
        }
        windows.push(GcDepthWindow {
            start,
            gc_bases: gc,
            gc: gc as f64 / k as f64,
            relative_depth: window_depth as f64 / k as f64 / mean,
        });
    }
    windows
}
