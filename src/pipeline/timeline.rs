use crate::media::SilenceTimeline;

/// A half-open time range `[start, end)` within the source audio, seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioInterval {
    pub start: f64,
    pub end: f64,
}

impl AudioInterval {
    pub fn new(start: f64, end: f64) -> Self {
        debug_assert!(start < end, "interval must have positive length");
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Derive the nonsilent complement of a silence timeline, clipped to
/// `[0, duration]`.
///
/// The i-th start is paired with the i-th end by position. A cursor walks
/// forward from 0: everything between the cursor and the next silence start
/// is nonsilent, and the cursor jumps to that silence's end. Whatever
/// remains before `duration` after the last pair is a trailing nonsilent
/// interval. Zero markers therefore yield one interval covering the whole
/// file (and none at all for an empty file).
pub fn nonsilent_intervals(timeline: &SilenceTimeline, duration: f64) -> Vec<AudioInterval> {
    let mut intervals = Vec::new();
    let mut prev = 0.0;

    for (&start, &end) in timeline.starts.iter().zip(timeline.ends.iter()) {
        if start > prev {
            intervals.push(AudioInterval { start: prev, end: start });
        }
        prev = end;
    }

    if prev < duration {
        intervals.push(AudioInterval {
            start: prev,
            end: duration,
        });
    }

    intervals
}

/// Fixed-length segmentation used when silence detection fails: intervals of
/// `segment_sec` from 0, the last clipped to `duration`.
pub fn fallback_intervals(duration: f64, segment_sec: f64) -> Vec<AudioInterval> {
    debug_assert!(segment_sec > 0.0, "segment length must be positive");

    let mut intervals = Vec::new();
    let mut start = 0.0;

    while start < duration {
        let end = (start + segment_sec).min(duration);
        intervals.push(AudioInterval { start, end });
        start = end;
    }

    intervals
}
