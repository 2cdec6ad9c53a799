//! Whole-asset audio analysis passes: one volume-profile probe and one
//! silence-timeline probe, each a single `ffmpeg` invocation regardless
//! of segment count.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::command::run_analysis_filter;
use crate::error::MediaResult;

/// Global mean/max loudness in dB, per the MVP contract in §4.E (a single
/// pair applied to every segment).
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeProfile {
    pub mean_db: f64,
    pub max_db: f64,
}

/// A detected silence range, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceRange {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

static MEAN_DB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Mean level dB:\s*(-?[0-9.]+)").unwrap());
static MAX_DB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:Peak|Max) level dB:\s*(-?[0-9.]+)").unwrap());
static SILENCE_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"silence_start:\s*(-?[0-9.]+)").unwrap());
static SILENCE_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"silence_end:\s*(-?[0-9.]+)\s*\|\s*silence_duration:\s*(-?[0-9.]+)").unwrap()
});

/// Run the `astats` filter once for the whole asset and parse the mean
/// and max dB out of its stderr report.
pub async fn probe_volume(path: impl AsRef<Path>) -> MediaResult<VolumeProfile> {
    let stderr = run_analysis_filter(path.as_ref(), "astats=metadata=1:reset=0").await?;

    let mean_db = MEAN_DB_RE
        .captures_iter(&stderr)
        .filter_map(|c| c[1].parse::<f64>().ok())
        .last()
        .unwrap_or(-30.0);
    let max_db = MAX_DB_RE
        .captures_iter(&stderr)
        .filter_map(|c| c[1].parse::<f64>().ok())
        .last()
        .unwrap_or(-10.0);

    Ok(VolumeProfile { mean_db, max_db })
}

/// Run the `silencedetect` filter once for the whole asset at `-40 dB`
/// with a 0.5 s minimum duration, returning the parsed silence ranges.
pub async fn probe_silence(path: impl AsRef<Path>) -> MediaResult<Vec<SilenceRange>> {
    let stderr =
        run_analysis_filter(path.as_ref(), "silencedetect=noise=-40dB:d=0.5").await?;

    let mut ranges = Vec::new();
    let mut pending_start: Option<f64> = None;

    for line in stderr.lines() {
        if let Some(caps) = SILENCE_START_RE.captures(line) {
            if let Ok(start) = caps[1].parse::<f64>() {
                pending_start = Some(start);
            }
        } else if let Some(caps) = SILENCE_END_RE.captures(line) {
            if let (Ok(end), Ok(duration)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
                let start = pending_start.take().unwrap_or((end - duration).max(0.0));
                ranges.push(SilenceRange {
                    start,
                    end,
                    duration,
                });
            }
        }
    }

    Ok(ranges)
}

/// Total overlap, in seconds, between `[start, end)` and any silence
/// range.
pub fn overlap_with_silence(ranges: &[SilenceRange], start: f64, end: f64) -> f64 {
    ranges
        .iter()
        .map(|r| {
            let overlap_start = start.max(r.start);
            let overlap_end = end.min(r.end);
            (overlap_end - overlap_start).max(0.0)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mean_and_max_db() {
        let stderr = "[Parsed_astats_0 @ 0x1] Overall\n\
                       [Parsed_astats_0 @ 0x1]     Mean level dB: -23.456\n\
                       [Parsed_astats_0 @ 0x1]     Peak level dB: -3.210\n";
        let mean = MEAN_DB_RE
            .captures_iter(stderr)
            .filter_map(|c| c[1].parse::<f64>().ok())
            .last()
            .unwrap();
        let max = MAX_DB_RE
            .captures_iter(stderr)
            .filter_map(|c| c[1].parse::<f64>().ok())
            .last()
            .unwrap();
        assert!((mean - (-23.456)).abs() < 1e-6);
        assert!((max - (-3.210)).abs() < 1e-6);
    }

    #[test]
    fn parses_silence_ranges() {
        let stderr = "[silencedetect @ 0x1] silence_start: 12.3\n\
                       [silencedetect @ 0x1] silence_end: 15.8 | silence_duration: 3.5\n";
        let mut ranges = Vec::new();
        let mut pending_start = None;
        for line in stderr.lines() {
            if let Some(caps) = SILENCE_START_RE.captures(line) {
                pending_start = Some(caps[1].parse::<f64>().unwrap());
            } else if let Some(caps) = SILENCE_END_RE.captures(line) {
                let end: f64 = caps[1].parse().unwrap();
                let duration: f64 = caps[2].parse().unwrap();
                let start = pending_start.take().unwrap();
                ranges.push(SilenceRange {
                    start,
                    end,
                    duration,
                });
            }
        }
        assert_eq!(ranges.len(), 1);
        assert!((ranges[0].start - 12.3).abs() < 1e-6);
        assert!((ranges[0].end - 15.8).abs() < 1e-6);
    }

    #[test]
    fn overlap_sums_across_ranges() {
        let ranges = vec![
            SilenceRange {
                start: 5.0,
                end: 10.0,
                duration: 5.0,
            },
            SilenceRange {
                start: 20.0,
                end: 25.0,
                duration: 5.0,
            },
        ];
        assert!((overlap_with_silence(&ranges, 8.0, 22.0) - 4.0).abs() < 1e-9);
    }
}
