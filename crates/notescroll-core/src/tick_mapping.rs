use notescroll_domain_score::{TempoPoint, DEFAULT_US_PER_QUARTER};

/// Length of a quarter note at the assumed 120 BPM.
pub const FIXED_MS_PER_BEAT: f64 = 500.0;

/// Converts audio milliseconds into timeline ticks.
#[derive(Clone, Debug)]
pub enum TickMapping {
    /// Every quarter note lasts [`FIXED_MS_PER_BEAT`], whatever the file says.
    FixedTempo { ticks_per_beat: u16 },
    /// Follows the file's tempo changes.
    TempoMap(TempoMap),
}

impl TickMapping {
    pub fn fixed(ticks_per_beat: u16) -> Self {
        TickMapping::FixedTempo {
            ticks_per_beat: ticks_per_beat.max(1),
        }
    }

    pub fn ms_to_tick(&self, ms: f64) -> f64 {
        match self {
            TickMapping::FixedTempo { ticks_per_beat } => {
                ms * *ticks_per_beat as f64 / FIXED_MS_PER_BEAT
            }
            TickMapping::TempoMap(map) => map.micros_to_tick(ms * 1000.0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TempoMap {
    ppq: u16,
    segments: Vec<TempoSegment>,
}

#[derive(Clone, Copy, Debug)]
struct TempoSegment {
    start_tick: f64,
    start_us: f64,
    us_per_quarter: f64,
}

impl TempoMap {
    pub fn new(ppq: u16, mut points: Vec<TempoPoint>) -> Self {
        let ppq = ppq.max(1);
        points.sort_by_key(|p| p.tick);
        if points.is_empty() || points[0].tick != 0 {
            points.insert(
                0,
                TempoPoint {
                    tick: 0,
                    us_per_quarter: DEFAULT_US_PER_QUARTER,
                },
            );
        }

        let mut segments = Vec::with_capacity(points.len());
        let mut current_us = 0.0;
        for (idx, point) in points.iter().enumerate() {
            if idx > 0 {
                let prev = &points[idx - 1];
                let delta_ticks = (point.tick - prev.tick) as f64;
                current_us += ticks_to_us(delta_ticks, prev.us_per_quarter as f64, ppq);
            }
            segments.push(TempoSegment {
                start_tick: point.tick as f64,
                start_us: current_us,
                us_per_quarter: point.us_per_quarter.max(1) as f64,
            });
        }

        Self { ppq, segments }
    }

    pub fn micros_to_tick(&self, micros: f64) -> f64 {
        let seg = self.segment_for_micros(micros);
        seg.start_tick + us_to_ticks(micros - seg.start_us, seg.us_per_quarter, self.ppq)
    }

    fn segment_for_micros(&self, micros: f64) -> TempoSegment {
        let mut current = self.segments[0];
        for seg in &self.segments {
            if seg.start_us > micros {
                break;
            }
            current = *seg;
        }
        current
    }
}

fn ticks_to_us(ticks: f64, us_per_quarter: f64, ppq: u16) -> f64 {
    ticks * us_per_quarter / ppq as f64
}

fn us_to_ticks(us: f64, us_per_quarter: f64, ppq: u16) -> f64 {
    us * ppq as f64 / us_per_quarter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(tick: i64, us_per_quarter: u32) -> TempoPoint {
        TempoPoint {
            tick,
            us_per_quarter,
        }
    }

    #[test]
    fn fixed_tempo_is_120_bpm() {
        let mapping = TickMapping::fixed(480);
        assert!((mapping.ms_to_tick(160.0) - 153.6).abs() < 1e-9);
        assert!((mapping.ms_to_tick(500.0) - 480.0).abs() < 1e-9);
    }

    #[test]
    fn default_tempo_map_matches_fixed_tempo() {
        let map = TickMapping::TempoMap(TempoMap::new(480, Vec::new()));
        let fixed = TickMapping::fixed(480);
        for ms in [0.0, 1.0, 250.0, 1234.5, 60_000.0] {
            assert!((map.ms_to_tick(ms) - fixed.ms_to_tick(ms)).abs() < 1e-6);
        }
    }

    #[test]
    fn tempo_change_is_integrated_piecewise() {
        // 480 ticks at 120 BPM (500 ms), then twice as fast
        let map = TempoMap::new(480, vec![point(0, 500_000), point(480, 250_000)]);
        assert!((map.micros_to_tick(500_000.0) - 480.0).abs() < 1e-6);
        assert!((map.micros_to_tick(750_000.0) - 960.0).abs() < 1e-6);
        assert!((map.micros_to_tick(1_000_000.0) - 1440.0).abs() < 1e-6);
    }

    #[test]
    fn unsorted_points_are_ordered() {
        let map = TempoMap::new(480, vec![point(480, 250_000), point(0, 500_000)]);
        assert!((map.micros_to_tick(750_000.0) - 960.0).abs() < 1e-6);
    }
}
