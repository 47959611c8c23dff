use chrono::{DateTime, Duration, Utc};

/// One continuous channel recording: samples at a fixed rate from a start
/// time. `end_time` is the time of the last sample.
#[derive(Debug, Clone)]
pub struct Trace {
    pub network: String,
    pub station: String,
    pub location: String,
    pub channel: String,
    pub start_time: DateTime<Utc>,
    pub sampling_rate: f64,
    pub samples: Vec<f64>,
}

impl Trace {
    pub fn source_id(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.network, self.station, self.location, self.channel
        )
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        if self.samples.len() < 2 {
            return self.start_time;
        }
        self.start_time + duration_from_seconds((self.samples.len() - 1) as f64 / self.sampling_rate)
    }

    /// Sample times in seconds relative to the trace start.
    pub fn relative_times(&self) -> Vec<f64> {
        (0..self.samples.len())
            .map(|i| i as f64 / self.sampling_rate)
            .collect()
    }

    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time <= end && self.end_time() >= start
    }
}

#[derive(Debug, Clone, Default)]
pub struct WaveformCollection {
    pub traces: Vec<Trace>,
}

impl WaveformCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// All samples across traces, concatenated in trace order.
    pub fn concatenated_samples(&self) -> Vec<f64> {
        self.traces
            .iter()
            .flat_map(|t| t.samples.iter().copied())
            .collect()
    }
}

pub(crate) fn duration_from_seconds(seconds: f64) -> Duration {
    Duration::microseconds((seconds * 1_000_000.0).round() as i64)
}
