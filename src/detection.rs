use std::collections::HashMap;

use tracing::info;

use crate::error::SeismicError;
use crate::models::DetectedEvent;
use crate::waveform::{duration_from_seconds, WaveformCollection};

const DEFAULT_STA_SECONDS: f64 = 1.0;
const DEFAULT_LTA_SECONDS: f64 = 10.0;
const DEFAULT_THRESHOLD: f64 = 3.0;

/// Run STA/LTA event detection over every trace of a collection. Events are
/// reported in trace order with absolute timestamps.
pub fn detect_events(
    collection: &WaveformCollection,
    method: &str,
    parameters: &HashMap<String, f64>,
) -> Result<Vec<DetectedEvent>, SeismicError> {
    if method != "sta_lta" {
        return Err(SeismicError::UnknownMethod {
            method: method.to_string(),
        });
    }

    let sta_seconds = parameter(parameters, "sta", DEFAULT_STA_SECONDS)?;
    let lta_seconds = parameter(parameters, "lta", DEFAULT_LTA_SECONDS)?;
    let threshold = parameter(parameters, "threshold", DEFAULT_THRESHOLD)?;
    if sta_seconds >= lta_seconds {
        return Err(SeismicError::InvalidParameter {
            name: "sta".to_string(),
            message: "sta must be shorter than lta".to_string(),
        });
    }

    let mut events = Vec::new();
    for trace in &collection.traces {
        let nsta = ((sta_seconds * trace.sampling_rate) as usize).max(1);
        let nlta = ((lta_seconds * trace.sampling_rate) as usize).max(1);
        if trace.samples.len() <= nlta {
            continue;
        }

        let cft = recursive_sta_lta(&trace.samples, nsta, nlta);
        for (on, off) in trigger_onset(&cft, threshold, threshold) {
            let last = off.min(trace.samples.len() - 1);
            let magnitude = trace.samples[on..=last]
                .iter()
                .fold(0.0_f64, |acc, v| acc.max(v.abs()));
            events.push(DetectedEvent {
                start_time: trace.start_time
                    + duration_from_seconds(on as f64 / trace.sampling_rate),
                end_time: trace.start_time
                    + duration_from_seconds(last as f64 / trace.sampling_rate),
                magnitude,
                confidence: cft[on],
            });
        }
    }

    info!("Detected {} events", events.len());
    Ok(events)
}

fn parameter(
    parameters: &HashMap<String, f64>,
    name: &str,
    default: f64,
) -> Result<f64, SeismicError> {
    let value = parameters.get(name).copied().unwrap_or(default);
    if value <= 0.0 || !value.is_finite() {
        return Err(SeismicError::InvalidParameter {
            name: name.to_string(),
            message: "must be a positive number".to_string(),
        });
    }
    Ok(value)
}

/// Recursive STA/LTA characteristic function. The first `nlta` samples are
/// zeroed so the long-term average can settle before ratios are trusted.
fn recursive_sta_lta(samples: &[f64], nsta: usize, nlta: usize) -> Vec<f64> {
    let n = samples.len();
    let csta = 1.0 / nsta as f64;
    let clta = 1.0 / nlta as f64;

    let mut cft = vec![0.0; n];
    let mut sta = 0.0;
    let mut lta = f64::MIN_POSITIVE;
    for i in 1..n {
        let sq = samples[i] * samples[i];
        sta = csta * sq + (1.0 - csta) * sta;
        lta = clta * sq + (1.0 - clta) * lta;
        cft[i] = sta / lta;
    }
    for value in cft.iter_mut().take(nlta.min(n)) {
        *value = 0.0;
    }
    cft
}

/// Trigger windows from a characteristic function: open when the function
/// exceeds `thres_on`, close when it drops below `thres_off`. A window still
/// open at the end of the trace closes on the last sample.
fn trigger_onset(cft: &[f64], thres_on: f64, thres_off: f64) -> Vec<(usize, usize)> {
    let mut windows = Vec::new();
    let mut onset: Option<usize> = None;
    for (i, &value) in cft.iter().enumerate() {
        match onset {
            None if value > thres_on => onset = Some(i),
            Some(start) if value < thres_off => {
                windows.push((start, i));
                onset = None;
            }
            _ => {}
        }
    }
    if let Some(start) = onset {
        windows.push((start, cft.len() - 1));
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::waveform::Trace;

    fn trace_with(samples: Vec<f64>, sampling_rate: f64) -> Trace {
        Trace {
            network: "XX".to_string(),
            station: "TEST".to_string(),
            location: "00".to_string(),
            channel: "BHZ".to_string(),
            start_time: Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap(),
            sampling_rate,
            samples,
        }
    }

    fn collection_with(samples: Vec<f64>, sampling_rate: f64) -> WaveformCollection {
        let mut collection = WaveformCollection::new();
        collection.push(trace_with(samples, sampling_rate));
        collection
    }

    #[test]
    fn burst_in_quiet_signal_is_detected() {
        // 60 s of near-silence at 20 Hz with a strong burst in the middle.
        let rate = 20.0;
        let mut samples = vec![0.01; 1200];
        for value in samples.iter_mut().skip(600).take(40) {
            *value = 5.0;
        }
        let collection = collection_with(samples, rate);

        let events = detect_events(&collection, "sta_lta", &HashMap::new()).unwrap();
        assert_eq!(events.len(), 1);

        let event = &events[0];
        let burst_start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 30).unwrap();
        assert!(event.start_time >= burst_start);
        assert!(event.end_time > event.start_time);
        assert!((event.magnitude - 5.0).abs() < 1e-9);
        assert!(event.confidence > 3.0);
    }

    #[test]
    fn quiet_signal_produces_no_events() {
        let collection = collection_with(vec![0.01; 1200], 20.0);
        let events = detect_events(&collection, "sta_lta", &HashMap::new()).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn trace_shorter_than_lta_window_is_skipped() {
        // 5 s of data against the default 10 s LTA.
        let collection = collection_with(vec![1.0; 100], 20.0);
        let events = detect_events(&collection, "sta_lta", &HashMap::new()).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn unknown_method_is_rejected() {
        let collection = collection_with(vec![0.0; 100], 20.0);
        let err = detect_events(&collection, "z_detect", &HashMap::new()).unwrap_err();
        assert!(matches!(err, SeismicError::UnknownMethod { .. }));
    }

    #[test]
    fn sta_longer_than_lta_is_rejected() {
        let collection = collection_with(vec![0.0; 100], 20.0);
        let parameters = HashMap::from([("sta".to_string(), 20.0), ("lta".to_string(), 5.0)]);
        let err = detect_events(&collection, "sta_lta", &parameters).unwrap_err();
        assert!(matches!(
            err,
            SeismicError::InvalidParameter { ref name, .. } if name == "sta"
        ));
    }

    #[test]
    fn nonpositive_threshold_is_rejected() {
        let collection = collection_with(vec![0.0; 100], 20.0);
        let parameters = HashMap::from([("threshold".to_string(), -1.0)]);
        let err = detect_events(&collection, "sta_lta", &parameters).unwrap_err();
        assert!(matches!(
            err,
            SeismicError::InvalidParameter { ref name, .. } if name == "threshold"
        ));
    }

    #[test]
    fn window_open_at_end_of_trace_closes_on_last_sample() {
        let rate = 20.0;
        let mut samples = vec![0.01; 1200];
        // Burst running through the final sample.
        for value in samples.iter_mut().skip(1180) {
            *value = 5.0;
        }
        let collection = collection_with(samples, rate);

        let events = detect_events(&collection, "sta_lta", &HashMap::new()).unwrap();
        assert_eq!(events.len(), 1);
        let expected_end = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()
            + duration_from_seconds(1199.0 / rate);
        assert_eq!(events[0].end_time, expected_end);
    }
}
