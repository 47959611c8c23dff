use std::collections::HashMap;

use biquad::{Biquad, Coefficients, DirectForm2Transposed, Hertz, Type};
use serde_json::{json, Value};
use tracing::info;

use crate::error::SeismicError;
use crate::models::PerformanceMetrics;
use crate::waveform::{Trace, WaveformCollection};

// Section Q values of a 4th-order Butterworth response, realized as two
// cascaded biquads.
const BUTTERWORTH_SECTION_Q: [f64; 2] = [0.541_196_100_146_197, 1.306_562_964_876_376_5];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingMethod {
    Bandpass,
    Lowpass,
    Highpass,
    MovingAverage,
}

impl ProcessingMethod {
    pub fn parse(name: &str) -> Result<Self, SeismicError> {
        match name {
            "bandpass" => Ok(Self::Bandpass),
            "lowpass" => Ok(Self::Lowpass),
            "highpass" => Ok(Self::Highpass),
            "moving_average" => Ok(Self::MovingAverage),
            other => Err(SeismicError::UnknownMethod {
                method: other.to_string(),
            }),
        }
    }
}

/// Method names and parameter specifications for the discovery endpoint.
pub fn method_parameters() -> Value {
    json!({
        "bandpass": {
            "freqmin": { "type": "float", "min": 0.1, "max": 25, "default": 1 },
            "freqmax": { "type": "float", "min": 0.1, "max": 25, "default": 10 },
        },
        "lowpass": {
            "freq": { "type": "float", "min": 0.1, "max": 25, "default": 1 },
        },
        "highpass": {
            "freq": { "type": "float", "min": 0.1, "max": 25, "default": 1 },
        },
        "moving_average": {
            "window_size": { "type": "int", "min": 1, "max": 1000, "default": 10 },
        },
    })
}

/// Apply a de-noising method and report the before/after signal-to-noise
/// ratio. Improvement is pinned to 0 when the pre-ratio is 0.
pub fn process(
    collection: &WaveformCollection,
    method: &str,
    parameters: &HashMap<String, f64>,
) -> Result<PerformanceMetrics, SeismicError> {
    let method = ProcessingMethod::parse(method)?;
    let snr_before = signal_to_noise(collection);

    let processed = apply(collection, method, parameters)?;
    let snr_after = signal_to_noise(&processed);

    let improvement = if snr_before != 0.0 {
        (snr_after - snr_before) / snr_before * 100.0
    } else {
        0.0
    };

    info!(
        "Processed {} traces: SNR {:.4} -> {:.4}",
        collection.len(),
        snr_before,
        snr_after
    );
    Ok(PerformanceMetrics {
        snr_before,
        snr_after,
        improvement,
    })
}

fn apply(
    collection: &WaveformCollection,
    method: ProcessingMethod,
    parameters: &HashMap<String, f64>,
) -> Result<WaveformCollection, SeismicError> {
    match method {
        ProcessingMethod::Bandpass => {
            let freqmin = require(parameters, "freqmin")?;
            let freqmax = require(parameters, "freqmax")?;
            if freqmin >= freqmax {
                return Err(SeismicError::InvalidParameter {
                    name: "freqmin".to_string(),
                    message: "freqmin must be below freqmax".to_string(),
                });
            }
            map_traces(collection, |trace| {
                let highpassed = butterworth(
                    &trace.samples,
                    trace.sampling_rate,
                    FilterKind::High,
                    freqmin,
                    "freqmin",
                )?;
                butterworth(
                    &highpassed,
                    trace.sampling_rate,
                    FilterKind::Low,
                    freqmax,
                    "freqmax",
                )
            })
        }
        ProcessingMethod::Lowpass => {
            let freq = require(parameters, "freq")?;
            map_traces(collection, |trace| {
                butterworth(
                    &trace.samples,
                    trace.sampling_rate,
                    FilterKind::Low,
                    freq,
                    "freq",
                )
            })
        }
        ProcessingMethod::Highpass => {
            let freq = require(parameters, "freq")?;
            map_traces(collection, |trace| {
                butterworth(
                    &trace.samples,
                    trace.sampling_rate,
                    FilterKind::High,
                    freq,
                    "freq",
                )
            })
        }
        ProcessingMethod::MovingAverage => {
            let raw = require(parameters, "window_size")?;
            if raw < 1.0 {
                return Err(SeismicError::InvalidParameter {
                    name: "window_size".to_string(),
                    message: "window_size must be at least 1".to_string(),
                });
            }
            let window = raw as usize;
            map_traces(collection, |trace| Ok(moving_average(&trace.samples, window)))
        }
    }
}

fn map_traces<F>(collection: &WaveformCollection, f: F) -> Result<WaveformCollection, SeismicError>
where
    F: Fn(&Trace) -> Result<Vec<f64>, SeismicError>,
{
    let mut out = WaveformCollection::new();
    for trace in &collection.traces {
        let samples = f(trace)?;
        out.push(Trace {
            samples,
            ..trace.clone()
        });
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy)]
enum FilterKind {
    Low,
    High,
}

fn butterworth(
    samples: &[f64],
    sampling_rate: f64,
    kind: FilterKind,
    corner: f64,
    param: &str,
) -> Result<Vec<f64>, SeismicError> {
    let invalid = |message: &str| SeismicError::InvalidParameter {
        name: param.to_string(),
        message: message.to_string(),
    };

    if corner <= 0.0 {
        return Err(invalid("corner frequency must be positive"));
    }
    if corner >= sampling_rate / 2.0 {
        return Err(invalid(
            "corner frequency must be below the Nyquist frequency",
        ));
    }

    let fs = Hertz::<f64>::from_hz(sampling_rate).map_err(|_| SeismicError::Internal {
        message: format!("invalid sampling rate {}", sampling_rate),
    })?;
    let f0 = Hertz::<f64>::from_hz(corner)
        .map_err(|_| invalid("corner frequency must be positive"))?;

    let mut stages = Vec::with_capacity(BUTTERWORTH_SECTION_Q.len());
    for q in BUTTERWORTH_SECTION_Q {
        let filter_type = match kind {
            FilterKind::Low => Type::LowPass,
            FilterKind::High => Type::HighPass,
        };
        let coefficients = Coefficients::<f64>::from_params(filter_type, fs, f0, q)
            .map_err(|_| invalid("corner frequency must be below the Nyquist frequency"))?;
        stages.push(DirectForm2Transposed::<f64>::new(coefficients));
    }

    let mut out = Vec::with_capacity(samples.len());
    for &x in samples {
        let mut y = x;
        for stage in stages.iter_mut() {
            y = stage.run(y);
        }
        out.push(y);
    }
    Ok(out)
}

/// Centered uniform-kernel smoothing with same-length output and zero-padded
/// edges; a window of 1 is the identity.
fn moving_average(samples: &[f64], window: usize) -> Vec<f64> {
    let n = samples.len();
    if window <= 1 || n == 0 {
        return samples.to_vec();
    }
    let offset = window - 1 - (window - 1) / 2;
    (0..n)
        .map(|i| {
            let mut acc = 0.0;
            for k in 0..window {
                let idx = i as isize + k as isize - offset as isize;
                if idx >= 0 && (idx as usize) < n {
                    acc += samples[idx as usize];
                }
            }
            acc / window as f64
        })
        .collect()
}

/// Mean absolute amplitude over population standard deviation across all
/// concatenated samples; 0 for empty or zero-variance signals.
pub fn signal_to_noise(collection: &WaveformCollection) -> f64 {
    let signal = collection.concatenated_samples();
    if signal.is_empty() {
        return 0.0;
    }
    let n = signal.len() as f64;
    let mean = signal.iter().sum::<f64>() / n;
    let variance = signal.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();
    if std == 0.0 {
        return 0.0;
    }
    let mean_abs = signal.iter().map(|v| v.abs()).sum::<f64>() / n;
    mean_abs / std
}

fn require(parameters: &HashMap<String, f64>, name: &str) -> Result<f64, SeismicError> {
    parameters
        .get(name)
        .copied()
        .ok_or_else(|| SeismicError::MissingParameter {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn collection_of(samples: Vec<f64>, rate: f64) -> WaveformCollection {
        let mut collection = WaveformCollection::new();
        collection.push(Trace {
            network: "XB".to_string(),
            station: "ELYSE".to_string(),
            location: "02".to_string(),
            channel: "BHV".to_string(),
            start_time: Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap(),
            sampling_rate: rate,
            samples,
        });
        collection
    }

    fn params(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn moving_average_window_one_is_identity() {
        let collection = collection_of(vec![3.0, -1.0, 4.0, 1.0, -5.0], 20.0);
        let metrics = process(
            &collection,
            "moving_average",
            &params(&[("window_size", 1.0)]),
        )
        .unwrap();
        assert_eq!(metrics.snr_before, metrics.snr_after);
        assert_eq!(metrics.improvement, 0.0);
    }

    #[test]
    fn moving_average_smooths_with_zero_padded_edges() {
        let out = moving_average(&[3.0, 3.0, 3.0], 3);
        // Edge windows pick up one zero pad each.
        assert_eq!(out, vec![2.0, 3.0, 2.0]);
    }

    #[test]
    fn snr_of_constant_zero_signal_is_zero() {
        let collection = collection_of(vec![0.0; 128], 20.0);
        assert_eq!(signal_to_noise(&collection), 0.0);
    }

    #[test]
    fn improvement_is_zero_when_snr_before_is_zero() {
        let collection = collection_of(vec![0.0; 128], 20.0);
        let metrics = process(
            &collection,
            "moving_average",
            &params(&[("window_size", 4.0)]),
        )
        .unwrap();
        assert_eq!(metrics.snr_before, 0.0);
        assert_eq!(metrics.improvement, 0.0);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let collection = collection_of(vec![1.0, 2.0], 20.0);
        let err = process(&collection, "wavelet", &HashMap::new()).unwrap_err();
        assert!(matches!(err, SeismicError::UnknownMethod { .. }));
    }

    #[test]
    fn missing_parameter_is_rejected() {
        let collection = collection_of(vec![1.0, 2.0], 20.0);
        let err = process(&collection, "lowpass", &HashMap::new()).unwrap_err();
        assert!(matches!(err, SeismicError::MissingParameter { .. }));
    }

    #[test]
    fn corner_above_nyquist_is_rejected() {
        let collection = collection_of(vec![1.0, 2.0, 3.0], 20.0);
        let err = process(&collection, "lowpass", &params(&[("freq", 15.0)])).unwrap_err();
        assert!(matches!(err, SeismicError::InvalidParameter { .. }));
    }

    #[test]
    fn inverted_band_is_rejected() {
        let collection = collection_of(vec![1.0, 2.0, 3.0], 20.0);
        let err = process(
            &collection,
            "bandpass",
            &params(&[("freqmin", 5.0), ("freqmax", 2.0)]),
        )
        .unwrap_err();
        assert!(matches!(err, SeismicError::InvalidParameter { .. }));
    }

    #[test]
    fn lowpass_attenuates_high_frequency_content() {
        // 100 Hz sampling; alternating signal is at Nyquist, far above the
        // 2 Hz corner.
        let samples: Vec<f64> = (0..512).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let filtered = butterworth(&samples, 100.0, FilterKind::Low, 2.0, "freq").unwrap();
        let in_energy: f64 = samples.iter().map(|v| v * v).sum();
        let out_energy: f64 = filtered.iter().map(|v| v * v).sum();
        assert!(out_energy < in_energy / 100.0);
    }

    #[test]
    fn highpass_removes_constant_offset() {
        let samples = vec![1.0; 512];
        let filtered = butterworth(&samples, 100.0, FilterKind::High, 2.0, "freq").unwrap();
        let tail_energy: f64 = filtered[256..].iter().map(|v| v * v).sum();
        assert!(tail_energy < 1e-3);
    }
}
