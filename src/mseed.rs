//! miniSEED v2 record reader.
//!
//! Parses the 48-byte fixed header, walks the blockette chain for blockette
//! 1000 (encoding, record length), decodes the sample payload, and assembles
//! per-channel records into continuous traces. Header byte order is detected
//! from the year field; records without blockette 1000 are rejected.

use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;

use crate::waveform::Trace;

const FIXED_HEADER_LEN: usize = 48;
const STEIM_FRAME_LEN: usize = 64;

#[derive(Error, Debug)]
pub enum MseedError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("{path}: file contains no data")]
    Empty { path: String },

    #[error("{path}: record at offset {offset} is truncated")]
    Truncated { path: String, offset: usize },

    #[error("{path}: record at offset {offset}: {detail}")]
    BadRecord {
        path: String,
        offset: usize,
        detail: String,
    },

    #[error("{path}: record at offset {offset} has no blockette 1000")]
    MissingBlockette1000 { path: String, offset: usize },

    #[error("{path}: unsupported sample encoding {encoding}")]
    UnsupportedEncoding { path: String, encoding: u8 },
}

#[derive(Debug, Clone)]
struct RawRecord {
    network: String,
    station: String,
    location: String,
    channel: String,
    start_time: DateTime<Utc>,
    sampling_rate: f64,
    samples: Vec<f64>,
    record_len: usize,
}

impl RawRecord {
    fn source_id(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.network, self.station, self.location, self.channel
        )
    }
}

/// Read every data record in a file and assemble them into traces. Records
/// sharing a source id and contiguous within half a sample period are merged;
/// gaps start a new trace.
pub fn read_traces(path: &Path) -> Result<Vec<Trace>, MseedError> {
    let path_str = path.display().to_string();
    let buf = std::fs::read(path).map_err(|source| MseedError::Io {
        path: path_str.clone(),
        source,
    })?;

    if buf.is_empty() {
        return Err(MseedError::Empty { path: path_str });
    }

    let mut records = Vec::new();
    let mut offset = 0;
    while offset < buf.len() {
        if offset + FIXED_HEADER_LEN > buf.len() {
            return Err(MseedError::Truncated {
                path: path_str,
                offset,
            });
        }
        let record = parse_record(&path_str, &buf, offset)?;
        offset += record.record_len;
        if !record.samples.is_empty() {
            records.push(record);
        }
    }

    Ok(assemble_traces(records))
}

fn parse_record(path: &str, buf: &[u8], offset: usize) -> Result<RawRecord, MseedError> {
    let header = &buf[offset..];

    // The header carries no byte-order marker; a plausible year under one
    // interpretation decides it.
    let year_be = u16::from_be_bytes([header[20], header[21]]);
    let year_le = u16::from_le_bytes([header[20], header[21]]);
    let big_endian = if (1900..=2100).contains(&year_be) {
        true
    } else if (1900..=2100).contains(&year_le) {
        false
    } else {
        return Err(MseedError::BadRecord {
            path: path.to_string(),
            offset,
            detail: format!("implausible header year ({}/{})", year_be, year_le),
        });
    };

    let read_u16 = |at: usize| -> u16 {
        let bytes = [header[at], header[at + 1]];
        if big_endian {
            u16::from_be_bytes(bytes)
        } else {
            u16::from_le_bytes(bytes)
        }
    };
    let read_i16 = |at: usize| read_u16(at) as i16;
    let read_i32 = |at: usize| -> i32 {
        let bytes = [header[at], header[at + 1], header[at + 2], header[at + 3]];
        if big_endian {
            i32::from_be_bytes(bytes)
        } else {
            i32::from_le_bytes(bytes)
        }
    };

    let station = ascii_field(&header[8..13]);
    let location = ascii_field(&header[13..15]);
    let channel = ascii_field(&header[15..18]);
    let network = ascii_field(&header[18..20]);

    let year = read_u16(20);
    let day_of_year = read_u16(22);
    let hour = header[24];
    let minute = header[25];
    let second = header[26];
    let fract = read_u16(28);

    let num_samples = read_u16(30) as usize;
    let rate_factor = read_i16(32);
    let rate_multiplier = read_i16(34);
    let activity_flags = header[36];
    let time_correction = read_i32(40);
    let data_offset = read_u16(44) as usize;
    let first_blockette = read_u16(46) as usize;

    let mut start_time = btime_to_datetime(year, day_of_year, hour, minute, second, fract)
        .ok_or_else(|| MseedError::BadRecord {
            path: path.to_string(),
            offset,
            detail: format!("invalid record start time {}-{}", year, day_of_year),
        })?;

    // Time correction is in 0.1 ms units; activity bit 1 marks it as already
    // folded into the header time.
    if time_correction != 0 && activity_flags & 0x02 == 0 {
        start_time += Duration::microseconds(time_correction as i64 * 100);
    }

    // Blockette 1000 carries the encoding and the record length.
    let mut blockette_1000: Option<(u8, u8)> = None;
    let mut blockette_offset = first_blockette;
    for _ in 0..16 {
        if blockette_offset < FIXED_HEADER_LEN || offset + blockette_offset + 8 > buf.len() {
            break;
        }
        let blockette_type = read_u16(blockette_offset);
        let next = read_u16(blockette_offset + 2) as usize;
        if blockette_type == 1000 {
            let encoding = header[blockette_offset + 4];
            let record_len_exp = header[blockette_offset + 6];
            blockette_1000 = Some((encoding, record_len_exp));
            break;
        }
        if next == 0 || next <= blockette_offset {
            break;
        }
        blockette_offset = next;
    }

    let (encoding, record_len_exp) =
        blockette_1000.ok_or_else(|| MseedError::MissingBlockette1000 {
            path: path.to_string(),
            offset,
        })?;

    if !(6..=20).contains(&record_len_exp) {
        return Err(MseedError::BadRecord {
            path: path.to_string(),
            offset,
            detail: format!("implausible record length exponent {}", record_len_exp),
        });
    }
    let record_len = 1usize << record_len_exp;
    if offset + record_len > buf.len() {
        return Err(MseedError::Truncated {
            path: path.to_string(),
            offset,
        });
    }

    let sampling_rate = nominal_sampling_rate(rate_factor, rate_multiplier);
    if num_samples > 0 && sampling_rate <= 0.0 {
        return Err(MseedError::BadRecord {
            path: path.to_string(),
            offset,
            detail: format!(
                "non-positive sampling rate (factor {}, multiplier {})",
                rate_factor, rate_multiplier
            ),
        });
    }

    let samples = if num_samples == 0 {
        Vec::new()
    } else {
        if data_offset < FIXED_HEADER_LEN || data_offset >= record_len {
            return Err(MseedError::BadRecord {
                path: path.to_string(),
                offset,
                detail: format!("invalid data offset {}", data_offset),
            });
        }
        let data = &buf[offset + data_offset..offset + record_len];
        decode_samples(path, offset, data, encoding, num_samples, big_endian)?
    };

    Ok(RawRecord {
        network,
        station,
        location,
        channel,
        start_time,
        sampling_rate,
        samples,
        record_len,
    })
}

fn ascii_field(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).trim().to_string()
}

fn btime_to_datetime(
    year: u16,
    day_of_year: u16,
    hour: u8,
    minute: u8,
    second: u8,
    fract: u16,
) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_yo_opt(year as i32, day_of_year as u32)?;
    let time = date.and_hms_micro_opt(
        hour as u32,
        minute as u32,
        second as u32,
        fract as u32 * 100,
    )?;
    Some(time.and_utc())
}

// SEED sample rate convention: positive values are counts, negative values
// are inverse counts.
fn nominal_sampling_rate(factor: i16, multiplier: i16) -> f64 {
    let f = factor as f64;
    let m = multiplier as f64;
    match (factor, multiplier) {
        (0, _) | (_, 0) => 0.0,
        (f_, m_) if f_ > 0 && m_ > 0 => f * m,
        (f_, m_) if f_ > 0 && m_ < 0 => f / -m,
        (f_, m_) if f_ < 0 && m_ > 0 => m / -f,
        _ => 1.0 / (f * m),
    }
}

fn decode_samples(
    path: &str,
    offset: usize,
    data: &[u8],
    encoding: u8,
    num_samples: usize,
    big_endian: bool,
) -> Result<Vec<f64>, MseedError> {
    let need = |width: usize| -> Result<(), MseedError> {
        if data.len() < num_samples * width {
            Err(MseedError::Truncated {
                path: path.to_string(),
                offset,
            })
        } else {
            Ok(())
        }
    };

    match encoding {
        // INT16
        1 => {
            need(2)?;
            Ok(data
                .chunks_exact(2)
                .take(num_samples)
                .map(|c| {
                    let bytes = [c[0], c[1]];
                    let v = if big_endian {
                        i16::from_be_bytes(bytes)
                    } else {
                        i16::from_le_bytes(bytes)
                    };
                    v as f64
                })
                .collect())
        }
        // INT32
        3 => {
            need(4)?;
            Ok(data
                .chunks_exact(4)
                .take(num_samples)
                .map(|c| read_i32_bytes(c, big_endian) as f64)
                .collect())
        }
        // FLOAT32
        4 => {
            need(4)?;
            Ok(data
                .chunks_exact(4)
                .take(num_samples)
                .map(|c| {
                    let bytes = [c[0], c[1], c[2], c[3]];
                    let v = if big_endian {
                        f32::from_be_bytes(bytes)
                    } else {
                        f32::from_le_bytes(bytes)
                    };
                    v as f64
                })
                .collect())
        }
        // FLOAT64
        5 => {
            need(8)?;
            Ok(data
                .chunks_exact(8)
                .take(num_samples)
                .map(|c| {
                    let bytes = [c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]];
                    if big_endian {
                        f64::from_be_bytes(bytes)
                    } else {
                        f64::from_le_bytes(bytes)
                    }
                })
                .collect())
        }
        // Steim1 / Steim2
        10 | 11 => decode_steim(
            path,
            offset,
            data,
            num_samples,
            big_endian,
            if encoding == 10 { 1 } else { 2 },
        ),
        other => Err(MseedError::UnsupportedEncoding {
            path: path.to_string(),
            encoding: other,
        }),
    }
}

fn read_u32_bytes(c: &[u8], big_endian: bool) -> u32 {
    let bytes = [c[0], c[1], c[2], c[3]];
    if big_endian {
        u32::from_be_bytes(bytes)
    } else {
        u32::from_le_bytes(bytes)
    }
}

fn read_i32_bytes(c: &[u8], big_endian: bool) -> i32 {
    read_u32_bytes(c, big_endian) as i32
}

fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

fn decode_steim(
    path: &str,
    offset: usize,
    data: &[u8],
    num_samples: usize,
    big_endian: bool,
    level: u8,
) -> Result<Vec<f64>, MseedError> {
    let bad = |detail: String| MseedError::BadRecord {
        path: path.to_string(),
        offset,
        detail,
    };

    let mut diffs: Vec<i32> = Vec::with_capacity(num_samples);
    let mut first_sample: Option<i32> = None;

    for (frame_index, frame) in data.chunks_exact(STEIM_FRAME_LEN).enumerate() {
        let nibbles = read_u32_bytes(&frame[0..4], big_endian);
        for word_index in 1..16 {
            let word = &frame[word_index * 4..word_index * 4 + 4];
            // Frame 0 words 1 and 2 hold the forward and reverse
            // integration constants, not differences.
            if frame_index == 0 && word_index == 1 {
                first_sample = Some(read_i32_bytes(word, big_endian));
                continue;
            }
            if frame_index == 0 && word_index == 2 {
                continue;
            }

            let nibble = (nibbles >> (2 * (15 - word_index))) & 0x3;
            let w = read_u32_bytes(word, big_endian);
            match (level, nibble) {
                (_, 0) => {}
                (_, 1) => {
                    for &b in word {
                        diffs.push(b as i8 as i32);
                    }
                }
                (1, 2) => {
                    diffs.push(sign_extend(w >> 16, 16));
                    diffs.push(sign_extend(w & 0xFFFF, 16));
                }
                (1, 3) => {
                    diffs.push(w as i32);
                }
                (2, 2) => match w >> 30 {
                    1 => diffs.push(sign_extend(w & 0x3FFF_FFFF, 30)),
                    2 => {
                        diffs.push(sign_extend((w >> 15) & 0x7FFF, 15));
                        diffs.push(sign_extend(w & 0x7FFF, 15));
                    }
                    3 => {
                        diffs.push(sign_extend((w >> 20) & 0x3FF, 10));
                        diffs.push(sign_extend((w >> 10) & 0x3FF, 10));
                        diffs.push(sign_extend(w & 0x3FF, 10));
                    }
                    dnib => return Err(bad(format!("invalid Steim2 dnib {} for nibble 2", dnib))),
                },
                (2, 3) => match w >> 30 {
                    0 => {
                        for shift in [24u32, 18, 12, 6, 0] {
                            diffs.push(sign_extend((w >> shift) & 0x3F, 6));
                        }
                    }
                    1 => {
                        for shift in [25u32, 20, 15, 10, 5, 0] {
                            diffs.push(sign_extend((w >> shift) & 0x1F, 5));
                        }
                    }
                    2 => {
                        for shift in [24u32, 20, 16, 12, 8, 4, 0] {
                            diffs.push(sign_extend((w >> shift) & 0xF, 4));
                        }
                    }
                    dnib => return Err(bad(format!("invalid Steim2 dnib {} for nibble 3", dnib))),
                },
                (_, nib) => return Err(bad(format!("invalid Steim1 nibble {}", nib))),
            }
        }
        if diffs.len() >= num_samples {
            break;
        }
    }

    let first = first_sample.ok_or_else(|| bad("missing Steim integration constant".into()))?;
    if diffs.len() < num_samples {
        return Err(bad(format!(
            "decoded {} of {} Steim differences",
            diffs.len(),
            num_samples
        )));
    }

    // The series starts at the forward integration constant; the first
    // difference spans the preceding record and is discarded.
    let mut out = Vec::with_capacity(num_samples);
    out.push(first as f64);
    let mut current = first;
    for &d in diffs.iter().take(num_samples).skip(1) {
        current = current.wrapping_add(d);
        out.push(current as f64);
    }
    Ok(out)
}

fn assemble_traces(mut records: Vec<RawRecord>) -> Vec<Trace> {
    records.sort_by(|a, b| {
        a.source_id()
            .cmp(&b.source_id())
            .then(a.start_time.cmp(&b.start_time))
    });

    let mut traces: Vec<Trace> = Vec::new();
    for record in records {
        let continues_previous = traces.last().is_some_and(|trace| {
            if trace.source_id() != record.source_id()
                || (trace.sampling_rate - record.sampling_rate).abs() > f64::EPSILON
            {
                return false;
            }
            let period_us = 1_000_000.0 / trace.sampling_rate;
            let expected = trace.end_time() + Duration::microseconds(period_us.round() as i64);
            let gap = (record.start_time - expected)
                .num_microseconds()
                .unwrap_or(i64::MAX);
            (gap as f64).abs() <= period_us / 2.0
        });

        if continues_previous {
            if let Some(trace) = traces.last_mut() {
                trace.samples.extend_from_slice(&record.samples);
            }
        } else {
            traces.push(Trace {
                network: record.network,
                station: record.station,
                location: record.location,
                channel: record.channel,
                start_time: record.start_time,
                sampling_rate: record.sampling_rate,
                samples: record.samples,
            });
        }
    }
    traces
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn put_u16(buf: &mut [u8], at: usize, v: u16, big: bool) {
        let bytes = if big { v.to_be_bytes() } else { v.to_le_bytes() };
        buf[at..at + 2].copy_from_slice(&bytes);
    }

    fn put_u32(buf: &mut [u8], at: usize, v: u32, big: bool) {
        let bytes = if big { v.to_be_bytes() } else { v.to_le_bytes() };
        buf[at..at + 4].copy_from_slice(&bytes);
    }

    // 512-byte INT32 record with blockette 1000, data at offset 64.
    fn build_int32_record(
        channel: &str,
        start: DateTime<Utc>,
        rate_factor: i16,
        samples: &[i32],
        big: bool,
    ) -> Vec<u8> {
        assert!(samples.len() <= (512 - 64) / 4);
        let mut rec = vec![0u8; 512];
        rec[0..6].copy_from_slice(b"000001");
        rec[6] = b'D';
        rec[7] = b' ';
        rec[8..13].copy_from_slice(b"ELYSE");
        rec[13..15].copy_from_slice(b"02");
        rec[15..18].copy_from_slice(channel.as_bytes());
        rec[18..20].copy_from_slice(b"XB");

        put_u16(&mut rec, 20, start.year() as u16, big);
        put_u16(&mut rec, 22, start.ordinal() as u16, big);
        rec[24] = start.hour() as u8;
        rec[25] = start.minute() as u8;
        rec[26] = start.second() as u8;
        put_u16(&mut rec, 28, (start.timestamp_subsec_micros() / 100) as u16, big);

        put_u16(&mut rec, 30, samples.len() as u16, big);
        put_u16(&mut rec, 32, rate_factor as u16, big);
        put_u16(&mut rec, 34, 1, big);
        rec[39] = 1; // one blockette follows
        put_u16(&mut rec, 44, 64, big);
        put_u16(&mut rec, 46, 48, big);

        // Blockette 1000
        put_u16(&mut rec, 48, 1000, big);
        put_u16(&mut rec, 50, 0, big);
        rec[52] = 3; // INT32
        rec[53] = u8::from(big);
        rec[54] = 9; // 2^9 = 512

        for (i, s) in samples.iter().enumerate() {
            put_u32(&mut rec, 64 + i * 4, *s as u32, big);
        }
        rec
    }

    fn read_from_bytes(bytes: &[u8]) -> Result<Vec<Trace>, MseedError> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        read_traces(file.path())
    }

    #[test]
    fn int32_record_decodes_header_and_samples() {
        let start = Utc.with_ymd_and_hms(2022, 3, 14, 6, 30, 0).unwrap();
        let rec = build_int32_record("BHV", start, 20, &[5, -3, 12, 0], true);

        let traces = read_from_bytes(&rec).unwrap();
        assert_eq!(traces.len(), 1);
        let trace = &traces[0];
        assert_eq!(trace.source_id(), "XB.ELYSE.02.BHV");
        assert_eq!(trace.start_time, start);
        assert_eq!(trace.sampling_rate, 20.0);
        assert_eq!(trace.samples, vec![5.0, -3.0, 12.0, 0.0]);
        // Three sample intervals at 20 Hz.
        assert_eq!(
            trace.end_time() - trace.start_time,
            Duration::microseconds(150_000)
        );
    }

    #[test]
    fn little_endian_header_is_detected() {
        let start = Utc.with_ymd_and_hms(2021, 12, 31, 23, 59, 59).unwrap();
        let rec = build_int32_record("SHZ", start, 100, &[1, 2, 3], false);

        let traces = read_from_bytes(&rec).unwrap();
        assert_eq!(traces[0].start_time, start);
        assert_eq!(traces[0].sampling_rate, 100.0);
        assert_eq!(traces[0].samples, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn contiguous_records_merge_into_one_trace() {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        // 4 samples at 20 Hz = 200 ms per record.
        let next = start + Duration::milliseconds(200);
        let mut bytes = build_int32_record("BHV", start, 20, &[1, 2, 3, 4], true);
        bytes.extend(build_int32_record("BHV", next, 20, &[5, 6, 7, 8], true));

        let traces = read_from_bytes(&bytes).unwrap();
        assert_eq!(traces.len(), 1);
        assert_eq!(
            traces[0].samples,
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]
        );
    }

    #[test]
    fn gap_between_records_splits_traces() {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let after_gap = start + Duration::seconds(60);
        let mut bytes = build_int32_record("BHV", start, 20, &[1, 2], true);
        bytes.extend(build_int32_record("BHV", after_gap, 20, &[3, 4], true));

        let traces = read_from_bytes(&bytes).unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0].samples, vec![1.0, 2.0]);
        assert_eq!(traces[1].start_time, after_gap);
    }

    #[test]
    fn steim1_frame_reconstructs_samples() {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let mut rec = build_int32_record("BHV", start, 20, &[], true);
        put_u16(&mut rec, 30, 3, true); // three samples
        rec[52] = 10; // Steim1

        // One frame: w1 = x0 = 1, w2 = xn = 4, w3 = two 16-bit diffs
        // (ignored first diff, +1), w4 = one 32-bit diff (+2).
        let nibbles = (2u32 << (2 * (15 - 3))) | (3u32 << (2 * (15 - 4)));
        put_u32(&mut rec, 64, nibbles, true);
        put_u32(&mut rec, 68, 1, true);
        put_u32(&mut rec, 72, 4, true);
        put_u32(&mut rec, 76, 1, true); // 0x0000_0001 -> diffs 0, +1
        put_u32(&mut rec, 80, 2, true);

        let traces = read_from_bytes(&rec).unwrap();
        assert_eq!(traces[0].samples, vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn steim2_packed_diffs_reconstruct_samples() {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let mut rec = build_int32_record("BHV", start, 20, &[], true);
        put_u16(&mut rec, 30, 6, true);
        rec[52] = 11; // Steim2

        // w3 carries six 5-bit diffs (dnib 1): 0, 1, 2, -1, 3, 1.
        // Samples: 10, 11, 13, 12, 15, 16.
        let nibbles = 3u32 << (2 * (15 - 3));
        put_u32(&mut rec, 64, nibbles, true);
        put_u32(&mut rec, 68, 10, true);
        put_u32(&mut rec, 72, 16, true);
        let packed: u32 = (1 << 30)
            | (0 << 25)
            | (1 << 20)
            | (2 << 15)
            | ((0x1F & -1i32 as u32) << 10)
            | (3 << 5)
            | 1;
        put_u32(&mut rec, 76, packed, true);

        let traces = read_from_bytes(&rec).unwrap();
        assert_eq!(traces[0].samples, vec![10.0, 11.0, 13.0, 12.0, 15.0, 16.0]);
    }

    #[test]
    fn negative_rate_multiplier_divides() {
        assert_eq!(nominal_sampling_rate(20, 1), 20.0);
        assert_eq!(nominal_sampling_rate(100, -2), 50.0);
        assert_eq!(nominal_sampling_rate(-10, 1), 0.1);
        assert_eq!(nominal_sampling_rate(-5, -2), 0.1);
    }

    #[test]
    fn record_without_blockette_1000_is_rejected() {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let mut rec = build_int32_record("BHV", start, 20, &[1], true);
        rec[39] = 0;
        put_u16(&mut rec, 46, 0, true);
        put_u16(&mut rec, 48, 0, true);

        let err = read_from_bytes(&rec).unwrap_err();
        assert!(matches!(err, MseedError::MissingBlockette1000 { .. }));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = read_from_bytes(&[0u8; 512]).unwrap_err();
        assert!(matches!(err, MseedError::BadRecord { .. }));
    }

    #[test]
    fn truncated_record_is_rejected() {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let rec = build_int32_record("BHV", start, 20, &[1, 2, 3], true);
        let err = read_from_bytes(&rec[..256]).unwrap_err();
        assert!(matches!(err, MseedError::Truncated { .. }));
    }
}
