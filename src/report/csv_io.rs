//! CSV export and import of scored trajectories.
//!
//! One row per record, with a header line:
//!
//! ```text
//! ID,X_INTERCEPT,Y_INTERCEPT,X_SLOPE,Y_SLOPE,SNR,SUM,NUMBER_OF_FRAMES_HIT
//! 0,412,87,0.31,-0.12,15.2,1830.5,58
//! ```
//!
//! Floating point fields are written with the shortest representation that parses back to
//! the same value, so reading a written file recovers the records exactly (`NaN` included).
use std::io::{Read, Write};

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::{
    cubescan_errors::CubeScanError, search::ScoredTrajectory, trajectory::LinearTrajectory,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct CsvRecord {
    id: usize,
    x_intercept: f64,
    y_intercept: f64,
    x_slope: f64,
    y_slope: f64,
    snr: f64,
    sum: f64,
    number_of_frames_hit: u32,
}

impl From<&ScoredTrajectory> for CsvRecord {
    fn from(r: &ScoredTrajectory) -> Self {
        CsvRecord {
            id: r.id,
            x_intercept: r.trajectory.x_intercept,
            y_intercept: r.trajectory.y_intercept,
            x_slope: r.trajectory.x_slope,
            y_slope: r.trajectory.y_slope,
            snr: r.snr,
            sum: r.signal,
            number_of_frames_hit: r.frame_hits,
        }
    }
}

impl From<CsvRecord> for ScoredTrajectory {
    fn from(r: CsvRecord) -> Self {
        ScoredTrajectory {
            id: r.id,
            trajectory: LinearTrajectory::new(r.x_slope, r.x_intercept, r.y_slope, r.y_intercept),
            snr: r.snr,
            signal: r.sum,
            frame_hits: r.number_of_frames_hit,
        }
    }
}

/// Write `records` as CSV to `writer`.
pub fn write_records<W: Write>(
    writer: W,
    records: &[ScoredTrajectory],
) -> Result<(), CubeScanError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(CsvRecord::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `records` as CSV to the file at `path`, replacing it if it exists.
pub fn write_records_to_path(
    path: &Utf8Path,
    records: &[ScoredTrajectory],
) -> Result<(), CubeScanError> {
    let file = std::fs::File::create(path).map_err(|source| CubeScanError::UnreadableFile {
        path: path.to_string(),
        source,
    })?;
    write_records(std::io::BufWriter::new(file), records)
}

/// Read records written by [`write_records`].
pub fn read_records<R: Read>(reader: R) -> Result<Vec<ScoredTrajectory>, CubeScanError> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<CsvRecord>()
        .map(|row| Ok(ScoredTrajectory::from(row?)))
        .collect()
}

/// Read records from the CSV file at `path`.
pub fn read_records_from_path(path: &Utf8Path) -> Result<Vec<ScoredTrajectory>, CubeScanError> {
    let file = std::fs::File::open(path).map_err(|source| CubeScanError::UnreadableFile {
        path: path.to_string(),
        source,
    })?;
    read_records(std::io::BufReader::new(file))
}

#[cfg(test)]
mod csv_io_test {
    use super::*;

    fn record(id: usize, snr: f64) -> ScoredTrajectory {
        ScoredTrajectory {
            id,
            trajectory: LinearTrajectory::new(0.1 * id as f64, 12.0, -0.3, 7.0),
            snr,
            signal: 123.456,
            frame_hits: 3,
        }
    }

    #[test]
    fn test_header_and_row() {
        let mut out = Vec::new();
        write_records(&mut out, &[record(0, 2.5)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("ID,X_INTERCEPT,Y_INTERCEPT,X_SLOPE,Y_SLOPE,SNR,SUM,NUMBER_OF_FRAMES_HIT")
        );
        assert_eq!(lines.next(), Some("0,12.0,7.0,0.0,-0.3,2.5,123.456,3"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_read_back() {
        let records = vec![record(0, 2.5), record(1, 0.0), record(2, 1.0 / 3.0)];
        let mut out = Vec::new();
        write_records(&mut out, &records).unwrap();
        assert_eq!(read_records(out.as_slice()).unwrap(), records);
    }

    #[test]
    fn test_nan_score_survives() {
        let mut out = Vec::new();
        write_records(&mut out, &[record(0, f64::NAN)]).unwrap();
        let back = read_records(out.as_slice()).unwrap();
        assert!(back[0].snr.is_nan());
    }

    #[test]
    fn test_malformed_csv() {
        let text = "ID,X_INTERCEPT\n0,abc\n";
        assert!(matches!(
            read_records(text.as_bytes()),
            Err(CubeScanError::CsvError(_))
        ));
    }
}
