//! Reader for the per-frame sensor log written during an assay.
//!
//! The log is comma-delimited text. The first row is a header and is
//! always skipped; every following row holds six columns in fixed order:
//! `time, frame_id, setpoint_temp, thermocouple_temp, probe_temp, flow`.
//! `frame_id` is an integer, all other columns are floating point.

use crate::{Error, Result};
use dropfreeze_core::{FrameId, SensorReading};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of columns every data row must carry.
pub const LOG_COLUMNS: usize = 6;

/// One parsed data row of the assay log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRecord {
    /// Elapsed time.
    pub time: f64,
    /// Frame the row describes.
    pub frame_id: FrameId,
    /// Cold-stage setpoint temperature (°C).
    pub setpoint_temp: f64,
    /// Thermocouple temperature (°C).
    pub thermocouple_temp: f64,
    /// Platinum resistance probe temperature (°C).
    pub probe_temp: f64,
    /// Coolant flow.
    pub flow: f64,
}

impl LogRecord {
    /// Sensor readings carried by this row.
    pub fn sensor(&self) -> SensorReading {
        SensorReading::new(
            self.time,
            self.setpoint_temp,
            self.thermocouple_temp,
            self.probe_temp,
        )
    }
}

/// Reads an assay log from disk.
///
/// # Errors
/// Returns an error if the file cannot be opened or any data row is
/// malformed. No rows are returned on failure.
pub fn read_log<P: AsRef<Path>>(path: P) -> Result<Vec<LogRecord>> {
    let file = File::open(path.as_ref())?;
    let records = parse_log(file)?;
    log::debug!(
        "read {} log rows from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}

/// Parses an assay log, preserving row order.
///
/// Extra trailing columns are ignored. Blank lines are skipped.
///
/// # Errors
/// Returns `Error::InvalidFormat` for a row with fewer than six fields, a
/// field that is not a number of the expected type, or bytes that are not
/// valid UTF-8.
pub fn parse_log<R: Read>(reader: R) -> Result<Vec<LogRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(row_error)?;
        let line = row.position().map_or(0, csv::Position::line);
        records.push(parse_row(&row, line)?);
    }
    Ok(records)
}

fn row_error(err: csv::Error) -> Error {
    let line = err.position().map_or(0, csv::Position::line);
    match err.kind() {
        csv::ErrorKind::Utf8 { err: utf8, .. } => Error::InvalidFormat {
            line,
            message: format!("row is not valid UTF-8 ({utf8})"),
        },
        _ => Error::Csv(err),
    }
}

fn parse_row(row: &csv::StringRecord, line: u64) -> Result<LogRecord> {
    if row.len() < LOG_COLUMNS {
        return Err(Error::InvalidFormat {
            line,
            message: format!("expected {LOG_COLUMNS} fields, found {}", row.len()),
        });
    }

    let float = |index: usize, name: &str| -> Result<f64> {
        let field = &row[index];
        field.parse::<f64>().map_err(|_| Error::InvalidFormat {
            line,
            message: format!("{name} is not a number: {field:?}"),
        })
    };

    let frame_field = &row[1];
    let frame_id = frame_field
        .parse::<i64>()
        .map_err(|_| Error::InvalidFormat {
            line,
            message: format!("frame_id is not an integer: {frame_field:?}"),
        })?;

    Ok(LogRecord {
        time: float(0, "time")?,
        frame_id: FrameId::new(frame_id),
        setpoint_temp: float(2, "setpoint_temp")?,
        thermocouple_temp: float(3, "thermocouple_temp")?,
        probe_temp: float(4, "probe_temp")?,
        flow: float(5, "flow")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
Time,Frame_ID,Setpoint_temp,TC_temp,PRT_temp,coolant_flow
0.0,1,-5.0,-4.8,-4.9,1.2
10.5,2,-6.0,-5.7,-5.9,1.2
21.0,3,-7.0,-6.6,-6.8,1.1
";

    #[test]
    fn test_parse_log() {
        let records = parse_log(LOG.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[1],
            LogRecord {
                time: 10.5,
                frame_id: FrameId(2),
                setpoint_temp: -6.0,
                thermocouple_temp: -5.7,
                probe_temp: -5.9,
                flow: 1.2,
            }
        );
        assert_eq!(
            records[2].sensor(),
            SensorReading::new(21.0, -7.0, -6.6, -6.8)
        );
    }

    #[test]
    fn test_header_only() {
        let records = parse_log("time,frame,sp,tc,prt,flow\n".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_preserves_row_order_and_tolerates_spaces() {
        let log = "h1,h2,h3,h4,h5,h6\n 5, 9 ,-1,-2,-3,0\n1,4,-1,-2,-3,0,extra\n";
        let records = parse_log(log.as_bytes()).unwrap();
        assert_eq!(records[0].frame_id, FrameId(9));
        assert_eq!(records[1].frame_id, FrameId(4));
    }

    #[test]
    fn test_short_row_rejected() {
        let log = "h1,h2,h3,h4,h5,h6\n0,1,-1,-2,-3,0\n0,2,-1,-2\n";
        let err = parse_log(log.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { line: 3, .. }), "{err}");
    }

    #[test]
    fn test_non_integer_frame_id_rejected() {
        let log = "h1,h2,h3,h4,h5,h6\n0,1.5,-1,-2,-3,0\n";
        let err = parse_log(log.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("frame_id"), "{err}");
    }

    #[test]
    fn test_non_numeric_temperature_rejected() {
        let log = "h1,h2,h3,h4,h5,h6\n0,1,-1,warm,-3,0\n";
        let err = parse_log(log.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("thermocouple_temp"), "{err}");
    }

    #[test]
    fn test_invalid_utf8_row_rejected() {
        let log = b"h1,h2,h3,h4,h5,h6\n0,1,-1,-2,-3,0\n0,2,\xff,-2,-3,0\n";
        let err = parse_log(&log[..]).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { line: 3, .. }), "{err}");
    }
}
