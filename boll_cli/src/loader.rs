use std::fs::File;
use std::io::Read;
use std::path::Path;

use boll_core::{BollError, ErrCode, PricePoint, Result};
use chrono::NaiveDateTime;
use csv::Reader;
use tracing::{debug, warn};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Load a price series from a `.json` or `.csv` file, checking every row.
pub fn load_series(path: &Path) -> Result<Vec<PricePoint>> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or_default();
    let mut series = match ext {
        "json" => parse_json(File::open(path).map_err(|e| io_err(path, e))?)?,
        "csv" => parse_csv(File::open(path).map_err(|e| io_err(path, e))?)?,
        _ => {
            return Err(BollError::new(
                format!("unsupported data file {:?}, expected .json or .csv", path),
                ErrCode::SrcDataFormatError,
            ))
        }
    };

    for point in series.iter_mut() {
        point.check(false)?;
    }

    if series.windows(2).any(|w| w[0].timestamp >= w[1].timestamp) {
        series.sort_by_key(|p| p.timestamp);
        let before = series.len();
        // keeps the first row seen for each timestamp
        series.dedup_by_key(|p| p.timestamp);
        warn!(
            path = %path.display(),
            duplicates = before - series.len(),
            "timestamps are not strictly increasing, sorted and dropped duplicates"
        );
    }
    debug!(path = %path.display(), rows = series.len(), "series loaded");
    Ok(series)
}

pub fn parse_json<R: Read>(reader: R) -> Result<Vec<PricePoint>> {
    serde_json::from_reader(reader).map_err(|e| {
        BollError::new(format!("bad json series: {}", e), ErrCode::SrcDataFormatError)
    })
}

pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<PricePoint>> {
    let mut rdr = Reader::from_reader(reader);
    let mut series = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| {
            BollError::new(format!("csv row {}: {}", line + 1, e), ErrCode::SrcDataFormatError)
        })?;
        series.push(parse_csv_record(&record).map_err(|e| {
            BollError::new(format!("csv row {}: {}", line + 1, e.msg), e.errcode)
        })?);
    }
    Ok(series)
}

fn parse_csv_record(record: &csv::StringRecord) -> Result<PricePoint> {
    if record.len() < 6 {
        return Err(BollError::new(
            format!("expected 6 columns, got {}", record.len()),
            ErrCode::SrcDataFormatError,
        ));
    }

    Ok(PricePoint {
        timestamp: parse_time(&record[0])?,
        open: parse_num("open", &record[1])?,
        high: parse_num("high", &record[2])?,
        low: parse_num("low", &record[3])?,
        close: parse_num("close", &record[4])?,
        volume: parse_num("volume", &record[5])?,
    })
}

/// Millisecond timestamp, or a UTC date time string
fn parse_time(s: &str) -> Result<i64> {
    let s = s.trim();
    if let Ok(ms) = s.parse::<i64>() {
        return Ok(ms);
    }
    NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .map(|t| t.and_utc().timestamp_millis())
        .map_err(|_| BollError::new(format!("bad time {:?}", s), ErrCode::SrcDataFormatError))
}

fn parse_num(name: &str, s: &str) -> Result<f64> {
    s.trim().parse().map_err(|_| {
        BollError::new(format!("bad {} value {:?}", name, s), ErrCode::SrcDataFormatError)
    })
}

fn io_err(path: &Path, e: std::io::Error) -> BollError {
    BollError::new(format!("{}: {}", path.display(), e), ErrCode::SrcDataFormatError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let data = r#"[
            {"timestamp": 1625097600000, "open": 34012, "high": 34030, "low": 33999, "close": 34020, "volume": 180},
            {"timestamp": 1625184000000, "open": 34025, "high": 34060, "low": 34001, "close": 34031, "volume": 220}
        ]"#;
        let series = parse_json(data.as_bytes()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].close, 34031.0);
    }

    #[test]
    fn test_parse_json_bad() {
        let err = parse_json("[{\"timestamp\": 1}]".as_bytes()).unwrap_err();
        assert_eq!(err.errcode, ErrCode::SrcDataFormatError);
    }

    #[test]
    fn test_parse_csv() {
        let data = "time,open,high,low,close,volume\n\
                    2021-07-01 00:00:00,10,11,9,10.5,100\n\
                    1625184000000,10.5,12,10,11,120\n";
        let series = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, 1_625_097_600_000);
        assert_eq!(series[1].timestamp, 1_625_184_000_000);
        assert_eq!(series[0].close, 10.5);
    }

    #[test]
    fn test_parse_csv_bad_number() {
        let data = "time,open,high,low,close,volume\n1,10,11,9,abc,100\n";
        let err = parse_csv(data.as_bytes()).unwrap_err();
        assert_eq!(err.errcode, ErrCode::SrcDataFormatError);
        assert!(err.msg.contains("close"));
    }

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_rejects_inconsistent_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.csv", "time,open,high,low,close,volume\n1,10,9,8,10,1\n");
        let err = load_series(&path).unwrap_err();
        assert_eq!(err.errcode, ErrCode::KlDataInvalid);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "data.txt", "1,10,11,9,10,1\n");
        let err = load_series(&path).unwrap_err();
        assert_eq!(err.errcode, ErrCode::SrcDataFormatError);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_series(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.errcode, ErrCode::SrcDataFormatError);
    }

    #[test]
    fn test_load_sorts_out_of_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "unsorted.csv",
            "time,open,high,low,close,volume\n2,10,11,9,10,1\n1,20,21,19,20,1\n",
        );
        let series = load_series(&path).unwrap();
        let ts: Vec<i64> = series.iter().map(|p| p.timestamp).collect();
        assert_eq!(ts, vec![1, 2]);
        assert_eq!(series[0].close, 20.0);
    }

    #[test]
    fn test_load_drops_duplicate_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "dups.json",
            r#"[
                {"timestamp": 3, "open": 10, "high": 11, "low": 9, "close": 10, "volume": 1},
                {"timestamp": 1, "open": 10, "high": 11, "low": 9, "close": 10, "volume": 1},
                {"timestamp": 3, "open": 30, "high": 31, "low": 29, "close": 30, "volume": 1}
            ]"#,
        );
        let series = load_series(&path).unwrap();
        let ts: Vec<i64> = series.iter().map(|p| p.timestamp).collect();
        assert_eq!(ts, vec![1, 3]);
        assert_eq!(series[1].close, 10.0);
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("42").unwrap(), 42);
        assert!(parse_time("yesterday").is_err());
    }
}
