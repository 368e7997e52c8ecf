// SocLookup - core/export.rs
//
// CSV and JSON export of search history, plus the CSV batch
// validation report.
// Core layer: writes to any Write trait object; the caller picks the
// destination (file, stdout, clipboard).

use crate::core::model::{ClassificationOutcome, SearchRecord};
use crate::util::constants::{CSV_TIMESTAMP_FORMAT, HISTORY_CSV_HEADER, VALIDATION_CSV_HEADER};
use crate::util::error::ExportError;
use chrono::{Local, SecondsFormat};
use serde::Serialize;
use std::io::Write;

/// One object of the JSON history export.
#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    timestamp: String,
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

/// Export records to CSV, in the order given (most-recent first for history).
///
/// Writes: Timestamp, Type, Value. Timestamps are local time
/// `yyyy-MM-dd HH:mm:ss`; fields containing quotes, commas or newlines are
/// quoted with embedded quotes doubled.
pub fn export_csv<W: Write>(records: &[SearchRecord], writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(HISTORY_CSV_HEADER)
        .map_err(|source| ExportError::Csv { source })?;

    let mut count = 0;
    for record in records {
        let ts = record
            .timestamp
            .with_timezone(&Local)
            .format(CSV_TIMESTAMP_FORMAT)
            .to_string();

        csv_writer
            .write_record([ts.as_str(), record.display_type(), record.value.as_str()])
            .map_err(|source| ExportError::Csv { source })?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Csv { source: e.into() })?;

    Ok(count)
}

/// Export records to a pretty-printed JSON array of
/// `{timestamp, type, value}` objects. Timestamps are ISO-8601 UTC.
pub fn export_json<W: Write>(records: &[SearchRecord], writer: W) -> Result<usize, ExportError> {
    let rows: Vec<JsonRow<'_>> = records
        .iter()
        .map(|record| JsonRow {
            timestamp: record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            kind: record.display_type(),
            value: &record.value,
        })
        .collect();

    serde_json::to_writer_pretty(writer, &rows).map_err(|source| ExportError::Json { source })?;
    Ok(rows.len())
}

/// CSV history export as a string.
pub fn csv_string(records: &[SearchRecord]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    export_csv(records, &mut buf)?;
    String::from_utf8(buf).map_err(|source| ExportError::Encoding { source })
}

/// JSON history export as a string.
pub fn json_string(records: &[SearchRecord]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    export_json(records, &mut buf)?;
    String::from_utf8(buf).map_err(|source| ExportError::Encoding { source })
}

/// Batch validation report: Index (1-based), Value, Status, Error.
pub fn export_validation_csv<W: Write>(
    results: &[(String, ClassificationOutcome)],
    writer: W,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(VALIDATION_CSV_HEADER)
        .map_err(|source| ExportError::Csv { source })?;

    for (index, (value, outcome)) in results.iter().enumerate() {
        let status = if outcome.is_valid() { "Valid" } else { "Invalid" };
        csv_writer
            .write_record([
                (index + 1).to_string().as_str(),
                value.as_str(),
                status,
                outcome.error_message().unwrap_or(""),
            ])
            .map_err(|source| ExportError::Csv { source })?;
    }

    csv_writer.flush().map_err(|e| ExportError::Csv { source: e.into() })?;

    Ok(results.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ArtifactType;
    use chrono::{TimeZone, Utc};

    fn make_record(value: &str, kind: ArtifactType) -> SearchRecord {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        SearchRecord::with_timestamp(value, kind, ts)
    }

    #[test]
    fn test_csv_export() {
        let records = vec![
            make_record("8.8.8.8", ArtifactType::Ip),
            make_record("example.com", ArtifactType::Domain),
        ];
        let output = csv_string(&records).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Timestamp,Type,Value");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(",IP,8.8.8.8"));
        assert!(lines[2].ends_with(",Domain,example.com"));

        let expected_ts = records[0]
            .timestamp
            .with_timezone(&Local)
            .format(CSV_TIMESTAMP_FORMAT)
            .to_string();
        assert!(lines[1].starts_with(&expected_ts));
    }

    #[test]
    fn test_csv_escapes_quotes() {
        let records = vec![make_record("say \"hi\", ok", ArtifactType::Mail)];
        let output = csv_string(&records).unwrap();
        assert!(output.contains("\"say \"\"hi\"\", ok\""));
    }

    #[test]
    fn test_json_export() {
        let records = vec![
            make_record("AS15169", ArtifactType::Asn),
            make_record("1.1.1.1", ArtifactType::Ip),
        ];
        let output = json_string(&records).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["type"], "ASN");
        assert_eq!(rows[0]["value"], "AS15169");
        assert_eq!(rows[0]["timestamp"], "2024-03-05T14:07:09Z");
        assert_eq!(rows[1]["value"], "1.1.1.1");
        // Pretty-printed.
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_json_export_empty() {
        assert_eq!(json_string(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_validation_report() {
        let results = vec![
            ("8.8.8.8".to_string(), ClassificationOutcome::Valid(ArtifactType::Ip)),
            (
                "nope".to_string(),
                ClassificationOutcome::Invalid("unrecognized format".to_string()),
            ),
        ];
        let mut buf = Vec::new();
        let count = export_validation_csv(&results, &mut buf).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Index,Value,Status,Error");
        assert_eq!(lines[1], "1,8.8.8.8,Valid,");
        assert_eq!(lines[2], "2,nope,Invalid,unrecognized format");
    }
}
