use std::io::Write;

use chrono::SecondsFormat;

use crate::{errors::Error, models::data_point::DataPoint};

/// Header row written by [`CsvSink`].
pub const CSV_HEADER: [&str; 12] = [
    "Datetime",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "P_buy",
    "P_sell",
    "price_diff",
    "return",
    "K",
    "D",
];

pub trait DataSink {
    /// Writes an enriched series to the destination.
    ///
    /// Returns the number of points written.
    fn write(&mut self, points: &[DataPoint]) -> Result<usize, Error>;
}

/// Writes the series as a single JSON array.
pub struct JsonSink<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DataSink for JsonSink<W> {
    fn write(&mut self, points: &[DataPoint]) -> Result<usize, Error> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, points)?;
        } else {
            serde_json::to_writer(&mut self.writer, points)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(points.len())
    }
}

/// Writes the series as a flat table with the [`CSV_HEADER`] columns.
///
/// The header is written once, before the first batch. Absent %K/%D values
/// are written as empty cells.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            header_written: false,
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, Error> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

impl<W: Write> DataSink for CsvSink<W> {
    fn write(&mut self, points: &[DataPoint]) -> Result<usize, Error> {
        let optional = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        if !self.header_written {
            self.writer.write_record(CSV_HEADER)?;
            self.header_written = true;
        }
        for p in points {
            self.writer.write_record([
                p.datetime().to_rfc3339_opts(SecondsFormat::AutoSi, true),
                p.open().to_string(),
                p.high().to_string(),
                p.low().to_string(),
                p.close().to_string(),
                p.volume().to_string(),
                p.p_buy().to_string(),
                p.p_sell().to_string(),
                p.price_diff().to_string(),
                p.period_return().to_string(),
                optional(p.k()),
                optional(p.d()),
            ])?;
        }
        self.writer.flush()?;
        Ok(points.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn points() -> Vec<DataPoint> {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        vec![
            DataPoint::new(ts, 10.0, 12.0, 9.0, 11.0, 1000.0, 10.5),
            DataPoint::new(ts, 11.0, 13.0, 10.0, 12.5, 800.0, 11.0)
                .with_sell_side(12.0, 1.0, 0.09)
                .with_oscillator(Some(62.5), None),
        ]
    }

    #[test]
    fn csv_sink_writes_header_and_blank_missing_values() {
        let mut sink = CsvSink::new(Vec::new());
        assert_eq!(sink.write(&points()).unwrap(), 2);

        let bytes = sink.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Datetime,Open,High,Low,Close,Volume,P_buy,P_sell,price_diff,return,K,D",
                "2025-01-01T00:00:00Z,10,12,9,11,1000,10.5,0,0,0,,",
                "2025-01-01T00:00:00Z,11,13,10,12.5,800,11,12,1,0.09,62.5,",
            ]
        );
    }

    #[test]
    fn csv_sink_writes_the_header_once_across_batches() {
        let mut sink = CsvSink::new(Vec::new());
        let batch = points();
        sink.write(&batch[..1]).unwrap();
        sink.write(&batch[1..]).unwrap();
        sink.write(&[]).unwrap();

        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with("Datetime,")).count(), 1);
        assert!(lines[2].starts_with("2025-01-01T00:00:00Z,11,"));
    }

    #[test]
    fn json_sink_writes_an_array() {
        let mut sink = JsonSink::new(Vec::new());
        sink.write(&points()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&sink.into_inner()).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[1]["pSell"], 12.0);
        assert_eq!(array[1]["k"], 62.5);
        assert!(array[0]["k"].is_null());
    }
}
