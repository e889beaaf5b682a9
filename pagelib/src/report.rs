use std::io::Write;

use crate::config::PolicyKind;
use crate::error::Result;
use crate::results::MeanTable;

/// Renders the averaged results of a run
pub trait ResultSink {
    fn report(&self, table: &MeanTable, out: &mut dyn Write) -> Result<()>;
}

/// Tab separated table, one row per frame count labelled with that frame count
///
/// ```text
/// Size	FIFO	LRU	Clock
/// 2:	812	812	812
/// ```
#[derive(Default)]
pub struct TableReporter;

impl ResultSink for TableReporter {
    fn report(&self, table: &MeanTable, out: &mut dyn Write) -> Result<()> {
        let header = PolicyKind::ALL.map(PolicyKind::short_name).join("\t");
        writeln!(out, "Size\t{header}")?;
        for row in &table.rows {
            writeln!(out, "{}:\t{}\t{}\t{}", row.frames, row.fifo, row.lru, row.clock)?;
        }
        Ok(())
    }
}

/// Pretty printed JSON of the whole table
#[derive(Default)]
pub struct JsonReporter;

impl ResultSink for JsonReporter {
    fn report(&self, table: &MeanTable, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, table)?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{Mean, MeanRow};

    fn sample() -> MeanTable {
        MeanTable {
            rows: vec![
                MeanRow { frames: 2, fifo: Mean::Truncated(9), lru: Mean::Truncated(8), clock: Mean::Truncated(7) },
                MeanRow { frames: 3, fifo: Mean::Truncated(5), lru: Mean::Truncated(4), clock: Mean::Truncated(4) },
            ],
        }
    }

    #[test]
    fn table_has_header_and_one_row_per_frame_count() {
        let mut out = Vec::new();
        TableReporter.report(&sample(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Size\tFIFO\tLRU\tClock\n2:\t9\t8\t7\n3:\t5\t4\t4\n");
    }

    #[test]
    fn json_round_trips() {
        let mut out = Vec::new();
        JsonReporter.report(&sample(), &mut out).unwrap();
        let parsed: MeanTable = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, sample());
    }
}
