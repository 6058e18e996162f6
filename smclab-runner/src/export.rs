//! Report export — JSON and CSV artifacts.
//!
//! - **JSON**: the full `AnalysisReport`, with schema versioning
//! - **CSV**: order blocks and trading signals for spreadsheets and charting tools
//!
//! Unknown (newer) schema versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use smclab_core::domain::{OrderBlock, TradingSignal};

use crate::report::{AnalysisReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize AnalysisReport to JSON")
}

/// Deserialize a report, rejecting schema versions newer than this build understands.
pub fn import_json(json: &str) -> Result<AnalysisReport> {
    let report: AnalysisReport =
        serde_json::from_str(json).context("failed to deserialize AnalysisReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: origin_index, trigger_index, direction, high, low, mid
pub fn export_order_blocks_csv(blocks: &[OrderBlock]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["origin_index", "trigger_index", "direction", "high", "low", "mid"])?;
    for ob in blocks {
        wtr.write_record([
            &ob.origin_index.to_string(),
            &ob.trigger_index.to_string(),
            &ob.direction.to_string(),
            &format!("{:.6}", ob.high),
            &format!("{:.6}", ob.low),
            &format!("{:.6}", ob.mid()),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: order_block_index, direction, status, entry, stop_loss, take_profit,
/// risk_pct, reward_pct
pub fn export_signals_csv(signals: &[TradingSignal]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "order_block_index",
        "direction",
        "status",
        "entry",
        "stop_loss",
        "take_profit",
        "risk_pct",
        "reward_pct",
    ])?;
    for s in signals {
        wtr.write_record([
            &s.source_order_block_index.to_string(),
            &format!("{:?}", s.direction).to_lowercase(),
            &format!("{:?}", s.status).to_lowercase(),
            &format!("{:.6}", s.entry_price),
            &format!("{:.6}", s.stop_loss),
            &format!("{:.6}", s.take_profit),
            &format!("{:.2}", s.risk_pct),
            &format!("{:.2}", s.reward_pct),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write the artifact set for one report under `output_dir/{symbol}/`:
/// - `report.json` (the full `AnalysisReport`)
/// - `order_blocks.csv`
/// - `signals.csv`
///
/// Returns the symbol directory. Existing files are overwritten.
pub fn save_artifacts(report: &AnalysisReport, output_dir: &Path) -> Result<PathBuf> {
    let dir = output_dir.join(&report.symbol);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create artifact dir: {}", dir.display()))?;

    let json = export_json(report)?;
    write(&dir.join("report.json"), &json)?;
    write(
        &dir.join("order_blocks.csv"),
        &export_order_blocks_csv(&report.result.order_blocks)?,
    )?;
    write(
        &dir.join("signals.csv"),
        &export_signals_csv(&report.result.signals)?,
    )?;
    Ok(dir)
}

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smclab_core::domain::{Direction, SignalDirection, SignalStatus};

    fn block() -> OrderBlock {
        OrderBlock {
            origin_index: 12,
            high: 110.0,
            low: 100.0,
            direction: Direction::Bullish,
            trigger_index: 20,
        }
    }

    #[test]
    fn order_block_csv_columns() {
        let csv = export_order_blocks_csv(&[block()]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "origin_index,trigger_index,direction,high,low,mid"
        );
        assert_eq!(
            lines.next().unwrap(),
            "12,20,bullish,110.000000,100.000000,105.000000"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn signal_csv_columns() {
        let signal = TradingSignal {
            direction: SignalDirection::Short,
            entry_price: 105.0,
            stop_loss: 110.55,
            take_profit: 93.9,
            risk_pct: 5.29,
            reward_pct: 10.57,
            status: SignalStatus::Missed,
            source_order_block_index: 7,
        };
        let csv = export_signals_csv(&[signal]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "7,short,missed,105.000000,110.550000,93.900000,5.29,10.57");
    }

    #[test]
    fn empty_exports_have_headers_only() {
        assert_eq!(export_order_blocks_csv(&[]).unwrap().lines().count(), 1);
        assert_eq!(export_signals_csv(&[]).unwrap().lines().count(), 1);
    }
}
