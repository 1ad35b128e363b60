use std::path::Path;

use crate::error::SimError;
use crate::ledger::TradeRecord;

/// Write the session's closed trades to `path` as CSV.
///
/// The header row comes from the record fields (`buy,sell`) and rows keep
/// their execution order. A session with no closed trades writes no file.
pub fn write_trades(path: &Path, trades: &[TradeRecord]) -> Result<(), SimError> {
    if trades.is_empty() {
        return Ok(());
    }
    let mut writer = csv::Writer::from_path(path)?;
    for trade in trades {
        writer.serialize(trade)?;
    }
    writer.flush()?;
    Ok(())
}
