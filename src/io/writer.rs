use crate::engine::Rebuild;
use crate::io::error::Error;
use crate::model::correlation::Correlation;
use std::io::Write;

/// Writes a correlation list as pretty-printed JSON.
pub fn write_correlations<W: Write>(mut writer: W, list: &[Correlation]) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut writer, list)
        .map_err(|e| Error::json("correlation list", e))?;
    writeln!(writer)?;
    Ok(())
}

/// Writes a rebuild result (`correlations`, `state` and `nextID`) as pretty-printed JSON.
pub fn write_rebuild<W: Write>(mut writer: W, rebuild: &Rebuild) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut writer, rebuild)
        .map_err(|e| Error::json("rebuild result", e))?;
    writeln!(writer)?;
    Ok(())
}
