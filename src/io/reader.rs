use crate::engine::Rebuild;
use crate::io::error::Error;
use crate::model::correlation::Correlation;
use crate::model::signal::SignalSnapshot;
use std::io::Read;

/// Reads a signal snapshot (`signals1D`, `signals2D`, `editing`) from JSON.
pub fn read_snapshot<R: Read>(reader: R) -> Result<SignalSnapshot, Error> {
    serde_json::from_reader(reader).map_err(|e| Error::json("signal snapshot", e))
}

/// Reads a rebuild result, or a bare correlation list wrapped into one.
pub fn read_rebuild<R: Read>(reader: R) -> Result<Rebuild, Error> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Document {
        List(Vec<Correlation>),
        Rebuild(Rebuild),
    }

    let document: Document =
        serde_json::from_reader(reader).map_err(|e| Error::json("correlation list", e))?;
    Ok(match document {
        Document::List(list) => Rebuild::from_correlations(list),
        Document::Rebuild(rebuild) => rebuild,
    })
}
