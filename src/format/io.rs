//! Reading and writing model files.

use std::path::Path;

use crate::format::error::FormatError;
use crate::format::schema::ModelSchema;

/// Read and validate a model file.
pub fn read_model(path: impl AsRef<Path>) -> Result<ModelSchema, FormatError> {
    let path = path.as_ref();
    log::info!("Reading model from {:?}", path);

    let json = std::fs::read_to_string(path)?;
    let schema = ModelSchema::from_json(&json)?;
    schema.validate()?;

    log::info!(
        "Read {} groups with {} points",
        schema.keys.len(),
        schema.pos.len()
    );
    Ok(schema)
}

/// Write a model file as pretty-printed JSON.
pub fn write_model(schema: &ModelSchema, path: impl AsRef<Path>) -> Result<(), FormatError> {
    let path = path.as_ref();
    log::info!("Writing model to {:?}", path);

    let json = schema.to_json()?;
    std::fs::write(path, json)?;

    log::info!(
        "Wrote {} groups with {} points",
        schema.keys.len(),
        schema.pos.len()
    );
    Ok(())
}
