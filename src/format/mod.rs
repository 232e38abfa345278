//! Model file persistence.
//!
//! The model file is a JSON object with three fields:
//!
//! - **index**: point offsets per group label
//! - **keys**: group labels in creation order
//! - **pos**: flat list of `[x, y]` positions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flt::format::{read_model, write_model};
//!
//! let schema = read_model("face.json")?;
//! model.load(schema)?;
//! write_model(&model.to_dict(), "face.json")?;
//! ```

mod error;
mod io;
mod schema;

#[cfg(test)]
mod tests;

pub use error::FormatError;
pub use io::{read_model, write_model};
pub use schema::ModelSchema;
