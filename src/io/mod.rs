//! Artifact I/O: model files and the reference dataset.

mod dataset;
mod format;
mod load;
mod model;
mod save;

pub use dataset::{load_reference_table, ReferenceTable};
pub use format::{ModelFormat, SaveConfig};
pub use load::{load_model, parse_model};
pub use model::{Activation, LayerState, ModelMetadata, ModelState};
pub use save::save_model;
