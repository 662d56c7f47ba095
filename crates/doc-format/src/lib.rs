pub mod errors;
pub mod load;
pub mod metadata;
pub mod save;

pub use errors::{ExportError, LoadError};
pub use load::load_document;
pub use metadata::DocumentMetadata;
pub use save::{
    document_stem, save_document, summarize_components, write_document, ComponentSummary,
    RigDocument, FORMAT_NAME, FORMAT_VERSION,
};
