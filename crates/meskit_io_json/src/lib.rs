//! `meskit_io_json` v1:
//! Keyed JSON document editing.
//!
//! Modules:
//! - `conf`   : constants
//! - `spec`   : options/errors
//! - `util`   : value arithmetic and document IO helpers
//! - `editor` : file-bound `JsonEditor`
//! - `jsonx`  : one-shot `JsonFile` read/write
pub mod conf;
pub mod editor;
pub mod jsonx;
pub mod spec;
mod util;

pub use conf::{C_JSON_EMPTY_DOCUMENT, C_JSON_NEW_KEY_DEFAULT, N_JSON_INDENT};
pub use editor::JsonEditor;
pub use jsonx::JsonFile;
pub use spec::{JsonEditError, SpecJsonEditorOptions};
pub use util::{derive_appended_json_value, derive_json_pretty_bytes, derive_json_type_name};
