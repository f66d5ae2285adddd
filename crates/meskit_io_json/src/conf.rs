//! JSON document constants.

/// Indentation used when pretty-printing editor documents.
pub const N_JSON_INDENT: usize = 4;
/// Content of an auto-created document.
pub const C_JSON_EMPTY_DOCUMENT: &str = "{}";
/// Value stored by [`crate::editor::JsonEditor::add_empty_key`].
pub const C_JSON_NEW_KEY_DEFAULT: &str = "";
