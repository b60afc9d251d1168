//! Embed packager: widget snippet, standalone page and config export.

pub mod export;
pub mod html;
pub mod widget;

pub use export::{
    CONFIG_FILE_NAME, HTML_FILE_NAME, PLAINTEXT_CREDENTIAL_WARNING, export_config_json,
    import_config_json,
};
pub use html::wrap_as_standalone_html;
pub use widget::{generate_embed, generate_embed_for, generate_embed_with};
