//! Constants used throughout the fodder core crate.

/// Directory searched for a template when the requested path does not exist.
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Template used by `export` when none is named.
pub const DEFAULT_TEMPLATE_NAME: &str = "default.xml";

/// File written by `init` when none is named.
pub const DEFAULT_DATA_FILE: &str = "resume.xml";

/// File extensions accepted for exported documents.
pub const EXPORT_EXTENSIONS: [&str; 2] = ["doc", "xml"];

/// Word paragraph style applied to bullet paragraphs.
pub const LIST_PARAGRAPH_STYLE: &str = "ListBullet";
