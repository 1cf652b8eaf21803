//! # Fodder Core
//!
//! Document generation for résumé records:
//! - [`markup`]: free text to styled paragraphs and runs
//! - [`wordml`]: paragraphs to Word 2003 XML fragments
//! - [`render`]: Handlebars templates with date, counter and rich-text helpers
//! - [`commands`]: the file-level `init`, `convert` and `export` operations
//!
//! Reading and writing the record formats belongs to `resume-data`; this crate only consumes
//! decoded records. Configuration is passed in by the caller (see [`config::CoreConfig`]).

pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod markup;
pub mod render;
pub mod wordml;

pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use markup::{translate, Paragraph, ParagraphStyle, Run, RunStyle};
pub use render::render;
