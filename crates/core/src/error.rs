use fodder_types::TypesError;
use resume_data::DataError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("template syntax error: {0}")]
    TemplateSyntax(#[source] Box<handlebars::TemplateError>),
    #[error("template render failed: {0}")]
    Render(#[source] Box<handlebars::RenderError>),

    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Types(#[from] TypesError),

    #[error(
        "template not found: tried {requested} and {fallback}",
        requested = requested.display(),
        fallback = fallback.display()
    )]
    TemplateNotFound { requested: PathBuf, fallback: PathBuf },

    #[error("failed to read {path}: {source}", path = path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}", path = path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl From<handlebars::TemplateError> for CoreError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::TemplateSyntax(Box::new(err))
    }
}

impl From<handlebars::RenderError> for CoreError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Render(Box::new(err))
    }
}
