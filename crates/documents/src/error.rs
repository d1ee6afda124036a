use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to render PDF: {0}")]
    Render(String),

    #[error("Failed to write document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

impl From<printpdf::Error> for DocumentError {
    fn from(err: printpdf::Error) -> Self {
        Self::Render(format!("{err:?}"))
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;
