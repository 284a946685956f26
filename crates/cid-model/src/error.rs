use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("empty CID-10 code")]
    EmptyCode,
    #[error("invalid CID-10 code '{0}' (expected letter, two digits and an optional .digit)")]
    InvalidCode(String),
    #[error("'{0}' is a subcategory, expected a category code")]
    NotACategory(String),
    #[error("invalid code range '{0}' (expected START-END, e.g. A00-A09)")]
    InvalidRange(String),
    #[error("code range {start}-{end} ends before it starts")]
    InvertedRange { start: String, end: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
