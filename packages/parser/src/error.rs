use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The markup produced a document without a `<body>` (e.g. a frameset page)
    #[error("Markup has no body element")]
    MissingBody,
}
