use thiserror::Error;

pub type SandboxResult<T> = Result<T, SandboxError>;

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Frame document has no body element")]
    MissingBody,

    #[error("Serialization failed: {0}")]
    Serialize(#[from] std::io::Error),

    #[error("Serialized markup is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
