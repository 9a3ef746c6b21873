use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("demo '{id}' has no {language} source")]
    MissingLanguage { id: String, language: String },

    #[error("demo '{0}' not found")]
    UnknownDemo(String),

    #[error("execution host failed: {0}")]
    Host(String),

    #[error("could not build demo script: {0}")]
    Script(String),
}

pub type Result<T> = std::result::Result<T, DemoError>;
