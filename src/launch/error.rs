#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program} {args}` failed with exit code {}: {stderr}", display_code(.code))]
    CommandFailed {
        program: String,
        args: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl Error {
    /// The captured standard error text of a failed command.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Error::CommandFailed { stderr, .. } => Some(stderr),
            Error::Spawn { .. } => None,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<terminated by signal>".to_owned(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
