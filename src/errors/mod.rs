use colored::*;
use std::io;
use std::{fmt, path::PathBuf};

pub type SemanticResult<T = ()> = Result<T, SemanticError>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SemanticErrorKind {
    Io,
    Parse,
    Config,
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SemanticErrorKind::Io => "i/o error",
                SemanticErrorKind::Parse => "parse error",
                SemanticErrorKind::Config => "config error",
            }
        )
    }
}

#[derive(Debug)]
pub struct SemanticError {
    pub msg: String,
    pub path: Option<PathBuf>,
    pub kind: SemanticErrorKind,
}

impl SemanticError {
    pub fn new<S: Into<String>>(kind: SemanticErrorKind, msg: S) -> Self {
        SemanticError {
            msg: msg.into(),
            path: None,
            kind,
        }
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        SemanticError::new(SemanticErrorKind::Config, msg)
    }

    pub fn with_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn emit(self) {
        let kind = format!("{}:", self.kind);
        eprintln!("{} {}", kind.bold().red(), self.msg.bold());
        if let Some(path) = self.path {
            eprintln!(" {} {}", "-->".bold(), path.display());
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {} ({})", self.kind, self.msg, path.display()),
            None => write!(f, "{}: {}", self.kind, self.msg),
        }
    }
}

impl std::error::Error for SemanticError {}

impl From<io::Error> for SemanticError {
    fn from(err: io::Error) -> SemanticError {
        SemanticError::new(SemanticErrorKind::Io, err.to_string())
    }
}

impl From<serde_json::Error> for SemanticError {
    fn from(err: serde_json::Error) -> SemanticError {
        let kind = if err.is_io() {
            SemanticErrorKind::Io
        } else {
            SemanticErrorKind::Parse
        };
        SemanticError::new(kind, err.to_string())
    }
}
