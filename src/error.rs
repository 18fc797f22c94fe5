use std::num::ParseIntError;

use thiserror::Error;

use crate::emit::ArtifactKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument {value:?}: {source}")]
    InvalidArgument {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// Only produced by [`SumModuleBuilder::check`](crate::codegen::SumModuleBuilder::check),
    /// the pipeline aborts on invalid IR instead.
    #[error("Malformed IR: {0}")]
    MalformedIr(String),

    #[error("Failed to initialize native target: {0}")]
    TargetInit(String),

    #[error("Failed to create ExecutionEngine: {0}")]
    EngineCreation(String),

    #[error("Failed to resolve entry point `{name}`: {reason}")]
    SymbolResolution { name: String, reason: String },

    #[error("Entry point `{name}` has type `{found}`, expected `{expected}`")]
    SignatureMismatch {
        name: String,
        expected: String,
        found: String,
    },

    #[error("Failed to emit {kind}: {reason}")]
    Emit { kind: ArtifactKind, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
