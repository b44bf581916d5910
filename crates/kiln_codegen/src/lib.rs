//! Pipeline assembly: resolving a target backend, fanning a compilation
//! unit out over independent codegen pipelines, and owning the output
//! sink they all serialize to.

mod assemble;
mod output;

pub use assemble::{assemble, probe_target, AssembleOptions, Assembly, PipelineSet};
pub use output::{output_filename, OutputFile};

use std::io;

use kiln_session::config::OutputKind;

#[derive(thiserror::Error, Debug)]
pub enum AssembleError {
    /// No registered backend matched; the message is the registry's own
    /// diagnostic text.
    #[error("{0}")]
    UnknownTarget(String),

    #[error("invalid optimization level `-O{0}`")]
    InvalidOptLevel(char),

    #[error("unable to open output file `{path}`: {source}")]
    OutputOpen {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{boundary} pass `{name}` is not registered")]
    UnknownPassName {
        boundary: &'static str,
        name: String,
    },

    #[error("target `{target}` does not support emitting {kind} output")]
    UnsupportedOutputKind { target: String, kind: OutputKind },
}

pub type AssembleResult<T> = Result<T, AssembleError>;
