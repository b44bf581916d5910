//! Driver-wide configuration, parsed once by the caller and threaded
//! explicitly into pipeline assembly.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum OutputKind {
    Assembly,
    Object,
    /// Run the pipelines but discard the produced bytes.
    Null,
}

impl OutputKind {
    /// Whether the destination stream should be opened in binary mode.
    pub fn is_binary(&self) -> bool {
        !matches!(self, OutputKind::Assembly)
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            OutputKind::Assembly => "assembly",
            OutputKind::Object => "object",
            OutputKind::Null => "null",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum OptLevel {
    None,
    Less,
    Default,
    Aggressive,
}

impl OptLevel {
    /// Map a `-O<c>` flag character. `' '` means the flag was absent.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            ' ' | '2' => Some(OptLevel::Default),
            '0' => Some(OptLevel::None),
            '1' => Some(OptLevel::Less),
            '3' => Some(OptLevel::Aggressive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub enum RelocModel {
    #[default]
    Default,
    Static,
    Pic,
    DynamicNoPic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub enum CodeModel {
    #[default]
    Default,
    Small,
    Kernel,
    Medium,
    Large,
}

/// Global codegen options. One immutable value configures every backend
/// instance in a pipeline set identically.
#[derive(Debug, Clone, Default)]
pub struct CodegenConfig {
    pub reloc_model: RelocModel,
    pub code_model: CodeModel,

    pub soft_float: bool,
    pub unsafe_fp_math: bool,

    /// Suppress source-location directives in emitted assembly.
    pub disable_loc: bool,
    /// Suppress call-frame-info directives.
    pub disable_cfi: bool,
    /// Emit debug-info directory directives.
    pub dwarf_directory: bool,

    /// Turn off all library-call recognition.
    pub disable_libcalls: bool,
    /// Force conservative long-form branch encoding. Object output only.
    pub relax_all: bool,
    /// Skip IR verification before emission.
    pub no_verify: bool,

    pub start_after: Option<String>,
    pub stop_after: Option<String>,
}
