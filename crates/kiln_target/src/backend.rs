use kiln_ir::layout::DataLayout;
use kiln_pipeline::{PassRange, Pipeline};
use kiln_session::config::OutputKind;
use target_lexicon::Triple;

/// Everything a backend factory needs to instantiate one backend.
#[derive(Debug, Clone)]
pub struct TargetDescriptor {
    pub triple: Triple,
    /// Explicit architecture name the triple was resolved through, if the
    /// caller gave one.
    pub arch_override: Option<String>,
    pub cpu: String,
    /// Assembled subtarget feature string; empty when nothing was
    /// requested.
    pub features: String,
}

/// The backend rejected the requested output kind for this target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedOutput;

/// One instantiated target backend.
///
/// Configuration is per-instance state: a pipeline set holds one backend
/// per pipeline and configures each identically, since none of this is
/// shareable across independently-running pipelines.
pub trait TargetBackend {
    fn name(&self) -> &str;

    /// Emit source-location directives.
    fn set_use_loc(&mut self, enable: bool);
    /// Emit call-frame-info directives.
    fn set_use_cfi(&mut self, enable: bool);
    /// Emit debug-info directory directives.
    fn set_use_dwarf_directory(&mut self, enable: bool);
    /// Mark emitted objects as not requiring an executable stack.
    fn set_no_exec_stack(&mut self, enable: bool);
    fn set_asm_verbosity(&mut self, enable: bool);
    /// Force conservative long-form branch encoding.
    fn set_relax_all(&mut self, enable: bool);

    /// The backend's canonical data layout, if it has one. Preferred over
    /// the unit's own layout during stage insertion.
    fn data_layout(&self) -> Option<DataLayout>;

    /// Append the backend's required analysis stages.
    fn add_analysis_stages(&self, pipeline: &mut Pipeline);

    /// Append the stage that serializes this target's output, or report
    /// that the backend cannot produce `kind` for this target.
    fn add_emit_stage(
        &self,
        pipeline: &mut Pipeline,
        kind: OutputKind,
        verify: bool,
        range: PassRange,
    ) -> Result<(), UnsupportedOutput>;
}
