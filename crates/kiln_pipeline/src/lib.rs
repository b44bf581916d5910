//! Ordered stage pipelines and the pass-name registry.
//!
//! A [`Pipeline`] only describes the stages an external execution engine
//! will run; nothing here executes anything.

mod registry;

pub use registry::{PassId, PassInfo, PassRegistry};

use kiln_ir::layout::DataLayout;
use kiln_session::config::OutputKind;
use target_lexicon::Triple;

/// Boundaries for a partial pipeline run, resolved via [`PassRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassRange {
    pub start_after: Option<PassId>,
    pub stop_after: Option<PassId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Library-call recognition metadata for the resolved triple.
    LibCalls { triple: Triple, disabled: bool },
    /// The ABI layout later stages compute against.
    DataLayout(DataLayout),
    /// A backend-supplied analysis or transform stage.
    Backend { name: String },
    /// Serialize target output to the sink.
    Emit {
        kind: OutputKind,
        verify: bool,
        range: PassRange,
    },
}

/// An ordered sequence of stages, plus child pipelines driven by the same
/// external "execute" call as this one.
#[derive(Debug, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
    children: Vec<Pipeline>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stage(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    pub fn add_child(&mut self, child: Pipeline) {
        self.children.push(child);
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn children(&self) -> &[Pipeline] {
        &self.children
    }
}
