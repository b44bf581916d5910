
use kiln_ir::unit::Unit;
use kiln_pipeline::{PassRange, PassRegistry, Pipeline, Stage};
use kiln_session::config::{CodegenConfig, OptLevel, OutputKind};
use kiln_session::diagnostics::{Diagnostic, DiagnosticEmitter};
use kiln_session::Session;
use kiln_target::{SubtargetFeatures, TargetBackend, TargetDescriptor, TargetInfo, TargetRegistry};
use target_lexicon::{OperatingSystem, Triple};

use crate::output::{output_filename, OutputFile};
use crate::{AssembleError, AssembleResult};

/// Per-invocation assembly inputs. Driver-wide knobs live in
/// [`CodegenConfig`] instead.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Replacement for the unit's embedded triple.
    pub triple: Option<String>,
    /// Explicit architecture name; wins over the triple's architecture
    /// during registry lookup.
    pub arch: Option<String>,
    pub cpu: String,
    pub features: Vec<String>,
    /// `-O<c>` flag character; `' '` when the flag was absent.
    pub opt_level: char,
    pub output_kind: OutputKind,
    /// Requested number of independent pipelines.
    pub threads: u32,
    pub input_name: String,
    /// Explicit destination; derived from the input name when absent.
    pub output_name: Option<String>,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            triple: None,
            arch: None,
            cpu: String::new(),
            features: vec![],
            opt_level: ' ',
            output_kind: OutputKind::Assembly,
            threads: 1,
            input_name: "-".to_owned(),
            output_name: None,
        }
    }
}

/// The backend/pipeline pairs of one assembly. Pipelines after the first
/// are children of the root; dropping the set releases every pair.
pub struct PipelineSet {
    root: Pipeline,
    backends: Vec<Box<dyn TargetBackend>>,
}

impl PipelineSet {
    /// The single pipeline the external engine executes; its children run
    /// under the same call.
    pub fn root(&self) -> &Pipeline {
        &self.root
    }

    pub fn backends(&self) -> &[Box<dyn TargetBackend>] {
        &self.backends
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

/// A fully assembled pipeline set plus the sink it serializes to.
pub struct Assembly {
    pub pipelines: PipelineSet,
    output: OutputFile,
}

impl Assembly {
    pub fn output(&mut self) -> &mut OutputFile {
        &mut self.output
    }

    /// Commit after a successful run: the output survives, everything
    /// else is released.
    pub fn commit(self) {
        self.output.keep();
    }
}

struct ResolvedTarget<'r> {
    info: &'r TargetInfo,
    descriptor: TargetDescriptor,
    /// The unit's embedded triple before any override, kept raw for
    /// toolchain quirk checks.
    orig_triple: Option<String>,
}

fn normalize_triple(triple: &str) -> String {
    triple
        .parse::<Triple>()
        .map(|parsed| parsed.to_string())
        .unwrap_or_else(|_| triple.to_owned())
}

fn resolve_target<'r>(
    registry: &'r TargetRegistry,
    options: &AssembleOptions,
    unit: Option<&mut Unit>,
) -> AssembleResult<ResolvedTarget<'r>> {
    let mut orig_triple = None;

    let triple_str = match unit {
        Some(unit) => {
            orig_triple = unit.target_triple.clone();

            if let Some(replacement) = &options.triple {
                unit.target_triple = Some(normalize_triple(replacement));
            }
            unit.target_triple.clone().unwrap_or_default()
        }
        None => options.triple.clone().unwrap_or_default(),
    };

    let triple_str = if triple_str.is_empty() {
        Triple::host().to_string()
    } else {
        triple_str
    };

    let (info, triple) = registry
        .lookup(options.arch.as_deref(), &triple_str)
        .map_err(AssembleError::UnknownTarget)?;

    let mut features = SubtargetFeatures::new();
    for feature in &options.features {
        features.add(feature);
    }

    Ok(ResolvedTarget {
        info,
        descriptor: TargetDescriptor {
            triple,
            arch_override: options.arch.clone(),
            cpu: options.cpu.clone(),
            features: features.to_string(),
        },
        orig_triple,
    })
}

/// The legacy portable triples (`le32-*-ndk`, `le64-*-ndk`) predate
/// target-lexicon's vocabulary, so the components are checked raw.
fn is_ndk_portable(triple: &str) -> bool {
    let mut parts = triple.split('-');
    matches!(parts.next(), Some("le32" | "le64")) && parts.any(|part| part == "ndk")
}

fn is_macos_older_than(triple: &Triple, want_major: u16, want_minor: u16) -> bool {
    match triple.operating_system {
        OperatingSystem::MacOSX {
            major,
            minor,
            patch: _,
        } => (major, minor) < (want_major, want_minor),
        _ => false,
    }
}

fn resolve_pass(
    passes: &PassRegistry,
    name: Option<&str>,
    boundary: &'static str,
) -> AssembleResult<Option<kiln_pipeline::PassId>> {
    match name {
        None => Ok(None),
        Some(name) => passes
            .lookup(name)
            .map(Some)
            .ok_or_else(|| AssembleError::UnknownPassName {
                boundary,
                name: name.to_owned(),
            }),
    }
}

/// Resolve a target and build one configured backend without a unit.
///
/// This is the option-help path: the caller only needs a backend instance
/// so it can enumerate cpu/feature help text, and has nothing to compile.
pub fn probe_target(
    registry: &TargetRegistry,
    config: &CodegenConfig,
    options: &AssembleOptions,
) -> AssembleResult<Box<dyn TargetBackend>> {
    let resolved = resolve_target(registry, options, None)?;

    let opt_level = OptLevel::from_code(options.opt_level)
        .ok_or(AssembleError::InvalidOptLevel(options.opt_level))?;

    Ok(resolved
        .info
        .create_backend(&resolved.descriptor, config, opt_level))
}

/// Assemble one executable pipeline set for `unit`.
///
/// On success the returned [`Assembly`] holds `min(threads, defined
/// functions)` configured backend/pipeline pairs linked under one root,
/// and the opened output sink. Every failure releases whatever was built
/// and discards the sink.
pub fn assemble<D: DiagnosticEmitter>(
    session: &mut Session<D>,
    registry: &TargetRegistry,
    passes: &PassRegistry,
    config: &CodegenConfig,
    options: &AssembleOptions,
    unit: &mut Unit,
) -> AssembleResult<Assembly> {
    let resolved = resolve_target(registry, options, Some(&mut *unit))?;

    let opt_level = OptLevel::from_code(options.opt_level)
        .ok_or(AssembleError::InvalidOptLevel(options.opt_level))?;

    // Dense sequence numbers over defined functions; the external engine
    // partitions work across pipelines by them.
    let mut defined = 0u32;
    for function in unit.functions.iter_mut().filter(|f| !f.is_declaration()) {
        function.set_seq(defined);
        defined += 1;
    }

    // More pipelines than functions is wasted work.
    let work_units = defined.max(1);
    let pipeline_count = options.threads.max(1).min(work_units) as usize;

    let mut backends: Vec<Box<dyn TargetBackend>> = Vec::with_capacity(pipeline_count);
    let mut pipelines: Vec<Pipeline> = Vec::with_capacity(pipeline_count);

    for _ in 0..pipeline_count {
        let mut backend = resolved
            .info
            .create_backend(&resolved.descriptor, config, opt_level);

        if config.disable_loc {
            backend.set_use_loc(false);
        }
        if config.disable_cfi {
            backend.set_use_cfi(false);
        }
        if config.dwarf_directory {
            backend.set_use_dwarf_directory(true);
        }

        // Reflects the toolchain the unit was originally built for, so
        // this follows the pre-override triple.
        if resolved.orig_triple.as_deref().is_some_and(is_ndk_portable) {
            backend.set_no_exec_stack(true);
        }

        // Assemblers before 10.6 choke on .loc directives.
        if is_macos_older_than(&resolved.descriptor.triple, 10, 6) {
            backend.set_use_loc(false);
        }

        backends.push(backend);
        pipelines.push(Pipeline::new());
    }

    // The sink opens after backend construction and before stage
    // insertion; failing here abandons the whole set.
    let output_name = match &options.output_name {
        Some(name) => name.clone(),
        None if options.input_name == "-" => "-".to_owned(),
        None => output_filename(
            &options.input_name,
            options.output_kind,
            resolved.info.name(),
            &resolved.descriptor.triple.operating_system,
        ),
    };

    let output = OutputFile::open(&output_name, options.output_kind.is_binary()).map_err(
        |source| AssembleError::OutputOpen {
            path: output_name.clone(),
            source,
        },
    )?;

    if config.relax_all && options.output_kind != OutputKind::Object {
        let _ = session.report(
            Diagnostic::warning()
                .with_message("ignoring relax-all: output kind is not an object file"),
        );
    }

    for (backend, pipeline) in backends.iter_mut().zip(&mut pipelines) {
        pipeline.add_stage(Stage::LibCalls {
            triple: resolved.descriptor.triple.clone(),
            disabled: config.disable_libcalls,
        });

        backend.add_analysis_stages(pipeline);

        if let Some(layout) = backend.data_layout().or(unit.data_layout) {
            pipeline.add_stage(Stage::DataLayout(layout));
        }

        backend.set_asm_verbosity(true);

        if config.relax_all && options.output_kind == OutputKind::Object {
            backend.set_relax_all(true);
        }
    }

    let range = PassRange {
        start_after: resolve_pass(passes, config.start_after.as_deref(), "start-after")?,
        stop_after: resolve_pass(passes, config.stop_after.as_deref(), "stop-after")?,
    };

    for (backend, pipeline) in backends.iter().zip(&mut pipelines) {
        backend
            .add_emit_stage(pipeline, options.output_kind, !config.no_verify, range)
            .map_err(|_| AssembleError::UnsupportedOutputKind {
                target: resolved.info.name().to_owned(),
                kind: options.output_kind,
            })?;
    }

    let mut root = pipelines.remove(0);
    for child in pipelines {
        root.add_child(child);
    }

    Ok(Assembly {
        pipelines: PipelineSet { root, backends },
        output,
    })
}
