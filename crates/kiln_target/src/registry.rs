use kiln_session::config::{CodegenConfig, OptLevel};
use target_lexicon::{Architecture, Triple};

use crate::backend::{TargetBackend, TargetDescriptor};

type Factory = Box<dyn Fn(&TargetDescriptor, &CodegenConfig, OptLevel) -> Box<dyn TargetBackend>>;

/// A registered backend: an architecture predicate plus a factory.
pub struct TargetInfo {
    name: &'static str,
    description: &'static str,
    supports: fn(Architecture) -> bool,
    factory: Factory,
}

impl std::fmt::Debug for TargetInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetInfo")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl TargetInfo {
    pub fn new(
        name: &'static str,
        description: &'static str,
        supports: fn(Architecture) -> bool,
        factory: impl Fn(&TargetDescriptor, &CodegenConfig, OptLevel) -> Box<dyn TargetBackend>
            + 'static,
    ) -> Self {
        Self {
            name,
            description,
            supports,
            factory: Box::new(factory),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn supports_arch(&self, arch: Architecture) -> bool {
        (self.supports)(arch)
    }

    pub fn create_backend(
        &self,
        descriptor: &TargetDescriptor,
        config: &CodegenConfig,
        opt_level: OptLevel,
    ) -> Box<dyn TargetBackend> {
        (self.factory)(descriptor, config, opt_level)
    }
}

/// Backend lookup by explicit architecture name or by triple.
///
/// Lookup failures are returned as the registry's own diagnostic text;
/// callers wrap them without rewording.
#[derive(Default)]
pub struct TargetRegistry {
    targets: Vec<TargetInfo>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, info: TargetInfo) {
        self.targets.push(info);
    }

    pub fn targets(&self) -> impl Iterator<Item = &TargetInfo> {
        self.targets.iter()
    }

    pub fn lookup(&self, arch: Option<&str>, triple: &str) -> Result<(&TargetInfo, Triple), String> {
        let parsed: Triple = triple
            .parse()
            .map_err(|err| format!("unable to parse target triple `{triple}`: {err}"))?;

        match arch {
            Some(name) => self
                .targets
                .iter()
                .find(|target| target.name == name)
                .ok_or_else(|| format!("no registered target named `{name}`")),
            None => self
                .targets
                .iter()
                .find(|target| target.supports_arch(parsed.architecture))
                .ok_or_else(|| format!("no registered target supports the triple `{triple}`")),
        }
        .map(|target| (target, parsed))
    }
}
