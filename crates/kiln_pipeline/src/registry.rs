use std::collections::HashMap;

use kiln_utils::keyvec::{declare_key_type, KeyVec};

declare_key_type! { pub struct PassId; }

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassInfo {
    pub name: String,
}

/// The external pass catalogue, keyed by command-line pass name. Used to
/// resolve start-after/stop-after boundaries before assembly.
#[derive(Debug, Default)]
pub struct PassRegistry {
    passes: KeyVec<PassId, PassInfo>,
    by_name: HashMap<String, PassId>,
}

impl PassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>) -> PassId {
        let name = name.into();
        let id = self.passes.insert(PassInfo { name: name.clone() });
        self.by_name.insert(name, id);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<PassId> {
        self.by_name.get(name).copied()
    }

    pub fn info(&self, id: PassId) -> &PassInfo {
        &self.passes[id]
    }
}
