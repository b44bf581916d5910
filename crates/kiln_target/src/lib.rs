//! The seam between pipeline assembly and target backends.
//!
//! Backends are external; this crate defines the capability trait they
//! implement, the registry they are looked up in, and the feature-string
//! format they are configured with.

mod backend;
mod features;
mod registry;

pub use backend::{TargetBackend, TargetDescriptor, UnsupportedOutput};
pub use features::SubtargetFeatures;
pub use registry::{TargetInfo, TargetRegistry};
