//! IR lowering passes that rewrite functions in place ahead of codegen.

mod expand;
mod mips;

pub use expand::{expand_va_args, VaArgExpansion};
pub use mips::MipsVaArgExpansion;
