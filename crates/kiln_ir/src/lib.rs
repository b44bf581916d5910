//! Types for representing a parsed compilation unit handed to codegen.

#[macro_use]
extern crate macro_rules_attribute;

pub mod body;
pub mod builder;
pub mod layout;
pub mod unit;

derive_alias! {
    #[derive(Node!)] = #[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)];
    #[derive(NodeCopy!)] = #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)];
}

/// A first-class value type. Pointers are opaque; their pointee type is
/// carried by the instructions that load through them.
#[derive(NodeCopy!)]
pub enum Type {
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Ptr,
}

#[derive(NodeCopy!)]
pub enum BinOp {
    Add,
    Sub,
    And,
    Or,
}
