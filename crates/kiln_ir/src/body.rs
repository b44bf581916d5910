use kiln_utils::keyvec::{declare_key_type, KeyVec};

use crate::{BinOp, Node, NodeCopy, Type};

declare_key_type! {
    #[derive(serde::Serialize)]
    pub struct InstId;
}

/// An operand: either the result of another instruction or an immediate.
#[derive(NodeCopy!)]
pub enum Value {
    Inst(InstId),
    IConst { ty: Type, value: i64 },
}

impl Value {
    pub fn iconst(ty: Type, value: i64) -> Self {
        Self::IConst { ty, value }
    }
}

#[derive(Node!)]
pub enum Inst {
    /// Reserve a stack slot; the result is its address.
    Alloca { ty: Type },
    Load { ptr: Value, ty: Type },
    Store { ptr: Value, value: Value },
    PtrToInt { value: Value, ty: Type },
    IntToPtr { value: Value },
    Binary { op: BinOp, lhs: Value, rhs: Value },
    /// Byte-granular address arithmetic: `base + offset`.
    PtrOffset { base: Value, offset: Value },
    /// Fetch the next variadic argument of `ty`; `list` is the address of
    /// the argument-list cursor.
    VaArg { list: Value, ty: Type },
    Ret { value: Option<Value> },
}

impl Inst {
    pub fn map_operands(&mut self, f: &mut impl FnMut(Value) -> Value) {
        match self {
            Inst::Alloca { .. } => {}
            Inst::Load { ptr, .. } => *ptr = f(*ptr),
            Inst::Store { ptr, value } => {
                *ptr = f(*ptr);
                *value = f(*value);
            }
            Inst::PtrToInt { value, .. } | Inst::IntToPtr { value } => *value = f(*value),
            Inst::Binary { lhs, rhs, .. } => {
                *lhs = f(*lhs);
                *rhs = f(*rhs);
            }
            Inst::PtrOffset { base, offset } => {
                *base = f(*base);
                *offset = f(*offset);
            }
            Inst::VaArg { list, .. } => *list = f(*list),
            Inst::Ret { value } => {
                if let Some(value) = value {
                    *value = f(*value);
                }
            }
        }
    }
}

/// The instruction list of a defined function.
///
/// Instructions live in an arena keyed by [`InstId`]; `order` is the
/// execution order. Removal drops an instruction from the order but keeps
/// its arena slot, so existing ids stay valid.
#[derive(Debug, Default)]
pub struct Body {
    insts: KeyVec<InstId, Inst>,
    order: Vec<InstId>,
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, inst: Inst) -> InstId {
        let id = self.insts.insert(inst);
        self.order.push(id);
        id
    }

    pub(crate) fn insert_at(&mut self, index: usize, inst: Inst) -> InstId {
        let id = self.insts.insert(inst);
        self.order.insert(index, id);
        id
    }

    pub fn inst(&self, id: InstId) -> &Inst {
        &self.insts[id]
    }

    pub fn order(&self) -> &[InstId] {
        &self.order
    }

    pub fn position(&self, id: InstId) -> Option<usize> {
        self.order.iter().position(|other| *other == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (InstId, &Inst)> {
        self.order.iter().map(|id| (*id, &self.insts[*id]))
    }

    /// Remove an instruction from the execution order.
    pub fn remove(&mut self, id: InstId) {
        self.order.retain(|other| *other != id);
    }

    /// Rewrite every use of `from` as an operand to `to`.
    pub fn replace_uses(&mut self, from: Value, to: Value) {
        for id in &self.order {
            self.insts[*id].map_operands(&mut |value| if value == from { to } else { value });
        }
    }
}
