use crate::body::{Body, Inst, InstId, Value};
use crate::{BinOp, Type};

/// Inserts instructions into a [`Body`] ahead of a fixed point, in the
/// order the build methods are called.
pub struct InstBuilder<'a> {
    body: &'a mut Body,
    at: usize,
}

impl<'a> InstBuilder<'a> {
    /// Position a builder immediately before `inst`.
    ///
    /// # Panics
    ///
    /// Panics if `inst` is not in the body's execution order.
    pub fn before(body: &'a mut Body, inst: InstId) -> Self {
        let at = body.position(inst).expect("instruction not in body");
        Self { body, at }
    }

    fn insert(&mut self, inst: Inst) -> Value {
        let id = self.body.insert_at(self.at, inst);
        self.at += 1;
        Value::Inst(id)
    }

    pub fn load(&mut self, ptr: Value, ty: Type) -> Value {
        self.insert(Inst::Load { ptr, ty })
    }

    pub fn store(&mut self, ptr: Value, value: Value) {
        let _ = self.insert(Inst::Store { ptr, value });
    }

    pub fn ptr_to_int(&mut self, value: Value, ty: Type) -> Value {
        self.insert(Inst::PtrToInt { value, ty })
    }

    pub fn int_to_ptr(&mut self, value: Value) -> Value {
        self.insert(Inst::IntToPtr { value })
    }

    pub fn iadd(&mut self, lhs: Value, rhs: Value) -> Value {
        self.insert(Inst::Binary {
            op: BinOp::Add,
            lhs,
            rhs,
        })
    }

    pub fn band(&mut self, lhs: Value, rhs: Value) -> Value {
        self.insert(Inst::Binary {
            op: BinOp::And,
            lhs,
            rhs,
        })
    }

    pub fn ptr_offset(&mut self, base: Value, offset: Value) -> Value {
        self.insert(Inst::PtrOffset { base, offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_before_anchor_in_call_order() {
        let mut body = Body::new();

        let slot = body.push(Inst::Alloca { ty: Type::Ptr });
        let ret = body.push(Inst::Ret { value: None });

        let mut builder = InstBuilder::before(&mut body, ret);
        let loaded = builder.load(Value::Inst(slot), Type::Ptr);
        builder.store(Value::Inst(slot), loaded);

        let names: Vec<_> = body
            .iter()
            .map(|(_, inst)| match inst {
                Inst::Alloca { .. } => "alloca",
                Inst::Load { .. } => "load",
                Inst::Store { .. } => "store",
                Inst::Ret { .. } => "ret",
                _ => "other",
            })
            .collect();

        assert_eq!(names, ["alloca", "load", "store", "ret"]);
    }
}
