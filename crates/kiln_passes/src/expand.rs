use kiln_ir::body::{Body, Inst, InstId, Value};
use kiln_ir::builder::InstBuilder;
use kiln_ir::Type;

/// A target-specific expansion of the vararg-fetch instruction.
///
/// Implementations provide the one hook; the shared driver locates each
/// fetch, splices in the expansion, rewires uses of the fetch's result to
/// the returned address and deletes the fetch.
pub trait VaArgExpansion {
    /// Pass name reported in diagnostics.
    fn name(&self) -> &'static str;

    /// Emit the address computation for fetching an argument of `ty` and
    /// advance the cursor stored at `list`. Returns the address the
    /// argument is to be loaded from.
    fn expand_va_arg(&self, builder: &mut InstBuilder, list: Value, ty: Type) -> Value;
}

/// Expand every vararg fetch in `body`. Each fetch is visited exactly
/// once. Returns whether the body changed.
pub fn expand_va_args(pass: &impl VaArgExpansion, body: &mut Body) -> bool {
    let fetches: Vec<InstId> = body
        .iter()
        .filter_map(|(id, inst)| matches!(inst, Inst::VaArg { .. }).then_some(id))
        .collect();

    for &id in &fetches {
        let (list, ty) = match body.inst(id) {
            Inst::VaArg { list, ty } => (*list, *ty),
            _ => continue,
        };

        let mut builder = InstBuilder::before(body, id);
        let addr = pass.expand_va_arg(&mut builder, list, ty);

        body.replace_uses(Value::Inst(id), addr);
        body.remove(id);
    }

    !fetches.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replaces every fetch with a fixed address and leaves the cursor
    /// alone; just enough to observe the driver's contract.
    struct FixedAddr;

    impl VaArgExpansion for FixedAddr {
        fn name(&self) -> &'static str {
            "fixed-addr"
        }

        fn expand_va_arg(&self, _builder: &mut InstBuilder, _list: Value, _ty: Type) -> Value {
            Value::iconst(Type::Ptr, 0x40)
        }
    }

    #[test]
    fn fetches_are_replaced_and_uses_rewired() {
        let mut body = Body::new();

        let slot = body.push(Inst::Alloca { ty: Type::Ptr });
        let fetch = body.push(Inst::VaArg {
            list: Value::Inst(slot),
            ty: Type::I32,
        });
        body.push(Inst::Ret {
            value: Some(Value::Inst(fetch)),
        });

        assert!(expand_va_args(&FixedAddr, &mut body));

        assert!(body.iter().all(|(_, inst)| !matches!(inst, Inst::VaArg { .. })));

        let ret = body.iter().last().map(|(_, inst)| inst.clone());
        assert_eq!(
            ret,
            Some(Inst::Ret {
                value: Some(Value::iconst(Type::Ptr, 0x40))
            })
        );
    }

    #[test]
    fn body_without_fetches_is_untouched() {
        let mut body = Body::new();
        body.push(Inst::Ret { value: None });

        assert!(!expand_va_args(&FixedAddr, &mut body));
        assert_eq!(body.order().len(), 1);
    }

    #[test]
    fn every_fetch_is_visited_once() {
        let mut body = Body::new();

        let slot = body.push(Inst::Alloca { ty: Type::Ptr });
        for _ in 0..3 {
            let fetch = body.push(Inst::VaArg {
                list: Value::Inst(slot),
                ty: Type::I32,
            });
            body.push(Inst::Store {
                ptr: Value::Inst(slot),
                value: Value::Inst(fetch),
            });
        }

        expand_va_args(&FixedAddr, &mut body);

        // alloca + three (store) survivors, no fetches, nothing expanded
        // twice.
        assert_eq!(body.order().len(), 4);
    }
}
