use kiln_ir::body::Value;
use kiln_ir::builder::InstBuilder;
use kiln_ir::layout::{align_to, DataLayout};
use kiln_ir::Type;

use crate::expand::VaArgExpansion;

/// Vararg fetch expansion for the MIPS O32 calling convention.
///
/// Arguments whose ABI alignment exceeds one word start at the cursor
/// rounded up to that alignment; narrower arguments start at the cursor
/// as-is. Every slot occupies at least a word when the cursor advances.
pub struct MipsVaArgExpansion {
    layout: DataLayout,
}

impl MipsVaArgExpansion {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }
}

impl VaArgExpansion for MipsVaArgExpansion {
    fn name(&self) -> &'static str {
        "mips-va-arg-expansion"
    }

    fn expand_va_arg(&self, builder: &mut InstBuilder, list: Value, ty: Type) -> Value {
        let cur = builder.load(list, Type::Ptr);

        // ABI table invariant, not a runtime input.
        let ty_align = self.layout.abi_align(ty);
        debug_assert!(ty_align.is_power_of_two());

        let addr = if ty_align > 4 {
            let as_int = builder.ptr_to_int(cur, Type::I32);
            let bumped = builder.iadd(as_int, Value::iconst(Type::I32, ty_align as i64 - 1));
            let masked = builder.band(bumped, Value::iconst(Type::I32, -(ty_align as i64)));
            builder.int_to_ptr(masked)
        } else {
            cur
        };

        let slot_align = ty_align.max(4);
        let offset = align_to(self.layout.abi_size(ty), slot_align);

        let next = builder.ptr_offset(addr, Value::iconst(Type::I32, offset as i64));
        builder.store(list, next);

        addr
    }
}
