//! The calling signatures this crate knows how to declare and bind.

use std::fmt;

use inkwell::{
    context::ContextRef,
    types::{BasicMetadataTypeEnum, FunctionType},
};

/// A function made only of signed integer parameters and a signed integer
/// return value, described by bit widths.
///
/// The same value is used to declare a function in the IR and to check the
/// function found in an execution context before its address is bound, so the
/// native call site and the generated code can't disagree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    pub name: &'static str,
    pub params: &'static [u32],
    pub ret: u32,
}

impl Signature {
    /// `i32 sum(i32 x, i32 y)`
    pub const SUM: Signature = Signature {
        name: "sum",
        params: &[32, 32],
        ret: 32,
    };

    pub fn fn_type<'ctx>(&self, context: &ContextRef<'ctx>) -> FunctionType<'ctx> {
        let params = self
            .params
            .iter()
            .map(|bits| context.custom_width_int_type(*bits).into())
            .collect::<Vec<BasicMetadataTypeEnum<'ctx>>>();
        context
            .custom_width_int_type(self.ret)
            .fn_type(&params, false)
    }

    #[cfg(test)]
    fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{} {}(", self.ret, self.name)?;
        for (i, bits) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "i{bits}")?;
        }
        write!(f, ")")
    }
}
