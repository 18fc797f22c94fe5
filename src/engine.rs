//! Lowering a verified module into native code and binding its entry points.

use inkwell::{
    execution_engine::{ExecutionEngine, JitFunction},
    module::Module,
    OptimizationLevel,
};

use crate::{
    error::{Error, Result},
    signature::Signature,
};

/// The native type of [`Signature::SUM`].
pub type SumFunc = unsafe extern "C" fn(i32, i32) -> i32;

/// An in-process JIT holding the compiled code of one module.
///
/// All native code it owns is released when this value is dropped; any
/// [`CompiledSum`] borrowed from it has to be gone by then.
pub struct ExecutionContext<'ctx> {
    engine: ExecutionEngine<'ctx>,
}

impl<'ctx> ExecutionContext<'ctx> {
    pub fn create(module: &Module<'ctx>, opt: OptimizationLevel) -> Result<Self> {
        crate::target::initialize()?;
        let engine = module
            .create_jit_execution_engine(opt)
            .map_err(|e| Error::EngineCreation(e.to_string()))?;
        log::debug!("created execution engine at {opt:?}");
        Ok(Self { engine })
    }

    /// Look up `sig.name` and make sure the compiled function has exactly the
    /// declared type before handing out its address.
    fn resolve<F>(&self, sig: &Signature) -> Result<JitFunction<'_, F>>
    where
        F: inkwell::execution_engine::UnsafeFunctionPointer,
    {
        let lookup_err = |e: inkwell::execution_engine::FunctionLookupError| {
            Error::SymbolResolution {
                name: sig.name.to_string(),
                reason: e.to_string(),
            }
        };
        let f = self.engine.get_function_value(sig.name).map_err(lookup_err)?;
        let found = f.get_type();
        let expected = sig.fn_type(&found.get_context());
        if found != expected {
            return Err(Error::SignatureMismatch {
                name: sig.name.to_string(),
                expected: expected.print_to_string().to_string(),
                found: found.print_to_string().to_string(),
            });
        }
        // Safety: the function type was compared against `sig` just above and
        // every caller pairs `sig` with the matching `F`
        let func = unsafe { self.engine.get_function::<F>(sig.name) }.map_err(lookup_err)?;
        log::trace!("resolved {sig}");
        Ok(func)
    }

    pub fn bind_sum(&self) -> Result<CompiledSum<'_>> {
        let func = self.resolve::<SumFunc>(&Signature::SUM)?;
        Ok(CompiledSum { func })
    }
}

/// `sum` bound to its native entry point.
pub struct CompiledSum<'a> {
    func: JitFunction<'a, SumFunc>,
}

impl<'a> CompiledSum<'a> {
    pub fn call(&self, x: i32, y: i32) -> i32 {
        // Safety: `resolve` checked the compiled function is `i32 (i32, i32)`
        // and the borrow on the execution context keeps the code mapped
        unsafe { self.func.call(x, y) }
    }
}

#[cfg(test)]
mod test {
    use inkwell::context::Context;

    use super::*;
    use crate::codegen::SumModuleBuilder;

    #[test]
    fn call_sum() {
        let context = Context::create();
        let builder = SumModuleBuilder::new(&context);
        builder.build_sum();
        builder.check().unwrap();
        let module = builder.into_module();
        let jit = ExecutionContext::create(&module, OptimizationLevel::None).unwrap();
        let sum = jit.bind_sum().unwrap();
        assert_eq!(sum.call(3, 4), 7);
        assert_eq!(sum.call(-3, 4), 1);
        assert_eq!(sum.call(i32::MAX, 1), i32::MIN);
        assert_eq!(sum.call(i32::MIN, -1), i32::MAX);
    }

    #[test]
    fn sum_matches_wrapping_add() {
        let context = Context::create();
        let builder = SumModuleBuilder::new(&context);
        builder.build_sum();
        let module = builder.into_module();
        let jit = ExecutionContext::create(&module, OptimizationLevel::Aggressive).unwrap();
        let sum = jit.bind_sum().unwrap();
        proptest::proptest!(|(x: i32, y: i32)| {
            proptest::prop_assert_eq!(sum.call(x, y), x.wrapping_add(y));
        });
    }

    #[test]
    fn second_engine_for_module_fails() {
        let context = Context::create();
        let builder = SumModuleBuilder::new(&context);
        builder.build_sum();
        let module = builder.into_module();
        let _jit = ExecutionContext::create(&module, OptimizationLevel::None).unwrap();
        let err = ExecutionContext::create(&module, OptimizationLevel::None)
            .err()
            .expect("second engine over one module");
        assert!(matches!(err, Error::EngineCreation(_)), "{err:?}");
        assert!(err.to_string().starts_with("Failed to create ExecutionEngine: "));
    }

    #[test]
    fn missing_entry_point() {
        let context = Context::create();
        let module = context.create_module("empty");
        let jit = ExecutionContext::create(&module, OptimizationLevel::None).unwrap();
        let err = jit.bind_sum().err().expect("no sum in an empty module");
        assert!(
            matches!(&err, Error::SymbolResolution { name, .. } if name == "sum"),
            "{err:?}"
        );
    }

    #[test]
    fn wrong_signature_is_rejected() {
        let context = Context::create();
        let module = context.create_module("wide");
        let i64_type = context.i64_type();
        let f = module.add_function(
            "sum",
            i64_type.fn_type(&[i64_type.into(), i64_type.into()], false),
            None,
        );
        let builder = context.create_builder();
        builder.position_at_end(context.append_basic_block(f, "entry"));
        let lhs = f.get_nth_param(0).unwrap().into_int_value();
        let rhs = f.get_nth_param(1).unwrap().into_int_value();
        builder.build_return(Some(&builder.build_int_add(lhs, rhs, "results")));
        module.verify().unwrap();
        let jit = ExecutionContext::create(&module, OptimizationLevel::None).unwrap();
        let err = jit.bind_sum().err().expect("i64 sum must not bind as i32");
        match err {
            Error::SignatureMismatch {
                name,
                expected,
                found,
            } => {
                assert_eq!(name, "sum");
                assert_eq!(expected, "i32 (i32, i32)");
                assert_eq!(found, "i64 (i64, i64)");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
