use inkwell::{
    builder::Builder,
    context::{Context, ContextRef},
    module::Module,
    values::{FunctionValue, IntValue},
};

use crate::{
    error::{Error, Result},
    signature::Signature,
};

pub(crate) mod sum_names {
    pub const MODULE_NAME: &str = "main";
    pub const ENTRY_BLOCK: &str = "entry";
    pub const LHS: &str = "x";
    pub const RHS: &str = "y";
    pub const RESULT: &str = "results";
}

/// Builds the module holding `i32 sum(i32 x, i32 y)`.
pub struct SumModuleBuilder<'ctx> {
    context: ContextRef<'ctx>,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
}

impl<'ctx> SumModuleBuilder<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self::with_module(context.create_module(sum_names::MODULE_NAME))
    }

    pub fn with_module(module: Module<'ctx>) -> Self {
        let context = module.get_context();
        let builder = context.create_builder();
        Self {
            context,
            module,
            builder,
        }
    }

    pub fn module(&self) -> &Module<'ctx> {
        &self.module
    }

    pub fn into_module(self) -> Module<'ctx> {
        self.module
    }

    #[cfg(test)]
    fn i32_type(&self) -> inkwell::types::IntType<'ctx> {
        self.context.i32_type()
    }

    /// Add the declaration of `sig` to the module and position the builder at
    /// the end of its (empty) entry block.
    pub fn emit_fn_and_move_to_entry(&self, sig: &Signature) -> FunctionValue<'ctx> {
        let f = self
            .module
            .add_function(sig.name, sig.fn_type(&self.context), None);
        let bb = self.context.append_basic_block(f, sum_names::ENTRY_BLOCK);
        self.builder.position_at_end(bb);
        f
    }

    /// Emit the whole `sum` function: one `add` and one `ret`.
    pub fn build_sum(&self) -> FunctionValue<'ctx> {
        let f = self.emit_fn_and_move_to_entry(&Signature::SUM);
        let (lhs, rhs) = self.named_params(f);
        let results = self.emit_add(lhs, rhs);
        self.builder.build_return(Some(&results));
        log::trace!("built {}", Signature::SUM);
        f
    }

    fn named_params(&self, f: FunctionValue<'ctx>) -> (IntValue<'ctx>, IntValue<'ctx>) {
        let lhs = f.get_nth_param(0).expect("sum lhs").into_int_value();
        let rhs = f.get_nth_param(1).expect("sum rhs").into_int_value();
        lhs.set_name(sum_names::LHS);
        rhs.set_name(sum_names::RHS);
        (lhs, rhs)
    }

    /// Plain `add` with no `nsw`/`nuw` flags, overflow wraps.
    pub fn emit_add(&self, lhs: IntValue<'ctx>, rhs: IntValue<'ctx>) -> IntValue<'ctx> {
        self.builder.build_int_add(lhs, rhs, sum_names::RESULT)
    }

    /// Run the LLVM verifier over the module.
    pub fn check(&self) -> Result<()> {
        self.module
            .verify()
            .map_err(|e| Error::MalformedIr(e.to_string()))
    }

    /// Like [`check`](Self::check) but a failure is a bug in this crate: the
    /// module and every diagnostic are written to stderr and the process
    /// aborts.
    pub fn verify(&self) {
        if let Err(e) = self.module.verify() {
            eprintln!("{}", self.module.to_string());
            let es = e.to_string();
            let mut ct = 0;
            for line in es.lines() {
                eprintln!("{line}");
                ct += 1;
            }
            eprintln!("Found {ct} verifier diagnostics in {}", sum_names::MODULE_NAME);
            std::process::abort();
        }
    }
}
