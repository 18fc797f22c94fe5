//! Process wide registration of the native backend.
//!
//! LLVM needs the host target, its asm printer/parser and the MCJIT engine
//! linked in before an execution engine or a target machine can be created.
//! That registration is global state, so it happens at most once per process
//! no matter how many threads race to call [`initialize`].

use std::sync::OnceLock;

use inkwell::{
    execution_engine::ExecutionEngine,
    targets::{InitializationConfig, Target},
};

use crate::error::{Error, Result};

static NATIVE: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Register the native target and link in MCJIT.
///
/// Every call after the first returns the cached outcome of the first.
pub fn initialize() -> Result<()> {
    NATIVE
        .get_or_init(|| {
            log::debug!("initializing native target");
            ExecutionEngine::link_in_mc_jit();
            Target::initialize_native(&InitializationConfig {
                asm_parser: true,
                asm_printer: true,
                base: true,
                disassembler: false,
                info: true,
                machine_code: true,
            })
        })
        .clone()
        .map_err(Error::TargetInit)
}

#[cfg(test)]
fn is_initialized() -> bool {
    matches!(NATIVE.get(), Some(Ok(())))
}
