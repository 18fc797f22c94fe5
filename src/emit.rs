use std::{fmt::Display, path::Path};

use clap::ValueEnum;

use inkwell::{
    memory_buffer::MemoryBuffer,
    module::Module,
    targets::{CodeModel, FileType as LlvmFileType, RelocMode, Target, TargetMachine},
    OptimizationLevel,
};

use crate::error::{Error, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum ArtifactKind {
    /// LLVM IR file
    Ll,
    /// LLVM bitcode file
    Bc,
    /// .s file
    Asm,
    /// Unlinked object file
    Obj,
}

impl Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ArtifactKind::Ll => "ll",
                ArtifactKind::Bc => "bc",
                ArtifactKind::Asm => "asm",
                ArtifactKind::Obj => "obj",
            }
        )
    }
}

/// Write `module` to `dest` in the requested format.
pub fn write_artifact(
    module: &Module,
    kind: ArtifactKind,
    opt: OptimizationLevel,
    dest: &Path,
) -> Result<()> {
    log::debug!("emitting {kind} to {}", dest.display());
    match kind {
        ArtifactKind::Ll => std::fs::write(dest, module.to_string())?,
        ArtifactKind::Bc => {
            let bc = module.write_bitcode_to_memory();
            std::fs::write(dest, bc.as_slice())?;
        }
        ArtifactKind::Asm => {
            let asm = run_llc(kind, LlvmFileType::Assembly, opt, module)?;
            std::fs::write(dest, asm.as_slice())?;
        }
        ArtifactKind::Obj => {
            let obj = run_llc(kind, LlvmFileType::Object, opt, module)?;
            std::fs::write(dest, obj.as_slice())?;
        }
    }
    Ok(())
}

fn run_llc(
    kind: ArtifactKind,
    file_type: LlvmFileType,
    opt: OptimizationLevel,
    module: &Module,
) -> Result<MemoryBuffer> {
    let emit_err = |reason: String| Error::Emit { kind, reason };
    crate::target::initialize()?;
    let trip = TargetMachine::get_default_triple();
    let target = Target::from_triple(&trip).map_err(|e| emit_err(e.to_string()))?;
    let reloc = RelocMode::Default;
    let model = CodeModel::Default;
    let cpu = TargetMachine::get_host_cpu_name();
    let cpu = cpu.to_string_lossy();
    let features = TargetMachine::get_host_cpu_features();
    let features = features.to_string_lossy();
    let machine = target
        .create_target_machine(&trip, &cpu, &features, opt, reloc, model)
        .ok_or_else(|| emit_err(format!("no target machine for {}", trip.as_str().to_string_lossy())))?;
    machine
        .write_to_memory_buffer(module, file_type)
        .map_err(|e| emit_err(e.to_string()))
}
