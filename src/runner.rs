//! The parse → build → verify → lower → call pipeline.

use std::{fmt, path::PathBuf};

use clap::ValueEnum;
use inkwell::{context::Context, OptimizationLevel};

use crate::{
    codegen::SumModuleBuilder,
    emit::{write_artifact, ArtifactKind},
    engine::ExecutionContext,
    error::{Error, Result},
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OptLevel {
    #[default]
    None,
    Less,
    Default,
    Aggressive,
}

impl From<OptLevel> for OptimizationLevel {
    fn from(value: OptLevel) -> Self {
        match value {
            OptLevel::None => OptimizationLevel::None,
            OptLevel::Less => OptimizationLevel::Less,
            OptLevel::Default => OptimizationLevel::Default,
            OptLevel::Aggressive => OptimizationLevel::Aggressive,
        }
    }
}

/// Where the textual IR goes once the module is verified.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum IrDump {
    #[default]
    Stderr,
    Off,
}

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub opt_level: OptLevel,
    pub dump: IrDump,
    pub emit: Option<(ArtifactKind, PathBuf)>,
}

/// One evaluated `sum(x, y)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sum {
    pub x: i32,
    pub y: i32,
    pub result: i32,
}

impl fmt::Display for Sum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} = {}", self.x, self.y, self.result)
    }
}

/// Parse one operand. Only base-10 `i32` values are accepted, anything else
/// is an error rather than silently becoming `0`.
pub fn parse_operand(value: &str) -> Result<i32> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|source| Error::InvalidArgument {
            value: value.to_string(),
            source,
        })
}

/// Build, verify and JIT `sum`, then call it with `x` and `y`.
///
/// The LLVM context and the execution context are both scoped to this call so
/// every early return releases the compiled code.
pub fn run(x: i32, y: i32, options: &RunOptions) -> Result<Sum> {
    crate::target::initialize()?;
    let opt = OptimizationLevel::from(options.opt_level);
    let context = Context::create();
    let builder = SumModuleBuilder::new(&context);
    builder.build_sum();
    builder.verify();
    if options.dump == IrDump::Stderr {
        builder.module().print_to_stderr();
    }
    if let Some((kind, dest)) = &options.emit {
        write_artifact(builder.module(), *kind, opt, dest)?;
    }
    let module = builder.into_module();
    let jit = ExecutionContext::create(&module, opt)?;
    let sum = jit.bind_sum()?;
    log::debug!("calling sum({x}, {y})");
    let result = sum.call(x, y);
    Ok(Sum { x, y, result })
}
