//! Build `i32 sum(i32 x, i32 y)` as LLVM IR, JIT it in-process and call it.
//!
//! ```no_run
//! let sum = jitsum::run(3, 4, &jitsum::RunOptions::default()).unwrap();
//! assert_eq!(sum.to_string(), "3 + 4 = 7");
//! ```
pub mod codegen;
pub mod emit;
pub mod engine;
pub mod error;
pub mod runner;
pub mod signature;
pub mod target;

pub use error::{Error, Result};
pub use runner::{parse_operand, run, IrDump, OptLevel, RunOptions, Sum};
pub use target::initialize;
