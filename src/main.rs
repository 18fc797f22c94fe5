use std::path::PathBuf;

use clap::{error::ErrorKind, Parser};
use jitsum::{emit::ArtifactKind, IrDump, OptLevel, RunOptions};

#[derive(Parser, Debug)]
#[command(version, about = "JIT compile `i32 sum(i32, i32)` and call it")]
struct Args {
    #[arg(allow_negative_numbers = true, value_parser = jitsum::parse_operand)]
    x: i32,
    #[arg(allow_negative_numbers = true, value_parser = jitsum::parse_operand)]
    y: i32,
    #[arg(long, value_enum, default_value_t = OptLevel::None)]
    opt_level: OptLevel,
    /// Don't print the generated IR to stderr
    #[arg(short, long)]
    quiet: bool,
    /// Also write the verified module to `--output`
    #[arg(long, value_enum, requires = "output")]
    emit: Option<ArtifactKind>,
    #[arg(short, long, requires = "emit")]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let Args {
        x,
        y,
        opt_level,
        quiet,
        emit,
        output,
    } = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    let options = RunOptions {
        opt_level,
        dump: if quiet { IrDump::Off } else { IrDump::Stderr },
        emit: emit.zip(output),
    };
    match jitsum::run(x, y, &options) {
        Ok(sum) => println!("{sum}"),
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
