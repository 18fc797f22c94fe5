use std::{
    path::PathBuf,
    process::{Command, Output, Stdio},
};

#[derive(Debug)]
pub struct TestConfig {
    pub cmd: PathBuf,
}

pub fn setup() -> TestConfig {
    TestConfig {
        cmd: PathBuf::from(env!("CARGO_BIN_EXE_jitsum")),
    }
}

impl TestConfig {
    pub fn run<I, S>(&self, args: I) -> Output
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        Command::new(&self.cmd)
            .args(args)
            .env_remove("RUST_LOG")
            .stderr(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .unwrap()
            .wait_with_output()
            .unwrap()
    }

    /// Run with `args` and require a successful exit, returning stdout.
    pub fn run_ok<I, S>(&self, args: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let out = self.run(args);
        if !out.status.success() {
            eprintln!("OUT: {}", String::from_utf8_lossy(&out.stdout));
            eprintln!("ERR: {}", String::from_utf8_lossy(&out.stderr));
            panic!("Failed to execute cmd");
        }
        String::from_utf8(out.stdout).unwrap()
    }
}
