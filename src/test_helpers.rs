use std::{
    fs,
    io::Write,
    process::{Command, Output, Stdio},
};

use tempdir::TempDir;

use crate::{Config, Driver};

/// Whether `program` can be started at all.
pub fn compiler_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// Translates `source`, builds it with the default compiler and runs the
/// result with `input` on stdin.
pub fn build_and_run(source: &str, input: &[u8]) -> Output {
    let dir = TempDir::new("bfcc").unwrap();
    let config = Config::in_dir(dir.path());
    fs::write(&config.input, source).unwrap();

    Driver::from_config(config.clone()).run().unwrap();

    let mut child = Command::new(&config.executable)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(input).unwrap();

    child.wait_with_output().unwrap()
}
