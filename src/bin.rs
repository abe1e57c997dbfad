use std::{error::Error, io, path::PathBuf, process};

use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bfcc::{
    driver::{SourceFile, TargetStream},
    Config, Driver, DriverError,
};

/// Translate a brainfuck program to C++ and compile it.
///
/// Without arguments, reads `main.bf` next to this executable, writes
/// `main_release.cpp` beside it and builds `main_release` with g++.
#[derive(Parser, Debug)]
#[command(name = "bfcc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source program
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Generated C++ file (always overwritten)
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Executable produced by the build step
    #[arg(long, value_name = "FILE")]
    executable: Option<PathBuf>,

    /// Compiler program for the build step
    #[arg(long, value_name = "PROGRAM")]
    compiler: Option<String>,

    /// Compiler flag, replacing the defaults (repeatable)
    #[arg(long = "flag", value_name = "FLAG", allow_hyphen_values = true)]
    flags: Vec<String>,

    /// Reject programs with unmatched brackets before translating
    #[arg(long)]
    check_brackets: bool,

    /// Stop after writing the generated file
    #[arg(long)]
    no_build: bool,

    /// Print the translation instead of writing and building it
    #[arg(long)]
    stdout: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config, DriverError> {
        let mut config = Config::beside_executable()?;

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(executable) = self.executable {
            config.executable = executable;
        }
        if let Some(compiler) = self.compiler {
            config.compiler.program = compiler;
        }
        if !self.flags.is_empty() {
            config.compiler.flags = self.flags;
        }
        config.check_brackets = self.check_brackets;
        config.build = !self.no_build && !self.stdout;

        Ok(config)
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bfcc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()) {
        error!("{}", chain(&e));
        process::exit(1);
    }
}

/// The error followed by each of its causes.
fn chain(e: &dyn Error) -> String {
    let mut message = e.to_string();
    let mut cause = e.source();
    while let Some(c) = cause {
        message = format!("{message}: {c}");
        cause = c.source();
    }
    message
}

fn run(cli: Cli) -> Result<(), DriverError> {
    let to_stdout = cli.stdout;
    let config = cli.into_config()?;

    let report = if to_stdout {
        let reader = SourceFile(config.input.clone());
        let invoker = config.compiler.clone();
        Driver::new(config, reader, TargetStream(io::stdout()), invoker)
            .run()?
    } else {
        Driver::from_config(config).run()?
    };
    tracing::debug!(?report, "done");

    Ok(())
}
