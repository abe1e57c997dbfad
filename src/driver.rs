//! Wires the translation pass to its collaborators: where the source comes
//! from, where the generated program goes, and how it gets compiled.

use std::{
    env, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    backend::{
        build::{BuildError, BuildInvoker, Compiler},
        emitter::Emitter,
    },
    frontend::{
        balance::{self, BalanceError},
        scanner::{Event, Scanner},
    },
};

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("could not open {}", path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not create {}", path.display())]
    WriteTarget {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not locate the executable's directory")]
    ExecutableDir(#[source] io::Error),
    #[error(transparent)]
    Unbalanced(#[from] BalanceError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

pub trait SourceReader {
    fn read_source(&self) -> Result<Vec<u8>, DriverError>;
}

pub trait TargetWriter {
    fn write_target(&mut self, text: &str) -> Result<(), DriverError>;
}

#[derive(Clone, Debug)]
pub struct SourceFile(pub PathBuf);

impl SourceReader for SourceFile {
    fn read_source(&self) -> Result<Vec<u8>, DriverError> {
        let source =
            fs::read(&self.0).map_err(|source| DriverError::ReadSource {
                path: self.0.clone(),
                source,
            })?;
        info!(path = %self.0.display(), "source opened");
        Ok(source)
    }
}

impl SourceReader for &[u8] {
    fn read_source(&self) -> Result<Vec<u8>, DriverError> {
        Ok(self.to_vec())
    }
}

impl SourceReader for &str {
    fn read_source(&self) -> Result<Vec<u8>, DriverError> {
        Ok(self.as_bytes().to_vec())
    }
}

/// Output file, truncated if it already exists.
#[derive(Clone, Debug)]
pub struct TargetFile(pub PathBuf);

impl TargetWriter for TargetFile {
    fn write_target(&mut self, text: &str) -> Result<(), DriverError> {
        fs::write(&self.0, text).map_err(|source| DriverError::WriteTarget {
            path: self.0.clone(),
            source,
        })?;
        info!(path = %self.0.display(), "target written");
        Ok(())
    }
}

/// Any byte stream, such as standard output.
#[derive(Debug)]
pub struct TargetStream<W>(pub W);

impl<W: Write> TargetWriter for TargetStream<W> {
    fn write_target(&mut self, text: &str) -> Result<(), DriverError> {
        self.0
            .write_all(text.as_bytes())
            .and_then(|()| self.0.flush())
            .map_err(|source| DriverError::WriteTarget {
                path: PathBuf::from("<stream>"),
                source,
            })
    }
}

impl TargetWriter for String {
    fn write_target(&mut self, text: &str) -> Result<(), DriverError> {
        self.clear();
        self.push_str(text);
        Ok(())
    }
}

/// A finished translation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    /// Source bytes consumed, comments included.
    pub processed: usize,
    /// Statements between prologue and epilogue.
    pub statements: usize,
}

impl Translation {
    pub fn of(source: &[u8]) -> Self {
        let mut scanner = Scanner::new(source.iter().copied());
        let mut emitter = Emitter::new();

        emitter.emit(Event::Prologue);
        emitter.extend(scanner.by_ref());
        emitter.emit(Event::Epilogue);

        Translation {
            processed: scanner.processed(),
            statements: emitter.statements(),
            text: emitter.finish(),
        }
    }
}

/// Translates a whole source program into C++ text.
pub fn translate(source: &[u8]) -> String {
    Translation::of(source).text
}

#[derive(Clone, Debug)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub executable: PathBuf,
    pub compiler: Compiler,
    pub check_brackets: bool,
    pub build: bool,
}

impl Config {
    /// The fixed file names, rooted at `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Config {
            input: dir.join("main.bf"),
            output: dir.join("main_release.cpp"),
            executable: dir
                .join(format!("main_release{}", env::consts::EXE_SUFFIX)),
            compiler: Compiler::default(),
            check_brackets: false,
            build: true,
        }
    }

    /// The fixed file names, next to the running program.
    pub fn beside_executable() -> Result<Self, DriverError> {
        let exe = env::current_exe().map_err(DriverError::ExecutableDir)?;
        let dir = exe.parent().ok_or_else(|| {
            DriverError::ExecutableDir(io::Error::new(
                io::ErrorKind::NotFound,
                "executable path has no parent",
            ))
        })?;

        Ok(Self::in_dir(dir))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub processed: usize,
    pub statements: usize,
    pub built: bool,
}

pub struct Driver<R, W, B> {
    pub config: Config,
    pub reader: R,
    pub writer: W,
    pub invoker: B,
}

impl Driver<SourceFile, TargetFile, Compiler> {
    pub fn from_config(config: Config) -> Self {
        Driver {
            reader: SourceFile(config.input.clone()),
            writer: TargetFile(config.output.clone()),
            invoker: config.compiler.clone(),
            config,
        }
    }
}

impl<R, W, B> Driver<R, W, B>
where
    R: SourceReader,
    W: TargetWriter,
    B: BuildInvoker,
{
    pub fn new(config: Config, reader: R, writer: W, invoker: B) -> Self {
        Driver {
            config,
            reader,
            writer,
            invoker,
        }
    }

    /// Reads, translates and writes the program, then builds it if enabled.
    ///
    /// Nothing is written when the source cannot be read or, with bracket
    /// checking on, is unbalanced.
    pub fn run(&mut self) -> Result<Report, DriverError> {
        let source = self.reader.read_source()?;

        if self.config.check_brackets {
            balance::check(&source)?;
        }

        let translation = Translation::of(&source);
        debug!(
            processed = translation.processed,
            statements = translation.statements,
            "translated"
        );
        self.writer.write_target(&translation.text)?;

        if self.config.build {
            self.invoker
                .build(&self.config.output, &self.config.executable)?;
            info!(path = %self.config.executable.display(), "build succeeded");
        }

        Ok(Report {
            processed: translation.processed,
            statements: translation.statements,
            built: self.config.build,
        })
    }
}
