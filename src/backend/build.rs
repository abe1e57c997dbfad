use std::{
    io,
    path::Path,
    process::{Command, ExitStatus},
};

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("could not start {compiler}")]
    Spawn {
        compiler: String,
        #[source]
        source: io::Error,
    },
    #[error("{compiler} failed with {status}")]
    Failed { compiler: String, status: ExitStatus },
}

/// Turns a generated source file into an executable.
pub trait BuildInvoker {
    fn build(
        &self,
        target: &Path,
        executable: &Path,
    ) -> Result<(), BuildError>;
}

/// An external C++ compiler run as a blocking subprocess.
///
/// Invoked as `<program> <target> <flags...> -o <executable>` with inherited
/// stdio, so the compiler's own diagnostics reach the terminal.
#[derive(Clone, Debug)]
pub struct Compiler {
    pub program: String,
    pub flags: Vec<String>,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler {
            program: "g++".into(),
            flags: vec!["-std=c++17".into()],
        }
    }
}

impl BuildInvoker for Compiler {
    fn build(
        &self,
        target: &Path,
        executable: &Path,
    ) -> Result<(), BuildError> {
        let mut command = Command::new(&self.program);
        command.arg(target).args(&self.flags).arg("-o").arg(executable);
        debug!(?command, "invoking compiler");

        let status = command.status().map_err(|source| BuildError::Spawn {
            compiler: self.program.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(BuildError::Failed {
                compiler: self.program.clone(),
                status,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn missing_compiler_is_a_spawn_error() {
        let dir = TempDir::new("build").unwrap();
        let compiler = Compiler {
            program: "bfcc-no-such-compiler".into(),
            flags: vec![],
        };

        let err = compiler
            .build(&dir.path().join("a.cpp"), &dir.path().join("a"))
            .unwrap_err();
        assert!(matches!(err, BuildError::Spawn { .. }), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_surfaced() {
        let dir = TempDir::new("build").unwrap();
        let compiler = Compiler {
            program: "false".into(),
            flags: vec![],
        };

        let err = compiler
            .build(&dir.path().join("a.cpp"), &dir.path().join("a"))
            .unwrap_err();
        assert!(matches!(err, BuildError::Failed { .. }), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_success() {
        let dir = TempDir::new("build").unwrap();
        let compiler = Compiler {
            program: "true".into(),
            flags: vec!["-std=c++17".into()],
        };

        compiler
            .build(&dir.path().join("a.cpp"), &dir.path().join("a"))
            .unwrap();
    }
}
