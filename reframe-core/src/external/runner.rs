// ============================================================================
// reframe-core/src/external/runner.rs
// ============================================================================
//
// COMMAND RUNNER: Blocking Subprocess Execution Behind a Trait
//
// Every call to ffprobe and ffmpeg goes through `CommandRunner`. The system
// implementation spawns a child process, drains stdout/stderr on helper
// threads and optionally enforces a wall-clock timeout. Tests substitute the
// scripted runner from `external::mocks`.

use crate::error::CommandError;

use ffmpeg_sidecar::command::FfmpegCommand;
use log::{debug, error, warn};

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often a child is polled while a timeout is in effect.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Renders `path` as an operand a tool cannot mistake for an option.
///
/// Relative paths starting with `-` are prefixed with `./`.
pub fn path_arg(path: &Path) -> String {
    let rendered = path.to_string_lossy();
    if path.is_relative() && rendered.starts_with('-') {
        Path::new(".").join(path).to_string_lossy().into_owned()
    } else {
        rendered.into_owned()
    }
}

/// A fully specified external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Wall-clock ceiling for the whole invocation. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Takes the program and argument list from an ffmpeg-sidecar builder.
    pub fn from_ffmpeg(mut cmd: FfmpegCommand) -> Self {
        let program = PathBuf::from(cmd.as_inner().get_program());
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        Self {
            program,
            args,
            timeout: None,
        }
    }

    /// File name of the program, used in log lines and errors.
    pub fn display_name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Shell-like rendering of the command for debug logs.
    pub fn to_command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            if arg.contains(char::is_whitespace) {
                line.push('"');
                line.push_str(arg);
                line.push('"');
            } else {
                line.push_str(arg);
            }
        }
        line
    }

    /// The value following `flag` in the argument list, if present.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|idx| self.args.get(idx + 1))
            .map(String::as_str)
    }
}

/// Captured result of a command that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn status_label(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {code}"),
            None => "termination by signal".to_string(),
        }
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }

    /// Last `max_lines` non-empty lines of stderr.
    pub fn stderr_tail(&self, max_lines: usize) -> String {
        let stderr = String::from_utf8_lossy(&self.stderr);
        let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }
}

/// Capability to run an external command and capture its output.
pub trait CommandRunner: Send + Sync {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        (**self).run(spec)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        (**self).run(spec)
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        let program = spec.display_name();
        debug!("Running command: {}", spec.to_command_line());

        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| {
                error!("Failed to start {}: {}", program, source);
                CommandError::Spawn {
                    program: program.clone(),
                    source,
                }
            })?;

        let stdout_handle = child.stdout.take().map(spawn_reader);
        let stderr_handle = child.stderr.take().map(spawn_reader);

        let status = match spec.timeout {
            Some(limit) => wait_with_timeout(&mut child, limit, &program),
            None => child.wait().map_err(|source| CommandError::Wait {
                program: program.clone(),
                source,
            }),
        };

        // Readers finish once the child's pipes close, including after a kill.
        let stdout = join_reader(stdout_handle);
        let stderr = join_reader(stderr_handle);
        let status = status?;

        debug!("{} finished with {:?}", program, status.code());
        Ok(CommandOutput {
            exit_code: status.code(),
            stdout,
            stderr,
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            warn!("Failed to read child output: {}", e);
        }
        buf
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

fn wait_with_timeout(
    child: &mut Child,
    limit: Duration,
    program: &str,
) -> Result<ExitStatus, CommandError> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if start.elapsed() >= limit => {
                warn!("{} exceeded {:?}, killing it", program, limit);
                if let Err(e) = child.kill() {
                    warn!("Failed to kill {}: {}", program, e);
                }
                // Reap the child so it does not linger as a zombie.
                let _ = child.wait();
                return Err(CommandError::TimedOut {
                    program: program.to_string(),
                    after: limit,
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => {
                return Err(CommandError::Wait {
                    program: program.to_string(),
                    source,
                });
            }
        }
    }
}
