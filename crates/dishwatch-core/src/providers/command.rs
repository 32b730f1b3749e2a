//! Provider backed by external commands.
//!
//! The dish speaks gRPC; this crate does not. Instead each operation runs a
//! configured command (by default `grpcurl`) and parses the JSON it prints.
//! Successful runs that also wrote to stderr surface those lines as
//! [`StatusErrors`].

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::config::DishConfig;
use crate::provider::{DishProvider, Operation, ProviderError, Result};
use crate::snapshot::{
    MetricSnapshot, ObstructionMap, StatusErrors, flatten_json, history_from_json,
    obstruction_from_json,
};

/// Raw result of one command run.
#[derive(Debug)]
struct CommandOutput {
    stdout: Vec<u8>,
    stderr: String,
}

fn read_pipe<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut out = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut out);
        }
        out
    })
}

/// Run `argv` with a deadline, capturing stdout and stderr.
///
/// Pipes are drained on helper threads so a chatty command cannot block on a
/// full pipe while we wait for it to exit.
fn run_command(argv: &[String], timeout: Duration) -> Result<CommandOutput> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| ProviderError::Unavailable("empty command".to_string()))?;
    let display = argv.join(" ");
    debug!("running provider command: {display}");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = read_pipe(child.stdout.take());
    let stderr = read_pipe(child.stderr.take());

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            warn!("provider command timed out: {display}");
            return Err(ProviderError::Timeout {
                command: display,
                timeout,
            });
        }
        thread::sleep(Duration::from_millis(5));
    };

    let stdout = stdout.join().unwrap_or_default();
    let stderr = String::from_utf8_lossy(&stderr.join().unwrap_or_default())
        .trim()
        .to_string();

    if !status.success() {
        return Err(ProviderError::CommandFailed {
            command: display,
            status: status.to_string(),
            stderr,
        });
    }

    Ok(CommandOutput { stdout, stderr })
}

fn stderr_lines(stderr: &str) -> StatusErrors {
    stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Provider that shells out to per-operation commands.
pub struct CommandProvider {
    config: DishConfig,
}

impl CommandProvider {
    pub fn new(config: DishConfig) -> Self {
        Self { config }
    }

    fn run_json(&self, op: Operation) -> Result<(serde_json::Value, StatusErrors)> {
        let argv = match op {
            Operation::Status => self.config.status_command.as_ref(),
            Operation::ObstructionMap => self.config.obstruction_command.as_ref(),
            Operation::HistoryPingStats => self.config.history_command.as_ref(),
        }
        .ok_or(ProviderError::NotConfigured(op))?;

        let output = run_command(argv, self.config.command_timeout)?;
        let doc: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        Ok((doc, stderr_lines(&output.stderr)))
    }
}

impl DishProvider for CommandProvider {
    fn name(&self) -> &str {
        "command"
    }

    fn get_status(&self) -> Result<(MetricSnapshot, StatusErrors)> {
        let (doc, errors) = self.run_json(Operation::Status)?;
        Ok((flatten_json(&doc), errors))
    }

    fn get_obstruction_map(&self) -> Result<(ObstructionMap, StatusErrors)> {
        let (doc, errors) = self.run_json(Operation::ObstructionMap)?;
        Ok((obstruction_from_json(&doc), errors))
    }

    fn history_ping_stats(&self) -> Result<MetricSnapshot> {
        let (doc, errors) = self.run_json(Operation::HistoryPingStats)?;
        for e in &errors {
            debug!("history command stderr: {e}");
        }
        Ok(history_from_json(&doc))
    }
}
