//! Newline-delimited JSON transport to the worker process.

use crate::config::IpcConfig;
use crate::message::Message;
use serde::Serialize;
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command as ProcessCommand, Stdio};
use std::sync::mpsc;
use std::thread;

/// Write `value` as one JSON line to `writer` and flush.
pub fn write_message<W: Write, T: Serialize>(writer: &mut W, value: &T) -> io::Result<()> {
    let mut body =
        serde_json::to_vec(value).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    body.push(b'\n');
    writer.write_all(&body)?;
    writer.flush()
}

/// Read the next line from `reader`, without its terminator.
///
/// Returns `Ok(None)` on EOF.
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(len);
    Ok(Some(line))
}

/// A connection to a worker.
///
/// [`crate::IpcClient`] only talks to the worker through this trait, so tests can substitute an
/// in-memory worker for a real process.
pub trait WorkerChannel {
    /// Whether the worker is still running.
    fn is_alive(&mut self) -> bool;

    /// Start a fresh worker. Output of the previous one is discarded.
    fn restart(&mut self) -> io::Result<()>;

    /// Write `message` to the worker.
    fn send(&mut self, message: &Message) -> io::Result<()>;

    /// Next complete line of worker output, or `None` if nothing is available right now.
    /// Never blocks.
    fn try_recv_line(&mut self) -> io::Result<Option<String>>;

    /// Stop the worker. Later calls to [`Self::is_alive`] return `false`.
    fn kill(&mut self);
}

enum WorkerOutput {
    Line(String),
    IoError(String),
}

struct Running {
    child: Child,
    stdin: ChildStdin,
    rx: mpsc::Receiver<WorkerOutput>,
}

/// Worker running as a child process, speaking JSON lines over stdin/stdout.
///
/// Writes go straight to the child's stdin. A background thread reads stdout line by line so
/// [`WorkerChannel::try_recv_line`] can poll without blocking. Stderr is inherited.
pub struct ProcessWorker {
    program: String,
    args: Vec<String>,
    running: Option<Running>,
}

impl ProcessWorker {
    /// Spawn the worker described by `config`.
    pub fn spawn(config: &IpcConfig) -> io::Result<Self> {
        let mut worker = Self {
            program: config.program.clone(),
            args: config.args.clone(),
            running: None,
        };
        worker.start()?;
        Ok(worker)
    }

    /// OS process id of the running worker.
    pub fn pid(&self) -> Option<u32> {
        self.running.as_ref().map(|running| running.child.id())
    }

    fn start(&mut self) -> io::Result<()> {
        let mut child = ProcessCommand::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("Failed to open worker stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("Failed to open worker stdout"))?;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || read_loop(stdout, tx));

        tracing::debug!(program = %self.program, pid = child.id(), "worker started");
        self.running = Some(Running { child, stdin, rx });
        Ok(())
    }
}

impl WorkerChannel for ProcessWorker {
    fn is_alive(&mut self) -> bool {
        self.running
            .as_mut()
            .is_some_and(|running| matches!(running.child.try_wait(), Ok(None)))
    }

    fn restart(&mut self) -> io::Result<()> {
        self.kill();
        self.start()
    }

    fn send(&mut self, message: &Message) -> io::Result<()> {
        let running = self
            .running
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "worker is not running"))?;
        write_message(&mut running.stdin, message)
    }

    fn try_recv_line(&mut self) -> io::Result<Option<String>> {
        let Some(running) = self.running.as_mut() else {
            return Ok(None);
        };
        match running.rx.try_recv() {
            Ok(WorkerOutput::Line(line)) => Ok(Some(line)),
            Ok(WorkerOutput::IoError(err)) => Err(io::Error::other(err)),
            Err(mpsc::TryRecvError::Empty | mpsc::TryRecvError::Disconnected) => Ok(None),
        }
    }

    fn kill(&mut self) {
        let Some(mut running) = self.running.take() else {
            return;
        };
        drop(running.stdin);
        let _ = running.child.kill();
        let _ = running.child.wait();
        tracing::debug!(program = %self.program, "worker stopped");
    }
}

impl Drop for ProcessWorker {
    fn drop(&mut self) {
        self.kill();
    }
}

fn read_loop(stdout: ChildStdout, tx: mpsc::Sender<WorkerOutput>) {
    let mut reader = BufReader::new(stdout);
    loop {
        match read_line(&mut reader) {
            Ok(Some(line)) => {
                if tx.send(WorkerOutput::Line(line)).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(err) => {
                let _ = tx.send(WorkerOutput::IoError(err.to_string()));
                break;
            }
        }
    }
}
