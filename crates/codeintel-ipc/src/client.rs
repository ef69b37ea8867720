//! Request/response bookkeeping on top of a [`WorkerChannel`].
//!
//! Only the newest request per command matters to an editor: when the user keeps typing,
//! completions for an older prefix are useless. The client therefore remembers one current id
//! per command and drops any response that does not carry it.

use crate::command::Command;
use crate::config::IpcConfig;
use crate::diff::line_diff;
use crate::error::IpcError;
use crate::ids::IdAllocator;
use crate::message::{Message, RequestParams, Response};
use crate::transport::{ProcessWorker, WorkerChannel};
use std::collections::{BTreeMap, HashMap};

/// Client for a worker process.
///
/// All operations are synchronous and non-blocking: writes go straight to the worker, reads
/// only consume output that has already arrived. Before every operation the worker is checked;
/// a dead worker is restarted and every registered file is sent to it again.
pub struct IpcClient<W: WorkerChannel = ProcessWorker> {
    worker: W,
    ids: IdAllocator,
    current_ids: HashMap<Command, u64>,
    newest_responses: HashMap<Command, Response>,
    files: BTreeMap<String, String>,
}

impl IpcClient<ProcessWorker> {
    /// Spawn the worker described by `config`.
    pub fn spawn(config: &IpcConfig) -> Result<Self, IpcError> {
        let worker = ProcessWorker::spawn(config)?;
        Ok(Self::with_worker(worker, config.id_max))
    }
}

impl<W: WorkerChannel> IpcClient<W> {
    /// Drive an already connected worker, allocating ids from `1..=id_max`.
    pub fn with_worker(worker: W, id_max: u64) -> Self {
        Self {
            worker,
            ids: IdAllocator::new(id_max),
            current_ids: HashMap::new(),
            newest_responses: HashMap::new(),
            files: BTreeMap::new(),
        }
    }

    /// The underlying channel.
    pub fn worker(&self) -> &W {
        &self.worker
    }

    /// Mutable access to the underlying channel.
    pub fn worker_mut(&mut self) -> &mut W {
        &mut self.worker
    }

    /// Id of the outstanding request for `command`, if any.
    pub fn current_id(&self, command: Command) -> Option<u64> {
        self.current_ids.get(&command).copied().filter(|id| *id != 0)
    }

    /// Number of messages still waiting for a response.
    pub fn in_flight(&self) -> usize {
        self.ids.in_flight()
    }

    /// Text last sent for `filename`.
    pub fn file(&self, filename: &str) -> Option<&str> {
        self.files.get(filename).map(String::as_str)
    }

    /// Registered files in name order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(name, text)| (name.as_str(), text.as_str()))
    }

    /// Send a ping. Returns its id.
    pub fn ping(&mut self) -> Result<u64, IpcError> {
        self.ensure_worker()?;
        self.send_new(|id| Message::Ping { id })
    }

    /// Send a `command` request and make it the current one for that command.
    ///
    /// A response to any earlier request for the same command will be discarded. Unknown
    /// commands stop the worker and fail with [`IpcError::UnknownCommand`].
    pub fn request(
        &mut self,
        command: impl AsRef<str>,
        params: RequestParams,
    ) -> Result<u64, IpcError> {
        let command = self.parse_command(command.as_ref())?;
        self.ensure_worker()?;
        let id = self.send_new(|id| Message::request(id, command, params))?;
        self.current_ids.insert(command, id);
        tracing::trace!(%command, id, "request sent");
        Ok(id)
    }

    /// Forget the outstanding request for `command`.
    ///
    /// Its response, and any response already waiting for `command`, is discarded. A no-op when
    /// nothing is outstanding.
    pub fn cancel_request(&mut self, command: impl AsRef<str>) -> Result<(), IpcError> {
        let command = self.parse_command(command.as_ref())?;
        if let Some(id) = self.current_ids.insert(command, 0)
            && id != 0
        {
            tracing::trace!(%command, id, "request cancelled");
        }
        self.newest_responses.remove(&command);
        Ok(())
    }

    /// Take the newest response for `command`, if one has arrived.
    ///
    /// Drains all output the worker has produced so far. Every response frees its id; only a
    /// response to the current request for its command is kept.
    pub fn get_response(&mut self, command: impl AsRef<str>) -> Result<Option<Response>, IpcError> {
        let command = self.parse_command(command.as_ref())?;
        self.check_responses()?;
        Ok(self.newest_responses.remove(&command))
    }

    /// Register `filename` with `text` and send it to the worker.
    ///
    /// A file that is already registered is left alone; use [`Self::update_file`] to change it.
    pub fn add_file(&mut self, filename: &str, text: &str) -> Result<(), IpcError> {
        self.ensure_worker()?;
        if self.files.contains_key(filename) {
            tracing::debug!(filename, "file already registered");
            return Ok(());
        }
        self.send_file(filename, line_diff("", text), false)?;
        self.files.insert(filename.to_string(), text.to_string());
        Ok(())
    }

    /// Send the changes from the last text of `filename` to `text`.
    ///
    /// Unknown files are added. Nothing is sent when the text is unchanged.
    pub fn update_file(&mut self, filename: &str, text: &str) -> Result<(), IpcError> {
        self.ensure_worker()?;
        let Some(old) = self.files.get(filename) else {
            return self.add_file(filename, text);
        };
        if old == text {
            tracing::trace!(filename, "file unchanged");
            return Ok(());
        }

        let diff = line_diff(old, text);
        self.send_file(filename, diff, false)?;
        self.files.insert(filename.to_string(), text.to_string());
        Ok(())
    }

    /// Tell the worker to drop `filename` and unregister it.
    ///
    /// Unknown files stop the worker and fail with [`IpcError::UnknownFile`].
    pub fn remove_file(&mut self, filename: &str) -> Result<(), IpcError> {
        if !self.files.contains_key(filename) {
            return Err(self.fail(IpcError::UnknownFile(filename.to_string())));
        }
        self.ensure_worker()?;
        self.send_file(filename, String::new(), true)?;
        self.files.remove(filename);
        Ok(())
    }

    /// Stop the worker. The next operation starts a new one.
    pub fn kill(&mut self) {
        self.worker.kill();
    }

    fn parse_command(&mut self, name: &str) -> Result<Command, IpcError> {
        name.parse::<Command>().map_err(|err| self.fail(err))
    }

    fn fail(&mut self, err: IpcError) -> IpcError {
        tracing::error!(%err, "invalid client call, stopping worker");
        self.worker.kill();
        err
    }

    fn allocate_id(&mut self) -> Result<u64, IpcError> {
        self.ids
            .allocate()
            .ok_or(IpcError::IdsExhausted(self.ids.id_max()))
    }

    /// Allocate an id, build the message for it and send it.
    ///
    /// A failed write may have left a partial message on the channel, so the worker is stopped;
    /// the next operation restarts it from the file registry. The id is released.
    fn send_new(&mut self, build: impl FnOnce(u64) -> Message) -> Result<u64, IpcError> {
        let id = self.allocate_id()?;
        if let Err(err) = self.worker.send(&build(id)) {
            tracing::warn!(%err, id, "write to worker failed, stopping it");
            self.ids.release(id);
            self.worker.kill();
            return Err(err.into());
        }
        Ok(id)
    }

    fn send_file(&mut self, filename: &str, diff: String, remove: bool) -> Result<(), IpcError> {
        self.send_new(|id| Message::notification(id, filename, diff, remove))?;
        Ok(())
    }

    fn ensure_worker(&mut self) -> Result<(), IpcError> {
        if self.worker.is_alive() {
            return Ok(());
        }

        tracing::warn!(files = self.files.len(), "worker not running, restarting");
        self.worker.restart()?;
        self.ids.release_all();
        self.current_ids.clear();

        let files: Vec<(String, String)> = self
            .files
            .iter()
            .map(|(name, text)| (name.clone(), text.clone()))
            .collect();
        for (name, text) in files {
            self.send_file(&name, line_diff("", &text), false)?;
        }
        Ok(())
    }

    fn check_responses(&mut self) -> Result<(), IpcError> {
        self.ensure_worker()?;
        while let Some(line) = self.worker.try_recv_line()? {
            if !line.trim().is_empty() {
                self.handle_line(&line);
            }
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) {
        let response: Response = match serde_json::from_str(line) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%err, line, "discarding malformed worker output");
                return;
            }
        };

        let id = response.id;
        if !self.ids.release(id) {
            tracing::debug!(id, "response for an id that is not in flight");
        }

        let Some(name) = response.command.as_deref() else {
            return;
        };
        let Ok(command) = name.parse::<Command>() else {
            tracing::debug!(id, command = name, "response for an unknown command");
            return;
        };

        if self.current_id(command) != Some(id) {
            tracing::debug!(%command, id, "discarding stale response");
            return;
        }
        self.current_ids.insert(command, 0);
        self.newest_responses.insert(command, response);
    }
}
