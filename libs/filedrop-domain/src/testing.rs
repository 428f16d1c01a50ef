//! In-memory adapters used by the domain tests

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::Semaphore;

use crate::ingestion::{CommandResult, FileId, ProcessingError, StorageError, StoredFile};
use crate::ports::{ProcessingAction, StorageWriter};

#[derive(Default)]
pub struct InMemoryStorage {
    uploads: Mutex<HashMap<String, Vec<u8>>>,
    outputs: Mutex<HashSet<String>>,
    fail_stores: AtomicBool,
    fail_outputs: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_stores(&self) {
        self.fail_stores.store(true, Ordering::SeqCst);
    }

    pub fn fail_outputs(&self) {
        self.fail_outputs.store(true, Ordering::SeqCst);
    }

    pub fn upload(&self, name: &str) -> Option<Vec<u8>> {
        self.uploads.lock().unwrap().get(name).cloned()
    }

    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.lock().unwrap().contains(name)
    }
}

impl StorageWriter for InMemoryStorage {
    fn store<R>(
        &self,
        file_id: &FileId,
        mut reader: R,
    ) -> impl Future<Output = Result<StoredFile, StorageError>> + Send
    where
        R: AsyncRead + Unpin + Send,
    {
        let file_id = file_id.clone();
        let path = PathBuf::from("uploads").join(file_id.as_str());
        let fail = self.fail_stores.load(Ordering::SeqCst);

        async move {
            if fail {
                return Err(StorageError::Create {
                    path,
                    source: io::Error::from(io::ErrorKind::PermissionDenied),
                });
            }

            let mut data = Vec::new();
            reader
                .read_to_end(&mut data)
                .await
                .map_err(|source| StorageError::Copy {
                    path: path.clone(),
                    source,
                })?;

            let size_bytes = data.len() as u64;
            self.uploads
                .lock()
                .unwrap()
                .insert(file_id.to_string(), data);

            Ok(StoredFile {
                file_id,
                path,
                size_bytes,
                mime_type: "application/octet-stream".to_string(),
            })
        }
    }

    fn prepare_output(
        &self,
        stored: &StoredFile,
    ) -> impl Future<Output = Result<PathBuf, StorageError>> + Send {
        let name = stored.file_id.to_string();
        let path = PathBuf::from("processed").join(&name);

        async move {
            if self.fail_outputs.load(Ordering::SeqCst) {
                return Err(StorageError::OutputCreate {
                    path,
                    source: io::Error::from(io::ErrorKind::PermissionDenied),
                });
            }
            self.outputs.lock().unwrap().insert(name);
            Ok(path)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Succeed,
    Fail,
    Missing,
}

/// Scripted processing action
///
/// A gated action blocks every invocation until [`release`](Self::release)
/// hands out a permit.
#[derive(Clone)]
pub struct FakeAction {
    mode: Mode,
    invocations: Arc<Mutex<Vec<String>>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeAction {
    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            invocations: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    pub fn succeeding() -> Self {
        Self::with_mode(Mode::Succeed)
    }

    pub fn failing() -> Self {
        Self::with_mode(Mode::Fail)
    }

    pub fn unconfigured() -> Self {
        Self::with_mode(Mode::Missing)
    }

    pub fn gated(self) -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..self
        }
    }

    pub fn release(&self, runs: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(runs);
        }
    }

    pub fn invocations(&self) -> Vec<String> {
        self.invocations.lock().unwrap().clone()
    }
}

impl ProcessingAction for FakeAction {
    fn invoke(
        &self,
        file_id: &FileId,
    ) -> impl Future<Output = Result<CommandResult, ProcessingError>> + Send {
        let name = file_id.to_string();
        let mode = self.mode;
        let invocations = Arc::clone(&self.invocations);
        let gate = self.gate.clone();

        async move {
            if let Some(gate) = gate {
                gate.acquire().await.unwrap().forget();
            }
            invocations.lock().unwrap().push(name.clone());

            match mode {
                Mode::Succeed => Ok(CommandResult {
                    program: "fake".to_string(),
                    exit_code: Some(0),
                    output: format!("Processing completed for {}\n", name),
                }),
                Mode::Fail => Err(ProcessingError::NonZeroExit {
                    program: "fake".to_string(),
                    code: Some(1),
                    output: "failed".to_string(),
                }),
                Mode::Missing => Err(ProcessingError::MissingExecutable {
                    variable: "APP_DEMO".to_string(),
                }),
            }
        }
    }
}
