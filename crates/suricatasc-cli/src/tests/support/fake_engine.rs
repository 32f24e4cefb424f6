//! Minimal engine listening on a unix socket in a temporary directory.
//!
//! It accepts a single client, acknowledges the version handshake, and then
//! answers each command from a fixed reply table until the client hangs up.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use tempfile::TempDir;

pub(crate) struct FakeEngine {
    _dir: TempDir,
    socket: Utf8PathBuf,
    requests: Arc<Mutex<Vec<Value>>>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl FakeEngine {
    /// Starts an engine that knows `replies`; other commands are rejected.
    pub(crate) fn start(replies: HashMap<String, Value>) -> Result<Self> {
        let dir = TempDir::new().context("create engine directory")?;
        let socket = Utf8PathBuf::from_path_buf(dir.path().join("suricata-command.socket"))
            .map_err(|path| anyhow!("non utf-8 socket path {}", path.display()))?;
        let listener = UnixListener::bind(socket.as_std_path()).context("bind engine socket")?;
        listener
            .set_nonblocking(true)
            .context("engine listener nonblocking")?;

        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            let stream = accept_with_deadline(&listener)?;
            serve(stream, &replies, &recorded)
        });
        Ok(Self {
            _dir: dir,
            socket,
            requests,
            handle: Some(handle),
        })
    }

    pub(crate) fn socket(&self) -> &Utf8Path {
        &self.socket
    }

    /// Waits for the client to hang up and returns the command requests.
    pub(crate) fn finish(&mut self) -> Result<Vec<Value>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake engine thread panicked"))??;
        }
        let requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(requests.clone())
    }
}

fn accept_with_deadline(listener: &UnixListener) -> Result<UnixStream> {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        match listener.accept() {
            Ok((stream, _)) => {
                stream
                    .set_nonblocking(false)
                    .context("engine stream blocking")?;
                return Ok(stream);
            }
            Err(ref error)
                if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
            {
                thread::sleep(Duration::from_millis(10));
            }
            Err(error) => return Err(error).context("accept client"),
        }
    }
}

fn serve(
    stream: UnixStream,
    replies: &HashMap<String, Value>,
    requests: &Arc<Mutex<Vec<Value>>>,
) -> Result<()> {
    let mut writer = stream.try_clone().context("clone engine stream")?;
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    let mut negotiated = false;
    loop {
        line.clear();
        let read = match reader.read_line(&mut line) {
            Ok(read) => read,
            Err(error) if error.kind() == io::ErrorKind::ConnectionReset => 0,
            Err(error) => return Err(error).context("read request"),
        };
        if read == 0 {
            return Ok(());
        }
        let request: Value = serde_json::from_str(line.trim_end()).context("parse request")?;
        let reply = if negotiated {
            let command = request
                .get("command")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request);
            match replies.get(&command) {
                Some(message) => json!({"return": "OK", "message": message}),
                None => json!({"return": "NOK", "message": "Unknown command"}),
            }
        } else {
            negotiated = true;
            json!({"return": "OK"})
        };
        writeln!(writer, "{reply}").context("write reply")?;
        writer.flush().context("flush reply")?;
    }
}
