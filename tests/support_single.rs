use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Suffix the harness appends to steer a request at the invalid path.
pub const INVALID_SUFFIX: &str = "-invalid";

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server for tests.
///
/// Paths ending in `-invalid` get a 404 with a JSON `message`; everything
/// else gets a 200.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    thread::spawn(move || handle_client(stream));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

/// Like [`spawn_http_server`], but returns `None` when the sandbox forbids
/// binding a local port.
///
/// # Errors
///
/// Returns an error if the listener binds but cannot be configured.
pub fn spawn_http_server_or_skip() -> Result<Option<(String, ServerHandle)>, String> {
    if TcpListener::bind("127.0.0.1:0").is_err() {
        return Ok(None);
    }
    spawn_http_server().map(Some)
}

fn handle_client(mut stream: TcpStream) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let Some(path) = read_request_path(&mut stream) else {
        return;
    };
    let response: &[u8] = if path.ends_with(INVALID_SUFFIX) {
        b"HTTP/1.1 404 Not Found\r\nContent-Type: application/json\r\nContent-Length: 27\r\nConnection: close\r\n\r\n{\"message\":\"No such route\"}"
    } else {
        b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK"
    };
    if stream.write_all(response).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Reads the request head and any declared body; returns the request path.
fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buffer = [0u8; 1024];
    let head_end = loop {
        let read = stream.read(&mut buffer).ok()?;
        if read == 0 {
            return None;
        }
        data.extend_from_slice(buffer.get(..read)?);
        if let Some(pos) = data.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos.checked_add(4)?;
        }
    };

    let head = String::from_utf8_lossy(data.get(..head_end)?).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    let mut body_read = data.len().saturating_sub(head_end);
    while body_read < content_length {
        let read = stream.read(&mut buffer).ok()?;
        if read == 0 {
            break;
        }
        body_read = body_read.saturating_add(read);
    }

    head.lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .map(str::to_owned)
}

/// Run the `massrun` binary and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_massrun<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = massrun_bin()?;
    Command::new(bin)
        .args(args)
        .env("MASSRUN_LOG", "error")
        .env_remove("MASSRUN_API_BASE")
        .output()
        .map_err(|err| format!("run massrun failed: {}", err))
}

fn massrun_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_massrun").map_or_else(
        || Err("CARGO_BIN_EXE_massrun missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
