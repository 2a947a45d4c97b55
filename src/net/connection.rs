use super::message::{HEADER_SIZE, MAGIC_PING};
use crate::error::{Error, Result};
use byteorder::{BigEndian, ReadBytesExt};
use slog::Logger;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// The contract a `Connection` needs from whatever owns it: a place to
/// hand reassembled frames, and a way to surface transport failures.
/// Implemented by the peer state machine.
pub trait FrameSink: Send + Sync {
    fn receive_incoming_commands(&self, payload: Vec<u8>);
    fn on_transport_error(&self, err: &Error);
}

const POLL_TIMEOUT: Duration = Duration::from_millis(200);

/// Owns one TCP socket and one dedicated receive thread. The receive loop
/// runs until `stop()` marks the connection obsolete, which is also the
/// policy on any unrecoverable socket error.
pub struct Connection {
    write_stream: Mutex<TcpStream>,
    obsolete: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Connection {
    pub fn start<A: std::net::ToSocketAddrs>(
        addr: A,
        sink: Arc<dyn FrameSink>,
        logger: Logger,
    ) -> Result<Connection> {
        let stream = TcpStream::connect(addr).map_err(Error::Transport)?;
        let read_stream = stream.try_clone().map_err(Error::Transport)?;
        read_stream
            .set_read_timeout(Some(POLL_TIMEOUT))
            .map_err(Error::Transport)?;

        let obsolete = Arc::new(AtomicBool::new(false));
        let loop_obsolete = obsolete.clone();

        let handle = thread::spawn(move || {
            receive_loop(read_stream, sink, loop_obsolete, logger);
        });

        Ok(Connection {
            write_stream: Mutex::new(stream),
            obsolete,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        !self.obsolete.load(Ordering::SeqCst)
    }

    /// Blocking write. Drops the datum silently (after a debug log is the
    /// caller's responsibility) if the connection is already obsolete.
    pub fn send(&self, bytes: &[u8]) -> Result<()> {
        if !self.is_running() {
            return Ok(());
        }

        let mut guard = self.write_stream.lock().expect("write_stream mutex poisoned");
        match guard.write_all(bytes) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.obsolete.store(true, Ordering::SeqCst);
                Err(Error::Transport(e))
            }
        }
    }

    /// Idempotent: marks the connection obsolete, closes the socket to
    /// unblock the pending read, and joins the receive thread.
    pub fn stop(&mut self) {
        self.obsolete.store(true, Ordering::SeqCst);

        if let Ok(guard) = self.write_stream.lock() {
            let _ = guard.shutdown(Shutdown::Both);
        }

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn receive_loop(mut stream: TcpStream, sink: Arc<dyn FrameSink>, obsolete: Arc<AtomicBool>, logger: Logger) {
    let mut header = [0u8; HEADER_SIZE];

    while !obsolete.load(Ordering::SeqCst) {
        match stream.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if is_idle_timeout(&e) => continue,
            Err(e) => {
                // A host-requested stop() already set `obsolete` before
                // shutting down the socket, which is exactly what unblocks
                // this read. That teardown isn't a transport failure, so
                // stay silent when we're the ones who caused it.
                if !obsolete.swap(true, Ordering::SeqCst) {
                    slog::error!(logger, "receive loop terminated"; "error" => %e);
                    sink.on_transport_error(&Error::Transport(e));
                }
                break;
            }
        }

        if header[0] == MAGIC_PING {
            sink.receive_incoming_commands(header.to_vec());
            continue;
        }

        let total_len = BigEndian::read_u32(&header[1..5]) as usize;
        if total_len < HEADER_SIZE {
            slog::warn!(logger, "frame length smaller than header"; "total_len" => total_len);
            continue;
        }

        let trailing_len = total_len - HEADER_SIZE;
        let mut trailing = vec![0u8; trailing_len];

        match stream.read_exact(&mut trailing) {
            Ok(()) => {}
            Err(e) => {
                if !obsolete.swap(true, Ordering::SeqCst) {
                    slog::error!(logger, "receive loop terminated reading payload"; "error" => %e);
                    sink.on_transport_error(&Error::Transport(e));
                }
                break;
            }
        }

        let mut payload = Vec::with_capacity(2 + trailing.len());
        payload.push(header[7]);
        payload.push(header[8]);
        payload.extend_from_slice(&trailing);

        sink.receive_incoming_commands(payload);
    }
}

fn is_idle_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging;
    use std::net::TcpListener;
    use std::sync::Mutex as StdMutex;

    struct RecordingSink {
        payloads: StdMutex<Vec<Vec<u8>>>,
        transport_errors: StdMutex<u32>,
    }

    impl RecordingSink {
        fn new() -> RecordingSink {
            RecordingSink { payloads: StdMutex::new(Vec::new()), transport_errors: StdMutex::new(0) }
        }
    }

    impl FrameSink for RecordingSink {
        fn receive_incoming_commands(&self, payload: Vec<u8>) {
            self.payloads.lock().unwrap().push(payload);
        }

        fn on_transport_error(&self, _err: &Error) {
            *self.transport_errors.lock().unwrap() += 1;
        }
    }

    #[test]
    fn receives_a_ping_frame_whole() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            socket.write_all(&[0xF0, 0, 0, 0, 1, 0, 0, 0, 2]).unwrap();
            thread::sleep(Duration::from_millis(300));
        });

        let sink = Arc::new(RecordingSink::new());
        let mut conn = Connection::start(addr, sink.clone(), logging::root_logger()).unwrap();

        thread::sleep(Duration::from_millis(300));
        conn.stop();
        server.join().unwrap();

        let payloads = sink.payloads.lock().unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0], vec![0xF0, 0, 0, 0, 1, 0, 0, 0, 2]);
    }

    #[test]
    fn reassembles_an_operation_frame() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            // header: magic 0xFB, total_len = 16, chan 0, reliable 0, 0xF3, 0x02
            let header = [0xFBu8, 0, 0, 0, 16, 0, 0, 0xF3, 0x02];
            socket.write_all(&header).unwrap();
            socket.write_all(&[1, 2, 3, 4, 5, 6, 7]).unwrap();
            thread::sleep(Duration::from_millis(300));
        });

        let sink = Arc::new(RecordingSink::new());
        let mut conn = Connection::start(addr, sink.clone(), logging::root_logger()).unwrap();

        thread::sleep(Duration::from_millis(300));
        conn.stop();
        server.join().unwrap();

        let payloads = sink.payloads.lock().unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0], vec![0xF3, 0x02, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn stop_unblocks_the_read_without_reporting_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (socket, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_millis(300));
            drop(socket);
        });

        let sink = Arc::new(RecordingSink::new());
        let mut conn = Connection::start(addr, sink.clone(), logging::root_logger()).unwrap();

        thread::sleep(Duration::from_millis(50));
        conn.stop();
        server.join().unwrap();

        assert_eq!(*sink.transport_errors.lock().unwrap(), 0);
    }
}
