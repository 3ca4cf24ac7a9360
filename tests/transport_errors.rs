use gini_rs::{Client, ClientConfig, ErrorKind, FetchOutcome};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread;
use std::time::Duration;

fn client_for(addr: SocketAddr) -> Client {
    Client::new(ClientConfig {
        base_url: format!("http://{}/v2/en/country", addr),
        timeout: Duration::from_secs(1),
        ..ClientConfig::default()
    })
    .unwrap()
}

fn failure_kind(outcome: FetchOutcome) -> ErrorKind {
    match outcome {
        FetchOutcome::Failure(e) => e.kind,
        other => panic!("expected a failure, got {:?}", other),
    }
}

/// Accept one connection, optionally write `reply`, then hold the socket open.
fn stalling_server(reply: Option<&'static [u8]>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            if let Some(reply) = reply {
                let _ = stream.write_all(reply);
                let _ = stream.flush();
            }
            thread::sleep(Duration::from_secs(5));
        }
    });
    addr
}

#[test]
fn closed_port_is_a_connection_failure() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = client_for(addr);
    assert_eq!(failure_kind(client.lookup("ARG")), ErrorKind::Connection);
}

#[test]
fn silent_server_is_a_timeout() {
    let addr = stalling_server(None);
    let client = client_for(addr);
    assert_eq!(failure_kind(client.lookup("ARG")), ErrorKind::Timeout);
}

#[test]
fn body_stalling_after_headers_is_a_timeout() {
    let addr = stalling_server(Some(
        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n[",
    ));
    let client = client_for(addr);
    assert_eq!(failure_kind(client.lookup("ARG")), ErrorKind::Timeout);
}
