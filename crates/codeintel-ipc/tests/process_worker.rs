//! `cat` echoes every message back, which is enough to exercise the real process channel:
//! an echoed request carries its own id and command, so it is accepted as the response.
#![cfg(unix)]

use codeintel_ipc::{Command, IpcClient, IpcConfig, RequestParams, Response, WorkerChannel};
use std::thread;
use std::time::Duration;

fn wait_for_response(client: &mut IpcClient, command: Command) -> Response {
    for _ in 0..500 {
        if let Some(response) = client.get_response(command).unwrap() {
            return response;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("no {command} response from worker");
}

#[test]
fn test_echo_worker_round_trip() {
    let mut client = IpcClient::spawn(&IpcConfig::new("cat")).unwrap();
    client.add_file("greeting.txt", "hello\nworld\n").unwrap();

    let id = client
        .request(
            Command::Autocomplete,
            RequestParams::new("greeting.txt").with_current_word("wo"),
        )
        .unwrap();
    let response = wait_for_response(&mut client, Command::Autocomplete);
    assert_eq!(response.id, id);
    assert_eq!(response.command.as_deref(), Some("autocomplete"));
    assert_eq!(client.in_flight(), 0);
}

#[test]
fn test_killed_worker_is_respawned() {
    let mut client = IpcClient::spawn(&IpcConfig::new("cat")).unwrap();
    let first_pid = client.worker().pid();
    assert!(first_pid.is_some());

    client.kill();
    assert!(!client.worker_mut().is_alive());

    let id = client
        .request(Command::Highlight, RequestParams::new("x.py"))
        .unwrap();
    assert!(client.worker_mut().is_alive());
    assert_ne!(client.worker().pid(), first_pid);

    let response = wait_for_response(&mut client, Command::Highlight);
    assert_eq!(response.id, id);
    assert_eq!(response.tokens().unwrap(), Vec::new());
}
