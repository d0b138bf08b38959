use std::net::TcpListener;

use assert_cmd::Command;
use predicates::prelude::*;

fn tally(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[test]
fn help_lists_subcommands() {
    let home = tempfile::tempdir().unwrap();
    tally(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn report_against_unreachable_backend_fails() {
    let home = tempfile::tempdir().unwrap();
    tally(home.path())
        .args(["report", "--base-url", &closed_port_url()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error fetching data:"));
}

#[test]
fn report_json_on_failure_prints_failed_state() {
    let home = tempfile::tempdir().unwrap();
    tally(home.path())
        .args(["report", "--json", "--base-url", &closed_port_url()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"status\": \"failed\""));
}

#[test]
fn invalid_base_url_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    tally(home.path())
        .args(["report", "--base-url", "localhost:3001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Settings error"));
}

#[test]
fn config_set_then_show() {
    let home = tempfile::tempdir().unwrap();
    tally(home.path())
        .args(["config", "set", "--base-url", "http://api.test:4000/", "--timeout-secs", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved settings"));

    assert!(home.path().join(".config/tally/settings.json").exists());

    tally(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://api.test:4000"))
        .stdout(predicate::str::contains("4"));
}

#[test]
fn config_show_defaults() {
    let home = tempfile::tempdir().unwrap();
    tally(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:3001"));
}

#[test]
fn completions_for_bash() {
    let home = tempfile::tempdir().unwrap();
    tally(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tally"));
}

/// Serve `/customers` and `/transactions` once each.
fn fixture_backend() -> String {
    use std::io::{BufRead, BufReader, Write};

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        for stream in listener.incoming().take(2) {
            let mut stream = stream.unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let body = if request_line.contains("/customers") {
                r#"[{"id":1,"name":"Ahmed Ali"},{"id":2,"name":"Aya Elsayed"},{"id":3,"name":"Mina Adel"}]"#
            } else {
                r#"[{"id":1,"customer_id":1,"date":"2022-01-01","amount":1000},
                    {"id":2,"customer_id":1,"date":"2022-01-02","amount":2000},
                    {"id":3,"customer_id":2,"date":"2022-01-01","amount":550},
                    {"id":4,"customer_id":3,"date":"2022-01-02","amount":1250}]"#
            };
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        }
    });
    format!("http://{addr}")
}

#[test]
fn report_prints_filtered_customers_and_daily_totals() {
    let home = tempfile::tempdir().unwrap();
    tally(home.path())
        .args(["report", "--min-amount", "1200", "--base-url", &fixture_backend()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ahmed Ali"))
        .stdout(predicate::str::contains("Mina Adel"))
        .stdout(predicate::str::contains("Aya Elsayed").not())
        .stdout(predicate::str::contains("$3,250.00"))
        .stdout(predicate::str::contains("2 customers, 3 transactions, total $4,250.00"));
}

#[test]
fn report_accepts_negative_min_amount() {
    let home = tempfile::tempdir().unwrap();
    let output = tally(home.path())
        .args(["report", "--min-amount", "-5", "--json", "--base-url", &fixture_backend()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let state: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(state["min_amount"], -5.0);
    assert_eq!(state["filtered"].as_array().unwrap().len(), 3);
}
