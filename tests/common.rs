#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use schooldesk::context::AppContext;
use schooldesk::db::migrate::run_pending_migrations;
use schooldesk::db::pool::DbPool;
use schooldesk::db::queries::students;
use schooldesk::models::student::Student;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

/// Isolated home and data directory for CLI runs.
pub struct Sandbox {
    pub home: TempDir,
    pub data: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("home dir"),
            data: tempfile::tempdir().expect("data dir"),
        }
    }

    /// `schooldesk --data-dir <data> --yes ...`, with the config file kept
    /// inside the sandbox.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("schooldesk");
        cmd.env("HOME", self.home.path())
            .env("APPDATA", self.home.path())
            .env_remove("SCHOOLDESK_PASSWORD")
            .arg("--data-dir")
            .arg(self.data.path())
            .arg("--yes");
        cmd
    }

    pub fn init(&self) {
        self.cmd().arg("init").assert().success();
    }
}

/// Fresh data directory with the schema in place.
pub fn fresh_ctx() -> (TempDir, AppContext) {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = AppContext::in_dir(dir.path());
    ctx.ensure_layout().expect("layout");

    let pool = DbPool::open(&ctx).expect("open db");
    run_pending_migrations(&pool.conn).expect("migrations");
    pool.close().expect("close db");

    (dir, ctx)
}

pub fn add_student(pool: &DbPool, name: &str, surname: &str) -> i64 {
    students::insert(&pool.conn, &Student::new(name, surname)).expect("insert student")
}

/// One HTTP request as seen by [`DavStub`].
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

/// Minimal HTTP/1.1 responder on a random local port. Every request is
/// recorded and answered with an empty body and the status `reply` picks
/// for its method.
pub struct DavStub {
    pub url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl DavStub {
    pub fn start(reply: fn(&str) -> u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let url = format!("http://{}", listener.local_addr().expect("local addr"));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&seen);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let log = Arc::clone(&log);
                thread::spawn(move || serve_connection(stream, reply, &log));
            }
        });

        Self { url, seen }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().expect("request log").clone()
    }
}

fn serve_connection(stream: TcpStream, reply: fn(&str) -> u16, log: &Mutex<Vec<SeenRequest>>) {
    let mut writer = stream.try_clone().expect("clone stream");
    let mut reader = BufReader::new(stream);

    loop {
        let mut request_line = String::new();
        if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
            return;
        }
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();

        let mut authorization = None;
        let mut length = 0usize;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap_or(0) == 0 {
                return;
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                match name.trim().to_ascii_lowercase().as_str() {
                    "authorization" => authorization = Some(value.trim().to_string()),
                    "content-length" => length = value.trim().parse().unwrap_or(0),
                    _ => {}
                }
            }
        }

        let mut body = vec![0; length];
        if reader.read_exact(&mut body).is_err() {
            return;
        }

        let status = reply(&method);
        log.lock().expect("request log").push(SeenRequest {
            method,
            path,
            authorization,
            body,
        });

        let response = format!("HTTP/1.1 {status} Stub\r\nContent-Length: 0\r\n\r\n");
        if writer.write_all(response.as_bytes()).is_err() {
            return;
        }
    }
}
