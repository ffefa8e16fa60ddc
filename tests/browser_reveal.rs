//! Page shell behaviour in a real browser: reveal-on-scroll and the FAQ
//! accordion driven by `static/shell.js`.
//!
//! These tests build the fixture content, serve it over a local HTTP server and
//! drive headless Chrome against it.
//!
//! Run with: `cargo test --test browser_reveal -- --ignored`

use headless_chrome::protocol::cdp::Page::AddScriptToEvaluateOnNewDocument;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::io::{Read as _, Write as _};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

const PAGE: &str = "/answers/xrp-price-prediction-2026/";

// ===========================================================================
// Minimal static file server
// ===========================================================================

struct TestServer {
    port: u16,
    _stop: std::sync::mpsc::Sender<()>,
}

impl TestServer {
    fn start(root: PathBuf) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = std::sync::mpsc::channel::<()>();

        thread::spawn(move || {
            listener.set_nonblocking(true).unwrap();
            loop {
                if rx.try_recv().is_ok() {
                    break;
                }
                match listener.accept() {
                    Ok((stream, _)) => {
                        let root = root.clone();
                        thread::spawn(move || serve_request(stream, &root));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Self { port, _stop: tx }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }
}

fn serve_request(mut stream: std::net::TcpStream, root: &Path) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 4096];
    let n = match stream.read(&mut buf) {
        Ok(n) if n > 0 => n,
        _ => return,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request.split_whitespace().nth(1).unwrap_or("/");
    let mut file_path = root.join(path.trim_start_matches('/'));
    if file_path.is_dir() {
        file_path = file_path.join("index.html");
    }

    let (status, body, ct) = if file_path.is_file() {
        let body = std::fs::read(&file_path).unwrap_or_default();
        let ct = match file_path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "html" => "text/html; charset=utf-8",
            "xml" => "application/xml",
            "txt" => "text/plain",
            _ => "application/octet-stream",
        };
        ("200 OK", body, ct)
    } else {
        ("404 Not Found", b"Not Found".to_vec(), "text/plain")
    };

    let header = format!(
        "HTTP/1.1 {status}\r\n\
         Content-Type: {ct}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(&body);
}

// ===========================================================================
// Setup helpers
// ===========================================================================

fn generated_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("browser-reveal")
}

fn ensure_site_built() {
    static BUILT: OnceLock<()> = OnceLock::new();
    BUILT.get_or_init(|| {
        let bin = env!("CARGO_BIN_EXE_learn-pages");
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let status = Command::new(bin)
            .args([
                "build",
                "--no-cache",
                "--source",
                root.join("fixtures/content").to_str().unwrap(),
                "--output",
                generated_dir().to_str().unwrap(),
            ])
            .status()
            .expect("failed to run learn-pages");
        assert!(status.success(), "fixture generation failed");
    });
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn open(path: &str) -> (TestServer, std::sync::Arc<Tab>) {
    open_with(path, None)
}

/// Open `path`, running `init_script` in every new document before page scripts.
fn open_with(path: &str, init_script: Option<&str>) -> (TestServer, std::sync::Arc<Tab>) {
    ensure_site_built();
    let server = TestServer::start(generated_dir());
    let tab = browser().new_tab().unwrap();
    if let Some(source) = init_script {
        tab.call_method(AddScriptToEvaluateOnNewDocument {
            source: source.to_string(),
            world_name: None,
            include_command_line_api: None,
            run_immediately: None,
        })
        .unwrap();
    }
    tab.navigate_to(&server.url(path))
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    (server, tab)
}

fn eval_string(tab: &Tab, js: &str) -> String {
    tab.evaluate(js, true)
        .unwrap()
        .value
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn eval_u64(tab: &Tab, js: &str) -> u64 {
    tab.evaluate(js, true)
        .unwrap()
        .value
        .and_then(|v| v.as_u64())
        .unwrap_or(u64::MAX)
}

// ===========================================================================
// Reveal on scroll
// ===========================================================================

#[test]
#[ignore]
fn bootstrap_marks_document_before_paint() {
    let (_server, tab) = open(PAGE);
    let marked = eval_string(
        &tab,
        "String(document.documentElement.classList.contains('js-reveal'))",
    );
    assert_eq!(marked, "true");
}

#[test]
#[ignore]
fn sections_below_the_fold_start_hidden() {
    let (_server, tab) = open(PAGE);
    let state = eval_string(&tab, "document.getElementById('faq').getAttribute('data-reveal')");
    assert_eq!(state, "hidden");
}

#[test]
#[ignore]
fn scrolling_through_the_page_reveals_every_section_once() {
    let (_server, tab) = open(PAGE);
    let remaining = eval_u64(
        &tab,
        r#"new Promise((resolve) => {
            let y = 0;
            const step = () => {
                window.scrollTo(0, y);
                y += 200;
                if (y > document.body.scrollHeight + 800) {
                    setTimeout(() => resolve(
                        document.querySelectorAll('[data-reveal="hidden"], [data-reveal="revealing"]').length
                    ), 1500);
                } else {
                    setTimeout(step, 50);
                }
            };
            step();
        })"#,
    );
    assert_eq!(remaining, 0);

    // Scrolling back up does not hide anything again.
    let rehidden = eval_u64(
        &tab,
        r#"new Promise((resolve) => {
            window.scrollTo(0, 0);
            setTimeout(() => resolve(document.querySelectorAll('[data-reveal="hidden"]').length), 300);
        })"#,
    );
    assert_eq!(rehidden, 0);
}

#[test]
#[ignore]
fn without_intersection_observer_everything_is_revealed_at_once() {
    let (_server, tab) = open_with(PAGE, Some("delete window.IntersectionObserver;"));
    let supported = eval_string(&tab, "String('IntersectionObserver' in window)");
    assert_eq!(supported, "false");

    let marked = eval_string(
        &tab,
        "String(document.documentElement.classList.contains('js-reveal'))",
    );
    assert_eq!(marked, "false");

    let hidden = eval_u64(
        &tab,
        r#"document.querySelectorAll('[data-reveal="hidden"], [data-reveal="revealing"]').length"#,
    );
    assert_eq!(hidden, 0);
    let state = eval_string(&tab, "document.getElementById('faq').getAttribute('data-reveal')");
    assert_eq!(state, "revealed");
}

// ===========================================================================
// FAQ accordion
// ===========================================================================

#[test]
#[ignore]
fn accordion_toggles_one_panel() {
    let (_server, tab) = open(PAGE);
    let state = eval_string(
        &tab,
        r#"(() => {
            document.getElementById('faq-0-button').click();
            const first = document.getElementById('faq-0-panel').hidden;
            const second = document.getElementById('faq-1-panel').hidden;
            const expanded = document.getElementById('faq-0-button').getAttribute('aria-expanded');
            return [first, second, expanded].join(',');
        })()"#,
    );
    assert_eq!(state, "false,true,true");

    let closed = eval_string(
        &tab,
        r#"(() => {
            document.getElementById('faq-0-button').click();
            return String(document.getElementById('faq-0-panel').hidden);
        })()"#,
    );
    assert_eq!(closed, "true");
}
