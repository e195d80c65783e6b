use crate::harness::{CapturedEvent, init_test_tracing};
use logscout_core::conf::ScoutConfig;
use logscout_core::ctx::ScoutContext;
use logscout_core::engine::LocalityResolver;
use logscout_core::server::build_pingora_server;
use reqwest::blocking::{Client, RequestBuilder};
use std::net::TcpStream;
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

/// Handle to a running logscout test server.
pub struct TestServer {
    base_url: String,
    client: Client,
}

impl TestServer {
    /// Start a logscout instance that identifies itself as `identity`.
    ///
    /// The listen port is allocated dynamically, so servers can run in parallel.
    pub fn start(identity: &str) -> Self {
        // Initialize tracing (this must happen first).
        init_test_tracing(events());

        let listen_port = free_port();

        let mut cfg = ScoutConfig::default();
        cfg.server.listen = format!("127.0.0.1:{listen_port}");
        cfg.server.threads = Some(2);
        cfg.locality.hostname = Some(identity.to_string());
        cfg.validate().expect("invalid test config");

        let ctx = ScoutContext::with_locality(
            cfg,
            LocalityResolver::new(Some(identity.to_string())),
        )
        .expect("failed to build context");

        let server = build_pingora_server(&ctx).expect("failed to build logscout server");

        // Run server in background thread
        thread::spawn(move || {
            server.run_forever();
        });

        let base_url = format!("http://127.0.0.1:{listen_port}");
        wait_for_server(&base_url);

        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("failed to build client");

        Self { base_url, client }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    /// POST `body` as JSON to `/lv/<endpoint>`.
    pub fn post(&self, endpoint: &str, body: &serde_json::Value) -> RequestBuilder {
        self.client
            .post(format!("{}/lv/{}", self.base_url, endpoint))
            .json(body)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Poll until the server accepts connections (or panic).
fn wait_for_server(listen_addr: &str) {
    let addr = listen_addr.strip_prefix("http://").unwrap_or(listen_addr);

    let deadline = Instant::now() + Duration::from_secs(5);

    loop {
        match TcpStream::connect(addr) {
            Ok(_) => return,
            Err(_) => {
                if Instant::now() > deadline {
                    panic!("server failed to start at {}", listen_addr);
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

static EVENTS: OnceLock<Arc<Mutex<Vec<CapturedEvent>>>> = OnceLock::new();

pub fn events() -> Arc<Mutex<Vec<CapturedEvent>>> {
    EVENTS
        .get_or_init(|| Arc::new(Mutex::new(Vec::new())))
        .clone()
}

/// Allocate a free port on localhost.
fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
