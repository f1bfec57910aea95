use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests.
        // The memory backend makes the suite hermetic: no database needed.
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_task-api-rust"));
        cmd.env("PORT", port.to_string())
            .env("STORE_BACKEND", "memory")
            .env("JWT_SECRET", "integration-test-secret")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Register a fresh account and return its bearer token plus user id.
pub async fn register_account(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
) -> Result<(String, String)> {
    let email = format!("{}-{}@example.com", name, uuid::Uuid::new_v4().simple());
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&json!({
            "name": name,
            "email": email,
            "password": "hunter2hunter2",
        }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration failed: {}",
        res.status()
    );

    let body = res.json::<Value>().await?;
    let token = body["data"]["token"]
        .as_str()
        .context("missing token in registration response")?
        .to_string();
    let user_id = body["data"]["user"]["id"]
        .as_str()
        .context("missing user id in registration response")?
        .to_string();

    Ok((token, user_id))
}
