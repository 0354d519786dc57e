//! Suite harness: server lifecycle, per-case seeding and teardown, HTTP helpers.
//!
//! A [`Suite`] owns every long-lived handle. Scenarios receive a cloned
//! [`TestContext`] and run one at a time; each one is preceded by seeding and
//! followed by a full store drop, whatever its outcome.

#![allow(dead_code)]

use std::any::Any;
use std::future::Future;
use std::net::TcpListener;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use anyhow::Context;
use futures::FutureExt;
use reqwest::Response;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use blog_api::state::AppState;
use blog_core::domain::{BlogPost, PostId};
use blog_core::ports::PostRepository;
use blog_infra::InMemoryPostRepository;
use blog_infra::seed::seed_many;
use blog_shared::dto::CreatePostRequest;

/// Posts inserted before every case.
pub const SEED_COUNT: usize = 10;

const CASE_TIMEOUT: Duration = Duration::from_secs(30);
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Test logging, filtered by `TEST_LOG`, then `RUST_LOG`, then `warn`.
pub fn init_logging() {
    let filter = std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .without_time()
        .try_init()
        .ok();
}

/// What a scenario works with: the server's base URL, an HTTP client, and the store itself.
#[derive(Clone)]
pub struct TestContext {
    pub address: String,
    pub client: reqwest::Client,
    pub store: Arc<dyn PostRepository>,
}

impl TestContext {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn list_posts(&self) -> reqwest::Result<Response> {
        self.client.get(self.url("/posts")).send().await
    }

    pub async fn get_post(&self, id: &str) -> reqwest::Result<Response> {
        self.client
            .get(self.url(&format!("/posts/{id}")))
            .send()
            .await
    }

    pub async fn create_post(&self, body: &CreatePostRequest) -> reqwest::Result<Response> {
        self.client.post(self.url("/posts")).json(body).send().await
    }

    pub async fn update_post<B: Serialize + ?Sized>(
        &self,
        id: &str,
        body: &B,
    ) -> reqwest::Result<Response> {
        self.client
            .put(self.url(&format!("/posts/{id}")))
            .json(body)
            .send()
            .await
    }

    pub async fn delete_post(&self, id: &str) -> reqwest::Result<Response> {
        self.client
            .delete(self.url(&format!("/posts/{id}")))
            .send()
            .await
    }

    /// Look a post up in the store by the id string the API handed out.
    pub async fn stored_post(&self, id: &str) -> anyhow::Result<Option<BlogPost>> {
        let id: PostId = id
            .parse()
            .with_context(|| format!("API returned an id the store cannot parse: {id}"))?;
        Ok(self.store.find_by_id(id).await?)
    }

    /// Any post currently in the store.
    pub async fn any_stored_post(&self) -> anyhow::Result<BlogPost> {
        self.store
            .find_one()
            .await?
            .context("store is empty; case setup should have seeded it")
    }

    pub async fn stored_count(&self) -> anyhow::Result<u64> {
        Ok(self.store.count().await?)
    }
}

struct CaseFailure {
    name: String,
    reason: String,
}

/// A started server plus the bookkeeping for the cases run against it.
pub struct Suite {
    ctx: TestContext,
    server: ServerHandle,
    server_task: JoinHandle<std::io::Result<()>>,
    case_timeout: Duration,
    passed: usize,
    failures: Vec<CaseFailure>,
}

impl Suite {
    /// Suite setup: open the store and start the server on an ephemeral port.
    pub async fn start() -> anyhow::Result<Self> {
        let store = open_store().await.context("failed to open the test store")?;
        Self::start_with(store).await
    }

    /// Suite setup over a store the caller already holds.
    pub async fn start_with(store: Arc<dyn PostRepository>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").context("failed to bind test server")?;
        let addr = listener.local_addr()?;
        let server = blog_api::server::run(listener, AppState::new(store.clone()))?;
        let handle = server.handle();
        let server_task = tokio::spawn(server);

        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

        tracing::info!(%addr, "Test server started");
        Ok(Self {
            ctx: TestContext {
                address: format!("http://{addr}"),
                client,
                store,
            },
            server: handle,
            server_task,
            case_timeout: CASE_TIMEOUT,
            passed: 0,
            failures: Vec::new(),
        })
    }

    /// Bound each case by `timeout` instead of the default.
    pub fn with_case_timeout(mut self, timeout: Duration) -> Self {
        self.case_timeout = timeout;
        self
    }

    /// Run one scenario between case setup (seeding) and case teardown (drop all).
    ///
    /// Failures are recorded rather than propagated so later cases still run.
    pub async fn case<F, Fut>(&mut self, name: &str, scenario: F)
    where
        F: FnOnce(TestContext) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        tracing::info!(case = name, "Running case");

        let outcome = match seed_many(self.ctx.store.as_ref(), SEED_COUNT).await {
            Ok(_) => run_guarded(self.case_timeout, scenario(self.ctx.clone())).await,
            Err(e) => Err(format!("case setup failed: {e}")),
        };

        let teardown = self.ctx.store.drop_all().await;

        let outcome = match (outcome, teardown) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(reason), Ok(())) => Err(reason),
            (Ok(()), Err(e)) => Err(format!("case teardown failed: {e}")),
            (Err(reason), Err(e)) => Err(format!("{reason}; case teardown failed: {e}")),
        };

        match outcome {
            Ok(()) => self.passed += 1,
            Err(reason) => {
                tracing::error!(case = name, %reason, "Case failed");
                self.failures.push(CaseFailure {
                    name: name.to_string(),
                    reason,
                });
            }
        }
    }

    /// Suite teardown: stop the server, then report every failed case.
    pub async fn finish(self) -> anyhow::Result<()> {
        self.server.stop(true).await;
        let shutdown = self.server_task.await;

        if !self.failures.is_empty() {
            let report = self
                .failures
                .iter()
                .map(|f| format!("  - {}: {}", f.name, f.reason))
                .collect::<Vec<_>>()
                .join("\n");
            anyhow::bail!(
                "{} of {} case(s) failed:\n{report}",
                self.failures.len(),
                self.failures.len() + self.passed
            );
        }

        shutdown
            .context("server task panicked")?
            .context("server exited with an error")?;
        Ok(())
    }
}

async fn run_guarded<Fut>(limit: Duration, scenario: Fut) -> Result<(), String>
where
    Fut: Future<Output = anyhow::Result<()>>,
{
    match tokio::time::timeout(limit, AssertUnwindSafe(scenario).catch_unwind()).await {
        Err(_) => Err(format!("timed out after {limit:?}")),
        Ok(Err(panic)) => Err(panic_message(panic)),
        Ok(Ok(Err(e))) => Err(format!("{e:#}")),
        Ok(Ok(Ok(()))) => Ok(()),
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else {
        "scenario panicked".to_string()
    }
}

/// PostgreSQL when `TEST_DATABASE_URL` is set, otherwise an in-process store.
async fn open_store() -> anyhow::Result<Arc<dyn PostRepository>> {
    match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => open_database_store(url).await,
        Err(_) => Ok(Arc::new(InMemoryPostRepository::new())),
    }
}

#[cfg(feature = "postgres")]
async fn open_database_store(url: String) -> anyhow::Result<Arc<dyn PostRepository>> {
    use blog_infra::{DatabaseConfig, PostgresPostRepository};
    use blog_migration::{Migrator, MigratorTrait};

    let conn = blog_infra::connect(&DatabaseConfig::new(url)).await?;
    Migrator::up(&conn, None).await?;

    // Leftovers from an aborted run would skew every count.
    let store = PostgresPostRepository::new(conn);
    store.drop_all().await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn open_database_store(_url: String) -> anyhow::Result<Arc<dyn PostRepository>> {
    anyhow::bail!("TEST_DATABASE_URL is set but the postgres feature is disabled")
}
