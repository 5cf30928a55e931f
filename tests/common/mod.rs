//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use inventory_api::items::{Item, ItemChanges, ItemId, ValidItem};
use inventory_api::store::{ItemStore, MemoryStore};
use inventory_api::{Error, HttpServer, InventoryConfig, Result, Shutdown};
use tokio::net::TcpListener;

/// A running server on a loopback port. Shuts down when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the server over `store`, serving the repository's `public/` dir.
pub async fn spawn_server(store: Arc<dyn ItemStore>) -> TestServer {
    spawn_configured(store, |_| {}).await
}

/// Like [`spawn_server`], with a chance to adjust the config first.
pub async fn spawn_configured<F>(store: Arc<dyn ItemStore>, configure: F) -> TestServer
where
    F: FnOnce(&mut InventoryConfig),
{
    let mut config = InventoryConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.static_files.dir = concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string();
    configure(&mut config);

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap();

    TestServer {
        addr,
        client,
        shutdown,
    }
}

pub async fn spawn_memory_server() -> TestServer {
    spawn_server(Arc::new(MemoryStore::new())).await
}

/// Memory store that counts every call made to it.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ItemStore for CountingStore {
    fn backend(&self) -> &'static str {
        "counting"
    }

    async fn ping(&self) -> Result<()> {
        self.hit();
        self.inner.ping().await
    }

    async fn find_all(&self) -> Result<Vec<Item>> {
        self.hit();
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>> {
        self.hit();
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, item: ValidItem) -> Result<Item> {
        self.hit();
        self.inner.insert(item).await
    }

    async fn update(&self, id: ItemId, changes: ItemChanges) -> Result<Option<Item>> {
        self.hit();
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: ItemId) -> Result<u64> {
        self.hit();
        self.inner.delete(id).await
    }
}

/// Store whose every call fails as if the database were unreachable.
pub struct UnreachableStore;

#[async_trait]
impl ItemStore for UnreachableStore {
    fn backend(&self) -> &'static str {
        "unreachable"
    }

    async fn ping(&self) -> Result<()> {
        Err(unreachable())
    }

    async fn find_all(&self) -> Result<Vec<Item>> {
        Err(unreachable())
    }

    async fn find_by_id(&self, _id: ItemId) -> Result<Option<Item>> {
        Err(unreachable())
    }

    async fn insert(&self, _item: ValidItem) -> Result<Item> {
        Err(unreachable())
    }

    async fn update(&self, _id: ItemId, _changes: ItemChanges) -> Result<Option<Item>> {
        Err(unreachable())
    }

    async fn delete(&self, _id: ItemId) -> Result<u64> {
        Err(unreachable())
    }
}

fn unreachable() -> Error {
    Error::Connection("server selection timeout: no reachable servers".into())
}

/// Memory store that stalls for `delay` before listing.
pub struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            delay,
        }
    }
}

#[async_trait]
impl ItemStore for SlowStore {
    fn backend(&self) -> &'static str {
        "slow"
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }

    async fn find_all(&self) -> Result<Vec<Item>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>> {
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, item: ValidItem) -> Result<Item> {
        self.inner.insert(item).await
    }

    async fn update(&self, id: ItemId, changes: ItemChanges) -> Result<Option<Item>> {
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: ItemId) -> Result<u64> {
        self.inner.delete(id).await
    }
}
