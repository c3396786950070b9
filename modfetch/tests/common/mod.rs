//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use modfetch::{
    FetchOrchestrator, LocalModuleResolver, ModuleXmlParser, RemoteConfig, RemoteFetch,
    RemoteModuleResolver, RemoteRepository, RetryPolicy,
};

/// In-memory repository that records every fetch.
#[derive(Default)]
pub struct MemoryRepository {
    files: Mutex<HashMap<String, Vec<u8>>>,
    broken: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    offline: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl MemoryRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Serve `content` at `path` (relative to the repository root).
    pub fn put(&self, path: &str, content: impl Into<Vec<u8>>) {
        self.files.lock().insert(path.to_string(), content.into());
    }

    /// Make `path` fail as if the connection dropped.
    pub fn break_path(&self, path: &str) {
        self.broken.lock().insert(path.to_string());
    }

    /// Make every fetch fail as unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Sleep before answering each fetch.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Paths requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.as_str() == path).count()
    }
}

impl RemoteRepository for MemoryRepository {
    fn fetch(&self, remote_prefix: &str, resource: &str) -> RemoteFetch {
        let path = format!("{}{}", remote_prefix, resource);
        self.calls.lock().push(path.clone());

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        if self.offline.load(Ordering::SeqCst) || self.broken.lock().contains(&path) {
            return RemoteFetch::Unavailable("connection refused".to_string());
        }

        match self.files.lock().get(&path) {
            Some(content) => RemoteFetch::Found(Box::new(Cursor::new(content.clone()))),
            None => RemoteFetch::NotFound,
        }
    }

    fn describe(&self) -> String {
        "memory repository".to_string()
    }
}

/// A `module.xml` declaring the given resources.
pub fn module_xml(resources: &[&str]) -> String {
    let roots: String = resources
        .iter()
        .map(|r| format!("        <resource-root path=\"{}\"/>\n", r))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <module xmlns=\"urn:jboss:module:1.0\" name=\"test\">\n    <resources>\n{}    </resources>\n</module>\n",
        roots
    )
}

pub fn config(cache_root: &std::path::Path) -> RemoteConfig {
    RemoteConfig::new(cache_root).with_retry(RetryPolicy::none())
}

pub fn orchestrator(
    cache_root: &std::path::Path,
    repository: &Arc<MemoryRepository>,
) -> FetchOrchestrator {
    let repository: Arc<dyn RemoteRepository> = repository.clone();
    FetchOrchestrator::new(&config(cache_root), repository, Arc::new(ModuleXmlParser::new()))
        .expect("valid cache root")
}

pub fn resolver(
    cache_root: &std::path::Path,
    repository: &Arc<MemoryRepository>,
) -> RemoteModuleResolver {
    let primary = LocalModuleResolver::new(cache_root, Arc::new(ModuleXmlParser::new()));
    RemoteModuleResolver::new(Arc::new(primary), orchestrator(cache_root, repository))
}
