use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use nexus::error::{NexusError, Result};
use nexus::providers::Provider;
use nexus::storage::JsonStore;

#[allow(dead_code)]
pub fn create_temp_store() -> (JsonStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let store = JsonStore::new_with_path(tmp.path().join("chat_history.json"))
        .expect("failed to create json store with path");
    (store, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Provider that replays canned replies in order and records every prompt
///
/// An `Err` entry simulates a failed generation call. Once the script runs
/// out every call fails.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new(replies: Vec<std::result::Result<&str, &str>>) -> Self {
        let replies = replies
            .into_iter()
            .map(|r| r.map(str::to_string).map_err(str::to_string))
            .collect();
        Self {
            replies: Arc::new(Mutex::new(replies)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(reply: &str) -> Self {
        Self::new(vec![Ok(reply)])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(msg)) => Err(NexusError::Generation(msg).into()),
            None => Err(NexusError::Generation("script exhausted".to_string()).into()),
        }
    }

    fn model_name(&self) -> String {
        "scripted".to_string()
    }
}
