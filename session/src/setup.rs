//! Asynchronous preparation before the first tick

use crate::error::SetupError;
use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use std::future::Future;
use tracing::info;

/// A named loading step (fonts, models, controllers)
pub struct SetupTask {
    name: String,
    future: BoxFuture<'static, Result<(), SetupError>>,
}

impl SetupTask {
    pub fn new<F>(name: impl Into<String>, future: F) -> Self
    where
        F: Future<Output = Result<(), SetupError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            future: future.boxed(),
        }
    }

    /// Task that has nothing left to load
    pub fn ready(name: impl Into<String>) -> Self {
        Self::new(name, futures::future::ready(Ok(())))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for SetupTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupTask").field("name", &self.name).finish()
    }
}

/// Run every task to completion; the first failure wins
pub async fn run_all(tasks: Vec<SetupTask>) -> Result<(), SetupError> {
    let names: Vec<String> = tasks.iter().map(|task| task.name.clone()).collect();
    info!(tasks = ?names, "loading");
    try_join_all(tasks.into_iter().map(|task| task.future)).await?;
    info!("loaded");
    Ok(())
}
