//! Background LLM summaries of freshly created benchmarks.

mod client;
mod prompt;

use std::sync::Arc;

use bench_common::BenchmarkRun;
use chrono::Utc;
use dashmap::DashSet;
use sea_orm::prelude::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

pub use client::{ChatClient, ChatError, OpenAiClient};
pub use prompt::{SYSTEM_MESSAGE, build_user_prompt};

use crate::entity::benchmark;

/// Launches at most one summary task per benchmark id.
///
/// Cheap to clone; clones share the same in-flight set.
#[derive(Clone, Default)]
pub struct Summarizer {
    inner: Option<Arc<Inner>>,
}

struct Inner {
    client: Arc<dyn ChatClient>,
    db: DatabaseConnection,
    in_flight: DashSet<i32>,
}

/// Removes the id from the in-flight set when the task ends, panics included.
struct InFlightGuard {
    inner: Arc<Inner>,
    id: i32,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inner.in_flight.remove(&self.id);
    }
}

impl Summarizer {
    pub fn new(client: Arc<dyn ChatClient>, db: DatabaseConnection) -> Self {
        Self {
            inner: Some(Arc::new(Inner {
                client,
                db,
                in_flight: DashSet::new(),
            })),
        }
    }

    /// A summarizer that never does anything, used when no API key is configured.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub fn is_in_flight(&self, id: i32) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.in_flight.contains(&id))
    }

    /// Start summarizing `benchmark` in a detached task.
    ///
    /// Returns `None` when disabled or when a summary for the same id is
    /// already running.
    pub fn summarize(
        &self,
        benchmark: &benchmark::Model,
        runs: Arc<[BenchmarkRun]>,
    ) -> Option<JoinHandle<()>> {
        let inner = self.inner.as_ref()?;
        let id = benchmark.id;

        if !inner.in_flight.insert(id) {
            info!(benchmark_id = id, "Summary already in progress, skipping");
            return None;
        }
        let guard = InFlightGuard {
            inner: Arc::clone(inner),
            id,
        };

        let title = benchmark.title.clone();
        let description = benchmark.description.clone();

        Some(tokio::spawn(async move {
            let inner = Arc::clone(&guard.inner);
            run_summary(&inner, id, title, description, runs).await;
            drop(guard);
        }))
    }
}

#[instrument(skip(inner, title, description, runs), fields(runs = runs.len()))]
async fn run_summary(
    inner: &Inner,
    id: i32,
    title: String,
    description: String,
    runs: Arc<[BenchmarkRun]>,
) {
    // Column statistics sort every sample; keep that off the runtime workers.
    let user_prompt = match tokio::task::spawn_blocking(move || {
        build_user_prompt(&title, &description, &runs)
    })
    .await
    {
        Ok(prompt) => prompt,
        Err(e) => {
            error!(benchmark_id = id, error = %e, "Failed to build AI summary prompt");
            return;
        }
    };

    let summary = match inner.client.complete(SYSTEM_MESSAGE, &user_prompt).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(benchmark_id = id, error = %e, "Failed to generate AI summary");
            return;
        }
    };

    let result = benchmark::Entity::update_many()
        .col_expr(benchmark::Column::AiSummary, Expr::value(Some(summary)))
        .col_expr(benchmark::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(benchmark::Column::Id.eq(id))
        .exec(&inner.db)
        .await;

    match result {
        Ok(_) => info!(benchmark_id = id, "Stored AI summary"),
        Err(e) => error!(benchmark_id = id, error = %e, "Failed to store AI summary"),
    }
}
