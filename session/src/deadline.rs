//! Runtime-agnostic deadline for provider and record-store calls.
//!
//! The caller supplies the timer future (`tokio::time::sleep` natively,
//! `gloo_timers::future::sleep` in the browser), so this crate stays free of
//! any executor dependency.

#[cfg(test)]
#[path = "deadline_test.rs"]
mod deadline_test;

use std::future::Future;

use futures::future::{Either, select};

/// Race `work` against `timer`. Returns `None` if the timer finishes first.
pub async fn with_deadline<F, T>(work: F, timer: T) -> Option<F::Output>
where
    F: Future,
    T: Future<Output = ()>,
{
    match select(Box::pin(work), Box::pin(timer)).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(((), _)) => None,
    }
}
