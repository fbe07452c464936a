//! Bounded artifact polling.

#![allow(clippy::expect_used)]

use std::time::Duration;

use runway_core::application::services::{ArtifactPoller, PollStep, await_artifact};
use runway_core::domain::{PlatformError, PollPolicy, ProvisionError, RepoHandle};

use crate::mocks::{OWNER, Script, ScriptedConnector};

const PATH: &str = "remote.txt";

fn repo() -> RepoHandle {
    RepoHandle::new(OWNER, "repo-abcd1234")
}

fn policy(attempts: u32) -> PollPolicy {
    PollPolicy::new(attempts, Duration::from_secs(5))
}

#[tokio::test(start_paused = true)]
async fn exhausts_after_exactly_max_reads() {
    let connector = ScriptedConnector::new(Script::never_found());
    let platform = connector.platform();
    let mut seen = Vec::new();

    let step = await_artifact(&platform, &repo(), PATH, policy(6), |s| seen.push(s.clone()))
        .await
        .expect("no hard failure");

    assert_eq!(step, PollStep::Exhausted { attempts: 6 });
    assert_eq!(connector.reads(), 6);
    assert_eq!(seen.len(), 6);
    assert!(seen[..5].iter().all(|s| !s.is_final()));
}

#[tokio::test(start_paused = true)]
async fn stops_at_first_hit() {
    let connector = ScriptedConnector::new(Script::found_after(3, "https://a.trycloudflare.com"));
    let platform = connector.platform();

    let step = await_artifact(&platform, &repo(), PATH, policy(10), |_| {})
        .await
        .expect("found");

    assert_eq!(
        step,
        PollStep::Found {
            content: "https://a.trycloudflare.com".to_string(),
            attempt: 4,
        }
    );
    assert_eq!(connector.reads(), 4);
}

#[tokio::test(start_paused = true)]
async fn hard_read_failure_is_not_retried() {
    let script = Script {
        reads: vec![Err(PlatformError::Other("HTTP 500".into()))],
        ..Script::default()
    };
    let connector = ScriptedConnector::new(script);
    let platform = connector.platform();

    let err = await_artifact(&platform, &repo(), PATH, policy(10), |_| {})
        .await
        .expect_err("poll error");

    assert_eq!(err, ProvisionError::Poll("HTTP 500".into()));
    assert_eq!(connector.reads(), 1);
}

#[tokio::test(start_paused = true)]
async fn waits_one_interval_between_reads_and_none_after_the_last() {
    let connector = ScriptedConnector::new(Script::never_found());
    let platform = connector.platform();
    let start = tokio::time::Instant::now();

    await_artifact(&platform, &repo(), PATH, policy(3), |_| {})
        .await
        .expect("exhausted");

    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn single_attempt_budget_reads_once_without_waiting() {
    let connector = ScriptedConnector::new(Script::never_found());
    let platform = connector.platform();
    let start = tokio::time::Instant::now();

    let step = await_artifact(&platform, &repo(), PATH, policy(1), |_| {})
        .await
        .expect("exhausted");

    assert_eq!(step, PollStep::Exhausted { attempts: 1 });
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn finished_poller_refuses_further_reads() {
    let connector = ScriptedConnector::new(Script::found_after(0, "url"));
    let platform = connector.platform();
    let mut poller = ArtifactPoller::new(policy(3));

    let first = poller
        .poll_once(&platform, &repo(), PATH)
        .await
        .expect("found");
    assert!(first.is_final());

    let err = poller
        .poll_once(&platform, &repo(), PATH)
        .await
        .expect_err("finished");
    assert!(matches!(err, ProvisionError::Internal(_)));
    assert_eq!(poller.attempts(), 1);
    assert_eq!(connector.reads(), 1);
}
