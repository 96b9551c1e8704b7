//! End-to-end vote runs against a mock governance API.

mod common;

use alloy::primitives::Address;
use async_trait::async_trait;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use governance_voter::blockchain::Wallet;
use governance_voter::config::AppConfig;
use governance_voter::session::{AccountEntry, Pause, SessionReport, VoteSession};

#[derive(Clone, Default)]
struct CountingPause {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Pause for CountingPause {
    async fn pause(&self, duration: Duration) {
        assert!((1..=2).contains(&duration.as_secs()));
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn key(n: u8) -> String {
    format!("{:064x}", n)
}

fn address_of(key: &str) -> Address {
    Wallet::from_private_key(key).unwrap().address()
}

fn config(api: SocketAddr, contract: Address) -> AppConfig {
    let mut config = AppConfig::default();
    config.blockchain.rpc_url = "http://127.0.0.1:1".to_string();
    config.governance.api_base_url = format!("http://{}/", api);
    config.governance.vote_contract = contract.to_string();
    config.governance.request_timeout_secs = 5;
    config.retries.max_attempts = 2;
    config.retries.delay_ms = 0;
    config.session.delay_min_secs = 1;
    config.session.delay_max_secs = 2;
    config
}

/// Mock that answers status lookups from `statuses` (lowercase address →
/// JSON body) and answers every PUT with `put_status`.
async fn start_api(
    statuses: HashMap<String, String>,
    put_status: u16,
) -> (SocketAddr, common::RequestLog) {
    let statuses = Arc::new(statuses);
    common::start_programmable_backend(move |req| {
        let statuses = statuses.clone();
        async move {
            if req.method == "PUT" {
                return (put_status, String::new());
            }
            let address = req.path.rsplit('/').next().unwrap_or_default().to_lowercase();
            match statuses.get(&address) {
                Some(body) => (200, body.clone()),
                None => (404, String::new()),
            }
        }
    })
    .await
}

#[tokio::test]
async fn test_one_eligible_account_among_three() {
    let keys = [key(1), key(2), key(3)];
    let [no_power, eligible, voted] = keys.clone().map(|k| address_of(&k));

    let statuses = HashMap::from([
        (
            no_power.to_string().to_lowercase(),
            r#"{"hasVoted":false,"votingPower":0}"#.to_string(),
        ),
        (
            eligible.to_string().to_lowercase(),
            r#"{"hasVoted":false,"votingPower":1250.5}"#.to_string(),
        ),
        (
            voted.to_string().to_lowercase(),
            r#"{"hasVoted":true,"votingPower":900}"#.to_string(),
        ),
    ]);
    let (addr, log) = start_api(statuses, 200).await;

    let contract = Address::repeat_byte(0x42);
    let pause = CountingPause::default();
    let session = VoteSession::new(config(addr, contract), pause.clone()).unwrap();

    let accounts: Vec<AccountEntry> = keys.iter().map(|k| AccountEntry::new(k.clone(), None)).collect();
    let report = session.run(&accounts).await;

    assert_eq!(
        report,
        SessionReport {
            submitted: 1,
            skipped: 2,
            failed: 0,
            pauses: 1,
        }
    );
    assert_eq!(pause.calls.load(Ordering::SeqCst), 1);

    let requests = log.lock().unwrap().clone();
    let puts: Vec<_> = requests.iter().filter(|r| r.method == "PUT").collect();
    assert_eq!(puts.len(), 1);
    assert_eq!(
        puts[0].path.to_lowercase(),
        format!("/api/vote/{}/vote", contract).to_lowercase()
    );

    let body: serde_json::Value = serde_json::from_str(&puts[0].body).unwrap();
    assert_eq!(body["isYesVote"], true);
    assert_eq!(
        body["voter"].as_str().unwrap().to_lowercase(),
        eligible.to_string().to_lowercase()
    );
    assert!(body["signature"].as_str().unwrap().starts_with("0x"));
    assert!(body["signatureDeadline"].as_u64().unwrap() > 0);

    let gets = requests.iter().filter(|r| r.method == "GET").count();
    assert_eq!(gets, 3);
    assert!(requests
        .iter()
        .filter(|r| r.method == "GET")
        .all(|r| r.path.starts_with("/api/vote/rnip2/user/")));
}

#[tokio::test]
async fn test_no_pause_after_last_account() {
    let key = key(7);
    let statuses = HashMap::from([(
        address_of(&key).to_string().to_lowercase(),
        r#"{"hasVoted":false,"votingPower":5}"#.to_string(),
    )]);
    let (addr, _log) = start_api(statuses, 200).await;

    let pause = CountingPause::default();
    let session = VoteSession::new(config(addr, Address::repeat_byte(0x42)), pause.clone()).unwrap();
    let report = session.run(&[AccountEntry::new(key, None)]).await;

    assert_eq!(report.submitted, 1);
    assert_eq!(report.pauses, 0);
    assert_eq!(pause.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rejected_vote_fails_account_and_run_continues() {
    let keys = [key(4), key(5)];
    let statuses: HashMap<String, String> = keys
        .iter()
        .map(|k| {
            (
                address_of(k).to_string().to_lowercase(),
                r#"{"hasVoted":false,"votingPower":3}"#.to_string(),
            )
        })
        .collect();
    let (addr, log) = start_api(statuses, 500).await;

    let pause = CountingPause::default();
    let session = VoteSession::new(config(addr, Address::repeat_byte(0x42)), pause.clone()).unwrap();
    let accounts: Vec<AccountEntry> = keys.iter().map(|k| AccountEntry::new(k.clone(), None)).collect();
    let report = session.run(&accounts).await;

    assert_eq!(report.failed, 2);
    assert_eq!(report.submitted, 0);
    assert_eq!(pause.calls.load(Ordering::SeqCst), 0);

    // Two attempts per account
    let puts = log.lock().unwrap().iter().filter(|r| r.method == "PUT").count();
    assert_eq!(puts, 4);
}
