use quota_gate::infrastructure::mocks::MockClock;
use quota_gate::{
    AdmissionError, AdmissionGate, DedupStore, FixedWindowLimiter, QuotaGrant, QuotaPolicy,
    ShardedTokenStorage, Subject, Token,
};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

const THREADS: usize = 8;

#[test]
fn test_concurrent_limiter_never_exceeds_capacity() {
    let clock = Arc::new(MockClock::new(Instant::now()));
    let limiter = Arc::new(FixedWindowLimiter::new(50, Duration::from_secs(60), clock));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..100).filter(|_| limiter.allow()).count()
            })
        })
        .collect();

    let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(admitted, 50);
    assert_eq!(limiter.count(), 50);
}

#[test]
fn test_concurrent_put_has_one_winner() {
    let clock = Arc::new(MockClock::new(Instant::now()));
    let store = Arc::new(DedupStore::new(ShardedTokenStorage::new(), clock));

    for raw in 1..=20 {
        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    store.put(Token::new(raw)).is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1, "token {raw} accepted more than once");
    }

    assert_eq!(store.len(), 20);
}

#[test]
fn test_concurrent_policy_respects_both_tiers() {
    let clock = Arc::new(MockClock::new(Instant::now()));
    let policy = Arc::new(QuotaPolicy::new(Subject::new(1), 30, 100, clock));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let policy = Arc::clone(&policy);
            thread::spawn(move || (0..20).filter(|_| policy.check_rate().is_ok()).count())
        })
        .collect();

    let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(admitted, 30);
    assert_eq!(policy.monthly_usage().used, 30);
}

#[test]
fn test_concurrent_gate_admits_each_token_once() {
    let clock = Arc::new(MockClock::new(Instant::now()));
    let gate = AdmissionGate::builder()
        .with_grant(QuotaGrant::new(Subject::new(1), 10_000, 10_000))
        .with_grant(QuotaGrant::new(Subject::new(2), 10_000, 10_000))
        .with_clock(clock)
        .build()
        .unwrap();

    // Every thread submits the same 100 tokens under alternating subjects
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let gate = gate.clone();
            thread::spawn(move || {
                let subject = Subject::new(i as i64 % 2 + 1);
                let mut admitted = 0;
                for raw in 1..=100 {
                    match gate.admit(subject, Token::new(raw)) {
                        Ok(_) => admitted += 1,
                        Err(AdmissionError::Duplicate(_)) => {}
                        Err(other) => panic!("unexpected rejection: {other}"),
                    }
                }
                admitted
            })
        })
        .collect();

    let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(admitted, 100);
    assert_eq!(gate.dedup().len(), 100);

    let snapshot = gate.metrics().snapshot();
    assert_eq!(snapshot.admitted, 100);
    assert_eq!(snapshot.duplicates, (THREADS as u64 - 1) * 100);
}
