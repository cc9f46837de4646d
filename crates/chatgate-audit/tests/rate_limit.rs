use std::sync::Arc;

use chatgate_audit::rate_limit::{
    DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_MS, ManualClock, RateLimitSettings, RateLimiter,
};

fn limiter(window_ms: i64, max_requests: i64) -> (RateLimiter, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let limiter = RateLimiter::with_clock(RateLimitSettings::new(window_ms, max_requests), clock.clone());
    (limiter, clock)
}

#[test]
fn admits_up_to_quota_then_rejects_until_window_resets() {
    let (limiter, clock) = limiter(10_000, 2);

    let first = limiter.check("user-1");
    assert!(first.allowed);
    assert_eq!(first.remaining, 1);

    let second = limiter.check("user-1");
    assert!(second.allowed);
    assert_eq!(second.remaining, 0);

    let third = limiter.check("user-1");
    assert!(!third.allowed);
    assert_eq!(third.remaining, 0);
    assert_eq!(third.retry_after_seconds, Some(10));

    clock.advance_ms(10_001);
    let fresh = limiter.check("user-1");
    assert!(fresh.allowed);
    assert_eq!(fresh.remaining, 1);
}

#[test]
fn retry_after_rounds_up_and_never_reaches_zero() {
    let (limiter, clock) = limiter(10_000, 1);
    limiter.check("k");

    clock.advance_ms(8_500);
    assert_eq!(limiter.check("k").retry_after_seconds, Some(2));

    clock.advance_ms(1_499);
    assert_eq!(limiter.check("k").retry_after_seconds, Some(1));
}

#[test]
fn window_resets_exactly_at_its_length() {
    let (limiter, clock) = limiter(5_000, 1);
    assert!(limiter.check("k").allowed);
    clock.advance_ms(4_999);
    assert!(!limiter.check("k").allowed);
    clock.advance_ms(1);
    assert!(limiter.check("k").allowed);
}

#[test]
fn keys_are_independent() {
    let (limiter, _clock) = limiter(60_000, 1);
    assert!(limiter.check("alice").allowed);
    assert!(!limiter.check("alice").allowed);
    assert!(limiter.check("bob").allowed);
}

#[test]
fn rejected_checks_do_not_extend_the_window() {
    let (limiter, clock) = limiter(1_000, 1);
    limiter.check("k");
    for _ in 0..5 {
        clock.advance_ms(150);
        assert!(!limiter.check("k").allowed);
    }
    clock.advance_ms(250);
    assert!(limiter.check("k").allowed);
}

#[test]
fn invalid_settings_fall_back_to_defaults() {
    for (window, max) in [(0, 0), (-5, -1), (0, 3), (1_000, 0)] {
        let settings = RateLimitSettings::new(window, max);
        if window <= 0 {
            assert_eq!(settings.window_ms(), DEFAULT_WINDOW_MS);
        }
        if max <= 0 {
            assert_eq!(settings.max_requests(), DEFAULT_MAX_REQUESTS);
        }
    }

    let settings = RateLimitSettings::new(i64::MAX, i64::MAX);
    assert_eq!(settings.max_requests(), DEFAULT_MAX_REQUESTS);
}

#[test]
fn expired_windows_are_swept_once_the_map_grows_large() {
    let (limiter, clock) = limiter(1_000, 5);
    for i in 0..=10_000 {
        limiter.check(&format!("caller-{i}"));
    }
    assert_eq!(limiter.tracked_keys(), 10_001);

    clock.advance_ms(1_000);
    limiter.check("late-caller");
    assert_eq!(limiter.tracked_keys(), 1);
}
