// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_does_not_go_backwards() {
    let clock = SystemClock;
    let t1 = clock.now();
    let t2 = clock.now();
    assert!(t2 >= t1);
}

#[test]
fn fake_clock_default_is_fixed() {
    let clock = FakeClock::default();
    assert_eq!(clock.now().to_string(), "2026-01-30T08:14:09Z");
    assert_eq!(clock.now(), clock.now());
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    clock.advance(Duration::from_secs(60));
    let t2 = clock.now();
    assert_eq!(t2.unix_secs() - t1.unix_secs(), 60);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now();
    clock2.advance(Duration::from_secs(30));
    let t2 = clock1.now();
    assert_eq!(t2.unix_secs() - t1.unix_secs(), 30);
}

#[test]
fn fake_clock_set() {
    let clock = FakeClock::new();
    let later = Timestamp::from_unix_secs(2_000_000_000).unwrap();
    clock.set(later);
    assert_eq!(clock.now(), later);
}
