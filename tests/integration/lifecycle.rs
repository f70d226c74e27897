//! Lifecycle guards: already-applied, idempotent clean, state corruption.

use super::test_utils::{snapshot, OverlayFixture};
use drape::error::OverlayError;
use drape::overlay::{Direction, Overlay, STATE_FILE};
use drape::state::OverlayState;
use std::fs;

const BASE_FILES: &[(&str, &str)] = &[("shared.txt", "base"), ("base_only.txt", "b")];
const CUSTOM_FILES: &[(&str, &str)] = &[("shared.txt", "custom")];

fn overlay(fx: &OverlayFixture, direction: Direction) -> Overlay {
    Overlay::new(&fx.base, &fx.custom, &fx.state, direction).unwrap()
}

#[test]
fn second_apply_is_rejected_and_mutates_nothing() {
    let fx = OverlayFixture::new(BASE_FILES, CUSTOM_FILES);
    let mut ov = overlay(&fx, Direction::ToBase);
    ov.apply(false).unwrap();

    let base_after_first = snapshot(&fx.base);
    let custom_after_first = snapshot(&fx.custom);

    let err = ov.apply(false).unwrap_err();
    assert!(matches!(err, OverlayError::AlreadyApplied));

    // The rejected apply performed no filesystem mutation
    assert_eq!(snapshot(&fx.base), base_after_first);
    assert_eq!(snapshot(&fx.custom), custom_after_first);
}

#[test]
fn clean_is_idempotent() {
    let fx = OverlayFixture::new(BASE_FILES, CUSTOM_FILES);
    let base_before = snapshot(&fx.base);
    let custom_before = snapshot(&fx.custom);

    let mut ov = overlay(&fx, Direction::ToBase);
    ov.clean().unwrap();
    ov.clean().unwrap();

    assert_eq!(ov.state(), OverlayState::Clean);
    assert_eq!(snapshot(&fx.base), base_before);
    assert_eq!(snapshot(&fx.custom), custom_before);
}

#[test]
fn clean_after_apply_then_apply_again_succeeds() {
    let fx = OverlayFixture::new(BASE_FILES, CUSTOM_FILES);
    let before = snapshot(&fx.base);

    let mut ov = overlay(&fx, Direction::ToBase);
    ov.apply(false).unwrap();
    ov.clean().unwrap();
    ov.apply(false).unwrap();
    ov.clean().unwrap();

    assert_eq!(snapshot(&fx.base), before);
}

#[test]
fn reapply_round_trips_after_source_edit() {
    let fx = OverlayFixture::new(BASE_FILES, CUSTOM_FILES);
    let before = snapshot(&fx.base);

    let mut ov = overlay(&fx, Direction::ToBase);
    ov.apply(false).unwrap();
    fs::write(fx.custom.join("shared.txt"), "custom v2").unwrap();
    ov.apply(true).unwrap();

    let applied = snapshot(&fx.base);
    assert_eq!(
        applied[std::path::Path::new("shared.txt")],
        b"custom v2"
    );

    ov.clean().unwrap();
    assert_eq!(snapshot(&fx.base), before);
}

#[test]
fn corrupt_state_artifact_is_fatal() {
    let fx = OverlayFixture::new(BASE_FILES, CUSTOM_FILES);
    fs::write(fx.state.join(STATE_FILE), "gibberish").unwrap();

    let err = Overlay::new(&fx.base, &fx.custom, &fx.state, Direction::ToBase).unwrap_err();
    assert!(matches!(err, OverlayError::CorruptState(_)));
}
