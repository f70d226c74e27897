//! End-to-end apply/clean behavior for both merge directions.

use super::test_utils::{snapshot, OverlayFixture};
use drape::merge::BACKUP_SUFFIX;
use drape::overlay::{Direction, Overlay};
use std::path::{Path, PathBuf};

const BASE_FILES: &[(&str, &str)] = &[
    ("common.txt", "base common"),
    ("base_only.txt", "base only"),
    ("nested/inner.txt", "base inner"),
    ("nested/deep/leaf.txt", "base leaf"),
];

const CUSTOM_FILES: &[(&str, &str)] = &[
    ("common.txt", "custom common"),
    ("custom_only.txt", "custom only"),
    ("nested/inner.txt", "custom inner"),
    ("extra/new.txt", "custom new"),
];

fn overlay(fx: &OverlayFixture, direction: Direction) -> Overlay {
    Overlay::new(&fx.base, &fx.custom, &fx.state, direction).unwrap()
}

#[test]
fn union_merge_destination_wins_and_round_trips() {
    let fx = OverlayFixture::new(BASE_FILES, CUSTOM_FILES);
    let before = snapshot(&fx.custom);

    let mut ov = overlay(&fx, Direction::ToCustom);
    ov.apply(false).unwrap();
    let applied = snapshot(&fx.custom);

    // Files present in both keep the destination's content
    assert_eq!(applied[Path::new("common.txt")], b"custom common");
    assert_eq!(
        applied[Path::new("nested/inner.txt")],
        b"custom inner"
    );
    // Files only in base were copied over
    assert_eq!(
        applied[Path::new("base_only.txt")],
        b"base only"
    );
    assert_eq!(
        applied[Path::new("nested/deep/leaf.txt")],
        b"base leaf"
    );
    // Union-merge never creates backups
    assert!(applied
        .keys()
        .all(|p| !p.to_string_lossy().ends_with(BACKUP_SUFFIX)));

    ov.clean().unwrap();
    assert_eq!(snapshot(&fx.custom), before);
    // Base tree is never touched in this direction
    assert_eq!(snapshot(&fx.base), snapshot_base_reference());
}

#[test]
fn override_merge_source_wins_and_round_trips() {
    let fx = OverlayFixture::new(BASE_FILES, CUSTOM_FILES);
    let before = snapshot(&fx.base);

    let mut ov = overlay(&fx, Direction::ToBase);
    ov.apply(false).unwrap();
    let applied = snapshot(&fx.base);

    // Files present in both take the source's (custom) content
    assert_eq!(applied[Path::new("common.txt")], b"custom common");
    assert_eq!(
        applied[Path::new("nested/inner.txt")],
        b"custom inner"
    );
    // The originals survive as backups until clean
    assert_eq!(
        applied[&PathBuf::from(format!("common.txt{}", BACKUP_SUFFIX))],
        b"base common"
    );
    assert_eq!(
        applied[&PathBuf::from(format!("nested/inner.txt{}", BACKUP_SUFFIX))],
        b"base inner"
    );

    ov.clean().unwrap();
    assert_eq!(snapshot(&fx.base), before);
}

#[test]
fn completeness_after_apply() {
    for direction in [Direction::ToCustom, Direction::ToBase] {
        let fx = OverlayFixture::new(BASE_FILES, CUSTOM_FILES);
        let base_before = snapshot(&fx.base);
        let custom_before = snapshot(&fx.custom);

        let mut ov = overlay(&fx, direction);
        ov.apply(false).unwrap();

        let dest = match direction {
            Direction::ToCustom => &fx.custom,
            Direction::ToBase => &fx.base,
        };
        let applied = snapshot(dest);

        // Every file from either pre-apply tree is present, with the
        // custom content when the custom tree has the file
        for path in base_before.keys().chain(custom_before.keys()) {
            let expected = custom_before.get(path).or_else(|| base_before.get(path));
            assert_eq!(applied.get(path), expected, "direction {:?}", direction);
        }

        // Anything else in the destination must be a backup artifact
        for path in applied.keys() {
            if !base_before.contains_key(path) && !custom_before.contains_key(path) {
                assert!(
                    path.to_string_lossy().ends_with(BACKUP_SUFFIX),
                    "unexpected non-backup file {:?}",
                    path
                );
            }
        }
    }
}

#[test]
fn concrete_union_scenario() {
    // Source a/x.txt="1"; destination a/x.txt="2", b/y.txt="3".
    let fx = OverlayFixture::new(
        &[("a/x.txt", "1")],
        &[("a/x.txt", "2"), ("b/y.txt", "3")],
    );
    let before = snapshot(&fx.custom);

    let mut ov = overlay(&fx, Direction::ToCustom);
    ov.apply(false).unwrap();

    // Only missing entries are copied; here there are none
    assert_eq!(snapshot(&fx.custom), before);

    ov.clean().unwrap();
    assert_eq!(snapshot(&fx.custom), before);
}

fn snapshot_base_reference() -> std::collections::BTreeMap<PathBuf, Vec<u8>> {
    BASE_FILES
        .iter()
        .map(|(rel, content)| (PathBuf::from(rel), content.as_bytes().to_vec()))
        .collect()
}
