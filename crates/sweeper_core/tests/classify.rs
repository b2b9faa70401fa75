use std::collections::BTreeSet;

use sweeper_core::{classify, Item, RemovalReason, SweepConfig};

fn config_blocking(names: &[&str]) -> SweepConfig {
    SweepConfig {
        blocked_sources: names.iter().map(|n| n.to_string()).collect::<BTreeSet<_>>(),
        ..SweepConfig::default()
    }
}

fn item(title: &str, source: &str, duration_ms: Option<u64>, short_format: bool) -> Item {
    Item {
        handle: 7,
        title: Some(title.to_string()),
        source_name: Some(source.to_string()),
        duration_ms,
        short_format,
    }
}

#[test]
fn blocked_source_matches_regardless_of_length() {
    let config = config_blocking(&["Podpah"]);
    let item = item("Ep 12", "Podpah", Some(7_200_000), false);

    assert_eq!(
        classify(&item, &config),
        Some(RemovalReason::BlockedSource {
            name: "Podpah".to_string()
        })
    );
}

#[test]
fn short_duration_matches_below_threshold() {
    let config = SweepConfig {
        min_duration_ms: 90_000,
        ..SweepConfig::default()
    };
    let item = item("Clip", "Unknown Channel", Some(40_000), false);

    assert_eq!(
        classify(&item, &config),
        Some(RemovalReason::TooShort {
            duration_ms: 40_000
        })
    );
}

#[test]
fn format_flag_wins_over_blocked_source() {
    // Both rules apply; the reported reason must be the format flag.
    let config = config_blocking(&["Podpah"]);
    let item = item("Clip", "Podpah", Some(30_000), true);

    assert_eq!(classify(&item, &config), Some(RemovalReason::ShortFormat));
}

#[test]
fn unknown_duration_is_not_short() {
    let config = config_blocking(&[]);
    let item = item("Mystery", "Somewhere", None, false);

    assert_eq!(classify(&item, &config), None);
}

#[test]
fn zero_duration_is_a_real_short() {
    let config = SweepConfig::default();
    let item = item("Glitch", "Somewhere", Some(0), false);

    assert_eq!(
        classify(&item, &config),
        Some(RemovalReason::TooShort { duration_ms: 0 })
    );
}

#[test]
fn long_unblocked_item_does_not_match() {
    let config = config_blocking(&["Podpah"]);
    let item = item("Feature", "Fine Channel", Some(3_600_000), false);

    assert_eq!(classify(&item, &config), None);
}

#[test]
fn missing_identity_never_matches() {
    let config = config_blocking(&["Podpah"]);
    let nameless = Item {
        handle: 1,
        title: None,
        source_name: Some("Podpah".to_string()),
        duration_ms: Some(1_000),
        short_format: true,
    };

    assert_eq!(classify(&nameless, &config), None);
}

#[test]
fn classification_is_idempotent() {
    let config = config_blocking(&["Podpah"]);
    let item = item("Ep 12", "Podpah", Some(7_200_000), false);

    let first = classify(&item, &config);
    let second = classify(&item, &config);
    assert_eq!(first, second);
}
