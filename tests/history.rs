mod support;

use chorale::{
    activity_feed, changed_units_since, completion_milestones, grouped_contributions, progress,
    unit_contributors, AcquireOutcome, Coordinator, InMemoryStore, LockGrant, MilestoneKind,
    RevisionId, VersionedStore, DEFAULT_MESSAGES,
};
use support::{ada, coordinator, grace, SEGMENT_MS};

fn grant(outcome: AcquireOutcome) -> LockGrant {
    match outcome {
        AcquireOutcome::Acquired(grant) => grant,
        AcquireOutcome::Unavailable { reason } => panic!("not acquired: {}", reason),
    }
}

/// Transcribe all three units: Ada saves unit 0, Grace the other two.
/// Returns the save revisions in order.
fn transcribe_all(coordinator: &Coordinator<InMemoryStore>) -> Vec<RevisionId> {
    let mut revisions = Vec::new();
    for (offset, author) in [(0, ada()), (60_000, grace()), (120_000, grace())] {
        let g = grant(
            coordinator
                .acquire_snippet_seeded(Some(offset), &author, 1)
                .unwrap(),
        );
        let revision = coordinator
            .save_snippet(offset, &g.secret, "spk; words", &author)
            .unwrap();
        revisions.push(revision);
    }
    revisions
}

#[test]
fn feed_reports_unit_saves_oldest_first() {
    let coordinator = coordinator(150_000);
    let saves = transcribe_all(&coordinator);
    let tip = coordinator.store().current_revision().unwrap();

    // Lock acquisitions touch only the lock table, so the feed carries
    // exactly the three saves.
    let feed = activity_feed(coordinator.store(), &tip, 50, None).unwrap();
    assert_eq!(feed.len(), 3);
    assert_eq!(
        feed.iter().map(|e| e.starting_point).collect::<Vec<_>>(),
        vec![0, 60_000, 120_000]
    );
    assert_eq!(feed[0].revision, saves[0]);
    assert_eq!(feed[0].author, ada());
    assert_eq!(feed[0].position, "0:00");
    assert_eq!(feed[0].anchor, "0m00s");
    assert_eq!(feed[2].position, "2:00");
    assert!(feed[0].timestamp < feed[2].timestamp);
}

#[test]
fn feed_honors_max_items_and_min_timestamp() {
    let coordinator = coordinator(150_000);
    transcribe_all(&coordinator);
    let tip = coordinator.store().current_revision().unwrap();

    // The two most recent entries, still oldest first.
    let feed = activity_feed(coordinator.store(), &tip, 2, None).unwrap();
    assert_eq!(
        feed.iter().map(|e| e.starting_point).collect::<Vec<_>>(),
        vec![60_000, 120_000]
    );

    let newest = feed[1].timestamp;
    let feed = activity_feed(coordinator.store(), &tip, 50, Some(newest)).unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].starting_point, 120_000);
}

#[test]
fn changed_units_since_stops_at_the_boundary() {
    let coordinator = coordinator(150_000);
    let saves = transcribe_all(&coordinator);
    let tip = coordinator.store().current_revision().unwrap();

    let units = changed_units_since(coordinator.store(), &tip, &saves[0]).unwrap();
    assert_eq!(units.into_iter().collect::<Vec<_>>(), vec![60_000, 120_000]);

    // Boundary revision itself is excluded.
    let none = changed_units_since(coordinator.store(), &tip, &tip).unwrap();
    assert!(none.is_empty());
}

#[test]
fn contributors_are_distinct_and_oldest_first() {
    let coordinator = coordinator(150_000);
    transcribe_all(&coordinator);

    // Grace reviews the first pair, touching unit 0 a second time.
    let g = grant(
        coordinator
            .acquire_review_seeded(Some(0), &grace(), 1)
            .unwrap(),
    );
    coordinator
        .save_review(0, &g.secret, "spk; checked", "spk; checked", &grace())
        .unwrap();

    let tip = coordinator.store().current_revision().unwrap();
    let contributors = unit_contributors(coordinator.store(), &tip, 0).unwrap();
    assert_eq!(contributors, vec!["Ada".to_string(), "Grace".to_string()]);
}

#[test]
fn milestones_report_each_threshold_once_newest_first() {
    let coordinator = coordinator(150_000);
    transcribe_all(&coordinator);
    let tip = coordinator.store().current_revision().unwrap();

    // Saves bring snippet completion to 33%, 66%, 100%.
    let milestones = completion_milestones(coordinator.store(), &tip, SEGMENT_MS, 33).unwrap();
    assert_eq!(milestones.len(), 3);
    assert!(milestones.iter().all(|m| m.kind == MilestoneKind::Snippets));
    assert_eq!(
        milestones.iter().map(|m| m.percent).collect::<Vec<_>>(),
        vec![100, 66, 33]
    );
    assert!(milestones[0].timestamp > milestones[2].timestamp);
}

#[test]
fn review_milestones_yield_to_snippet_milestones() {
    let coordinator = coordinator(150_000);
    transcribe_all(&coordinator);

    let g = grant(
        coordinator
            .acquire_review_seeded(Some(0), &grace(), 1)
            .unwrap(),
    );
    coordinator
        .save_review(0, &g.secret, "spk; checked", "spk; checked", &grace())
        .unwrap();
    let tip = coordinator.store().current_revision().unwrap();

    // With a 50% step: snippet saves cross 100 (total 3 -> 33, 66, 100),
    // the review save crosses 50 (1 of 2 pairs done).
    let milestones = completion_milestones(coordinator.store(), &tip, SEGMENT_MS, 50).unwrap();
    let kinds: Vec<_> = milestones.iter().map(|m| (m.kind, m.percent)).collect();
    assert_eq!(
        kinds,
        vec![
            (MilestoneKind::Reviews, 50),
            (MilestoneKind::Snippets, 100),
        ]
    );
}

#[test]
fn kudos_selection_is_idempotent() {
    let coordinator = coordinator(150_000);
    transcribe_all(&coordinator);
    let tip = coordinator.store().current_revision().unwrap();

    let messages = ["well done", "nice work", "bravo", "thanks", "superb"];
    let first = grouped_contributions(
        coordinator.store(),
        &tip,
        3_600,
        24 * 3_600,
        2_000,
        &messages,
    )
    .unwrap();
    let second = grouped_contributions(
        coordinator.store(),
        &tip,
        3_600,
        24 * 3_600,
        2_000,
        &messages,
    )
    .unwrap();
    assert_eq!(first, second);

    // All fixture commits land inside one hour-wide window.
    assert_eq!(first.len(), 1);
    let window = &first[0];
    assert_eq!(window.authors.len(), 2);
    assert_eq!(window.authors[0].author, ada());
    assert_eq!(window.authors[0].actions.len(), 1);
    assert_eq!(window.authors[1].author, grace());
    assert_eq!(window.authors[1].actions.len(), 2);
    // Actions arrive most recent first; the first one seeds the choice.
    assert!(window.authors[1].actions[0].timestamp > window.authors[1].actions[1].timestamp);
    for author in &window.authors {
        assert!(messages.contains(&author.message.as_str()));
    }
}

#[test]
fn kudos_windows_bound_by_lookback() {
    let coordinator = coordinator(150_000);
    let saves = transcribe_all(&coordinator);
    let tip = coordinator.store().current_revision().unwrap();
    let store = coordinator.store();

    let newest = store.history(&tip).unwrap()[0].timestamp;
    // Reference sits on the newest save; a two-minute lookback from the
    // aligned window end drops the oldest save.
    let windows =
        grouped_contributions(store, &tip, 120, 120, newest, &["hi"]).unwrap();
    let counted: usize = windows.iter().flat_map(|w| &w.authors).map(|a| a.actions.len()).sum();
    assert!(counted < saves.len());
    for window in &windows {
        assert_eq!(window.window_start % 120, 0);
    }
}

#[test]
fn empty_message_list_falls_back_to_default() {
    let coordinator = coordinator(150_000);
    transcribe_all(&coordinator);
    let tip = coordinator.store().current_revision().unwrap();

    let windows =
        grouped_contributions(coordinator.store(), &tip, 3_600, 24 * 3_600, 2_000, &[]).unwrap();
    assert_eq!(windows[0].authors[0].message, DEFAULT_MESSAGES[0]);
}

#[test]
fn progress_tracks_completion() {
    let coordinator = coordinator(150_000);
    let tip = coordinator.store().current_revision().unwrap();
    let report = progress(coordinator.store(), &tip, SEGMENT_MS).unwrap();
    assert_eq!(report.snippets.total, 3);
    assert_eq!(report.reviews.total, 2);
    assert_eq!(report.snippets.percent, 0);

    transcribe_all(&coordinator);
    let tip = coordinator.store().current_revision().unwrap();
    let report = progress(coordinator.store(), &tip, SEGMENT_MS).unwrap();
    assert_eq!(report.snippets.completed, 3);
    assert_eq!(report.snippets.percent, 100);
    assert_eq!(report.reviews.completed, 0);

    // Progress pinned to the bootstrap revision is unchanged.
    let old = progress(coordinator.store(), &RevisionId::new("000000000000"), SEGMENT_MS).unwrap();
    assert_eq!(old.snippets.completed, 0);
    assert_eq!(old.snippets.total, 3);
}
