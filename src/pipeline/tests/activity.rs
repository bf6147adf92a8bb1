use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::common::*;
use crate::pipeline::activity::{ActivityCursor, ActivityLog, ActivityPayload, AtsActivity};
use crate::pipeline::domain::{ActivityId, ApplicationId, UserId};
use crate::pipeline::settings::EngineConfig;

fn app_id() -> ApplicationId {
    ApplicationId("app-under-test".to_string())
}

fn entry(id: &str, created_at: DateTime<Utc>) -> AtsActivity {
    AtsActivity {
        id: ActivityId(id.to_string()),
        application_id: app_id(),
        performed_by: UserId("hr-1".to_string()),
        performed_by_name: "Dana Recruiter".to_string(),
        payload: ActivityPayload::CommentAdded {
            comment: format!("note {id}"),
        },
        created_at,
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single().expect("valid timestamp")
}

fn log_with(config: EngineConfig, entries: Vec<AtsActivity>) -> ActivityLog<MemoryActivities> {
    let repository = Arc::new(MemoryActivities::default());
    let log = ActivityLog::new(repository, config);
    for activity in entries {
        log.append(activity).expect("append succeeds");
    }
    log
}

#[test]
fn zero_limit_selects_the_default_page_size() {
    let entries = (0..30)
        .map(|i| entry(&format!("act-{i:02}"), base_time() + Duration::seconds(i)))
        .collect();
    let log = log_with(EngineConfig::default(), entries);

    let page = log.history(&app_id(), 0, None).expect("history");
    assert_eq!(page.entries.len(), 20);
    assert!(page.has_more);
    assert!(page.next_cursor.is_some());
}

#[test]
fn oversized_limits_are_clamped_to_the_configured_cap() {
    let config = EngineConfig {
        activity_page_size: 5,
        activity_page_size_max: 10,
        bulk_limit: 100,
    };
    let entries = (0..25)
        .map(|i| entry(&format!("act-{i:02}"), base_time() + Duration::seconds(i)))
        .collect();
    let log = log_with(config, entries);

    let page = log.history(&app_id(), 50, None).expect("history");
    assert_eq!(page.entries.len(), 10);
    assert!(page.has_more);

    let page = log.history(&app_id(), 0, None).expect("history");
    assert_eq!(page.entries.len(), 5, "zero limit takes the default");
}

#[test]
fn a_final_page_carries_no_cursor() {
    let entries = (0..4)
        .map(|i| entry(&format!("act-{i:02}"), base_time() + Duration::seconds(i)))
        .collect();
    let log = log_with(EngineConfig::default(), entries);

    let page = log.history(&app_id(), 10, None).expect("history");
    assert_eq!(page.entries.len(), 4);
    assert!(!page.has_more);
    assert_eq!(page.next_cursor, None);
}

#[test]
fn a_full_walk_visits_every_entry_exactly_once_newest_first() {
    let entries: Vec<AtsActivity> = (0..17)
        .map(|i| entry(&format!("act-{i:02}"), base_time() + Duration::seconds(i)))
        .collect();
    let log = log_with(EngineConfig::default(), entries);

    let mut seen = Vec::new();
    let mut cursor: Option<ActivityCursor> = None;
    loop {
        let page = log
            .history(&app_id(), 5, cursor.as_ref())
            .expect("history");
        seen.extend(page.entries.iter().map(|e| e.id.clone()));
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    let expected: Vec<ActivityId> = (0..17)
        .rev()
        .map(|i| ActivityId(format!("act-{i:02}")))
        .collect();
    assert_eq!(seen, expected);
}

#[test]
fn duplicate_timestamps_paginate_without_loss_or_overlap() {
    // Three distinct instants, several entries sharing each one. The id
    // tie-break keeps the walk total.
    let mut entries = Vec::new();
    for batch in 0..3 {
        let instant = base_time() + Duration::minutes(batch);
        for i in 0..4 {
            entries.push(entry(&format!("act-{batch}{i}"), instant));
        }
    }
    let log = log_with(EngineConfig::default(), entries);

    let mut seen = Vec::new();
    let mut cursor: Option<ActivityCursor> = None;
    loop {
        let page = log
            .history(&app_id(), 3, cursor.as_ref())
            .expect("history");
        for activity in &page.entries {
            assert!(
                !seen.contains(&activity.id),
                "entry {} visited twice",
                activity.id
            );
            seen.push(activity.id.clone());
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    assert_eq!(seen.len(), 12);

    // Newest batch first, ids descending within a shared timestamp.
    assert_eq!(seen[0], ActivityId("act-23".to_string()));
    assert_eq!(seen[11], ActivityId("act-00".to_string()));
}

#[test]
fn entries_appended_mid_walk_stay_invisible_to_the_open_cursor() {
    let entries = (0..6)
        .map(|i| entry(&format!("act-{i:02}"), base_time() + Duration::seconds(i)))
        .collect();
    let log = log_with(EngineConfig::default(), entries);

    let first = log.history(&app_id(), 3, None).expect("history");
    let cursor = first.next_cursor.expect("more pages remain");

    // A concurrent writer appends a newer entry between page fetches.
    log.append(entry("act-99", base_time() + Duration::hours(1)))
        .expect("append succeeds");

    let second = log.history(&app_id(), 3, Some(&cursor)).expect("history");
    assert_eq!(second.entries.len(), 3);
    assert!(second
        .entries
        .iter()
        .all(|e| e.id != ActivityId("act-99".to_string())));
    assert!(!second.has_more);

    // A fresh walk from the top does see it.
    let fresh = log.history(&app_id(), 3, None).expect("history");
    assert_eq!(fresh.entries[0].id, ActivityId("act-99".to_string()));
}

#[test]
fn history_is_scoped_to_one_application() {
    let repository = Arc::new(MemoryActivities::default());
    let log = ActivityLog::new(repository, EngineConfig::default());
    log.append(entry("act-01", base_time())).expect("append");

    let mut other = entry("act-02", base_time());
    other.application_id = ApplicationId("app-other".to_string());
    log.append(other).expect("append");

    let page = log.history(&app_id(), 10, None).expect("history");
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].id, ActivityId("act-01".to_string()));
}

#[test]
fn payloads_serialize_with_a_type_tag() {
    let env = Env::with_job(standard_job());
    let application = env.submit("job-1", "seeker-1");
    let machine = env.stage_machine();
    machine
        .move_stage(
            &application.id,
            crate::pipeline::stage_machine::StageMoveRequest::to(
                crate::pipeline::domain::Stage::Shortlisted,
            ),
            &actor(),
        )
        .expect("move succeeds");

    let activities = env.activities.all_for(&application.id);
    let json = serde_json::to_string(&activities[1].payload).expect("serializes");
    assert!(json.contains(r#""type":"stage_changed""#), "got {json}");
    assert!(json.contains(r#""to_stage":"shortlisted""#), "got {json}");

    let back: ActivityPayload = serde_json::from_str(&json).expect("round trips");
    assert_eq!(back, activities[1].payload);
}
