use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};

use crate::model::TimelineSnapshot;

fn day(today: NaiveDate, offset: i64) -> String {
    (today + Duration::days(offset)).format("%Y-%m-%d").to_string()
}

fn task(id: &str, name: &str, today: NaiveDate, from: i64, to: i64, progress: f32) -> Value {
    json!({
        "id": id,
        "name": name,
        "start": day(today, from),
        "end": day(today, to),
        "progress": progress,
    })
}

fn subtask(parent: &str, name: &str, today: NaiveDate, from: i64, to: i64, progress: f32) -> Value {
    json!({
        "parentId": parent,
        "name": name,
        "start": day(today, from),
        "end": day(today, to),
        "progress": progress,
    })
}

/// A demonstration wedding about eight months out from `today`.
///
/// Dates are mixed on purpose (ISO strings, epoch millis, provider
/// timestamps) so the sample exercises every input shape.
pub fn sample_snapshot(today: NaiveDate) -> TimelineSnapshot {
    let mut snapshot = TimelineSnapshot::new("Sample Wedding");

    // ── Parent tasks ────────────────────────────────────────────
    let mut venue = task("venue", "Book the venue", today, -60, 30, 70.0);
    venue["riskLevel"] = json!("ok");

    let mut catering = task("catering", "Catering", today, -20, 120, 35.0);
    catering["riskLevel"] = json!("warning");
    catering["riskMessage"] = json!("Menu tasting not scheduled yet");

    let mut attire = task("attire", "Dress & suit", today, 10, 200, 0.0);
    attire["riskLevel"] = json!("critical");
    attire["riskMessage"] = json!("Fittings need at least 12 weeks");

    let mut music = task("music", "Music & DJ", today, 40, 150, 10.0);
    music["dependencies"] = json!(["venue"]);

    let start_ms = (today - Duration::days(5)).and_hms_opt(0, 0, 0).map(|d| d.and_utc().timestamp_millis());
    let invitations = json!({
        "id": "invitations",
        "title": "Invitations",
        "startDate": start_ms,
        "endDate": day(today, 90),
        "progress": "20%",
    });

    let save_the_date = json!({
        "name": "Save the date sent",
        "type": "milestone",
        "date": day(today, 25),
    });

    snapshot.tasks = vec![venue, catering, attire, music, invitations, save_the_date];

    // ── Subtasks ───────────────────────────────────────────────
    snapshot.subtasks = vec![
        subtask("venue", "Shortlist venues", today, -60, -50, 100.0),
        subtask("venue", "Site visits", today, -45, -40, 100.0),
        subtask("venue", "Sign contract", today, -10, -8, 100.0),
        subtask("venue", "Pay deposit", today, 25, 30, 0.0),
        subtask("catering", "Request quotes", today, -20, -12, 100.0),
        subtask("catering", "Menu tasting", today, 30, 30, 0.0),
        subtask("catering", "Final headcount", today, 110, 120, 0.0),
        subtask("attire", "First fitting", today, 60, 61, 0.0),
        subtask("attire", "Second fitting", today, 150, 151, 0.0),
        subtask("attire", "Final fitting", today, 195, 200, 0.0),
        subtask("invitations", "Design", today, -5, 10, 60.0),
        subtask("invitations", "Print", today, 15, 20, 0.0),
        subtask("invitations", "Post", today, 85, 90, 0.0),
    ];

    let registered = (today - Duration::days(75)).and_hms_opt(0, 0, 0).map(|d| d.and_utc().timestamp());
    snapshot.bounds.registered_at = json!({ "seconds": registered, "nanoseconds": 0 });
    snapshot.bounds.target_date = json!(day(today, 240));
    snapshot
}
