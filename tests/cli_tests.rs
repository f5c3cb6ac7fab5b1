use axum::extract::Path;
use axum::routing::{get, post};
use axum::{Json, Router};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::{Value, json};

mod common;
use common::{TECH, jt, setup_test_db, temp_out};

fn init(db: &str) {
    jt().args(["--db", db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));
}

/// Every command runs offline with a fixed technician unless stated otherwise.
fn offline(db: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    jt().args(["--db", db, "--offline", "--technician", TECH])
        .args(args)
        .assert()
}

/// A minimal timer server on its own thread, so the blocking CLI calls
/// below do not starve it.
fn spawn_server() -> String {
    async fn ok(Path(job): Path<i64>) -> Json<Value> {
        Json(json!({ "success": true, "timer": { "jobId": job } }))
    }

    let app = Router::new()
        .route(
            "/api/jobs/technician/:name/active-timer",
            get(|| async { Json(json!({ "activeTimer": null })) }),
        )
        .route("/api/jobs/:id/timer/start", post(ok))
        .route("/api/jobs/:id/timer/stop", post(ok))
        .route(
            "/api/jobs/:id/timers",
            get(|Path(job): Path<i64>| async move {
                Json(json!({
                    "success": true,
                    "timers": [{
                        "id": 1,
                        "jobId": job,
                        "technicianName": "Dana",
                        "startTime": "2026-10-19T08:00:00Z",
                        "endTime": "2026-10-19T08:45:00Z",
                        "durationMinutes": 45
                    }]
                }))
            }),
        );

    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    format!("http://{}/api", rx.recv().unwrap())
}

#[test]
fn test_init_creates_store() {
    let db = setup_test_db("cli_init");
    init(&db);
    assert!(std::path::Path::new(&db).exists());
}

#[test]
fn test_offline_start_is_queued() {
    let db = setup_test_db("cli_offline_start");
    init(&db);

    offline(&db, &["start", "#7", "--notes", "boiler room"])
        .success()
        .stdout(contains("Started timer for job 7 offline"))
        .stdout(contains("1 action(s) queued while offline"));

    offline(&db, &["queue", "list"])
        .success()
        .stdout(contains("START"))
        .stdout(contains(TECH))
        .stdout(contains("boiler room"));

    offline(&db, &["status"])
        .success()
        .stdout(contains("Job 7 running since"))
        .stdout(contains("offline"));
}

#[test]
fn test_preconditions_are_enforced() {
    let db = setup_test_db("cli_preconditions");
    init(&db);

    offline(&db, &["stop", "7"])
        .failure()
        .stderr(contains("No active timer for job 7"));

    offline(&db, &["start", "7"]).success();

    offline(&db, &["start", "8"])
        .failure()
        .stderr(contains("already running for job 7"));

    offline(&db, &["start", "7"])
        .success()
        .stdout(contains("Timer already running for job 7"));

    offline(&db, &["stop", "7"])
        .success()
        .stdout(contains("Stopped timer for job 7"))
        .stdout(contains("2 action(s) queued while offline"));

    offline(&db, &["status"])
        .success()
        .stdout(contains("No timer running"));
}

#[test]
fn test_invalid_job_id() {
    let db = setup_test_db("cli_invalid_job");
    init(&db);

    offline(&db, &["start", "abc"])
        .failure()
        .stderr(contains("Invalid job id: abc"));
    offline(&db, &["start", "0"]).failure();
}

#[test]
fn test_missing_technician() {
    let db = setup_test_db("cli_missing_tech");
    init(&db);

    jt().args(["--db", &db, "--offline", "--technician", "  ", "start", "7"])
        .assert()
        .failure()
        .stderr(contains("Missing technician"));
}

#[test]
fn test_sync_while_offline_keeps_queue() {
    let db = setup_test_db("cli_sync_offline");
    init(&db);

    offline(&db, &["start", "3"]).success();

    offline(&db, &["sync"])
        .success()
        .stdout(contains("offline, nothing sent"));

    offline(&db, &["queue"])
        .success()
        .stdout(contains("1 action(s)"));
}

#[test]
fn test_queue_remove_and_clear() {
    let db = setup_test_db("cli_queue_edit");
    init(&db);

    offline(&db, &["start", "1"]).success();
    offline(&db, &["stop", "1"]).success();

    offline(&db, &["queue", "remove", "not-an-id", "--yes"])
        .failure()
        .stderr(contains("Queued action not found"));

    offline(&db, &["queue", "clear", "-y"])
        .success()
        .stdout(contains("Cleared 2 queued action(s)"));

    offline(&db, &["queue", "list"])
        .success()
        .stdout(contains("Offline queue is empty"));

    offline(&db, &["queue", "clear", "-y"])
        .success()
        .stdout(contains("already empty"));
}

#[test]
fn test_log_records_queue_operations() {
    let db = setup_test_db("cli_log");
    init(&db);

    offline(&db, &["start", "5"]).success();

    offline(&db, &["log", "--print"])
        .success()
        .stdout(contains("init"))
        .stdout(contains("enqueue"))
        .stdout(contains("migration_applied"));

    offline(&db, &["log", "--print", "--last", "1"])
        .success()
        .stdout(contains("init").not());
}

#[test]
fn test_entries_need_the_server() {
    let db = setup_test_db("cli_entries_offline");
    init(&db);

    offline(&db, &["entries", "5"])
        .failure()
        .stderr(contains("not available offline"));
}

#[test]
fn test_queued_actions_replay_against_server() {
    let db = setup_test_db("cli_replay");
    init(&db);
    let server = spawn_server();

    offline(&db, &["start", "7"]).success();
    offline(&db, &["stop", "7"]).success();

    jt().args(["--db", &db, "--server", &server, "--technician", TECH, "sync"])
        .assert()
        .success()
        .stdout(contains("sent 2, failed 0, held 0"))
        .stdout(contains("all changes synced"));

    jt().args(["--db", &db, "--server", &server, "--technician", TECH, "start", "9"])
        .assert()
        .success()
        .stdout(contains("Started timer for job 9 (confirmed by server)"));

    offline(&db, &["queue", "list"])
        .success()
        .stdout(contains("Offline queue is empty"));
}

#[test]
fn test_entries_list_and_export() {
    let db = setup_test_db("cli_entries");
    init(&db);
    let server = spawn_server();

    jt().args(["--db", &db, "--server", &server, "entries", "4"])
        .assert()
        .success()
        .stdout(contains("Total on job 4"))
        .stdout(contains("00h 45m"));

    let out = temp_out("cli_entries_json", "json");
    jt().args([
        "--db", &db, "--server", &server, "entries", "4", "--export", "json", "--file", &out,
    ])
    .assert()
    .success()
    .stdout(contains("JSON export completed"));

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("\"minutes\": 45"));
    assert!(written.contains("\"technician\": \"Dana\""));

    let csv_out = temp_out("cli_entries_csv", "csv");
    jt().args([
        "--db", &db, "--server", &server, "entries", "4", "--export", "csv", "--file", &csv_out,
    ])
    .assert()
    .success();

    let written = std::fs::read_to_string(&csv_out).unwrap();
    assert!(written.starts_with("id,job_id,technician,start,end,minutes,notes"));

    // relative paths are refused
    jt().args([
        "--db", &db, "--server", &server, "entries", "4", "--export", "csv", "--file", "out.csv",
    ])
    .assert()
    .failure()
    .stderr(contains("must be absolute"));
}
