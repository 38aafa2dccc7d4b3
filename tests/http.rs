use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct ProgressReport {
    week: u32,
    overall: f64,
    weeks_logged: usize,
    rank: Rank,
    next_rank: Option<Rank>,
}

#[derive(Debug, Deserialize)]
struct Rank {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AchievementPass {
    week: u32,
    achievement: Option<Value>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("challenge_tracker_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/config")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_challenge_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("CHALLENGE_START_DATE", "2026-01-12")
        .env("CHALLENGE_WEEKS", "10")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn register(client: &Client, base_url: &str, user_id: &str, profile: Value) {
    let response = client
        .put(format!("{base_url}/api/users/{user_id}"))
        .json(&profile)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn log_workout(client: &Client, base_url: &str, user_id: &str, workout: Value) -> Value {
    let response = client
        .post(format!("{base_url}/api/users/{user_id}/logs"))
        .json(&workout)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

async fn progress(client: &Client, base_url: &str, user_id: &str, week: u32) -> ProgressReport {
    client
        .get(format!("{base_url}/api/users/{user_id}/progress?week={week}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn achievement_pass(client: &Client, base_url: &str, user_id: &str, week: u32) -> AchievementPass {
    client
        .post(format!("{base_url}/api/users/{user_id}/weeks/{week}/achievements"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_full_week_unlocks_every_category_then_the_week() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();

    register(&client, base, "full-week", json!({ "display_name": "Full Week" })).await;
    let submitted = log_workout(
        &client,
        base,
        "full-week",
        json!({
            "week": 1,
            "recovery_minutes": 60,
            "strength_lbs": 5000,
            "hiit_minutes": 45,
            "running_miles": 12
        }),
    )
    .await;

    assert_eq!(submitted["progress"]["overall"], json!(100.0));
    assert_eq!(submitted["achievement"]["kind"], "category_achieved");
    assert_eq!(submitted["achievement"]["category"], "recovery");

    let mut fired = Vec::new();
    for _ in 0..4 {
        let pass = achievement_pass(&client, base, "full-week", 1).await;
        assert_eq!(pass.week, 1);
        fired.push(pass.achievement);
    }
    assert_eq!(fired[0].as_ref().unwrap()["category"], "strength");
    assert_eq!(fired[1].as_ref().unwrap()["category"], "cardio");
    assert_eq!(fired[2].as_ref().unwrap()["category"], "hiit");
    assert_eq!(fired[3].as_ref().unwrap()["kind"], "weekly_mission_complete");

    let quiet = achievement_pass(&client, base, "full-week", 1).await;
    assert!(quiet.achievement.is_none());

    let report = progress(&client, base, "full-week", 1).await;
    assert_eq!(report.week, 1);
    assert_eq!(report.weeks_logged, 1);
    assert_eq!(report.rank.name, "Private");
    assert_eq!(report.next_rank.map(|rank| rank.name), Some("Tactician".to_string()));
}

#[tokio::test]
async fn http_zero_week_halves_progress_and_reset_restores_it() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();

    register(&client, base, "two-weeks", json!({ "display_name": "Two Weeks" })).await;
    log_workout(
        &client,
        base,
        "two-weeks",
        json!({
            "week": 1,
            "recovery_minutes": 60,
            "strength_lbs": 5000,
            "hiit_minutes": 45,
            "cycling_miles": 40
        }),
    )
    .await;
    log_workout(&client, base, "two-weeks", json!({ "week": 2 })).await;

    let report = progress(&client, base, "two-weeks", 2).await;
    assert_eq!(report.weeks_logged, 2);
    assert_eq!(report.overall, 50.0);
    assert_eq!(report.rank.name, "Spark");

    let reset: Value = client
        .delete(format!("{base}/api/users/two-weeks/weeks/2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reset["removed"], 1);

    let report = progress(&client, base, "two-weeks", 1).await;
    assert_eq!(report.weeks_logged, 1);
    assert_eq!(report.overall, 100.0);

    let reset: Value = client
        .delete(format!("{base}/api/users/two-weeks/logs"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reset["removed"], 1);
    let report = progress(&client, base, "two-weeks", 1).await;
    assert_eq!(report.overall, 0.0);
    assert_eq!(report.rank.name, "Recruit");
}

#[tokio::test]
async fn http_rejects_bad_submissions() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();

    register(&client, base, "strict", json!({ "display_name": "Strict" })).await;

    let negative = client
        .post(format!("{base}/api/users/strict/logs"))
        .json(&json!({ "week": 1, "hiit_minutes": -5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);

    let out_of_range = client
        .post(format!("{base}/api/users/strict/logs"))
        .json(&json!({ "week": 11, "hiit_minutes": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);

    let unknown = client
        .post(format!("{base}/api/users/nobody/logs"))
        .json(&json!({ "week": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let logs: Vec<Value> = client
        .get(format!("{base}/api/users/strict/logs"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(logs.is_empty());
}

#[tokio::test]
async fn http_team_leaderboard_orders_by_member_average() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();

    for (id, team) in [("lb-a", "Lb Alpha"), ("lb-b", "Lb Alpha"), ("lb-c", "Lb Bravo")] {
        register(
            &client,
            base,
            id,
            json!({
                "display_name": id,
                "participant_category": "soldier",
                "duty_status": "TPU",
                "team_name": team
            }),
        )
        .await;
    }
    log_workout(&client, base, "lb-a", json!({ "week": 1, "strength_lbs": 20000 })).await;
    log_workout(&client, base, "lb-c", json!({ "week": 1, "strength_lbs": 15000 })).await;

    let board: Value = client
        .get(format!("{base}/api/leaderboard?board=teams"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(board["kind"], "teams");

    let teams = board["entries"].as_array().unwrap();
    let position = |name: &str| {
        teams
            .iter()
            .position(|team| team["name"] == name)
            .expect("team missing")
    };
    assert!(position("Lb Bravo") < position("Lb Alpha"));
    assert_eq!(teams[position("Lb Alpha")]["average_progress"], json!(50.0));
    assert_eq!(teams[position("Lb Bravo")]["average_progress"], json!(75.0));
}
