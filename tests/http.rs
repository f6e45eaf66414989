use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct ActivityBody {
    max_participants: u32,
    participants: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DetailBody {
    detail: String,
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

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/activities")).send().await {
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
    let child = Command::new(env!("CARGO_BIN_EXE_activity_board"))
        .env("PORT", port.to_string())
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

async fn participants(client: &Client, base_url: &str, activity: &str) -> Vec<String> {
    let mut catalog: BTreeMap<String, ActivityBody> = client
        .get(format!("{base_url}/activities"))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap()
        .json()
        .await
        .unwrap();
    catalog.remove(activity).expect("activity listed").participants
}

async fn unregister(client: &Client, base_url: &str, activity: &str, email: &str) -> reqwest::Response {
    client
        .delete(format!("{base_url}/activities/{activity}/unregister"))
        .query(&[("email", email)])
        .send()
        .await
        .unwrap()
}

async fn signup(client: &Client, base_url: &str, activity: &str, email: &str) -> reqwest::Response {
    client
        .post(format!("{base_url}/activities/{activity}/signup"))
        .query(&[("email", email)])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_signup_and_unregister_flow() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let activity = "Chess Club";
    let email = "test_user@example.com";

    unregister(&client, &server.base_url, activity, email).await;

    let response = signup(&client, &server.base_url, activity, email).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageBody = response.json().await.unwrap();
    assert!(body.message.contains(&format!("Signed up {email}")));
    assert!(participants(&client, &server.base_url, activity).await.contains(&email.to_string()));

    let response = unregister(&client, &server.base_url, activity, email).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageBody = response.json().await.unwrap();
    assert!(body.message.contains(&format!("Removed {email}")));
    assert!(!participants(&client, &server.base_url, activity).await.contains(&email.to_string()));
}

#[tokio::test]
async fn http_duplicate_signup_returns_400() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let activity = "Programming Class";
    let email = "dup_user@example.com";

    unregister(&client, &server.base_url, activity, email).await;

    let first = signup(&client, &server.base_url, activity, email).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = signup(&client, &server.base_url, activity, email).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: DetailBody = second.json().await.unwrap();
    assert!(body.detail.to_lowercase().contains("already signed up"));

    unregister(&client, &server.base_url, activity, email).await;
}

#[tokio::test]
async fn http_unregister_nonexistent_returns_404() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let activity = "Tennis Club";
    let email = "noone@example.com";

    unregister(&client, &server.base_url, activity, email).await;

    let response = unregister(&client, &server.base_url, activity, email).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: DetailBody = response.json().await.unwrap();
    assert!(body.detail.to_lowercase().contains("not found"));
}

#[tokio::test]
async fn http_unknown_activity_returns_404() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = signup(&client, &server.base_url, "Underwater Basket Weaving", "a@x.com").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: DetailBody = response.json().await.unwrap();
    assert_eq!(body.detail, "Activity not found");
}

#[tokio::test]
async fn http_index_renders_one_card_per_activity() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let catalog: BTreeMap<String, ActivityBody> = client
        .get(format!("{}/activities", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(catalog.values().all(|activity| activity.max_participants > 0));

    let page = client
        .get(&server.base_url)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(page.matches(r#"class="activity-card""#).count(), catalog.len());
    assert_eq!(page.matches("<option ").count(), catalog.len() + 1);
}

#[tokio::test]
async fn http_missing_email_returns_detail() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/activities/Chess Club/signup", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: DetailBody = response.json().await.unwrap();
    assert!(body.detail.contains("email"));
}

#[tokio::test]
async fn http_activities_listed_in_seed_order() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let catalog: indexmap::IndexMap<String, ActivityBody> = client
        .get(format!("{}/activities", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<_> = catalog.keys().map(String::as_str).collect();
    assert_eq!(&names[..3], ["Chess Club", "Programming Class", "Gym Class"]);
}
