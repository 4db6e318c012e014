use std::{
    net::TcpListener,
    ops::Deref,
    path::Path,
    sync::{Arc, LazyLock},
};

use actix_web::{
    http::header::AUTHORIZATION, web, App, HttpRequest, HttpResponse, HttpServer,
};
use bursar_client_core::{
    configuration::ClientSettings, Client, MemoryStorage, RouteGuard, SessionStorage,
    SessionStore,
};
use bursar_shared::{
    req_args::LoginReqArgs,
    routes::RoutePolicy,
    telemetry::{self, get_subscriber, init_subscriber},
    uac::{AuthError, Identity},
};
use uuid::Uuid;

pub const PASSWORD: &str = "secret";
pub const DETAIL_BAD_CREDENTIALS: &str = "Incorrect username or password";
pub const DETAIL_BAD_TOKEN: &str = "Could not validate credentials";
pub const DETAIL_LOCKED: &str = "Account locked";

// Ensure that the `tracing` stack is only initialised once
pub static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("client_core_tests{}", Uuid::new_v4());
        let (file, path) =
            telemetry::create_trace_file_in(Path::new(telemetry::TRACE_FOLDER), &log_file_name)
                .unwrap();
        let subscriber = get_subscriber(subscriber_name, default_filter_level, file);
        init_subscriber(subscriber).unwrap();
        format!("Traces for tests being written to: {path:?}")
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).unwrap();
        "Traces set to std::io::sink".to_string()
    }
});

/// A user known to the mock authentication service. `groups` is sent as is so
/// `None` goes out as `null`
#[derive(Debug, Clone)]
pub struct MockUser {
    pub id: u64,
    pub username: &'static str,
    pub groups: Option<Vec<u64>>,
    pub locked: bool,
}

impl MockUser {
    pub fn token(&self) -> String {
        format!("token-{}", self.username)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "username": self.username,
            "groups": self.groups,
        })
    }
}

pub fn mock_users() -> Vec<MockUser> {
    vec![
        MockUser {
            id: 1,
            username: "admin",
            groups: Some(vec![1]),
            locked: false,
        },
        MockUser {
            id: 2,
            username: "backend",
            groups: Some(vec![2]),
            locked: false,
        },
        MockUser {
            id: 3,
            username: "accountant",
            groups: Some(vec![3]),
            locked: false,
        },
        MockUser {
            id: 4,
            username: "legacy",
            groups: None,
            locked: false,
        },
        MockUser {
            id: 5,
            username: "locked",
            groups: Some(vec![1]),
            locked: true,
        },
    ]
}

#[derive(serde::Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

async fn login(users: web::Data<Vec<MockUser>>, body: web::Json<LoginBody>) -> HttpResponse {
    let Some(user) = users
        .iter()
        .find(|u| u.username == body.username && body.password == PASSWORD)
    else {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "detail": DETAIL_BAD_CREDENTIALS
        }));
    };
    if user.locked {
        return HttpResponse::Forbidden().json(serde_json::json!({ "detail": DETAIL_LOCKED }));
    }
    HttpResponse::Ok().json(serde_json::json!({
        "access_token": user.token(),
        "token_type": "bearer",
        "user": user.to_json(),
    }))
}

async fn current_user(users: web::Data<Vec<MockUser>>, req: HttpRequest) -> HttpResponse {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    match token.and_then(|token| users.iter().find(|u| u.token() == token)) {
        Some(user) => HttpResponse::Ok().json(user.to_json()),
        None => {
            HttpResponse::Unauthorized().json(serde_json::json!({ "detail": DETAIL_BAD_TOKEN }))
        }
    }
}

pub struct TestApp<S = MemoryStorage> {
    pub address: String,
    pub store: SessionStore<S>,
    pub client: Client,
    pub policy: Arc<RoutePolicy>,
}

impl<S> std::fmt::Debug for TestApp<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestApp")
            .field("address", &self.address)
            .finish()
    }
}

impl<S: SessionStorage> TestApp<S> {
    pub async fn login_as(&mut self, username: &str) -> Result<Identity, AuthError> {
        self.login_with(username, PASSWORD).await
    }

    pub async fn login_with(&mut self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let args = LoginReqArgs::new(username, password.to_string().into());
        self.store.login(&self.client, &args).await
    }

    pub async fn fetch_profile(&mut self) -> Result<Identity, AuthError> {
        self.store.fetch_profile(&self.client).await
    }

    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(Arc::clone(&self.policy), self.store.handle())
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_storage(MemoryStorage::new()).await
}

/// Starts a mock authentication service on a random port and restores a
/// session from `storage`
pub async fn spawn_app_with_storage<S: SessionStorage>(storage: S) -> TestApp<S> {
    start_tracing();
    let address = start_mock_server();
    let store = SessionStore::restore(storage);
    let client = build_client(&address, &store);
    TestApp {
        address,
        store,
        client,
        policy: Arc::new(RoutePolicy::default()),
    }
}

pub fn build_client<S: SessionStorage>(address: &str, store: &SessionStore<S>) -> Client {
    let settings = ClientSettings {
        server_address: address.to_string(),
        request_timeout_secs: 5,
    };
    Client::new(&settings, store.handle()).expect("failed to build client")
}

/// Address that nothing is listening on
pub fn unused_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port_to_test_address(port)
}

pub fn port_to_test_address(port: u16) -> String {
    format!("http://127.0.0.1:{port}")
}

fn start_mock_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let users = web::Data::new(mock_users());
    let server = HttpServer::new(move || {
        App::new()
            .app_data(users.clone())
            .route("/login", web::post().to(login))
            .route("/login/me", web::get().to(current_user))
    })
    .workers(1)
    .listen(listener)
    .expect("failed to listen on random port")
    .run();
    tokio::spawn(server);
    port_to_test_address(port)
}

fn start_tracing() {
    // Accessing TRACING also forces the LazyLock to initialize
    let logging_msg = TRACING.deref();
    println!("{logging_msg}");
}

/// Empty function for use when a call back isn't needed
pub fn no_cb() {}
