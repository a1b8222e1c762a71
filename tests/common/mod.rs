#![allow(dead_code)]

use std::net::SocketAddr;

use actix_web::{test, web};
use serde_json::{Value, json};
use tempfile::TempDir;

use hrm_records::auth::session::{ROLE_HEADER, USER_HEADER};
use hrm_records::config::Config;
use hrm_records::model::employee::Employee;
use hrm_records::model::role::{Actor, Role};
use hrm_records::routes::{self, Limiters};
use hrm_records::store::Store;
use hrm_records::workflow::employees;

pub fn employee() -> Actor {
    Actor::new("eve", Role::Employee)
}

pub fn manager() -> Actor {
    Actor::new("mia", Role::Manager)
}

pub fn accountant() -> Actor {
    Actor::new("carl", Role::Accountant)
}

pub fn admin() -> Actor {
    Actor::new("root", Role::Admin)
}

pub fn ada_json() -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "department": "Engineering",
        "position": "Analyst",
        "dateHired": "2024-01-01",
        "salary": "50000",
        "email": "ada@example.com",
        "bankDetails": "Kingston Branch",
        "accountNumber": "0042"
    })
}

pub fn ada() -> Employee {
    serde_json::from_value(ada_json()).unwrap()
}

/// An in-memory store holding Ada as a live employee. Returns her id.
pub fn store_with_ada() -> (Store, String) {
    let store = Store::in_memory();
    let submission = employees::submit(&store, &manager(), ada()).unwrap();
    (store, submission.id)
}

// Temp directory holding a file-backed store
pub struct TestStore {
    pub dir: TempDir,
    pub path: std::path::PathBuf,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hrm-store.json");
        TestStore { dir, path }
    }

    pub fn open(&self) -> Store {
        Store::open(&self.path).unwrap()
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|_| None).unwrap()
}

/// Route table plus store, ready for `App::configure`.
pub fn app_routes(store: web::Data<Store>) -> impl FnOnce(&mut web::ServiceConfig) {
    let config = test_config();
    let limiters = Limiters::from_config(&config).unwrap();
    move |cfg| {
        cfg.app_data(store);
        routes::configure(cfg, &config.api_prefix, &limiters);
    }
}

fn peer() -> SocketAddr {
    "127.0.0.1:8080".parse().unwrap()
}

/// Request from a client without a session.
pub fn anonymous(req: test::TestRequest) -> test::TestRequest {
    req.peer_addr(peer())
}

/// Request carrying a session for `role`.
pub fn as_role(req: test::TestRequest, role: &str) -> test::TestRequest {
    req.peer_addr(peer())
        .insert_header((ROLE_HEADER, role))
        .insert_header((USER_HEADER, format!("test-{role}")))
}
