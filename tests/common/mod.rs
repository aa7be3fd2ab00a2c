//! Minimal stand-in for the remote DHIS2 Web API, served on an ephemeral port.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use actix_web::http::header;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

pub const PROGRAM_ID: &str = "UxeePXLdng7";
pub const ROOT_ID: &str = "ImspTQPwCqd";
pub const LEAF_ID: &str = "O6uvpzGd5pu";
/// Child unit whose event queries fail with a server error.
pub const BROKEN_ID: &str = "BrokenUnit1";
/// Child unit without any events.
pub const EMPTY_ID: &str = "EmptyUnit01";
/// Unit the server does not know.
pub const MISSING_ID: &str = "Missing0001";

/// One request as seen by the fake server.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
}

type RequestLog = Arc<Mutex<Vec<RecordedRequest>>>;

pub struct FakeDhis2 {
    pub base_url: String,
    requests: RequestLog,
}

impl FakeDhis2 {
    /// Starts the server on its own thread and runtime.
    pub fn start() -> Self {
        let requests: RequestLog = Arc::default();
        let log = requests.clone();
        let (tx, rx) = mpsc::channel::<SocketAddr>();

        thread::spawn(move || {
            actix_web::rt::System::new().block_on(async move {
                let server = HttpServer::new(move || {
                    App::new()
                        .app_data(web::Data::new(log.clone()))
                        .route("/api/organisationUnits", web::get().to(root_units))
                        .route("/api/organisationUnits/{id}", web::get().to(unit))
                        .route("/api/events", web::get().to(events))
                })
                .workers(1)
                .bind(("127.0.0.1", 0))
                .expect("bind fake DHIS2 server");
                tx.send(server.addrs()[0]).expect("publish fake DHIS2 address");
                server.run().await
            })
        });

        let addr = rx.recv().expect("fake DHIS2 server did not start");
        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self, path: &str) -> Option<RecordedRequest> {
        self.requests().into_iter().rev().find(|r| r.path == path)
    }
}

fn record(
    log: &RequestLog,
    req: &HttpRequest,
    query: &HashMap<String, String>,
) {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    log.lock().unwrap().push(RecordedRequest {
        path: req.path().to_string(),
        query: query.clone(),
        authorization,
    });
}

fn unit_json(id: &str, name: &str, path: &str, has_children: bool) -> Value {
    json!({ "id": id, "displayName": name, "path": path, "children": has_children })
}

async fn root_units(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    log: web::Data<RequestLog>,
) -> HttpResponse {
    record(&log, &req, &query);
    HttpResponse::Ok().json(json!({
        "organisationUnits": [unit_json(ROOT_ID, "South Sudan", "/ImspTQPwCqd", true)]
    }))
}

async fn unit(
    req: HttpRequest,
    id: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
    log: web::Data<RequestLog>,
) -> HttpResponse {
    record(&log, &req, &query);
    match id.as_str() {
        ROOT_ID => HttpResponse::Ok().json(json!({
            "id": ROOT_ID,
            "displayName": "South Sudan",
            "children": [
                unit_json(BROKEN_ID, "Yei", "/ImspTQPwCqd/BrokenUnit1", false),
                unit_json(LEAF_ID, "Juba", "/ImspTQPwCqd/O6uvpzGd5pu", false),
            ]
        })),
        MISSING_ID => HttpResponse::NotFound().finish(),
        other => HttpResponse::Ok().json(json!({
            "id": other,
            "displayName": other,
            "children": []
        })),
    }
}

fn event_json(id: &str, child: &str) -> Value {
    json!({
        "event": id,
        "eventDate": "2024-01-12T00:00:00.000",
        "orgUnit": LEAF_ID,
        "orgUnitName": "Juba",
        "dataValues": [
            { "dataElement": "ZVlvCTT6G4A", "value": child },
            { "dataElement": "FQTIz54NLN4", "value": "2024-01-11" },
            { "dataElement": "Ej58X2a6ZBA", "value": "South Sudanese" },
            { "dataElement": "cJ1lAdSRdOn", "value": "" }
        ]
    })
}

async fn events(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    log: web::Data<RequestLog>,
) -> HttpResponse {
    record(&log, &req, &query);
    if query.get("orgUnit").map(String::as_str) == Some(BROKEN_ID) {
        return HttpResponse::InternalServerError().finish();
    }

    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let page_size: usize = query
        .get("pageSize")
        .and_then(|p| p.parse().ok())
        .unwrap_or(50);
    let all = if query.get("orgUnit").map(String::as_str) == Some(EMPTY_ID) {
        Vec::new()
    } else {
        vec![
            event_json("evA0000001a", "Akech Deng"),
            event_json("evB0000002b", "Nyibol Garang"),
        ]
    };
    let items: Vec<Value> = all
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    HttpResponse::Ok().json(json!({
        "pager": {
            "page": page,
            "pageSize": page_size,
            "total": all.len(),
            "pageCount": all.len().div_ceil(page_size)
        },
        "events": items
    }))
}
