use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};

use axum::extract::{Form, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use service::listing::domain::{CashboxRecord, ErrorPayload};
use tokio::net::TcpListener;

use server::startup::{build_app, build_state};

const PAGE: &str = "<table class=\"items\"><tbody>\
    <tr><td>1</td><td>3</td><td>Kassa 1</td><td>10.3.0.11</td><td><img src=\"on.png\"></td><td>5.1</td><td><img src=\"open.png\"></td><td>0</td><td>Volkova</td></tr>\
    <tr><td>2</td><td>3</td><td>Kassa 2</td><td>10.3.0.12</td><td></td><td>5.2</td><td></td><td>0</td><td>Lebedev</td></tr>\
    </tbody></table>";

struct TestApp {
    base_url: String,
}

/// Stand-in for a point-of-sale console: form login plus the listing grid.
async fn console_login(Form(form): Form<HashMap<String, String>>) -> Response {
    if form.get("LoginForm[password]").map(String::as_str) == Some("secret") {
        (
            StatusCode::FOUND,
            AppendHeaders([
                (header::SET_COOKIE, "YII_CSRF_TOKEN=x; path=/"),
                (header::SET_COOKIE, "PHPSESSID=e2e-session; path=/"),
                (header::LOCATION, "/ukm/index.php"),
            ]),
        )
            .into_response()
    } else {
        (StatusCode::OK, AppendHeaders([(header::SET_COOKIE, "YII_CSRF_TOKEN=x; path=/")])).into_response()
    }
}

async fn console_listing(Query(_q): Query<HashMap<String, String>>, headers: HeaderMap) -> Response {
    match headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        Some("PHPSESSID=e2e-session") => (StatusCode::OK, PAGE).into_response(),
        _ => (StatusCode::FOUND, [(header::LOCATION, "/ukm/index.php?r=site/login")]).into_response(),
    }
}

async fn spawn(app: Router) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });
    Ok(addr)
}

async fn start_server(password: &str) -> anyhow::Result<TestApp> {
    let console = Router::new().route("/ukm/index.php", get(console_listing).post(console_login));
    let console_addr = spawn(console).await?;

    let cfg = configs::from_toml_str(&format!(
        r#"
[console]
username = "admin"
password = "{password}"
servers = ["127.0.0.1"]
port = {port}
timeout_secs = 2
"#,
        port = console_addr.port()
    ))?;

    let addr = spawn(build_app(build_state(&cfg)?)).await?;
    Ok(TestApp { base_url: format!("http://{}:{}", addr.ip(), addr.port()) })
}

#[tokio::test]
async fn e2e_listing_through_console() -> anyhow::Result<()> {
    let app = start_server("secret").await?;
    let res = reqwest::get(format!("{}/listing?ip=127.0.0.1", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let records = res.json::<Vec<CashboxRecord>>().await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Kassa 1");
    assert!(records[0].online && records[0].open);
    assert_eq!(records[0].cashier, "Volkova");
    Ok(())
}

#[tokio::test]
async fn e2e_bad_console_password_is_401() -> anyhow::Result<()> {
    let app = start_server("wrong").await?;
    let res = reqwest::get(format!("{}/listing?ip=127.0.0.1", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    let body = res.json::<ErrorPayload>().await?;
    assert_eq!(body, ErrorPayload { error: true, message: "invalid credentials".into(), code: 401 });
    Ok(())
}

#[tokio::test]
async fn e2e_servers_route() -> anyhow::Result<()> {
    let app = start_server("secret").await?;
    let res = reqwest::get(format!("{}/listing/servers", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?, json!(["127.0.0.1"]));
    Ok(())
}
