//! bootstrap(): configuration errors and serving declared steps.

use std::path::PathBuf;

use axum::http::{header, HeaderValue, StatusCode};
use form_bootstrap::{bootstrap, PathSetting, RouteConfig};
use tower_http::set_header::SetResponseHeaderLayer;

mod common;

use common::{app_1_config, app_1_views, fixtures, get, test_config};

const COOKIE: Option<&str> = Some("myCookie=1234");

fn error_message(config: form_bootstrap::AppConfig) -> String {
    match bootstrap(config) {
        Ok(_) => panic!("expected bootstrap to fail"),
        Err(e) => e.to_string(),
    }
}

#[test]
fn test_must_be_given_a_list_of_routes() {
    assert_eq!(error_message(test_config()), "Must be called with a list of routes");
}

#[test]
fn test_routes_must_each_have_steps() {
    let mut config = test_config();
    config.routes = Some(vec![RouteConfig::default()]);
    assert_eq!(
        error_message(config),
        "Each route must define a set of one or more steps"
    );
}

#[test]
fn test_requires_the_fields_path_to_be_valid() {
    let mut config = test_config();
    config.fields = PathSetting::from("not_a_valid_path");
    config.routes = Some(vec![RouteConfig::with_steps(Vec::<String>::new())]);
    assert_eq!(
        error_message(config),
        format!("Cannot find fields at {}", fixtures().join("not_a_valid_path").display())
    );
}

#[test]
fn test_requires_the_route_fields_path_to_be_valid() {
    let mut config = test_config();
    config.fields = PathSetting::from("");
    let mut route = RouteConfig::with_steps(Vec::<String>::new());
    route.fields = Some(PathBuf::from("not_a_valid_path"));
    config.routes = Some(vec![route]);
    assert_eq!(
        error_message(config),
        format!("Cannot find route fields at {}", fixtures().join("not_a_valid_path").display())
    );
}

#[test]
fn test_requires_the_views_path_to_be_valid() {
    let mut config = test_config();
    config.views = PathSetting::from("not_a_valid_path");
    config.routes = Some(vec![RouteConfig::with_steps(Vec::<String>::new())]);
    assert_eq!(
        error_message(config),
        format!("Cannot find views at {}", fixtures().join("not_a_valid_path").display())
    );
}

#[test]
fn test_requires_the_route_views_path_to_be_valid() {
    let mut config = test_config();
    let mut route = RouteConfig::with_steps(Vec::<String>::new());
    route.views = Some(PathBuf::from("not_a_valid_path"));
    config.routes = Some(vec![route]);
    assert_eq!(
        error_message(config),
        format!("Cannot find route views at {}", fixtures().join("not_a_valid_path").display())
    );
}

#[test]
fn test_returns_the_app() {
    let app = bootstrap(app_1_config(&["/one"])).unwrap();
    assert_eq!(app.config().port, 8080);
    assert_eq!(app.config().session.name, "hod.sid");
}

#[tokio::test]
async fn test_bootstrap_does_not_bind_when_start_is_set() {
    let mut config = app_1_config(&["/one"]);
    config.start = true;
    config.port = 0;
    let app = bootstrap(config).unwrap();
    assert!(app.config().start);

    let res = get(&app.router(), "/one", COOKIE).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_responds_successfully_to_get_requests() {
    let router = bootstrap(app_1_config(&["/one"])).unwrap().into_router();
    let res = get(&router, "/one", COOKIE).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_serves_the_view_for_each_step() {
    let router = bootstrap(app_1_config(&["/one", "/two"])).unwrap().into_router();

    let res = get(&router, "/one", COOKIE).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "<div>one</div>\n");
    assert!(res.header(header::CONTENT_TYPE).unwrap().starts_with("text/html"));

    let res = get(&router, "/two", COOKIE).await;
    assert_eq!(res.body, "<div>two</div>\n");
}

#[tokio::test]
async fn test_responds_with_404_if_not_found() {
    let router = bootstrap(app_1_config(&["/one"])).unwrap().into_router();
    let res = get(&router, "/not_here", COOKIE).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_uses_the_route_base_url() {
    let mut config = app_1_config(&["/one"]);
    if let Some(routes) = config.routes.as_mut() {
        routes[0].base_url = Some("/app_1".into());
    }
    let router = bootstrap(config).unwrap().into_router();

    let res = get(&router, "/app_1/one", COOKIE).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "<div>one</div>\n");

    assert_eq!(get(&router, "/one", COOKIE).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_can_be_given_a_route_param() {
    let mut config = app_1_config(&["/one"]);
    if let Some(routes) = config.routes.as_mut() {
        routes[0].params = Some("/:action?".into());
    }
    let router = bootstrap(config).unwrap().into_router();

    let res = get(&router, "/one/param", COOKIE).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "<div>one</div>\n");

    assert_eq!(get(&router, "/one", COOKIE).await.status, StatusCode::OK);
    assert_eq!(get(&router, "/one/param/extra", COOKIE).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_global_views_serve_steps() {
    let mut config = test_config();
    config.views = PathSetting::from(app_1_views());
    config.routes = Some(vec![RouteConfig::with_steps(["/one"])]);
    let router = bootstrap(config).unwrap().into_router();

    let res = get(&router, "/one", COOKIE).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "<div>one</div>\n");
}

#[tokio::test]
async fn test_missing_step_view_is_a_server_error() {
    let router = bootstrap(app_1_config(&["/three"])).unwrap().into_router();
    let res = get(&router, "/three", COOKIE).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_requests_without_cookies_are_probed() {
    let router = bootstrap(app_1_config(&["/one"])).unwrap().into_router();

    let res = get(&router, "/one", None).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.header(header::LOCATION), Some("/one?hof-cookie-check"));

    let res = get(&router, "/one?hof-cookie-check", None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_new_sessions_get_a_cookie() {
    let router = bootstrap(app_1_config(&["/one"])).unwrap().into_router();

    let res = get(&router, "/one", COOKIE).await;
    let pair = res.cookie_pair("hod.sid").expect("session cookie");

    let res = get(&router, "/one", Some(&format!("myCookie=1234; {}", pair))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.cookie_pair("hod.sid").is_none());
}

#[tokio::test]
async fn test_cookie_and_terms_pages_use_global_views() {
    let mut config = test_config();
    let mut route = RouteConfig::with_steps(["/one"]);
    route.views = Some(app_1_views());
    config.routes = Some(vec![route]);
    let router = bootstrap(config).unwrap().into_router();

    let res = get(&router, "/cookies", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "<div>cookies</div>\n");

    let res = get(&router, "/terms-and-conditions", None).await;
    assert_eq!(res.body, "<div>terms</div>\n");
}

#[tokio::test]
async fn test_pages_can_be_switched_off() {
    let mut config = test_config();
    config.get_cookies = false;
    config.get_terms = false;
    config.routes = Some(vec![RouteConfig::with_steps(Vec::<String>::new())]);
    let router = bootstrap(config).unwrap().into_router();

    assert_eq!(get(&router, "/cookies", None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(get(&router, "/terms-and-conditions", None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_serves_public_assets() {
    let router = bootstrap(app_1_config(&["/one"])).unwrap().into_router();
    let res = get(&router, "/public/app.css", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "body { margin: 0; }\n");
}

#[tokio::test]
async fn test_response_headers() {
    let router = bootstrap(app_1_config(&["/one"])).unwrap().into_router();
    let res = get(&router, "/one", COOKIE).await;
    assert_eq!(res.header(header::X_CONTENT_TYPE_OPTIONS), Some("nosniff"));
    assert_eq!(res.header(header::X_FRAME_OPTIONS), Some("DENY"));
    assert!(res.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_use_layer_wraps_every_route() {
    let app = bootstrap(app_1_config(&["/one"])).unwrap().use_layer(
        SetResponseHeaderLayer::overriding(
            header::HeaderName::from_static("x-app"),
            HeaderValue::from_static("forms"),
        ),
    );
    let router = app.into_router();

    let res = get(&router, "/one", COOKIE).await;
    assert_eq!(res.header(header::HeaderName::from_static("x-app")), Some("forms"));
    let res = get(&router, "/not_here", COOKIE).await;
    assert_eq!(res.header(header::HeaderName::from_static("x-app")), Some("forms"));
}

#[test]
fn test_duplicate_steps_fail_before_mounting() {
    let mut config = app_1_config(&["/one"]);
    config.routes.as_mut().unwrap().push(RouteConfig::with_steps(["/one"]));
    assert_eq!(error_message(config), "Path /one is declared by more than one step");
}

#[test]
fn test_param_names_do_not_separate_duplicate_steps() {
    let mut config = app_1_config(&["/one"]);
    let routes = config.routes.as_mut().unwrap();
    routes[0].params = Some("/:action".into());
    let mut second = RouteConfig::with_steps(["/one"]);
    second.params = Some("/:id".into());
    routes.push(second);

    assert_eq!(error_message(config), "Path /one/{id} is declared by more than one step");
}

#[test]
fn test_steps_are_checked_before_paths() {
    let mut config = test_config();
    config.fields = PathSetting::from("not_a_valid_path");
    config.views = PathSetting::from("not_a_valid_path");
    config.routes = Some(vec![RouteConfig::default()]);
    assert_eq!(
        error_message(config),
        "Each route must define a set of one or more steps"
    );
}

#[test]
fn test_fields_are_checked_before_views() {
    let mut config = test_config();
    config.fields = PathSetting::from("not_a_valid_path");
    config.views = PathSetting::from("not_a_valid_views");
    let mut route = RouteConfig::with_steps(["/one"]);
    route.views = Some(PathBuf::from("not_a_valid_route_views"));
    config.routes = Some(vec![route]);
    assert_eq!(
        error_message(config),
        format!("Cannot find fields at {}", fixtures().join("not_a_valid_path").display())
    );
}

#[test]
fn test_global_views_are_checked_before_route_paths() {
    let mut config = test_config();
    config.views = PathSetting::from("not_a_valid_views");
    let mut route = RouteConfig::with_steps(["/one"]);
    route.fields = Some(PathBuf::from("not_a_valid_route_fields"));
    config.routes = Some(vec![route]);
    assert_eq!(
        error_message(config),
        format!("Cannot find views at {}", fixtures().join("not_a_valid_views").display())
    );
}
