extern crate bible_passage_rs;
extern crate chrono;
extern crate futures;
extern crate hyper;
extern crate postgres;
extern crate serde_json;
#[macro_use]
extern crate tracing;
extern crate tracing_subscriber;
extern crate url;

use std::collections::HashMap;
use std::sync::Arc;

use bible_passage_rs::config::Config;
use bible_passage_rs::models::PassagesJson;
use bible_passage_rs::*;
use futures::future::{Future, FutureResult};
use hyper::service::{NewService, Service};
use hyper::{header, Body, Method, Request, Response, Server, StatusCode};
use postgres::{Connection, TlsMode};

struct AppState {
    config: Config,
    templates: Templates,
    cache: MemoryCache,
}

fn connect_db(url: &str) -> Result<PostgresVerseStore, ServiceError> {
    debug!("connecting to verse store");
    match Connection::connect(url, TlsMode::None) {
        Ok(connection) => Ok(PostgresVerseStore::new(connection)),
        Err(error) => {
            warn!("connection: {}", error);
            Err(ServiceError::NoDatabaseConnection(format!("{}", error)))
        }
    }
}

fn query_args(query: Option<&str>) -> HashMap<String, String> {
    let query = query.unwrap_or("");
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect::<HashMap<String, String>>()
}

fn citations_arg(args: &HashMap<String, String>) -> Result<String, ServiceError> {
    args.get("q")
        .map(|v| v.to_string())
        .filter(|s| !s.trim().is_empty())
        .ok_or(ServiceError::NoInput)
}

/// Wrappers from the query string are text, never markup.
fn render_options(args: &HashMap<String, String>) -> RenderOptions {
    let text = |name: &str| {
        args.get(name)
            .map(|value| templates::escape_html(value))
            .unwrap_or_default()
    };
    RenderOptions {
        show_count: args
            .get("count")
            .map(|v| v != "0" && v != "false")
            .unwrap_or(true),
        prefix: text("prefix"),
        postfix: text("postfix"),
        separator: text("separator"),
    }
}

fn respond(status: StatusCode, content_type: &str, body: Body) -> Response<Body> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(body)
        .unwrap_or_else(|error| {
            warn!("response: {}", error);
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        })
}

fn empty(status: StatusCode) -> Response<Body> {
    respond(status, "text/plain", Body::empty())
}

fn html(output: String) -> Response<Body> {
    respond(StatusCode::OK, "text/html; charset=utf-8", Body::from(output))
}

fn search_response(
    state: &AppState,
    store: &PostgresVerseStore,
    query: Option<&str>,
) -> Response<Body> {
    let args = query_args(query);
    match citations_arg(&args) {
        Ok(citations) => {
            info!("render {:?}", citations);
            let renderer = Citations::new(&state.templates, store, &state.cache);
            html(renderer.render_citations(&citations, &render_options(&args)))
        }
        Err(error) => {
            debug!("search: {}", error);
            empty(StatusCode::BAD_REQUEST)
        }
    }
}

fn passages_response(
    state: &AppState,
    store: &PostgresVerseStore,
    query: Option<&str>,
) -> Response<Body> {
    let args = query_args(query);
    let citations = match citations_arg(&args) {
        Ok(citations) => citations,
        Err(_) => return empty(StatusCode::BAD_REQUEST),
    };
    let renderer = Citations::new(&state.templates, store, &NoCache);
    let results = PassagesJson::from_entries(renderer.entries(&citations));
    match serde_json::to_string(&results) {
        Ok(json) => respond(StatusCode::OK, "application/json", Body::from(json)),
        Err(error) => {
            warn!("passages: {}", error);
            empty(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// Verse Of the Day
fn daily_response(state: &AppState, store: &PostgresVerseStore) -> Response<Body> {
    use chrono::{Datelike, Utc};

    let now = Utc::now();
    let citations = store.daily_citations(now.month(), now.day()).join("; ");
    let renderer = Citations::new(&state.templates, store, &state.cache);
    html(renderer.render_citations(&citations, &RenderOptions::default()))
}

enum Route {
    Search,
    Passages,
    Daily,
}

struct SearchService {
    state: Arc<AppState>,
}

impl NewService for SearchService {
    type ReqBody = Body;
    type ResBody = Body;
    type Error = ServiceError;
    type Service = SearchService;
    type Future = FutureResult<Self::Service, Self::InitError>;
    type InitError = ServiceError;

    fn new_service(&self) -> Self::Future {
        futures::future::ok(SearchService {
            state: self.state.clone(),
        })
    }
}

impl Service for SearchService {
    type ReqBody = Body;
    type ResBody = Body;
    type Error = ServiceError;
    type Future = FutureResult<Response<Self::ResBody>, Self::Error>;

    fn call(&mut self, request: Request<Self::ReqBody>) -> Self::Future {
        let route = match (request.method(), request.uri().path()) {
            (&Method::GET, "/") => Route::Search,
            (&Method::GET, "/passages") => Route::Passages,
            (&Method::GET, "/daily") => Route::Daily,
            _ => return futures::future::ok(empty(StatusCode::NOT_FOUND)),
        };

        let store = match connect_db(&self.state.config.database_url) {
            Ok(store) => store,
            Err(_) => return futures::future::ok(empty(StatusCode::INTERNAL_SERVER_ERROR)),
        };

        let state = &self.state;
        let query = request.uri().query();
        futures::future::ok(match route {
            Route::Search => search_response(state, &store, query),
            Route::Passages => passages_response(state, &store, query),
            Route::Daily => daily_response(state, &store),
        })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bible_passage_rs=info,bible_passage=info".into()),
        )
        .init();

    let config = Config::from_env();
    let templates = match &config.templates_dir {
        Some(dir) => match Templates::load(dir) {
            Ok(templates) => templates,
            Err(error) => {
                error!("{}", error);
                std::process::exit(1);
            }
        },
        None => Templates::default(),
    };

    let addr = config.bind_addr;
    let cache = MemoryCache::bounded(config.cache_capacity);
    let state = Arc::new(AppState {
        config,
        templates,
        cache,
    });
    let server = Server::bind(&addr)
        .serve(SearchService { state })
        .map_err(|e| error!("Server error: {}", e));

    info!("Listening {}", addr);
    hyper::rt::run(server);
}
