//! Minimal tsu-middleware example: a chain assembled from registry keys.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Pick the chain (outermost first) with `TSU_MIDDLEWARE`:
//!   TSU_MIDDLEWARE=middleware.LoggingStdErr,middleware.Panic cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/hello
//!   curl -i http://localhost:3000/panic     # 500, server keeps running
//!   curl -i http://localhost:3000/missing   # 404

use std::sync::Arc;

use http::StatusCode;
use http::header::{CONTENT_TYPE, HeaderValue};
use tsu_middleware::{
    Constructor, Handler, Registry, Request, ResponseWriter, Server, parse_chain,
};

const DEFAULT_CHAIN: &str = "middleware.LoggingStdOut,middleware.Panic,app.PoweredBy";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let registry = Arc::new(Registry::with_defaults());
    // Application-specific layers register next to the built-ins.
    registry.register("app.PoweredBy", Constructor::new(powered_by));

    let chain = std::env::var("TSU_MIDDLEWARE").unwrap_or_else(|_| DEFAULT_CHAIN.to_owned());
    let app = registry
        .compose(parse_chain(&chain), site.into_boxed_handler())
        .expect("invalid TSU_MIDDLEWARE");

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

fn site(w: &mut dyn ResponseWriter, req: &Request) {
    match req.path() {
        "/hello" => {
            w.headers().insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
            let _ = w.write(b"hello\n");
        }
        "/panic" => panic!("handler failure"),
        _ => w.write_header(StatusCode::NOT_FOUND),
    }
}

// Adds `x-powered-by` to every response.
fn powered_by(next: tsu_middleware::BoxedHandler) -> tsu_middleware::BoxedHandler {
    (move |w: &mut dyn ResponseWriter, req: &Request| {
        w.headers().insert("x-powered-by", HeaderValue::from_static("tsu"));
        next.serve(w, req);
    })
    .into_boxed_handler()
}
