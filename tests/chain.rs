//! End-to-end composition through the public API.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;

use http::StatusCode;
use tsu_middleware::middleware::{self, LOGGING_STDERR, LOGGING_STDOUT, PANIC};
use tsu_middleware::{
    Constructor, Error, Handler, LoggingMiddleware, Recorder, Registry, Request, ResponseWriter,
};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn ok(w: &mut dyn ResponseWriter, _: &Request) {
    w.write_header(StatusCode::OK);
}

fn noop(_: &mut dyn ResponseWriter, _: &Request) {}

fn failing(_: &mut dyn ResponseWriter, _: &Request) {
    panic!("bye bye");
}

#[test]
fn bootstrap_keys_chain_into_handlers() {
    let registry = Registry::with_defaults();
    for key in ["middleware.Panic", "middleware.LoggingStdOut", "middleware.LoggingStdErr"] {
        let constructor = registry.get(key).unwrap_or_else(|| panic!("{key} missing"));
        let chained = constructor.apply(noop.into_boxed_handler());

        let mut rec = Recorder::new();
        chained.serve(&mut rec, &Request::get("/"));
        assert_eq!(rec.status(), StatusCode::OK);
    }
    assert_eq!(registry.len(), 3);
    assert!(registry.contains(PANIC) && registry.contains(LOGGING_STDOUT) && registry.contains(LOGGING_STDERR));
}

#[test]
fn logged_recovered_panic_shows_up_as_500() {
    let buf = SharedBuf::default();
    let registry = Registry::with_defaults();
    let log = buf.clone();
    registry.register(
        "test.Logging",
        Constructor::new(move |inner| LoggingMiddleware::new(log.clone(), inner).into_boxed_handler()),
    );

    let app = registry.compose(["test.Logging", PANIC], failing.into_boxed_handler()).unwrap();

    let mut rec = Recorder::new();
    app.serve(&mut rec, &Request::get("/about/"));

    assert_eq!(rec.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let line = buf.contents();
    assert!(line.starts_with("500 /about/ "), "unexpected line: {line:?}");
    assert!(line.ends_with('\n'));
}

#[test]
fn logging_over_an_ok_handler() {
    let buf = SharedBuf::default();
    let app = LoggingMiddleware::new(buf.clone(), ok.into_boxed_handler());

    let mut rec = Recorder::new();
    app.serve(&mut rec, &Request::get("/about/"));

    let line = buf.contents();
    assert_eq!(rec.status(), StatusCode::OK);
    assert!(line.contains("200"));
    assert!(line.contains("/about/"));
    assert_eq!(line.as_bytes().last(), Some(&b'\n'));
}

#[test]
fn unknown_key_in_a_chain_is_an_error() {
    let registry = Registry::with_defaults();
    let chain = tsu_middleware::parse_chain("middleware.Panic, middleware.Cache");

    match registry.compose(chain, noop.into_boxed_handler()) {
        Err(Error::UnknownMiddleware(key)) => assert_eq!(key, "middleware.Cache"),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("composed a chain with an unknown key"),
    }
}

#[test]
fn one_chain_serves_many_threads() {
    let buf = SharedBuf::default();
    let app = middleware::panic_recovery()
        .apply(LoggingMiddleware::new(buf.clone(), ok.into_boxed_handler()).into_boxed_handler());

    let threads: Vec<_> = (0..8)
        .map(|i| {
            let app = Arc::clone(&app);
            thread::spawn(move || {
                let mut rec = Recorder::new();
                app.serve(&mut rec, &Request::get(&format!("/t/{i}")));
                rec.status()
            })
        })
        .collect();

    for t in threads {
        assert_eq!(t.join().unwrap(), StatusCode::OK);
    }

    let log = buf.contents();
    assert_eq!(log.lines().count(), 8);
    assert!(log.lines().all(|l| l.starts_with("200 /t/")));
}

#[test]
fn lookups_run_alongside_registration() {
    let registry = Arc::new(Registry::with_defaults());

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.register(format!("test.Layer{i}"), Constructor::new(|next| next)))
        })
        .collect();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || (0..100).all(|_| registry.get(PANIC).is_some()))
        })
        .collect();

    for w in writers {
        w.join().unwrap();
    }
    for r in readers {
        assert!(r.join().unwrap());
    }
    assert_eq!(registry.len(), 7);
}
