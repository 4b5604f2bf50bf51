use std::env;
use std::io;
use std::sync::{Arc, Mutex, Once};

use tracing::{debug, info, Level};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{AttrValue, IntrospectionError, Member, ModuleLike, NamedChild};

static TEST_SETUP: Once = Once::new();

/// Install a global tracing subscriber once per test binary.
///
/// Honors `RUST_LOG`; defaults to `debug`.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = env::var("RUST_LOG")
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Log buffer shared between a capturing subscriber and the test.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log buffer poisoned"))?;
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return the formatted events.
///
/// Events at `WARN` and above are captured, without ANSI colors.
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = fmt::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(Level::WARN)
        .with_ansi(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().map(|b| b.clone()).unwrap_or_default();
    (result, String::from_utf8_lossy(&bytes).into_owned())
}

/// Hand-assembled module hierarchy for tests.
#[derive(Debug, Clone, Default)]
pub struct StubModule {
    pub type_name: String,
    pub children: Vec<(String, StubModule)>,
    pub members: Vec<(String, Member)>,
    /// Fail child enumeration.
    pub broken: bool,
}

impl StubModule {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn child(mut self, name: impl Into<String>, child: StubModule) -> Self {
        self.children.push((name.into(), child));
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.members.push((name.into(), Member::value(value)));
        self
    }

    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.members.push((name.into(), Member::Callable));
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

impl ModuleLike for StubModule {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn named_children(&self) -> Result<Vec<NamedChild<'_>>, IntrospectionError> {
        if self.broken {
            return Err(IntrospectionError::new(
                self.type_name.clone(),
                "children not enumerable",
            ));
        }
        Ok(self
            .children
            .iter()
            .map(|(name, child)| (name.clone(), child as &dyn ModuleLike))
            .collect())
    }

    fn members(&self) -> Vec<(String, Member)> {
        self.members.clone()
    }
}
