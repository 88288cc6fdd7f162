use chrono::{DateTime, Local};

/// Injected wall-clock time. The availability engine only ever sees the
/// `now` handed to it, so tests can pin the clock to any instant.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
