use crate::domain::Cursor;

/// Wall-clock source for the poll cursor.
pub trait Clock: Send + Sync {
    /// Current time as unix seconds.
    fn now_unix(&self) -> i64;

    fn cursor(&self) -> Cursor {
        Cursor(self.now_unix())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Resolve the `from_date` sent to the API. A zero cursor means "since now".
pub fn from_date(cursor: Cursor, clock: &dyn Clock) -> i64 {
    if cursor.0 == 0 {
        clock.now_unix()
    } else {
        cursor.0
    }
}
