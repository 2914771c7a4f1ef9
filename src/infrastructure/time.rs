use crate::application::ports::time::Clock;
use chrono::{DateTime, Utc};

/// Wall clock of the server process. Client-supplied times are never used.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
