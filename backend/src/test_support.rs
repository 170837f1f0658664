//! Test doubles shared by unit tests in `src/`.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::StagedImage;

/// Clock frozen at a chosen instant until advanced.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// 2026-03-01T12:00:00Z, i.e. `1_772_366_400_000` ms since the epoch.
    pub fn fixed() -> Self {
        let now = match Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single() {
            Some(now) => now,
            None => panic!("fixture instant"),
        };
        Self::new(now)
    }

    pub fn advance_millis(&self, millis: i64) {
        *self.lock_clock() += TimeDelta::milliseconds(millis);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Small PNG-named image for upload tests.
pub fn sample_image() -> StagedImage {
    match StagedImage::new("avatar.png", Some("image/png".to_owned()), vec![0x89, b'P', b'N', b'G']) {
        Ok(image) => image,
        Err(error) => panic!("sample image: {error}"),
    }
}
