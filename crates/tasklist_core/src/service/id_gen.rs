//! Task id generation.
//!
//! Ids are epoch-millisecond timestamps bumped past every id already seen, so
//! two adds inside the same millisecond (or after the clock steps back) still
//! get distinct, increasing ids.

use crate::model::task::TaskId;
use mockable::{Clock, DefaultClock};

/// Hands out strictly increasing task ids.
#[derive(Debug)]
pub struct TaskIdGenerator<C: Clock = DefaultClock> {
    clock: C,
    last_issued: Option<TaskId>,
}

impl<C: Clock> TaskIdGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last_issued: None,
        }
    }

    /// Returns the next id, greater than `floor` and any id issued before.
    ///
    /// `floor` is the largest id currently in the list. Returns `None` once
    /// ids would pass `i64::MAX`; callers pick a free id themselves then.
    pub fn next_id(&mut self, floor: Option<TaskId>) -> Option<TaskId> {
        let now = self.clock.utc().timestamp_millis();
        let id = match self.last_issued.max(floor) {
            Some(seen) => now.max(seen.checked_add(1)?),
            None => now,
        };
        self.last_issued = Some(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::TaskIdGenerator;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use mockable::{Clock, DefaultClock};
    use std::sync::atomic::{AtomicI64, Ordering};

    struct SetClock(AtomicI64);

    impl SetClock {
        fn at(ms: i64) -> Self {
            Self(AtomicI64::new(ms))
        }
    }

    impl Clock for SetClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            Utc.timestamp_millis_opt(self.0.load(Ordering::SeqCst))
                .unwrap()
        }
    }

    #[test]
    fn uses_clock_when_ahead_of_history() {
        let mut ids = TaskIdGenerator::new(SetClock::at(1_000));
        assert_eq!(ids.next_id(Some(10)), Some(1_000));
    }

    #[test]
    fn same_millisecond_adds_get_distinct_ids() {
        let mut ids = TaskIdGenerator::new(SetClock::at(1_000));
        assert_eq!(ids.next_id(None), Some(1_000));
        assert_eq!(ids.next_id(Some(1_000)), Some(1_001));
        assert_eq!(ids.next_id(Some(1_001)), Some(1_002));
    }

    #[test]
    fn clock_going_backwards_stays_above_floor() {
        let mut ids = TaskIdGenerator::new(SetClock::at(5_000));
        assert_eq!(ids.next_id(Some(9_000)), Some(9_001));
        ids.clock.0.store(4_000, Ordering::SeqCst);
        assert_eq!(ids.next_id(None), Some(9_002));
    }

    #[test]
    fn floor_at_max_id_yields_none_instead_of_repeating() {
        let mut ids = TaskIdGenerator::new(SetClock::at(1_000));
        assert_eq!(ids.next_id(Some(i64::MAX)), None);
    }

    #[test]
    fn default_clock_ids_are_after_2020() {
        let mut ids = TaskIdGenerator::new(DefaultClock);
        assert!(ids.next_id(None).unwrap() > 1_577_836_800_000);
    }
}
