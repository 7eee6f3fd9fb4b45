use std::time::Duration;

/// Cancellable reference to an entry in a [`TimerQueue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Remaining {
    Forever,
    Times(u32),
}

#[derive(Debug)]
struct TimerEntry<T> {
    handle: TimerHandle,
    payload: T,
    interval: Duration,
    elapsed: Duration,
    remaining: Remaining,
}

/// Deferred work owned by a single manager.
///
/// Entries fire by copying their payload into the output buffer passed to
/// [`TimerQueue::advance`]; the owner interprets payloads afterwards, so a
/// payload can never outlive the queue that scheduled it. Clearing the queue
/// invalidates every outstanding handle.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_handle: u64,
    entries: Vec<TimerEntry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_handle: 0,
            entries: Vec::new(),
        }
    }
}

impl<T: Clone> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `payload` to fire once after `delay`.
    pub fn once(&mut self, delay: Duration, payload: T) -> TimerHandle {
        self.schedule(delay, Remaining::Times(1), payload)
    }

    /// Schedules `payload` to fire every `interval` until cancelled.
    pub fn repeating(&mut self, interval: Duration, payload: T) -> TimerHandle {
        self.schedule(interval, Remaining::Forever, payload)
    }

    /// Schedules `payload` to fire `count` times, `interval` apart.
    ///
    /// Returns `None` when `count` is zero because nothing would ever fire.
    pub fn repeating_times(
        &mut self,
        interval: Duration,
        count: u32,
        payload: T,
    ) -> Option<TimerHandle> {
        if count == 0 {
            return None;
        }
        Some(self.schedule(interval, Remaining::Times(count), payload))
    }

    fn schedule(&mut self, interval: Duration, remaining: Remaining, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.entries.push(TimerEntry {
            handle,
            payload,
            interval,
            elapsed: Duration::ZERO,
            remaining,
        });
        handle
    }

    /// Cancels a pending entry; returns whether it was still scheduled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        self.entries.len() != before
    }

    /// Changes the interval of a pending entry without resetting its progress.
    pub fn set_interval(&mut self, handle: TimerHandle, interval: Duration) -> bool {
        match self.entries.iter_mut().find(|entry| entry.handle == handle) {
            Some(entry) => {
                entry.interval = interval;
                true
            }
            None => false,
        }
    }

    /// Reports whether the entry is still pending.
    #[must_use]
    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }

    /// Number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cancels every pending entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Advances every entry by `dt` and appends fired payloads to `fired`.
    ///
    /// An entry may fire several times when `dt` spans several intervals.
    /// Entries fire in scheduling order.
    pub fn advance(&mut self, dt: Duration, fired: &mut Vec<T>) {
        for entry in &mut self.entries {
            entry.elapsed = entry.elapsed.saturating_add(dt);
            if entry.interval.is_zero() {
                fired.push(entry.payload.clone());
                entry.elapsed = Duration::ZERO;
                entry.remaining = match entry.remaining {
                    Remaining::Forever => Remaining::Forever,
                    Remaining::Times(count) => Remaining::Times(count.saturating_sub(1)),
                };
                continue;
            }
            while entry.elapsed >= entry.interval && entry.remaining != Remaining::Times(0) {
                entry.elapsed -= entry.interval;
                fired.push(entry.payload.clone());
                if let Remaining::Times(count) = entry.remaining {
                    entry.remaining = Remaining::Times(count - 1);
                }
            }
        }
        self.entries
            .retain(|entry| entry.remaining != Remaining::Times(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn once_fires_a_single_time() {
        let mut queue = TimerQueue::new();
        let handle = queue.once(ms(100), "go");
        let mut fired = Vec::new();

        queue.advance(ms(99), &mut fired);
        assert!(fired.is_empty());
        queue.advance(ms(1), &mut fired);
        assert_eq!(fired, vec!["go"]);
        assert!(!queue.is_scheduled(handle));

        queue.advance(ms(500), &mut fired);
        assert_eq!(fired.len(), 1);
    }

    #[test]
    fn repeating_catches_up_on_long_frames() {
        let mut queue = TimerQueue::new();
        let _ = queue.repeating(ms(100), 1u8);
        let mut fired = Vec::new();
        queue.advance(ms(350), &mut fired);
        assert_eq!(fired.len(), 3);
        queue.advance(ms(50), &mut fired);
        assert_eq!(fired.len(), 4);
    }

    #[test]
    fn repeating_times_stops_after_count() {
        let mut queue = TimerQueue::new();
        let handle = queue
            .repeating_times(ms(10), 2, ())
            .expect("positive count schedules");
        let mut fired = Vec::new();
        for _ in 0..10 {
            queue.advance(ms(10), &mut fired);
        }
        assert_eq!(fired.len(), 2);
        assert!(!queue.is_scheduled(handle));
        assert!(queue.repeating_times(ms(10), 0, ()).is_none());
    }

    #[test]
    fn cancelled_entries_never_fire() {
        let mut queue = TimerQueue::new();
        let keep = queue.repeating(ms(10), 'k');
        let drop = queue.repeating(ms(10), 'd');
        assert!(queue.cancel(drop));
        assert!(!queue.cancel(drop));

        let mut fired = Vec::new();
        queue.advance(ms(10), &mut fired);
        assert_eq!(fired, vec!['k']);
        assert!(queue.is_scheduled(keep));
    }

    #[test]
    fn set_interval_keeps_progress() {
        let mut queue = TimerQueue::new();
        let handle = queue.repeating(ms(100), ());
        let mut fired = Vec::new();
        queue.advance(ms(60), &mut fired);
        assert!(queue.set_interval(handle, ms(50)));
        queue.advance(ms(0), &mut fired);
        assert_eq!(fired.len(), 1);
    }

    #[test]
    fn clear_invalidates_handles() {
        let mut queue = TimerQueue::new();
        let handle = queue.once(ms(5), ());
        queue.clear();
        assert!(queue.is_empty());
        assert!(!queue.set_interval(handle, ms(1)));
    }
}
