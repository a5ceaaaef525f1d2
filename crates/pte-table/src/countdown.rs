use crate::event::CountdownKind;
use std::time::Duration;

/// A server-recorded, client-rendered countdown. The server never
/// ticks these down itself — clients decrement locally from
/// `start_time + duration`, and the server only validates elapsed time
/// when a completion event (e.g. `StartHand`) actually arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    pub id: u64,
    pub kind: CountdownKind,
    pub start_time: u64,
    pub duration: Duration,
    pub metadata: Option<String>,
}

impl Countdown {
    /// Whether `now` is past this countdown's nominal end, ignoring GC
    /// grace (used to validate a completion event's timing).
    pub fn has_elapsed(&self, now: u64) -> bool {
        now.saturating_sub(self.start_time) >= self.duration.as_secs()
    }
    /// Whether this record is old enough to be garbage collected: swept
    /// periodically with a grace period past nominal duration.
    pub fn is_expired(&self, now: u64, grace: Duration) -> bool {
        let end = self.start_time + self.duration.as_secs() + grace.as_secs();
        now >= end
    }
}

/// An in-memory set of live countdowns for one table, keyed by id so
/// multiple concurrent countdowns of different types can coexist.
#[derive(Debug, Default, Clone)]
pub struct CountdownSet {
    next_id: u64,
    live: Vec<Countdown>,
}

impl CountdownSet {
    pub fn start(
        &mut self,
        kind: CountdownKind,
        start_time: u64,
        duration: Duration,
        metadata: Option<String>,
    ) -> Countdown {
        self.next_id += 1;
        let countdown = Countdown {
            id: self.next_id,
            kind,
            start_time,
            duration,
            metadata,
        };
        self.live.push(countdown.clone());
        countdown
    }
    pub fn cancel(&mut self, id: u64) {
        self.live.retain(|c| c.id != id);
    }
    pub fn cancel_all(&mut self) {
        self.live.clear();
    }
    pub fn live(&self) -> &[Countdown] {
        &self.live
    }
    /// Sweeps countdowns past their GC window.
    pub fn gc(&mut self, now: u64, grace: Duration) {
        self.live.retain(|c| !c.is_expired(now, grace));
    }
    /// The countdown a client should display, by priority order:
    /// `action > reconnect > game_start > street_deal > new_hand`.
    pub fn displayed(&self) -> Option<&Countdown> {
        self.live.iter().min_by_key(|c| c.kind.priority())
    }
}
