use crate::event::SitOutReason;
use pte_core::{PlayerId, MAX_TIMEOUTS};
use std::collections::HashMap;

/// External per-table controller for sit-out state. The "sitting-out"
/// flag presented to clients is always derived by joining a seat with
/// this controller's set at snapshot time — it is never stored on the
/// seat itself.
#[derive(Debug, Default)]
pub struct SitOutController {
    sitting_out: HashMap<PlayerId, u64>,
    timeout_count: HashMap<PlayerId, u8>,
    /// Deadline (unix seconds) at which an auto-leave fires for this
    /// player, if one is currently armed.
    auto_leave_deadline: HashMap<PlayerId, u64>,
}

/// What the controller wants the event loop to do in response to a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitOutEffect {
    None,
    AutoSatOut,
}

impl SitOutController {
    pub fn is_sitting_out(&self, player: &PlayerId) -> bool {
        self.sitting_out.contains_key(player)
    }
    pub fn timeout_count(&self, player: &PlayerId) -> u8 {
        self.timeout_count.get(player).copied().unwrap_or(0)
    }
    pub fn auto_leave_deadline(&self, player: &PlayerId) -> Option<u64> {
        self.auto_leave_deadline.get(player).copied()
    }

    /// Records a player sitting out and arms their auto-leave fuse.
    /// Voluntary sit-outs reset the timeout counter; timeout-triggered
    /// ones do not (the count is what got them here).
    pub fn mark_sit_out(&mut self, player: PlayerId, reason: SitOutReason, now: u64, fuse_secs: u64) {
        self.sitting_out.entry(player.clone()).or_insert(now);
        if reason == SitOutReason::Voluntary {
            self.timeout_count.insert(player.clone(), 0);
        }
        self.auto_leave_deadline.insert(player, now + fuse_secs);
    }

    /// Clears sit-out state and cancels the auto-leave fuse.
    pub fn mark_sit_in(&mut self, player: &PlayerId) {
        self.sitting_out.remove(player);
        self.timeout_count.insert(player.clone(), 0);
        self.auto_leave_deadline.remove(player);
    }

    /// A player timed out on their action. Increments the consecutive
    /// timeout counter; at `MAX_TIMEOUTS` the caller should also apply
    /// `SitOutEffect::AutoSatOut` by dispatching a timeout sit-out.
    pub fn handle_timeout(&mut self, player: &PlayerId) -> SitOutEffect {
        let count = self.timeout_count.entry(player.clone()).or_insert(0);
        *count += 1;
        if *count >= MAX_TIMEOUTS {
            SitOutEffect::AutoSatOut
        } else {
            SitOutEffect::None
        }
    }

    /// A voluntary action resets the consecutive-timeout streak — only
    /// consecutive timeouts with no voluntary action in between count.
    pub fn record_voluntary_action(&mut self, player: &PlayerId) {
        self.timeout_count.insert(player.clone(), 0);
    }

    /// Removes all state for a departing player.
    pub fn handle_player_leave(&mut self, player: &PlayerId) {
        self.sitting_out.remove(player);
        self.timeout_count.remove(player);
        self.auto_leave_deadline.remove(player);
    }

    /// Players whose auto-leave fuse has expired as of `now` — the event
    /// loop should dispatch `PlayerLeave` for each and then clear them
    /// here via `handle_player_leave`.
    pub fn expired_auto_leaves(&self, now: u64) -> Vec<PlayerId> {
        self.auto_leave_deadline
            .iter()
            .filter(|&(_, &deadline)| now >= deadline)
            .map(|(p, _)| p.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_consecutive_timeouts_trigger_auto_sit_out() {
        let mut controller = SitOutController::default();
        let p = PlayerId::new("p1");
        assert_eq!(controller.handle_timeout(&p), SitOutEffect::None);
        assert_eq!(controller.handle_timeout(&p), SitOutEffect::AutoSatOut);
    }

    #[test]
    fn voluntary_action_resets_the_streak() {
        let mut controller = SitOutController::default();
        let p = PlayerId::new("p1");
        controller.handle_timeout(&p);
        controller.record_voluntary_action(&p);
        assert_eq!(controller.handle_timeout(&p), SitOutEffect::None);
    }

    #[test]
    fn sit_in_within_window_cancels_auto_leave() {
        let mut controller = SitOutController::default();
        let p = PlayerId::new("p1");
        controller.mark_sit_out(p.clone(), SitOutReason::Timeout, 0, 300);
        assert!(controller.auto_leave_deadline(&p).is_some());
        controller.mark_sit_in(&p);
        assert!(controller.auto_leave_deadline(&p).is_none());
        assert!(!controller.is_sitting_out(&p));
    }

    #[test]
    fn expired_auto_leaves_are_reported() {
        let mut controller = SitOutController::default();
        let p = PlayerId::new("p1");
        controller.mark_sit_out(p.clone(), SitOutReason::Voluntary, 0, 300);
        assert!(controller.expired_auto_leaves(100).is_empty());
        assert_eq!(controller.expired_auto_leaves(300), vec![p]);
    }
}
