use crate::timer_manager::TimerManager;
use pte_core::{Config, PlayerId, SeatIndex, QUEUE_SOFT_BOUND};
use pte_table::{
    next_actionable_from, reducers, to_call, ActionKind, ActionTimerHandle, AuditRecord,
    CountdownKind, CountdownSet, Event, SideEffect, SitOutController, SitOutReason, Stakes,
    Street, Table, TableMarker,
};
use pte_wire::{ClientCommand, ErrorCode, ServerEvent, WinnerShare};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{broadcast, mpsc};

/// Everything routed into a table's task: a translated client command, a
/// redispatched domain event, or a timer/countdown completion.
/// The reducer set never sees any of this directly — [`run`] turns each
/// variant into zero or one [`Event`] before calling [`reducers::apply`].
pub enum Inbound {
    Client {
        player: PlayerId,
        command: ClientCommand,
    },
    Internal(Event),
    TimerFired(ActionTimerHandle),
    RecheckGameStart,
}

/// A cloneable reference to a running table task: a sender into the
/// task's inbound queue plus a broadcast channel subscribers can join.
#[derive(Clone)]
pub struct TableHandle {
    pub id: pte_core::ID<TableMarker>,
    inbound: mpsc::UnboundedSender<Inbound>,
    events: broadcast::Sender<ServerEvent>,
}

impl TableHandle {
    pub fn send(&self, player: PlayerId, command: ClientCommand) {
        let _ = self.inbound.send(Inbound::Client { player, command });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.events.subscribe()
    }
}

/// Spawns the per-table task and returns its handle immediately — one
/// Tokio task per table, reachable only through its channel.
pub fn spawn(stakes: Stakes, config: Config) -> TableHandle {
    let table = Table::new(stakes);
    let id = table.id();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (events_tx, _) = broadcast::channel(256);
    let handle = TableHandle {
        id,
        inbound: inbound_tx.clone(),
        events: events_tx.clone(),
    };
    tokio::spawn(run(table, config, inbound_tx, inbound_rx, events_tx));
    handle
}

struct TaskState {
    table: Table,
    config: Config,
    sitout: SitOutController,
    timers: TimerManager,
    countdowns: CountdownSet,
    inbound: mpsc::UnboundedSender<Inbound>,
    events: broadcast::Sender<ServerEvent>,
}

async fn run(
    table: Table,
    config: Config,
    inbound_tx: mpsc::UnboundedSender<Inbound>,
    mut inbound_rx: mpsc::UnboundedReceiver<Inbound>,
    events_tx: broadcast::Sender<ServerEvent>,
) {
    let mut state = TaskState {
        table,
        config,
        sitout: SitOutController::default(),
        timers: TimerManager::default(),
        countdowns: CountdownSet::default(),
        inbound: inbound_tx,
        events: events_tx,
    };
    let mut gc_tick = tokio::time::interval(pte_core::COUNTDOWN_GC_INTERVAL);

    loop {
        tokio::select! {
            msg = inbound_rx.recv() => match msg {
                Some(msg) => state.handle(msg),
                None => break,
            },
            _ = gc_tick.tick() => state.sweep(),
        }
        if inbound_rx.len() > QUEUE_SOFT_BOUND {
            log::error!("table {} inbound queue overflowed, resetting", state.table.id());
            while inbound_rx.try_recv().is_ok() {}
            state.publish(ServerEvent::error(ErrorCode::ActionFailed, "queue overflow"));
        }
    }
}

impl TaskState {
    fn handle(&mut self, msg: Inbound) {
        match msg {
            Inbound::Client { player, command } => self.handle_client(player, command),
            Inbound::Internal(event) => self.dispatch(event),
            Inbound::TimerFired(handle) => {
                if self.timers.is_current(handle) {
                    self.dispatch(Event::TimeoutAutoFold { seat: handle.seat });
                }
            }
            Inbound::RecheckGameStart => self.check_game_start(),
        }
    }

    fn handle_client(&mut self, player: PlayerId, command: ClientCommand) {
        match command {
            ClientCommand::Sit {
                seat,
                buy_in,
                player_id,
                ..
            } => {
                let who = player_id.map(PlayerId::from).unwrap_or(player);
                match self.apply_event(Event::PlayerJoin {
                    seat,
                    player: who.clone(),
                    chips: buy_in,
                    nickname: None,
                }) {
                    Ok(effects) => {
                        self.finish(Ok(effects));
                        self.publish(ServerEvent::player_joined(seat, &who));
                    }
                    Err(e) => self.publish(ServerEvent::error(ErrorCode::SeatingFailed, e.to_string())),
                }
            }
            ClientCommand::Leave => {
                let seat = self.seat_of(&player);
                match self.apply_event(Event::PlayerLeave { player }) {
                    Ok(effects) => {
                        self.finish(Ok(effects));
                        if let Some(seat) = seat {
                            self.publish(ServerEvent::PlayerLeft { seat });
                        }
                    }
                    Err(e) => self.publish(ServerEvent::error(ErrorCode::ActionFailed, e.to_string())),
                }
            }
            ClientCommand::SitOut => {
                let Some(seat) = self.seat_of(&player) else {
                    self.publish(ServerEvent::error(ErrorCode::ActionFailed, "unknown player"));
                    return;
                };
                let now = now_secs();
                let result = self.apply_event(Event::PlayerSitOut {
                    player,
                    reason: SitOutReason::Voluntary,
                    timestamp: now,
                });
                self.finish(result);
                self.publish(ServerEvent::PlayerSatOut { seat });
            }
            ClientCommand::SitIn => {
                let Some(seat) = self.seat_of(&player) else {
                    self.publish(ServerEvent::error(ErrorCode::ActionFailed, "unknown player"));
                    return;
                };
                let result = self.apply_event(Event::PlayerSitIn { player });
                self.finish(result);
                self.publish(ServerEvent::PlayerSatIn { seat });
            }
            ClientCommand::Action {
                action,
                amount,
                player_id,
            } => {
                let who = player_id.map(PlayerId::from).unwrap_or(player);
                let Some(seat) = self.seat_of(&who) else {
                    self.publish(ServerEvent::error(ErrorCode::InvalidSeat, "unknown player"));
                    return;
                };
                match ActionKind::try_from(action.as_str()) {
                    Ok(kind) => self.dispatch_or_report(
                        Event::Action { seat, kind, amount },
                        ErrorCode::ActionFailed,
                    ),
                    Err(_) => {
                        self.publish(ServerEvent::error(ErrorCode::ActionFailed, "unrecognized action"))
                    }
                }
            }
            ClientCommand::Rebuy { amount } => {
                let Some(seat) = self.seat_of(&player) else {
                    self.publish(ServerEvent::error(ErrorCode::RebuyFailed, "unknown player"));
                    return;
                };
                if let Some(s) = self.table.seat_mut(seat) {
                    s.queue_rebuy(amount);
                    self.publish(ServerEvent::DealerMessage {
                        text: format!("rebuy of {amount} queued for seat {seat}"),
                    });
                }
            }
            ClientCommand::ListTables
            | ClientCommand::CreateTable { .. }
            | ClientCommand::Attach { .. }
            | ClientCommand::Reattach { .. }
            | ClientCommand::JoinTable { .. }
            | ClientCommand::PostBlind { .. } => {
                self.publish(ServerEvent::error(
                    ErrorCode::UnknownCommand,
                    "handled by a collaborator, not the table engine",
                ));
            }
        }
    }

    fn dispatch_or_report(&mut self, event: Event, on_err: ErrorCode) {
        let announce = event.clone();
        match self.apply_event(event) {
            Ok(effects) => {
                self.announce(&announce);
                self.finish(Ok(effects));
            }
            Err(e) => self.publish(ServerEvent::error(on_err, e.to_string())),
        }
    }

    fn dispatch(&mut self, event: Event) {
        let announce = event.clone();
        let result = self.apply_event(event);
        if result.is_ok() {
            self.announce(&announce);
        }
        self.finish(result);
    }

    /// Publishes the client-visible mirror of an [`Event`] that the
    /// reducer has already accepted. Kept separate from [`execute`] since
    /// it reacts to the event that was applied, not the effects it
    /// produced.
    fn announce(&mut self, event: &Event) {
        match event {
            Event::StartHand { .. } => {
                let stacks = self.table.seats().iter().map(|s| s.chips()).collect();
                self.publish(ServerEvent::HandStart {
                    hand: self.table.hand_number(),
                    dealer: self.table.button().unwrap_or(0),
                    stacks,
                });
            }
            Event::PostBlinds => {
                if let Some((small_blind_seat, big_blind_seat)) = self.sb_and_bb_seats() {
                    self.publish(ServerEvent::BlindsPosted {
                        small_blind_seat,
                        big_blind_seat,
                    });
                }
            }
            Event::EnterStreet { street, .. } => {
                let community = self.table.community();
                match street {
                    Street::Preflop => {}
                    Street::Flop if community.len() >= 3 => {
                        self.publish(ServerEvent::DealFlop {
                            codes: [community[0].code(), community[1].code(), community[2].code()],
                        });
                    }
                    Street::Turn if community.len() >= 4 => {
                        self.publish(ServerEvent::DealTurn {
                            code: community[3].code(),
                        });
                    }
                    Street::River if community.len() >= 5 => {
                        self.publish(ServerEvent::DealRiver {
                            code: community[4].code(),
                        });
                    }
                    _ => {}
                }
            }
            Event::Action { seat, kind, amount } => {
                self.publish(ServerEvent::PlayerActionApplied {
                    seat: *seat,
                    action: kind.to_string(),
                    amount: *amount,
                });
            }
            Event::CloseStreet => {
                if let Some(street) = self.table.street() {
                    self.publish(ServerEvent::RoundEnd {
                        street: format!("{street:?}"),
                    });
                }
            }
            Event::Showdown => {
                self.publish(ServerEvent::Showdown {
                    reveal_order: self.table.in_hand_seats(),
                });
            }
            Event::Payout { distributions } => {
                let winners: Vec<WinnerShare> = distributions
                    .iter()
                    .map(|d| WinnerShare {
                        seat: d.seat,
                        amount: d.amount,
                    })
                    .collect();
                let pot_amount = distributions.iter().map(|d| d.amount).sum();
                self.publish(ServerEvent::WinnerAnnouncement {
                    winners,
                    pot_amount,
                });
            }
            Event::HandEnd => {
                self.publish(ServerEvent::WaitingForNextHand);
            }
            _ => {}
        }
    }

    /// Re-derives the small/big blind seats from the button the same way
    /// `reducers::lifecycle::post_blinds` assigned them — the table only
    /// keeps `bb_seat`, not `sb_seat`, since nothing downstream needs it.
    fn sb_and_bb_seats(&self) -> Option<(SeatIndex, SeatIndex)> {
        let button = self.table.button()?;
        let bb = self.table.bb_seat()?;
        if self.table.in_hand_seats().len() == 2 {
            Some((button, bb))
        } else {
            let sb = next_actionable_from(&self.table, button)?;
            Some((sb, bb))
        }
    }

    /// The one place that calls into the reducer set: builds a
    /// [`reducers::ReducerContext`] from disjoint field borrows so this
    /// doesn't conflict with the `&mut self.table` borrow taken alongside
    /// it.
    fn apply_event(&mut self, event: Event) -> Result<Vec<SideEffect>, pte_table::ValidationError> {
        let mut ctx = reducers::ReducerContext {
            config: &self.config,
            sitout: &mut self.sitout,
        };
        reducers::apply(&mut self.table, event, &mut ctx)
    }

    fn finish(&mut self, result: Result<Vec<SideEffect>, pte_table::ValidationError>) {
        match result {
            Ok(effects) => {
                for effect in effects {
                    self.execute(effect);
                }
                self.check_invariants();
            }
            Err(e) => self.publish(ServerEvent::error((&e).into(), e.to_string())),
        }
    }

    fn execute(&mut self, effect: SideEffect) {
        match effect {
            SideEffect::StartTimer { seat, duration, .. } => {
                self.timers.start(seat, duration, self.inbound.clone());
                self.publish(ServerEvent::ActionPrompt {
                    acting_index: seat,
                    bet_to_call: to_call(&self.table, seat),
                    min_raise: self.table.last_raise_size(),
                    time_left_ms: duration.as_millis() as u64,
                });
            }
            SideEffect::StopTimer { .. } | SideEffect::ClearTimers => self.timers.clear(),
            SideEffect::DispatchEvent { event, delay } => match delay {
                None => self.dispatch(event),
                Some(delay) => {
                    let tx = self.inbound.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(Inbound::Internal(event));
                    });
                }
            },
            SideEffect::EmitStateChange { reason } => {
                log::debug!("table {}: {reason}", self.table.id());
            }
            SideEffect::CheckGameStart { delay } => match delay {
                None => self.check_game_start(),
                Some(delay) => {
                    let tx = self.inbound.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(Inbound::RecheckGameStart);
                    });
                }
            },
            SideEffect::EvaluateHands => self.evaluate_hands(),
            SideEffect::StartCountdown {
                kind,
                duration,
                metadata,
            } => {
                let start = now_secs();
                self.countdowns.start(kind, start, duration, metadata.clone());
                self.publish(ServerEvent::CountdownStart {
                    countdown_type: format!("{kind:?}"),
                    start_time: start,
                    duration: duration.as_secs(),
                    metadata,
                });
            }
        }
    }

    fn check_game_start(&mut self) {
        if self.table.phase() != pte_table::Phase::Waiting {
            return;
        }
        let ready = self
            .table
            .seats()
            .iter()
            .filter(|s| s.player().is_some() && !self.sitout.is_sitting_out(s.player().unwrap()))
            .count();
        if ready < self.config.min_players_to_start {
            return;
        }
        self.execute(SideEffect::StartCountdown {
            kind: CountdownKind::GameStart,
            duration: self.config.game_start_countdown,
            metadata: None,
        });
        let delay = self.config.game_start_countdown;
        let tx = self.inbound.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Inbound::Internal(Event::StartHand {
                timestamp: now_secs(),
                random_suffix: format!("{:09}", std::process::id() as u64 ^ now_secs()),
            }));
        });
    }

    fn evaluate_hands(&mut self) {
        use std::collections::BTreeMap;
        let board = self.table.community().to_vec();
        let mut scores = BTreeMap::new();
        for &seat in &self.table.in_hand_seats() {
            let Some(s) = self.table.seat(seat) else { continue };
            let (Some(player), Some((c1, c2))) = (s.player().cloned(), s.hand()) else {
                continue;
            };
            let mut cards = board.clone();
            cards.push(c1);
            cards.push(c2);
            scores.insert(player, pte_cards::evaluate(&cards));
        }
        let distributions = pte_table::distribute(&self.table, &scores);
        self.dispatch(Event::Payout { distributions });
    }

    fn check_invariants(&mut self) {
        let violations = pte_table::check_invariants(&self.table);
        if violations.is_empty() {
            return;
        }
        for v in &violations {
            log::error!("table {}: {v}", self.table.id());
            self.table.push_audit(AuditRecord::HandForceEnded {
                reason: v.to_string(),
            });
        }
        self.dispatch(Event::HandEnd);
    }

    fn sweep(&mut self) {
        let now = now_secs();
        self.countdowns.gc(now, pte_core::COUNTDOWN_GC_GRACE);
        for player in self.sitout.expired_auto_leaves(now) {
            self.dispatch(Event::PlayerLeave { player });
        }
    }

    fn seat_of(&self, player: &PlayerId) -> Option<pte_core::SeatIndex> {
        self.table.seats().iter().position(|s| s.player() == Some(player))
    }

    fn publish(&self, event: ServerEvent) {
        let _ = self.events.send(event);
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stakes() -> Stakes {
        Stakes {
            small_blind: 1,
            big_blind: 2,
            ante: None,
        }
    }

    async fn recv_until(
        events: &mut broadcast::Receiver<ServerEvent>,
        mut matches: impl FnMut(&ServerEvent) -> bool,
    ) -> ServerEvent {
        loop {
            let event = tokio::time::timeout(std::time::Duration::from_secs(1), events.recv())
                .await
                .expect("event before timeout")
                .expect("broadcast channel open");
            if matches(&event) {
                return event;
            }
        }
    }

    #[tokio::test]
    async fn two_seats_starts_the_game_start_countdown() {
        let handle = spawn(stakes(), Config::default());
        let mut events = handle.subscribe();

        for seat in 0..2 {
            handle.send(
                PlayerId::new(format!("p{seat}")),
                ClientCommand::Sit {
                    table_id: handle.id.to_string(),
                    seat,
                    buy_in: 200,
                    player_id: Some(format!("p{seat}")),
                },
            );
        }

        let event = recv_until(&mut events, |e| matches!(e, ServerEvent::CountdownStart { .. })).await;
        match event {
            ServerEvent::CountdownStart { countdown_type, .. } => {
                assert_eq!(countdown_type, "GameStart");
            }
            other => panic!("expected CountdownStart, got {other:?}"),
        }
    }

    fn fast_config() -> Config {
        Config {
            action_timeout: std::time::Duration::from_millis(200),
            game_start_countdown: std::time::Duration::from_millis(10),
            min_players_to_start: 2,
            max_players_per_table: pte_core::MAX_SEATS,
            street_deal_delay: std::time::Duration::from_millis(1),
            new_hand_delay: std::time::Duration::from_millis(1),
            log_level: pte_core::LogLevel::Silent,
        }
    }

    #[tokio::test]
    async fn seating_two_players_eventually_prompts_the_small_blind_to_act() {
        let handle = spawn(stakes(), fast_config());
        let mut events = handle.subscribe();

        for seat in 0..2 {
            handle.send(
                PlayerId::new(format!("p{seat}")),
                ClientCommand::Sit {
                    table_id: handle.id.to_string(),
                    seat,
                    buy_in: 200,
                    player_id: Some(format!("p{seat}")),
                },
            );
        }

        let hand_start = recv_until(&mut events, |e| matches!(e, ServerEvent::HandStart { .. })).await;
        assert!(matches!(hand_start, ServerEvent::HandStart { hand: 1, .. }));

        let blinds = recv_until(&mut events, |e| matches!(e, ServerEvent::BlindsPosted { .. })).await;
        assert!(matches!(blinds, ServerEvent::BlindsPosted { .. }));

        let prompt = recv_until(&mut events, |e| matches!(e, ServerEvent::ActionPrompt { .. })).await;
        match prompt {
            ServerEvent::ActionPrompt { bet_to_call, min_raise, .. } => {
                assert_eq!(bet_to_call, 1);
                assert_eq!(min_raise, 2);
            }
            other => panic!("expected ActionPrompt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn a_single_seat_never_starts_a_countdown() {
        let handle = spawn(stakes(), Config::default());
        let mut events = handle.subscribe();

        handle.send(
            PlayerId::new("solo"),
            ClientCommand::Sit {
                table_id: handle.id.to_string(),
                seat: 0,
                buy_in: 200,
                player_id: Some("solo".into()),
            },
        );

        let joined = recv_until(&mut events, |e| matches!(e, ServerEvent::PlayerJoined { .. })).await;
        assert!(matches!(joined, ServerEvent::PlayerJoined { seat: 0, .. }));

        let res = tokio::time::timeout(std::time::Duration::from_millis(200), async {
            loop {
                if let Ok(ServerEvent::CountdownStart { .. }) = events.recv().await {
                    return;
                }
            }
        })
        .await;
        assert!(res.is_err(), "no countdown should start with one seated player");
    }

    #[tokio::test]
    async fn unknown_player_action_is_reported_as_invalid_seat() {
        let handle = spawn(stakes(), Config::default());
        let mut events = handle.subscribe();

        handle.send(
            PlayerId::new("ghost"),
            ClientCommand::Action {
                action: "CHECK".into(),
                amount: None,
                player_id: None,
            },
        );

        let event = recv_until(&mut events, |e| matches!(e, ServerEvent::Error { .. })).await;
        match event {
            ServerEvent::Error { code, .. } => assert_eq!(code, ErrorCode::InvalidSeat),
            other => panic!("expected Error, got {other:?}"),
        }
    }
}
