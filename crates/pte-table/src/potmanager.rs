use crate::event::Distribution;
use crate::pot::Pot;
use crate::seat::SeatStatus;
use crate::table::Table;
use pte_cards::Score;
use pte_core::{Chips, PlayerId, SeatIndex};
use std::collections::{BTreeMap, BTreeSet};

/// Cuts the current seats' `committed` values into main/side pots by
/// commitment level. Pure function of the table; does not mutate
/// anything — the `CloseStreet` reducer is responsible for calling this
/// and merging the result into `table.pots()`.
pub fn collect_pots(table: &Table) -> Vec<Pot> {
    let mut levels: BTreeSet<Chips> = BTreeSet::new();
    for seat in table.seats() {
        if seat.committed() > 0 {
            levels.insert(seat.committed());
        }
    }

    let mut pots = Vec::new();
    let mut prev = 0;
    for level in levels {
        let width = level - prev;
        let contributors: Vec<_> = table
            .seats()
            .iter()
            .filter(|s| s.committed() >= level)
            .collect();
        let eligible: BTreeSet<PlayerId> = contributors
            .iter()
            .filter(|s| s.in_hand())
            .filter_map(|s| s.player().cloned())
            .collect();
        let amount = width * contributors.len() as i64;
        if amount > 0 && !eligible.is_empty() {
            pots.push(Pot::new(amount, eligible, Some(level)));
        }
        prev = level;
    }
    pots
}

/// Merges freshly-collected pots into the table's existing pot list: a
/// layer with the same cap and eligible set as an existing pot adds into
/// it, otherwise it is appended.
pub fn merge_pots(existing: &mut Vec<Pot>, fresh: Vec<Pot>) {
    for pot in fresh {
        if let Some(found) = existing
            .iter_mut()
            .find(|p| p.cap() == pot.cap() && p.eligible() == pot.eligible())
        {
            found.add(pot.amount());
        } else {
            existing.push(pot);
        }
    }
}

/// When exactly one in-hand seat remains and holds the single highest
/// `committed`, the excess over the next-highest commitment never faced a
/// call and returns to them untouched. Returns `(seat, refund)` if
/// a refund applies.
pub fn uncalled_bet_refund(table: &Table) -> Option<(SeatIndex, Chips)> {
    let in_hand = table.in_hand_seats();
    if in_hand.len() != 1 {
        return None;
    }
    let sole = in_hand[0];
    let sole_committed = table.seat(sole)?.committed();
    let second_highest = table
        .seats()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != sole)
        .map(|(_, s)| s.committed())
        .max()
        .unwrap_or(0);
    if sole_committed > second_highest {
        Some((sole, sole_committed - second_highest))
    } else {
        None
    }
}

/// Distributes each pot among its eligible players by hand strength
/// (lower [`Score`] wins), splitting ties equally with any remainder
/// going one chip at a time to winners in ascending seat-index order.
pub fn distribute(table: &Table, scores: &BTreeMap<PlayerId, Score>) -> Vec<Distribution> {
    let mut distributions = Vec::new();
    for (pot_index, pot) in table.pots().iter().enumerate() {
        let mut best: Option<Score> = None;
        for player in pot.eligible() {
            if let Some(&score) = scores.get(player) {
                best = Some(match best {
                    Some(b) if b <= score => b,
                    _ => score,
                });
            }
        }
        let Some(best) = best else { continue };

        let mut winners: Vec<SeatIndex> = table
            .seats()
            .iter()
            .enumerate()
            .filter(|(_, s)| {
                s.player()
                    .map(|p| pot.is_eligible(p) && scores.get(p) == Some(&best))
                    .unwrap_or(false)
            })
            .map(|(i, _)| i)
            .collect();
        winners.sort_unstable();

        let share = pot.amount() / winners.len() as i64;
        let mut remainder = pot.amount() % winners.len() as i64;
        for &seat in &winners {
            let mut amount = share;
            if remainder > 0 {
                amount += 1;
                remainder -= 1;
            }
            distributions.push(Distribution {
                seat,
                amount,
                pot_index,
            });
        }
    }
    distributions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Stakes;
    use pte_core::PlayerId;

    fn table_with_commits(commits: &[(i64, bool)]) -> Table {
        let mut table = Table::new(Stakes {
            small_blind: 5,
            big_blind: 10,
            ante: None,
        });
        for (i, &(committed, allin)) in commits.iter().enumerate() {
            let seat = table.seat_mut(i).unwrap();
            seat.set_player(PlayerId::new(format!("p{i}")), 1000, None);
            seat.set_status(SeatStatus::Active);
            seat.commit(committed);
            if allin {
                seat.set_status(SeatStatus::AllIn);
            }
        }
        table
    }

    #[test]
    fn side_pots_from_unequal_allins() {
        // A all-in 30, B all-in 50, C all-in 100.
        let table = table_with_commits(&[(30, true), (50, true), (100, true)]);
        let pots = collect_pots(&table);
        assert_eq!(pots.len(), 3);
        assert_eq!(pots[0].amount(), 90);
        assert_eq!(pots[0].cap(), Some(30));
        assert_eq!(pots[1].amount(), 40);
        assert_eq!(pots[1].cap(), Some(50));
        assert_eq!(pots[2].amount(), 50);
        assert_eq!(pots[2].cap(), Some(100));
        let total: i64 = pots.iter().map(|p| p.amount()).sum();
        assert_eq!(total, 180);
    }

    #[test]
    fn uncalled_bet_refunds_the_excess() {
        // Preflop HU: A raises to 40, B folds.
        let mut table = table_with_commits(&[(40, false), (10, false)]);
        table.seat_mut(1).unwrap().set_status(SeatStatus::Folded);
        let (seat, refund) = uncalled_bet_refund(&table).unwrap();
        assert_eq!(seat, 0);
        assert_eq!(refund, 30);
    }

    #[test]
    fn no_refund_when_more_than_one_remains() {
        let table = table_with_commits(&[(40, false), (40, false)]);
        assert_eq!(uncalled_bet_refund(&table), None);
    }
}
