//! Random-acting CPU seats and the interactive human loop. Both kinds of
//! seat only ever send the `ACTION` command.
use pte_core::{PlayerId, SeatIndex};
use pte_runtime::TableHandle;
use pte_wire::{ClientCommand, ServerEvent};
use rand::Rng;

/// Spawns a task that acts randomly whenever `seat` is prompted, choosing
/// uniformly among a small weighted set of legal actions.
pub fn spawn(handle: TableHandle, player: PlayerId, seat: SeatIndex) {
    tokio::spawn(async move {
        let mut events = handle.subscribe();
        while let Ok(event) = events.recv().await {
            if let ServerEvent::ActionPrompt {
                acting_index,
                bet_to_call,
                min_raise,
                ..
            } = event
            {
                if acting_index != seat {
                    continue;
                }
                let (action, amount) = choose(bet_to_call, min_raise);
                handle.send(
                    player.clone(),
                    ClientCommand::Action {
                        action: action.to_string(),
                        amount,
                        player_id: Some(player.as_str().to_string()),
                    },
                );
            }
        }
    });
}

fn choose(bet_to_call: i64, min_raise: i64) -> (&'static str, Option<i64>) {
    let mut rng = rand::rng();
    if bet_to_call == 0 {
        if rng.random_bool(0.2) {
            ("BET", Some(min_raise.max(1)))
        } else {
            ("CHECK", None)
        }
    } else if rng.random_bool(0.1) {
        ("FOLD", None)
    } else {
        ("CALL", None)
    }
}

/// Drives one human-controlled seat from the terminal until the process
/// exits, prompting for an action and amount via `dialoguer`.
#[cfg(feature = "cli")]
pub async fn human_loop(handle: TableHandle, player: PlayerId, seat: SeatIndex) {
    use dialoguer::{Input, Select};

    let mut events = handle.subscribe();
    while let Ok(event) = events.recv().await {
        let ServerEvent::ActionPrompt {
            acting_index,
            bet_to_call,
            min_raise,
            ..
        } = event
        else {
            continue;
        };
        if acting_index != seat {
            continue;
        }

        let mut options = vec!["FOLD".to_string()];
        options.push(if bet_to_call == 0 { "CHECK".into() } else { "CALL".into() });
        options.push(if bet_to_call == 0 { "BET".into() } else { "RAISE".into() });
        options.push("ALLIN".to_string());

        let choice = Select::new()
            .with_prompt(format!("to call {bet_to_call}, min raise {min_raise}"))
            .items(&options)
            .default(1)
            .interact()
            .unwrap_or(0);
        let action = options[choice].clone();

        let amount = if action == "BET" || action == "RAISE" {
            Input::<i64>::new()
                .with_prompt(format!("amount (min {min_raise})"))
                .default(min_raise)
                .interact_text()
                .ok()
        } else {
            None
        };

        handle.send(
            player.clone(),
            ClientCommand::Action {
                action,
                amount,
                player_id: Some(player.as_str().to_string()),
            },
        );
    }
}
