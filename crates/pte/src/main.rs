//! Interactive CLI harness for the table engine: wires `pte-runtime` to
//! stdin-driven players so a hand can be played end to end without a real
//! network transport.
mod bots;

use clap::Parser;
use colored::Colorize;
use pte_core::{Config, PlayerId};
use pte_runtime::Registry;
use pte_table::Stakes;
use pte_wire::{ClientCommand, ServerEvent};

/// Stakes and seat layout for the demo table.
#[derive(Debug, Parser)]
#[command(about = "Play a hand against CPU opponents on a single table")]
struct Args {
    #[arg(long, default_value_t = 5)]
    small_blind: i64,
    #[arg(long, default_value_t = 10)]
    big_blind: i64,
    #[arg(long)]
    ante: Option<i64>,
    /// Total seats to fill, including the human seat.
    #[arg(long, default_value_t = 3)]
    seats: usize,
    /// Seat index the human plays; the rest are random-acting bots.
    #[arg(long, default_value_t = 0)]
    human_seat: usize,
    #[arg(long, default_value_t = 1_000)]
    buy_in: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pte_core::init_logging();
    pte_core::register_shutdown_signal();

    let args = Args::parse();
    let stakes = Stakes {
        small_blind: args.small_blind,
        big_blind: args.big_blind,
        ante: args.ante,
    };
    let registry = Registry::new();
    let table_id = registry.open(stakes, Config::from_env()).await?;
    let handle = registry.handle(table_id).await?;
    log::info!("table {table_id} opened at {}/{} stakes", args.small_blind, args.big_blind);

    println!(
        "{}",
        format!("table {table_id} opened — {}/{} stakes", args.small_blind, args.big_blind).green()
    );

    let mut printer_events = handle.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = printer_events.recv().await {
            print_event(&event);
        }
    });

    for seat in 0..args.seats.min(pte_core::MAX_SEATS) {
        let player = PlayerId::new(format!("seat-{seat}"));
        handle.send(
            player.clone(),
            ClientCommand::Sit {
                table_id: table_id.to_string(),
                seat,
                buy_in: args.buy_in,
                player_id: Some(player.as_str().to_string()),
            },
        );
        if seat != args.human_seat {
            bots::spawn(handle.clone(), player, seat);
        }
    }

    #[cfg(feature = "cli")]
    {
        let human = PlayerId::new(format!("seat-{}", args.human_seat));
        bots::human_loop(handle, human, args.human_seat).await;
    }
    #[cfg(not(feature = "cli"))]
    {
        tokio::signal::ctrl_c().await?;
    }

    Ok(())
}

fn print_event(event: &ServerEvent) {
    println!("{}", event.to_json().dimmed());
}
