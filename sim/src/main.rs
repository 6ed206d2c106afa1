use anyhow::Context;
use clap::Parser;
use core::time::Duration;
use rand::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use unoscratch_core::*;

mod board;

/// Plays scratch-off tickets without a screen, scratching every surface edge to edge.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// TOML file overriding ticket settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How many tickets to play
    #[arg(short, long, default_value_t = 1)]
    rounds: u32,

    /// Simulated frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct RoundSummary {
    round: u32,
    cells_revealed: usize,
    rows_won: Vec<u32>,
    paid: u64,
    unpaid: usize,
    settled_after_ms: Option<u128>,
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    rounds: Vec<RoundSummary>,
    winnings: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => TicketConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::debug!("seed: {seed}");
    let mut rng = SmallRng::seed_from_u64(seed);

    let layout = board::standard_layout(config.required_cells)?;
    let mut ticket = Ticket::new(layout, config)?;
    let frame = Duration::from_millis(args.frame_ms.max(1));

    let mut rounds = Vec::new();
    for _ in 0..args.rounds {
        ticket.deal(&mut rng);
        rounds.push(play_round(&mut ticket, frame));
    }

    let summary = Summary {
        seed,
        rounds,
        winnings: ticket.winnings().display().to_string(),
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Scratches every surface in passes one brush apart, then waits for the round to settle.
fn play_round(ticket: &mut Ticket, frame: Duration) -> RoundSummary {
    let mut summary = RoundSummary {
        round: ticket.round(),
        ..Default::default()
    };
    let started = ticket.now();
    let surfaces = ticket.engine().surfaces().to_vec();
    let step = ticket.config().brush_size_world;

    for surface in surfaces {
        let bounds = surface.bounds;
        let mut y = bounds.min.y + step / 2.0;
        ticket.handle_pointer(PointerEvent::Down(Vec2::new(bounds.min.x, y)));
        while y < bounds.max.y {
            let mut x = bounds.min.x;
            while x <= bounds.max.x {
                ticket.handle_pointer(PointerEvent::Move(Vec2::new(x, y)));
                record(&mut summary, ticket.tick(frame), started, ticket.now());
                x += step / 2.0;
            }
            y += step;
        }
        ticket.handle_pointer(PointerEvent::Up);
    }

    // drain animations and the settle delay, with a generous cap
    let limit = ticket.config().settle_delay() * 4 + ticket.config().removal_animation() * 4;
    let deadline = ticket.now() + limit;
    while summary.settled_after_ms.is_none() && ticket.now() < deadline {
        record(&mut summary, ticket.tick(frame), started, ticket.now());
    }
    if summary.settled_after_ms.is_none() {
        log::warn!(
            "round {} did not settle: {:?}",
            summary.round,
            ticket.progress()
        );
    }
    summary
}

fn record(summary: &mut RoundSummary, events: Vec<TicketEvent>, started: Duration, now: Duration) {
    for event in events {
        log::debug!("{event:?}");
        match event {
            TicketEvent::CellRevealed { .. } => summary.cells_revealed += 1,
            TicketEvent::RowWon(row) => summary.rows_won.push(row.0),
            TicketEvent::PrizePaid { amount, .. } => summary.paid += amount,
            TicketEvent::PrizeUnpaid(_) => summary.unpaid += 1,
            TicketEvent::RoundSettled { .. } => {
                summary.settled_after_ms = Some(now.saturating_sub(started).as_millis());
            }
            TicketEvent::CardStruck { .. }
            | TicketEvent::PrizePending(_)
            | TicketEvent::WinningsUpdated(_) => {}
        }
    }
}

fn print_summary(summary: &Summary) {
    println!("seed {}", summary.seed);
    for round in &summary.rounds {
        let settled = round
            .settled_after_ms
            .map_or_else(|| "never".to_string(), |ms| format!("{ms} ms"));
        println!(
            "round {}: {} cells, rows won {:?}, paid ${}, settled after {}",
            round.round, round.cells_revealed, round.rows_won, round.paid, settled
        );
    }
    println!("winnings {}", summary.winnings);
}
