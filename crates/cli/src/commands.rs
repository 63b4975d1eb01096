// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Command line subcommands.
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::{fs, path::PathBuf};

use holdem_cards::{format_cards, parse_cards};
use holdem_core::{Event, EventKind, EventLog, GameState, Replayer, Stage};
use holdem_eval::{
    EquityRequest, PlayerSpec, all_canonical_hands, analyze_draws, calculate_equity,
};

/// The CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Computes the players equities.
    Equity(EquityArgs),
    /// Finds flush and straight draws.
    Draws(DrawsArgs),
    /// Prints the 13x13 starting hands chart.
    Chart(ChartArgs),
    /// Deals a hand to showdown.
    Play(PlayArgs),
    /// Replays a hand from a JSON event log.
    Replay(ReplayArgs),
}

#[derive(Debug, Args)]
pub struct EquityArgs {
    /// Players hands, hole cards like AhKh, ranges like "AKs,QQ" or random.
    #[clap(required = true, num_args = 2..=10)]
    players: Vec<String>,
    /// The board cards.
    #[clap(long, short, default_value = "")]
    board: String,
    /// Cards out of play.
    #[clap(long, short, default_value = "")]
    dead: String,
    /// Number of Monte Carlo trials.
    #[clap(long, short, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
    trials: u64,
    /// The sampling seed, a random seed is used if missing.
    #[clap(long, short)]
    seed: Option<u64>,
    /// Number of worker tasks, defaults to the available parallelism.
    #[clap(long, value_parser = clap::value_parser!(u16).range(1..))]
    tasks: Option<u16>,
    /// Enumerate all the boards instead of sampling.
    #[clap(long, short)]
    exact: bool,
    /// Print the result as JSON.
    #[clap(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct DrawsArgs {
    /// The hole cards.
    hole: String,
    /// The flop or turn cards.
    board: String,
    /// Cards out of play.
    #[clap(long, short, default_value = "")]
    dead: String,
    /// Print the result as JSON.
    #[clap(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    /// Print all the hands details as JSON.
    #[clap(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Number of players.
    #[clap(long, short, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=10))]
    players: u8,
    /// The deck seed, a random seed is used if missing.
    #[clap(long, short)]
    seed: Option<u64>,
    /// Take an equity snapshot on each street with this number of trials.
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    equity: Option<u64>,
    /// Print the event log as JSON.
    #[clap(long)]
    json: bool,
    /// Save the event log to this file.
    #[clap(long, short)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// The JSON event log file.
    file: PathBuf,
}

/// Runs a subcommand.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Equity(args) => equity(args),
        Command::Draws(args) => draws(args),
        Command::Chart(args) => chart(args),
        Command::Play(args) => play(args),
        Command::Replay(args) => replay(args),
    }
}

fn equity(args: EquityArgs) -> Result<()> {
    let board = parse_cards(&args.board).context("Invalid board")?;
    let dead = parse_cards(&args.dead).context("Invalid dead cards")?;
    let players = args
        .players
        .iter()
        .map(|p| PlayerSpec::parse(p).with_context(|| format!("Invalid player hand {p}")))
        .collect::<Result<Vec<_>>>()?;

    let mut request = EquityRequest::new(players.clone())
        .with_board(board)
        .with_dead(dead);

    request = if args.exact {
        request.enumerate()
    } else {
        request.trials(args.trials)
    };

    request.seed = args.seed;
    if let Some(tasks) = args.tasks {
        request = request.tasks(tasks as usize);
    }

    let result = calculate_equity(&request)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{:<24} {:>8} {:>8} {:>8}", "Player", "Equity", "Win", "Tie");
    for (player, equity) in players.iter().zip(&result.players) {
        println!(
            "{:<24} {:>7.2}% {:>7.2}% {:>7.2}%",
            player.to_string(),
            equity.equity * 100.0,
            equity.win * 100.0,
            equity.tie * 100.0
        );
    }

    println!(
        "\n{} samples in {:.3}s",
        result.samples,
        result.elapsed.as_secs_f64()
    );

    if let Some(seed) = result.seed {
        println!("Seed {seed}");
    }

    Ok(())
}

fn draws(args: DrawsArgs) -> Result<()> {
    let hole = parse_cards(&args.hole).context("Invalid hole cards")?;
    let board = parse_cards(&args.board).context("Invalid board")?;
    let dead = parse_cards(&args.dead).context("Invalid dead cards")?;

    let analysis = analyze_draws(&hole, &board, &dead)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!(
        "Hole {}  Board {}",
        format_cards(&analysis.hole),
        format_cards(&analysis.board)
    );

    if analysis.has_flush {
        println!("Flush made");
    }

    if analysis.has_straight {
        println!("Straight made");
    }

    for draw in &analysis.flush_draws {
        println!(
            "{:<18} {} suit, {} outs{}",
            draw.draw_type.name(),
            draw.suit,
            draw.outs.len(),
            if draw.is_nut { ", nut" } else { "" }
        );
    }

    for draw in &analysis.straight_draws {
        let ranks = draw
            .needed_ranks
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{:<18} needs {ranks}, {} outs, {} high",
            draw.draw_type.name(),
            draw.outs.len(),
            draw.high_card
        );
    }

    if !analysis.has_draw() {
        println!("No draws");
    } else if analysis.is_combo_draw() {
        println!("Combo draw");
    }

    println!(
        "Total outs {}: {}",
        analysis.total_outs,
        format_cards(&analysis.all_outs)
    );

    Ok(())
}

fn chart(args: ChartArgs) -> Result<()> {
    let hands = all_canonical_hands();
    if args.json {
        let infos = hands.iter().map(|h| h.info()).collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    // Hands are in row major order.
    for row in hands.chunks(13) {
        let line = row
            .iter()
            .map(|h| format!("{:<5}", h.to_string()))
            .collect::<String>();
        println!("{}", line.trim_end());
    }

    Ok(())
}

fn play(args: PlayArgs) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut state = GameState::new(args.players as usize, seed)?;

    while state.stage() != Stage::Complete {
        let stage = state.advance()?;
        if let Some(trials) = args.equity {
            if matches!(
                stage,
                Stage::Preflop | Stage::Flop | Stage::Turn | Stage::River
            ) {
                state.equity(trials, Some(seed))?;
            }
        }
    }

    let log = state.event_log().context("The hand has no event log")?;
    if let Some(path) = &args.output {
        fs::write(path, serde_json::to_string_pretty(log)?)
            .with_context(|| format!("Cannot write {}", path.display()))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(log)?);
    } else {
        log.iter().for_each(print_event);
    }

    Ok(())
}

fn replay(args: ReplayArgs) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Cannot read {}", args.file.display()))?;
    let log: EventLog = serde_json::from_str(&text)
        .with_context(|| format!("Invalid event log {}", args.file.display()))?;

    let mut replayer = Replayer::new(&log)?;
    for event in &log {
        print_event(event);
        if let Some(snapshot) = replayer.step_forward() {
            println!("    {} [{}]", snapshot.stage, format_cards(&snapshot.board));
        }
    }

    let state = GameState::replay(&log)?;
    println!("\nSeed {} players {}", state.seed(), state.num_players());
    for (player, hole) in state.holes().iter().enumerate() {
        println!("Player {player}: {}", format_cards(hole));
    }

    println!("Board: {}", format_cards(state.board()));
    if let (Some(winners), Some(rank)) = (state.winners(), state.winning_rank()) {
        println!("Winners {winners:?} with {}", rank.describe());
    }

    Ok(())
}

fn print_event(event: &Event) {
    let seq = event.sequence;
    match &event.kind {
        EventKind::HandStarted { players, seed } => {
            println!("{seq:>3} Hand started with {players} players, seed {seed}");
        }
        EventKind::HoleCards { player, cards } => {
            println!("{seq:>3} Player {player}: {}", format_cards(cards));
        }
        EventKind::Board { cards } => {
            println!("{seq:>3} {}: {}", event.stage, format_cards(cards));
        }
        EventKind::Showdown {
            winners,
            rank,
            best,
        } => {
            println!(
                "{seq:>3} Winners {winners:?} with {} [{}]",
                rank.describe(),
                format_cards(best)
            );
        }
        EventKind::EquitySnapshot { equities } => {
            let equities = equities
                .iter()
                .enumerate()
                .map(|(player, e)| format!("P{player} {:.1}%", e * 100.0))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{seq:>3} Equity at {}: {equities}", event.stage);
        }
        EventKind::HandComplete => println!("{seq:>3} Hand complete"),
    }
}
