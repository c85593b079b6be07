// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::Context;
use referee::core::MoveRequest;
use referee::fen::{self, Setup};
use referee::Game;
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

/// Referees a game: plays the given moves, rejecting illegal ones, and reports the result.
#[derive(Debug, StructOpt)]
struct Options {
    /// FEN of the starting position. Defaults to the standard starting position.
    #[structopt(long)]
    fen: Option<String>,

    /// Print the game document as JSON instead of a summary.
    #[structopt(long)]
    json: bool,

    /// Moves in coordinate notation, e.g. e2e4 or e7e8q.
    #[structopt(name = "MOVES")]
    moves: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::WARN)
        .with_env_filter(EnvFilter::from_env("REFEREE_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let args = Options::from_args();
    let setup = match &args.fen {
        Some(fen) => fen::parse(fen).with_context(|| format!("invalid FEN: {}", fen))?,
        None => Setup::initial(),
    };

    let mut game = Game::from_setup(setup);
    for (ply, text) in args.moves.iter().enumerate() {
        let request: MoveRequest = text
            .parse()
            .with_context(|| format!("ply {}: cannot parse {:?}", ply + 1, text))?;
        game.play(request)
            .with_context(|| format!("ply {}: {} rejected", ply + 1, request))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&game)?);
        return Ok(());
    }

    println!("{}", game.board());
    for (i, pair) in game.notation().chunks(2).enumerate() {
        println!("{:>3}. {}", i + 1, pair.join(" "));
    }

    match game.outcome() {
        Some(outcome) => println!("{:<12} {}", "Result:", outcome),
        None => println!("{:<12} {}", "To move:", game.turn()),
    }

    Ok(())
}
