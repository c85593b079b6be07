// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use referee::attacks;
use referee::fen;
use referee::special::{en_passant, promotion};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

#[derive(Debug, StructOpt)]
struct Options {
    /// FEN representation of the position to analyze.
    #[structopt(name = "FEN")]
    fen: String,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::WARN)
        .with_env_filter(EnvFilter::from_env("REFEREE_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let ops = Options::from_args();
    let setup = fen::parse(&ops.fen)?;
    let last_move = setup
        .en_passant
        .and_then(|target| en_passant::implied_last_move(&setup.board, target, setup.to_move));
    for (from, to) in attacks::legal_moves(&setup.board, setup.to_move, last_move.as_ref()) {
        let promotes = setup
            .board
            .piece_at(from)
            .map_or(false, |p| p.kind == referee::core::PieceKind::Pawn)
            && promotion::is_promotion_square(to, setup.to_move);
        if promotes {
            println!("{}{}{}", from, to, promotion::DEFAULT_PROMOTION);
        } else {
            println!("{}{}", from, to);
        }
    }

    Ok(())
}
