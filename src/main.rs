use std::fs::File;

use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::WriteLogger;

use snake::config::Config;
use snake::coordinator::{Coordinator, Shutdown};
use snake::error::Result;
use snake::game::{SnakeGame, BOARD_HEIGHT, BOARD_WIDTH};
use snake::term::{TermManager, TerminalInput};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    WriteLogger::init(
        config.log_level.into(),
        simplelog::Config::default(),
        File::create(&config.log_file)?,
    )?;
    info!("starting snake, {:?}", config);

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let game = SnakeGame::with_rng(rng);

    // Checked before touching the terminal so the error is readable.
    // Dropping `term` on an early return restores the terminal.
    let mut term = TermManager::new(BOARD_WIDTH, BOARD_HEIGHT)?;
    term.setup()?;

    let shutdown = Shutdown::new();
    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted");
            interrupt.raise();
        }
    });

    let mut coordinator = Coordinator::new(game, term, shutdown);
    let outcome = coordinator.run(TerminalInput::new()).await;

    let restored = coordinator.presenter_mut().restore();

    let game = coordinator.game();
    match game.crash() {
        Some(crash) => println!("Game over: {}. Size: {}", crash, game.len()),
        None => println!("Size: {}", game.len()),
    }
    info!("exiting with {} segments", game.len());

    outcome?;
    restored.map_err(Into::into)
}
