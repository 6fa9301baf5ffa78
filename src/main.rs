//! Fallin' Bubble headless runner
//!
//! Plays sessions on the rapier world with a random-column autoplayer and
//! reports the final scores. Useful for balancing the config and for soak
//! testing the gameplay core without a renderer.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use fallin_bubble::physics::RapierWorld;
use fallin_bubble::sim::{GameEvent, GamePhase, GameSession};
use fallin_bubble::ui::{Affordance, LogUi};
use fallin_bubble::GameConfig;

#[derive(Debug, Parser)]
#[command(name = "fallin-bubble", about = "Headless Fallin' Bubble autoplay")]
struct Args {
    /// Seed for bubble ranks and autoplayer columns
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// JSON config file (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Number of consecutive rounds
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if args.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }
    anyhow::ensure!(args.fps > 0, "--fps must be at least 1");

    log::info!("Fallin' Bubble (headless) starting with seed {}", args.seed);

    let frame = Duration::from_secs_f64(1.0 / args.fps as f64);
    let physics = RapierWorld::new(config.gravity);
    let mut session = GameSession::new(config.clone(), physics, LogUi, args.seed)?;
    let mut player = Pcg32::seed_from_u64(args.seed ^ 0x9e37_79b9_7f4a_7c15);

    for game in 1..=args.games {
        if game > 1 {
            session.activate(Affordance::Retry);
        }
        session.activate(Affordance::Start);

        let mut fusions = 0u32;
        let mut drops = 0u32;
        while session.phase() != GamePhase::GameOver {
            if session.phase() == GamePhase::CanPut {
                let x = player.random_range(0.0..config.field_width);
                session.request_reposition(x);
                session.request_drop();
            }
            session.advance(frame);

            for event in session.drain_events() {
                match event {
                    GameEvent::Dropped { .. } => drops += 1,
                    GameEvent::Fused(_) => fusions += 1,
                    _ => {}
                }
            }
        }

        println!(
            "game {game}: score {} ({drops} drops, {fusions} fusions, {:?})",
            session.score(),
            session.game_over_reason()
        );
    }

    Ok(())
}
