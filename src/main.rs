//! Chaos Clicker entry point
//!
//! Runs a headless autoplay session on the virtual clock: a simple bot clicks
//! at a fixed cadence while the chaos scheduler does its thing, then the final
//! snapshot is printed as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use glam::Vec2;

    use chaos_clicker::rng::ChaosRng;
    use chaos_clicker::sim::{Click, Game, TickInput};
    use chaos_clicker::{
        ChaosError, DisplaySurface, EffectPlayer, FixedSurface, LogEffectPlayer, Millis, Result,
        Settings, TuningPreset,
    };

    /// Frame length of the driver loop
    const FRAME_MS: Millis = 16;

    #[derive(Parser, Debug)]
    #[command(name = "chaos-clicker", version, about = "Headless autoplay session of the chaos clicker core")]
    struct Args {
        /// Virtual seconds to play
        #[arg(long, default_value_t = 60)]
        seconds: u64,

        /// RNG seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Settings JSON file
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Tuning preset (simple, canonical); ignored when --settings is given
        #[arg(long)]
        preset: Option<String>,

        /// Write the effective settings to this file and continue
        #[arg(long)]
        write_settings: Option<PathBuf>,

        #[arg(long, default_value_t = 1280.0)]
        width: f32,

        #[arg(long, default_value_t = 720.0)]
        height: f32,

        /// Chance the bot aims at the target instead of a random spot
        #[arg(long, default_value_t = 0.6)]
        accuracy: f32,

        /// Milliseconds between bot clicks
        #[arg(long, default_value_t = 700)]
        click_every_ms: Millis,
    }

    fn load_settings(args: &Args) -> Result<Settings> {
        if let Some(path) = &args.settings {
            return Settings::load_from(path);
        }
        match &args.preset {
            Some(name) => TuningPreset::from_str(name)
                .map(Settings::from_preset)
                .ok_or_else(|| ChaosError::InvalidTuning(format!("unknown preset '{name}'"))),
            None => Ok(Settings::default()),
        }
    }

    /// Virtual end time of a session, pinned to the clock limit for huge values
    fn session_end(seconds: u64) -> Millis {
        seconds.saturating_mul(1_000)
    }

    /// Picks where the bot clicks next
    struct Bot {
        rng: ChaosRng,
        accuracy: f32,
    }

    impl Bot {
        fn aim<S: DisplaySurface, P: EffectPlayer>(&mut self, game: &Game<S, P>) -> Vec2 {
            let state = game.state();
            if state.bonus.visible {
                return state.bonus.bounds().center();
            }
            if state.target.visible && self.rng.chance(self.accuracy) {
                return state.target.bounds().center();
            }
            let viewport = game.surface().viewport();
            Vec2::new(
                self.rng.uniform(0.0, viewport.x),
                self.rng.uniform(0.0, viewport.y),
            )
        }
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        let settings = load_settings(&args)?;
        if let Some(path) = &args.write_settings {
            settings.save_to(path)?;
        }

        let rng = match args.seed {
            Some(seed) => ChaosRng::seeded(seed),
            None => ChaosRng::from_entropy(),
        };
        let bot_seed = rng.seed().wrapping_add(1);
        let mut game = Game::new(
            &settings,
            FixedSurface::new(args.width, args.height),
            LogEffectPlayer::new(),
            rng,
        )?;
        let mut bot = Bot {
            rng: ChaosRng::seeded(bot_seed),
            accuracy: args.accuracy,
        };

        let end = session_end(args.seconds);
        let mut next_click = args.click_every_ms;
        let mut last_score = game.current_score();
        while game.now() < end {
            let frame_end = game.now().saturating_add(FRAME_MS).min(end);
            let mut input = TickInput::default();
            // Bot clicks are captured against the state at the start of the frame
            while next_click <= frame_end {
                input.clicks.push(Click {
                    at: next_click,
                    point: bot.aim(&game),
                });
                next_click = next_click.saturating_add(args.click_every_ms.max(1));
                if next_click == Millis::MAX {
                    break;
                }
            }
            game.advance(frame_end - game.now(), &input);

            let score = game.current_score();
            if score != last_score {
                log::debug!("[{}ms] score {score}: {}", game.now(), game.current_message());
                last_score = score;
            }
        }

        log::info!(
            "Session over after {}s: score {}, {} effects played",
            args.seconds,
            game.current_score(),
            game.player().played()
        );
        println!("{}", serde_json::to_string_pretty(&game.snapshot())?);
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Chaos Clicker (headless) starting...");

    if let Err(e) = native::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly; there is no wasm driver
}
