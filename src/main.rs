//! Retro Arcade - headless attract mode
//!
//! Runs one game on autopilot at the fixed timestep, logs how it went and
//! records the high score. The browser build is driven from JS through
//! `platform::web` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, bail};
    use retro_arcade::platform::{self, native::score_store};
    use retro_arcade::session::open_screen;
    use retro_arcade::sim::GamePhase;
    use retro_arcade::{GameId, Settings};

    /// Longest attract run (simulated seconds)
    const MAX_SECONDS: u64 = 600;
    const SETTINGS_FILE: &str = "retro-arcade.json";

    const USAGE: &str = "usage: retro-arcade <maze|falling-shape|merge|bomb-arena> [seconds]";

    pub fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let mut args = std::env::args().skip(1);
        let Some(name) = args.next() else {
            bail!(USAGE);
        };
        let game: GameId = name.parse().context(USAGE)?;
        let seconds = match args.next() {
            Some(s) => s
                .parse::<u64>()
                .with_context(|| format!("invalid duration {s:?}"))?,
            None => MAX_SECONDS,
        };

        let settings = Settings::load_or_default(SETTINGS_FILE);
        let seed = platform::seed(&settings);
        log::info!("Retro Arcade (native) starting {game} with seed: {seed}");

        let mut screen = open_screen(game, &settings, score_store(&settings), seed);
        screen.set_autopilot(true);
        screen.start();

        let rate = u64::from(settings.tick_rate_hz);
        let max_ticks = seconds * rate;
        let mut ticks = 0u64;
        while ticks < max_ticks && screen.phase() == GamePhase::Running {
            // Slightly over one step so float drift never skips a tick
            ticks += u64::from(screen.frame(settings.sim_dt() * 1.001));
        }

        let outcome = match screen.phase() {
            GamePhase::Running => "time limit",
            GamePhase::Over => "game over",
            GamePhase::Won => "won",
            _ => "stopped",
        };
        log::info!(
            "{game}: {outcome} after {:.1}s, score {} (best {})",
            ticks as f32 / rate as f32,
            screen.score(),
            screen.best()
        );
        log::debug!("Final frame: {} draw commands", screen.draw().len());

        println!("{game}\t{outcome}\t{}", screen.score());
        Ok(())
    }
}
