//! Sky Climber entry point
//!
//! Native builds run a headless session driven by a simple autopilot and
//! print the final HUD as JSON. Usage: `sky-climber [tuning.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use sky_climber::consts::*;
    use sky_climber::sim::Platform;
    use sky_climber::{GameSession, HeadlessHost, SessionPhase, TickStatus, Tuning};

    /// Simulated seconds before the runner gives up
    const TIME_LIMIT: f32 = 120.0;
    /// Simulated frame length handed to the fixed-step loop
    const FRAME_DT: f32 = 1.0 / 30.0;
    /// Seconds between HUD log lines
    const HUD_INTERVAL: f32 = 5.0;

    /// Fixed-step driver around a session
    pub struct Runner {
        session: GameSession<HeadlessHost>,
        accumulator: f32,
        elapsed: f32,
        next_hud_log: f32,
    }

    impl Runner {
        pub fn new(tuning: Tuning, seed: u64) -> Self {
            let viewport = Vec2::new(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1);
            Self {
                session: GameSession::new(HeadlessHost::new(viewport), tuning, seed),
                accumulator: 0.0,
                elapsed: 0.0,
                next_hud_log: HUD_INTERVAL,
            }
        }

        /// Run frames until game over, quit, or the time limit
        pub fn run(&mut self) {
            while self.elapsed < TIME_LIMIT {
                if self.update(FRAME_DT) == TickStatus::Quit {
                    break;
                }
                if self.session.phase() == SessionPhase::GameOver {
                    if let Some(text) = &self.session.overlays().score_text {
                        log::info!("{text}");
                    }
                    break;
                }
                if self.elapsed >= self.next_hud_log {
                    self.next_hud_log += HUD_INTERVAL;
                    let hud = self.session.hud().lines().join(" | ");
                    log::info!("[{:.0}s] {hud}", self.elapsed);
                }
            }
        }

        fn update(&mut self, dt: f32) -> TickStatus {
            let dt = dt.min(0.1);
            self.accumulator += dt;
            self.elapsed += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.steer();
                if self.session.tick(SIM_DT) == TickStatus::Quit {
                    return TickStatus::Quit;
                }
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            TickStatus::Continue
        }

        /// Head for the closest platform above and jump when lined up
        fn steer(&mut self) {
            let player = self.session.player();
            let target = next_platform(player.pos, self.session.streamer().platforms());
            let (left, right, jump) = match target {
                Some(platform) => {
                    let dx = platform.pos.x - player.pos.x;
                    let lined_up = dx.abs() < platform.size.x / 2.0 + 40.0;
                    let jump = player.grounded
                        || (player.can_double_jump && player.vel.y > 0.0 && lined_up);
                    (dx < -5.0, dx > 5.0, jump)
                }
                None => (false, false, false),
            };

            let host = self.session.host_mut();
            host.hold_left(left);
            host.hold_right(right);
            if jump {
                host.press_jump();
            }
        }

        pub fn session(&self) -> &GameSession<HeadlessHost> {
            &self.session
        }
    }

    /// Lowest platform whose top is above the player's feet
    fn next_platform(pos: Vec2, platforms: &[Platform]) -> Option<&Platform> {
        platforms
            .iter()
            .filter(|p| p.pos.y < pos.y - 30.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sky_climber::Tuning;

    env_logger::init();
    log::info!("Sky Climber (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Could not load tuning from {path}: {e}; using defaults");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Invalid seed: {e}; using time-based seed");
            time_seed()
        }
        None => time_seed(),
    };
    log::info!("Game initialized with seed: {seed}");

    let mut runner = headless::Runner::new(tuning, seed);
    runner.run();

    match serde_json::to_string_pretty(&runner.session().hud()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize HUD: {e}"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web build embeds the library behind its own host
}
