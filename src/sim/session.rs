//! Top-level session state machine
//!
//! Owns the player, the level streamer and the host. One `tick` per frame:
//! Running ticks player physics, landing effects, pickups, generation, death
//! checks, camera and cleanup; Dying waits out the death delay; GameOver waits
//! for a restart. Quit preempts everything.

use glam::Vec2;

use super::catalog;
use super::player::Player;
use super::state::{OverlayState, SessionPhase};
use super::streamer::{LevelStreamer, cleanup_threshold};
use crate::host::{Host, TickInput};
use crate::tuning::Tuning;
use crate::ui::HudSummary;

/// Whether the host should keep running frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Continue,
    Quit,
}

/// A single run of the game, from opening layout to game over and back
pub struct GameSession<H: Host> {
    host: H,
    tuning: Tuning,
    player: Player,
    streamer: LevelStreamer,
    phase: SessionPhase,
    /// Best checkpoint Y; moves only on upward progress
    last_valid_y: f32,
    camera: Vec2,
    overlays: OverlayState,
}

impl<H: Host> GameSession<H> {
    /// Create a session with the given seed and spawn the opening layout
    pub fn new(host: H, tuning: Tuning, seed: u64) -> Self {
        Self::with_streamer(host, tuning, LevelStreamer::new(seed))
    }

    /// Create a session around an existing streamer
    pub fn with_streamer(mut host: H, tuning: Tuning, mut streamer: LevelStreamer) -> Self {
        let player = Player::new(&tuning);
        streamer.spawn_opening_layout(&mut host, &tuning);
        log::info!(
            "Session started, {} opening platforms",
            streamer.platforms().len()
        );

        Self {
            host,
            last_valid_y: player.pos.y,
            camera: tuning.camera_home,
            player,
            streamer,
            phase: SessionPhase::Running,
            overlays: OverlayState::default(),
            tuning,
        }
    }

    /// Advance the session by one frame
    pub fn tick(&mut self, dt: f32) -> TickStatus {
        let input = self.host.poll_input();
        if input.quit {
            log::info!("Quit requested");
            return TickStatus::Quit;
        }

        match self.phase {
            SessionPhase::Running => self.tick_running(&input, dt),
            SessionPhase::Dying { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.tuning.death_delay {
                    self.show_game_over();
                } else {
                    self.phase = SessionPhase::Dying { elapsed };
                }
            }
            SessionPhase::GameOver => {
                if input.restart {
                    self.restart();
                }
            }
        }

        TickStatus::Continue
    }

    fn tick_running(&mut self, input: &TickInput, dt: f32) {
        let viewport = self.host.viewport_size();

        let landed_on = self
            .player
            .physics_step(&mut self.host, input, &self.tuning, dt);
        for handle in landed_on {
            if let Some(platform) = self.streamer.platform_mut(handle) {
                catalog::on_player_landed(platform, &mut self.player, &self.tuning);
            }
        }

        self.streamer
            .collect_powerups(&mut self.host, &mut self.player, &self.tuning);
        self.streamer.generate_ahead(&mut self.host, &self.tuning);

        if self.should_die(viewport.y) {
            self.start_dying();
            return;
        }

        let camera_y = self.player.pos.y.min(self.last_valid_y);
        self.camera = Vec2::new(self.player.pos.x, camera_y);

        if self.player.pos.y < self.last_valid_y - self.tuning.checkpoint_step {
            self.last_valid_y = self.player.pos.y;
            let threshold = cleanup_threshold(
                self.player.pos.y,
                self.last_valid_y,
                viewport.y,
                &self.tuning,
            );
            self.streamer.cleanup(&mut self.host, threshold);
            self.streamer.generate_ahead(&mut self.host, &self.tuning);
        }
    }

    /// Past the hard boundary, or falling far below the last checkpoint
    fn should_die(&self, viewport_height: f32) -> bool {
        let y = self.player.pos.y;
        y > self.tuning.death_boundary
            || (y > self.last_valid_y + viewport_height * self.tuning.fall_off_screens
                && self.player.vel.y > 0.0)
    }

    fn start_dying(&mut self) {
        log::info!(
            "Player fell at y={:.0}, score {:.0}",
            self.player.pos.y,
            self.player.score
        );
        self.phase = SessionPhase::Dying { elapsed: 0.0 };
        self.overlays.falling_visible = true;
    }

    fn show_game_over(&mut self) {
        log::info!("Game over, final score {:.0}", self.player.score);
        self.phase = SessionPhase::GameOver;
        self.overlays = OverlayState {
            falling_visible: false,
            game_over_visible: true,
            score_text: Some(format!("Final Score: {:.0}", self.player.score)),
        };
    }

    fn restart(&mut self) {
        self.streamer.clear(&mut self.host);
        self.player.reset(&self.tuning);
        self.camera = self.tuning.camera_home;
        self.overlays = OverlayState::default();
        self.streamer.spawn_opening_layout(&mut self.host, &self.tuning);
        self.last_valid_y = self.player.pos.y;
        self.phase = SessionPhase::Running;
        log::info!("Session restarted");
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn streamer(&self) -> &LevelStreamer {
        &self.streamer
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn last_valid_y(&self) -> f32 {
        self.last_valid_y
    }

    /// Where the host camera should look
    pub fn camera_target(&self) -> Vec2 {
        self.camera
    }

    pub fn overlays(&self) -> &OverlayState {
        &self.overlays
    }

    pub fn hud(&self) -> HudSummary {
        HudSummary::new(
            &self.player,
            &self.tuning,
            self.streamer.platforms().len(),
            self.streamer.live_powerup_count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;
    use crate::sim::Archetype;
    use crate::sim::streamer::OPENING_LAYOUT;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn session(seed: u64) -> GameSession<HeadlessHost> {
        GameSession::new(HeadlessHost::default(), Tuning::default(), seed)
    }

    fn assert_opening_layout(session: &GameSession<HeadlessHost>) {
        let platforms = session.streamer().platforms();
        assert_eq!(platforms.len(), OPENING_LAYOUT.len());
        for (platform, expected) in platforms.iter().zip(OPENING_LAYOUT.iter()) {
            assert_eq!(platform.pos, Vec2::new(expected.x, expected.y));
            assert_eq!(platform.size.x, expected.width);
            assert_eq!(platform.archetype, expected.archetype);
            assert!(!platform.used);
        }
    }

    #[test]
    fn test_new_session() {
        let session = session(1);
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_opening_layout(&session);
        assert_eq!(session.camera_target(), Vec2::new(400.0, 300.0));
        assert_eq!(session.last_valid_y(), 400.0);
        assert_eq!(session.overlays(), &OverlayState::default());
    }

    #[test]
    fn test_first_tick_generates_ahead() {
        let mut session = session(1);
        session.tick(DT);
        assert_eq!(session.streamer().platforms().len(), 17);
        assert_eq!(
            session.host().live_entities(),
            17 + session.streamer().powerups().len()
        );
    }

    #[test]
    fn test_death_game_over_restart() {
        let mut session = session(2);
        session.tick(DT);

        session.player_mut().pos.y = 701.0;
        session.tick(DT);
        assert_eq!(session.phase(), SessionPhase::Dying { elapsed: 0.0 });
        assert!(session.overlays().falling_visible);

        // Input is ignored while dying
        session.host_mut().press_restart();
        for _ in 0..3 {
            session.tick(0.5);
            assert!(matches!(session.phase(), SessionPhase::Dying { .. }));
        }
        session.tick(0.5);
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert!(!session.overlays().falling_visible);
        assert!(session.overlays().game_over_visible);
        assert!(session.overlays().score_text.is_some());

        // Stays over until restart
        for _ in 0..10 {
            session.tick(0.5);
        }
        assert_eq!(session.phase(), SessionPhase::GameOver);

        session.host_mut().press_restart();
        session.tick(DT);
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.player().pos, Vec2::new(100.0, 400.0));
        assert_eq!(session.player().score, 0.0);
        assert!(session.streamer().powerups().is_empty());
        assert_opening_layout(&session);
        assert_eq!(session.host().live_entities(), 7);
        assert_eq!(session.camera_target(), Vec2::new(400.0, 300.0));
        assert_eq!(session.overlays(), &OverlayState::default());
    }

    #[test]
    fn test_game_over_score_text() {
        let mut session = session(3);
        session.player_mut().score = 123.4;
        session.player_mut().pos.y = 750.0;
        session.tick(DT);
        session.tick(2.0);
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert_eq!(
            session.overlays().score_text.as_deref(),
            Some("Final Score: 123")
        );
    }

    #[test]
    fn test_falling_off_known_world() {
        let mut session = session(4);
        session.last_valid_y = -1000.0;
        session.player_mut().pos = Vec2::new(100.0, 0.0);
        session.tick(DT);
        assert!(matches!(session.phase(), SessionPhase::Dying { .. }));
    }

    #[test]
    fn test_rising_below_checkpoint_survives() {
        let mut session = session(4);
        session.last_valid_y = -1000.0;
        session.player_mut().pos = Vec2::new(100.0, 0.0);
        session.player_mut().vel.y = -400.0;
        session.tick(DT);
        assert_eq!(session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_quit_preempts_every_phase() {
        let mut session = session(5);
        session.host_mut().press_quit();
        assert_eq!(session.tick(DT), TickStatus::Quit);

        session.player_mut().pos.y = 800.0;
        session.tick(DT);
        session.host_mut().press_quit();
        assert_eq!(session.tick(DT), TickStatus::Quit);
        assert!(matches!(session.phase(), SessionPhase::Dying { .. }));
    }

    #[test]
    fn test_gold_bonus_paid_once() {
        let mut session = session(6);
        // Drop onto the gold intro platform
        session.player_mut().pos = Vec2::new(550.0, 260.0);
        for _ in 0..60 {
            session.tick(DT);
        }
        assert!(session.player().on_floor());
        let gold = session
            .streamer()
            .platforms()
            .iter()
            .find(|p| p.archetype == Archetype::Gold)
            .map(|p| p.used);
        assert_eq!(gold, Some(true));

        // Hop and land on it again
        session.host_mut().press_jump();
        for _ in 0..90 {
            session.tick(DT);
        }
        assert!(session.player().on_floor());

        let player = session.player();
        let expected = session.tuning().height_score(player.highest_y) + 100.0;
        assert!((player.score - expected).abs() < 1e-3);
    }

    #[test]
    fn test_powerup_pickup() {
        let mut session = session(7);
        let tuning = session.tuning().clone();
        session
            .streamer
            .spawn_powerup(&mut session.host, &tuning, Vec2::new(100.0, 400.0));
        assert_eq!(session.hud().powerups, 1);

        session.tick(DT);
        assert!((session.player().score_multiplier - 1.2).abs() < 1e-6);
        let spot = Vec2::new(100.0, 400.0);
        assert!(session.streamer().powerups().iter().all(|p| p.pos != spot));
        assert_eq!(session.hud().powerups, session.streamer().powerups().len());
    }

    #[test]
    fn test_camera_never_drops_below_checkpoint() {
        let mut session = session(8);
        session.player_mut().pos = Vec2::new(300.0, 100.0);
        session.tick(DT);
        let checkpoint = session.last_valid_y();
        assert!(checkpoint < 101.0);
        assert_eq!(session.camera_target().y, checkpoint.min(session.player().pos.y));

        // Falling back down leaves the camera at the checkpoint
        session.player_mut().pos = Vec2::new(300.0, 150.0);
        session.tick(DT);
        assert_eq!(session.camera_target().y, checkpoint);
        assert_eq!(session.camera_target().x, session.player().pos.x);
    }

    #[test]
    fn test_checkpoint_cleans_up_and_refills() {
        let mut session = session(9);
        session.player_mut().pos = Vec2::new(300.0, -2000.0);
        session.tick(DT);
        assert_eq!(session.phase(), SessionPhase::Running);

        let threshold = session.player().pos.y.max(session.last_valid_y()) + 1200.0;
        let platforms = session.streamer().platforms();
        assert!(!platforms.is_empty());
        assert!(platforms.iter().all(|p| p.pos.y <= threshold));
        assert!(session.streamer().powerups().iter().all(|p| p.pos.y <= threshold));
        assert_eq!(
            session.host().live_entities(),
            platforms.len() + session.streamer().powerups().len()
        );
    }

    #[test]
    fn test_viewport_resize_applies_next_tick() {
        let mut session = session(11);
        session.player_mut().pos = Vec2::new(700.0, -300.0);
        session.tick(DT);
        assert_eq!(session.player().pos.x, 700.0);

        session.host_mut().set_viewport(Vec2::new(500.0, 400.0));
        session.tick(DT);
        // Clamped to the new right edge
        assert_eq!(session.player().pos.x, 480.0);
        // Falling off is now measured against the shorter screen
        let checkpoint = session.last_valid_y();
        assert!(checkpoint + 601.0 < session.tuning().death_boundary);
        session.player_mut().pos = Vec2::new(300.0, checkpoint + 601.0);
        session.tick(DT);
        assert!(matches!(session.phase(), SessionPhase::Dying { .. }));
    }

    #[test]
    fn test_hud_reflects_session() {
        let mut session = session(10);
        session.tick(DT);
        let hud = session.hud();
        assert_eq!(hud.status, "Airborne");
        assert_eq!(hud.platforms, 17);
        assert_eq!(hud.height, (500.0 - session.player().pos.y).max(0.0));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn height_record_and_score_never_regress(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>()),
                1..400,
            ),
        ) {
            let mut session = session(seed);
            let mut highest = session.player().highest_y;
            let mut score = session.player().score;

            for (left, right, jump) in inputs {
                session.host_mut().hold_left(left);
                session.host_mut().hold_right(right);
                if jump {
                    session.host_mut().press_jump();
                }
                session.tick(DT);

                let player = session.player();
                prop_assert!(player.highest_y <= highest);
                prop_assert!(player.score >= score);
                highest = player.highest_y;
                score = player.score;
            }
        }
    }
}
