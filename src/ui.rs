//! HUD summary
//!
//! Plain values the host renders into labels each frame.

use serde::Serialize;

use crate::sim::Player;
use crate::tuning::Tuning;

/// Snapshot of everything the HUD shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSummary {
    pub status: &'static str,
    /// Only shown while airborne
    pub double_jump: Option<&'static str>,
    pub score: f32,
    /// Height above the ground line, never negative
    pub height: f32,
    pub platforms: usize,
    pub powerups: usize,
}

impl HudSummary {
    pub fn new(player: &Player, tuning: &Tuning, platforms: usize, powerups: usize) -> Self {
        let double_jump = if player.grounded {
            None
        } else if player.can_double_jump {
            Some("Double Jump Available")
        } else {
            Some("Double Jump Used")
        };

        Self {
            status: if player.grounded { "Grounded" } else { "Airborne" },
            double_jump,
            score: player.score,
            height: (tuning.ground_level - player.pos.y).max(0.0),
            platforms,
            powerups,
        }
    }

    /// Label lines in display order
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Status: {}", self.status)];
        if let Some(text) = self.double_jump {
            lines.push(text.to_string());
        }
        lines.push(format!("Score: {:.0}", self.score));
        lines.push(format!("Height: {:.0}m", self.height));
        lines.push(format!("Platforms: {}", self.platforms));
        lines.push(format!("Powerups: {}", self.powerups));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_airborne_summary() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.pos = Vec2::new(100.0, 250.0);
        player.score = 25.4;

        let hud = HudSummary::new(&player, &tuning, 17, 3);
        assert_eq!(
            hud.lines(),
            vec![
                "Status: Airborne",
                "Double Jump Available",
                "Score: 25",
                "Height: 250m",
                "Platforms: 17",
                "Powerups: 3",
            ]
        );
    }

    #[test]
    fn test_grounded_hides_double_jump() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.grounded = true;
        player.pos.y = 650.0;

        let hud = HudSummary::new(&player, &tuning, 7, 0);
        assert_eq!(hud.status, "Grounded");
        assert_eq!(hud.double_jump, None);
        assert_eq!(hud.height, 0.0);
    }

    #[test]
    fn test_spent_double_jump() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.can_double_jump = false;
        player.has_double_jumped = true;

        let hud = HudSummary::new(&player, &tuning, 0, 0);
        assert_eq!(hud.double_jump, Some("Double Jump Used"));
    }
}
