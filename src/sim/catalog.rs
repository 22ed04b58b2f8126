//! Platform catalog: landing effects per archetype
//!
//! Effects are plain functions over the platform record and the player,
//! dispatched on the archetype tag.

use serde::{Deserialize, Serialize};

use super::player::Player;
use super::state::{Archetype, Platform};
use crate::tuning::Tuning;

/// What a landing did, for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LandingEffect {
    None,
    /// Gold bonus paid out
    Bonus(f32),
    /// Gold platform already paid out earlier
    BonusSpent,
    /// Ice timer (re)started
    Ice { duration: f32 },
    /// Jump strength after the boost
    JumpBoost { strength: f32 },
}

/// Apply the platform's landing effect to the player
pub fn on_player_landed(
    platform: &mut Platform,
    player: &mut Player,
    tuning: &Tuning,
) -> LandingEffect {
    match platform.archetype {
        Archetype::Normal => LandingEffect::None,
        Archetype::Gold => {
            if platform.used {
                return LandingEffect::BonusSpent;
            }
            platform.used = true;
            player.award_bonus(tuning.gold_bonus);
            log::info!("Gold platform bonus! Updated score: {:.0}", player.score);
            LandingEffect::Bonus(tuning.gold_bonus)
        }
        Archetype::Icy => {
            player.apply_ice_effect(tuning.ice_duration);
            log::debug!("Landed on icy platform - sliding for {}s", tuning.ice_duration);
            LandingEffect::Ice {
                duration: tuning.ice_duration,
            }
        }
        Archetype::Rough => {
            player.boost_jump(tuning.rough_jump_bonus, tuning.max_jump_strength);
            log::info!("Rough platform landed! Jump strength: {}", player.jump_strength);
            LandingEffect::JumpBoost {
                strength: player.jump_strength,
            }
        }
    }
}
