//! Restocking the player from the weapons van and from pickups.

use road_rush_core::{PowerUpKind, Weapon};
use road_rush_system_roadside::power_ups::{REFILL, SCORE_BONUS, SHIELD_DURATION};
use road_rush_world::player::Player;

/// Ammunition granted by the van: weapon, amount and the cap it tops up to.
pub const VAN_AMMO: [(Weapon, u32, u32); 3] = [
    (Weapon::Missile, 5, 10),
    (Weapon::OilSlick, 3, 6),
    (Weapon::SmokeScreen, 2, 4),
];

/// Health restored by the van.
pub const VAN_HEALING: i32 = 50;

/// Health the van will not heal beyond.
pub const VAN_HEALTH_CAP: i32 = 100;

/// Grants the van's full resupply.
pub fn restock_from_van(player: &mut Player) {
    for (weapon, amount, cap) in VAN_AMMO {
        player.add_ammo(weapon, amount, Some(cap));
    }
    player.heal(VAN_HEALING, VAN_HEALTH_CAP);
}

/// Applies a collected pickup to the player.
pub fn apply_power_up(player: &mut Player, kind: PowerUpKind) {
    match kind {
        PowerUpKind::WeaponRefill => {
            for (weapon, amount) in REFILL {
                player.add_ammo(weapon, amount, None);
            }
        }
        PowerUpKind::Shield => player.grant_invulnerability(SHIELD_DURATION),
        PowerUpKind::SpeedBoost => player.boost_to_max_speed(),
        PowerUpKind::ScoreBonus => player.add_score(SCORE_BONUS),
        PowerUpKind::ExtraLife => player.add_life(),
    }
}

#[cfg(test)]
mod tests {
    use road_rush_core::{PlayerTuning, RoadLayout, WeaponTuning};

    use super::*;

    fn player() -> Player {
        Player::new(
            PlayerTuning::default(),
            WeaponTuning::default(),
            RoadLayout::default(),
            200.0,
        )
    }

    #[test]
    fn van_tops_up_to_its_caps() {
        let mut player = player();
        let _ = player.take_damage(80);
        restock_from_van(&mut player);
        restock_from_van(&mut player);
        assert_eq!(player.ammo(Weapon::Missile), Some(10));
        assert_eq!(player.ammo(Weapon::OilSlick), Some(6));
        assert_eq!(player.ammo(Weapon::SmokeScreen), Some(4));
        assert_eq!(player.health(), 100);
    }

    #[test]
    fn refill_adds_without_a_cap() {
        let mut player = player();
        let before = player.ammo(Weapon::Missile).unwrap_or(0);
        apply_power_up(&mut player, PowerUpKind::WeaponRefill);
        assert_eq!(player.ammo(Weapon::Missile), Some(before + 3));
    }

    #[test]
    fn speed_boost_hits_the_top_speed() {
        let mut player = player();
        apply_power_up(&mut player, PowerUpKind::SpeedBoost);
        assert_eq!(player.speed(), PlayerTuning::default().max_speed);
    }
}
