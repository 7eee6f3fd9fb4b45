use std::time::Duration;

use glam::Vec2;
use rand::{Rng, RngCore};
use road_rush_core::HazardKind;
use road_rush_world::Body;

/// Fixed characteristics of a hazard type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HazardProfile {
    /// Hazard the profile describes.
    pub kind: HazardKind,
    /// Damage dealt to the player on contact.
    pub damage: u32,
    /// Fraction of the player's speed lost on contact.
    pub slow: f32,
    /// Probability of a spin-out on contact.
    pub spin_chance: f32,
    /// Time on the road before the hazard dries up; `None` is permanent.
    pub lifetime: Option<Duration>,
    /// Footprint on the road surface.
    pub size: Vec2,
    /// Warning shown when the player drives over it.
    pub warning: &'static str,
}

static OIL_SPILL: HazardProfile = HazardProfile {
    kind: HazardKind::OilSpill,
    damage: 0,
    slow: 0.0,
    spin_chance: 0.7,
    lifetime: Some(Duration::from_millis(10_000)),
    size: Vec2::new(60.0, 40.0),
    warning: "OIL!",
};

static ICE_PATCH: HazardProfile = HazardProfile {
    kind: HazardKind::IcePatch,
    damage: 0,
    slow: 0.5,
    spin_chance: 0.3,
    lifetime: Some(Duration::from_millis(15_000)),
    size: Vec2::new(80.0, 50.0),
    warning: "ICE!",
};

static POTHOLE: HazardProfile = HazardProfile {
    kind: HazardKind::Pothole,
    damage: 10,
    slow: 0.3,
    spin_chance: 0.1,
    lifetime: None,
    size: Vec2::new(30.0, 30.0),
    warning: "BUMP!",
};

/// Looks up the profile of a hazard type.
#[must_use]
pub fn profile(kind: HazardKind) -> &'static HazardProfile {
    match kind {
        HazardKind::OilSpill => &OIL_SPILL,
        HazardKind::IcePatch => &ICE_PATCH,
        HazardKind::Pothole => &POTHOLE,
    }
}

/// Chooses a hazard type from a uniform roll; ice only forms from level four.
#[must_use]
pub fn pick_hazard(level: u32, roll: f32) -> HazardKind {
    if level >= 4 && roll < 0.3 {
        HazardKind::IcePatch
    } else if roll < 0.6 {
        HazardKind::OilSpill
    } else {
        HazardKind::Pothole
    }
}

/// What a hazard does to the player on first contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HazardEffect {
    /// Hazard that was triggered.
    pub kind: HazardKind,
    /// Where the hazard lies.
    pub at: Vec2,
    /// Damage to apply.
    pub damage: u32,
    /// Fraction of speed to bleed off.
    pub slow: f32,
    /// Whether the player spins out.
    pub spin: bool,
    /// Warning text for the effect sink.
    pub warning: &'static str,
}

/// Hazard lying on the road surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Hazard {
    profile: &'static HazardProfile,
    body: Body,
    active: bool,
    expires_at: Option<Duration>,
    in_contact: bool,
}

impl Hazard {
    /// Places a hazard at `position`; its lifetime starts at `now`.
    #[must_use]
    pub fn spawn(kind: HazardKind, position: Vec2, now: Duration) -> Self {
        let profile = profile(kind);
        Self {
            profile,
            body: Body::new(position, profile.size),
            active: true,
            expires_at: profile.lifetime.map(|lifetime| now + lifetime),
            in_contact: false,
        }
    }

    /// Hazard type.
    #[must_use]
    pub fn kind(&self) -> HazardKind {
        self.profile.kind
    }

    /// Footprint on the road.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Whether the hazard is still on the road.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the player is still driving over it after a trigger.
    #[must_use]
    pub const fn is_in_contact(&self) -> bool {
        self.in_contact
    }

    /// Carries the hazard with the road and retires it once spent.
    pub(crate) fn drift(&mut self, dt: Duration, now: Duration, road_speed: f32, bottom: f32) {
        if !self.active {
            return;
        }
        self.body
            .translate(Vec2::new(0.0, road_speed * dt.as_secs_f32()));
        let expired = self.expires_at.is_some_and(|at| now >= at);
        if expired || self.body.position().y > bottom {
            self.active = false;
        }
    }

    /// Reports the effect of the player's car on the hazard this tick.
    ///
    /// A hazard triggers once per contact: it stays quiet while the player
    /// remains on it and re-arms when they drive off. Invulnerable players
    /// pass over without triggering it.
    pub fn contact(
        &mut self,
        overlapping: bool,
        invulnerable: bool,
        rng: &mut dyn RngCore,
    ) -> Option<HazardEffect> {
        if !overlapping {
            self.in_contact = false;
            return None;
        }
        if !self.active || self.in_contact || invulnerable {
            return None;
        }
        self.in_contact = true;
        let spin = rng.gen::<f32>() < self.profile.spin_chance;
        Some(HazardEffect {
            kind: self.profile.kind,
            at: self.body.position(),
            damage: self.profile.damage,
            slow: self.profile.slow,
            spin,
            warning: self.profile.warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn ice_only_forms_from_level_four() {
        assert_eq!(pick_hazard(3, 0.1), HazardKind::OilSpill);
        assert_eq!(pick_hazard(4, 0.1), HazardKind::IcePatch);
        assert_eq!(pick_hazard(4, 0.45), HazardKind::OilSpill);
        assert_eq!(pick_hazard(5, 0.6), HazardKind::Pothole);
    }

    #[test]
    fn contact_triggers_once_until_the_player_drives_off() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pothole = Hazard::spawn(HazardKind::Pothole, Vec2::new(100.0, 100.0), Duration::ZERO);

        let effect = pothole.contact(true, false, &mut rng);
        assert!(matches!(effect, Some(HazardEffect { damage: 10, .. })));
        assert_eq!(pothole.contact(true, false, &mut rng), None);

        assert_eq!(pothole.contact(false, false, &mut rng), None);
        assert!(pothole.contact(true, false, &mut rng).is_some());
    }

    #[test]
    fn invulnerable_players_pass_over_unharmed() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut ice = Hazard::spawn(HazardKind::IcePatch, Vec2::ZERO, Duration::ZERO);
        assert_eq!(ice.contact(true, true, &mut rng), None);
        assert!(!ice.is_in_contact());
        assert!(ice.contact(true, false, &mut rng).is_some());
    }

    #[test]
    fn spills_dry_up_but_potholes_stay() {
        let mut oil = Hazard::spawn(HazardKind::OilSpill, Vec2::ZERO, Duration::ZERO);
        let mut pothole = Hazard::spawn(HazardKind::Pothole, Vec2::ZERO, Duration::ZERO);
        let later = Duration::from_secs(60);
        oil.drift(Duration::ZERO, later, 0.0, 740.0);
        pothole.drift(Duration::ZERO, later, 0.0, 740.0);
        assert!(!oil.is_active());
        assert!(pothole.is_active());
    }
}
