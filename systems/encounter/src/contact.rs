use glam::Vec2;

/// How the player's car met a ground vehicle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Contact {
    /// Glancing side hit; the player is shoved along `direction` (±1).
    Ram {
        /// Horizontal sign pointing away from the other vehicle.
        direction: f32,
    },
    /// Head-on or rear-end hit.
    Frontal,
}

/// Classifies a player-vehicle overlap by the offset between their centres.
///
/// Side hits are those where the horizontal offset exceeds half the vertical
/// one. Civilians never ram; every civilian contact is frontal.
#[must_use]
pub fn classify(player: Vec2, other: Vec2, civilian: bool) -> Contact {
    let offset = player - other;
    if !civilian && offset.x.abs() > offset.y.abs() * 0.5 {
        let direction = if offset.x > 0.0 { 1.0 } else { -1.0 };
        Contact::Ram { direction }
    } else {
        Contact::Frontal
    }
}
