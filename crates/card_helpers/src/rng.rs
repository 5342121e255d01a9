use bevy::prelude::*;

/// Random source shared by the card screens.
///
/// Wrapping the generator in a resource lets tests swap in a seeded one.
#[derive(Resource)]
pub struct CardRng(pub fastrand::Rng);

impl CardRng {
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl Default for CardRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}
