use bevy::prelude::*;

/// State of the "No" button that runs away from the pointer.
///
/// It starts in the normal button row. The first time the pointer comes near
/// it jumps to one of the safe positions and keeps jumping on every approach
/// after that. There is no limit on the number of jumps.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct EvasiveControl {
    relocated: bool,
    position: Option<Vec2>,
    move_count: u32,
}

impl EvasiveControl {
    pub const fn is_relocated(&self) -> bool {
        self.relocated
    }

    pub const fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub const fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Moves the button to a random safe position and returns it.
    ///
    /// The new position may equal the previous one. Returns `None` only when
    /// there is nowhere to go, in which case the button stays put.
    pub fn on_proximity(&mut self, safe_positions: &[Vec2], rng: &mut fastrand::Rng) -> Option<Vec2> {
        if safe_positions.is_empty() {
            warn!("No safe positions configured, the \"No\" button cannot move");
            return None;
        }
        let position = safe_positions.get(rng.usize(..safe_positions.len())).copied()?;
        self.relocated = true;
        self.move_count += 1;
        self.position = Some(position);
        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners() -> Vec<Vec2> {
        vec![
            Vec2::new(20.0, 80.0),
            Vec2::new(260.0, 80.0),
            Vec2::new(20.0, 700.0),
            Vec2::new(260.0, 700.0),
        ]
    }

    #[test]
    fn starts_idle() {
        let control = EvasiveControl::default();
        assert!(!control.is_relocated());
        assert_eq!(control.position(), None);
        assert_eq!(control.move_count(), 0);
    }

    #[test]
    fn every_approach_moves_to_a_safe_position() {
        let safe = corners();
        let mut rng = fastrand::Rng::with_seed(42);
        let mut control = EvasiveControl::default();

        for expected_count in 1..=200 {
            let position = control.on_proximity(&safe, &mut rng).unwrap();
            assert!(safe.contains(&position), "{position} is not a safe position");
            assert_eq!(control.position(), Some(position));
            assert_eq!(control.move_count(), expected_count);
            assert!(control.is_relocated());
        }
    }

    #[test]
    fn uses_every_safe_position_eventually() {
        let safe = corners();
        let mut rng = fastrand::Rng::with_seed(1);
        let mut control = EvasiveControl::default();
        let mut seen = [false; 4];
        for _ in 0..200 {
            let position = control.on_proximity(&safe, &mut rng).unwrap();
            if let Some(index) = safe.iter().position(|&p| p == position) {
                if let Some(flag) = seen.get_mut(index) {
                    *flag = true;
                }
            }
        }
        assert!(seen.iter().all(|&flag| flag), "some corner was never picked: {seen:?}");
    }

    #[test]
    fn single_position_can_repeat() {
        let safe = [Vec2::new(5.0, 5.0)];
        let mut rng = fastrand::Rng::with_seed(3);
        let mut control = EvasiveControl::default();
        assert_eq!(control.on_proximity(&safe, &mut rng), Some(safe[0]));
        assert_eq!(control.on_proximity(&safe, &mut rng), Some(safe[0]));
        assert_eq!(control.move_count(), 2);
    }

    #[test]
    fn empty_position_set_leaves_state_alone() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut control = EvasiveControl::default();
        assert_eq!(control.on_proximity(&[], &mut rng), None);
        assert_eq!(control, EvasiveControl::default());
    }
}
