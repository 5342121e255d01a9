use bevy::prelude::*;
use strum::{Display, EnumIter};

/// The card's screens, shown one at a time in this order.
#[derive(States, Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Screen {
    #[default]
    Envelope,
    Puzzle,
    Prompt,
    Celebration,
}

/// Everything the screens report back. The sequencer alone decides what a
/// signal means for the current screen.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSignal {
    EnvelopeOpened,
    PuzzleSolved,
    Accepted,
    EvasionEscalated { move_count: u32 },
}

/// Transition table. Signals that make no sense for `current` are dropped.
pub const fn next_screen(current: Screen, signal: CardSignal) -> Option<Screen> {
    match (current, signal) {
        (Screen::Envelope, CardSignal::EnvelopeOpened) => Some(Screen::Puzzle),
        (Screen::Puzzle, CardSignal::PuzzleSolved) => Some(Screen::Prompt),
        (Screen::Prompt, CardSignal::Accepted) => Some(Screen::Celebration),
        _ => None,
    }
}

pub struct SequencerPlugin;

impl Plugin for SequencerPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<Screen>()
            .add_event::<CardSignal>()
            .add_systems(Update, advance_screen);
    }
}

pub(crate) fn advance_screen(
    mut signals: EventReader<CardSignal>,
    screen: Res<State<Screen>>,
    mut next_state: ResMut<NextState<Screen>>,
) {
    let mut current = *screen.get();
    for &signal in signals.read() {
        if let CardSignal::EvasionEscalated { move_count } = signal {
            info!("\"No\" dodged the pointer {move_count} time(s)");
            continue;
        }
        match next_screen(current, signal) {
            Some(next) => {
                info!("{signal:?}: {current} -> {next}");
                current = next;
                next_state.set(next);
            }
            None => debug!("Ignoring {signal:?} on {current}"),
        }
    }
}
