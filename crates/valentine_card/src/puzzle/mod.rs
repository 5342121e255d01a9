use bevy::prelude::*;
use card_helpers::input::probe_touch_capability;
use card_helpers::rng::CardRng;
use card_helpers::screen::despawn_screen;

pub mod gesture;
pub mod grid;
pub mod layout;
pub mod session;
mod view;

use gesture::{
    GestureCommand, InputBackend, PuzzleInput, mouse_contact_inputs, touch_contact_inputs,
};
use grid::TileGrid;
use layout::BoardLayout;
use session::{MoveOutcome, PuzzleSession};
use view::PuzzleScreen;

use crate::CardImages;
use crate::config::{Palette, PuzzleConfig};
use crate::sequencer::{CardSignal, Screen};

pub struct PuzzlePlugin;

impl Plugin for PuzzlePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Screen::Puzzle), mount_puzzle)
            .add_systems(
                Update,
                (
                    handle_drag_input,
                    settle_solved_puzzle,
                    view::crop_tiles,
                    view::close_gap,
                    view::glide_tiles,
                    view::follow_drag,
                )
                    .chain()
                    .run_if(in_state(Screen::Puzzle))
                    .run_if(resource_exists::<PuzzleSession>),
            )
            .add_systems(
                OnExit(Screen::Puzzle),
                (unmount_puzzle, despawn_screen::<PuzzleScreen>),
            );
    }
}

fn mount_puzzle(
    mut commands: Commands,
    config: Res<PuzzleConfig>,
    palette: Res<Palette>,
    images: Res<CardImages>,
    mut rng: ResMut<CardRng>,
) {
    let grid = TileGrid::shuffled(&mut rng.0);
    info!("New puzzle:\n{grid}");

    let backend = InputBackend::select(config.forced_backend, probe_touch_capability());
    info!("Puzzle input backend: {backend}");

    let layout = BoardLayout {
        center: config.board_center,
        board_size: config.board_size,
        gap: config.tile_gap,
    };

    view::spawn_puzzle_screen(&mut commands, &config, &palette, &images, &layout, &grid);

    commands.insert_resource(PuzzleInput::new(backend, &config));
    commands.insert_resource(layout);
    commands.insert_resource(PuzzleSession::new(grid, config.settle_delay));
}

pub(crate) fn unmount_puzzle(mut commands: Commands, session: Option<Res<PuzzleSession>>) {
    if session.is_some_and(|session| session.settle_pending()) {
        info!("Puzzle left before settling, dropping the pending solved signal");
    }
    commands.remove_resource::<PuzzleSession>();
    commands.remove_resource::<PuzzleInput>();
    commands.remove_resource::<BoardLayout>();
}

fn handle_drag_input(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform)>,
    time: Res<Time>,
    layout: Res<BoardLayout>,
    mut input: ResMut<PuzzleInput>,
    mut session: ResMut<PuzzleSession>,
) {
    let mut contact_inputs = mouse_contact_inputs(&buttons, &windows, &camera);
    if input.reads_touches() {
        contact_inputs.extend(touch_contact_inputs(&touches, &camera));
    }
    for command in input.commands(contact_inputs, time.elapsed()) {
        apply_gesture(&mut session, &layout, command);
    }
}

pub(crate) fn apply_gesture(
    session: &mut PuzzleSession,
    layout: &BoardLayout,
    command: GestureCommand,
) {
    match command {
        GestureCommand::Start { origin, pointer } => {
            let Some(source) = layout.slot_at(origin) else {
                return;
            };
            let Some(tile) = session.grid().tile_at(source) else {
                return;
            };
            if session.start_drag(tile, source, pointer) {
                debug!("Picked up tile {tile} from slot {source}");
            }
        }
        GestureCommand::Track(pointer) => session.track(pointer),
        GestureCommand::Drop(pointer) => match session.drop_on(layout.slot_at(pointer)) {
            MoveOutcome::Ignored => debug!("Drop ignored"),
            MoveOutcome::Moved => debug!("Tiles swapped:\n{}", session.grid()),
            MoveOutcome::Solved => info!("Puzzle solved"),
        },
        GestureCommand::Cancel => session.cancel_drag(),
    }
}

pub(crate) fn settle_solved_puzzle(
    time: Res<Time>,
    mut session: ResMut<PuzzleSession>,
    mut signals: EventWriter<CardSignal>,
) {
    if session.tick(time.delta()) {
        signals.send(CardSignal::PuzzleSolved);
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;

    use super::gesture::{Contact, ContactInput, RawInput};
    use super::*;
    use crate::sequencer::SequencerPlugin;

    const LAYOUT: BoardLayout = BoardLayout {
        center: Vec2::ZERO,
        board_size: 250.0,
        gap: 7.0,
    };

    fn touch_input() -> PuzzleInput {
        PuzzleInput::new(InputBackend::Touch, &PuzzleConfig::default())
    }

    fn feed(
        input: &mut PuzzleInput,
        session: &mut PuzzleSession,
        at_ms: u64,
        events: &[(Contact, RawInput)],
    ) {
        let events = events
            .iter()
            .map(|&(contact, raw_input)| ContactInput::new(contact, raw_input));
        for command in input.commands(events, Duration::from_millis(at_ms)) {
            apply_gesture(session, &LAYOUT, command);
        }
    }

    fn one_swap_from_solved() -> PuzzleSession {
        let grid = TileGrid::from_tiles([1, 0, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        PuzzleSession::new(grid, Duration::from_millis(800))
    }

    #[derive(Resource, Default)]
    struct SolvedCount(usize);

    fn count_solved(mut signals: EventReader<CardSignal>, mut count: ResMut<SolvedCount>) {
        count.0 += signals
            .read()
            .filter(|&&signal| signal == CardSignal::PuzzleSolved)
            .count();
    }

    fn puzzle_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, SequencerPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .init_resource::<SolvedCount>()
            .add_systems(
                Update,
                (settle_solved_puzzle, count_solved)
                    .chain()
                    .run_if(in_state(Screen::Puzzle))
                    .run_if(resource_exists::<PuzzleSession>),
            )
            .add_systems(OnExit(Screen::Puzzle), unmount_puzzle);

        app.world_mut()
            .resource_mut::<NextState<Screen>>()
            .set(Screen::Puzzle);
        app.insert_resource(one_swap_from_solved());
        app.update();
        app
    }

    fn solve(app: &mut App) {
        let mut session = app.world_mut().resource_mut::<PuzzleSession>();
        let outcome = session.move_tile(0, 1);
        assert_eq!(outcome, MoveOutcome::Solved);
    }

    fn screen(app: &App) -> Screen {
        *app.world().resource::<State<Screen>>().get()
    }

    #[test]
    fn drag_gestures_drive_the_session() {
        let mut session = one_swap_from_solved();
        let from = LAYOUT.slot_center(0);
        let to = LAYOUT.slot_center(1);

        apply_gesture(
            &mut session,
            &LAYOUT,
            GestureCommand::Start {
                origin: from,
                pointer: from,
            },
        );
        assert_eq!(session.drag().map(|drag| (drag.tile, drag.source)), Some((1, 0)));

        apply_gesture(&mut session, &LAYOUT, GestureCommand::Track(to));
        assert_eq!(session.grid().tiles(), &[1, 0, 2, 3, 4, 5, 6, 7, 8]);

        apply_gesture(&mut session, &LAYOUT, GestureCommand::Drop(to));
        assert!(session.is_solved());
    }

    #[test]
    fn drop_in_a_gap_cancels() {
        let mut session = one_swap_from_solved();
        let from = LAYOUT.slot_center(0);
        apply_gesture(
            &mut session,
            &LAYOUT,
            GestureCommand::Start {
                origin: from,
                pointer: from,
            },
        );
        let gap = (LAYOUT.slot_center(0) + LAYOUT.slot_center(1)) / 2.0;
        apply_gesture(&mut session, &LAYOUT, GestureCommand::Drop(gap));
        assert!(session.drag().is_none());
        assert_eq!(session.grid().tiles(), &[1, 0, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn start_outside_the_board_opens_nothing() {
        let mut session = one_swap_from_solved();
        apply_gesture(
            &mut session,
            &LAYOUT,
            GestureCommand::Start {
                origin: Vec2::new(500.0, 500.0),
                pointer: Vec2::new(500.0, 500.0),
            },
        );
        assert!(session.drag().is_none());
    }

    #[test]
    fn second_finger_mid_drag_leaves_no_stale_drag() {
        let grid = TileGrid::from_tiles([8, 7, 6, 5, 4, 3, 2, 1, 0]).unwrap();
        let mut session = PuzzleSession::new(grid, Duration::from_millis(800));
        let mut input = touch_input();
        let first = Contact::Finger(1);
        let second = Contact::Finger(2);
        let slot0 = LAYOUT.slot_center(0);
        let slot8 = LAYOUT.slot_center(8);
        let dragged_to = slot0 + Vec2::new(10.0, 0.0);

        feed(&mut input, &mut session, 0, &[(first, RawInput::Pressed(slot0))]);
        feed(&mut input, &mut session, 200, &[(first, RawInput::Moved(dragged_to))]);
        assert_eq!(session.drag().map(|drag| drag.source), Some(0));

        feed(&mut input, &mut session, 220, &[(second, RawInput::Pressed(slot8))]);
        feed(&mut input, &mut session, 240, &[(second, RawInput::Released(slot8))]);
        assert_eq!(session.drag().map(|drag| drag.source), Some(0));

        feed(&mut input, &mut session, 260, &[(first, RawInput::Released(dragged_to))]);
        assert!(session.drag().is_none());
        assert_eq!(session.grid().tiles(), &[8, 7, 6, 5, 4, 3, 2, 1, 0]);

        let slot4 = LAYOUT.slot_center(4);
        let slot5 = LAYOUT.slot_center(5);
        feed(&mut input, &mut session, 1000, &[(first, RawInput::Pressed(slot4))]);
        feed(&mut input, &mut session, 1200, &[(first, RawInput::Moved(slot5))]);
        feed(&mut input, &mut session, 1220, &[(first, RawInput::Released(slot5))]);
        assert!(session.drag().is_none());
        assert_eq!(session.grid().tiles(), &[8, 7, 6, 5, 3, 4, 2, 1, 0]);
    }

    #[test]
    fn mouse_drags_on_the_touch_backend() {
        let mut session = one_swap_from_solved();
        let mut input = touch_input();
        assert!(input.reads_touches());
        let from = LAYOUT.slot_center(0);
        let to = LAYOUT.slot_center(1);

        feed(&mut input, &mut session, 0, &[(Contact::Mouse, RawInput::Pressed(from))]);
        feed(&mut input, &mut session, 50, &[(Contact::Mouse, RawInput::Moved(to))]);
        assert!(session.drag().is_none(), "dragged before the hold delay");

        feed(&mut input, &mut session, 150, &[(Contact::Mouse, RawInput::Moved(to))]);
        assert_eq!(session.drag().map(|drag| drag.source), Some(0));

        // A finger lifting while the mouse drags is not part of the gesture.
        feed(&mut input, &mut session, 160, &[(Contact::Finger(7), RawInput::Released(from))]);
        assert_eq!(session.drag().map(|drag| drag.source), Some(0));

        feed(&mut input, &mut session, 170, &[(Contact::Mouse, RawInput::Released(to))]);
        assert!(session.is_solved());
    }

    #[test]
    fn pointer_backend_ignores_touches() {
        let input = PuzzleInput::new(InputBackend::Pointer, &PuzzleConfig::default());
        assert!(!input.reads_touches());
    }

    #[test]
    fn solved_signal_waits_for_the_settle_delay_then_advances_once() {
        let mut app = puzzle_app();
        assert_eq!(screen(&app), Screen::Puzzle);

        solve(&mut app);
        for _ in 0..5 {
            app.update();
        }
        assert_eq!(app.world().resource::<SolvedCount>().0, 0, "signalled before the delay");
        assert_eq!(screen(&app), Screen::Puzzle);

        for _ in 0..10 {
            app.update();
        }
        assert_eq!(app.world().resource::<SolvedCount>().0, 1);
        assert_eq!(screen(&app), Screen::Prompt);
        assert!(
            !app.world().contains_resource::<PuzzleSession>(),
            "session outlived its screen"
        );
    }

    #[test]
    fn leaving_early_drops_the_pending_signal() {
        let mut app = puzzle_app();
        solve(&mut app);
        app.update();

        app.world_mut()
            .resource_mut::<NextState<Screen>>()
            .set(Screen::Envelope);
        app.update();
        assert!(!app.world().contains_resource::<PuzzleSession>());

        for _ in 0..20 {
            app.update();
        }
        assert_eq!(app.world().resource::<SolvedCount>().0, 0);
        assert_eq!(screen(&app), Screen::Envelope);
    }
}
