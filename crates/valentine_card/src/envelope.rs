use bevy::input::touch::Touches;
use bevy::prelude::*;
use card_helpers::input::just_pressed_world_position;
use card_helpers::screen::despawn_screen;

use crate::config::{EnvelopeConfig, Palette};
use crate::confetti::heart_mesh;
use crate::sequencer::{CardSignal, Screen};

const ENVELOPE_CENTER: Vec2 = Vec2::new(0.0, -18.0);
const BODY_COLOR: Color = Color::srgb(0.953, 0.922, 0.867);
const SIDE_FLAP_COLOR: Color = Color::srgb(0.929, 0.886, 0.820);
const TOP_FLAP_COLOR: Color = Color::srgb(0.902, 0.847, 0.761);
const SEAL_SIZE: f32 = 26.0;
const SEAL_RISE: f32 = 20.0;

#[derive(Component)]
struct EnvelopeScreen;

#[derive(Component)]
struct TopFlap;

#[derive(Component)]
struct HeartSeal {
    rest: Vec3,
}

/// Present from the tap until the screen is left.
#[derive(Resource)]
struct EnvelopeOpening(Timer);

pub struct EnvelopePlugin;

impl Plugin for EnvelopePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Screen::Envelope), spawn_envelope)
            .add_systems(
                Update,
                (
                    open_on_tap.run_if(not(resource_exists::<EnvelopeOpening>)),
                    animate_opening.run_if(resource_exists::<EnvelopeOpening>),
                )
                    .run_if(in_state(Screen::Envelope)),
            )
            .add_systems(
                OnExit(Screen::Envelope),
                (remove_opening, despawn_screen::<EnvelopeScreen>),
            );
    }
}

fn spawn_envelope(
    mut commands: Commands,
    config: Res<EnvelopeConfig>,
    palette: Res<Palette>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let half = config.size / 2.0;

    commands.spawn((
        Text2d::new("Tap to open"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(palette.muted_ink),
        Transform::from_translation((ENVELOPE_CENTER + Vec2::new(0.0, half.y + 40.0)).extend(0.0)),
        EnvelopeScreen,
    ));

    commands
        .spawn((
            Sprite::from_color(BODY_COLOR, config.size),
            Transform::from_translation(ENVELOPE_CENTER.extend(0.0)),
            EnvelopeScreen,
        ))
        .with_children(|parent| {
            let side_flap = materials.add(SIDE_FLAP_COLOR);
            let left = Triangle2d::new(
                Vec2::new(-half.x, half.y),
                Vec2::new(-half.x, 0.0),
                Vec2::ZERO,
            );
            let right = Triangle2d::new(
                Vec2::new(half.x, half.y),
                Vec2::ZERO,
                Vec2::new(half.x, 0.0),
            );
            for flap in [left, right] {
                parent.spawn((
                    Mesh2d(meshes.add(flap)),
                    MeshMaterial2d(side_flap.clone()),
                    Transform::from_xyz(0.0, 0.0, 1.0),
                ));
            }

            // Hinged on the top edge: the mesh hangs below its origin so scaling y flips it open.
            parent.spawn((
                Mesh2d(meshes.add(Triangle2d::new(
                    Vec2::new(-half.x, 0.0),
                    Vec2::new(0.0, -half.y),
                    Vec2::new(half.x, 0.0),
                ))),
                MeshMaterial2d(materials.add(TOP_FLAP_COLOR)),
                Transform::from_xyz(0.0, half.y, 2.0),
                TopFlap,
            ));

            let rest = Vec3::new(0.0, half.y - 57.0, 3.0);
            parent.spawn((
                Mesh2d(meshes.add(heart_mesh(SEAL_SIZE))),
                MeshMaterial2d(materials.add(palette.accent)),
                Transform::from_translation(rest),
                HeartSeal { rest },
            ));
        });
}

fn open_on_tap(
    mut commands: Commands,
    config: Res<EnvelopeConfig>,
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform)>,
) {
    let Some(position) = just_pressed_world_position(&buttons, &touches, &windows, &camera) else {
        return;
    };
    let envelope = Rect::from_center_size(ENVELOPE_CENTER, config.size);
    if envelope.contains(position) {
        info!("Envelope tapped, opening");
        commands.insert_resource(EnvelopeOpening(Timer::new(config.open_delay, TimerMode::Once)));
    }
}

fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * 2.0f32.mul_add(-t, 3.0)
}

fn animate_opening(
    time: Res<Time>,
    mut opening: ResMut<EnvelopeOpening>,
    mut flap: Query<&mut Transform, (With<TopFlap>, Without<HeartSeal>)>,
    mut seal: Query<(&mut Transform, &HeartSeal), Without<TopFlap>>,
    mut signals: EventWriter<CardSignal>,
) {
    opening.0.tick(time.delta());
    let progress = ease_in_out(opening.0.fraction());

    for mut transform in &mut flap {
        transform.scale.y = 2.0f32.mul_add(-progress, 1.0);
    }
    for (mut transform, seal) in &mut seal {
        transform.translation = seal.rest + Vec3::Y * SEAL_RISE * progress;
        transform.scale = Vec3::splat(1.0 - progress);
    }

    if opening.0.just_finished() {
        signals.send(CardSignal::EnvelopeOpened);
    }
}

fn remove_opening(mut commands: Commands) {
    commands.remove_resource::<EnvelopeOpening>();
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::sequencer::SequencerPlugin;

    #[derive(Resource, Default)]
    struct OpenedCount(usize);

    fn count_opened(mut signals: EventReader<CardSignal>, mut count: ResMut<OpenedCount>) {
        count.0 += signals
            .read()
            .filter(|&&signal| signal == CardSignal::EnvelopeOpened)
            .count();
    }

    fn opening_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, SequencerPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .init_resource::<OpenedCount>()
            .add_systems(
                Update,
                (animate_opening, count_opened)
                    .chain()
                    .run_if(resource_exists::<EnvelopeOpening>),
            )
            .add_systems(OnExit(Screen::Envelope), remove_opening);
        app.update();
        app
    }

    #[test]
    fn easing_runs_from_closed_to_open() {
        assert!(ease_in_out(0.0).abs() < f32::EPSILON);
        assert!((ease_in_out(1.0) - 1.0).abs() < f32::EPSILON);
        assert!((ease_in_out(0.5) - 0.5).abs() < f32::EPSILON);
        assert!((ease_in_out(2.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn opens_once_after_the_delay() {
        let mut app = opening_app();
        let flap = app
            .world_mut()
            .spawn((Transform::default(), TopFlap))
            .id();
        app.insert_resource(EnvelopeOpening(Timer::new(
            Duration::from_millis(600),
            TimerMode::Once,
        )));

        for _ in 0..5 {
            app.update();
        }
        assert_eq!(app.world().resource::<OpenedCount>().0, 0, "opened too early");
        assert_eq!(
            *app.world().resource::<State<Screen>>().get(),
            Screen::Envelope
        );

        for _ in 0..4 {
            app.update();
        }
        assert_eq!(app.world().resource::<OpenedCount>().0, 1);
        assert_eq!(
            *app.world().resource::<State<Screen>>().get(),
            Screen::Puzzle
        );
        assert!(!app.world().contains_resource::<EnvelopeOpening>());

        let flap_scale = app.world().get::<Transform>(flap).unwrap().scale.y;
        assert!((flap_scale + 1.0).abs() < 1e-4, "flap ended at {flap_scale}");
    }
}
