use bevy::prelude::*;
use card_helpers::WINDOW_HEIGHT;

pub mod calendar;
mod celebration;
pub mod config;
mod confetti;
mod envelope;
pub mod prompt;
pub mod puzzle;
pub mod sequencer;

use celebration::CelebrationPlugin;
use config::{ConfigPlugin, Palette, PuzzleConfig};
use envelope::EnvelopePlugin;
use prompt::PromptPlugin;
use puzzle::PuzzlePlugin;
use sequencer::SequencerPlugin;

/// Pictures shared by more than one screen.
#[derive(Resource)]
pub struct CardImages {
    pub puzzle: Handle<Image>,
}

impl FromWorld for CardImages {
    fn from_world(world: &mut World) -> Self {
        let image_path = world.resource::<PuzzleConfig>().image_path;
        Self {
            puzzle: world.resource::<AssetServer>().load(image_path),
        }
    }
}

pub fn run() {
    card_helpers::get_default_app(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .add_plugins((ConfigPlugin, SequencerPlugin))
        .init_resource::<CardImages>()
        .add_plugins((
            EnvelopePlugin,
            PuzzlePlugin,
            PromptPlugin,
            CelebrationPlugin,
        ))
        .add_systems(Startup, (spawn_camera, spawn_footer))
        .run();
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Signature under every screen.
fn spawn_footer(mut commands: Commands, palette: Res<Palette>) {
    commands.spawn((
        Text2d::new("Made by Jack, with love"),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(palette.muted_ink),
        Transform::from_xyz(0.0, -WINDOW_HEIGHT / 2.0 + 28.0, -10.0),
    ));
}
