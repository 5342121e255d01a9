use bevy::prelude::*;
use card_helpers::rng::CardRng;
use card_helpers::screen::despawn_screen;

use crate::calendar;
use crate::config::{CelebrationConfig, Palette};
use crate::confetti::{fall_confetti, spawn_confetti};
use crate::sequencer::Screen;

const CARD_WIDTH: f32 = 330.0;

#[derive(Component, Default)]
struct CelebrationScreen;

#[derive(Component)]
struct CalendarButton;

pub struct CelebrationPlugin;

impl Plugin for CelebrationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(Screen::Celebration),
            (spawn_celebration_card, start_confetti),
        )
        .add_systems(
            Update,
            (export_on_press, fall_confetti).run_if(in_state(Screen::Celebration)),
        )
        .add_systems(OnExit(Screen::Celebration), despawn_screen::<CelebrationScreen>);
    }
}

fn start_confetti(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    config: Res<CelebrationConfig>,
    mut rng: ResMut<CardRng>,
) {
    spawn_confetti::<CelebrationScreen>(
        &mut commands,
        &mut meshes,
        &mut materials,
        &config,
        &mut rng.0,
    );
}

fn detail_line(parent: &mut ChildBuilder, text: &str, palette: &Palette) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            column_gap: Val::Px(10.0),
            margin: UiRect::bottom(Val::Px(8.0)),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Px(6.0),
                    height: Val::Px(6.0),
                    ..default()
                },
                BackgroundColor(palette.accent),
                BorderRadius::MAX,
            ));
            parent.spawn((
                Text::new(text),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(palette.ink),
            ));
        });
}

fn spawn_celebration_card(
    mut commands: Commands,
    palette: Res<Palette>,
    config: Res<CelebrationConfig>,
) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            CelebrationScreen,
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        width: Val::Px(CARD_WIDTH),
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::axes(Val::Px(32.0), Val::Px(48.0)),
                        ..default()
                    },
                    BackgroundColor(palette.paper),
                    BorderRadius::all(Val::Px(20.0)),
                ))
                .with_children(|parent| {
                    parent.spawn((
                        Text::new("I can't wait to celebrate with you."),
                        TextFont {
                            font_size: 24.0,
                            ..default()
                        },
                        TextColor(palette.ink),
                        TextLayout::new_with_justify(JustifyText::Center),
                        Node {
                            margin: UiRect::bottom(Val::Px(20.0)),
                            ..default()
                        },
                    ));

                    parent.spawn((
                        Node {
                            width: Val::Px(32.0),
                            height: Val::Px(32.0),
                            margin: UiRect::bottom(Val::Px(12.0)),
                            ..default()
                        },
                        BackgroundColor(palette.accent),
                        BorderRadius::MAX,
                    ));

                    parent.spawn((
                        Text::new("Happy Valentine's Day"),
                        TextFont {
                            font_size: 15.0,
                            ..default()
                        },
                        TextColor(palette.muted_ink),
                        Node {
                            margin: UiRect::bottom(Val::Px(32.0)),
                            ..default()
                        },
                    ));

                    parent
                        .spawn((
                            Node {
                                width: Val::Percent(100.0),
                                flex_direction: FlexDirection::Column,
                                padding: UiRect::all(Val::Px(24.0)),
                                ..default()
                            },
                            BackgroundColor(Color::WHITE),
                            BorderRadius::all(Val::Px(16.0)),
                        ))
                        .with_children(|parent| {
                            parent.spawn((
                                Text::new(config.venue),
                                TextFont {
                                    font_size: 18.0,
                                    ..default()
                                },
                                TextColor(palette.ink),
                                Node {
                                    margin: UiRect::bottom(Val::Px(16.0)),
                                    ..default()
                                },
                            ));
                            detail_line(parent, config.date_label, &palette);
                            detail_line(parent, config.time_label, &palette);
                            detail_line(parent, config.address, &palette);

                            parent
                                .spawn((
                                    Node {
                                        margin: UiRect::top(Val::Px(16.0)),
                                        padding: UiRect::axes(Val::Px(20.0), Val::Px(12.0)),
                                        justify_content: JustifyContent::Center,
                                        ..default()
                                    },
                                    BackgroundColor(palette.accent),
                                    BorderRadius::all(Val::Px(12.0)),
                                    Button,
                                    CalendarButton,
                                ))
                                .with_children(|parent| {
                                    parent.spawn((
                                        Text::new("Add to Calendar"),
                                        TextFont {
                                            font_size: 15.0,
                                            ..default()
                                        },
                                        TextColor(Color::WHITE),
                                    ));
                                });
                        });
                });
        });
}

/// Export failures are reported and the card stays as it is.
fn export_on_press(
    interaction_query: Query<&Interaction, (Changed<Interaction>, With<CalendarButton>)>,
    config: Res<CelebrationConfig>,
) {
    for interaction in &interaction_query {
        if *interaction != Interaction::Pressed {
            continue;
        }
        if let Err(err) = calendar::export(&config.event, config.calendar_file_name) {
            error!("Could not add the reservation to the calendar: {err}");
        }
    }
}
