use bevy::prelude::*;
use card_helpers::rng::CardRng;
use card_helpers::screen::despawn_screen;

pub mod evasive;

use evasive::EvasiveControl;

use crate::CardImages;
use crate::config::{Palette, PromptConfig};
use crate::sequencer::{CardSignal, Screen};

const CARD_WIDTH: f32 = 330.0;
const PICTURE_SIZE: f32 = 250.0;
const BUTTON_HEIGHT: f32 = 50.0;
const BUTTON_RADIUS: f32 = 15.0;
/// Frame hitches longer than this are integrated as if they took this long.
const MAX_SPRING_STEP: f32 = 1.0 / 30.0;

#[derive(Component)]
struct PromptScreen;

#[derive(Component)]
struct AcceptButton;

/// Any copy of the "No" button, in the row or floating.
#[derive(Component)]
struct EvasiveButton;

#[derive(Component)]
struct InRowNo;

#[derive(Component, Default)]
struct FloatingNo {
    position: Vec2,
    velocity: Vec2,
}

pub struct PromptPlugin;

impl Plugin for PromptPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(Screen::Prompt),
            (init_evasive_control, spawn_prompt_screen),
        )
        .add_systems(
            Update,
            (accept_on_press, evade_pointer, spring_floating_no)
                .chain()
                .run_if(in_state(Screen::Prompt))
                .run_if(resource_exists::<EvasiveControl>),
        )
        .add_systems(
            OnExit(Screen::Prompt),
            (remove_evasive_control, despawn_screen::<PromptScreen>),
        );
    }
}

fn init_evasive_control(mut commands: Commands) {
    commands.insert_resource(EvasiveControl::default());
}

fn remove_evasive_control(mut commands: Commands) {
    commands.remove_resource::<EvasiveControl>();
}

fn button_label(parent: &mut ChildBuilder, label: &str, color: Color) {
    parent.spawn((
        Text::new(label),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(color),
    ));
}

fn spawn_prompt_screen(
    mut commands: Commands,
    palette: Res<Palette>,
    config: Res<PromptConfig>,
    images: Res<CardImages>,
) {
    let outline = palette.muted_ink.with_alpha(0.15);

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            PromptScreen,
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        width: Val::Px(CARD_WIDTH),
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::axes(Val::Px(24.0), Val::Px(32.0)),
                        ..default()
                    },
                    BackgroundColor(palette.paper),
                    BorderRadius::all(Val::Px(20.0)),
                ))
                .with_children(|parent| {
                    parent.spawn((
                        Text::new("You solved it, now one more question"),
                        TextFont {
                            font_size: 19.0,
                            ..default()
                        },
                        TextColor(palette.ink),
                        TextLayout::new_with_justify(JustifyText::Center),
                        Node {
                            margin: UiRect::bottom(Val::Px(24.0)),
                            ..default()
                        },
                    ));

                    parent.spawn((
                        ImageNode::new(images.puzzle.clone()),
                        Node {
                            width: Val::Px(PICTURE_SIZE),
                            height: Val::Px(PICTURE_SIZE),
                            margin: UiRect::bottom(Val::Px(28.0)),
                            ..default()
                        },
                        BorderRadius::all(Val::Px(8.0)),
                    ));

                    parent.spawn((
                        Text::new("Will you be my Valentine?"),
                        TextFont {
                            font_size: 21.0,
                            ..default()
                        },
                        TextColor(palette.ink),
                        Node {
                            margin: UiRect::bottom(Val::Px(24.0)),
                            ..default()
                        },
                    ));

                    parent
                        .spawn(Node {
                            width: Val::Percent(100.0),
                            flex_direction: FlexDirection::Row,
                            column_gap: Val::Px(12.0),
                            ..default()
                        })
                        .with_children(|parent| {
                            parent
                                .spawn((
                                    Node {
                                        flex_grow: 1.0,
                                        height: Val::Px(BUTTON_HEIGHT),
                                        align_items: AlignItems::Center,
                                        justify_content: JustifyContent::Center,
                                        ..default()
                                    },
                                    BackgroundColor(palette.accent),
                                    BorderRadius::all(Val::Px(BUTTON_RADIUS)),
                                    Button,
                                    AcceptButton,
                                ))
                                .with_children(|parent| {
                                    button_label(parent, "Yes", Color::WHITE);
                                });

                            parent
                                .spawn((
                                    Node {
                                        flex_grow: 1.0,
                                        height: Val::Px(BUTTON_HEIGHT),
                                        align_items: AlignItems::Center,
                                        justify_content: JustifyContent::Center,
                                        border: UiRect::all(Val::Px(1.0)),
                                        ..default()
                                    },
                                    BorderColor(outline),
                                    BorderRadius::all(Val::Px(BUTTON_RADIUS)),
                                    Button,
                                    EvasiveButton,
                                    InRowNo,
                                ))
                                .with_children(|parent| {
                                    button_label(parent, "No", palette.ink);
                                });
                        });
                });
        });

    // Lives outside the card so it can sit anywhere in the viewport.
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Px(config.floating_size.x),
                height: Val::Px(config.floating_size.y),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                border: UiRect::all(Val::Px(1.0)),
                display: Display::None,
                ..default()
            },
            BackgroundColor(palette.paper),
            BorderColor(outline),
            BorderRadius::all(Val::Px(BUTTON_RADIUS)),
            GlobalZIndex(1000),
            Button,
            EvasiveButton,
            FloatingNo::default(),
            PromptScreen,
        ))
        .with_children(|parent| {
            button_label(parent, "No", palette.ink);
        });
}

fn accept_on_press(
    interaction_query: Query<&Interaction, (Changed<Interaction>, With<AcceptButton>)>,
    mut signals: EventWriter<CardSignal>,
) {
    for interaction in &interaction_query {
        if *interaction == Interaction::Pressed {
            signals.send(CardSignal::Accepted);
        }
    }
}

/// Hovering or touching either "No" sends it to a new safe position.
fn evade_pointer(
    interaction_query: Query<&Interaction, (Changed<Interaction>, With<EvasiveButton>)>,
    config: Res<PromptConfig>,
    mut rng: ResMut<CardRng>,
    mut control: ResMut<EvasiveControl>,
    mut in_row: Query<&mut Node, (With<InRowNo>, Without<FloatingNo>)>,
    mut floating: Query<&mut Node, (With<FloatingNo>, Without<InRowNo>)>,
    mut signals: EventWriter<CardSignal>,
) {
    let approached = interaction_query
        .iter()
        .any(|interaction| matches!(interaction, Interaction::Hovered | Interaction::Pressed));
    if !approached {
        return;
    }
    let Some(target) = control.on_proximity(&config.safe_positions, &mut rng.0) else {
        return;
    };
    debug!("\"No\" jumps to {target}");

    // The row collapses so "Yes" takes the full width.
    for mut node in &mut in_row {
        node.display = Display::None;
    }
    for mut node in &mut floating {
        node.display = Display::Flex;
    }
    signals.send(CardSignal::EvasionEscalated {
        move_count: control.move_count(),
    });
}

fn spring_floating_no(
    time: Res<Time>,
    config: Res<PromptConfig>,
    control: Res<EvasiveControl>,
    mut floating: Query<(&mut Node, &mut FloatingNo)>,
) {
    let Some(target) = control.position() else {
        return;
    };
    let dt = time.delta_secs().min(MAX_SPRING_STEP);
    for (mut node, mut spring) in &mut floating {
        let (position, velocity) = spring_step(
            spring.position,
            spring.velocity,
            target,
            config.spring_stiffness,
            config.spring_damping,
            dt,
        );
        spring.position = position;
        spring.velocity = velocity;
        node.left = Val::Px(position.x);
        node.top = Val::Px(position.y);
    }
}

/// One semi-implicit Euler step of a damped spring pulling `position` towards `target`.
pub fn spring_step(
    position: Vec2,
    velocity: Vec2,
    target: Vec2,
    stiffness: f32,
    damping: f32,
    dt: f32,
) -> (Vec2, Vec2) {
    let acceleration = (target - position) * stiffness - velocity * damping;
    let velocity = velocity + acceleration * dt;
    (position + velocity * dt, velocity)
}
