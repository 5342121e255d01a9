use bevy::prelude::*;
use bevy::text::TextBounds;

use super::grid::{SLOT_COUNT, TileGrid, crop_rect};
use super::layout::BoardLayout;
use super::session::PuzzleSession;
use crate::CardImages;
use crate::config::{Palette, PuzzleConfig};

const LETTER_SIZE: Vec2 = Vec2::new(330.0, 400.0);
const DRAGGED_ALPHA: f32 = 0.3;
const GHOST_SCALE: f32 = 1.1;
const GHOST_TILT_DEGREES: f32 = 3.0;
/// Radians per second of the slot 0 hint bob
const HINT_BOB_RATE: f32 = 3.0;

const LETTER_Z: f32 = -5.0;
const TILE_Z: f32 = 1.0;
const GHOST_Z: f32 = 10.0;

#[derive(Component)]
pub struct PuzzleScreen;

#[derive(Component)]
pub struct PuzzleTile {
    pub tile: usize,
}

#[derive(Component)]
pub struct DragGhost;

#[derive(Component)]
pub struct SnapHint;

pub fn spawn_puzzle_screen(
    commands: &mut Commands,
    config: &PuzzleConfig,
    palette: &Palette,
    images: &CardImages,
    layout: &BoardLayout,
    grid: &TileGrid,
) {
    let board_top = layout.center.y + layout.board_size / 2.0;
    let board_bottom = layout.center.y - layout.board_size / 2.0;
    let letter_center = Vec2::new(layout.center.x, layout.center.y + 25.0);

    commands.spawn((
        Sprite::from_color(palette.paper, LETTER_SIZE),
        Transform::from_translation(letter_center.extend(LETTER_Z)),
        PuzzleScreen,
    ));

    commands.spawn((
        Text2d::new(format!("Dear {}", config.recipient_name)),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(palette.ink),
        Transform::from_xyz(layout.center.x, board_top + 80.0, 0.0),
        PuzzleScreen,
    ));

    commands.spawn((
        Text2d::new("Hold and drag the tiles to put us back together"),
        TextFont {
            font_size: 15.0,
            ..default()
        },
        TextColor(palette.muted_ink),
        TextLayout::new_with_justify(JustifyText::Center),
        TextBounds::new_horizontal(LETTER_SIZE.x - 50.0),
        Transform::from_xyz(layout.center.x, board_top + 38.0, 0.0),
        PuzzleScreen,
    ));

    commands.spawn((
        Text2d::new("Tip: tiles snap into place"),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(palette.muted_ink),
        Transform::from_xyz(layout.center.x, board_bottom - 22.0, 0.0),
        SnapHint,
        PuzzleScreen,
    ));

    let tile_size = Vec2::splat(layout.tile_size());
    for slot in 0..SLOT_COUNT {
        let Some(tile) = grid.tile_at(slot) else {
            continue;
        };
        commands.spawn((
            Sprite {
                image: images.puzzle.clone(),
                custom_size: Some(tile_size),
                ..default()
            },
            Transform::from_translation(layout.slot_center(slot).extend(TILE_Z)),
            PuzzleTile { tile },
            PuzzleScreen,
        ));
    }

    commands.spawn((
        Sprite {
            image: images.puzzle.clone(),
            custom_size: Some(tile_size * GHOST_SCALE),
            ..default()
        },
        Transform::from_translation(layout.center.extend(GHOST_Z))
            .with_rotation(Quat::from_rotation_z(-GHOST_TILT_DEGREES.to_radians())),
        Visibility::Hidden,
        DragGhost,
        PuzzleScreen,
    ));
}

fn loaded_image_size(images: &Assets<Image>, card_images: &CardImages) -> Option<Vec2> {
    images
        .get(&card_images.puzzle)
        .map(|image| image.size().as_vec2())
}

/// Each tile shows its own ninth of the picture once the picture has loaded.
pub fn crop_tiles(
    images: Res<Assets<Image>>,
    card_images: Res<CardImages>,
    mut tiles: Query<(&PuzzleTile, &mut Sprite)>,
) {
    let Some(image_size) = loaded_image_size(&images, &card_images) else {
        return;
    };
    for (tile, mut sprite) in &mut tiles {
        if sprite.rect.is_none() {
            sprite.rect = Some(crop_rect(tile.tile, image_size));
        }
    }
}

/// Shrinks the gap between tiles to nothing once solved, so the picture reads as one image.
pub fn close_gap(
    time: Res<Time>,
    config: Res<PuzzleConfig>,
    session: Res<PuzzleSession>,
    mut layout: ResMut<BoardLayout>,
    mut hint: Query<&mut Visibility, With<SnapHint>>,
) {
    if !session.is_solved() {
        return;
    }
    for mut visibility in &mut hint {
        *visibility = Visibility::Hidden;
    }
    if layout.gap <= 0.0 {
        return;
    }
    let duration = config.gap_close_duration.as_secs_f32().max(f32::EPSILON);
    let step = config.tile_gap * time.delta_secs() / duration;
    layout.gap = (layout.gap - step).max(0.0);
}

pub fn glide_tiles(
    time: Res<Time>,
    config: Res<PuzzleConfig>,
    layout: Res<BoardLayout>,
    session: Res<PuzzleSession>,
    mut tiles: Query<(&PuzzleTile, &mut Transform, &mut Sprite)>,
) {
    let blend = 1.0 - (-config.tile_follow_rate * time.delta_secs()).exp();
    let tile_size = Vec2::splat(layout.tile_size());
    let dragged = session.drag().map(|drag| drag.tile);
    let bob = 0.5 * (1.0 + (time.elapsed_secs() * HINT_BOB_RATE).sin());

    for (tile, mut transform, mut sprite) in &mut tiles {
        let Some(slot) = session.grid().slot_of(tile.tile) else {
            continue;
        };
        let mut target = layout.slot_center(slot);
        if slot == 0 && !session.is_solved() {
            target.y += config.hint_lift * bob;
        }
        let current = transform.translation.truncate();
        transform.translation = current.lerp(target, blend).extend(TILE_Z);

        sprite.custom_size = Some(tile_size);
        let alpha = if dragged == Some(tile.tile) {
            DRAGGED_ALPHA
        } else {
            1.0
        };
        sprite.color.set_alpha(alpha);
    }
}

/// The ghost is a lifted copy of the dragged tile that sticks to the pointer.
pub fn follow_drag(
    images: Res<Assets<Image>>,
    card_images: Res<CardImages>,
    layout: Res<BoardLayout>,
    session: Res<PuzzleSession>,
    mut ghost: Query<(&mut Transform, &mut Sprite, &mut Visibility), With<DragGhost>>,
) {
    let Ok((mut transform, mut sprite, mut visibility)) = ghost.get_single_mut() else {
        return;
    };
    let Some(drag) = session.drag() else {
        *visibility = Visibility::Hidden;
        return;
    };

    *visibility = Visibility::Visible;
    transform.translation = drag.pointer.extend(GHOST_Z);
    sprite.custom_size = Some(Vec2::splat(layout.tile_size() * GHOST_SCALE));
    sprite.rect = loaded_image_size(&images, &card_images)
        .map(|image_size| crop_rect(drag.tile, image_size));
}
