use core::f32::consts::TAU;

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use card_helpers::rng::CardRng;
use card_helpers::{WINDOW_HEIGHT, WINDOW_WIDTH};

use crate::config::CelebrationConfig;

const HEART_SEGMENTS: u32 = 48;
/// Pieces respawn this far above the top edge after falling past the bottom.
const RECYCLE_MARGIN: f32 = 20.0;
const CONFETTI_Z: f32 = 50.0;

#[derive(Component, Debug)]
pub struct ConfettiPiece {
    velocity: Vec2,
    spin: f32,
}

/// Heart outline traced from the classic parametric curve, filled as a triangle fan
/// around its center. `size` is the heart's approximate width.
pub fn heart_mesh(size: f32) -> Mesh {
    let scale = size / 32.0;
    let mut positions: Vec<[f32; 3]> = vec![[0.0, 0.0, 0.0]];
    for i in 0..HEART_SEGMENTS {
        let t = TAU * i as f32 / HEART_SEGMENTS as f32;
        let x = 16.0 * t.sin().powi(3);
        let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
        positions.push([x * scale, y * scale, 0.0]);
    }

    let mut indices = Vec::with_capacity(HEART_SEGMENTS as usize * 3);
    for i in 0..HEART_SEGMENTS {
        let next = (i + 1) % HEART_SEGMENTS;
        indices.extend([0, next + 1, i + 1]);
    }

    let vertex_count = positions.len();
    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, vec![[0.0_f32, 0.0, 1.0]; vertex_count])
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, vec![[0.5_f32, 0.5]; vertex_count])
        .with_inserted_indices(Indices::U32(indices))
}

fn random_velocity(rng: &mut fastrand::Rng) -> Vec2 {
    Vec2::new((rng.f32() - 0.5) * 120.0, -rng.f32() * 60.0)
}

fn random_x(rng: &mut fastrand::Rng) -> f32 {
    (rng.f32() - 0.5) * WINDOW_WIDTH
}

pub fn spawn_confetti<T: Component + Default>(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    config: &CelebrationConfig,
    rng: &mut fastrand::Rng,
) {
    let heart = meshes.add(heart_mesh(14.0));
    let strip = meshes.add(Rectangle::new(8.0, 12.0));
    let palette: Vec<Handle<ColorMaterial>> = config
        .confetti_colors
        .iter()
        .map(|&color| materials.add(color))
        .collect();
    if palette.is_empty() {
        warn!("No confetti colors configured");
        return;
    }

    for _ in 0..config.confetti_count {
        let mesh = if rng.bool() { heart.clone() } else { strip.clone() };
        let Some(material) = palette.get(rng.usize(..palette.len())).cloned() else {
            continue;
        };
        // Start spread over the screen and above it so the first frame is already raining.
        let y = (rng.f32() - 0.5) * WINDOW_HEIGHT + WINDOW_HEIGHT / 2.0;
        commands.spawn((
            Mesh2d(mesh),
            MeshMaterial2d(material),
            Transform::from_xyz(random_x(rng), y, CONFETTI_Z)
                .with_rotation(Quat::from_rotation_z(rng.f32() * TAU)),
            ConfettiPiece {
                velocity: random_velocity(rng),
                spin: (rng.f32() - 0.5) * 6.0,
            },
            T::default(),
        ));
    }
}

/// Gravity with a terminal speed, so pieces drift rather than plummet.
pub fn fall_step(position: Vec2, velocity: Vec2, gravity: f32, terminal: f32, dt: f32) -> (Vec2, Vec2) {
    let velocity = Vec2::new(velocity.x, (velocity.y - gravity * dt).max(-terminal));
    (position + velocity * dt, velocity)
}

pub fn fell_off_screen(y: f32) -> bool {
    y < -WINDOW_HEIGHT / 2.0 - RECYCLE_MARGIN
}

pub fn fall_confetti(
    time: Res<Time>,
    config: Res<CelebrationConfig>,
    mut rng: ResMut<CardRng>,
    mut pieces: Query<(&mut Transform, &mut ConfettiPiece)>,
) {
    let dt = time.delta_secs();
    for (mut transform, mut piece) in &mut pieces {
        let (position, velocity) = fall_step(
            transform.translation.truncate(),
            piece.velocity,
            config.confetti_gravity,
            config.confetti_terminal_speed,
            dt,
        );
        piece.velocity = velocity;
        transform.translation = position.extend(CONFETTI_Z);
        transform.rotate_z(piece.spin * dt);

        if fell_off_screen(position.y) {
            transform.translation.x = random_x(&mut rng.0);
            transform.translation.y = WINDOW_HEIGHT / 2.0 + RECYCLE_MARGIN;
            piece.velocity = random_velocity(&mut rng.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::render::mesh::VertexAttributeValues;

    use super::*;

    #[test]
    fn heart_mesh_is_a_closed_fan() {
        let mesh = heart_mesh(32.0);
        assert_eq!(mesh.count_vertices(), HEART_SEGMENTS as usize + 1);

        let indices: Vec<usize> = mesh.indices().unwrap().iter().collect();
        assert_eq!(indices.len(), HEART_SEGMENTS as usize * 3);
        assert!(indices.iter().all(|&index| index < mesh.count_vertices()));
        assert!(indices.chunks(3).all(|triangle| triangle.first() == Some(&0)));
    }

    #[test]
    fn heart_points_down_with_a_notch_on_top() {
        let mesh = heart_mesh(32.0);
        let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION) else {
            panic!("heart positions are not Float32x3");
        };
        let lowest = positions.iter().map(|p| p[1]).fold(f32::MAX, f32::min);
        let highest = positions.iter().map(|p| p[1]).fold(f32::MIN, f32::max);
        // Bottom tip is at t = pi, the notch between the lobes at t = 0.
        assert!((lowest + 17.0).abs() < 0.1, "tip at {lowest}");
        assert!(highest > 5.0, "lobes should rise above the notch");
        assert!((positions.get(1).unwrap()[1] - 5.0).abs() < 1e-4);
    }

    #[test]
    fn falling_speed_is_capped() {
        let (mut position, mut velocity) = (Vec2::ZERO, Vec2::new(10.0, 0.0));
        for _ in 0..600 {
            (position, velocity) = fall_step(position, velocity, 540.0, 180.0, 1.0 / 60.0);
        }
        assert!((velocity.y + 180.0).abs() < 1e-3);
        assert!((velocity.x - 10.0).abs() < f32::EPSILON, "gravity only pulls down");
        assert!(position.y < 0.0);
    }

    #[test]
    fn recycles_only_below_the_bottom_edge() {
        assert!(!fell_off_screen(0.0));
        assert!(!fell_off_screen(-WINDOW_HEIGHT / 2.0));
        assert!(fell_off_screen(-WINDOW_HEIGHT / 2.0 - RECYCLE_MARGIN - 1.0));
    }
}
