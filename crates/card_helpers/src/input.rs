use bevy::prelude::*;

/// Converts a window position (logical pixels, origin top-left) into 2D world space.
pub fn screen_to_world(
    camera: &Query<(&Camera, &GlobalTransform)>,
    position: Vec2,
) -> Option<Vec2> {
    let (camera, camera_transform) = camera.get_single().ok()?;

    camera
        .viewport_to_world(camera_transform, position)
        .map(|ray| ray.origin.truncate())
        .ok()
}

pub fn cursor_world_position(
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let cursor_position = windows.get_single().ok()?.cursor_position()?;
    screen_to_world(camera, cursor_position)
}

pub fn just_pressed_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.just_pressed(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else if touch_input.any_just_pressed() {
        let touch = touch_input.iter_just_pressed().next()?;
        Some(touch.position())
    } else {
        None
    }
}

pub fn just_pressed_world_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let position = just_pressed_screen_position(button_input, touch_input, windows)?;
    screen_to_world(camera, position)
}

/// Reports whether the device exposes a touch screen.
///
/// Browsers are asked through `navigator.maxTouchPoints`; native builds are
/// driven by mouse unless the caller forces the touch path.
#[cfg(target_arch = "wasm32")]
pub fn probe_touch_capability() -> bool {
    web_sys::window().is_some_and(|window| window.navigator().max_touch_points() > 0)
}

#[cfg(not(target_arch = "wasm32"))]
pub const fn probe_touch_capability() -> bool {
    false
}
