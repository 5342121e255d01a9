// Largest surface WebGL2 guarantees; bigger requests fail Surface::configure.
#[cfg(target_arch = "wasm32")]
const MAX_SURFACE_EXTENT: f32 = 2048.0;

#[cfg(target_arch = "wasm32")]
fn browser_viewport() -> Option<(f32, f32)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width as f32, height as f32))
}

#[cfg(target_arch = "wasm32")]
pub fn fit_window_to_browser(
    mut primary_query: bevy::ecs::system::Query<
        &mut bevy::window::Window,
        bevy::ecs::query::With<bevy::window::PrimaryWindow>,
    >,
) {
    let Some((target_width, target_height)) = browser_viewport() else {
        return;
    };
    let width = target_width.min(MAX_SURFACE_EXTENT);
    let height = target_height.min(MAX_SURFACE_EXTENT);

    for mut window in &mut primary_query {
        let unchanged = (window.resolution.width() - width).abs() <= f32::EPSILON
            && (window.resolution.height() - height).abs() <= f32::EPSILON;
        if !unchanged {
            window.resolution.set(width, height);
        }
    }
}
