use bevy::asset::{AssetMetaCheck, AssetMode, AssetPlugin};
use bevy::log::{DEFAULT_FILTER, Level, LogPlugin};
use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{
    Backends, PowerPreference, RenderCreation, WgpuSettings, WgpuSettingsPriority,
};
use bevy::window::{PresentMode, WindowMode, WindowResolution};

use crate::rng::CardRng;

// Phone-sized portrait viewport the card is laid out for
pub const WINDOW_WIDTH: f32 = 430.0;
pub const WINDOW_HEIGHT: f32 = 932.0;

/// Soft pink backdrop shared by every screen.
pub const BACKDROP_COLOR: Color = Color::srgb(1.0, 0.941, 0.953);

fn asset_plugin() -> AssetPlugin {
    AssetPlugin {
        mode: AssetMode::Unprocessed,
        file_path: "assets".to_owned(),
        processed_file_path: "imported_assets/Default".to_owned(),
        watch_for_changes_override: None,
        // Static hosts answer missing .meta files with HTML pages.
        meta_check: AssetMetaCheck::Never,
    }
}

fn window_plugin(title: String) -> WindowPlugin {
    WindowPlugin {
        primary_window: Some(Window {
            title,
            present_mode: PresentMode::Fifo,
            resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            canvas: Some("#card".into()),
            fit_canvas_to_parent: true,
            mode: WindowMode::Windowed,
            // Keep browser shortcuts like F5 and Ctrl+R working
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    }
}

fn render_plugin() -> RenderPlugin {
    RenderPlugin {
        render_creation: RenderCreation::Automatic(WgpuSettings {
            backends: Some(Backends::BROWSER_WEBGPU | Backends::GL),
            power_preference: PowerPreference::LowPower,
            priority: WgpuSettingsPriority::Functionality,
            ..default()
        }),
        ..default()
    }
}

/// Engine noise stays at the default filter, the card's own crate logs at debug.
fn log_plugin(card_name: &str) -> LogPlugin {
    LogPlugin {
        level: Level::INFO,
        filter: format!("{DEFAULT_FILTER},{card_name}=debug"),
        ..default()
    }
}

/// Builds the `App` every card screen runs in: window, assets, rendering,
/// logging, frame pacing and the shared random source.
pub fn get_default_app(card_name: &str, card_version: &str) -> App {
    let title = if cfg!(target_arch = "wasm32") {
        card_name.to_owned()
    } else {
        format!("{card_name} {card_version}")
    };

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(asset_plugin())
            .set(window_plugin(title))
            .set(render_plugin())
            .set(log_plugin(card_name)),
    )
    // Idle frames are skipped so phones keep their battery.
    // https://github.com/aevyrie/bevy_framepace
    .add_plugins(bevy_framepace::FramepacePlugin)
    .insert_resource(ClearColor(BACKDROP_COLOR))
    .init_resource::<CardRng>();

    #[cfg(target_arch = "wasm32")]
    app.add_systems(PreUpdate, crate::browser_resize::fit_window_to_browser);

    info!("{card_name} {card_version} starting");
    app
}
