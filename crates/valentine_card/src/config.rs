use core::time::Duration;

use bevy::prelude::*;

use crate::calendar::CalendarEvent;
use crate::puzzle::gesture::InputBackend;

/// Plugin that installs every screen's tunables with their default values
pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Palette>()
            .init_resource::<EnvelopeConfig>()
            .init_resource::<PuzzleConfig>()
            .init_resource::<PromptConfig>()
            .init_resource::<CelebrationConfig>();
    }
}

/// Colors shared across screens
#[derive(Resource, Debug, Clone)]
pub struct Palette {
    /// Cream paper used for the letter and prompt cards
    pub paper: Color,
    /// Accent red for hearts and primary buttons
    pub accent: Color,
    /// Body text
    pub ink: Color,
    /// Secondary text and outlines
    pub muted_ink: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            paper: Color::srgb_u8(0xFB, 0xF6, 0xEE),
            accent: Color::srgb_u8(0xD8, 0x4A, 0x5A),
            ink: Color::srgb_u8(0x2A, 0x2A, 0x2A),
            muted_ink: Color::srgba(0.0, 0.0, 0.0, 0.6),
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct EnvelopeConfig {
    /// Envelope body size in pixels
    pub size: Vec2,
    /// Time the flap takes to open before the letter is shown
    pub open_delay: Duration,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(280.0, 180.0),
            open_delay: Duration::from_millis(600),
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct PuzzleConfig {
    /// Puzzle picture, split into an exact 3x3 grid
    pub image_path: &'static str,
    /// Name greeted at the top of the letter
    pub recipient_name: &'static str,
    /// Center of the board in world space
    pub board_center: Vec2,
    /// Side length of the board in pixels
    pub board_size: f32,
    /// Space between tiles while unsolved
    pub tile_gap: f32,
    /// Time the gap takes to close once solved
    pub gap_close_duration: Duration,
    /// Pause between the solving move and leaving the screen
    pub settle_delay: Duration,
    /// How quickly tiles glide into their slot (per second)
    pub tile_follow_rate: f32,
    /// Lift of the slot 0 tile hinting that tiles can be moved
    pub hint_lift: f32,
    /// Touch must be held this long before it becomes a drag
    pub touch_start_delay: Duration,
    /// Touch must move this many pixels before it becomes a drag
    pub touch_slop: f32,
    /// Skip the touch probe and use this backend
    pub forced_backend: Option<InputBackend>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            image_path: "puzzle.png",
            recipient_name: "Maddy",
            board_center: Vec2::new(0.0, -40.0),
            board_size: 250.0,
            tile_gap: 7.0,
            gap_close_duration: Duration::from_millis(600),
            settle_delay: Duration::from_millis(800),
            tile_follow_rate: 18.0,
            hint_lift: 3.0,
            touch_start_delay: Duration::from_millis(100),
            touch_slop: 5.0,
            forced_backend: None,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct PromptConfig {
    /// Where the "No" button may jump to, in viewport pixels from the top-left
    pub safe_positions: Vec<Vec2>,
    /// Size of the floating "No" button
    pub floating_size: Vec2,
    /// Spring stiffness of the floating button
    pub spring_stiffness: f32,
    /// Spring damping of the floating button
    pub spring_damping: f32,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            // Corners, kept clear of browser chrome at the top and bottom
            safe_positions: vec![
                Vec2::new(20.0, 80.0),
                Vec2::new(260.0, 80.0),
                Vec2::new(20.0, 700.0),
                Vec2::new(260.0, 700.0),
            ],
            floating_size: Vec2::new(140.0, 50.0),
            spring_stiffness: 300.0,
            spring_damping: 25.0,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct CelebrationConfig {
    /// Number of confetti pieces kept on screen
    pub confetti_count: usize,
    /// Downward acceleration of confetti in pixels per second squared
    pub confetti_gravity: f32,
    /// Fastest a piece may fall in pixels per second
    pub confetti_terminal_speed: f32,
    /// Confetti colors
    pub confetti_colors: Vec<Color>,
    /// Venue shown on the reservation card
    pub venue: &'static str,
    /// Human readable date line
    pub date_label: &'static str,
    /// Human readable time line
    pub time_label: &'static str,
    /// Street address line
    pub address: &'static str,
    /// Event written by "Add to Calendar"
    pub event: CalendarEvent,
    /// File name offered for the calendar download
    pub calendar_file_name: &'static str,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            confetti_count: 100,
            // 0.15 px per frame squared at 60 fps
            confetti_gravity: 540.0,
            confetti_terminal_speed: 180.0,
            confetti_colors: vec![
                Color::srgb_u8(0xFF, 0xC5, 0xD3),
                Color::srgb_u8(0xD8, 0x4A, 0x5A),
                Color::srgb_u8(0xFB, 0xF6, 0xEE),
                Color::srgb_u8(0xFF, 0xD7, 0x00),
                Color::srgb_u8(0xFF, 0xB6, 0xC1),
            ],
            venue: "Nobu Toronto",
            date_label: "Sunday, February 15, 2026",
            time_label: "2:00 PM",
            address: "80 Yorkville Ave, Toronto, ON",
            event: CalendarEvent::default(),
            calendar_file_name: "nobu-reservation.ics",
        }
    }
}
