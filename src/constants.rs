pub const RENDER_WIDTH: i32 = 1920;           // Width of the render texture
pub const RENDER_HEIGHT: i32 = 1080;          // Height of the render texture
pub const FPS: u32 = 60;                      // Frames per second
pub const WINDOW_TITLE: &str = "Scrollfolio";

pub const SPRING_STIFFNESS: f32 = 300.0;
pub const SPRING_DAMPING: f32 = 60.0;
pub const SPRING_MASS: f32 = 1.0;
pub const SPRING_REST_DELTA: f32 = 0.5;       // Pixels
pub const SPRING_REST_SPEED: f32 = 10.0;      // Pixels per second

pub const TRIGGER_OFFSET: f32 = 0.5;          // Viewport fraction where steps are entered
pub const WHEEL_STEP: f32 = 120.0;            // Pixels scrolled per wheel notch
pub const AUTOPLAY_SPEED: f32 = 360.0;        // Pixels per second while autoscrolling
pub const HOLD_DURATION: f32 = 1.5;           // Time to hold on the last step (seconds)
pub const MAX_SETTLE_TIME: f32 = 5.0;         // Extra hold allowed for the last transition (seconds)

pub const PANEL_WIDTH_FRACTION: f32 = 0.5;    // Panel is half the viewport wide
pub const TEXT_COLUMN_FRACTION: f32 = 0.5;    // Narrative block is half the viewport wide
pub const TEXT_PADDING: f32 = 48.0;
pub const TEXT_FONT_SIZE: i32 = 30;
pub const TEXT_LINE_SPACING: f32 = 1.4;       // Line height as a multiple of the font size
pub const PAGE_BACKGROUND: &str = "#fffdfa";
