//! Core game constants

/// Default map dimensions
pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_HEIGHT: usize = 45;

/// Default world seed
pub const DEFAULT_SEED: u64 = 87_654;

/// Room size limits (inclusive, border included)
pub const ROOM_MIN_WIDTH: usize = 5;
pub const ROOM_MAX_WIDTH: usize = 14;
pub const ROOM_MIN_HEIGHT: usize = 3;
pub const ROOM_MAX_HEIGHT: usize = 9;

/// Smallest grid that can hold the largest room with its margins
pub const MIN_GRID_WIDTH: usize = ROOM_MAX_WIDTH + 3;
pub const MIN_GRID_HEIGHT: usize = ROOM_MAX_HEIGHT + 3;

/// Largest accepted grid side
pub const MAX_GRID_SIDE: usize = 2048;

/// Largest accepted grid area
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Candidate draws per room before the layout restarts
pub const ROOM_ATTEMPTS_PER_ROOM: u32 = 500;

/// Layout restarts before room placement gives up
pub const ROOM_LAYOUT_RESTARTS: u32 = 64;

/// Zone edge length used by content placement
pub const ZONE_SIZE: usize = 10;

/// Spacing radius pruned around a placed DarkMode obstacle
pub const DARK_MODE_SPACING: f64 = 5.0;

/// Spacing radius pruned around any other placed item
pub const ITEM_SPACING: f64 = 3.0;

/// Distance at which item spacing stops reducing placement weight
pub const SPACING_SATURATION: f64 = 5.0;

/// Path cache time-to-live
pub const PATH_CACHE_TTL_MS: u64 = 500;

/// Points lost on spikes
pub const SPIKES_PENALTY: i32 = -10;

/// Teleport targets must be farther than this from the hunter
pub const TELEPORT_HUNTER_CLEARANCE: usize = 5;

/// Teleport targets must be farther than this from the door
pub const TELEPORT_DOOR_CLEARANCE: f64 = 3.0;

/// Vision radius inside dark mode
pub const DARK_VISION_RADIUS: u32 = 3;

/// Vision radius after picking up a torch
pub const TORCH_VISION_RADIUS: u32 = 15;

/// Vision radius outside dark mode
pub const DEFAULT_VISION_RADIUS: u32 = 15;

/// Length of one hunter-path flash window
pub const FLASH_INTERVAL_MS: u64 = 500;

/// Path distance at which the hunter is reported as nearby
pub const HUNTER_WARNING_STEPS: usize = 5;

/// Default price of concealment in points
pub const DEFAULT_CONCEALMENT_COST: i32 = 30;

/// Campaign progression
pub const MAX_LEVEL: u32 = 5;
pub const POINTS_PER_LEVEL: i32 = 100;
