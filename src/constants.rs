use std::time::Duration;

pub const SCROLL_DELAY: Duration = Duration::from_millis(100);         // Reveal -> scroll, lets opacity transitions start
pub const OVERFLOW_CHECK_DELAY: Duration = Duration::from_millis(300); // Scroll -> overflow affordance refresh
pub const SIDE_EFFECT_DELAY: Duration = Duration::from_millis(500);    // Reveal -> secondary effect
pub const EXPAND_SETTLE_DELAY: Duration = Duration::from_millis(100);  // Side effect start -> height expansion
pub const TRANSITION_RESTORE_DELAY: Duration = Duration::from_millis(50); // Instant reset -> transitions back on
pub const WATCH_SETUP_DELAY: Duration = Duration::from_millis(100);    // Slide activation -> scroll watch install
pub const ENTRANCE_DELAY: Duration = Duration::from_millis(500);       // Slide activation -> entrance sequence

pub const SCROLL_DURATION: Duration = Duration::from_millis(300);      // Length of a smooth scroll in the scene
pub const FADE_DURATION: Duration = Duration::from_millis(600);        // Opacity transition length in the scene

pub const SCROLLED_THRESHOLD: f32 = 50.0;  // Scroll offset that counts as "scrolled"
pub const OVERFLOW_MARGIN: f32 = 100.0;    // Content overflow that counts as "has more below"

pub const AFFORDANCE_CLASS: &str = "has-scroll";
pub const SCROLLED_CLASS: &str = "scrolled";
