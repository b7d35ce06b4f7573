use std::time::Duration;

use raylib::prelude::*;

use stepdeck::constants::{AFFORDANCE_CLASS, SCROLLED_CLASS};
use stepdeck::{Navigation, Presentation};

const MARGIN: i32 = 40;
const TITLE_SIZE: i32 = 36;
const TEXT_SIZE: i32 = 22;
const VIEWPORT_TOP: i32 = 110;
const ITEM_PADDING: i32 = 6;
const FADE_HEIGHT: i32 = 48;
const WHEEL_STEP: f32 = 40.0;
const SLIDE_FADE: f32 = 0.35; // Cross-fade between slides (seconds)

pub fn run(presentation: &mut Presentation, width: i32, height: i32, fps: u32) {
    let (mut rl, thread) = raylib::init()
        .size(width, height)
        .title(&presentation.title)
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(fps);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    let mut slide_fade = ease::Tween::new(ease::cubic_out, 1.0, 1.0, SLIDE_FADE);

    presentation.deck.start(&mut presentation.scene);

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = rl.get_frame_time();

        // --- Input ---
        let navigation = if rl.is_key_pressed(KeyboardKey::KEY_SPACE)
            || rl.is_key_pressed(KeyboardKey::KEY_RIGHT)
            || rl.is_key_pressed(KeyboardKey::KEY_PAGE_DOWN)
        {
            Some(presentation.deck.next(&mut presentation.scene))
        } else if rl.is_key_pressed(KeyboardKey::KEY_LEFT) || rl.is_key_pressed(KeyboardKey::KEY_PAGE_UP) {
            Some(presentation.deck.prev(&mut presentation.scene))
        } else if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            Some(presentation.deck.step(&mut presentation.scene))
        } else {
            if rl.is_key_pressed(KeyboardKey::KEY_R) {
                presentation.deck.reset_current(&mut presentation.scene);
            }
            None
        };

        if let Some(Navigation::Moved { .. }) = navigation {
            slide_fade = ease::Tween::new(ease::cubic_out, 0.0, 1.0, SLIDE_FADE);
        }

        let wheel = rl.get_mouse_wheel_move();
        if wheel != 0.0 {
            presentation.scroll_by(-wheel * WHEEL_STEP);
        }

        // --- Update ---
        presentation.frame(Duration::from_secs_f32(dt));
        let alpha = slide_fade.apply(dt);

        // --- Draw ---
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::new(24, 26, 33, 255));
        draw_slide(&mut d, presentation, alpha);
    }
}

fn draw_slide(d: &mut RaylibDrawHandle, presentation: &Presentation, alpha: f32) {
    let info = presentation.current();
    let scene = &presentation.scene;
    let width = d.get_screen_width();

    d.draw_text(&info.title, MARGIN, MARGIN, TITLE_SIZE, Color::RAYWHITE.fade(alpha));

    if let Some(container) = scene.container(&info.viewport) {
        let viewport_height = container.client_height() as i32;
        let viewport_width = width - 2 * MARGIN;
        let scroll_top = container.scroll_top();

        {
            let mut s = d.begin_scissor_mode(MARGIN, VIEWPORT_TOP, viewport_width, viewport_height);
            let mut top = 0.0;
            for id in container.children() {
                let Some(node) = scene.node(id) else {
                    continue;
                };
                let item_height = node.rendered_height();
                let y = VIEWPORT_TOP + (top - scroll_top) as i32;
                top += item_height;
                if item_height <= 0.0 || node.opacity <= 0.0 {
                    continue;
                }

                let opacity = node.opacity * alpha;
                let fill = if node.has_class("pulse") {
                    Color::GOLD
                } else if node.has_class("animate-in") {
                    Color::SKYBLUE
                } else {
                    Color::new(58, 63, 80, 255)
                };
                s.draw_rectangle(
                    MARGIN,
                    y + ITEM_PADDING / 2,
                    viewport_width,
                    item_height as i32 - ITEM_PADDING,
                    fill.fade(opacity * 0.6),
                );
                s.draw_text(
                    &node.label,
                    MARGIN + 12,
                    y + (item_height as i32 - TEXT_SIZE) / 2,
                    TEXT_SIZE,
                    Color::RAYWHITE.fade(opacity),
                );
            }
        }

        // Fade overlay when the slide reports more content than fits.
        let overflowing = info
            .hosts
            .iter()
            .filter_map(|id| scene.node(id))
            .any(|host| host.has_class(AFFORDANCE_CLASS) || host.has_class(SCROLLED_CLASS));
        if overflowing {
            let bottom = VIEWPORT_TOP + viewport_height;
            d.draw_rectangle_gradient_v(
                MARGIN,
                bottom - FADE_HEIGHT,
                viewport_width,
                FADE_HEIGHT,
                Color::new(24, 26, 33, 0),
                Color::new(24, 26, 33, 255),
            );
        }
    }

    let footer = format!(
        "{}/{}  {}  step {}",
        presentation.deck.current_index() + 1,
        presentation.deck.len(),
        info.id,
        presentation.deck.current_step()
    );
    let footer_y = d.get_screen_height() - MARGIN;
    d.draw_text(&footer, MARGIN, footer_y, 18, Color::GRAY);
}
