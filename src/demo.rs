//! Demo engine: clears the surface to a slowly cycling hue.
//!
//! Space pauses the colour cycle, arrow keys and the mouse wheel change its
//! speed (Shift for fine steps), dragging with the left button scrubs the
//! hue, a left double click resets the speed, Escape quits.

use log::info;

use crate::config::Config;
use crate::core::{Button, Controller, Engine, GraphicsContext, InputEvent, InputState};
use crate::frame::{FpsCounter, FrameInfo};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const DEFAULT_HUE_SPEED: f32 = 0.1;
const MIN_HUE_SPEED: f32 = 0.0;
const MAX_HUE_SPEED: f32 = 2.0;
const HUE_SPEED_STEP: f32 = 0.05;
const FINE_HUE_SPEED_STEP: f32 = 0.01;
/// Hue change per pixel of horizontal drag
const HUE_PER_PIXEL: f32 = 0.001;
const SATURATION: f32 = 0.6;
const VALUE: f32 = 0.9;

/// Convert hue/saturation/value (all 0..1) to linear RGB
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let h_prime = (h.rem_euclid(1.0) * 6.0) % 6.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h_prime as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}

/// Engine that animates the clear colour
#[derive(Debug, Clone)]
pub struct PulseEngine {
    running: bool,
    paused: bool,
    hue: f32,
    hue_speed: f32,
    max_frames: Option<u64>,
    frames: u64,
    report_fps: bool,
    fps: FpsCounter,
    input: InputState,
}

impl PulseEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            running: true,
            paused: false,
            hue: 0.0,
            hue_speed: DEFAULT_HUE_SPEED,
            max_frames: config.max_frames,
            frames: 0,
            report_fps: !config.quiet,
            fps: FpsCounter::new(),
            input: InputState::new(),
        }
    }

    /// Frames drawn by `update`
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn hue_speed(&self) -> f32 {
        self.hue_speed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn clear_color(&self) -> [f64; 4] {
        let [r, g, b] = hsv_to_rgb(self.hue, SATURATION, VALUE);
        [r as f64, g as f64, b as f64, 1.0]
    }

    fn adjust_speed(&mut self, steps: f32) {
        let step = if self.input.is_down(Button::Shift) {
            FINE_HUE_SPEED_STEP
        } else {
            HUE_SPEED_STEP
        };
        self.hue_speed = (self.hue_speed + steps * step).clamp(MIN_HUE_SPEED, MAX_HUE_SPEED);
    }

    /// Fold the input gathered since the last frame into the animation
    fn apply_frame_input(&mut self) {
        let (_, wheel) = self.input.wheel_delta();
        if wheel != 0.0 {
            self.adjust_speed(wheel);
        }

        if self.input.double_clicked(Button::MouseLeft) {
            self.hue_speed = DEFAULT_HUE_SPEED;
        }

        if self.input.is_down(Button::MouseLeft) {
            let (drag, _) = self.input.mouse_delta();
            self.hue = (self.hue + drag * HUE_PER_PIXEL).rem_euclid(1.0);
        }

        self.input.reset_deltas();
    }
}

impl<C: GraphicsContext> Engine<C> for PulseEngine {
    fn init(&mut self, context: &mut C) -> Result<()> {
        context.set_clear_color(self.clear_color());
        info!(
            "pulse engine ready (frame limit: {})",
            self.max_frames
                .map_or_else(|| "none".to_string(), |n| n.to_string())
        );
        Ok(())
    }

    fn update(&mut self, frame: &FrameInfo, context: &mut C) -> bool {
        if let Some(max) = self.max_frames {
            if self.frames >= max {
                self.running = false;
                return false;
            }
        }
        self.frames += 1;

        self.apply_frame_input();
        if !self.paused {
            self.hue = (self.hue + frame.delta * self.hue_speed).rem_euclid(1.0);
        }
        context.set_clear_color(self.clear_color());

        if let Some(fps) = self.fps.tick(frame.delta) {
            if self.report_fps {
                info!("FPS: {:.1}", fps);
            }
        }

        self.running
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn quit(&mut self) {
        self.running = false;
    }

    fn handle_input(&mut self, event: &InputEvent) {
        self.input.apply(event);

        match *event {
            InputEvent::Press(Button::Escape) => self.running = false,
            InputEvent::Press(Button::Space) => self.paused = !self.paused,
            // Holding an arrow keeps stepping through auto-repeat
            InputEvent::Press(button) | InputEvent::Repeat(button) => match button {
                Button::ArrowUp | Button::ArrowRight => self.adjust_speed(1.0),
                Button::ArrowDown | Button::ArrowLeft => self.adjust_speed(-1.0),
                _ => {}
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HeadlessContext, WindowDimensions};

    fn engine() -> PulseEngine {
        PulseEngine::new(&Config {
            quiet: true,
            ..Config::default()
        })
    }

    #[test]
    fn test_hsv_to_rgb_red() {
        let rgb = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((rgb[0] - 1.0).abs() < 0.01);
        assert!(rgb[1].abs() < 0.01);
        assert!(rgb[2].abs() < 0.01);
    }

    #[test]
    fn test_hsv_to_rgb_wraps_hue() {
        let a = hsv_to_rgb(0.25, 0.5, 0.8);
        let b = hsv_to_rgb(1.25, 0.5, 0.8);
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_update_advances_hue_and_sets_clear_color() {
        let mut engine = engine();
        let mut ctx = HeadlessContext::new(WindowDimensions::new(4, 4));

        Engine::<HeadlessContext>::init(&mut engine, &mut ctx).unwrap();
        let before = ctx.clear_color();

        assert!(engine.update(&FrameInfo::new(0, 0.5, 0.5), &mut ctx));
        assert!((engine.hue() - 0.05).abs() < 1e-5);
        assert_ne!(ctx.clear_color(), before);
        assert_eq!(engine.frames(), 1);
    }

    #[test]
    fn test_frame_limit_stops_engine() {
        let mut engine = PulseEngine::new(&Config {
            max_frames: Some(2),
            quiet: true,
            ..Config::default()
        });
        let mut ctx = HeadlessContext::new(WindowDimensions::new(4, 4));
        let frame = FrameInfo::new(0, 0.0, 0.016);

        assert!(engine.update(&frame, &mut ctx));
        assert!(engine.update(&frame, &mut ctx));
        assert!(!engine.update(&frame, &mut ctx));
        assert!(!Engine::<HeadlessContext>::is_running(&engine));
        assert_eq!(engine.frames(), 2);
    }

    #[test]
    fn test_space_pauses_cycle() {
        let mut engine = engine();
        let mut ctx = HeadlessContext::new(WindowDimensions::new(4, 4));

        Engine::<HeadlessContext>::handle_input(&mut engine, &InputEvent::Press(Button::Space));
        assert!(engine.is_paused());

        engine.update(&FrameInfo::new(0, 1.0, 1.0), &mut ctx);
        assert_eq!(engine.hue(), 0.0);
    }

    #[test]
    fn test_escape_quits() {
        let mut engine = engine();
        Engine::<HeadlessContext>::handle_input(&mut engine, &InputEvent::Press(Button::Escape));
        assert!(!Engine::<HeadlessContext>::is_running(&engine));
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut engine = engine();
        let mut ctx = HeadlessContext::new(WindowDimensions::new(4, 4));
        let frame = FrameInfo::new(0, 0.0, 0.0);

        for _ in 0..10 {
            Engine::<HeadlessContext>::handle_input(
                &mut engine,
                &InputEvent::Press(Button::ArrowDown),
            );
        }
        assert_eq!(engine.hue_speed(), MIN_HUE_SPEED);

        Engine::<HeadlessContext>::handle_input(
            &mut engine,
            &InputEvent::Wheel { dx: 0.0, dy: 100.0 },
        );
        engine.update(&frame, &mut ctx);
        assert_eq!(engine.hue_speed(), MAX_HUE_SPEED);
    }

    #[test]
    fn test_wheel_applies_on_next_frame() {
        let mut engine = engine();
        let mut ctx = HeadlessContext::new(WindowDimensions::new(4, 4));
        let frame = FrameInfo::new(0, 0.0, 0.0);

        Engine::<HeadlessContext>::handle_input(
            &mut engine,
            &InputEvent::Wheel { dx: 0.0, dy: 2.0 },
        );
        assert_eq!(engine.hue_speed(), DEFAULT_HUE_SPEED);

        engine.update(&frame, &mut ctx);
        assert!((engine.hue_speed() - (DEFAULT_HUE_SPEED + 2.0 * HUE_SPEED_STEP)).abs() < 1e-6);

        // Consumed once
        engine.update(&frame, &mut ctx);
        assert!((engine.hue_speed() - (DEFAULT_HUE_SPEED + 2.0 * HUE_SPEED_STEP)).abs() < 1e-6);
    }

    #[test]
    fn test_double_click_resets_speed() {
        let mut engine = engine();
        let mut ctx = HeadlessContext::new(WindowDimensions::new(4, 4));

        Engine::<HeadlessContext>::handle_input(&mut engine, &InputEvent::Press(Button::ArrowUp));
        assert!(engine.hue_speed() > DEFAULT_HUE_SPEED);

        Engine::<HeadlessContext>::handle_input(
            &mut engine,
            &InputEvent::DoubleClick(Button::MouseLeft),
        );
        Engine::<HeadlessContext>::handle_input(
            &mut engine,
            &InputEvent::Release(Button::MouseLeft),
        );
        engine.update(&FrameInfo::new(0, 0.0, 0.0), &mut ctx);
        assert_eq!(engine.hue_speed(), DEFAULT_HUE_SPEED);
    }

    #[test]
    fn test_shift_selects_fine_step() {
        let mut engine = engine();

        Engine::<HeadlessContext>::handle_input(&mut engine, &InputEvent::Press(Button::Shift));
        Engine::<HeadlessContext>::handle_input(&mut engine, &InputEvent::Press(Button::ArrowUp));
        assert!((engine.hue_speed() - (DEFAULT_HUE_SPEED + FINE_HUE_SPEED_STEP)).abs() < 1e-6);

        Engine::<HeadlessContext>::handle_input(&mut engine, &InputEvent::Release(Button::Shift));
        Engine::<HeadlessContext>::handle_input(&mut engine, &InputEvent::Press(Button::ArrowUp));
        assert!(
            (engine.hue_speed() - (DEFAULT_HUE_SPEED + FINE_HUE_SPEED_STEP + HUE_SPEED_STEP)).abs()
                < 1e-6
        );
    }

    #[test]
    fn test_held_arrow_repeats_step() {
        let mut engine = engine();

        Engine::<HeadlessContext>::handle_input(&mut engine, &InputEvent::Press(Button::ArrowUp));
        Engine::<HeadlessContext>::handle_input(&mut engine, &InputEvent::Repeat(Button::ArrowUp));
        Engine::<HeadlessContext>::handle_input(&mut engine, &InputEvent::Repeat(Button::ArrowUp));
        assert!((engine.hue_speed() - (DEFAULT_HUE_SPEED + 3.0 * HUE_SPEED_STEP)).abs() < 1e-6);
    }

    #[test]
    fn test_left_drag_scrubs_hue() {
        let mut engine = engine();
        let mut ctx = HeadlessContext::new(WindowDimensions::new(4, 4));
        let frame = FrameInfo::new(0, 0.0, 0.0);

        Engine::<HeadlessContext>::handle_input(&mut engine, &InputEvent::Press(Button::Space));
        Engine::<HeadlessContext>::handle_input(
            &mut engine,
            &InputEvent::CursorMoved { x: 10.0, y: 10.0 },
        );

        // Moving without the button held leaves the hue alone
        Engine::<HeadlessContext>::handle_input(
            &mut engine,
            &InputEvent::CursorMoved { x: 110.0, y: 10.0 },
        );
        engine.update(&frame, &mut ctx);
        assert_eq!(engine.hue(), 0.0);

        Engine::<HeadlessContext>::handle_input(&mut engine, &InputEvent::Press(Button::MouseLeft));
        Engine::<HeadlessContext>::handle_input(
            &mut engine,
            &InputEvent::CursorMoved { x: 310.0, y: 10.0 },
        );
        engine.update(&frame, &mut ctx);
        assert!((engine.hue() - 200.0 * HUE_PER_PIXEL).abs() < 1e-5);
    }
}
