//! Quill Sign demo: a windowed signature pad.
//!
//! Draw with the left mouse button. `E` erases, `S` saves the signature as
//! `signature.png` (transparent background). A long press erases too when
//! `erase_on_long_press` is configured.

use anyhow::Result;
use log::{error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::ElementState;
use winit::keyboard::Key;

use quill_canvas::StrokeCanvas;
use quill_config::QuillConfig;
use quill_window::{EventHandler, QuillWindow, WindowCtx};
use stroke_core::{
    LongPressRecognizer, PanPhase, PanRecognizer, Rgba, RibbonMeshBuilder, StrokeSampler,
    StrokeStyle, Transform2D,
};

fn style_from_config(config: &QuillConfig) -> StrokeStyle {
    let mut style = StrokeStyle::default();
    if let Some(hex) = config.stroke.color.as_deref() {
        match Rgba::from_hex(hex) {
            Some(color) => style.set_color(color),
            None => warn!("ignoring invalid stroke color {hex:?}"),
        }
    }
    // Both widths go through one setter so a configured range narrower than
    // the defaults survives intact.
    let width_min = config.stroke.width_min.unwrap_or(style.width_min());
    let width_max = config.stroke.width_max.unwrap_or(style.width_max());
    style.set_widths(width_min, width_max);
    style
}

struct SignaturePad {
    style: StrokeStyle,
    canvas: Option<StrokeCanvas>,
    pan: PanRecognizer,
    long_press: LongPressRecognizer,
    last_pointer: [f32; 2],
    sampler: StrokeSampler,
    builder: RibbonMeshBuilder,
    erase_on_long_press: bool,
}

impl SignaturePad {
    fn new(config: &QuillConfig) -> Self {
        let style = style_from_config(config);

        let mut pan = PanRecognizer::new();
        if let Some(d) = config.gesture.distance_to_recognize {
            pan.set_distance_to_recognize(d);
        }

        Self {
            style,
            canvas: None,
            pan,
            long_press: LongPressRecognizer::new(),
            last_pointer: [0.0, 0.0],
            sampler: StrokeSampler::new(style.width_min(), style.width_max()),
            builder: RibbonMeshBuilder::new(),
            erase_on_long_press: config.gesture.erase_on_long_press,
        }
    }

    fn begin_press(&mut self, pos: [f32; 2], t: f64) {
        self.last_pointer = pos;
        self.pan.pointer_down(pos);
        self.long_press.pointer_down(pos, t);
    }

    /// Long presses are time-driven: a motionless hold produces no pointer
    /// events, so this gets polled from every redraw as well as from moves.
    fn hold_erases(&mut self, t: f64) -> bool {
        self.long_press.poll(self.last_pointer, t) && self.erase_on_long_press
    }

    /// Keyboard shortcuts; returns true when a redraw is needed. Matching is
    /// case-insensitive so caps lock or shift don't disable them.
    fn handle_character(&mut self, c: &str) -> bool {
        if c.eq_ignore_ascii_case("e") {
            self.erase();
            true
        } else if c.eq_ignore_ascii_case("s") {
            self.save_signature();
            false
        } else {
            false
        }
    }

    fn erase(&mut self) {
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.erase();
            info!(
                "signature erased, has_signature = {}",
                canvas.has_signature()
            );
        }
    }

    fn save_signature(&mut self) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        if !canvas.has_signature() {
            info!("nothing to save yet");
            return;
        }
        match canvas.snapshot() {
            Ok(bitmap) => match bitmap.save("signature.png") {
                Ok(()) => info!(
                    "saved signature.png ({}x{})",
                    bitmap.width(),
                    bitmap.height()
                ),
                Err(e) => error!("failed to write signature.png: {e}"),
            },
            Err(e) => error!("snapshot failed: {e}"),
        }
    }
}

impl EventHandler for SignaturePad {
    fn init(&mut self, ctx: &mut WindowCtx) -> Result<()> {
        let size = ctx.size();
        let mut canvas = StrokeCanvas::new(
            ctx.device_arc(),
            ctx.queue_arc(),
            ctx.surface_format(),
            size.width.max(1),
            size.height.max(1),
            self.style,
        )?;
        // The on-screen pad is white; snapshots stay transparent.
        canvas.set_background(Rgba::from_srgba_u8([255, 255, 255, 255]));
        self.canvas = Some(canvas);
        ctx.request_redraw();
        Ok(())
    }

    fn on_resize(&mut self, _ctx: &mut WindowCtx, size: PhysicalSize<u32>) -> Result<()> {
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.resize(size.width.max(1), size.height.max(1));
        }
        Ok(())
    }

    fn on_pointer_down(&mut self, _ctx: &mut WindowCtx, pos: [f32; 2], t: f64) -> Result<()> {
        self.begin_press(pos, t);
        Ok(())
    }

    fn on_pointer_move(&mut self, ctx: &mut WindowCtx, pos: [f32; 2], t: f64) -> Result<()> {
        self.last_pointer = pos;
        if self.hold_erases(t) {
            self.erase();
            ctx.request_redraw();
        }
        match self.pan.pointer_move(pos) {
            Some(PanPhase::Began(p)) => {
                self.sampler.begin(p, t);
                self.builder.reset();
                if let Some(anchor) = self.pan.anchor_point_in(&Transform2D::identity()) {
                    info!("stroke began at {p:?} (touched down at {anchor:?})");
                }
            }
            Some(PanPhase::Changed(p)) => {
                if let Some(segment) = self.sampler.add_point(p, t) {
                    if let Some(mesh) = self.builder.segment_mesh(segment.a, segment.b) {
                        if let Some(canvas) = self.canvas.as_mut() {
                            canvas.append_segment_mesh(&mesh);
                        }
                        ctx.request_redraw();
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn on_pointer_up(&mut self, ctx: &mut WindowCtx, _pos: [f32; 2], _t: f64) -> Result<()> {
        self.long_press.pointer_up();
        if self.pan.pointer_up() == Some(PanPhase::Ended) {
            let points = self.sampler.end();
            // A stroke that began but never moved again leaves a dot.
            if points.len() == 1 {
                let mesh = self.builder.dot_mesh(points[0]);
                if let Some(canvas) = self.canvas.as_mut() {
                    canvas.append_segment_mesh(&mesh);
                }
            }
            self.builder.reset();
            ctx.request_redraw();
        }
        Ok(())
    }

    fn on_pointer_cancel(&mut self, _ctx: &mut WindowCtx) -> Result<()> {
        self.long_press.pointer_up();
        if self.pan.pointer_cancel() == Some(PanPhase::Cancelled) {
            self.sampler.end();
            self.builder.reset();
        }
        Ok(())
    }

    fn on_key(&mut self, ctx: &mut WindowCtx, key: &Key, state: ElementState) -> Result<()> {
        if state != ElementState::Pressed {
            return Ok(());
        }
        if let Key::Character(c) = key {
            if self.handle_character(c.as_str()) {
                ctx.request_redraw();
            }
        }
        Ok(())
    }

    fn on_redraw(&mut self, ctx: &mut WindowCtx) -> Result<()> {
        if self.hold_erases(ctx.now()) {
            self.erase();
        }
        let Some(canvas) = self.canvas.as_mut() else {
            return Ok(());
        };
        let frame = ctx.acquire_current_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let device = ctx.device_arc();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("signature-pad-encoder"),
        });
        canvas.render(&mut encoder, &view);
        ctx.queue_arc().submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn main() -> Result<()> {
    let _ = env_logger::try_init();
    let config = QuillConfig::load();
    let window = QuillWindow::new("Quill Sign")?;
    window.run(SignaturePad::new(&config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stroke_core::LONG_PRESS_DURATION;

    #[test]
    fn stationary_hold_erases_without_pointer_motion() {
        let mut config = QuillConfig::default();
        config.gesture.erase_on_long_press = true;
        let mut pad = SignaturePad::new(&config);

        // No pointer moves after the press; only the clock advances.
        pad.begin_press([40.0, 40.0], 0.0);
        assert!(!pad.hold_erases(LONG_PRESS_DURATION * 0.5));
        assert!(pad.hold_erases(LONG_PRESS_DURATION + 0.1));
        // Consumed until the next press.
        assert!(!pad.hold_erases(LONG_PRESS_DURATION + 0.2));
        pad.begin_press([40.0, 40.0], 10.0);
        assert!(pad.hold_erases(10.0 + LONG_PRESS_DURATION));
    }

    #[test]
    fn hold_does_not_erase_when_disabled() {
        let mut pad = SignaturePad::new(&QuillConfig::default());
        pad.begin_press([40.0, 40.0], 0.0);
        assert!(!pad.hold_erases(LONG_PRESS_DURATION + 0.1));
    }

    #[test]
    fn shortcuts_ignore_letter_case() {
        let mut pad = SignaturePad::new(&QuillConfig::default());
        assert!(pad.handle_character("e"));
        assert!(pad.handle_character("E"));
        assert!(!pad.handle_character("x"));
    }

    #[test]
    fn narrow_configured_width_range_is_kept() {
        let mut config = QuillConfig::default();
        config.stroke.width_min = Some(0.5);
        config.stroke.width_max = Some(1.0);
        let style = style_from_config(&config);
        assert_eq!(style.width_min(), 0.5);
        assert_eq!(style.width_max(), 1.0);
    }
}
