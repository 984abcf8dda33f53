//! Renderer contract
//!
//! The simulation never draws anything itself. After each tick the runner
//! hands a [`RenderSnapshot`] and a [`HudView`] to a [`Renderer`].

use std::io::{self, Write};

use serde::Serialize;

use crate::game::snapshot::{HudView, RenderSnapshot};

/// Consumer of read-only frames
pub trait Renderer {
    fn render(&mut self, snapshot: &RenderSnapshot, hud: &HudView) -> io::Result<()>;

    /// Push buffered output, if any
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Renderer that discards every frame
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _snapshot: &RenderSnapshot, _hud: &HudView) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct Frame<'a> {
    snapshot: &'a RenderSnapshot,
    hud: &'a HudView,
}

/// Writes one JSON object per rendered frame
pub struct JsonLinesRenderer<W: Write> {
    writer: W,
    /// Only every `every`-th snapshot is written
    every: u64,
    seen: u64,
    written: u64,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(writer: W, every: u64) -> Self {
        Self {
            writer,
            every: every.max(1),
            seen: 0,
            written: 0,
        }
    }

    pub fn frames_written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, snapshot: &RenderSnapshot, hud: &HudView) -> io::Result<()> {
        let due = self.seen % self.every == 0;
        self.seen += 1;
        if !due {
            return Ok(());
        }

        serde_json::to_writer(&mut self.writer, &Frame { snapshot, hud })?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::game::state::GameState;

    #[test]
    fn test_json_lines_sampling() {
        let state = GameState::new(&SimConfig::default());
        let snapshot = RenderSnapshot::from_game_state(&state);
        let hud = HudView::from_game_state(&state);

        let mut renderer = JsonLinesRenderer::new(Vec::new(), 3);
        for _ in 0..7 {
            renderer.render(&snapshot, &hud).unwrap();
        }
        renderer.flush().unwrap();
        assert_eq!(renderer.frames_written(), 3);

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);

        let frame: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(frame["hud"]["total_files"], 5);
        assert_eq!(frame["snapshot"]["tick"], 0);
    }

    #[test]
    fn test_zero_interval_writes_every_frame() {
        let state = GameState::new(&SimConfig::default());
        let snapshot = RenderSnapshot::from_game_state(&state);
        let hud = HudView::from_game_state(&state);

        let mut renderer = JsonLinesRenderer::new(Vec::new(), 0);
        renderer.render(&snapshot, &hud).unwrap();
        renderer.render(&snapshot, &hud).unwrap();
        assert_eq!(renderer.frames_written(), 2);
    }

    #[test]
    fn test_null_renderer() {
        let state = GameState::new(&SimConfig::default());
        let mut renderer = NullRenderer;
        assert!(renderer
            .render(&RenderSnapshot::from_game_state(&state), &HudView::from_game_state(&state))
            .is_ok());
    }
}
