//! Plain-text rendering of a container.
use std::fmt;

use stash_core::{Cell, GridContainer};

const GLYPHS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Draws the grid with one glyph per distinct instance, followed by a legend.
pub fn render(container: &GridContainer) -> String {
    GridView(container).to_string()
}

/// Text view of a container's grid.
pub struct GridView<'a>(pub &'a GridContainer);

impl fmt::Display for GridView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let container = self.0;
        let grid = container.grid();
        let dims = grid.dimensions();
        let keys = grid.keys();
        let glyph = |index: usize| GLYPHS.get(index).map_or('#', |&b| b as char);

        writeln!(
            f,
            "{} [{}] {}x{}",
            container.title(),
            container.mode(),
            dims.width,
            dims.height
        )?;

        for y in 0..dims.height as i32 {
            let row: String = (0..dims.width as i32)
                .map(|x| {
                    grid.key_at(Cell::new(x, y))
                        .and_then(|key| keys.iter().position(|k| *k == key))
                        .map_or('.', glyph)
                })
                .collect();
            writeln!(f, "{row}")?;
        }

        for (index, (_, instance)) in grid.iter().enumerate() {
            writeln!(
                f,
                "  {} {} x{} at {}{}",
                glyph(index),
                instance.kind().name,
                instance.amount(),
                instance.anchor().unwrap_or_default(),
                if instance.is_rotated() { " (rotated)" } else { "" }
            )?;
        }

        match container.weight_limit() {
            Some(limit) => writeln!(
                f,
                "  weight {:.2} / {:.2}",
                container.current_weight(),
                limit
            ),
            None => writeln!(f, "  weight {:.2}", container.current_weight()),
        }
    }
}

/// Serializes the container snapshot as pretty JSON.
pub fn snapshot_json(container: &GridContainer) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&container.snapshot())?)
}
