//! Key legend: drawn under the board and printed by `--help`.

use engine::graphics::{Color, Renderer2d, line_advance_y, text_width};
use engine::ui::{Anchor, Rect, Size};

pub const LEGEND_SCALE: u32 = 2;
const PADDING: u32 = 10;
const COLUMN_GAP: u32 = 16;

const BACKGROUND: Color = [24, 24, 32, 255];
const HEADER: Color = [200, 200, 210, 255];
const KEY: Color = [255, 255, 0, 255];
const ACTION: Color = [255, 255, 255, 255];

/// `(key, action)` rows in display order.
pub const ENTRIES: [(&str, &str); 5] = [
    ("Arrow left", "Move coin left"),
    ("Arrow right", "Move coin right"),
    ("Space", "Drop coin"),
    ("R", "Reset board"),
    ("Esc / Q", "Quit"),
];

/// Height of the legend band: a header line plus one line per entry.
pub fn legend_height() -> u32 {
    PADDING * 2 + line_advance_y(LEGEND_SCALE) * (ENTRIES.len() as u32 + 1)
}

fn key_column_width() -> u32 {
    ENTRIES
        .iter()
        .map(|(key, _)| text_width(key, LEGEND_SCALE))
        .chain(std::iter::once(text_width("Key", LEGEND_SCALE)))
        .max()
        .unwrap_or(0)
}

fn table_size() -> Size {
    let action_width = ENTRIES
        .iter()
        .map(|(_, action)| text_width(action, LEGEND_SCALE))
        .max()
        .unwrap_or(0);
    Size::new(
        key_column_width() + COLUMN_GAP + action_width,
        line_advance_y(LEGEND_SCALE) * (ENTRIES.len() as u32 + 1),
    )
}

/// Fills `area` and centres the key table inside it.
pub fn draw_legend(gfx: &mut dyn Renderer2d, area: Rect) {
    gfx.fill_rect(area, BACKGROUND);
    gfx.rect_outline(area, HEADER);

    let table = area.place(table_size(), Anchor::Center);
    let key_x = table.x;
    let action_x = key_x + key_column_width() + COLUMN_GAP;
    let line = line_advance_y(LEGEND_SCALE);
    let mut y = table.y;

    gfx.draw_text_scaled(key_x, y, "Key", HEADER, LEGEND_SCALE);
    gfx.draw_text_scaled(action_x, y, "Action", HEADER, LEGEND_SCALE);
    for (key, action) in ENTRIES {
        y += line;
        gfx.draw_text_scaled(key_x, y, key, KEY, LEGEND_SCALE);
        gfx.draw_text_scaled(action_x, y, action, ACTION, LEGEND_SCALE);
    }
}

/// Plain-text table for the terminal.
pub fn legend_text() -> String {
    let width = ENTRIES
        .iter()
        .map(|(key, _)| key.len())
        .max()
        .unwrap_or(0)
        .max("Key".len());
    let mut out = format!("{:<width$}  Action\n", "Key");
    for (key, action) in ENTRIES {
        out.push_str(&format!("{key:<width$}  {action}\n"));
    }
    out
}
