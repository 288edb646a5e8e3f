//! Block digit font for the snowdrift countdown.
//!
//! Glyphs are 5 rows tall and drawn with full blocks so the countdown reads
//! at a distance and its footprint maps cleanly onto the explosion source.

/// Rows in every glyph.
pub const GLYPH_HEIGHT: usize = 5;

/// Block digits, 5 columns wide.
pub const DIGITS: [[&str; GLYPH_HEIGHT]; 10] = [
    ["█████", "█   █", "█   █", "█   █", "█████"],
    ["  █  ", " ██  ", "  █  ", "  █  ", " ███ "],
    ["█████", "    █", "█████", "█    ", "█████"],
    ["█████", "    █", " ████", "    █", "█████"],
    ["█   █", "█   █", "█████", "    █", "    █"],
    ["█████", "█    ", "█████", "    █", "█████"],
    ["█████", "█    ", "█████", "█   █", "█████"],
    ["█████", "    █", "   █ ", "  █  ", "  █  "],
    ["█████", "█   █", "█████", "█   █", "█████"],
    ["█████", "█   █", "█████", "    █", "█████"],
];

/// Minute/second separator, 1 column wide.
pub const COLON: [&str; GLYPH_HEIGHT] = [" ", "█", " ", "█", " "];

/// Plain `MM:SS` text, with minutes capped at 99 and seconds at 59.
pub fn format_countdown(minutes: u32, seconds: u32) -> String {
    format!("{:02}:{:02}", minutes.min(99), seconds.min(59))
}

/// Build the block-art rendering of `MM:SS`.
///
/// # Returns
/// [`GLYPH_HEIGHT`] lines of equal width.
pub fn build_countdown_art(minutes: u32, seconds: u32) -> Vec<String> {
    let minutes = minutes.min(99);
    let seconds = seconds.min(59);
    let glyphs = [
        &DIGITS[(minutes / 10) as usize],
        &DIGITS[(minutes % 10) as usize],
        &COLON,
        &DIGITS[(seconds / 10) as usize],
        &DIGITS[(seconds % 10) as usize],
    ];

    (0..GLYPH_HEIGHT)
        .map(|row| {
            glyphs
                .iter()
                .map(|glyph| glyph[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Footprint of rendered art as `(columns, rows)` in terminal cells.
pub fn art_size(lines: &[String]) -> (usize, usize) {
    let columns = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    (columns, lines.len())
}
