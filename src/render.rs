use std::ffi::CString;

use raylib::prelude::*;

use crate::demos::Primitive;

const ROUNDED_SEGMENTS: i32 = 8;

pub fn draw_primitives<D: RaylibDraw>(d: &mut D, primitives: &[Primitive]) {
    for primitive in primitives {
        match primitive {
            Primitive::Fill { rect, color } => d.draw_rectangle_rec(*rect, *color),
            Primitive::Rounded { rect, roundness, color } => {
                d.draw_rectangle_rounded(*rect, *roundness, ROUNDED_SEGMENTS, *color)
            }
            Primitive::Outline { rect, thickness, color } => d.draw_rectangle_lines_ex(*rect, *thickness, *color),
            Primitive::Line { from, to, thickness, color } => d.draw_line_ex(*from, *to, *thickness, *color),
            Primitive::Circle { center, radius, color } => d.draw_circle_v(*center, *radius, *color),
            Primitive::Text { text, position, size, color } => {
                d.draw_text(text, position.x.round() as i32, position.y.round() as i32, *size, *color)
            }
        }
    }
}

/// Width of `text` in the default font. Needs an open window.
pub fn measure_text(text: &str, size: i32) -> f32 {
    // RaylibHandle::measure_text is out of reach behind a generic RaylibDraw,
    // and it panics on an interior NUL. Call the C function directly.
    match CString::new(text) {
        // SAFETY: `c_text` is NUL-terminated and outlives the call
        Ok(c_text) => unsafe { raylib::ffi::MeasureText(c_text.as_ptr(), size) as f32 },
        // Interior NUL; fall back to an estimate
        Err(_) => text.chars().count() as f32 * size as f32 * 0.6,
    }
}

/// Greedy word wrap. Explicit newlines start a new paragraph; a word wider
/// than `max_width` gets a line of its own.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", line, word);
            if measure(&candidate) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            }
        }
        lines.push(line);
    }
    lines
}
