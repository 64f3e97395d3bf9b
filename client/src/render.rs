use web_sys::CanvasRenderingContext2d;

use crate::state::{Point, State, BACKGROUND_COLOR, STROKE_COLOR, STROKE_WIDTH};

/// Fills the surface with the background color and reapplies the stroke
/// style. Used after init/resize (which reset context state) and for clear.
pub fn reset_surface(state: &State) {
    let ctx = &state.ctx;
    ctx.set_fill_style_str(BACKGROUND_COLOR);
    ctx.fill_rect(0.0, 0.0, state.width, state.height);
    ctx.set_line_width(STROKE_WIDTH);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.set_stroke_style_str(STROKE_COLOR);
}

pub fn draw_segment(ctx: &CanvasRenderingContext2d, from: Point, to: Point) {
    ctx.begin_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.stroke();
}
