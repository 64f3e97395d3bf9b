use crate::render::{draw_segment, reset_surface};
use crate::state::{Point, State, StrokeSession};

pub fn start_stroke(state: &mut State, at: Point) {
    state.stroke.begin(at);
}

/// Renders the segment from the session's last point immediately, so a
/// partially drawn stroke is always visible.
pub fn extend_stroke(state: &mut State, to: Point) {
    if let Some((from, to)) = state.stroke.extend(to) {
        draw_segment(&state.ctx, from, to);
    }
}

pub fn end_stroke(state: &mut State) -> bool {
    state.stroke.finish()
}

/// Returns the pad to its freshly initialized look: background, stroke
/// style, idle session. Status text is owned by the callers.
pub fn clear_pad(state: &mut State) {
    state.stroke = StrokeSession::Idle;
    reset_surface(state);
}
