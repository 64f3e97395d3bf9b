use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub const BACKGROUND_COLOR: &str = "#0b1120";
pub const STROKE_COLOR: &str = "#ffffff";
pub const STROKE_WIDTH: f64 = 18.0;

/// A drawing position in logical canvas coordinates.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Transient state of an in-progress freehand line. Created on press,
/// extended on move, destroyed on release/leave/cancel.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum StrokeSession {
    Idle,
    Active { last: Point },
}

impl StrokeSession {
    pub fn is_active(&self) -> bool {
        matches!(self, StrokeSession::Active { .. })
    }

    /// Marks the session active at `at`. Draws nothing by itself.
    pub fn begin(&mut self, at: Point) {
        *self = StrokeSession::Active { last: at };
    }

    /// Advances the session to `to`, returning the segment to render.
    /// Ignored while idle, so a stray move event is a no-op.
    pub fn extend(&mut self, to: Point) -> Option<(Point, Point)> {
        match self {
            StrokeSession::Active { last } => {
                let from = *last;
                *last = to;
                Some((from, to))
            }
            StrokeSession::Idle => None,
        }
    }

    /// Deactivates the session. Returns whether one was in progress.
    pub fn finish(&mut self) -> bool {
        let was_active = self.is_active();
        *self = StrokeSession::Idle;
        was_active
    }
}

/// Submission flow state. Transitions are linear per attempt:
/// idle -> sending -> success | error -> idle.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Phase {
    Idle,
    Sending,
    Success,
    Error,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Sending => "sending",
            Phase::Success => "success",
            Phase::Error => "error",
        }
    }
}

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    /// Logical surface size; the backing buffer is this times the device
    /// pixel ratio.
    pub width: f64,
    pub height: f64,
    pub stroke: StrokeSession,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_before_start_is_ignored() {
        let mut session = StrokeSession::Idle;
        assert_eq!(session.extend(Point { x: 4.0, y: 5.0 }), None);
        assert!(!session.is_active());
    }

    #[test]
    fn begin_records_last_point_without_segment() {
        let mut session = StrokeSession::Idle;
        session.begin(Point { x: 10.0, y: 20.0 });
        assert_eq!(
            session,
            StrokeSession::Active {
                last: Point { x: 10.0, y: 20.0 }
            }
        );
    }

    #[test]
    fn extend_yields_segment_and_advances() {
        let mut session = StrokeSession::Idle;
        session.begin(Point { x: 0.0, y: 0.0 });

        let first = session.extend(Point { x: 3.0, y: 4.0 });
        assert_eq!(
            first,
            Some((Point { x: 0.0, y: 0.0 }, Point { x: 3.0, y: 4.0 }))
        );

        let second = session.extend(Point { x: 6.0, y: 8.0 });
        assert_eq!(
            second,
            Some((Point { x: 3.0, y: 4.0 }, Point { x: 6.0, y: 8.0 }))
        );
    }

    #[test]
    fn finish_deactivates_and_reports() {
        let mut session = StrokeSession::Idle;
        assert!(!session.finish());

        session.begin(Point { x: 1.0, y: 1.0 });
        assert!(session.finish());
        assert!(!session.is_active());
        assert_eq!(session.extend(Point { x: 2.0, y: 2.0 }), None);
    }

    #[test]
    fn phase_names_match_status_states() {
        assert_eq!(Phase::Idle.as_str(), "idle");
        assert_eq!(Phase::Sending.as_str(), "sending");
        assert_eq!(Phase::Success.as_str(), "success");
        assert_eq!(Phase::Error.as_str(), "error");
    }
}
