//! Idle/demo mode - a bot that plays the game
//!
//! Jumps whenever the avatar sinks below the middle of the next gap it has to
//! pass through (or the middle of the play area when none is coming).

use super::state::{GameSession, PlayAreaMetrics};

/// How far below the target line the avatar may sink before jumping
const SINK_MARGIN: f32 = 10.0;

/// Vertical line the autopilot tries to hold
pub fn target_line(session: &GameSession, area: &PlayAreaMetrics) -> f32 {
    let avatar_left = session.avatar.x;
    session
        .obstacles
        .iter()
        .find(|o| o.upper.left + o.upper.width >= avatar_left)
        .map(|o| {
            let (top, bottom) = o.gap_span();
            (top + bottom) / 2.0
        })
        .unwrap_or(area.height / 2.0)
}

/// Whether the bot wants to jump before the next tick
pub fn wants_jump(session: &GameSession, area: &PlayAreaMetrics) -> bool {
    let avatar = &session.avatar;
    let center = avatar.y + avatar.size.y / 2.0;
    avatar.velocity > 0.0 && center > target_line(session, area) + SINK_MARGIN
}
