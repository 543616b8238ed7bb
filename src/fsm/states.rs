//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers, with no closures, no
//! dynamic dispatch and no heap.
//!
//! ```text
//!  STARTUP ──[always]──▶ FULLSPEED ──[spin-up done]──▶ RUNNING
//!     ▲                                                   │
//!     │                                            [T < low]
//!     │                                                   ▼
//!     └──────────────[T > low + hysteresis]────────────  OFF
//! ```
//!
//! The output level itself comes from the context's [`ActuationPolicy`];
//! the handlers only decide *when* it changes.

use super::context::ControllerContext;
use super::{StateDescriptor, StateId};
use crate::control::ActuationPolicy;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Startup
        StateDescriptor {
            id: StateId::Startup,
            on_enter: None,
            on_exit: None,
            on_update: startup_update,
        },
        // Index 1: FullSpeed
        StateDescriptor {
            id: StateId::FullSpeed,
            on_enter: Some(fullspeed_enter),
            on_exit: None,
            on_update: fullspeed_update,
        },
        // Index 2: Running
        StateDescriptor {
            id: StateId::Running,
            on_enter: None,
            on_exit: None,
            on_update: running_update,
        },
        // Index 3: Off
        StateDescriptor {
            id: StateId::Off,
            on_enter: Some(off_enter),
            on_exit: None,
            on_update: off_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  STARTUP
// ═══════════════════════════════════════════════════════════════════════════

/// The engine restarts `ticks_in_state` on the way into FULLSPEED, which
/// is what resets the kick-start dwell.
fn startup_update(ctx: &mut ControllerContext) -> Option<StateId> {
    ctx.level = ctx.policy.kick();
    Some(StateId::FullSpeed)
}

// ═══════════════════════════════════════════════════════════════════════════
//  FULLSPEED: forced kick-start dwell
// ═══════════════════════════════════════════════════════════════════════════

fn fullspeed_enter(ctx: &mut ControllerContext) {
    ctx.level = ctx.policy.kick();
    info!(
        "FULLSPEED: kick-start for {} ticks",
        u16::from(ctx.config.spinup_ticks) + 1
    );
}

fn fullspeed_update(ctx: &mut ControllerContext) -> Option<StateId> {
    if ctx.ticks_in_state > u32::from(ctx.config.spinup_ticks) {
        ctx.level = ctx.policy.spun_up(ctx.level);
        return Some(StateId::Running);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING: regulated output
// ═══════════════════════════════════════════════════════════════════════════

fn running_update(ctx: &mut ControllerContext) -> Option<StateId> {
    let next = ctx
        .policy
        .decide(StateId::Running, ctx.temperature, ctx.level);

    if ctx.temperature < ctx.policy.thresholds().low {
        ctx.level = next;
        return Some(StateId::Off);
    }

    if next != ctx.level {
        debug!("RUNNING: T={} -> {:?}", ctx.temperature, next);
    }
    ctx.level = next;
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(ctx: &mut ControllerContext) {
    ctx.level = ctx.policy.stopped();
    info!("OFF: fan stopped at {} °C", ctx.temperature_c());
}

fn off_update(ctx: &mut ControllerContext) -> Option<StateId> {
    if ctx.temperature > ctx.policy.thresholds().restart_above() {
        return Some(StateId::Startup);
    }
    None
}
