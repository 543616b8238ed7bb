//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  StateTable                                               │
//! │  ┌───────────┬───────────┬──────────┬───────────────────┐ │
//! │  │ StateId   │ on_enter  │ on_exit  │ on_update         │ │
//! │  ├───────────┼───────────┼──────────┼───────────────────┤ │
//! │  │ Startup   │ -         │ -        │ fn(ctx)->Option<> │ │
//! │  │ FullSpeed │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ │
//! │  │ Running   │ -         │ -        │ fn(ctx)->Option<> │ │
//! │  │ Off       │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ │
//! │  └───────────┴───────────┴──────────┴───────────────────┘ │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer.  All functions receive `&mut ControllerContext` which
//! holds the latest temperature, the output level, the policy and the
//! number of ticks spent in the current state.

pub mod context;
pub mod states;

use context::ControllerContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all controller states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Startup = 0,
    FullSpeed = 1,
    Running = 2,
    Off = 3,
}

impl StateId {
    /// Total number of states: used to size the table array.
    pub const COUNT: usize = 4;

    /// Convert a table index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Startup` in release, which re-runs the
    /// kick-start from a known state.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Startup,
            1 => Self::FullSpeed,
            2 => Self::Running,
            3 => Self::Off,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Startup
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Startup => "Startup",
            Self::FullSpeed => "FullSpeed",
            Self::Running => "Running",
            Self::Off => "Off",
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut ControllerContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut ControllerContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single controller state.
/// Stored in a fixed-size array: no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]) and threads a
/// [`ControllerContext`] through every handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut ControllerContext) {
        info!("FSM starting in state: {}", self.table[self.current].id.name());
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Count the tick against the current state.
    /// 2. Call `on_update` for the current state.
    /// 3. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn tick(&mut self, ctx: &mut ControllerContext) {
        ctx.ticks_in_state = ctx.ticks_in_state.saturating_add(1);

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut ControllerContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {} (T={})",
            self.table[self.current].id.name(),
            self.table[next_idx].id.name(),
            ctx.temperature
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        ctx.ticks_in_state = 0;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::context::ControllerContext;
    use super::*;
    use crate::config::{ActuationKind, FanConfig};
    use crate::control::{ActuationLevel, FanStage};

    fn make_ctx() -> ControllerContext {
        ControllerContext::new(FanConfig::default())
    }

    fn make_fsm() -> Fsm {
        Fsm::new(states::build_state_table(), StateId::Startup)
    }

    /// Run the machine from boot through spin-up into Running at `temp`.
    fn spin_up(fsm: &mut Fsm, ctx: &mut ControllerContext, temp: i16) {
        ctx.temperature = temp;
        fsm.start(ctx);
        for _ in 0..=u32::from(ctx.config.spinup_ticks) + 1 {
            fsm.tick(ctx);
        }
        assert_eq!(fsm.current_state(), StateId::Running);
    }

    #[test]
    fn starts_in_startup() {
        let fsm = make_fsm();
        assert_eq!(fsm.current_state(), StateId::Startup);
    }

    #[test]
    fn startup_goes_to_fullspeed_regardless_of_temperature() {
        for temp in [0, 100, 298, 1020] {
            let mut fsm = make_fsm();
            let mut ctx = make_ctx();
            ctx.temperature = temp;
            fsm.start(&mut ctx);
            fsm.tick(&mut ctx);
            assert_eq!(fsm.current_state(), StateId::FullSpeed, "temp {temp}");
            assert_eq!(ctx.level, ActuationLevel::Forced);
            assert_eq!(ctx.ticks_in_state, 0);
        }
    }

    #[test]
    fn fullspeed_holds_for_32_ticks_then_runs() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        ctx.temperature = 310;
        fsm.start(&mut ctx);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::FullSpeed);

        for n in 1..=32u8 {
            fsm.tick(&mut ctx);
            assert_eq!(fsm.current_state(), StateId::FullSpeed, "left early at {n}");
            assert_eq!(ctx.ticks_in_state, u32::from(n));
            assert_eq!(ctx.level, ActuationLevel::Forced);
        }

        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Running);
        assert_eq!(ctx.level, ActuationLevel::Duty(255));
    }

    #[test]
    fn running_regulates_between_thresholds() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        spin_up(&mut fsm, &mut ctx, 298);

        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Running);
        assert_eq!(ctx.level, ActuationLevel::Duty(102));

        ctx.temperature = 328;
        fsm.tick(&mut ctx);
        assert_eq!(ctx.level, ActuationLevel::Duty(255));
    }

    #[test]
    fn running_to_off_below_low_threshold() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        spin_up(&mut fsm, &mut ctx, 320);

        ctx.temperature = 297;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Off);
        assert_eq!(ctx.level, ActuationLevel::Duty(0));
    }

    #[test]
    fn off_holds_until_strictly_above_restart_edge() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        spin_up(&mut fsm, &mut ctx, 320);
        ctx.temperature = 250;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Off);

        for temp in [250, 298, 299, 300] {
            ctx.temperature = temp;
            fsm.tick(&mut ctx);
            assert_eq!(fsm.current_state(), StateId::Off, "restarted at {temp}");
        }

        ctx.temperature = 301;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Startup);
    }

    #[test]
    fn restart_kicks_on_the_following_tick() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        spin_up(&mut fsm, &mut ctx, 320);
        ctx.temperature = 250;
        fsm.tick(&mut ctx);

        ctx.temperature = 327;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Startup);
        assert_eq!(ctx.level, ActuationLevel::Duty(0));

        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::FullSpeed);
        assert_eq!(ctx.level, ActuationLevel::Forced);
    }

    #[test]
    fn uninitialised_temperature_ends_in_off() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        ctx.temperature = 0;
        fsm.start(&mut ctx);
        for _ in 0..40 {
            fsm.tick(&mut ctx);
        }
        assert_eq!(fsm.current_state(), StateId::Off);
    }

    #[test]
    fn two_stage_keeps_full_through_spinup_handover() {
        let mut fsm = make_fsm();
        let mut ctx = ControllerContext::new(FanConfig {
            actuation: ActuationKind::TwoStage,
            ..FanConfig::default()
        });
        ctx.temperature = 310;
        fsm.start(&mut ctx);
        for _ in 0..34 {
            fsm.tick(&mut ctx);
            assert_eq!(ctx.level, ActuationLevel::Stage(FanStage::Full));
        }
        assert_eq!(fsm.current_state(), StateId::Running);

        fsm.tick(&mut ctx);
        assert_eq!(ctx.level, ActuationLevel::Stage(FanStage::Half));
    }

    #[test]
    fn state_time_restarts_on_every_transition() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        ctx.temperature = 320;
        fsm.start(&mut ctx);
        fsm.tick(&mut ctx);
        assert_eq!(ctx.ticks_in_state, 0);
        fsm.tick(&mut ctx);
        fsm.tick(&mut ctx);
        assert_eq!(ctx.ticks_in_state, 2);

        // OFF -> STARTUP -> FULLSPEED restarts the dwell from zero.
        for _ in 0..40 {
            fsm.tick(&mut ctx);
        }
        ctx.temperature = 250;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Off);
        fsm.tick(&mut ctx);
        assert_eq!(ctx.ticks_in_state, 1);

        ctx.temperature = 320;
        fsm.tick(&mut ctx);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::FullSpeed);
        assert_eq!(ctx.ticks_in_state, 0);
    }

    #[test]
    fn state_id_from_index_roundtrip() {
        for i in 0..StateId::COUNT {
            let id = StateId::from_index(i);
            assert_eq!(id as usize, i);
        }
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn state_id_from_invalid_index_returns_startup() {
        assert_eq!(StateId::from_index(99), StateId::Startup);
    }
}
