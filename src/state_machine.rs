//! A small, reusable finite state machine.
//!
//! States are identified by an enum tag whose kebab-case name is available through
//! [`strum::IntoStaticStr`]. Each registered state carries optional enter/update/exit hooks.
//! Hooks are plain function pointers that receive an explicit mutable reference to the
//! owning entity's context, so the machine itself knows nothing about entity semantics.
//!
//! Transitions requested from inside a hook never re-enter the machine. A hook gets a
//! [`Transition`] slot instead; the machine applies the request once the hook returns.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::StateMachineError;

/// Upper bound on transitions chained through `on_enter` hooks within one `set_state` call.
pub const MAX_CHAINED_TRANSITIONS: usize = 16;

/// Requirements for a state tag.
pub trait StateId: Copy + Eq + Hash + fmt::Debug + Into<&'static str> {}

impl<T> StateId for T where T: Copy + Eq + Hash + fmt::Debug + Into<&'static str> {}

/// Called after the machine switched into the state.
pub type EnterFn<S, C> = fn(&mut C, &mut Transition<S>);
/// Called once per `update` while the state is current. Receives the delta time.
pub type UpdateFn<S, C> = fn(&mut C, f32, &mut Transition<S>);
/// Called before the machine switches away from the state.
pub type ExitFn<C> = fn(&mut C);

/// A single-slot transition request handed to hooks.
///
/// Requesting twice overwrites the first request; only the last one is applied.
#[derive(Debug)]
pub struct Transition<S> {
    target: Option<S>,
}

impl<S: Copy> Transition<S> {
    /// Requests a switch to `state` once the running hook returns.
    pub fn to(&mut self, state: S) {
        self.target = Some(state);
    }

    /// Returns the currently requested target, if any.
    pub fn requested(&self) -> Option<S> {
        self.target
    }
}

impl<S> Default for Transition<S> {
    fn default() -> Self {
        Self { target: None }
    }
}

/// The hooks registered for one state.
pub struct StateHooks<S, C> {
    pub on_enter: Option<EnterFn<S, C>>,
    pub on_update: Option<UpdateFn<S, C>>,
    pub on_exit: Option<ExitFn<C>>,
    /// Terminal states refuse every outgoing transition.
    pub terminal: bool,
}

impl<S, C> StateHooks<S, C> {
    /// A state without any hooks.
    pub fn new() -> Self {
        Self {
            on_enter: None,
            on_update: None,
            on_exit: None,
            terminal: false,
        }
    }

    /// A terminal state: once entered, the machine stays there.
    pub fn terminal() -> Self {
        Self {
            terminal: true,
            ..Self::new()
        }
    }

    pub fn with_enter(mut self, hook: EnterFn<S, C>) -> Self {
        self.on_enter = Some(hook);
        self
    }

    pub fn with_update(mut self, hook: UpdateFn<S, C>) -> Self {
        self.on_update = Some(hook);
        self
    }

    pub fn with_exit(mut self, hook: ExitFn<C>) -> Self {
        self.on_exit = Some(hook);
        self
    }
}

impl<S, C> Default for StateHooks<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// A finite state machine over state tags `S`, driving hooks that operate on a context `C`.
pub struct StateMachine<S, C> {
    label: &'static str,
    states: HashMap<S, StateHooks<S, C>>,
    current: Option<S>,
}

impl<S: StateId, C> StateMachine<S, C> {
    /// Creates an empty machine. The label only shows up in logs and errors.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            states: HashMap::new(),
            current: None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Registers a state. Fails if a state with the same name is already registered.
    ///
    /// Returns the machine so registrations can be chained with `?`.
    pub fn add_state(&mut self, state: S, hooks: StateHooks<S, C>) -> Result<&mut Self, StateMachineError> {
        if self.states.contains_key(&state) {
            return Err(StateMachineError::DuplicateState {
                machine: self.label,
                state: state.into(),
            });
        }

        self.states.insert(state, hooks);
        Ok(self)
    }

    pub fn has_state(&self, state: S) -> bool {
        self.states.contains_key(&state)
    }

    /// The active state, or `None` before the first `set_state`.
    pub fn current(&self) -> Option<S> {
        self.current
    }

    pub fn is_current_state(&self, state: S) -> bool {
        self.current == Some(state)
    }

    /// Switches to `state`, running the old state's exit hook and then the new state's enter hook.
    ///
    /// Switching to the current state does nothing. A transition requested by the enter hook is
    /// applied right after the enter hook returns.
    pub fn set_state(&mut self, ctx: &mut C, state: S) -> Result<(), StateMachineError> {
        let mut next = state;
        for _ in 0..MAX_CHAINED_TRANSITIONS {
            match self.apply(ctx, next)? {
                Some(chained) => next = chained,
                None => return Ok(()),
            }
        }

        Err(StateMachineError::TransitionLoop {
            machine: self.label,
            target: next.into(),
            limit: MAX_CHAINED_TRANSITIONS,
        })
    }

    /// Same as [`set_state`](Self::set_state), looking the state up by its string name.
    pub fn set_state_by_name(&mut self, ctx: &mut C, name: &str) -> Result<(), StateMachineError>
    where
        S: FromStr,
    {
        let state = S::from_str(name).map_err(|_| StateMachineError::UnknownState {
            machine: self.label,
            state: name.to_string(),
        })?;
        self.set_state(ctx, state)
    }

    /// Runs the current state's update hook, then applies the transition it requested, if any.
    pub fn update(&mut self, ctx: &mut C, dt: f32) -> Result<(), StateMachineError> {
        let current = self
            .current
            .ok_or(StateMachineError::NotStarted { machine: self.label })?;

        let mut transition = Transition::default();
        if let Some(on_update) = self.states.get(&current).and_then(|hooks| hooks.on_update) {
            on_update(ctx, dt, &mut transition);
        }

        match transition.requested() {
            Some(next) => {
                trace!(machine = self.label, to = name(next), "Applying deferred transition");
                self.set_state(ctx, next)
            }
            None => Ok(()),
        }
    }

    /// Performs a single transition and returns whatever the enter hook requested.
    fn apply(&mut self, ctx: &mut C, state: S) -> Result<Option<S>, StateMachineError> {
        let on_enter = match self.states.get(&state) {
            Some(hooks) => hooks.on_enter,
            None => {
                return Err(StateMachineError::UnknownState {
                    machine: self.label,
                    state: name(state).to_string(),
                })
            }
        };

        if self.current == Some(state) {
            return Ok(None);
        }

        let mut on_exit = None;
        if let Some(current) = self.current {
            if let Some(hooks) = self.states.get(&current) {
                if hooks.terminal {
                    return Err(StateMachineError::TerminalState {
                        machine: self.label,
                        state: current.into(),
                        target: state.into(),
                    });
                }
                on_exit = hooks.on_exit;
            }
        }

        debug!(
            machine = self.label,
            from = self.current.map(name).unwrap_or("none"),
            to = name(state),
            "State transition"
        );

        if let Some(on_exit) = on_exit {
            on_exit(ctx);
        }

        self.current = Some(state);

        let mut transition = Transition::default();
        if let Some(on_enter) = on_enter {
            on_enter(ctx, &mut transition);
        }

        Ok(transition.requested())
    }
}

fn name<S: StateId>(state: S) -> &'static str {
    state.into()
}

impl<S: StateId, C> fmt::Debug for StateMachine<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("label", &self.label)
            .field("current", &self.current)
            .field("states", &self.states.len())
            .finish()
    }
}
