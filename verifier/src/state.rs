//! Provider state registry.
//!
//! Interactions may declare a named precondition ("there are events") that
//! the provider must be put into before the request is replayed. The
//! provider integration registers a set-up/tear-down pair per state name,
//! plus optional global hooks that run once per verification run.

use std::fmt;

/// A zero-argument provider-side callback.
pub type Hook = Box<dyn Fn() + Send + Sync>;

/// A named provider state with optional set-up and tear-down hooks.
pub struct ProviderState {
    name: String,
    set_up: Option<Hook>,
    tear_down: Option<Hook>,
}

impl ProviderState {
    /// Create a state with no hooks.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            set_up: None,
            tear_down: None,
        }
    }

    /// Attach a set-up hook, run before each interaction declaring this state.
    #[must_use]
    pub fn with_set_up(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.set_up = Some(Box::new(hook));
        self
    }

    /// Attach a tear-down hook, run after each interaction declaring this
    /// state, whether or not its verification succeeded.
    #[must_use]
    pub fn with_tear_down(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.tear_down = Some(Box::new(hook));
        self
    }

    /// The state name interactions refer to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn run_set_up(&self) {
        if let Some(hook) = &self.set_up {
            hook();
        }
    }

    pub(crate) fn run_tear_down(&self) {
        if let Some(hook) = &self.tear_down {
            hook();
        }
    }
}

impl fmt::Debug for ProviderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderState")
            .field("name", &self.name)
            .field("set_up", &self.set_up.is_some())
            .field("tear_down", &self.tear_down.is_some())
            .finish()
    }
}

/// Registry of provider states plus run-scoped global hooks.
#[derive(Default)]
pub struct ProviderStateRegistry {
    set_up: Option<Hook>,
    tear_down: Option<Hook>,
    states: Vec<ProviderState>,
}

impl ProviderStateRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the global set-up hook, run once before the first interaction.
    #[must_use]
    pub fn with_set_up(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.set_up = Some(Box::new(hook));
        self
    }

    /// Attach the global tear-down hook, run once after the last interaction
    /// (or after a fatal abort).
    #[must_use]
    pub fn with_tear_down(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.tear_down = Some(Box::new(hook));
        self
    }

    /// Register a provider state.
    #[must_use]
    pub fn with_state(mut self, state: ProviderState) -> Self {
        self.states.push(state);
        self
    }

    /// Look up a state by exact, case-sensitive name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ProviderState> {
        self.states.iter().find(|state| state.name == name)
    }

    pub(crate) fn run_set_up(&self) {
        if let Some(hook) = &self.set_up {
            hook();
        }
    }

    pub(crate) fn run_tear_down(&self) {
        if let Some(hook) = &self.tear_down {
            hook();
        }
    }
}

impl fmt::Debug for ProviderStateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderStateRegistry")
            .field("set_up", &self.set_up.is_some())
            .field("tear_down", &self.tear_down.is_some())
            .field("states", &self.states)
            .finish()
    }
}
