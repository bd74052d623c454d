//! Plugin instance lifecycle.
//!
//! ```text
//! Created ─init─► Initialized ─activate─► Activated ⇄ Processing
//!                                           │   ▲          │
//!                                 deactivate│   │activate  │deactivate
//!                                           ▼   │          ▼
//!                                         Deactivated ◄────┘
//!                                           │
//!                                        destroy ─► Destroyed
//! ```
//!
//! `process()` is only valid in [`LifecycleState::Processing`]. `flush()` is
//! valid in any live state except `Processing`, so automation that arrives
//! while playback is stopped still reaches the parameter store.
//!
//! [`Lifecycle`] is `Copy` and lock-free: the owner of the instance carries it
//! across threads together with the rest of the instance state.

/// Where an instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Constructed, host not yet queried.
    Created,
    /// Initialized with defaults, not yet activated.
    Initialized,
    /// Activated with a sample rate and block size, not processing.
    Activated,
    /// Between `start_processing` and `stop_processing`.
    Processing,
    /// Deactivated; may be activated again.
    Deactivated,
    /// Destroyed; no further calls are valid.
    Destroyed,
}

/// A rejected lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleError {
    /// State the instance was in (and remains in).
    pub from: LifecycleState,
    /// State the caller tried to reach.
    pub to: LifecycleState,
}

impl core::fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "illegal lifecycle transition {:?} -> {:?}", self.from, self.to)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LifecycleError {}

/// Lifecycle tracker enforcing the legal transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// A freshly created instance.
    pub const fn new() -> Self {
        Self {
            state: LifecycleState::Created,
        }
    }

    /// Current state.
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether `process()` may be called.
    pub const fn can_process(&self) -> bool {
        matches!(self.state, LifecycleState::Processing)
    }

    /// Whether `flush()` may be called.
    pub const fn can_flush(&self) -> bool {
        matches!(
            self.state,
            LifecycleState::Initialized | LifecycleState::Activated | LifecycleState::Deactivated
        )
    }

    /// Whether the instance currently holds audio resources.
    pub const fn is_active(&self) -> bool {
        matches!(self.state, LifecycleState::Activated | LifecycleState::Processing)
    }

    /// `Created -> Initialized`.
    pub fn init(&mut self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::Initialized, matches!(self.state, LifecycleState::Created))
    }

    /// `Initialized | Deactivated -> Activated`.
    pub fn activate(&mut self) -> Result<(), LifecycleError> {
        let legal = matches!(self.state, LifecycleState::Initialized | LifecycleState::Deactivated);
        self.transition(LifecycleState::Activated, legal)
    }

    /// `Activated -> Processing`.
    pub fn start_processing(&mut self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::Processing, matches!(self.state, LifecycleState::Activated))
    }

    /// `Processing -> Activated`.
    pub fn stop_processing(&mut self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::Activated, matches!(self.state, LifecycleState::Processing))
    }

    /// `Activated | Processing -> Deactivated` (processing stops implicitly).
    pub fn deactivate(&mut self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::Deactivated, self.is_active())
    }

    /// `Created | Initialized | Deactivated -> Destroyed`.
    pub fn destroy(&mut self) -> Result<(), LifecycleError> {
        let legal = matches!(
            self.state,
            LifecycleState::Created | LifecycleState::Initialized | LifecycleState::Deactivated
        );
        self.transition(LifecycleState::Destroyed, legal)
    }

    fn transition(&mut self, to: LifecycleState, legal: bool) -> Result<(), LifecycleError> {
        if !legal {
            return Err(LifecycleError { from: self.state, to });
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("lifecycle: {:?} -> {:?}", self.state, to);
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processing() -> Lifecycle {
        let mut lc = Lifecycle::new();
        lc.init().unwrap();
        lc.activate().unwrap();
        lc.start_processing().unwrap();
        lc
    }

    #[test]
    fn full_cycle() {
        let mut lc = processing();
        assert!(lc.can_process());
        assert!(!lc.can_flush());
        lc.stop_processing().unwrap();
        assert!(lc.can_flush());
        lc.start_processing().unwrap();
        lc.deactivate().unwrap();
        assert_eq!(lc.state(), LifecycleState::Deactivated);
        lc.activate().unwrap();
        lc.deactivate().unwrap();
        lc.destroy().unwrap();
        assert_eq!(lc.state(), LifecycleState::Destroyed);
        assert!(!lc.can_flush());
    }

    #[test]
    fn illegal_transitions_leave_state_unchanged() {
        let mut lc = Lifecycle::new();
        assert_eq!(
            lc.activate(),
            Err(LifecycleError {
                from: LifecycleState::Created,
                to: LifecycleState::Activated
            })
        );
        assert!(lc.start_processing().is_err());
        assert_eq!(lc.state(), LifecycleState::Created);

        lc.init().unwrap();
        assert!(lc.init().is_err());
        assert!(lc.stop_processing().is_err());
        assert!(lc.deactivate().is_err());
        assert_eq!(lc.state(), LifecycleState::Initialized);

        let mut lc = processing();
        assert!(lc.destroy().is_err());
        assert!(lc.activate().is_err());
        assert_eq!(lc.state(), LifecycleState::Processing);
    }

    #[test]
    fn flush_only_outside_processing() {
        let mut lc = Lifecycle::new();
        assert!(!lc.can_flush());
        lc.init().unwrap();
        assert!(lc.can_flush());
        assert!(!lc.can_process());
    }
}
