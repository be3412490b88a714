//! Runtime configuration: the embedder-programmatic replacement for the
//! file/CLI config the non-goals exclude. Built once, handed to the
//! orchestrator and the initializer, never mutated mid-scan.

/// Which standard function-block kinds the initializer is willing to
/// instantiate. All enabled by default; an embedder that wants to catch a
/// program leaning on a kind it doesn't support yet can disable it and read
/// the resulting `InitWarning`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnabledFbs {
    pub timers: bool,
    pub counters: bool,
    pub edges: bool,
    pub bistables: bool,
    pub user_fbs: bool,
}

impl Default for EnabledFbs {
    fn default() -> Self {
        EnabledFbs {
            timers: true,
            counters: true,
            edges: true,
            bistables: true,
            user_fbs: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Simulated duration one scan represents, added to running timers'
    /// `ET` once per scan (spec.md §4.6).
    pub scan_time_ms: i64,
    /// WHILE/REPEAT iterations per loop entry before the executor silently
    /// terminates the loop (spec.md §4.4, §8).
    pub loop_safety_cap: u32,
    pub enabled_fbs: EnabledFbs,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            scan_time_ms: 100,
            loop_safety_cap: 10_000,
            enabled_fbs: EnabledFbs::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn with_scan_time_ms(mut self, scan_time_ms: i64) -> Self {
        self.scan_time_ms = scan_time_ms;
        self
    }

    pub fn with_loop_safety_cap(mut self, cap: u32) -> Self {
        self.loop_safety_cap = cap;
        self
    }
}
