//! TON (on-delay), TOF (off-delay), TP (pulse) - spec.md §4.5.
//!
//! Each timer reacts to its `IN` edge at FB-call time and advances `ET` at
//! scan-tick time; the two-phase split is what gives "advancing simulated
//! time happens exactly once per scan" (spec.md §4.6).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Ton,
    Tof,
    Tp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerInstance {
    pub kind: TimerKind,
    pub pt: i64,
    pub et: i64,
    pub q: bool,
    pub running: bool,
    /// `IN` as of the most recent FB call this scan; read again at tick
    /// time by TON's delayed-Q-clear rule.
    pub in_state: bool,
    /// `in_state` as it stood at the *previous* tick, i.e. before this
    /// scan's `on_call` could have changed it. TON's Q-clear needs this to
    /// tell "IN just fell this scan" (don't clear yet) from "IN has been
    /// FALSE since before this scan" (clear now) - `in_state` alone can't
    /// make that distinction since `on_call` already overwrote it.
    prev_in_at_tick: bool,
}

impl TimerInstance {
    pub fn new(kind: TimerKind, pt: i64) -> Self {
        TimerInstance {
            kind,
            pt: pt.max(0),
            et: 0,
            q: false,
            running: false,
            in_state: false,
            prev_in_at_tick: false,
        }
    }

    /// Called when the FB is invoked this scan with a (possibly new) `IN`
    /// and `PT`. Handles the edge-triggered part of the semantics; `ET`
    /// advancement is [`Self::tick`]'s job.
    pub fn on_call(&mut self, in_value: bool, pt: i64) {
        self.pt = pt.max(0);
        let rising = !self.in_state && in_value;
        let falling = self.in_state && !in_value;
        self.in_state = in_value;

        match self.kind {
            TimerKind::Ton => {
                if rising {
                    if self.pt <= 0 {
                        self.q = true;
                        self.running = false;
                    } else {
                        self.q = false;
                        self.et = 0;
                        self.running = true;
                    }
                } else if falling {
                    self.running = false;
                    self.et = 0;
                }
            }
            TimerKind::Tof => {
                if rising {
                    self.q = true;
                    self.et = 0;
                    self.running = false;
                } else if falling {
                    self.et = 0;
                    self.running = true;
                }
            }
            TimerKind::Tp => {
                if rising && !self.q {
                    self.q = true;
                    self.et = 0;
                    self.running = true;
                }
                // Re-trigger while Q is already TRUE has no effect.
            }
        }
    }

    /// Called once per scan by the orchestrator, after every FB call this
    /// scan has run.
    pub fn tick(&mut self, scan_ms: i64) {
        if self.running {
            self.et = (self.et + scan_ms).min(self.pt);
            if self.et >= self.pt {
                match self.kind {
                    TimerKind::Ton => {
                        self.q = true;
                        self.running = false;
                    }
                    TimerKind::Tof => {
                        self.q = false;
                        self.running = false;
                    }
                    TimerKind::Tp => {
                        self.q = false;
                        self.running = false;
                    }
                }
            }
        }
        if self.kind == TimerKind::Ton
            && !self.running
            && !self.in_state
            && !self.prev_in_at_tick
            && self.q
        {
            // Post-falling-edge latency: IN must have already been FALSE at
            // the previous tick, not just since this scan's on_call - the
            // falling-edge scan itself leaves Q alone, the scan after clears
            // it.
            self.q = false;
        }
        self.prev_in_at_tick = self.in_state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ton_accumulates_et_and_sets_q_at_pt() {
        let mut t = TimerInstance::new(TimerKind::Ton, 500);
        t.on_call(true, 500);
        for expected in [100, 200, 300, 400, 500] {
            t.tick(100);
            assert_eq!(t.et, expected);
        }
        assert!(t.q);
    }

    #[test]
    fn ton_zero_pt_fires_immediately() {
        let mut t = TimerInstance::new(TimerKind::Ton, 0);
        t.on_call(true, 0);
        assert!(t.q);
        assert!(!t.running);
    }

    #[test]
    fn ton_q_clears_one_scan_after_falling_edge() {
        let mut t = TimerInstance::new(TimerKind::Ton, 0);
        t.on_call(true, 0);
        t.tick(100);
        assert!(t.q);

        // Falling-edge scan: Q must still read TRUE to observers this scan.
        t.on_call(false, 0);
        t.tick(100);
        assert!(t.q);

        // Next scan with IN steady FALSE: Q finally clears.
        t.on_call(false, 0);
        t.tick(100);
        assert!(!t.q);
    }

    #[test]
    fn tp_ignores_retrigger_while_q_true() {
        let mut t = TimerInstance::new(TimerKind::Tp, 500);
        t.on_call(true, 500);
        t.tick(100);
        let et_before = t.et;
        t.on_call(false, 500);
        t.on_call(true, 500); // retrigger while Q still true
        assert_eq!(t.et, et_before);
    }

    #[test]
    fn tof_q_true_immediately_then_false_after_pt() {
        let mut t = TimerInstance::new(TimerKind::Tof, 200);
        t.on_call(true, 200);
        assert!(t.q);
        t.on_call(false, 200);
        t.tick(100);
        assert!(t.q);
        t.tick(100);
        assert!(!t.q);
    }
}
