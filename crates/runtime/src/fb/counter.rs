//! CTU, CTD, CTUD - spec.md §4.5. Counters have no tick-time component;
//! everything happens at FB-call time since there is no elapsed time
//! involved, only edges.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Ctu,
    Ctd,
    Ctud,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterInstance {
    pub kind: CounterKind,
    pub pv: i32,
    pub cv: i32,
    pub qu: bool,
    pub qd: bool,
    cu_prev: bool,
    cd_prev: bool,
}

impl CounterInstance {
    pub fn new(kind: CounterKind, pv: i32) -> Self {
        CounterInstance {
            kind,
            pv,
            cv: 0,
            qu: false,
            qd: false,
            cu_prev: false,
            cd_prev: false,
        }
    }

    /// `cu`/`cd`/`r`/`ld` map straight onto the CTU/CTD/CTUD argument names
    /// (spec.md §3); a kind that doesn't use one of them just ignores it.
    pub fn on_call(&mut self, cu: bool, cd: bool, r: bool, ld: bool, pv: i32) {
        self.pv = pv;
        let cu_rising = !self.cu_prev && cu;
        let cd_rising = !self.cd_prev && cd;
        self.cu_prev = cu;
        self.cd_prev = cd;

        match self.kind {
            CounterKind::Ctu => {
                if r {
                    self.cv = 0;
                } else if cu_rising && self.cv < self.pv {
                    self.cv = self.cv.saturating_add(1);
                }
                self.qu = self.cv >= self.pv;
            }
            CounterKind::Ctd => {
                if ld {
                    self.cv = self.pv;
                } else if cd_rising {
                    self.cv = (self.cv - 1).max(0);
                }
                self.qd = self.cv <= 0;
            }
            CounterKind::Ctud => {
                if r {
                    self.cv = 0;
                } else if ld {
                    self.cv = self.pv;
                } else if cu_rising && cd_rising {
                    // Simultaneous rising edges: no net change (spec.md §9
                    // open question, resolved in DESIGN.md).
                } else if cu_rising && self.cv < self.pv {
                    self.cv = self.cv.saturating_add(1);
                } else if cd_rising {
                    self.cv = (self.cv - 1).max(0);
                }
                self.qu = self.cv >= self.pv;
                self.qd = self.cv <= 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctu_counts_rising_edges_and_raises_qu_at_pv() {
        let mut c = CounterInstance::new(CounterKind::Ctu, 3);
        let pulses = [true, false, true, false, true, false, true, false];
        let mut observed = Vec::new();
        for p in pulses {
            c.on_call(p, false, false, false, 3);
            if p {
                observed.push(c.cv);
            }
        }
        assert_eq!(observed, vec![1, 2, 3, 3]);
        assert!(c.qu);
    }

    #[test]
    fn ctd_floors_at_zero() {
        let mut c = CounterInstance::new(CounterKind::Ctd, 2);
        c.on_call(false, false, false, true, 2); // LD
        assert_eq!(c.cv, 2);
        c.on_call(false, true, false, false, 2);
        c.on_call(false, false, false, false, 2);
        c.on_call(false, true, false, false, 2);
        assert_eq!(c.cv, 0);
        c.on_call(false, true, false, false, 2);
        assert_eq!(c.cv, 0);
        assert!(c.qd);
    }

    #[test]
    fn ctud_simultaneous_edges_cancel() {
        let mut c = CounterInstance::new(CounterKind::Ctud, 5);
        c.on_call(true, false, false, false, 5);
        assert_eq!(c.cv, 1);
        c.on_call(false, false, false, false, 5);
        c.on_call(true, true, false, false, 5);
        assert_eq!(c.cv, 1);
    }

    #[test]
    fn ctud_reset_dominant_over_load() {
        let mut c = CounterInstance::new(CounterKind::Ctud, 5);
        c.on_call(true, false, false, false, 5);
        c.on_call(false, false, true, true, 5);
        assert_eq!(c.cv, 0);
    }
}
