//! R_TRIG / F_TRIG - spec.md §4.5. `Q` pulses TRUE for exactly one call on
//! the requested transition of `CLK`; `M` is the previous-CLK mirror spec.md
//! names explicitly.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Rising,
    Falling,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeInstance {
    pub kind: EdgeKind,
    pub q: bool,
    pub m: bool,
}

impl EdgeInstance {
    pub fn new(kind: EdgeKind) -> Self {
        EdgeInstance {
            kind,
            q: false,
            m: false,
        }
    }

    pub fn on_call(&mut self, clk: bool) {
        self.q = match self.kind {
            EdgeKind::Rising => !self.m && clk,
            EdgeKind::Falling => self.m && !clk,
        };
        self.m = clk;
    }
}
