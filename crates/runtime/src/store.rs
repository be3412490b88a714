//! Variable Store (spec.md §3, §4.1): four primitive lanes plus four
//! standard-FB lanes and one user-FB lane, each name-keyed. `get_*` never
//! errors - an unbound name reads as the type default, matching "unbound
//! reads are defined" PLC semantics. `set_*` creates the slot on first
//! write. `clear_all` resets every lane.

use crate::fb::{
    BistableInstance, BistableKind, CounterInstance, CounterKind, EdgeInstance, EdgeKind,
    TimerInstance, TimerKind, UserFbInstance,
};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    bools: HashMap<String, bool>,
    ints: HashMap<String, i64>,
    reals: HashMap<String, f64>,
    times: HashMap<String, i64>,
    timers: HashMap<String, TimerInstance>,
    counters: HashMap<String, CounterInstance>,
    edges: HashMap<String, EdgeInstance>,
    bistables: HashMap<String, BistableInstance>,
    user_fbs: HashMap<String, UserFbInstance>,
}

impl VariableStore {
    pub fn new() -> Self {
        VariableStore::default()
    }

    // --- Primitive lanes ---------------------------------------------

    pub fn get_bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    pub fn set_bool(&mut self, name: impl Into<String>, value: bool) {
        self.bools.insert(name.into(), value);
    }

    pub fn get_int(&self, name: &str) -> i64 {
        self.ints.get(name).copied().unwrap_or(0)
    }

    /// Int assignment floors non-integral values; callers pass an already
    /// floored `i64` (the evaluator does the flooring via
    /// `Value::floor_to_int`), this just stores it.
    pub fn set_int(&mut self, name: impl Into<String>, value: i64) {
        self.ints.insert(name.into(), value);
    }

    pub fn get_real(&self, name: &str) -> f64 {
        self.reals.get(name).copied().unwrap_or(0.0)
    }

    pub fn set_real(&mut self, name: impl Into<String>, value: f64) {
        self.reals.insert(name.into(), value);
    }

    pub fn get_time(&self, name: &str) -> i64 {
        self.times.get(name).copied().unwrap_or(0)
    }

    pub fn set_time(&mut self, name: impl Into<String>, value: i64) {
        self.times.insert(name.into(), value);
    }

    pub fn has_bool(&self, name: &str) -> bool {
        self.bools.contains_key(name)
    }

    pub fn has_int(&self, name: &str) -> bool {
        self.ints.contains_key(name)
    }

    pub fn has_real(&self, name: &str) -> bool {
        self.reals.contains_key(name)
    }

    pub fn has_time(&self, name: &str) -> bool {
        self.times.contains_key(name)
    }

    // --- Timers ---------------------------------------------------------

    pub fn init_timer(&mut self, name: impl Into<String>, pt: i64, kind: TimerKind) {
        self.timers.insert(name.into(), TimerInstance::new(kind, pt));
    }

    pub fn get_timer(&self, name: &str) -> Option<&TimerInstance> {
        self.timers.get(name)
    }

    pub fn set_timer_input(&mut self, name: &str, in_value: bool, pt: i64) {
        if let Some(t) = self.timers.get_mut(name) {
            t.on_call(in_value, pt);
        }
    }

    pub fn update_timer(&mut self, name: &str, scan_ms: i64) {
        if let Some(t) = self.timers.get_mut(name) {
            t.tick(scan_ms);
        }
    }

    pub fn tick_all_timers(&mut self, scan_ms: i64) -> usize {
        for t in self.timers.values_mut() {
            t.tick(scan_ms);
        }
        self.timers.len()
    }

    // --- Counters ---------------------------------------------------------

    pub fn init_counter(&mut self, name: impl Into<String>, pv: i32, kind: CounterKind) {
        self.counters.insert(name.into(), CounterInstance::new(kind, pv));
    }

    pub fn get_counter(&self, name: &str) -> Option<&CounterInstance> {
        self.counters.get(name)
    }

    pub fn pulse_counter(&mut self, name: &str, cu: bool, cd: bool, r: bool, ld: bool, pv: i32) {
        if let Some(c) = self.counters.get_mut(name) {
            c.on_call(cu, cd, r, ld, pv);
        }
    }

    // --- Edge detectors ---------------------------------------------------

    pub fn init_edge(&mut self, name: impl Into<String>, kind: EdgeKind) {
        self.edges.insert(name.into(), EdgeInstance::new(kind));
    }

    pub fn get_edge(&self, name: &str) -> Option<&EdgeInstance> {
        self.edges.get(name)
    }

    pub fn update_edge(&mut self, name: &str, clk: bool) {
        if let Some(e) = self.edges.get_mut(name) {
            e.on_call(clk);
        }
    }

    // --- Bistables --------------------------------------------------------

    pub fn init_bistable(&mut self, name: impl Into<String>, kind: BistableKind) {
        self.bistables.insert(name.into(), BistableInstance::new(kind));
    }

    pub fn get_bistable(&self, name: &str) -> Option<&BistableInstance> {
        self.bistables.get(name)
    }

    pub fn update_bistable(&mut self, name: &str, set: bool, reset: bool) {
        if let Some(b) = self.bistables.get_mut(name) {
            b.on_call(set, reset);
        }
    }

    // --- User-defined function blocks --------------------------------

    pub fn init_user_fb(&mut self, name: impl Into<String>, instance: UserFbInstance) {
        self.user_fbs.insert(name.into(), instance);
    }

    pub fn get_user_fb(&self, name: &str) -> Option<&UserFbInstance> {
        self.user_fbs.get(name)
    }

    pub fn get_user_fb_mut(&mut self, name: &str) -> Option<&mut UserFbInstance> {
        self.user_fbs.get_mut(name)
    }

    // --- Observability (ADDED ambient stack, see SPEC_FULL.md §6) ------

    pub fn bool_names(&self) -> impl Iterator<Item = &str> {
        self.bools.keys().map(String::as_str)
    }

    pub fn int_names(&self) -> impl Iterator<Item = &str> {
        self.ints.keys().map(String::as_str)
    }

    pub fn real_names(&self) -> impl Iterator<Item = &str> {
        self.reals.keys().map(String::as_str)
    }

    pub fn time_names(&self) -> impl Iterator<Item = &str> {
        self.times.keys().map(String::as_str)
    }

    pub fn user_fb_names(&self) -> impl Iterator<Item = &str> {
        self.user_fbs.keys().map(String::as_str)
    }

    /// Resets every lane - spec.md §3's "`clear_all` resets all lanes".
    pub fn clear_all(&mut self) {
        self.bools.clear();
        self.ints.clear();
        self.reals.clear();
        self.times.clear();
        self.timers.clear();
        self.counters.clear();
        self.edges.clear();
        self.bistables.clear();
        self.user_fbs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_read_returns_type_default() {
        let s = VariableStore::new();
        assert_eq!(s.get_bool("x"), false);
        assert_eq!(s.get_int("x"), 0);
        assert_eq!(s.get_real("x"), 0.0);
        assert_eq!(s.get_time("x"), 0);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut s = VariableStore::new();
        s.set_int("count", 42);
        assert_eq!(s.get_int("count"), 42);
        s.set_int("count", 42); // idempotent for the same (name, value)
        assert_eq!(s.get_int("count"), 42);
    }

    #[test]
    fn lanes_are_isolated_by_name_not_shared() {
        let mut s = VariableStore::new();
        s.set_bool("x", true);
        s.set_int("x", 7);
        assert!(s.get_bool("x"));
        assert_eq!(s.get_int("x"), 7);
    }

    #[test]
    fn clear_all_resets_every_lane() {
        let mut s = VariableStore::new();
        s.set_int("a", 1);
        s.set_bool("b", true);
        s.init_timer("t", 500, TimerKind::Ton);
        s.clear_all();
        assert_eq!(s.get_int("a"), 0);
        assert!(!s.get_bool("b"));
        assert!(s.get_timer("t").is_none());
    }
}
