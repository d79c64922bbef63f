//! Generic ability lifecycle shared by every ship ability.
//!
//! `Off → Activating → On → Passivating → Off`, with a continuous
//! `activation` ramp in [0, 1]. Entry into each transition is state-guarded,
//! so calling `activate` or `passivate` from the wrong phase is a no-op.
//! Transitions are reported as [`AbilityEvent`]s; the abilities system maps
//! them onto per-kind hooks after the machine has settled, which keeps each
//! hook to exactly one invocation per transition.

use hecs::Entity;

use vortex_core::constants::TICK_RATE;
use vortex_core::enums::{AbilityKind, AbilityPhase, TriggerMode};
use vortex_core::settings::AbilityTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityEvent {
    ActivateStart,
    ActivateEnd,
    PassivateStart,
    PassivateEnd,
    /// Regular tick while fully active.
    ActiveTick,
    /// Regular tick while fully passive.
    PassiveTick,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityMachine {
    phase: AbilityPhase,
    activation: f64,
    /// Per-tick ramp increment; infinite for instantaneous transitions.
    activation_step: f64,
    passivation_step: f64,
    activation_cost: f64,
    drain_per_tick: f64,
    margin_ticks: f64,
    trigger: TriggerMode,
    wants_active: bool,
    held: bool,
}

impl AbilityMachine {
    pub fn new(tuning: &AbilityTuning, margin_ticks: f64) -> Self {
        Self {
            phase: AbilityPhase::Off,
            activation: 0.0,
            activation_step: ramp_step(tuning.activation_secs),
            passivation_step: ramp_step(tuning.passivation_secs),
            activation_cost: tuning.activation_cost,
            drain_per_tick: tuning.drain_per_tick,
            margin_ticks,
            trigger: tuning.trigger,
            wants_active: false,
            held: false,
        }
    }

    pub fn phase(&self) -> AbilityPhase {
        self.phase
    }

    pub fn activation(&self) -> f64 {
        self.activation
    }

    /// Any phase other than `Off`.
    pub fn is_engaged(&self) -> bool {
        self.phase != AbilityPhase::Off
    }

    pub fn wants_active(&self) -> bool {
        self.wants_active
    }

    /// Energy needed to start: the activation cost plus a drain margin.
    pub fn activation_threshold(&self) -> f64 {
        self.activation_cost + self.margin_ticks * self.drain_per_tick
    }

    pub fn can_activate(&self, energy: f64) -> bool {
        self.phase == AbilityPhase::Off && energy >= self.activation_threshold()
    }

    /// Feed this tick's raw button state through the trigger discipline.
    pub fn set_button(&mut self, pressed: bool) {
        match self.trigger {
            TriggerMode::OnHold => self.wants_active = pressed,
            TriggerMode::PressToggle => {
                if pressed && !self.held {
                    self.wants_active = !self.wants_active;
                }
            }
        }
        self.held = pressed;
    }

    /// Set the intent directly (AI-driven ships).
    pub fn request(&mut self, active: bool) {
        self.wants_active = active;
    }

    /// Off → Activating. Deducts the activation cost once.
    pub fn activate(&mut self, energy: &mut f64, events: &mut Vec<AbilityEvent>) -> bool {
        if !self.can_activate(*energy) {
            return false;
        }
        *energy -= self.activation_cost;
        self.phase = AbilityPhase::Activating;
        events.push(AbilityEvent::ActivateStart);
        if self.activation_step.is_infinite() {
            self.finish_activation(events);
        }
        true
    }

    /// On → Passivating.
    pub fn passivate(&mut self, events: &mut Vec<AbilityEvent>) -> bool {
        if self.phase != AbilityPhase::On {
            return false;
        }
        self.phase = AbilityPhase::Passivating;
        events.push(AbilityEvent::PassivateStart);
        if self.passivation_step.is_infinite() {
            self.finish_passivation(events);
        }
        true
    }

    /// Advance one tick. `time_scale` is the owner's gravitational potential,
    /// so ramps slow down near strong fields.
    pub fn tick(&mut self, energy: &mut f64, time_scale: f64, events: &mut Vec<AbilityEvent>) {
        // A release during Activating is latched in the intent and applied
        // once On is reached.
        match (self.wants_active, self.phase) {
            (true, AbilityPhase::Off) => {
                if !self.activate(energy, events) && self.trigger == TriggerMode::PressToggle {
                    self.wants_active = false;
                }
            }
            (false, AbilityPhase::On) => {
                self.passivate(events);
            }
            _ => {}
        }

        match self.phase {
            AbilityPhase::Activating => {
                self.activation = (self.activation + self.activation_step * time_scale).min(1.0);
                if self.activation >= 1.0 - RAMP_EPSILON {
                    self.finish_activation(events);
                }
            }
            AbilityPhase::Passivating => {
                self.activation = (self.activation - self.passivation_step * time_scale).max(0.0);
                if self.activation <= RAMP_EPSILON {
                    self.finish_passivation(events);
                }
            }
            AbilityPhase::On => {
                events.push(AbilityEvent::ActiveTick);
                *energy -= self.drain_per_tick * time_scale;
                if *energy <= 0.0 {
                    *energy = 0.0;
                    self.wants_active = false;
                    self.passivate(events);
                }
            }
            AbilityPhase::Off => events.push(AbilityEvent::PassiveTick),
        }
    }

    /// Drop straight to Off without hooks (owner respawn, stop).
    pub fn reset(&mut self) {
        self.phase = AbilityPhase::Off;
        self.activation = 0.0;
        self.wants_active = false;
        self.held = false;
    }

    fn finish_activation(&mut self, events: &mut Vec<AbilityEvent>) {
        self.activation = 1.0;
        self.phase = AbilityPhase::On;
        events.push(AbilityEvent::ActivateEnd);
    }

    fn finish_passivation(&mut self, events: &mut Vec<AbilityEvent>) {
        self.activation = 0.0;
        self.phase = AbilityPhase::Off;
        events.push(AbilityEvent::PassivateEnd);
    }
}

/// Absorbs float drift from summing per-tick steps.
const RAMP_EPSILON: f64 = 1e-9;

fn ramp_step(duration_secs: f64) -> f64 {
    if duration_secs <= 0.0 {
        f64::INFINITY
    } else {
        1.0 / (duration_secs * TICK_RATE as f64)
    }
}

/// The single ability carried by a ship, with handles to the helper
/// entities its hooks spawned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ability {
    pub kind: AbilityKind,
    pub machine: AbilityMachine,
    /// Visual helper (bubble, shimmer, aura, halo).
    pub effect: Option<Entity>,
    /// Disruptor field while one is projected.
    pub field: Option<Entity>,
}

impl Ability {
    pub fn new(kind: AbilityKind, tuning: &AbilityTuning, margin_ticks: f64) -> Self {
        Self {
            kind,
            machine: AbilityMachine::new(tuning, margin_ticks),
            effect: None,
            field: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning(activation_secs: f64, passivation_secs: f64, trigger: TriggerMode) -> AbilityTuning {
        AbilityTuning {
            activation_secs,
            passivation_secs,
            activation_cost: 10.0,
            drain_per_tick: 1.0,
            trigger,
        }
    }

    #[test]
    fn activation_needs_margin() {
        let mut m = AbilityMachine::new(&tuning(0.1, 0.1, TriggerMode::OnHold), 5.0);
        let mut events = Vec::new();
        let mut energy = 14.9;
        assert!(!m.activate(&mut energy, &mut events));
        assert_eq!(energy, 14.9);
        let mut energy = 15.0;
        assert!(m.activate(&mut energy, &mut events));
        assert_eq!(energy, 5.0);
        assert_eq!(events, vec![AbilityEvent::ActivateStart]);
        assert_eq!(m.phase(), AbilityPhase::Activating);
    }

    #[test]
    fn ramp_takes_configured_ticks() {
        // 0.1 s at 60 Hz = 6 ticks.
        let mut m = AbilityMachine::new(&tuning(0.1, 0.05, TriggerMode::OnHold), 0.0);
        let mut energy = 100.0;
        let mut events = Vec::new();
        m.set_button(true);
        for _ in 0..5 {
            m.tick(&mut energy, 1.0, &mut events);
            assert_eq!(m.phase(), AbilityPhase::Activating);
        }
        m.tick(&mut energy, 1.0, &mut events);
        assert_eq!(m.phase(), AbilityPhase::On);
        assert_eq!(m.activation(), 1.0);
    }

    #[test]
    fn zero_duration_is_instant() {
        let mut m = AbilityMachine::new(&tuning(0.0, 0.0, TriggerMode::OnHold), 0.0);
        let mut energy = 100.0;
        let mut events = Vec::new();
        m.set_button(true);
        m.tick(&mut energy, 1.0, &mut events);
        assert_eq!(m.phase(), AbilityPhase::On);
        assert_eq!(
            events,
            vec![
                AbilityEvent::ActivateStart,
                AbilityEvent::ActivateEnd,
                AbilityEvent::ActiveTick
            ]
        );
        events.clear();
        m.set_button(false);
        m.tick(&mut energy, 1.0, &mut events);
        assert_eq!(m.phase(), AbilityPhase::Off);
        assert_eq!(
            events,
            vec![
                AbilityEvent::PassivateStart,
                AbilityEvent::PassivateEnd,
                AbilityEvent::PassiveTick
            ]
        );
    }

    #[test]
    fn release_during_activation_is_latched() {
        let mut m = AbilityMachine::new(&tuning(0.1, 0.1, TriggerMode::OnHold), 0.0);
        let mut energy = 100.0;
        let mut events = Vec::new();
        m.set_button(true);
        m.tick(&mut energy, 1.0, &mut events);
        m.set_button(false);
        // Still ramping; passivate is a no-op from Activating.
        assert!(!m.passivate(&mut events));
        for _ in 0..6 {
            m.tick(&mut energy, 1.0, &mut events);
        }
        assert!(matches!(m.phase(), AbilityPhase::Passivating | AbilityPhase::Off));
    }

    #[test]
    fn press_toggle_ignores_release() {
        let mut m = AbilityMachine::new(&tuning(0.0, 0.0, TriggerMode::PressToggle), 0.0);
        let mut energy = 100.0;
        let mut events = Vec::new();
        m.set_button(true);
        m.tick(&mut energy, 1.0, &mut events);
        m.set_button(false);
        m.tick(&mut energy, 1.0, &mut events);
        assert_eq!(m.phase(), AbilityPhase::On);
        m.set_button(true);
        m.tick(&mut energy, 1.0, &mut events);
        assert_eq!(m.phase(), AbilityPhase::Off);
    }

    #[test]
    fn empty_energy_forces_passivation() {
        let mut m = AbilityMachine::new(&tuning(0.0, 0.1, TriggerMode::OnHold), 0.0);
        let mut energy = 13.0;
        let mut events = Vec::new();
        m.set_button(true);
        for _ in 0..3 {
            m.tick(&mut energy, 1.0, &mut events);
        }
        assert_eq!(energy, 0.0);
        assert_eq!(m.phase(), AbilityPhase::Passivating);
        assert!(!m.wants_active());
    }

    #[test]
    fn potential_slows_the_ramp() {
        let mut slow = AbilityMachine::new(&tuning(0.1, 0.1, TriggerMode::OnHold), 0.0);
        let mut fast = slow;
        let (mut e1, mut e2) = (100.0, 100.0);
        let mut events = Vec::new();
        slow.set_button(true);
        fast.set_button(true);
        slow.tick(&mut e1, 0.5, &mut events);
        fast.tick(&mut e2, 1.0, &mut events);
        assert!(slow.activation() < fast.activation());
    }
}
