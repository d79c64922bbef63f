//! Ability system: steps every ship's ability machine and dispatches the
//! transitions it reports to that ability kind's hooks.
//!
//! Hooks run after the machine has settled for the tick, once per reported
//! transition, so a hook can never re-enter the machine.

use hecs::Entity;

use vortex_core::components::{Body, Engine, KineticShield, Ship, Visual};
use vortex_core::enums::{AbilityKind, EntityKind, VisualEffect};

use crate::ability::{Ability, AbilityEvent};
use crate::context::SimContext;
use crate::spawn;

type Hook = fn(&mut SimContext, Entity, &mut Ability);

/// Per-kind transition hooks.
struct Hooks {
    activate_start: Hook,
    activate_end: Hook,
    passivate_start: Hook,
    passivate_end: Hook,
    /// Regular tick in either steady state.
    steady: Hook,
}

static SHIELD: Hooks = Hooks {
    activate_start: |ctx, e, a| show(ctx, e, a, VisualEffect::ShieldBubble),
    activate_end: noop,
    passivate_start: noop,
    passivate_end: hide,
    steady: sync_effect,
};

static HYPERSPACE: Hooks = Hooks {
    activate_start: |ctx, e, a| {
        ctx.store.update::<Body, _>(e, |b| b.hyperspace = true);
        show(ctx, e, a, VisualEffect::HyperspaceShimmer);
    },
    activate_end: |ctx, e, _| {
        let mobility = ctx.settings.abilities.hyperspace_mobility;
        ctx.store.update::<Engine, _>(e, |en| en.mobility = mobility);
    },
    passivate_start: |ctx, e, _| {
        ctx.store.update::<Engine, _>(e, |en| en.mobility = 1.0);
    },
    passivate_end: |ctx, e, a| {
        ctx.store.update::<Body, _>(e, |b| b.hyperspace = false);
        hide(ctx, e, a);
    },
    steady: sync_effect,
};

static DISRUPTOR: Hooks = Hooks {
    activate_start: |ctx, e, a| show(ctx, e, a, VisualEffect::DisruptorAura),
    activate_end: |ctx, e, a| {
        if a.field.is_none() {
            a.field = spawn::disruptor_field(ctx, e);
        }
    },
    passivate_start: |ctx, _, a| {
        if let Some(field) = a.field.take() {
            ctx.store.kill(field);
        }
    },
    passivate_end: hide,
    steady: sync_effect,
};

static KINETIC_BOOST: Hooks = Hooks {
    activate_start: |ctx, e, a| show(ctx, e, a, VisualEffect::KineticHalo),
    activate_end: |ctx, e, _| {
        ctx.store.update::<KineticShield, _>(e, |ks| ks.large = true);
    },
    passivate_start: |ctx, e, _| {
        ctx.store.update::<KineticShield, _>(e, |ks| ks.large = false);
    },
    passivate_end: hide,
    steady: sync_effect,
};

fn hooks(kind: AbilityKind) -> &'static Hooks {
    match kind {
        AbilityKind::Shield => &SHIELD,
        AbilityKind::Hyperspace => &HYPERSPACE,
        AbilityKind::Disruptor => &DISRUPTOR,
        AbilityKind::KineticBoost => &KINETIC_BOOST,
    }
}

fn noop(_: &mut SimContext, _: Entity, _: &mut Ability) {}

fn show(ctx: &mut SimContext, e: Entity, a: &mut Ability, effect: VisualEffect) {
    if a.effect.is_none() {
        a.effect = spawn::effect(ctx, e, effect);
    }
    sync_effect(ctx, e, a);
}

fn hide(ctx: &mut SimContext, _: Entity, a: &mut Ability) {
    if let Some(effect) = a.effect.take() {
        ctx.store.kill(effect);
    }
}

/// Helper visuals scale with activation.
fn sync_effect(ctx: &mut SimContext, _: Entity, a: &mut Ability) {
    if let Some(effect) = a.effect {
        let scale = a.machine.activation();
        ctx.store.update::<Visual, _>(effect, |v| v.scale = scale);
    }
}

pub fn run(ctx: &mut SimContext) {
    for kind in [EntityKind::Rocket, EntityKind::Ufo] {
        let ships: Vec<Entity> = ctx.store.live(kind).to_vec();
        for e in ships {
            step(ctx, e);
        }
    }
}

fn step(ctx: &mut SimContext, e: Entity) {
    let Some(body) = ctx.store.get::<Body>(e) else {
        return;
    };
    if body.dead {
        return;
    }
    let (Some(mut ability), Some(mut ship)) = (ctx.store.get::<Ability>(e), ctx.store.get::<Ship>(e))
    else {
        return;
    };

    let mut events = std::mem::take(&mut ctx.ability_events);
    events.clear();
    ability.machine.tick(&mut ship.energy, body.potential, &mut events);
    ctx.store.set(e, ship);

    let hooks = hooks(ability.kind);
    for event in &events {
        let hook = match event {
            AbilityEvent::ActivateStart => hooks.activate_start,
            AbilityEvent::ActivateEnd => hooks.activate_end,
            AbilityEvent::PassivateStart => hooks.passivate_start,
            AbilityEvent::PassivateEnd => hooks.passivate_end,
            AbilityEvent::ActiveTick | AbilityEvent::PassiveTick => hooks.steady,
        };
        hook(ctx, e, &mut ability);
    }
    // Ramps report no steady tick; keep the helper in step with them.
    sync_effect(ctx, e, &mut ability);

    ctx.store.set(e, ability);
    ctx.ability_events = events;
}
