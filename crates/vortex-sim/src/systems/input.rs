//! Player input system: maps each slot's input snapshot onto its rocket.

use vortex_core::components::{Engine, Gun, Motion};
use vortex_core::settings::RocketSettings;

use crate::ability::Ability;
use crate::context::SimContext;

pub fn run(ctx: &mut SimContext) {
    let tick = ctx.tick();
    for player in 0..ctx.players.len() {
        let slot = &ctx.players[player];
        let (input, prev) = (slot.input, slot.prev_input);
        let Some(rocket) = slot.rocket else {
            ctx.players[player].prev_input = input;
            continue;
        };
        if ctx.store.is_dead(rocket) {
            ctx.players[player].prev_input = input;
            continue;
        }

        let turn = input.turn_sign()
            * input
                .turn_pressed_at()
                .map_or(0.0, |at| turn_rate(&ctx.settings.rocket, tick.saturating_sub(at)));
        ctx.store.update::<Motion, _>(rocket, |m| m.turn = turn);
        ctx.store.update::<Engine, _>(rocket, |e| e.on = input.thrust);
        ctx.store.update::<Gun, _>(rocket, |g| {
            g.trigger = input.fire;
            if input.fire_once && !prev.fire_once {
                g.fire_once = true;
            }
        });
        ctx.store
            .update::<Ability, _>(rocket, |a| a.machine.set_button(input.ability));

        ctx.players[player].prev_input = input;
    }
}

/// Rotation speed ramps linearly from min to max while a key stays held.
pub fn turn_rate(s: &RocketSettings, held_ticks: u64) -> f64 {
    if s.turn_ramp_ticks == 0 {
        return s.turn_rate_max;
    }
    let t = (held_ticks as f64 / s.turn_ramp_ticks as f64).min(1.0);
    s.turn_rate_min + (s.turn_rate_max - s.turn_rate_min) * t
}
