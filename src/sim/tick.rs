//! Fixed timestep simulation tick
//!
//! One `tick` advances the whole field: player first, then projectiles and
//! hazards, segment stepping after every other entity, and the wave director
//! last. Entity lists are never mutated while iterated; kills and spawns are
//! collected and applied between passes.

use glam::Vec2;
use rand::Rng;

use super::collision::{
    bullet_hits, flower_clears_mine, flower_pickup, lethal_contact, mine_kills,
};
use super::segment::SegmentId;
use super::state::{Bullet, Chaser, Explosion, GamePhase, GameState, Mine};
use crate::audio::{AnnouncerLine, SoundEffect, DEATH_LINES, WAVE_CLEAR_LINES};
use crate::consts::*;
use crate::clamp_to_field;

/// Input commands for a single tick, polled once per frame by the shell
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement axes, each in [-1, 1]
    pub movement: Vec2,
    /// Hold to fire on the fire timer
    pub fire_zapper: bool,
    /// Respawn after a death (one-shot)
    pub respawn: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::GameOver => return,
        GamePhase::AwaitRespawn => {
            if input.respawn {
                state.player.spawn();
                state.phase = GamePhase::Playing;
                log::info!("player respawned, {} lives left", state.lives);
            }
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;
    let alive = state.player.alive;

    if alive {
        update_player(state, input, dt);
    }

    update_cosmetics(state, dt);

    // Chasers move (and shed last frame's flash) before bullets test them
    let mut player_killed = false;
    update_chasers(state, dt, &mut player_killed);
    update_bullets(state, dt);
    update_mines(state, dt, &mut player_killed);
    update_flowers(state, dt);

    if alive {
        update_zap(state, dt);
    }

    // Segments step on their own cadence, after everything else has moved
    state.segment_step_timer += dt;
    let interval = state.segment_step_interval();
    while state.segment_step_timer >= interval {
        state.segment_step_timer -= interval;
        let (half_width, height) = (state.half_width, state.height);
        let GameState { segments, rng, .. } = state;
        let bounces = segments.step(rng, half_width, height);
        if bounces > 0 {
            state.play_sound(SoundEffect::Bounce, 0.5, 1.0, false);
        }
    }
    if state.player.alive {
        let player_pos = state.player.pos;
        if state
            .segments
            .iter()
            .any(|(_, seg)| lethal_contact(seg.pos, player_pos))
        {
            player_killed = true;
        }
    }

    if player_killed {
        kill_player(state);
    }

    // End-of-frame reconciliation: wave clear, then camera
    if state.player.alive && state.segments.is_empty() {
        advance_wave(state);
    }

    let to_player = state.player.pos - state.camera;
    state.camera += to_player * (CAMERA_FOLLOW_RATE * dt).min(1.0);
}

/// Movement, buff timers and firing
fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let player = &mut state.player;
    let accel = PLAYER_ACCEL * dt;
    let axes = input.movement.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));

    player.vel.x = accelerate_axis(player.vel.x, axes.x, accel);
    player.vel.y = accelerate_axis(player.vel.y, axes.y, accel);
    player.pos += player.vel * dt;
    player.pos = clamp_to_field(player.pos, state.half_width, state.height);

    player.flower_power = (player.flower_power - dt).max(0.0);
    if player.combo_timer > 0.0 {
        player.combo_timer -= dt;
        if player.combo_timer <= 0.0 {
            player.combo = 0;
        }
    }

    let interval = player.fire_interval();
    player.fire_timer = (player.fire_timer + dt).min(interval);
    if input.fire_zapper && player.fire_timer >= interval {
        player.fire_timer = 0.0;
        let empowered = player.empowered();
        let pos = player.pos;
        state.bullets.push(Bullet::new(pos, empowered));
        let pitch = 0.9 + state.rng.random::<f32>() * 0.2;
        state.play_sound(SoundEffect::Bullet, 0.8, pitch, false);
    }
}

/// Accelerate toward the input axis, decay toward zero without one
fn accelerate_axis(vel: f32, axis: f32, accel: f32) -> f32 {
    let next = if axis != 0.0 {
        vel + axis * accel
    } else if vel > accel {
        vel - accel
    } else if vel < -accel {
        vel + accel
    } else {
        0.0
    };
    next.clamp(-PLAYER_MAX_SPEED, PLAYER_MAX_SPEED)
}

/// Explosions and score popups age out on their own
fn update_cosmetics(state: &mut GameState, dt: f32) {
    for explosion in &mut state.explosions {
        explosion.age += dt;
    }
    state.explosions.retain(|e| !e.expired());

    for popup in &mut state.popups {
        popup.age += dt;
        popup.pos.y += 2.0 * dt;
    }
    state.popups.retain(|p| !p.expired());
}

fn update_bullets(state: &mut GameState, dt: f32) {
    // Indices of bullets that hit something this frame
    let mut spent: Vec<usize> = Vec::new();
    let mut seg_kills: Vec<SegmentId> = Vec::new();
    let mut chaser_hits: Vec<usize> = Vec::new();

    for (b, bullet) in state.bullets.iter_mut().enumerate() {
        bullet.pos.y += bullet.speed * dt;
        let full = bullet.full_scale();
        if bullet.scale < full {
            bullet.scale = (bullet.scale + 1.2 * dt).min(full);
        }
        if bullet.pos.y > BULLET_EXIT_Y {
            spent.push(b);
            continue;
        }

        let hit_segment = state
            .segments
            .iter()
            .find(|(id, seg)| bullet_hits(bullet.pos, seg.pos) && !seg_kills.contains(id))
            .map(|(id, _)| id);
        if let Some(id) = hit_segment {
            seg_kills.push(id);
            spent.push(b);
            continue;
        }

        if let Some(c) = state
            .chasers
            .iter()
            .position(|chaser| bullet_hits(bullet.pos, chaser.pos))
        {
            chaser_hits.push(c);
            spent.push(b);
        }
    }

    for id in seg_kills {
        let Some((pos, was_head)) = state
            .segments
            .get(id)
            .map(|seg| (seg.pos, seg.following.is_none()))
        else {
            continue;
        };
        if destroy_segment(state, id, false) {
            score_segment_kill(state, pos, was_head);
        }
    }
    for c in chaser_hits {
        if let Some(chaser) = state.chasers.get_mut(c) {
            chaser.flash = true;
        }
    }
    for b in spent.into_iter().rev() {
        state.bullets.swap_remove(b);
    }
}

fn update_mines(state: &mut GameState, dt: f32, player_killed: &mut bool) {
    let player_pos = state.player.pos;
    let player_alive = state.player.alive;
    let mut armed_now = false;

    for mine in &mut state.mines {
        mine.age += dt;
        if mine.age > MINE_ARM_SECS && !mine.blown {
            mine.blown = true;
            armed_now = true;
        }
        if mine.blown {
            mine.cross_scale += MINE_CROSS_GROWTH * dt;
        }
        if player_alive && mine_kills(mine.pos, mine.cross_scale, mine.armed(), player_pos) {
            *player_killed = true;
        }
    }
    state.mines.retain(|m| m.age <= MINE_LIFETIME_SECS);

    if armed_now {
        state.play_sound(SoundEffect::Lines, 0.6, 1.0, false);
    }
}

fn update_chasers(state: &mut GameState, dt: f32, player_killed: &mut bool) {
    let player_pos = state.player.pos;
    let player_alive = state.player.alive;

    for chaser in &mut state.chasers {
        chaser.flash = false;
        if player_alive {
            let to_player = player_pos - chaser.pos;
            if to_player.length_squared() > 0.0 {
                chaser.pos += to_player.normalize() * chaser.speed * dt;
            }
            if lethal_contact(chaser.pos, player_pos) {
                *player_killed = true;
            }
        }
    }
}

fn update_flowers(state: &mut GameState, dt: f32) {
    state.flower_cooldown = (state.flower_cooldown - dt).max(0.0);

    let mut cleared_mines: Vec<usize> = Vec::new();
    let mut picked: Option<usize> = None;

    for (f, flower) in state.flowers.iter_mut().enumerate() {
        flower.age += dt;
        for (m, mine) in state.mines.iter().enumerate() {
            if flower_clears_mine(flower.pos, mine.pos) && !cleared_mines.contains(&m) {
                cleared_mines.push(m);
            }
        }
        if picked.is_none() && state.player.alive && flower_pickup(flower.pos, state.player.pos) {
            picked = Some(f);
        }
    }

    cleared_mines.sort_unstable();
    for m in cleared_mines.into_iter().rev() {
        let mine = state.mines.swap_remove(m);
        state.explosions.push(Explosion::new(mine.pos, false));
        state.play_sound(SoundEffect::ExplosionSmall, 0.7, 1.0, false);
    }

    if let Some(f) = picked {
        state.flowers.swap_remove(f);
        state.player.empower();
        state.announce(AnnouncerLine::FlowerPower);
    }
    state.flowers.retain(|f| !f.expired());
}

/// Drain the zap timer, consuming one random mine and one random segment
/// per pulse
fn update_zap(state: &mut GameState, dt: f32) {
    if state.player.zap <= 0.0 {
        return;
    }
    state.player.zap = (state.player.zap - dt).max(0.0);
    state.player.zap_pulse += dt;

    while state.player.zap_pulse >= ZAP_PULSE_SECS {
        state.player.zap_pulse -= ZAP_PULSE_SECS;
        let player_pos = state.player.pos;

        if !state.mines.is_empty() {
            let m = state.rng.random_range(0..state.mines.len());
            let mine = state.mines.swap_remove(m);
            state.explosions.push(Explosion::new(mine.pos, true));
            state.zap_line(player_pos, mine.pos);
            state.play_sound(SoundEffect::ZapA, 0.8, 1.0, false);
        }

        let ids = state.segments.ids();
        if !ids.is_empty() {
            let id = ids[state.rng.random_range(0..ids.len())];
            let pos = state.segments.get(id).map(|seg| seg.pos);
            if destroy_segment(state, id, true) {
                let pos = pos.unwrap_or(player_pos);
                state.award(ZAP_KILL_SCORE, pos);
                state.zap_line(player_pos, pos);
                state.play_sound(SoundEffect::ZapB, 0.8, 1.0, false);
            }
        }
    }
}

/// Remove a segment, splice its chain and resolve the drops.
/// Returns false when the handle was already stale.
fn destroy_segment(state: &mut GameState, id: SegmentId, zapped: bool) -> bool {
    let GameState { segments, rng, .. } = state;
    let Some(gone) = segments.destroy(id, rng) else {
        return false;
    };

    state.explosions.push(Explosion::new(gone.pos, false));
    state.play_sound(SoundEffect::ExplosionSmall, 0.8, 1.0, false);

    // A trailing segment leaves a mine behind, unless a zap took it
    if gone.had_following && !zapped {
        state.mines.push(Mine::new(gone.pos));
    }

    // Tail deaths can shake a flower loose
    if gone.was_tail
        && state.flower_cooldown <= 0.0
        && !state.player.empowered()
        && state.rng.random_bool(state.tuning.flower_spawn_chance)
    {
        state.flowers.push(super::state::Flower::new(gone.pos));
        state.flower_cooldown = state.tuning.flower_spawn_cooldown;
        state.announce(AnnouncerLine::HereComesFlower);
    }
    true
}

/// Combo-aware scoring for a bullet kill
fn score_segment_kill(state: &mut GameState, pos: Vec2, was_head: bool) {
    if was_head {
        state.player.combo += 1;
        let max_combo = state.tuning.max_combo(state.level);
        if state.player.combo >= max_combo {
            state.award(SUPER_COMBO_SCORE, pos);
            state.announce(AnnouncerLine::SuperCombo);
            state.player.combo = 0;
        } else {
            state.award(HEAD_KILL_SCORE * state.player.combo as u64, pos);
        }
        state.player.combo_timer = COMBO_WINDOW_SECS;
    } else {
        state.award(BODY_KILL_SCORE, pos);
        state.player.combo = 0;
        state.player.combo_timer = 0.0;
    }
}

/// Kill the player at most once per life
fn kill_player(state: &mut GameState) {
    if !state.player.alive {
        return;
    }
    state.player.alive = false;
    state.player.clear_power();
    state.player.combo = 0;
    state.player.combo_timer = 0.0;
    state.bullets.clear();

    let pos = state.player.pos;
    state.explosions.push(Explosion::new(pos, true));
    state.play_sound(SoundEffect::Die, 1.0, 1.0, false);
    state.play_sound(SoundEffect::ExplosionBig, 1.0, 1.0, false);

    state.lives = state.lives.saturating_sub(1);
    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.play_sound(SoundEffect::GameOver, 1.0, 1.0, false);
        state.stop_sound(SoundEffect::Music);
        state.announce(AnnouncerLine::GameOver);
        log::info!("game over at level {} with {} points", state.level, state.score);
    } else {
        state.phase = GamePhase::AwaitRespawn;
        let line = DEATH_LINES[state.rng.random_range(0..DEATH_LINES.len())];
        state.announce(line);
    }
}

/// Advance wave/level and repopulate the field
fn advance_wave(state: &mut GameState) {
    state.wave += 1;
    if state.wave > 4 {
        state.wave = 1;
        state.level += 1;
    }
    state.player.clear_power();
    state.player.combo = 0;
    state.player.combo_timer = 0.0;

    let line = WAVE_CLEAR_LINES[state.rng.random_range(0..WAVE_CLEAR_LINES.len())];
    state.announce(line);
    log::info!("level {} wave {} incoming", state.level, state.wave);

    make_enemies(state);
}

/// Spawn the wave's chain set across the top of the field and keep the
/// chaser pack at the level's speed
fn make_enemies(state: &mut GameState) {
    let count = state.wave + 1;
    let gap = (state.half_width * 2.0) / count as f32;
    let length = state.tuning.chain_length(state.level);
    let top_y = state.height - 5.0;
    for i in 0..count {
        let x = -state.half_width + gap * i as f32;
        state.segments.spawn_chain(x, top_y, length);
    }
    state.segment_step_timer = 0.0;

    let speed = state.tuning.chaser_speed(state.level);
    if state.chasers.is_empty() {
        state
            .chasers
            .push(Chaser::new(Vec2::new(0.0, state.height - 10.0), speed));
        state.play_sound(SoundEffect::Spider, 1.0, 1.0, true);
    } else {
        for chaser in &mut state.chasers {
            chaser.speed = speed;
        }
    }
}
