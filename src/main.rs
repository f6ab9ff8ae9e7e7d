//! Butter Zapper headless driver
//!
//! Runs the simulation in attract mode: a scripted pilot strafes, fires and
//! respawns while every outbound cue is drained to the log. Useful for
//! soak-testing the core without a renderer attached.

use glam::Vec2;

use butter_zapper::audio::validate_asset_keys;
use butter_zapper::consts::{MAX_SUBSTEPS, SIM_DT};
use butter_zapper::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use butter_zapper::HighScores;

/// Demo run holding the state and the fixed-timestep accumulator
struct Demo {
    state: GameState,
    accumulator: f32,
    input: TickInput,
}

impl Demo {
    fn new(seed: u64) -> Self {
        Self {
            state: GameState::new(seed),
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    /// Scripted pilot: hold fire, weave across the lower field, respawn
    /// as soon as the game allows it
    fn drive(&mut self) {
        let t = self.state.time_ticks as f32 * SIM_DT;
        let player = &self.state.player;

        self.input.fire_zapper = true;
        self.input.respawn = self.state.phase == GamePhase::AwaitRespawn;

        let target = Vec2::new((t * 0.4).sin() * 18.0, 12.0 + (t * 0.7).cos() * 6.0);
        let to_target = target - player.pos;
        self.input.movement = Vec2::new(
            to_target.x.clamp(-1.0, 1.0),
            to_target.y.clamp(-1.0, 1.0),
        );
    }

    /// Advance by a frame's worth of wall time
    fn update(&mut self, frame_dt: f32) {
        self.accumulator += frame_dt.min(0.1);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.drive();
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.respawn = false;

            for event in self.state.take_events() {
                log_event(&event);
            }
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Sound { effect, volume, pitch, looping } => {
            log::debug!(
                "sound {} vol {:.2} pitch {:.2}{}",
                effect.asset_key(),
                volume,
                pitch,
                if *looping { " (loop)" } else { "" }
            );
        }
        GameEvent::StopSound { effect } => {
            log::debug!("stop sound {}", effect.asset_key());
        }
        GameEvent::Announce { line, level, lives, score, highscore } => {
            log::info!(
                "announcer: {} (level {level}, lives {lives}, score {score}{})",
                line.asset_key(),
                if *highscore { ", highscore!" } else { "" }
            );
        }
        GameEvent::ZapLine { from, to } => {
            log::trace!("zapline {from} -> {to}");
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    validate_asset_keys();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xB077E2);
    let demo_secs: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(90.0);

    log::info!("attract mode: seed {seed}, {demo_secs} simulated seconds");

    let mut scores = HighScores::new();
    let mut demo = Demo::new(seed);
    demo.state.highscore = scores.top_score().unwrap_or(0);

    let frames = (demo_secs / SIM_DT) as u64;
    for _ in 0..frames {
        if demo.state.phase == GamePhase::GameOver {
            break;
        }
        demo.update(SIM_DT);
    }

    let state = &demo.state;
    log::info!(
        "run finished: level {} wave {}, score {}, {} lives left",
        state.level,
        state.wave,
        state.score,
        state.lives
    );
    if let Some(rank) = scores.add_score(state.score, state.level, state.wave) {
        log::info!("score entered the board at rank {rank}");
    }
}
