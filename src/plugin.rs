use bevy::app::AppExit;
use bevy::prelude::*;

use crate::hud;
use crate::*;

#[derive(Debug, Clone, Default, Resource)]
pub struct PairMatchSettings {
    pub config: GameConfig,
}

/// Owns the round machine for the lifetime of the game screen.
#[derive(Resource)]
pub struct GameRuntime {
    pub machine: RoundMachine,
}

impl Drop for GameRuntime {
    fn drop(&mut self) { self.machine.teardown(); }
}

pub struct PairMatchPlugin;

impl Plugin for PairMatchPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PairMatchSettings>()
            .insert_resource(ClearColor(Color::WHITE))
            .add_event::<RoundCue>()
            .add_plugins(hud::systems())
            .add_systems(Startup, setup)
            .add_systems(Update, (advance_rounds, read_keys, teardown_on_exit).chain());
    }
}

fn now_ms(time: &Time) -> u64 { (time.elapsed_secs_f64() * 1000.0) as u64 }

fn setup(
    mut commands: Commands,
    settings: Res<PairMatchSettings>,
    time: Res<Time>,
    mut cues: EventWriter<RoundCue>,
) {
    commands.spawn(Camera2d);
    let cfg = &settings.config;
    let mut machine = RoundMachine::new(cfg.timing.clone(), RoundRng::from_seed_opt(cfg.seed));
    if let Some(ev) = machine.mount(now_ms(&time)) {
        cues.send(RoundCue(ev));
    }
    info!(
        "pair match ready: {} ms window, {} ms between rounds",
        cfg.timing.round_window_ms, cfg.timing.new_round_delay_ms
    );
    commands.insert_resource(GameRuntime { machine });
}

fn advance_rounds(mut rt: ResMut<GameRuntime>, time: Res<Time>, mut cues: EventWriter<RoundCue>) {
    let now = now_ms(&time);
    for ev in rt.machine.tick(now) {
        cues.send(RoundCue(ev));
    }
}

fn read_keys(
    mut rt: ResMut<GameRuntime>,
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut cues: EventWriter<RoundCue>,
) {
    let now = now_ms(&time);
    for code in keys.get_just_pressed() {
        let Some(key) = answer_key(*code) else { continue };
        for ev in rt.machine.on_key(key, now) {
            cues.send(RoundCue(ev));
        }
    }
}

fn teardown_on_exit(mut exits: EventReader<AppExit>, mut rt: ResMut<GameRuntime>) {
    if exits.read().next().is_some() && !rt.machine.is_torn_down() {
        rt.machine.teardown();
    }
}
