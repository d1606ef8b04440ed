use bevy::prelude::*;
use bevy_pairmatch::*;

fn main() {
    App::new()
        .insert_resource(PairMatchSettings::default())
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window { title: "Pair Match cues".into(), resolution: (720.0, 560.0).into(), resizable: false, ..default() }),
                ..default()
            }),
            PairMatchPlugin,
        ))
        .add_systems(Update, on_cue)
        .run();
}

fn on_cue(mut ev: EventReader<RoundCue>) {
    for cue in ev.read() {
        match &cue.0 {
            RoundEvent::RoundStarted { round } => info!("round {round}"),
            RoundEvent::BottomRevealed { .. } => info!("pair up"),
            RoundEvent::TopRevealed { at_ms, .. } => info!("GO at {at_ms} ms"),
            RoundEvent::Resolved(log) => info!("{} for {} (total {})", log.resolution, log.points, log.game_points),
        }
    }
}
