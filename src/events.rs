use bevy::prelude::*;

use crate::state_machine::RoundEvent;

/// Round lifecycle notification, one per machine event, in firing order.
#[derive(Event, Clone, Debug)]
pub struct RoundCue(pub RoundEvent);

