//! HUD components and systems (timer, result banner, powerup indicator)

use bevy::prelude::*;

use crate::events::{MatchEvent, MatchEventBus};
use crate::match_state::{MatchPhase, MatchState};
use crate::player::{Actor, ActorRole};
use crate::powerup::{ActivePowerup, PowerupKind};
use crate::constants::TEXT_PRIMARY;

/// Timer / prompt line at the top of the screen
#[derive(Component)]
pub struct HudText;

/// Centre banner for the match result
#[derive(Component)]
pub struct ResultText;

/// Banner text for a terminal event
pub fn result_banner(event: &MatchEvent) -> Option<String> {
    match event {
        MatchEvent::Won { formatted, .. } => Some(format!("You Win\n\nTime: {}", formatted)),
        MatchEvent::Lost { .. } => Some("Target Escaped".to_string()),
        _ => None,
    }
}

/// Top line for the current phase and the live actor's powerup
pub fn status_line(state: &MatchState, indicator: Option<PowerupKind>) -> String {
    let mut line = match state.phase() {
        MatchPhase::Idle => "Press Enter to start".to_string(),
        MatchPhase::Running => format!("Run!  {}", state.formatted_time()),
        MatchPhase::Rewinding => format!("Catch it!  {}", state.formatted_time()),
        MatchPhase::Won | MatchPhase::Lost => state.formatted_time(),
    };
    match indicator {
        Some(PowerupKind::SpeedUp) => line.push_str("  [SPEED UP]"),
        Some(PowerupKind::SlowDown) => line.push_str("  [SLOW DOWN]"),
        None => {}
    }
    line
}

pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(TEXT_PRIMARY),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(16.0),
            ..default()
        },
        HudText,
    ));

    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextLayout::new_with_justify(Justify::Center),
                TextColor(TEXT_PRIMARY),
                ResultText,
            ));
        });
}

/// Refresh the top line every frame and show the banner once the match ends
pub fn update_hud(
    match_state: Res<MatchState>,
    mut bus: ResMut<MatchEventBus>,
    actors: Query<(&ActorRole, &ActivePowerup), With<Actor>>,
    mut hud: Query<&mut Text, (With<HudText>, Without<ResultText>)>,
    mut banner: Query<&mut Text, (With<ResultText>, Without<HudText>)>,
) {
    let phase = match_state.phase();
    let indicator = actors
        .iter()
        .find(|(role, _)| role.is_live(phase))
        .and_then(|(_, powerup)| powerup.indicator());

    if let Ok(mut text) = hud.single_mut() {
        text.0 = status_line(&match_state, indicator);
    }

    for bus_event in bus.drain() {
        if let Some(message) = result_banner(&bus_event.event)
            && let Ok(mut text) = banner.single_mut()
        {
            text.0 = message;
        }
    }
}
