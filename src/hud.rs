use bevy::prelude::*;

use crate::plugin::GameRuntime;
use crate::types::{IconTag, ICONS};
use crate::view::{HudView, ICON_SIZE_PX};

const POINTS_BLUE: Color = Color::srgb(0.165, 0.5, 1.0);
const TEXT_DARK: Color = Color::srgb(0.2, 0.2, 0.2);
const TOO_LATE_RED: Color = Color::srgb(0.85, 0.1, 0.1);

pub fn systems() -> impl Plugin {
    HudPlugin
}

struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        // The runtime resource is inserted during Startup.
        app.add_systems(PostStartup, setup_hud)
            .add_systems(Update, (update_scores, update_icons));
    }
}

#[derive(Resource)]
struct IconHandles {
    a: Handle<Image>,
    b: Handle<Image>,
}

impl IconHandles {
    fn get(&self, tag: IconTag) -> Handle<Image> {
        match tag {
            IconTag::A => self.a.clone(),
            IconTag::B => self.b.clone(),
        }
    }
}

#[derive(Component)]
struct GamePointsText;

#[derive(Component)]
struct RoundPointsText;

#[derive(Component)]
struct TopIcon;

#[derive(Component)]
struct BottomIcon {
    slot: usize,
}

fn icon_node() -> Node {
    Node {
        width: Val::Px(ICON_SIZE_PX),
        height: Val::Px(ICON_SIZE_PX),
        ..default()
    }
}

fn setup_hud(mut commands: Commands, asset_server: Res<AssetServer>, rt: Res<GameRuntime>) {
    let handles = IconHandles {
        a: asset_server.load(ICONS[0].image),
        b: asset_server.load(ICONS[1].image),
    };
    let view = HudView::from_machine(&rt.machine);

    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            padding: UiRect::top(Val::Px(32.0)),
            ..default()
        })
        .with_children(|root| {
            root.spawn((
                Text::new(view.game_points.clone()),
                TextFont { font_size: 32.0, ..default() },
                TextColor(POINTS_BLUE),
                Node { margin: UiRect::bottom(Val::Px(24.0)), ..default() },
                GamePointsText,
            ));

            // Hidden, not removed, so the rows below keep their place.
            root.spawn((
                Text::new(""),
                TextFont { font_size: 20.0, ..default() },
                TextColor(TEXT_DARK),
                Node { height: Val::Px(32.0), margin: UiRect::bottom(Val::Px(8.0)), ..default() },
                Visibility::Hidden,
                RoundPointsText,
            ));

            root.spawn(Node {
                height: Val::Px(100.0),
                margin: UiRect::bottom(Val::Px(30.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            })
            .with_children(|slot| {
                slot.spawn((ImageNode::new(handles.a.clone()), icon_node(), Visibility::Hidden, TopIcon));
            });

            root.spawn(Node {
                height: Val::Px(100.0),
                column_gap: Val::Px(40.0),
                justify_content: JustifyContent::Center,
                ..default()
            })
            .with_children(|row| {
                for slot in 0..2 {
                    row.spawn((
                        ImageNode::new(handles.a.clone()),
                        icon_node(),
                        Visibility::Hidden,
                        BottomIcon { slot },
                    ));
                }
            });

            root.spawn((
                Text::new(view.instructions.clone()),
                TextFont { font_size: 18.0, ..default() },
                TextColor(TEXT_DARK),
                Node { margin: UiRect::top(Val::Px(16.0)), ..default() },
            ));
            root.spawn((
                Text::new(view.timing_hint.clone()),
                TextFont { font_size: 16.0, ..default() },
                TextColor(Color::srgb(0.5, 0.5, 0.5)),
                TextLayout::new_with_justify(JustifyText::Center),
                Node { margin: UiRect::top(Val::Px(8.0)), ..default() },
            ));
        });

    commands.insert_resource(handles);
}

fn update_scores(
    rt: Res<GameRuntime>,
    mut game: Query<&mut Text, (With<GamePointsText>, Without<RoundPointsText>)>,
    mut round: Query<(&mut Text, &mut TextColor, &mut Visibility), (With<RoundPointsText>, Without<GamePointsText>)>,
) {
    let view = HudView::from_machine(&rt.machine);
    for mut text in game.iter_mut() {
        if text.0 != view.game_points {
            text.0 = view.game_points.clone();
        }
    }
    for (mut text, mut color, mut vis) in round.iter_mut() {
        match &view.round_points {
            Some(label) => {
                if &text.0 != label {
                    text.0 = label.clone();
                }
                color.0 = if view.too_late { TOO_LATE_RED } else { TEXT_DARK };
                *vis = Visibility::Inherited;
            }
            None => *vis = Visibility::Hidden,
        }
    }
}

fn update_icons(
    rt: Res<GameRuntime>,
    handles: Res<IconHandles>,
    mut top: Query<(&mut ImageNode, &mut Visibility), (With<TopIcon>, Without<BottomIcon>)>,
    mut bottom: Query<(&BottomIcon, &mut ImageNode, &mut Visibility), Without<TopIcon>>,
) {
    let view = HudView::from_machine(&rt.machine);
    for (mut image, mut vis) in top.iter_mut() {
        match view.top {
            Some(icon) => {
                let handle = handles.get(icon.tag);
                if image.image != handle {
                    image.image = handle;
                }
                *vis = Visibility::Inherited;
            }
            None => *vis = Visibility::Hidden,
        }
    }
    for (slot, mut image, mut vis) in bottom.iter_mut() {
        match view.bottom {
            Some(pair) => {
                let handle = handles.get(pair[slot.slot].tag);
                if image.image != handle {
                    image.image = handle;
                }
                *vis = Visibility::Inherited;
            }
            None => *vis = Visibility::Hidden,
        }
    }
}
