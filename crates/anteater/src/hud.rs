use bevy::prelude::*;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::core::{SaveScoreRequested, Score, SpawnAnts, ToggleThemeRequested};
use crate::leaderboard::{Leaderboard, SessionRecord};
use crate::theme::{Theme, ThemedPanel, ThemedText};

const BUTTON_HOVERED: Color = Color::srgba(0.5, 0.5, 0.5, 0.35);
const BUTTON_PRESSED: Color = Color::srgba(0.5, 0.5, 0.5, 0.6);
const BUTTON_FRAME: Color = Color::srgb(0.5, 0.5, 0.5);

/// Everything the top bar and the keyboard can ask for.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum HudAction {
    #[strum(to_string = "+1")]
    AddOne,
    #[strum(to_string = "+10")]
    AddTen,
    #[strum(to_string = "Theme")]
    ToggleTheme,
    #[strum(to_string = "Save")]
    SaveScore,
}

impl HudAction {
    pub const fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Digit1 | KeyCode::Numpad1 => Some(Self::AddOne),
            KeyCode::Digit0 | KeyCode::Numpad0 => Some(Self::AddTen),
            KeyCode::KeyT => Some(Self::ToggleTheme),
            KeyCode::KeyS => Some(Self::SaveScore),
            _ => None,
        }
    }
}

#[derive(Component)]
struct HudButton(HudAction);

#[derive(Component)]
struct ThemeLabel;

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct LeaderboardPanel;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HudAction>()
            .add_event::<SpawnAnts>()
            .add_event::<ToggleThemeRequested>()
            .add_event::<SaveScoreRequested>()
            .add_systems(Startup, setup)
            .add_systems(
                Update,
                (
                    (button_system, keyboard_shortcuts, perform_actions).chain(),
                    update_score_text.run_if(resource_changed::<Score>),
                    update_theme_label.run_if(resource_changed::<Theme>),
                    refresh_leaderboard.run_if(
                        resource_changed::<Leaderboard>
                            .or(resource_changed::<Theme>)
                            .or(resource_exists_and_changed::<SessionRecord>),
                    ),
                ),
            );
    }
}

pub fn score_label(score: u64) -> String {
    format!("Eaten: {score}")
}

pub fn leaderboard_row(rank: usize, name: &str, score: u64) -> String {
    format!("{rank}. {name} — {score}")
}

fn text_bundle(text: impl Into<String>, font_size: f32, theme: Theme) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(theme.text_color()),
        ThemedText,
    )
}

fn setup(mut commands: Commands, theme: Res<Theme>) {
    let theme = *theme;
    let button = (
        Button,
        Node {
            width: Val::Px(88.0),
            height: Val::Px(44.0),
            border: UiRect::all(Val::Px(3.0)),
            // horizontally center child text
            justify_content: JustifyContent::Center,
            // vertically center child text
            align_items: AlignItems::Center,
            ..default()
        },
        BorderColor(BUTTON_FRAME),
        BorderRadius::MAX,
        BackgroundColor(theme.panel_color()),
        ThemedPanel,
    );

    commands
        .spawn((
            Name::new("Hud"),
            Node {
                width: Val::Percent(100.),
                height: Val::Percent(100.),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(10.0)),
                row_gap: Val::Px(8.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent
                .spawn(Node {
                    width: Val::Percent(100.),
                    justify_content: JustifyContent::SpaceEvenly,
                    ..default()
                })
                .with_children(|bar| {
                    for action in HudAction::iter() {
                        let label = if action == HudAction::ToggleTheme {
                            theme.to_string()
                        } else {
                            action.to_string()
                        };
                        bar.spawn((button.clone(), HudButton(action)))
                            .with_children(|parent| {
                                let mut text = parent.spawn(text_bundle(label, 22.0, theme));
                                if action == HudAction::ToggleTheme {
                                    text.insert(ThemeLabel);
                                }
                            });
                    }
                });

            parent.spawn((text_bundle(score_label(0), 30.0, theme), ScoreText));

            parent.spawn((
                LeaderboardPanel,
                ThemedPanel,
                Node {
                    flex_direction: FlexDirection::Column,
                    align_self: AlignSelf::End,
                    padding: UiRect::all(Val::Px(8.0)),
                    row_gap: Val::Px(2.0),
                    min_width: Val::Px(160.0),
                    ..default()
                },
                BackgroundColor(theme.panel_color()),
                BorderRadius::all(Val::Px(6.0)),
            ));
        });
}

fn button_system(
    theme: Res<Theme>,
    mut query: Query<
        (&Interaction, &HudButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut actions: EventWriter<HudAction>,
) {
    for (interaction, button, mut color) in &mut query {
        match *interaction {
            Interaction::Pressed => {
                color.0 = BUTTON_PRESSED;
                actions.send(button.0);
            }
            Interaction::Hovered => color.0 = BUTTON_HOVERED,
            Interaction::None => color.0 = theme.panel_color(),
        }
    }
}

fn keyboard_shortcuts(keys: Res<ButtonInput<KeyCode>>, mut actions: EventWriter<HudAction>) {
    for key in keys.get_just_pressed() {
        if let Some(action) = HudAction::from_key(*key) {
            actions.send(action);
        }
    }
}

fn perform_actions(
    mut actions: EventReader<HudAction>,
    mut spawns: EventWriter<SpawnAnts>,
    mut theme_toggles: EventWriter<ToggleThemeRequested>,
    mut saves: EventWriter<SaveScoreRequested>,
) {
    for action in actions.read() {
        debug!("Hud action {action}");
        match action {
            HudAction::AddOne => {
                spawns.send(SpawnAnts::one_large());
            }
            HudAction::AddTen => {
                spawns.send(SpawnAnts::ten_small());
            }
            HudAction::ToggleTheme => {
                theme_toggles.send(ToggleThemeRequested);
            }
            HudAction::SaveScore => {
                saves.send(SaveScoreRequested);
            }
        }
    }
}

fn update_score_text(score: Res<Score>, mut texts: Query<&mut Text, With<ScoreText>>) {
    for mut text in &mut texts {
        text.0 = score_label(score.0);
    }
}

fn update_theme_label(theme: Res<Theme>, mut labels: Query<&mut Text, With<ThemeLabel>>) {
    for mut text in &mut labels {
        text.0 = theme.to_string();
    }
}

fn refresh_leaderboard(
    mut commands: Commands,
    board: Res<Leaderboard>,
    record: Option<Res<SessionRecord>>,
    theme: Res<Theme>,
    panels: Query<Entity, With<LeaderboardPanel>>,
) {
    let session = record.as_ref().map(|record| &record.key);

    for panel in &panels {
        commands
            .entity(panel)
            .despawn_descendants()
            .with_children(|rows| {
                rows.spawn(text_bundle("Top 5", 20.0, *theme));
                for (index, entry) in board.entries().iter().enumerate() {
                    let color = if Some(&entry.session) == session {
                        theme.highlight_color()
                    } else {
                        theme.text_color()
                    };
                    rows.spawn((
                        Text::new(leaderboard_row(index + 1, &entry.name, entry.score)),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(color),
                    ));
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::AntSize;
    use crate::leaderboard::{LeaderboardEntry, SessionKey};

    fn hud_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(HudPlugin)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Score>()
            .init_resource::<Leaderboard>()
            .insert_resource(Theme::Light);
        app.update();
        app
    }

    #[test]
    fn shortcuts_map_to_actions() {
        assert_eq!(HudAction::from_key(KeyCode::Digit1), Some(HudAction::AddOne), "1");
        assert_eq!(HudAction::from_key(KeyCode::Digit0), Some(HudAction::AddTen), "0");
        assert_eq!(HudAction::from_key(KeyCode::KeyT), Some(HudAction::ToggleTheme), "T");
        assert_eq!(HudAction::from_key(KeyCode::KeyS), Some(HudAction::SaveScore), "S");
        assert_eq!(HudAction::from_key(KeyCode::KeyX), None, "unbound");
    }

    #[test]
    fn button_labels() {
        let labels: Vec<_> = HudAction::iter().map(|action| action.to_string()).collect();
        assert_eq!(labels, vec!["+1", "+10", "Theme", "Save"], "top bar order");
    }

    #[test]
    fn add_ten_action_requests_small_ants() {
        let mut app = hud_app();
        app.world_mut().send_event(HudAction::AddTen);
        app.update();

        let events = app.world().resource::<Events<SpawnAnts>>();
        let requests: Vec<_> = events.get_cursor().read(events).copied().collect();
        assert_eq!(requests.len(), 1, "one request");
        assert!(
            requests
                .iter()
                .all(|request| request.count == 10 && request.size == AntSize::Small),
            "ten small ants"
        );
    }

    #[test]
    fn score_text_follows_score() {
        let mut app = hud_app();
        app.insert_resource(Score(7));
        app.update();

        let mut query = app.world_mut().query_filtered::<&Text, With<ScoreText>>();
        assert_eq!(query.single(app.world()).0, "Eaten: 7", "counter text");
    }

    #[test]
    fn panel_lists_entries() {
        let mut app = hud_app();
        app.insert_resource(Leaderboard::from_entries(vec![
            LeaderboardEntry {
                name: "Ada".into(),
                score: 12,
                session: SessionKey("a".into()),
                timestamp: 1,
            },
            LeaderboardEntry {
                name: "Bo".into(),
                score: 4,
                session: SessionKey("b".into()),
                timestamp: 2,
            },
        ]));
        app.update();

        let rows: Vec<String> = app
            .world_mut()
            .query::<&Text>()
            .iter(app.world())
            .map(|text| text.0.clone())
            .collect();
        assert!(rows.contains(&leaderboard_row(1, "Ada", 12)), "first row");
        assert!(rows.contains(&leaderboard_row(2, "Bo", 4)), "second row");
    }
}
