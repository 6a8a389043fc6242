use std::time::Duration;

use maze_dash_core::{Command, Event, Point, Rect, RectId, Velocity};
use maze_dash_world::{self as world, query, World, WorldConfig};

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.rect_count, 24);
    assert_eq!(first.ticks, 30);
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    player: Point,
    nearby: Vec<RectId>,
    rect_count: usize,
    ticks: u64,
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new(WorldConfig::covering(40.0, 400.0, 400.0)).expect("valid config");
    let mut events = Vec::new();

    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    ReplayOutcome {
        events,
        player: query::player(&world).position(),
        nearby: query::nearby_player_objects(&world).ids().collect(),
        rect_count: query::static_rect_count(&world),
        ticks: query::tick_index(&world),
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands: Vec<Command> = (0..24)
        .map(|index| {
            let offset = index as f32 * 15.0;
            Command::AddStaticRect {
                rect: Rect::new(offset, offset * 0.5, 40.0, 4.0),
            }
        })
        .collect();

    for tick in 0..30 {
        if tick % 10 == 0 {
            let direction = if tick % 20 == 0 { 1.0 } else { -1.0 };
            commands.push(Command::SetPlayerVelocity {
                velocity: Velocity::new(120.0 * direction, 60.0),
            });
        }
        commands.push(Command::Tick {
            dt: Duration::from_millis(33),
        });
    }

    commands
}
