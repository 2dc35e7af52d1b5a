use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use maze_trail_core::{CellCoord, Command, Event};
use maze_trail_world::{self as world, query, World, WorldConfig};

fn config(width: u32, height: u32, mutation_rate: u32, seed: u32) -> WorldConfig {
    WorldConfig {
        width,
        height,
        mutation_rate,
        seed: Some(seed),
    }
}

fn cell(column: u32, row: u32) -> CellCoord {
    CellCoord::new(column, row)
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = Vec::new();
    for scene in 0..4 {
        if scene > 0 {
            commands.push(Command::GenerateScene);
        }
        commands.extend(std::iter::repeat(Command::Advance).take(250));
    }
    commands
}

fn replay(config: WorldConfig, commands: &[Command]) -> (Vec<Event>, u64) {
    let mut world = World::new(config).expect("valid config");
    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, *command, &mut events).expect("command applies");
    }

    let mut hasher = DefaultHasher::new();
    events.hash(&mut hasher);
    query::physical_grid(&world).hash(&mut hasher);
    query::path(&world).hash(&mut hasher);
    (events, hasher.finish())
}

#[test]
fn replaying_a_script_is_deterministic() {
    let commands = scripted_commands();
    let (first_events, first_fingerprint) = replay(config(12, 9, 15, 2_718), &commands);
    let (second_events, second_fingerprint) = replay(config(12, 9, 15, 2_718), &commands);

    assert_eq!(first_events, second_events);
    assert_eq!(first_fingerprint, second_fingerprint);

    let (_, other_fingerprint) = replay(config(12, 9, 15, 2_719), &commands);
    assert_ne!(first_fingerprint, other_fingerprint);
}

#[test]
fn every_scene_announces_its_layout_and_goal() {
    let commands = scripted_commands();
    let (events, _) = replay(config(6, 5, 10, 31), &commands);

    let scenes: Vec<u64> = events
        .iter()
        .filter_map(|event| match event {
            Event::SceneGenerated { scene, .. } => Some(*scene),
            _ => None,
        })
        .collect();
    assert_eq!(scenes, vec![2, 3, 4]);

    for (index, event) in events.iter().enumerate() {
        if matches!(event, Event::SceneGenerated { .. }) {
            assert!(matches!(
                events.get(index + 1),
                Some(Event::GoalSelected { .. })
            ));
        }
    }
}

#[test]
fn reference_world_walks_the_expected_route() {
    let mut world = World::new(config(3, 3, 0, 12_345)).expect("valid config");
    assert_eq!(query::position(&world), cell(4, 4));
    assert_eq!(query::goal(&world), cell(0, 3));
    assert_eq!(query::distance(&world, cell(4, 4)), Some(5));

    let mut events = Vec::new();
    for _ in 0..20 {
        world::apply(&mut world, Command::Advance, &mut events).expect("advance succeeds");
    }

    let step = |from: (u32, u32), to: (u32, u32)| Event::AgentStepped {
        from: cell(from.0, from.1),
        to: cell(to.0, to.1),
    };
    let goal = |column, row, distance| Event::GoalSelected {
        goal: cell(column, row),
        distance,
    };
    let expected = vec![
        step((4, 4), (3, 4)),
        step((3, 4), (2, 4)),
        step((2, 4), (1, 4)),
        step((1, 4), (0, 4)),
        step((0, 4), (0, 3)),
        goal(1, 4, 2),
        step((0, 3), (0, 4)),
        step((0, 4), (1, 4)),
        goal(4, 4, 3),
        step((1, 4), (2, 4)),
        step((2, 4), (3, 4)),
        step((3, 4), (4, 4)),
        goal(1, 2, 7),
        step((4, 4), (3, 4)),
        step((3, 4), (2, 4)),
        step((2, 4), (1, 4)),
        step((1, 4), (0, 4)),
        step((0, 4), (0, 3)),
        step((0, 3), (0, 2)),
        step((0, 2), (1, 2)),
    ];
    assert_eq!(events, expected);
    assert_eq!(query::position(&world), cell(1, 2));
    assert_eq!(query::goals_reached(&world), 3);
}

#[test]
fn heavily_mutated_worlds_replay_without_errors() {
    let commands = scripted_commands();
    for seed in [3, 5, 6, 19, 21, 22] {
        let (events, _) = replay(config(12, 8, 4, seed), &commands);
        assert!(events.iter().all(|event| !matches!(event, Event::AgentIdle { .. })));
    }
}
