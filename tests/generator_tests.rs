//! Instance generator and instance file tests.

use rust_ludo::core::{LudoError, SideId, SideRole, TokenId, TokenPositions};
use rust_ludo::instance::{ExperimentConfig, GeneratorConfig, InstanceGenerator, InstanceSet};
use rust_ludo::oracle::SequenceOracle;

fn generate(seed: u64, experiments: &[ExperimentConfig]) -> InstanceSet {
    InstanceGenerator::new(GeneratorConfig::default().with_seed(seed))
        .generate(experiments)
        .unwrap()
}

#[test]
fn test_every_side_sequence_is_solvable() {
    let set = generate(
        42,
        &[ExperimentConfig::single_player(4), ExperimentConfig::multiplayer(3)],
    );

    for experiment in &set.experiments {
        for instance in &experiment.instances {
            for side in SideId::all(instance.side_count()) {
                let oracle =
                    SequenceOracle::new(instance.rolls.side_rolls(side), instance.n_fields);
                let start = TokenPositions::at_home(&TokenId::for_side(side, instance.n_tokens));
                let min_moves = oracle.solve(&start, 0).min_moves();

                assert!(min_moves.is_some(), "{} {} unsolvable", instance.game_id, side);
                if side.is_primary() {
                    assert_eq!(min_moves, Some(instance.min_moves));
                }
            }
        }
    }
}

#[test]
fn test_experiment_shapes() {
    let set = generate(
        7,
        &[
            ExperimentConfig::single_player(2).with_fields(12).with_rolls(15),
            ExperimentConfig::multiplayer(2).with_tokens(2),
        ],
    );
    assert_eq!(set.experiments.len(), 2);

    let single = set.experiment("single_player").unwrap();
    assert_eq!(single.side_roles, vec![SideRole::Model]);
    for instance in &single.instances {
        assert_eq!(instance.n_fields, 12);
        assert_eq!(instance.turn_limit(), 15);
        assert_eq!(instance.n_tokens, 2);
        assert_eq!(instance.prompt_name, "single_player");
    }

    let multi = set.experiment("multiplayer").unwrap();
    assert_eq!(multi.side_roles, vec![SideRole::Model, SideRole::Programmatic]);
    assert!(multi.instance("in002").is_some());
    assert!(multi.instance("in003").is_none());
}

#[test]
fn test_generated_sets_are_playable_files() {
    let set = generate(3, &[ExperimentConfig::single_player(2), ExperimentConfig::multiplayer(2)]);
    let parsed = InstanceSet::from_json(&set.to_json().unwrap()).unwrap();
    assert_eq!(parsed, set);
    assert_ne!(set, generate(4, &[ExperimentConfig::single_player(2), ExperimentConfig::multiplayer(2)]));
}

#[test]
fn test_save_and_load() {
    let set = generate(42, &[ExperimentConfig::multiplayer(2)]);
    let dir = std::env::temp_dir().join(format!("rust_ludo_instances_{}", std::process::id()));
    let path = dir.join("instances.json");

    set.save(&path).unwrap();
    let loaded = InstanceSet::load(&path).unwrap();
    assert_eq!(loaded, set);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_load_missing_file() {
    let path = std::env::temp_dir().join("rust_ludo_no_such_dir").join("instances.json");
    assert!(matches!(InstanceSet::load(&path), Err(LudoError::Io { .. })));
}
