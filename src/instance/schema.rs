//! Instance file schema.
//!
//! An instance fixes everything an episode needs: board size, tokens per
//! side, the pre-rolled dice sequence, who plays each seat, and the
//! oracle's minimum move count for the primary side. Instances are grouped
//! into named experiments and stored as JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{DiceSequence, LudoError, Position, Result, SideRole};

/// One playable game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Identifier within the experiment, e.g. `in001`.
    pub game_id: String,

    /// Role of each seat, primary side first.
    pub side_roles: Vec<SideRole>,

    /// Name of the prompt the seats are given.
    #[serde(default)]
    pub prompt_name: String,

    /// Tokens per side.
    pub n_tokens: usize,

    /// Board size; also the finish field.
    pub n_fields: Position,

    /// Per-turn rolls; pairs when two sides play.
    pub rolls: DiceSequence,

    /// Fewest turns the primary side needs to finish.
    pub min_moves: u32,
}

impl Instance {
    /// Number of seats.
    #[must_use]
    pub fn side_count(&self) -> usize {
        self.side_roles.len()
    }

    /// Turn limit of an episode on this instance.
    #[must_use]
    pub fn turn_limit(&self) -> usize {
        self.rolls.len()
    }

    /// Check the instance is internally consistent.
    ///
    /// Missing or inconsistent fields are setup defects, reported as errors.
    pub fn validate(&self) -> Result<()> {
        if self.rolls.is_empty() {
            return Err(LudoError::EmptySequence);
        }
        self.rolls.validate()?;
        if self.rolls.side_count() != self.side_count() {
            return Err(LudoError::SideCountMismatch {
                dice: self.rolls.side_count(),
                sides: self.side_count(),
            });
        }
        if !(1..=crate::core::MAX_TOKENS).contains(&self.n_tokens) {
            return Err(LudoError::InvalidTokenCount {
                n_tokens: self.n_tokens,
            });
        }
        if self.n_fields < 2 {
            return Err(LudoError::InvalidBoardSize {
                n_fields: usize::from(self.n_fields),
            });
        }
        Ok(())
    }
}

/// Instances sharing one configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub name: String,
    pub side_roles: Vec<SideRole>,
    pub instances: Vec<Instance>,
}

impl Experiment {
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instance by id.
    #[must_use]
    pub fn instance(&self, game_id: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.game_id == game_id)
    }
}

/// Top-level instance file: a list of experiments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSet {
    pub experiments: Vec<Experiment>,
}

impl InstanceSet {
    pub fn new(experiments: Vec<Experiment>) -> Self {
        Self { experiments }
    }

    /// Experiment by name.
    #[must_use]
    pub fn experiment(&self, name: &str) -> Option<&Experiment> {
        self.experiments.iter().find(|e| e.name == name)
    }

    /// Parse and validate every instance.
    pub fn from_json(json: &str) -> Result<Self> {
        let set: InstanceSet = serde_json::from_str(json)?;
        for experiment in &set.experiments {
            for instance in &experiment.instances {
                instance.validate()?;
            }
        }
        Ok(set)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the set to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| LudoError::Io {
                operation: format!("create {}", dir.display()),
                source,
            })?;
        }
        fs::write(path, self.to_json()?).map_err(|source| LudoError::Io {
            operation: format!("write {}", path.display()),
            source,
        })
    }

    /// Read and validate a set from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| LudoError::Io {
            operation: format!("read {}", path.display()),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Instance {
        Instance {
            game_id: "in001".to_string(),
            side_roles: vec![SideRole::Model, SideRole::Programmatic],
            prompt_name: "multiplayer".to_string(),
            n_tokens: 1,
            n_fields: 10,
            rolls: DiceSequence::paired(vec![[6, 6], [4, 2], [5, 1]]).unwrap(),
            min_moves: 3,
        }
    }

    #[test]
    fn test_validate() {
        assert!(instance().validate().is_ok());

        let mut bad = instance();
        bad.side_roles.pop();
        assert!(matches!(bad.validate(), Err(LudoError::SideCountMismatch { .. })));

        let mut bad = instance();
        bad.n_tokens = 3;
        assert!(matches!(bad.validate(), Err(LudoError::InvalidTokenCount { .. })));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&instance()).unwrap();
        assert!(json.contains(r#""rolls":[[6,6],[4,2],[5,1]]"#));
        assert!(json.contains(r#""side_roles":["model","programmatic"]"#));
    }

    #[test]
    fn test_single_rolls_deserialize() {
        let json = r#"{"game_id":"in002","side_roles":["model"],"n_tokens":2,
            "n_fields":23,"rolls":[6,3,5],"min_moves":3}"#;
        let instance: Instance = serde_json::from_str(json).unwrap();
        assert_eq!(instance.rolls, DiceSequence::Single(vec![6, 3, 5]));
        assert!(instance.prompt_name.is_empty());
    }

    #[test]
    fn test_missing_field_is_error() {
        let json = r#"{"experiments":[{"name":"x","side_roles":["model"],
            "instances":[{"game_id":"in001","side_roles":["model"]}]}]}"#;
        assert!(matches!(
            InstanceSet::from_json(json),
            Err(LudoError::Serialization(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let set = InstanceSet::new(vec![Experiment {
            name: "multiplayer".to_string(),
            side_roles: vec![SideRole::Model, SideRole::Programmatic],
            instances: vec![instance()],
        }]);
        let path = std::env::temp_dir()
            .join(format!("rust_ludo_schema_{}", std::process::id()))
            .join("instances.json");

        set.save(&path).unwrap();
        let loaded = InstanceSet::load(&path).unwrap();
        assert_eq!(loaded, set);
        assert_eq!(loaded.experiment("multiplayer").unwrap().len(), 1);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
