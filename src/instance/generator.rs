//! Solvable instance generation.
//!
//! Dice sequences are sampled uniformly and kept only when the sequence
//! oracle can finish every token within them. Each side gets its own
//! sequence; two-side instances zip them into pairs. All randomness comes
//! from one seeded [`GameRng`], so a seed reproduces a whole instance set.

use log::{info, trace};
use serde::{Deserialize, Serialize};

use crate::core::{
    DiceSequence, GameRng, GameRngState, LudoError, Position, Result, Roll, SideId, SideRole, TokenId,
    TokenPositions, MAX_SIDES, MAX_TOKENS,
};
use crate::oracle::SequenceOracle;

use super::schema::{Experiment, Instance, InstanceSet};

/// Generator parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// RNG seed.
    pub seed: u64,

    /// Samples tried per sequence before giving up.
    pub max_resamples: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_resamples: 10_000,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_resamples(mut self, max: u32) -> Self {
        self.max_resamples = max.max(1);
        self
    }
}

/// One experiment to generate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Experiment name; also used as the prompt name.
    pub name: String,
    pub n_instances: usize,
    /// Role of each seat, primary first.
    pub side_roles: Vec<SideRole>,
    pub n_tokens: usize,
    pub n_fields: usize,
    /// Sequence length; also the turn limit.
    pub n_rolls: usize,
}

impl ExperimentConfig {
    /// Single model side, two tokens, 23 fields, 20 rolls.
    pub fn single_player(n_instances: usize) -> Self {
        Self {
            name: "single_player".to_string(),
            n_instances,
            side_roles: vec![SideRole::Model],
            n_tokens: 2,
            n_fields: 23,
            n_rolls: 20,
        }
    }

    /// Model against the search adversary, one token each.
    pub fn multiplayer(n_instances: usize) -> Self {
        Self {
            name: "multiplayer".to_string(),
            n_instances,
            side_roles: vec![SideRole::Model, SideRole::Programmatic],
            n_tokens: 1,
            n_fields: 23,
            n_rolls: 20,
        }
    }

    pub fn with_tokens(mut self, n_tokens: usize) -> Self {
        self.n_tokens = n_tokens;
        self
    }

    pub fn with_fields(mut self, n_fields: usize) -> Self {
        self.n_fields = n_fields;
        self
    }

    pub fn with_rolls(mut self, n_rolls: usize) -> Self {
        self.n_rolls = n_rolls;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(2..=usize::from(Position::MAX)).contains(&self.n_fields) {
            return Err(LudoError::InvalidBoardSize {
                n_fields: self.n_fields,
            });
        }
        if !(1..=MAX_TOKENS).contains(&self.n_tokens) {
            return Err(LudoError::InvalidTokenCount {
                n_tokens: self.n_tokens,
            });
        }
        if !(1..=MAX_SIDES).contains(&self.side_roles.len()) {
            return Err(LudoError::InvalidSideCount {
                sides: self.side_roles.len(),
            });
        }
        if self.n_rolls == 0 {
            return Err(LudoError::EmptySequence);
        }
        Ok(())
    }
}

/// Produces experiments of solvable instances.
///
/// Each experiment samples from its own fork of the root stream, so growing
/// one experiment leaves the instances of the others unchanged.
#[derive(Clone, Debug)]
pub struct InstanceGenerator {
    config: GeneratorConfig,
    rng: GameRng,
}

impl InstanceGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self { config, rng }
    }

    /// Continue a run from a [`checkpoint`](Self::checkpoint).
    pub fn resume(config: GeneratorConfig, state: &GameRngState) -> Self {
        Self {
            config,
            rng: GameRng::from_state(state),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Position of the root stream.
    #[must_use]
    pub fn checkpoint(&self) -> GameRngState {
        self.rng.state()
    }

    /// Generate every experiment in order.
    pub fn generate(&mut self, experiments: &[ExperimentConfig]) -> Result<InstanceSet> {
        experiments
            .iter()
            .map(|e| self.generate_experiment(e))
            .collect::<Result<Vec<_>>>()
            .map(InstanceSet::new)
    }

    /// Generate one experiment with ids `in001`, `in002`, ...
    pub fn generate_experiment(&mut self, experiment: &ExperimentConfig) -> Result<Experiment> {
        experiment.validate()?;

        let mut rng = self.rng.fork();
        let instances = (1..=experiment.n_instances)
            .map(|index| {
                self.generate_instance(&mut rng, experiment, format!("in{:03}", index))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "generated experiment '{}': {} instance(s), {} side(s), {} token(s), {} fields, {} rolls",
            experiment.name,
            instances.len(),
            experiment.side_roles.len(),
            experiment.n_tokens,
            experiment.n_fields,
            experiment.n_rolls
        );

        Ok(Experiment {
            name: experiment.name.clone(),
            side_roles: experiment.side_roles.clone(),
            instances,
        })
    }

    fn generate_instance(
        &self,
        rng: &mut GameRng,
        experiment: &ExperimentConfig,
        game_id: String,
    ) -> Result<Instance> {
        let n_fields = experiment.n_fields as Position;
        let n_tokens = experiment.n_tokens;
        let n_rolls = experiment.n_rolls;

        let (primary, min_moves) =
            self.sample(rng, SideId::PRIMARY, n_tokens, n_fields, n_rolls)?;

        let rolls = match experiment.side_roles.len() {
            1 => DiceSequence::single(primary)?,
            _ => {
                let (second, _) = self.sample(rng, SideId::new(1), n_tokens, n_fields, n_rolls)?;
                DiceSequence::zip(&primary, &second)?
            }
        };

        Ok(Instance {
            game_id,
            side_roles: experiment.side_roles.clone(),
            prompt_name: experiment.name.clone(),
            n_tokens,
            n_fields,
            rolls,
            min_moves,
        })
    }

    /// Sample from the root stream until a sequence `side` can finish.
    ///
    /// Returns the sequence and its minimum move count.
    pub fn solvable_sequence(
        &mut self,
        side: SideId,
        n_tokens: usize,
        n_fields: Position,
        n_rolls: usize,
    ) -> Result<(Vec<Roll>, u32)> {
        let mut rng = self.rng.clone();
        let found = self.sample(&mut rng, side, n_tokens, n_fields, n_rolls);
        self.rng = rng;
        found
    }

    fn sample(
        &self,
        rng: &mut GameRng,
        side: SideId,
        n_tokens: usize,
        n_fields: Position,
        n_rolls: usize,
    ) -> Result<(Vec<Roll>, u32)> {
        let start = TokenPositions::at_home(&TokenId::for_side(side, n_tokens));

        for attempt in 1..=self.config.max_resamples {
            let oracle = SequenceOracle::new(rng.roll_sequence(n_rolls), n_fields);
            if let Some(min_moves) = oracle.solve(&start, 0).min_moves() {
                trace!("{}: solvable sequence after {} sample(s)", side, attempt);
                return Ok((oracle.rolls().to_vec(), min_moves));
            }
            trace!("{}: sample {} unsolvable, resampling", side, attempt);
        }

        Err(LudoError::NoSolvableSequence {
            n_rolls,
            n_fields: usize::from(n_fields),
            attempts: self.config.max_resamples,
        })
    }
}
