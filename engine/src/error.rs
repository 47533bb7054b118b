use thiserror::Error;

/// Violations detected while constructing an in-memory instance from already
/// parsed data. Parsing text/files is an external collaborator's job; this
/// crate only validates the shape of the values it is handed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstanceError {
    #[error("dimension mismatch: expected {expected}, got {got} in {what}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("index {index} out of range [0, {bound}) in {what}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        bound: usize,
    },
    #[error("duplicate requirement pair ({package}, {dependency})")]
    DuplicateRequirement { package: usize, dependency: usize },
    #[error("duplicate coordinate at point {point}")]
    DuplicateCoordinate { point: usize },
    #[error("negative capacity or size")]
    NegativeQuantity,
}

/// Illegal search configuration, caught before a search loop starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("selection pressure {0} out of range [1, 2]")]
    SelectionPressureOutOfRange(f64),
    #[error("tournament size must be positive")]
    ZeroTournamentSize,
    #[error("population size must be positive")]
    ZeroPopulation,
    #[error("mutation rate {0} out of range [0, 1]")]
    MutationRateOutOfRange(f64),
    #[error("empty neighborhood/refinement-step list")]
    EmptyStepList,
}

pub type InstanceResult<T> = Result<T, InstanceError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
