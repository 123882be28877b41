//! The Hallway and Hallway2 POMDP benchmark domains as gym-style environments.
//!
//! Refer: Littman, Cassandra & Kaelbling, "Learning policies for partially
//! observable environments: Scaling up", ICML 1995.

extern crate itertools;
extern crate ndarray;
extern crate rand;
extern crate serde;
extern crate serde_json;

pub mod actions;
pub mod common;
pub mod config;
pub mod env;
pub mod episodes;
pub mod error;
pub mod layout;
pub mod model;
pub mod policy;
pub mod registry;
pub mod sampling;

pub use actions::*;
pub use common::defs::*;
pub use config::*;
pub use env::*;
pub use error::*;
pub use layout::*;
pub use model::*;
pub use registry::*;

use serde_json::Value;
use std::collections::HashMap;

pub type Discrete = usize;
pub type Continous = f64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub next_state: Discrete,
    pub probability: Continous,
    pub reward: Continous,
    pub done: bool,
}

pub type Transitions = HashMap<(Discrete, Discrete), Vec<Transition>>;

#[derive(Debug, Clone, serde::Serialize)]
pub struct StepInfo {
    pub observation: Discrete,
    pub reward: Continous,
    pub truncated: bool,
    pub terminated: bool,
    pub info: Value,
}

impl StepInfo {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// The reset/step contract shared by all environments in this crate.
pub trait Env {
    fn name(&self) -> &str;

    /// Refer: https://gymnasium.farama.org/api/env/#gymnasium.Env.action_space
    fn action_space(&self) -> &DiscreteSpace;

    /// Refer: https://gymnasium.farama.org/api/env/#gymnasium.Env.observation_space
    fn observation_space(&self) -> &DiscreteSpace;

    /// Refer: https://gymnasium.farama.org/api/env/#gymnasium.Env.reward_range
    fn reward_range(&self) -> (Continous, Continous);

    fn reset(&mut self, seed: Option<u64>) -> Discrete;

    fn step(&mut self, action: Discrete) -> Result<StepInfo>;
}
