use crate::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Stay,
    Forward,
    TurnRight,
    TurnLeft,
    TurnAround,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Stay => "stay",
            Action::Forward => "forward",
            Action::TurnRight => "turn_right",
            Action::TurnLeft => "turn_left",
            Action::TurnAround => "turn_around",
        }
    }

    /// Change in orientation, in quarter turns clockwise.
    pub fn rotation(self) -> usize {
        match self {
            Action::Stay | Action::Forward => 0,
            Action::TurnRight => 1,
            Action::TurnAround => 2,
            Action::TurnLeft => 3,
        }
    }
}

/// Which actions an environment exposes and how they are numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionSet {
    /// stay, forward, turn right, turn left, turn around
    Full,
    /// forward, turn right, turn left
    Simple,
}

const FULL: [Action; 5] = [
    Action::Stay,
    Action::Forward,
    Action::TurnRight,
    Action::TurnLeft,
    Action::TurnAround,
];

const SIMPLE: [Action; 3] = [Action::Forward, Action::TurnRight, Action::TurnLeft];

impl ActionSet {
    pub fn actions(self) -> &'static [Action] {
        match self {
            ActionSet::Full => &FULL,
            ActionSet::Simple => &SIMPLE,
        }
    }

    pub fn len(self) -> usize {
        self.actions().len()
    }

    pub fn is_empty(self) -> bool {
        self.actions().is_empty()
    }

    pub fn action(self, a: Discrete) -> Result<Action> {
        self.actions()
            .get(a)
            .copied()
            .ok_or(EnvError::InvalidAction {
                action: a,
                n: self.len(),
            })
    }

    pub fn index_of(self, action: Action) -> Option<Discrete> {
        self.actions().iter().position(|&x| x == action)
    }

    /// Actions that may be executed instead of `a` when it fails.
    pub fn alternatives(self, a: Discrete) -> impl Iterator<Item = Discrete> {
        (0..self.len()).filter(move |&b| b != a)
    }
}
