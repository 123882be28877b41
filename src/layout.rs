use crate::common::utils::N_WALL_OBSERVATIONS;
use crate::*;
use itertools::{iproduct, Itertools};
use std::collections::HashMap;
use std::fmt;

const HALLWAY: &str = "\
...........
##v#v#v#G##";

const HALLWAY2: &str = "\
#.....#
..#.#..
#.#.#.#
..#.#.G
#.....#";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Up,
    Right,
    Down,
    Left,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Up,
        Orientation::Right,
        Orientation::Down,
        Orientation::Left,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % 4]
    }

    /// Quarter turns clockwise.
    pub fn rotate(self, quarter_turns: usize) -> Self {
        Self::from_index(self.index() + quarter_turns)
    }

    fn delta(self) -> (isize, isize) {
        match self {
            Orientation::Up => (-1, 0),
            Orientation::Right => (0, 1),
            Orientation::Down => (1, 0),
            Orientation::Left => (0, -1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Blocked,
    Open,
    Landmark,
    Goal,
}

impl Tile {
    fn parse(c: char, row: usize) -> Result<Self> {
        match c {
            '#' => Ok(Tile::Blocked),
            '.' => Ok(Tile::Open),
            'v' => Ok(Tile::Landmark),
            'G' => Ok(Tile::Goal),
            _ => Err(EnvError::InvalidLayout(format!(
                "unknown tile '{c}' in row {row}"
            ))),
        }
    }

    fn as_char(self) -> char {
        match self {
            Tile::Blocked => '#',
            Tile::Open => '.',
            Tile::Landmark => 'v',
            Tile::Goal => 'G',
        }
    }
}

/// Order in which cells are numbered when building state indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOrder {
    RowMajor,
    ColumnMajor,
}

/// Where the agent is: a heading inside a grid cell, or the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pose {
    Heading {
        row: usize,
        col: usize,
        orientation: Orientation,
    },
    Goal,
}

/// A grid of cells, each entered in one of four orientations, with a single goal cell.
///
/// State `4 * rank + orientation` is the agent in the cell with the given rank in
/// [`CellOrder`]. The goal cell takes a single index and shifts later cells by one.
#[derive(Debug, Clone)]
pub struct Layout {
    tiles: Vec<Vec<Tile>>,
    poses: Vec<Pose>,
    lookup: HashMap<Pose, Discrete>,
    walls: Vec<[bool; 4]>,
    forward: Vec<Discrete>,
    landmarks: Vec<Discrete>,
    goal: Discrete,
}

impl Layout {
    /// The 57 state hallway of Littman, Cassandra & Kaelbling (1995).
    pub fn hallway() -> Self {
        Self::parse(HALLWAY, CellOrder::ColumnMajor)
            .expect("built-in hallway map is valid")
    }

    /// The 89 state hallway2 of Littman, Cassandra & Kaelbling (1995).
    pub fn hallway2() -> Self {
        Self::parse(HALLWAY2, CellOrder::RowMajor)
            .expect("built-in hallway2 map is valid")
    }

    pub fn parse(map: &str, order: CellOrder) -> Result<Self> {
        let tiles = map
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .enumerate()
            .map(|(r, l)| l.chars().map(|c| Tile::parse(c, r)).collect())
            .collect::<Result<Vec<Vec<_>>>>()?;

        let width = tiles.first().map(Vec::len).unwrap_or_default();
        if width == 0 {
            return Err(EnvError::InvalidLayout("map is empty".into()));
        }
        if let Some(r) = tiles.iter().position(|row| row.len() != width) {
            return Err(EnvError::InvalidLayout(format!(
                "row {r} has {} tiles, expected {width}",
                tiles[r].len()
            )));
        }

        let mut cells = iproduct!(0..tiles.len(), 0..width)
            .map(|(r, c)| (r, c, tiles[r][c]))
            .filter(|&(_, _, t)| t != Tile::Blocked)
            .collect::<Vec<_>>();
        if order == CellOrder::ColumnMajor {
            cells.sort_by_key(|&(r, c, _)| (c, r));
        }

        let goals = cells.iter().filter(|(_, _, t)| *t == Tile::Goal).count();
        if goals != 1 {
            return Err(EnvError::InvalidLayout(format!(
                "expected exactly one goal, found {goals}"
            )));
        }
        if cells.len() < 2 {
            return Err(EnvError::InvalidLayout("no cell besides the goal".into()));
        }

        let poses = cells
            .iter()
            .flat_map(|&(row, col, t)| match t {
                Tile::Goal => vec![Pose::Goal],
                _ => Orientation::ALL
                    .iter()
                    .map(|&orientation| Pose::Heading {
                        row,
                        col,
                        orientation,
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();
        let lookup = poses
            .iter()
            .enumerate()
            .map(|(s, &p)| (p, s))
            .collect::<HashMap<_, _>>();
        let goal = lookup[&Pose::Goal];

        let mut layout = Self {
            tiles,
            poses,
            lookup,
            walls: vec![],
            forward: vec![],
            landmarks: vec![],
            goal,
        };

        layout.walls = (0..layout.n_states())
            .map(|s| layout.derive_walls(s))
            .collect();
        layout.forward = (0..layout.n_states())
            .map(|s| layout.derive_forward(s))
            .collect();
        layout.landmarks = (0..layout.n_states())
            .filter(|&s| layout.faces_landmark(s))
            .collect();

        Ok(layout)
    }

    pub fn n_states(&self) -> usize {
        self.poses.len()
    }

    /// Wall readings 0..16, one symbol per landmark, then the goal symbol.
    pub fn n_observations(&self) -> usize {
        N_WALL_OBSERVATIONS + self.landmarks.len() + 1
    }

    pub fn goal(&self) -> Discrete {
        self.goal
    }

    pub fn goal_observation(&self) -> Discrete {
        self.n_observations() - 1
    }

    pub fn is_goal(&self, s: Discrete) -> bool {
        s == self.goal
    }

    pub fn non_terminal_states(&self) -> impl Iterator<Item = Discrete> + '_ {
        (0..self.n_states()).filter(move |&s| s != self.goal)
    }

    pub fn pose(&self, s: Discrete) -> Option<Pose> {
        self.poses.get(s).copied()
    }

    pub fn state(&self, pose: Pose) -> Option<Discrete> {
        self.lookup.get(&pose).copied()
    }

    /// Walls in front, to the right, behind and to the left of the agent.
    pub fn walls(&self, s: Discrete) -> Option<[bool; 4]> {
        self.walls.get(s).copied()
    }

    pub fn forward(&self, s: Discrete) -> Option<Discrete> {
        self.forward.get(s).copied()
    }

    pub fn turn(&self, s: Discrete, quarter_turns: usize) -> Option<Discrete> {
        match self.pose(s)? {
            Pose::Heading {
                row,
                col,
                orientation,
            } => self.heading(row, col, orientation.rotate(quarter_turns)),
            Pose::Goal => Some(s),
        }
    }

    pub fn landmarks(&self) -> &[Discrete] {
        &self.landmarks
    }

    /// Observation symbol reserved for a landmark state.
    pub fn landmark_observation(&self, s: Discrete) -> Option<Discrete> {
        self.landmarks
            .iter()
            .position(|&l| l == s)
            .map(|i| N_WALL_OBSERVATIONS + i)
    }

    fn heading(&self, row: usize, col: usize, orientation: Orientation) -> Option<Discrete> {
        self.state(Pose::Heading {
            row,
            col,
            orientation,
        })
    }

    fn neighbour(&self, row: usize, col: usize, dir: Orientation) -> Option<(usize, usize, Tile)> {
        let (dr, dc) = dir.delta();
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        let t = *self.tiles.get(r)?.get(c)?;
        (t != Tile::Blocked).then_some((r, c, t))
    }

    fn derive_walls(&self, s: Discrete) -> [bool; 4] {
        match self.poses[s] {
            Pose::Heading {
                row,
                col,
                orientation,
            } => {
                let mut walls = [false; 4];
                for (i, w) in walls.iter_mut().enumerate() {
                    *w = self.neighbour(row, col, orientation.rotate(i)).is_none();
                }
                walls
            }
            Pose::Goal => [false; 4],
        }
    }

    fn derive_forward(&self, s: Discrete) -> Discrete {
        match self.poses[s] {
            Pose::Heading {
                row,
                col,
                orientation,
            } => match self.neighbour(row, col, orientation) {
                Some((_, _, Tile::Goal)) => self.goal,
                Some((row, col, _)) => self.heading(row, col, orientation).unwrap_or(s),
                None => s,
            },
            Pose::Goal => s,
        }
    }

    /// Facing south towards a landmark tile.
    fn faces_landmark(&self, s: Discrete) -> bool {
        match self.poses[s] {
            Pose::Heading {
                row,
                col,
                orientation: Orientation::Down,
            } => self.tiles[row][col] == Tile::Landmark,
            _ => false,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let map = self
            .tiles
            .iter()
            .map(|row| row.iter().map(|t| t.as_char()).collect::<String>())
            .join("\n");
        write!(f, "{map}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use rstest::rstest;

    #[test]
    fn hallway_matches_reference_numbering() {
        let l = Layout::hallway();
        assert_eq!(l.n_states(), 57);
        assert_eq!(l.goal(), 48);
        assert_eq!(l.n_observations(), 20);
        assert_eq!(l.landmarks(), &[14, 26, 38]);
    }

    #[test]
    fn hallway2_matches_reference_numbering() {
        let l = Layout::hallway2();
        assert_eq!(l.n_states(), 89);
        assert_eq!(l.goal(), 68);
        assert_eq!(l.n_observations(), 17);
        assert!(l.landmarks().is_empty());
    }

    #[rstest]
    // corridor, facing up
    #[case(4, [true, false, true, false])]
    // alcove facing up into the corridor
    #[case(12, [false, true, true, true])]
    // junction above an alcove, facing left
    #[case(11, [false, true, false, false])]
    // right end of the corridor, facing left
    #[case(56, [false, true, true, true])]
    fn hallway_walls_are_relative_to_heading(#[case] s: Discrete, #[case] expected: [bool; 4]) {
        assert_eq!(Layout::hallway().walls(s), Some(expected));
    }

    #[rstest]
    #[case(9, 17)]
    #[case(12, 8)]
    #[case(10, 14)]
    #[case(46, 48)]
    #[case(0, 0)]
    #[case(48, 48)]
    fn hallway_forward_moves(#[case] s: Discrete, #[case] expected: Discrete) {
        assert_eq!(Layout::hallway().forward(s), Some(expected));
    }

    #[test]
    fn hallway2_goal_is_entered_from_the_left_only() {
        let l = Layout::hallway2();
        let into_goal = (0..l.n_states())
            .filter(|&s| s != l.goal() && l.forward(s) == Some(l.goal()))
            .collect::<Vec<_>>();
        assert_eq!(into_goal, vec![65]);
    }

    #[test]
    fn turns_stay_in_the_same_cell() {
        let l = Layout::hallway2();
        assert_eq!(l.turn(0, 1), Some(1));
        assert_eq!(l.turn(0, 3), Some(3));
        assert_eq!(l.turn(3, 1), Some(0));
        assert_eq!(l.turn(70, 2), Some(72));
        assert_eq!(l.turn(l.goal(), 1), Some(l.goal()));
    }

    #[test]
    fn out_of_range_states_have_no_geometry() {
        let l = Layout::hallway();
        assert_eq!(l.walls(57), None);
        assert_eq!(l.forward(57), None);
        assert_eq!(l.turn(57, 1), None);
        assert_eq!(l.pose(57), None);
    }

    #[test]
    fn poses_round_trip_through_state_indices() {
        let l = Layout::hallway();
        for s in 0..l.n_states() {
            assert_eq!(l.state(l.pose(s).unwrap()), Some(s));
        }
    }

    #[test]
    fn layouts_display_their_maps() {
        assert_snapshot!(Layout::hallway().to_string(), @r###"
        ...........
        ##v#v#v#G##
        "###);
        assert_snapshot!(Layout::hallway2().to_string(), @r###"
        #.....#
        ..#.#..
        #.#.#.#
        ..#.#.G
        #.....#
        "###);
    }

    #[rstest]
    #[case("...\n.G", "row 1 has 2 tiles, expected 3")]
    #[case("...\n..x", "unknown tile 'x' in row 1")]
    #[case("....", "expected exactly one goal, found 0")]
    #[case("G.G", "expected exactly one goal, found 2")]
    #[case("#G#", "no cell besides the goal")]
    #[case("", "map is empty")]
    fn rejects_malformed_maps(#[case] map: &str, #[case] reason: &str) {
        let err = Layout::parse(map, CellOrder::RowMajor).unwrap_err();
        assert_eq!(err.to_string(), format!("Invalid layout: {reason}"));
    }
}
