//! Randomised maze generation and the road/wall grid it produces.

use std::collections::VecDeque;

use maze_runner_core::{Coordinate, MazeDimensions};
use rand::Rng;
use tracing::{debug, warn};

use crate::RestoreError;

/// Contents of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Impassable cell.
    Wall,
    /// Passable cell.
    Road,
}

/// Grid maze with a start cell in the upper-left quadrant and an exit in the
/// lower-right quadrant.
///
/// Generation grows a spanning tree from the start: a frontier wall is only
/// carved while it touches exactly one road, so the carved roads never form a
/// loop and every one of them is reachable from the start. After generation
/// the shape only changes through [`Maze::break_wall`], which is one-way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    dimensions: MazeDimensions,
    tiles: Vec<Tile>,
    start: Coordinate,
    exit: Coordinate,
    roads: Vec<Coordinate>,
}

impl Maze {
    /// Generates a fresh maze using the provided random source.
    pub fn generate<R: Rng + ?Sized>(dimensions: MazeDimensions, rng: &mut R) -> Self {
        Self::generate_observed(dimensions, rng, |_, _| {})
    }

    /// Generates a maze, reporting every carved cell together with the number
    /// of road neighbours it had at the moment it was carved.
    pub(crate) fn generate_observed<R, F>(
        dimensions: MazeDimensions,
        rng: &mut R,
        mut on_carve: F,
    ) -> Self
    where
        R: Rng + ?Sized,
        F: FnMut(Coordinate, usize),
    {
        let mut attempt = 0_u32;
        loop {
            attempt += 1;
            let mut maze = Self::carve(dimensions, rng, &mut on_carve);
            if let Some(exit) = maze.pick_exit(rng) {
                maze.exit = exit;
                debug!(
                    %dimensions,
                    start = %maze.start,
                    exit = %maze.exit,
                    roads = maze.roads.len(),
                    "generated maze"
                );
                return maze;
            }
            warn!(%dimensions, attempt, "exit quadrant has no road, regenerating maze");
        }
    }

    fn carve<R, F>(dimensions: MazeDimensions, rng: &mut R, on_carve: &mut F) -> Self
    where
        R: Rng + ?Sized,
        F: FnMut(Coordinate, usize),
    {
        let width = side(dimensions.width());
        let height = side(dimensions.height());
        let cell_count = usize::try_from(dimensions.area()).unwrap_or(0);
        let start = Coordinate::new(rng.gen_range(0..width / 2), rng.gen_range(0..height / 2));

        let mut maze = Self {
            dimensions,
            tiles: vec![Tile::Wall; cell_count],
            start,
            exit: start,
            roads: Vec::new(),
        };

        let mut frontier = Vec::new();
        maze.set_tile(start, Tile::Road);
        maze.explore(start, &mut frontier);

        while !frontier.is_empty() {
            let index = rng.gen_range(0..frontier.len());
            let candidate = frontier.swap_remove(index);
            let neighbors = maze.surrounding_roads(candidate);
            if neighbors != 1 {
                continue;
            }

            on_carve(candidate, neighbors);
            maze.set_tile(candidate, Tile::Road);
            maze.roads.push(candidate);
            maze.explore(candidate, &mut frontier);
        }

        maze
    }

    /// Chooses uniformly among the road cells of the exit quadrant.
    fn pick_exit<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coordinate> {
        let width = side(self.dimensions.width());
        let height = side(self.dimensions.height());
        let candidates: Vec<Coordinate> = (height / 2..height)
            .flat_map(|y| (width / 2..width).map(move |x| Coordinate::new(x, y)))
            .filter(|cell| self.is_road(*cell))
            .collect();

        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.gen_range(0..candidates.len())])
    }

    fn explore(&self, cell: Coordinate, frontier: &mut Vec<Coordinate>) {
        for neighbor in cell.neighbors() {
            if self.is_in_range(neighbor) && self.is_wall(neighbor) {
                frontier.push(neighbor);
            }
        }
    }

    fn surrounding_roads(&self, cell: Coordinate) -> usize {
        cell.neighbors()
            .into_iter()
            .filter(|neighbor| self.is_road(*neighbor))
            .count()
    }

    /// Rebuilds a maze from persisted parts.
    ///
    /// `roads` lists the carved cells in carve order; when empty it is derived
    /// from the grid in row-major order, leaving out the start cell.
    pub fn from_parts(
        dimensions: MazeDimensions,
        tiles: Vec<Tile>,
        start: Coordinate,
        exit: Coordinate,
        roads: Vec<Coordinate>,
    ) -> Result<Self, RestoreError> {
        let expected = usize::try_from(dimensions.area()).unwrap_or(0);
        if tiles.len() != expected {
            return Err(RestoreError::GridSize {
                expected,
                actual: tiles.len(),
            });
        }

        let mut maze = Self {
            dimensions,
            tiles,
            start,
            exit,
            roads,
        };

        let width = side(dimensions.width());
        let height = side(dimensions.height());
        if !maze.is_road(start) || start.x() >= width / 2 || start.y() >= height / 2 {
            return Err(RestoreError::InvalidStart(start));
        }
        if !maze.is_road(exit) || exit.x() < width / 2 || exit.y() < height / 2 {
            return Err(RestoreError::InvalidExit(exit));
        }
        if let Some(cell) = maze.roads.iter().copied().find(|cell| !maze.is_road(*cell)) {
            return Err(RestoreError::NotARoad(cell));
        }
        if maze.distance(start, exit).is_none() {
            return Err(RestoreError::ExitUnreachable(exit));
        }

        if maze.roads.is_empty() {
            maze.roads = (0..height)
                .flat_map(|y| (0..width).map(move |x| Coordinate::new(x, y)))
                .filter(|cell| *cell != start && maze.is_road(*cell))
                .collect();
        }

        Ok(maze)
    }

    /// Dimensions of the maze.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.dimensions.width()
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.dimensions.height()
    }

    /// Cell the player enters the maze on.
    #[must_use]
    pub const fn start(&self) -> Coordinate {
        self.start
    }

    /// Cell that completes the level.
    #[must_use]
    pub const fn exit(&self) -> Coordinate {
        self.exit
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub fn is_in_range(&self, cell: Coordinate) -> bool {
        self.index(cell).is_some()
    }

    /// Tile stored at the coordinate, if it lies inside the grid.
    #[must_use]
    pub fn tile(&self, cell: Coordinate) -> Option<Tile> {
        self.index(cell).and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether the in-range coordinate is a wall.
    ///
    /// Out-of-range coordinates are neither walls nor roads.
    #[must_use]
    pub fn is_wall(&self, cell: Coordinate) -> bool {
        self.tile(cell) == Some(Tile::Wall)
    }

    /// Reports whether the coordinate is an in-range road.
    #[must_use]
    pub fn is_road(&self, cell: Coordinate) -> bool {
        self.tile(cell) == Some(Tile::Road)
    }

    /// Number of cells carved after the start cell.
    #[must_use]
    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    /// Carved cell at the given position of the carve order.
    #[must_use]
    pub fn road(&self, index: usize) -> Option<Coordinate> {
        self.roads.get(index).copied()
    }

    /// Carved cells in carve order, excluding the start cell.
    #[must_use]
    pub fn roads(&self) -> &[Coordinate] {
        &self.roads
    }

    /// Tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Turns an in-range wall into a road. Returns `true` when the cell changed.
    pub fn break_wall(&mut self, cell: Coordinate) -> bool {
        if !self.is_wall(cell) {
            return false;
        }
        self.set_tile(cell, Tile::Road);
        true
    }

    /// Length of the shortest road path between two cells, if one exists.
    #[must_use]
    pub fn distance(&self, from: Coordinate, to: Coordinate) -> Option<u32> {
        let from_index = self.index(from)?;
        let to_index = self.index(to)?;
        if !self.is_road(from) {
            return None;
        }

        let mut distances = vec![u32::MAX; self.tiles.len()];
        distances[from_index] = 0;
        let mut queue = VecDeque::from([from]);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = self.index(cell) else {
                continue;
            };
            let next_distance = distances[current_index] + 1;

            for neighbor in cell.neighbors() {
                if !self.is_road(neighbor) {
                    continue;
                }
                let Some(neighbor_index) = self.index(neighbor) else {
                    continue;
                };
                if distances[neighbor_index] <= next_distance {
                    continue;
                }
                distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }

        Some(distances[to_index]).filter(|distance| *distance != u32::MAX)
    }

    fn set_tile(&mut self, cell: Coordinate, tile: Tile) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = tile;
            }
        }
    }

    fn index(&self, cell: Coordinate) -> Option<usize> {
        let column = usize::try_from(cell.x()).ok()?;
        let row = usize::try_from(cell.y()).ok()?;
        let width = usize::try_from(self.dimensions.width()).ok()?;
        let height = usize::try_from(self.dimensions.height()).ok()?;
        if column >= width || row >= height {
            return None;
        }
        row.checked_mul(width)?.checked_add(column)
    }
}

fn side(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dimensions(width: u32, height: u32) -> MazeDimensions {
        MazeDimensions::new(width, height).expect("valid dimensions")
    }

    fn all_cells(maze: &Maze) -> Vec<Coordinate> {
        let width = side(maze.width());
        let height = side(maze.height());
        (0..height)
            .flat_map(|y| (0..width).map(move |x| Coordinate::new(x, y)))
            .collect()
    }

    #[test]
    fn every_road_is_reachable_from_start() {
        for seed in 0..40 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let maze = Maze::generate(dimensions(18, 18), &mut rng);
            for road in maze.roads() {
                assert!(
                    maze.distance(maze.start(), *road).is_some(),
                    "seed {seed}: road {road} unreachable"
                );
            }
        }
    }

    #[test]
    fn start_and_exit_stay_in_their_quadrants() {
        for seed in 0..40 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let maze = Maze::generate(dimensions(12, 8), &mut rng);
            let start = maze.start();
            let exit = maze.exit();
            assert!(start.x() < 6 && start.y() < 4, "seed {seed}: start {start}");
            assert!(exit.x() >= 6 && exit.x() <= 11, "seed {seed}: exit {exit}");
            assert!(exit.y() >= 4 && exit.y() <= 7, "seed {seed}: exit {exit}");
            assert!(maze.is_road(start));
            assert!(!maze.is_wall(exit));
        }
    }

    #[test]
    fn cells_are_only_carved_next_to_a_single_road() {
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut carved = 0;
            let maze = Maze::generate_observed(dimensions(14, 10), &mut rng, |cell, neighbors| {
                carved += 1;
                assert_eq!(neighbors, 1, "seed {seed}: {cell} carved with {neighbors} roads");
            });
            assert!(carved >= maze.road_count());
        }
    }

    #[test]
    fn carved_roads_form_a_tree() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let maze = Maze::generate(dimensions(20, 16), &mut rng);
        let cells = all_cells(&maze);
        let road_cells = cells.iter().filter(|cell| maze.is_road(**cell)).count();
        let edges = cells
            .iter()
            .filter(|cell| maze.is_road(**cell))
            .map(|cell| {
                [
                    cell.stepped(maze_runner_core::Direction::Right, 1),
                    cell.stepped(maze_runner_core::Direction::Down, 1),
                ]
                .into_iter()
                .filter(|neighbor| maze.is_road(*neighbor))
                .count()
            })
            .sum::<usize>();

        assert_eq!(road_cells, maze.road_count() + 1);
        assert_eq!(edges, road_cells - 1);
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let first = Maze::generate(dimensions(16, 16), &mut ChaCha8Rng::seed_from_u64(3));
        let second = Maze::generate(dimensions(16, 16), &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(first, second);
    }

    #[test]
    fn start_is_not_listed_among_carved_roads() {
        let maze = Maze::generate(dimensions(10, 10), &mut ChaCha8Rng::seed_from_u64(11));
        assert!(!maze.roads().contains(&maze.start()));
        assert_eq!(maze.road(0), maze.roads().first().copied());
        assert_eq!(maze.road(maze.road_count()), None);
    }

    #[test]
    fn range_checks_reject_negative_and_overflowing_cells() {
        let maze = Maze::generate(dimensions(6, 6), &mut ChaCha8Rng::seed_from_u64(1));
        assert!(!maze.is_in_range(Coordinate::new(-1, 0)));
        assert!(!maze.is_in_range(Coordinate::new(0, 6)));
        assert!(maze.is_in_range(Coordinate::new(5, 5)));
        assert_eq!(maze.tile(Coordinate::new(6, 0)), None);
        assert!(!maze.is_wall(Coordinate::new(6, 0)));
    }

    #[test]
    fn break_wall_only_flips_walls() {
        let mut maze = Maze::generate(dimensions(8, 8), &mut ChaCha8Rng::seed_from_u64(5));
        let wall = all_cells(&maze)
            .into_iter()
            .find(|cell| maze.is_wall(*cell))
            .expect("maze has walls");

        assert!(maze.break_wall(wall));
        assert!(maze.is_road(wall));
        assert!(!maze.break_wall(wall));
        assert!(!maze.break_wall(maze.start()));
        assert!(!maze.break_wall(Coordinate::new(-1, -1)));
    }

    #[test]
    fn from_parts_round_trips_a_generated_maze() {
        let maze = Maze::generate(dimensions(10, 8), &mut ChaCha8Rng::seed_from_u64(9));
        let rebuilt = Maze::from_parts(
            maze.dimensions(),
            maze.tiles().to_vec(),
            maze.start(),
            maze.exit(),
            maze.roads().to_vec(),
        )
        .expect("valid parts");
        assert_eq!(rebuilt, maze);
    }

    #[test]
    fn from_parts_rejects_wrong_grid_size() {
        let result = Maze::from_parts(
            dimensions(6, 6),
            vec![Tile::Road; 10],
            Coordinate::new(0, 0),
            Coordinate::new(5, 5),
            Vec::new(),
        );
        assert_eq!(
            result,
            Err(RestoreError::GridSize {
                expected: 36,
                actual: 10
            })
        );
    }

    #[test]
    fn from_parts_rejects_exit_on_wall() {
        let mut tiles = vec![Tile::Road; 36];
        tiles[35] = Tile::Wall;
        let result = Maze::from_parts(
            dimensions(6, 6),
            tiles,
            Coordinate::new(0, 0),
            Coordinate::new(5, 5),
            Vec::new(),
        );
        assert_eq!(result, Err(RestoreError::InvalidExit(Coordinate::new(5, 5))));
    }

    #[test]
    fn from_parts_derives_roads_when_missing() {
        let maze = Maze::from_parts(
            dimensions(6, 6),
            vec![Tile::Road; 36],
            Coordinate::new(0, 0),
            Coordinate::new(5, 5),
            Vec::new(),
        )
        .expect("open maze");
        assert_eq!(maze.road_count(), 35);
        assert_eq!(maze.road(0), Some(Coordinate::new(1, 0)));
    }

    #[test]
    fn distance_counts_steps_along_roads() {
        let maze = Maze::from_parts(
            dimensions(6, 6),
            vec![Tile::Road; 36],
            Coordinate::new(0, 0),
            Coordinate::new(5, 5),
            Vec::new(),
        )
        .expect("open maze");
        assert_eq!(maze.distance(Coordinate::new(0, 0), Coordinate::new(5, 5)), Some(10));
    }
}
