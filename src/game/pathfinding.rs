//! A* search over the hex grid.
//!
//! Step cost is the Euclidean distance between neighboring cell centers,
//! scaled by 10; the heuristic is the straight-line distance to the goal on
//! the same scale. Every neighbor is exactly one unit away, so the
//! heuristic never overestimates and the hop count of the returned path is
//! the true shortest hop count on an obstacle-free board.

// Distances are small, non-negative and only ever truncated to whole units.
#![allow(clippy::cast_possible_truncation)]

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::game::{Point, Territory};

/// Distance units per cell step.
const SCALE: f64 = 10.0;

/// Scaled straight-line distance between two cell centers.
fn euclid(a: Point, b: Point) -> f64 {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    (ax - bx).hypot(ay - by) * SCALE
}

/// Cost of a single step between neighbors.
fn step_cost(from: Point, to: Point) -> i64 {
    euclid(from, to).round() as i64
}

/// Lower bound on the cost from `from` to `goal`.
fn heuristic(from: Point, goal: Point) -> i64 {
    (euclid(from, goal) - 1e-6).floor().max(0.0) as i64
}

/// Number of steps on a shortest path from `start` to `goal`.
///
/// Returns `Some(0)` when `start == goal` and `None` when either end is off
/// the board or no path exists.
#[must_use]
pub fn shortest_distance(territory: &Territory, start: Point, goal: Point) -> Option<u32> {
    if !territory.in_bounds(start) || !territory.in_bounds(goal) {
        return None;
    }
    if start == goal {
        return Some(0);
    }

    let mut open = BinaryHeap::new();
    let mut best_cost: HashMap<Point, i64> = HashMap::new();
    let mut came_from: HashMap<Point, Point> = HashMap::new();

    best_cost.insert(start, 0);
    // Ties on f are broken towards the larger g, i.e. deeper nodes first.
    open.push(Reverse((heuristic(start, goal), Reverse(0_i64), start)));

    while let Some(Reverse((_, Reverse(cost), current))) = open.pop() {
        if current == goal {
            return Some(path_length(&came_from, start, goal));
        }
        if best_cost.get(&current).is_some_and(|&known| cost > known) {
            continue;
        }

        for next in territory.neighbors(current) {
            if next == start {
                continue;
            }
            let tentative = cost + step_cost(current, next);
            if best_cost.get(&next).is_some_and(|&known| known <= tentative) {
                continue;
            }
            best_cost.insert(next, tentative);
            came_from.insert(next, current);
            open.push(Reverse((
                tentative + heuristic(next, goal),
                Reverse(tentative),
                next,
            )));
        }
    }

    None
}

/// Walk `came_from` back from `goal` and count the steps.
fn path_length(came_from: &HashMap<Point, Point>, start: Point, goal: Point) -> u32 {
    let mut steps = 0;
    let mut at = goal;
    while at != start {
        match came_from.get(&at) {
            Some(&prev) => at = prev,
            None => break,
        }
        steps += 1;
    }
    steps
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;

    /// Plain breadth-first hop count, for comparison.
    fn bfs(territory: &Territory, start: Point, goal: Point) -> Option<u32> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0)]);
        while let Some((p, d)) = queue.pop_front() {
            if p == goal {
                return Some(d);
            }
            for n in territory.neighbors(p) {
                if seen.insert(n) {
                    queue.push_back((n, d + 1));
                }
            }
        }
        None
    }

    #[test]
    fn test_same_cell() {
        let territory = Territory::new(4, 4, 100).unwrap();
        assert_eq!(shortest_distance(&territory, Point::new(1, 1), Point::new(1, 1)), Some(0));
    }

    #[test]
    fn test_neighbors_are_one_step() {
        let territory = Territory::new(4, 4, 100).unwrap();
        let start = Point::new(1, 1);
        for n in territory.neighbors(start) {
            assert_eq!(shortest_distance(&territory, start, n), Some(1));
        }
    }

    #[test]
    fn test_known_distance() {
        let territory = Territory::new(4, 4, 100).unwrap();
        // (0,1) -> (1,2) -> (2,2) -> (3,3)
        assert_eq!(shortest_distance(&territory, Point::new(0, 1), Point::new(3, 3)), Some(3));
    }

    #[test]
    fn test_off_board() {
        let territory = Territory::new(4, 4, 100).unwrap();
        assert_eq!(shortest_distance(&territory, Point::new(0, 0), Point::new(4, 0)), None);
    }

    #[test]
    fn test_matches_bfs_everywhere() {
        let territory = Territory::new(7, 6, 100).unwrap();
        let points: Vec<_> = territory.regions().iter().map(|r| r.location).collect();
        for &a in &points {
            for &b in &points {
                assert_eq!(
                    shortest_distance(&territory, a, b),
                    bfs(&territory, a, b),
                    "{a:?} -> {b:?}"
                );
            }
        }
    }
}
