//! Deterministic A* pathfinding over the room walkability matrix.
//!
//! Search is 8-connected with integer costs: 10 per orthogonal step and 14
//! per diagonal step. Diagonal moves never cut corners: stepping diagonally
//! requires both orthogonally adjacent cells to be walkable as well. The
//! heuristic is octile distance with the same costs, so it is admissible and
//! consistent.
//!
//! Determinism: the open set orders entries by `(f, h, y, x, seq)` where
//! `seq` is the push sequence number, so equal-cost frontiers always expand
//! in the same order and identical inputs yield identical paths.
//!
//! Returned paths include both the start and the goal tile. Callers treat a
//! single-element path (start == goal) as "already there". Paths are
//! computed fresh per call; nothing is cached.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::grid::{RoomGrid, Tile};

const STRAIGHT_COST: i32 = 10;
const DIAGONAL_COST: i32 = 14;

/// Orthogonal neighbors first, then diagonals; fixed order keeps parent
/// assignment deterministic.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// Find a walkable path from `start` to `goal`, inclusive of both.
///
/// Returns `None` when either endpoint is blocked or out of bounds, or when
/// no route exists. `start == goal` yields a single-element path.
pub fn find_path(grid: &RoomGrid, start: Tile, goal: Tile) -> Option<Vec<Tile>> {
    if !grid.is_walkable(start.x, start.y) || !grid.is_walkable(goal.x, goal.y) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let width = grid.width();
    let cells = (width * grid.height()) as usize;
    let index = |t: Tile| (t.y * width + t.x) as usize;

    let mut g_cost = vec![i32::MAX; cells];
    let mut parent: Vec<Option<Tile>> = vec![None; cells];
    let mut closed = vec![false; cells];

    // Min-heap entries: (f, h, y, x, push sequence).
    let mut open: BinaryHeap<Reverse<(i32, i32, i32, i32, u32)>> = BinaryHeap::new();
    let mut seq: u32 = 0;

    let start_h = heuristic(start, goal);
    g_cost[index(start)] = 0;
    open.push(Reverse((start_h, start_h, start.y, start.x, seq)));

    while let Some(Reverse((_, _, y, x, _))) = open.pop() {
        let current = Tile::new(x, y);
        let current_idx = index(current);
        if closed[current_idx] {
            continue;
        }
        closed[current_idx] = true;

        if current == goal {
            return Some(reconstruct(&parent, width, start, goal));
        }

        for (dx, dy) in NEIGHBOR_OFFSETS {
            let nx = x + dx;
            let ny = y + dy;
            if !grid.is_walkable(nx, ny) {
                continue;
            }
            let diagonal = dx != 0 && dy != 0;
            if diagonal && !(grid.is_walkable(nx, y) && grid.is_walkable(x, ny)) {
                continue;
            }

            let neighbor = Tile::new(nx, ny);
            let neighbor_idx = index(neighbor);
            if closed[neighbor_idx] {
                continue;
            }

            let step = if diagonal { DIAGONAL_COST } else { STRAIGHT_COST };
            let tentative = g_cost[current_idx] + step;
            if tentative < g_cost[neighbor_idx] {
                g_cost[neighbor_idx] = tentative;
                parent[neighbor_idx] = Some(current);
                let h = heuristic(neighbor, goal);
                seq += 1;
                open.push(Reverse((tentative + h, h, ny, nx, seq)));
            }
        }
    }

    None
}

/// Octile distance with the search's own step costs.
fn heuristic(from: Tile, to: Tile) -> i32 {
    let dx = (from.x - to.x).abs();
    let dy = (from.y - to.y).abs();
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    DIAGONAL_COST * lo + STRAIGHT_COST * (hi - lo)
}

fn reconstruct(parent: &[Option<Tile>], width: i32, start: Tile, goal: Tile) -> Vec<Tile> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match parent[(current.y * width + current.x) as usize] {
            Some(prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
