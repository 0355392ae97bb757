use glam::Vec2;
use navfield::types::{COST_OBS, POT_HIGH};
use navfield::{CostEncoding, NavFieldPlanner};

fn planner_with_map(
    width: u32,
    height: u32,
    obstacles: &[(u32, u32)],
    goal: (u32, u32),
    start: (u32, u32),
) -> NavFieldPlanner {
    let mut external = vec![0u8; (width * height) as usize];
    for &(x, y) in obstacles {
        external[(y * width + x) as usize] = 254;
    }
    let mut planner = NavFieldPlanner::new(width, height).unwrap();
    planner
        .set_costmap(&external, CostEncoding::Ros, true)
        .unwrap();
    planner.set_goal(goal.0, goal.1).unwrap();
    planner.set_start(start.0, start.1).unwrap();
    planner
}

#[test]
fn setup_seals_border_and_seeds_goal() {
    let mut planner = planner_with_map(10, 10, &[], (5, 5), (2, 2));
    // zero cycles: propagation setup runs, the wave does not move
    planner.plan_dijkstra(0, true);

    for y in 0..10 {
        for x in 0..10 {
            let border = x == 0 || x == 9 || y == 0 || y == 9;
            if border {
                assert_eq!(planner.cost_at(x, y), Some(COST_OBS));
            }
            let expected = if (x, y) == (5, 5) { 0.0 } else { POT_HIGH };
            assert_eq!(planner.potential_at(x, y), Some(expected));
        }
    }
}

#[test]
fn obstacles_never_gain_potential() {
    let wall: Vec<(u32, u32)> = (0..=7).map(|y| (5, y)).collect();
    let mut planner = planner_with_map(10, 10, &wall, (8, 5), (1, 5));
    planner.plan_dijkstra(2000, false);

    let costs = planner.cost_data();
    let pots = planner.potential_data();
    for (k, &cost) in costs.iter().enumerate() {
        if cost >= COST_OBS {
            assert_eq!(pots[k], POT_HIGH, "obstacle cell {k} was reached");
        } else {
            assert!(pots[k] < POT_HIGH, "free cell {k} was never reached");
        }
    }
}

#[test]
fn replanning_is_idempotent() {
    let block: Vec<(u32, u32)> = (6..9).flat_map(|x| (5..8).map(move |y| (x, y))).collect();
    let mut planner = planner_with_map(16, 16, &block, (12, 12), (3, 3));

    assert!(planner.plan_dijkstra(5000, false));
    let first_pot = planner.potential_data().to_vec();
    let first_path = planner.path().to_vec();

    assert!(planner.plan_dijkstra(5000, false));
    assert_eq!(planner.potential_data(), first_pot.as_slice());
    assert_eq!(planner.path(), first_path.as_slice());
}

#[test]
fn paths_translate_with_the_map() {
    let block_a: Vec<(u32, u32)> = (6..8).flat_map(|x| (5..7).map(move |y| (x, y))).collect();
    let mut planner_a = planner_with_map(16, 16, &block_a, (11, 11), (3, 3));
    assert!(planner_a.plan_dijkstra(5000, false));

    let shift = (1u32, 2u32);
    let block_b: Vec<(u32, u32)> = block_a
        .iter()
        .map(|&(x, y)| (x + shift.0, y + shift.1))
        .collect();
    let mut planner_b = planner_with_map(
        16,
        16,
        &block_b,
        (11 + shift.0, 11 + shift.1),
        (3 + shift.0, 3 + shift.1),
    );
    assert!(planner_b.plan_dijkstra(5000, false));

    let path_a = planner_a.path();
    let path_b = planner_b.path();
    assert_eq!(path_a.len(), path_b.len());
    let offset = Vec2::new(shift.0 as f32, shift.1 as f32);
    for (a, b) in path_a.iter().zip(path_b) {
        assert!((*a + offset - *b).length() < 1e-3, "{a:?} + {offset:?} != {b:?}");
    }
}

#[test]
fn reaching_start_implies_connectivity() {
    // flood the whole field, then verify every finite-potential cell can
    // walk downhill to the goal through free cells
    let wall: Vec<(u32, u32)> = (2..18).map(|y| (9, y)).collect();
    let mut planner = planner_with_map(20, 20, &wall, (15, 10), (4, 10));
    assert!(planner.plan_dijkstra(5000, true));

    let pots = planner.potential_data();
    let costs = planner.cost_data();
    let nx = 20usize;
    let goal_cell = 10 * nx + 15;

    let mut k = 4 + 10 * nx;
    assert!(pots[k] < POT_HIGH);
    for _ in 0..10_000 {
        if k == goal_cell {
            break;
        }
        let mut best = k;
        for next in [k - 1, k + 1, k - nx, k + nx] {
            if costs[next] < COST_OBS && pots[next] < pots[best] {
                best = next;
            }
        }
        assert_ne!(best, k, "stuck at cell {k} with potential {}", pots[k]);
        k = best;
    }
    assert_eq!(k, goal_cell);
}
