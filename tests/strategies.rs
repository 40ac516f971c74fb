use stepwise_search::algorithms::{path_cost, Algorithm, Solver, SolverParams};
use stepwise_search::grid::{Grid, Position};
use stepwise_search::snapshot::Snapshot;
use stepwise_search::statistics::{optimal_path_cost, optimal_path_length};

fn run(algorithm: Algorithm, grid: &mut Grid, params: &SolverParams) -> (Snapshot, usize) {
    let mut strategy = algorithm.create(grid, params);
    let mut calls = 0;
    loop {
        calls += 1;
        let snapshot = strategy.advance(grid);
        if snapshot.is_terminal() {
            assert!(strategy.is_finished());
            return (snapshot, calls);
        }
        assert!(calls < 100_000, "{} did not terminate", algorithm);
    }
}

fn assert_valid_path(grid: &Grid, path: &[Position]) {
    assert_eq!(path.first(), Some(&grid.start()));
    assert_eq!(path.last(), Some(&grid.target()));
    for pair in path.windows(2) {
        assert!(
            grid.neighbors(&pair[0]).contains(&pair[1]),
            "{:?} -> {:?} is not a legal move",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn five_by_five_bfs_takes_the_diagonal() {
    let mut grid = Grid::with_endpoints(5, 5, Position::new(0, 0), Position::new(4, 4)).unwrap();

    let (snapshot, _) = run(Algorithm::Bfs, &mut grid, &SolverParams::default());

    let path = snapshot.path.unwrap();
    assert_eq!(path[0], Position::new(0, 0));
    assert_eq!(path[path.len() - 1], Position::new(4, 4));
    // Four Down-Right moves.
    assert_eq!(path.len(), 5);
}

#[test]
fn bfs_is_never_longer_than_any_other_strategy() {
    let params = SolverParams {
        seed: Some(3),
        ..SolverParams::default()
    };
    let endpoints = [
        (Position::new(0, 0), Position::new(9, 9)),
        (Position::new(9, 0), Position::new(0, 9)),
        (Position::new(2, 7), Position::new(8, 1)),
    ];

    for (start, target) in endpoints {
        let mut grid = Grid::with_endpoints(10, 10, start, target).unwrap();
        let bfs_len = run(Algorithm::Bfs, &mut grid, &params).0.path_len();
        assert_eq!(Some(bfs_len), optimal_path_length(&grid));

        for algorithm in Algorithm::ALL {
            let (snapshot, _) = run(algorithm, &mut grid, &params);
            if snapshot.is_success() {
                let path = snapshot.path.unwrap();
                assert_valid_path(&grid, &path);
                assert!(bfs_len <= path.len(), "{} beat BFS", algorithm);
            }
        }
    }
}

#[test]
fn complete_strategies_find_a_walled_target() {
    let mut grid = Grid::with_endpoints(9, 9, Position::new(0, 0), Position::new(8, 8)).unwrap();
    // A wall across row 4 with a single gap at the far left.
    for col in 1..9 {
        grid.toggle_blocked(Position::new(4, col), true);
    }

    // With a limit past the cell count, iterative deepening ends in a full DFS.
    let params = SolverParams {
        seed: Some(17),
        max_depth: grid.cell_count(),
        ..SolverParams::default()
    };
    for algorithm in [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::RandomizedDfs,
        Algorithm::Ucs,
        Algorithm::IterativeDeepening,
        Algorithm::Bidirectional,
        Algorithm::Scout,
    ] {
        let (snapshot, _) = run(algorithm, &mut grid, &params);
        assert!(snapshot.is_success(), "{} missed the gap", algorithm);
        let path = snapshot.path.unwrap();
        assert_valid_path(&grid, &path);
        assert!(path.contains(&Position::new(4, 0)));
    }
}

#[test]
fn every_strategy_reports_an_unreachable_target() {
    let mut grid = Grid::with_endpoints(6, 6, Position::new(0, 0), Position::new(5, 5)).unwrap();
    for row in 0..6 {
        grid.toggle_blocked(Position::new(row, 3), true);
    }

    for algorithm in Algorithm::ALL {
        let (snapshot, calls) = run(algorithm, &mut grid, &SolverParams::default());
        assert!(snapshot.is_exhausted(), "{} claimed a path", algorithm);
        assert_eq!(snapshot.path, Some(vec![]));
        if algorithm != Algorithm::IterativeDeepening {
            assert!(calls <= grid.cell_count() + 1);
        }
    }
}

#[test]
fn ucs_finds_the_cheapest_route_and_repeats_it() {
    let mut grid = Grid::with_endpoints(8, 8, Position::new(7, 0), Position::new(0, 7)).unwrap();
    for row in 1..7 {
        grid.toggle_blocked(Position::new(row, 4), true);
    }

    let first = run(Algorithm::Ucs, &mut grid, &SolverParams::default()).0;
    let second = run(Algorithm::Ucs, &mut grid, &SolverParams::default()).0;

    let path = first.path.clone().unwrap();
    assert_valid_path(&grid, &path);
    let optimal = optimal_path_cost(&grid).unwrap();
    assert!((path_cost(&path) - optimal).abs() < 1e-6);
    assert_eq!(first, second);
}

#[test]
fn depth_bounded_strategies_on_a_corridor() {
    let mut grid = Grid::with_endpoints(3, 8, Position::new(1, 0), Position::new(1, 5)).unwrap();
    for col in 0..8 {
        grid.toggle_blocked(Position::new(0, col), true);
        grid.toggle_blocked(Position::new(2, col), true);
    }

    let shallow = SolverParams {
        depth_limit: 3,
        max_depth: 5,
        ..SolverParams::default()
    };
    let (dls, calls) = run(Algorithm::DepthLimited, &mut grid, &shallow);
    assert!(dls.is_exhausted());
    assert!(calls <= grid.cell_count() + 1);

    let (iddfs, _) = run(Algorithm::IterativeDeepening, &mut grid, &shallow);
    assert_eq!(iddfs.path_len(), 6);

    let too_shallow = SolverParams {
        max_depth: 4,
        ..SolverParams::default()
    };
    assert!(run(Algorithm::IterativeDeepening, &mut grid, &too_shallow)
        .0
        .is_exhausted());
}

#[test]
fn bidirectional_returns_the_whole_route() {
    let mut grid = Grid::with_endpoints(1, 9, Position::new(0, 0), Position::new(0, 8)).unwrap();

    let (snapshot, _) = run(Algorithm::Bidirectional, &mut grid, &SolverParams::default());

    let path = snapshot.path.unwrap();
    assert_eq!(path, (0..9).map(|col| Position::new(0, col)).collect::<Vec<_>>());
}

#[test]
fn seeded_randomized_dfs_is_reproducible() {
    let mut grid = Grid::new(12, 12).unwrap();
    grid.generate_random_walls(0.2, Some(5)).unwrap();
    let params = SolverParams {
        seed: Some(99),
        ..SolverParams::default()
    };

    let a = run(Algorithm::RandomizedDfs, &mut grid, &params).0;
    let b = run(Algorithm::RandomizedDfs, &mut grid, &params).0;

    assert_eq!(a, b);
}

#[test]
fn start_equal_to_target_is_a_one_cell_path() {
    let mut grid = Grid::with_endpoints(4, 4, Position::new(2, 2), Position::new(2, 2)).unwrap();

    for algorithm in Algorithm::ALL {
        let (snapshot, calls) = run(algorithm, &mut grid, &SolverParams::default());
        assert_eq!(snapshot.path, Some(vec![Position::new(2, 2)]), "{}", algorithm);
        assert_eq!(calls, 1);
    }
}
