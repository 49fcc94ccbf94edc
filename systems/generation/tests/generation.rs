use maze_race_core::{CellCoord, CellState};
use maze_race_system_generation::{corners_connected, ensure_path_between_corners, generate};
use maze_race_world::Grid;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn corners_stay_connected_across_sizes_and_seeds() {
    for (rows, cols) in [(9, 9), (11, 11), (21, 31), (41, 27), (63, 63)] {
        for seed in 0..5 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = generate(rows, cols, &mut rng).expect("valid dimensions");
            assert!(
                corners_connected(&grid),
                "disconnected corners for {rows}x{cols} seed {seed}"
            );
        }
    }
}

#[test]
fn every_lattice_cell_is_carved_open() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let grid = generate(21, 21, &mut rng).expect("valid dimensions");

    for row in (1..21).step_by(2) {
        for column in (1..21).step_by(2) {
            let cell = CellCoord::new(column, row);
            assert_ne!(
                grid.get(cell),
                Some(CellState::Wall),
                "lattice cell {cell:?} left walled"
            );
        }
    }
}

#[test]
fn border_remains_solid_wall() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let grid = generate(15, 19, &mut rng).expect("valid dimensions");

    for column in 0..19 {
        assert_eq!(grid.get(CellCoord::new(column, 0)), Some(CellState::Wall));
        assert_eq!(grid.get(CellCoord::new(column, 14)), Some(CellState::Wall));
    }
    for row in 0..15 {
        assert_eq!(grid.get(CellCoord::new(0, row)), Some(CellState::Wall));
        assert_eq!(grid.get(CellCoord::new(18, row)), Some(CellState::Wall));
    }
}

#[test]
fn repair_carves_a_path_through_a_sealed_grid() {
    // Hand-built grid with open corners and nothing else: no corner pair
    // is reachable, so the repair pass must carve all of them together.
    let mut grid = Grid::new(11, 11);
    for corner in grid.corners() {
        grid.set(corner, CellState::Path);
    }
    assert!(!corners_connected(&grid));

    ensure_path_between_corners(&mut grid);
    assert!(corners_connected(&grid));
}

#[test]
fn out_of_bounds_dimensions_fail_before_generation() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert!(generate(7, 11, &mut rng).is_err());
    assert!(generate(11, 8, &mut rng).is_err());
    assert!(generate(1_025, 11, &mut rng).is_err());
}
