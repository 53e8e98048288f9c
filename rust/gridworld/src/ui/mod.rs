//! Plain-text rendering of grids, value tables and policies.

use crate::*;

/// One glyph per cell: `.` white, `B` brown, `G` green, `#` wall.
pub fn render_grid(grid: &Grid) -> String {
    render_cells(grid, |_, t| t.glyph().to_string())
}

/// Tile labels row by row, the way the map generator prints a fresh map.
pub fn render_labels(grid: &Grid) -> String {
    grid.labels().iter().map(|row| format!("{row:?}")).join("\n")
}

pub fn render_values(values: &Array2<Continous>, grid: &Grid) -> String {
    render_cells(grid, |s, t| {
        if t.is_wall() {
            format!("{:>8}", t.glyph())
        } else {
            format!("{:>8.3}", values.get(s.index()).copied().unwrap_or_default())
        }
    })
}

/// Arrows for decided states, `?` for undecided ones and `#` for walls.
pub fn render_policy(policy: &dyn Policy, grid: &Grid) -> String {
    render_cells(grid, |s, t| {
        if t.is_wall() {
            t.glyph().to_string()
        } else {
            policy.policy(&s).map_or('?', Action::arrow).to_string()
        }
    })
}

fn render_cells<F>(grid: &Grid, mut cell: F) -> String
where
    F: FnMut(State, Tile) -> String,
{
    grid.tiles()
        .rows()
        .into_iter()
        .enumerate()
        .map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(|(x, t)| cell(State::new(x, y), *t))
                .join(" ")
        })
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use std::collections::HashMap;

    struct FixedPolicy(HashMap<State, Action>);

    impl Policy for FixedPolicy {
        fn policy(&self, s: &State) -> Option<Action> {
            self.0.get(s).copied()
        }
    }

    #[test]
    fn renders_default_grid() {
        assert_snapshot!(render_grid(&Grid::default()), @r###"
        G # G . . G
        . B . G # B
        . . B . G .
        . . . B . G
        . # # # B .
        . . . . . .
        "###);
    }

    #[test]
    fn renders_policy_with_undecided_states() {
        let grid = Grid::from_labels(&[vec!["Green", "White", "Wall", "Brown"]]).unwrap();
        let policy = FixedPolicy(HashMap::from([
            (State::new(0, 0), Action::Left),
            (State::new(1, 0), Action::Left),
        ]));

        assert_snapshot!(render_policy(&policy, &grid), @"< < # ?");
    }

    #[test]
    fn renders_values_right_aligned() {
        let grid = Grid::from_labels(&[vec!["Green", "Wall"], vec!["White", "Brown"]]).unwrap();
        let values = ndarray::arr2(&[[100., 0.], [-0.04, -12.5]]);

        assert_eq!(
            render_values(&values, &grid),
            " 100.000        #\n  -0.040  -12.500"
        );
    }

    #[test]
    fn renders_labels_as_lists() {
        let grid = Grid::from_labels(&[vec!["Green", "Wall"]]).unwrap();

        assert_eq!(render_labels(&grid), r#"["Green", "Wall"]"#);
    }
}
