use crate::*;
use std::fs;
use std::path::Path;

pub fn load_grid(path: &Path) -> Result<Grid> {
    let json = fs::read_to_string(path)?;
    Grid::from_json(&json)
}

pub fn load_rewards(path: &Path) -> Result<RewardTable> {
    let json = fs::read_to_string(path)?;
    RewardTable::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::process;

    #[test]
    fn load_grid_from_file() {
        let path = env::temp_dir().join(format!("gridworld-map-{}.json", process::id()));
        fs::write(&path, r#"[["Green", "White"], ["Wall", "Brown"]]"#).unwrap();

        let grid = load_grid(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(grid.shape(), (2, 2));
        assert_eq!(grid.tile(State::new(0, 1)), Some(Tile::Wall));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = env::temp_dir().join("gridworld-does-not-exist.json");

        assert!(matches!(load_rewards(&path), Err(GridError::Io(_))));
    }
}
