//! Fixture file loading.

use std::fs;
use std::path::Path;

use crate::errors::{SpecError, SpecResult};
use crate::fixture::{parse_fixture, DiffFixture};

const FIXTURE_EXTENSION: &str = "toml";

fn load_error(path: &Path, err: std::io::Error) -> SpecError {
    SpecError::Load {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Load a single fixture file.
pub fn load_fixture(path: &Path) -> SpecResult<DiffFixture> {
    let content = fs::read_to_string(path).map_err(|e| load_error(path, e))?;
    parse_fixture(&content).map_err(|err| match err {
        SpecError::Parse { line, message } => SpecError::Parse {
            line,
            message: format!("{}: {}", path.display(), message),
        },
        other => other,
    })
}

/// Load every `*.toml` fixture below `dir`, keyed by path relative to `dir`
/// and sorted by that key.
pub fn load_all_fixtures(dir: &Path) -> SpecResult<Vec<(String, DiffFixture)>> {
    let mut fixtures = Vec::new();
    load_fixtures_recursive(dir, dir, &mut fixtures)?;
    fixtures.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(fixtures)
}

fn load_fixtures_recursive(
    base: &Path,
    dir: &Path,
    fixtures: &mut Vec<(String, DiffFixture)>,
) -> SpecResult<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir).map_err(|e| load_error(dir, e))? {
        let path = entry.map_err(|e| load_error(dir, e))?.path();

        if path.is_dir() {
            load_fixtures_recursive(base, &path, fixtures)?;
        } else if path.extension().map_or(false, |e| e == FIXTURE_EXTENSION) {
            let relative = path.strip_prefix(base).unwrap_or(&path);
            let fixture = load_fixture(&path)?;
            fixtures.push((relative.display().to_string(), fixture));
        }
    }

    Ok(())
}
