use std::{fs::File, io::BufReader, path::{Path, PathBuf}};

use anyhow::Context;
use hermes_preflight::problem::vehicle_routing_problem::VehicleRoutingProblem;

pub fn read_folder(folder_path: &PathBuf) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder_path)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            files.insert(0, path);
        } else if path.is_dir() {
            files.extend(read_folder(&path)?);
        }
    }

    files.sort();

    Ok(files)
}

/// Problem files designated by `input`, the file itself or every JSON file
/// below the folder.
pub fn problem_paths(input: &PathBuf) -> Result<Vec<PathBuf>, std::io::Error> {
    if input.is_file() {
        return Ok(vec![input.clone()]);
    }

    Ok(read_folder(input)?
        .into_iter()
        .filter(|path| path.extension().is_some_and(|extension| extension == "json"))
        .collect())
}

pub fn read_problem(path: &Path) -> Result<VehicleRoutingProblem, anyhow::Error> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let problem = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid problem in {}", path.display()))?;

    Ok(problem)
}
