//! Interactive CSV picker.
//!
//! Kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `bikes pick` and choose a file" UX
//!
//! Candidates are `*.csv` files under the current working directory. Files
//! whose header row lacks the rental columns are still listed, but marked.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Default directory recursion depth for finding CSV files.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Columns a usable rentals file must carry.
const RENTAL_COLUMNS: [&str; 3] = ["dteday", "weekday", "cnt"];

/// Prompt the user to select a CSV file from the current directory tree.
///
/// - list discovered `*.csv` files
/// - accept either a number (from the list) or an explicit path
/// - `q` cancels
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let files = discover_csv_files();
    if files.is_empty() {
        return Err(AppError::source(
            "No .csv files found. Provide one with `bikes report -f <file.csv>`.",
        ));
    }

    println!("Found {} CSV file(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        let marker = if looks_like_rentals(path) { "" } else { "  (no dteday/weekday/cnt)" };
        println!("{:>3}) {}{marker}", idx + 1, pretty_path(path));
    }

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("Select a file by number (1-{}) or type a path (q to quit): ", files.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::terminal(format!("Failed to write prompt: {e}")))?;

        input.clear();
        let bytes = stdin
            .lock()
            .read_line(&mut input)
            .map_err(|e| AppError::terminal(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::source(
                "No input received. Provide a CSV path with `bikes report -f <file.csv>`.",
            ));
        }

        match resolve_choice(input.trim(), &files) {
            Choice::Quit => return Err(AppError::source("Canceled.")),
            Choice::Path(path) => match validate_csv_path(&path) {
                Ok(path) => return Ok(path),
                Err(err) => println!("{err}"),
            },
            Choice::OutOfRange(n) => {
                println!("Invalid choice: {n}. Enter a number between 1 and {}.", files.len());
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Quit,
    Path(PathBuf),
    OutOfRange(usize),
}

fn resolve_choice(input: &str, files: &[PathBuf]) -> Choice {
    if input.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    if let Ok(n) = input.parse::<usize>() {
        return match n.checked_sub(1).and_then(|i| files.get(i)) {
            Some(path) => Choice::Path(path.clone()),
            None => Choice::OutOfRange(n),
        };
    }
    Choice::Path(PathBuf::from(input))
}

/// Validate the provided path points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::source(format!("CSV file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::source(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    if !has_csv_extension(path) {
        return Err(AppError::source(format!(
            "Expected a .csv file (got: {}).",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// Discover `*.csv` files under the current directory (deterministic order).
pub fn discover_csv_files() -> Vec<PathBuf> {
    find_csv_files(Path::new("."), DEFAULT_SEARCH_DEPTH)
}

/// Cheap header sniff: does the first line mention every rental column?
pub fn looks_like_rentals(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut first = String::new();
    if BufReader::new(file).read_line(&mut first).is_err() {
        return false;
    }
    let headers: Vec<String> = first
        .trim_start_matches('\u{feff}')
        .split(',')
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();
    RENTAL_COLUMNS.iter().all(|c| headers.iter().any(|h| h == c))
}

fn find_csv_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_csv_files_inner(root, 0, max_depth, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn find_csv_files_inner(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                find_csv_files_inner(&path, depth + 1, max_depth, out);
            }
        } else if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules" | "logs")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_by_number_quit_or_path() {
        let files = vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")];
        assert_eq!(resolve_choice("2", &files), Choice::Path(PathBuf::from("b.csv")));
        assert_eq!(resolve_choice("Q", &files), Choice::Quit);
        assert_eq!(resolve_choice("0", &files), Choice::OutOfRange(0));
        assert_eq!(resolve_choice("3", &files), Choice::OutOfRange(3));
        assert_eq!(resolve_choice("data/day.csv", &files), Choice::Path(PathBuf::from("data/day.csv")));
    }

    #[test]
    fn finds_csv_files_recursively_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("b.csv"), "x").unwrap();
        fs::write(dir.path().join("sub").join("a.CSV"), "x").unwrap();
        fs::write(dir.path().join("target").join("skip.csv"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let found = find_csv_files(dir.path(), 2);
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"b.csv".to_string()));
        assert!(names.contains(&"a.CSV".to_string()));
    }

    #[test]
    fn header_sniff_and_validation() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("day.csv");
        let other = dir.path().join("other.csv");
        fs::write(&good, "instant,dteday,season,weekday,cnt\n1,2011-01-01,1,5,985\n").unwrap();
        fs::write(&other, "id,value\n").unwrap();

        assert!(looks_like_rentals(&good));
        assert!(!looks_like_rentals(&other));
        assert!(validate_csv_path(&good).is_ok());
        assert!(validate_csv_path(dir.path()).is_err());
        assert!(validate_csv_path(&dir.path().join("missing.csv")).is_err());
    }
}
