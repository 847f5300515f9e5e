use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SALES_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];
const MAPPED_SUFFIX: &str = "_Mapped_Enhanced";

/// Recursively collect sales exports under `dir`, sorted by path.
///
/// Files this tool wrote itself (see [`mapped_output_path`]) are skipped.
pub fn collect_sales_files(dir: impl AsRef<Path>) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk(dir.as_ref(), &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, found)?;
        } else if is_sales_file(&path) {
            found.push(path);
        }
    }
    Ok(())
}

fn is_sales_file(path: &Path) -> bool {
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SALES_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)));
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    ext_ok && !stem.starts_with("Mapped_") && !stem.ends_with(MAPPED_SUFFIX)
}

/// `<out_dir>/<stem>_Mapped_Enhanced.csv` for an input sales file.
pub fn mapped_output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sales".to_string());
    out_dir.join(format!("{stem}{MAPPED_SUFFIX}.csv"))
}
