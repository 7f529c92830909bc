use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::Path;

/// Escribe `contents` en un temporal junto a `path` y lo renombra encima, de
/// modo que un lector nunca ve el archivo a medio escribir.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  let tmp_path = path.with_extension("tmp");

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  Ok(())
}

/// Lee un archivo de texto; `None` si no existe.
pub fn read_optional_str(path: &Path) -> io::Result<Option<String>> {
  match fs::read_to_string(path) {
    Ok(contents) => Ok(Some(contents)),
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn atomic_write_replaces_contents_and_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.json");

    atomic_write_str(&path, "[1]").unwrap();
    atomic_write_str(&path, "[1,2]").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[1,2]");
    assert!(!path.with_extension("tmp").exists());
  }

  #[test]
  fn missing_file_reads_as_none() {
    let dir = tempdir().unwrap();
    assert_eq!(read_optional_str(&dir.path().join("nope.json")).unwrap(), None);

    let path = dir.path().join("yes.json");
    fs::write(&path, "x").unwrap();
    assert_eq!(read_optional_str(&path).unwrap().as_deref(), Some("x"));
  }
}
