use std::{fs::File, io::Write, path::Path};

use eyre::Result;

/// Write contents to a file on the disc
///
/// ```no_run
/// use hugin_common::utils::io::file::write_file;
///
/// let path = "/tmp/test.txt";
/// let contents = "Hello, World!";
/// let result = write_file(path, contents);
/// ```
pub fn write_file(path_str: &str, contents: &str) -> Result<()> {
    let path = Path::new(path_str);

    // Create the directory if it doesn't exist
    std::fs::create_dir_all(
        path.parent().ok_or_else(|| eyre::eyre!("unable to create directory"))?,
    )?;

    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;

    Ok(())
}

/// Write lines to a file on the disc
///
/// ```no_run
/// use hugin_common::utils::io::file::write_lines_to_file;
///
/// let path = "/tmp/test.txt";
/// let lines = vec![String::from("one"), String::from("two")];
/// let result = write_lines_to_file(path, &lines);
/// ```
pub fn write_lines_to_file(path_str: &str, lines: &[String]) -> Result<()> {
    write_file(path_str, &format!("{}\n", lines.join("\n")))
}
