use std::{env, io::Write};

use eyre::{eyre, Result};

/// build a standardized output path for the given parameters. follows the following cases:
/// - if `output` is `print`, the caller never reaches this function
/// - if `output` is the default value (`output`), return `/output/local/{filename}`
/// - if `output` is specified, return `/{output}/{filename}`
pub fn build_output_path(output: &str, filename: &str) -> Result<String> {
    if output == "output" {
        // get the current working directory
        let cwd = env::current_dir()?
            .into_os_string()
            .into_string()
            .map_err(|_| eyre!("Unable to get current working directory"))?;

        return Ok(format!("{cwd}/output/local/{filename}"));
    }

    // output is specified, return the path
    Ok(format!("{output}/{filename}"))
}

/// pass the input to the `less` command
pub fn print_with_less(input: &str) -> Result<()> {
    let mut child =
        std::process::Command::new("less").stdin(std::process::Stdio::piped()).spawn()?;

    let stdin = child.stdin.as_mut().ok_or_else(|| eyre!("unable to get stdin for less"))?;
    stdin.write_all(input.as_bytes())?;

    child.wait()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_default_local() {
        let path = build_output_path("output", "disassembled.asm");
        assert!(path
            .expect("failed to build output path")
            .ends_with("/output/local/disassembled.asm"));
    }

    #[test]
    fn test_output_specified() {
        let path = build_output_path("/some_dir", "disassembled.asm");
        assert_eq!(path.expect("failed to build output path"), "/some_dir/disassembled.asm");
    }
}
