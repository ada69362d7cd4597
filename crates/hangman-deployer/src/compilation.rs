//! Compilation of patched sources through an external `solc`.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use thiserror::Error;

/// Optimizer runs, tuned for deployment cost rather than call cost.
pub const OPTIMIZER_RUNS: u32 = 1;
/// Compiler looked up on `PATH` unless another one is configured.
pub const DEFAULT_SOLC: &str = "solc";

#[derive(Debug, Error)]
pub enum CompilationError {
    #[error("compiler `{}` not found", .0.display())]
    SolcNotFound(PathBuf),

    #[error("failed to run the compiler: {0}")]
    Io(#[from] io::Error),

    #[error("compilation error: {0}")]
    Solc(String),

    #[error("no binary for `{0}` in the compiler output")]
    MissingBinary(String),

    #[error("invalid bytecode in the compiler output: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Compile `solidity_code` with the `solc` executable and return the creation bytecode of
/// `contract_name`.
pub fn compile_with_solc(
    solc: &Path,
    solidity_code: &str,
    contract_name: &str,
    base_path: &Path,
) -> Result<Vec<u8>, CompilationError> {
    let compilation_output = compile_solidity(solc, solidity_code, base_path)?;
    let binary = find_binary(&compilation_output, contract_name)
        .ok_or_else(|| CompilationError::MissingBinary(contract_name.to_string()))?;
    Ok(hex::decode(binary)?)
}

/// Given solc compilation output returns the hex-encoded bytecode of `contract_name`.
pub fn find_binary<'a>(input: &'a str, contract_name: &str) -> Option<&'a str> {
    let search_str = format!("======= <stdin>:{contract_name} =======\nBinary:\n");

    let start = input.find(&search_str)? + search_str.len();
    let end = input[start..].find('\n').map(|pos| pos + start)?;

    Some(input[start..end].trim())
}

/// Compile `solidity` (fed through stdin) with the optimizer enabled. Imports are resolved
/// against `base_path`.
pub fn compile_solidity(
    solc: &Path,
    solidity: &str,
    base_path: &Path,
) -> Result<String, CompilationError> {
    let mut process = match Command::new(solc)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .arg("--bin")
        .arg("--optimize")
        .arg("--optimize-runs")
        .arg(OPTIMIZER_RUNS.to_string())
        .arg("--base-path")
        .arg(base_path)
        .arg("-")
        .spawn()
    {
        Ok(process) => process,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(CompilationError::SolcNotFound(solc.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };

    process
        .stdin
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "solc stdin is not captured"))?
        .write_all(solidity.as_bytes())?;
    let output = process.wait_with_output()?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() || stderr.contains("Error") {
        return Err(CompilationError::Solc(stderr.into_owned()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
