use std::io::{self, Write};

use crate::{errors::SemanticResult, tokens};

pub(super) fn action() -> SemanticResult {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &tokens::legend())?;
    writeln!(out)?;
    Ok(())
}
