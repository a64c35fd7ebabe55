use std::io::Write;

use crate::error::Error;

use super::AtlasDescription;

pub(super) fn render<W: Write>(atlas: &AtlasDescription, mut output: W) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut output, atlas)?;
    writeln!(output)?;
    Ok(())
}
