//! Event logs: one RON value per line. The first line holds the
//! `OmniSettings` the layout was created with, every following line one
//! `LayoutEvent`.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::{debug, trace};

use super::{LayoutError, LayoutEvent, LayoutHost, OmniLayout};
use crate::common::config::OmniSettings;

pub struct Record {
    file: Option<File>,
}

impl Record {
    pub fn new(path: Option<&Path>) -> Result<Self, LayoutError> {
        let file = path.map(File::create).transpose()?;
        Ok(Self { file })
    }

    pub fn start(&mut self, settings: &OmniSettings) -> Result<(), LayoutError> {
        let Some(file) = self.file.as_mut() else { return Ok(()) };
        let line = ron::ser::to_string(settings)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    pub fn on_event(&mut self, event: &LayoutEvent) -> Result<(), LayoutError> {
        let Some(file) = self.file.as_mut() else { return Ok(()) };
        let line = ron::ser::to_string(event)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

/// Rebuilds a layout by feeding every logged event through it.
/// `on_event` sees the layout after each event.
pub fn replay<H: LayoutHost>(
    path: &Path,
    host: H,
    mut on_event: impl FnMut(&LayoutEvent, &OmniLayout<H>),
) -> Result<OmniLayout<H>, LayoutError> {
    let file = BufReader::new(File::open(path)?);
    let mut lines = file.lines().enumerate();

    let (_, first) = lines.next().ok_or(LayoutError::EmptyLog)?;
    let settings: OmniSettings =
        ron::from_str(&first?).map_err(|source| LayoutError::Parse { line: 1, source })?;
    debug!(?settings, "Replaying event log");
    let mut layout = OmniLayout::new(settings, host);

    for (idx, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: LayoutEvent =
            ron::from_str(&line).map_err(|source| LayoutError::Parse { line: idx + 1, source })?;
        let response = layout.handle_event(event.clone());
        trace!(?response);
        on_event(&event, &layout);
    }
    Ok(layout)
}
