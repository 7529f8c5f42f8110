use crate::{
    cli::Cli,
    cli_modes::{create_editor_buffer, resolve_editor},
    render::{RenderOptions, Renderer},
};
use anyhow::Result;
use hen_core::{ExtractionResult, Hen};
use log::debug;
use std::process::ExitCode;

pub struct HenCli {
    cli: Cli,
    renderer: Renderer,
    hen: Hen,
}

impl HenCli {
    pub fn new(cli: Cli, hen: Hen) -> Self {
        let renderer = Renderer::new(Some(RenderOptions {
            datetime_format: hen.config.datetime_format.clone(),
            use_color: cli.color.use_color(),
        }));
        HenCli { cli, renderer, hen }
    }

    /// Parses the sentence and prints the record. Exits with failure when
    /// neither a name nor a time was understood.
    pub fn run(&self) -> Result<ExitCode> {
        let result = match self.inline_mode()? {
            Some(result) => result,
            None => match self.editor_mode()? {
                Some(result) => result,
                None => return Ok(ExitCode::SUCCESS),
            },
        };

        if self.cli.json {
            self.renderer.print_json(&result)?;
        } else {
            self.renderer.print_result(&result);
        }
        if result.is_empty() {
            self.renderer
                .print_info("Could not understand that sentence; try adding a time or a name.");
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }

    fn inline_mode(&self) -> Result<Option<ExtractionResult>> {
        if self.cli.text.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.parse(&self.cli.text.join(" "))))
    }

    fn editor_mode(&self) -> Result<Option<ExtractionResult>> {
        let editor = resolve_editor();
        debug!("opening {editor}");
        let input = create_editor_buffer(&editor)?;
        let text = input.trim();
        if text.is_empty() {
            self.renderer
                .print_info("Nothing to parse, because no text was received.");
            return Ok(None);
        }
        Ok(Some(self.parse(text)))
    }

    fn parse(&self, text: &str) -> ExtractionResult {
        // One sentence per call; an editor buffer may span several lines.
        let text = text.lines().collect::<Vec<_>>().join(" ");
        self.hen.parse(&text)
    }
}
