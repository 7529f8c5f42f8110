use super::theme::OneDark;
use anyhow::{Context, Result};
use hen_core::{ExtractionResult, render::format_result};
use termimad::MadSkin;

#[derive(Clone)]
pub struct RenderOptions {
    pub datetime_format: String,
    pub use_color: bool,
}

pub struct Renderer {
    skin: MadSkin,
    opts: RenderOptions,
}

impl Renderer {
    pub fn new(config: Option<RenderOptions>) -> Self {
        Self {
            skin: OneDark::event_card_skin(),
            opts: config.unwrap_or_else(|| RenderOptions {
                datetime_format: "%a, %d/%m/%Y %H:%M".to_string(),
                use_color: true,
            }),
        }
    }

    pub fn print_md(&self, md: &str) {
        if self.opts.use_color {
            self.skin.print_text(md);
        } else {
            print!("{md}");
        }
    }

    /// Status messages go to stderr so that stdout only carries the record.
    pub fn print_info(&self, message: &str) {
        if self.opts.use_color {
            eprint!("{}", self.skin.term_text(&format!("*{message}*")));
        } else {
            eprintln!("{message}");
        }
    }

    pub fn print_result(&self, result: &ExtractionResult) {
        self.print_md(&format_result(result, &self.opts.datetime_format));
    }

    pub fn print_json(&self, result: &ExtractionResult) -> Result<()> {
        let json = serde_json::to_string_pretty(result).context("serializing the result")?;
        println!("{json}");
        Ok(())
    }
}
