pub mod config;
pub mod event_name;
pub mod extraction;
pub mod hen;
pub mod keywords;
pub mod location;
pub mod normalize;
pub mod patterns;
pub mod reminder;
pub mod render;
pub mod tagger;
pub mod time_resolver;
pub mod time_span;

pub use config::Config;
pub use extraction::{EventTime, ExtractionResult};
pub use hen::Hen;
pub use tagger::{EntityTagger, GazetteerTagger, NoopTagger, Tag};

#[cfg(test)]
mod tests {
    mod common;
    pub use common::*;
}
