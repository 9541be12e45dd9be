// src/profile_extraction/mod.rs
pub mod extractor;
pub mod navigation;
pub mod page;
pub mod page_text;
pub mod resolver;
pub mod strategy;

pub use extractor::{ExtractionTimings, ProfileExtractor};
pub use navigation::{ExtractionOutcome, NavigationWatcher};
pub use page::{FilePage, PageSnapshot, ProfilePage, ReadyState, RemotePage, StaticPage};
pub use page_text::{PageTextFallback, SectionLookup};
pub use strategy::{default_strategies, load_strategies, ExtractionStrategy, FieldSelectors};
