use std::time::Instant;

use smallvec::SmallVec;

use crate::dialect::Dialect;
use crate::error::{Result, SqltidyError};
use crate::queue::WorkQueue;
use crate::taggers::{CommentTagger, DdlTagger, DmlTagger, FormatOptions, PlTagger, Tagger};

pub type TaggerList = SmallVec<[Box<dyn Tagger>; 4]>;

/// An ordered, validated tagger registry.
///
/// Taggers classify in registry order, each claiming only units nobody
/// claimed before it, then format in the same order. The last tagger must be
/// the single fallback so that every unit ends up classified.
pub struct Pipeline {
    taggers: TaggerList,
    options: FormatOptions,
}

impl Pipeline {
    pub fn new(taggers: TaggerList, options: FormatOptions) -> Result<Self> {
        let Some(last) = taggers.last() else {
            return Err(SqltidyError::Registry("no taggers registered".to_string()));
        };
        if !last.is_fallback() {
            return Err(SqltidyError::Registry(format!(
                "the last tagger must be the fallback, found {}",
                last.name()
            )));
        }
        let fallbacks = taggers.iter().filter(|t| t.is_fallback()).count();
        if fallbacks > 1 {
            return Err(SqltidyError::Registry(format!(
                "expected one fallback tagger, found {}",
                fallbacks
            )));
        }
        for (i, tagger) in taggers.iter().enumerate() {
            if taggers[..i].iter().any(|t| t.kind() == tagger.kind()) {
                return Err(SqltidyError::Registry(format!(
                    "{} registered twice",
                    tagger.kind().label()
                )));
            }
        }
        Ok(Self { taggers, options })
    }

    /// The standard registry: procedural blocks first so their bodies keep
    /// their comments and queries, then stand-alone comments, queries, and
    /// data-definition as the fallback.
    pub fn for_dialect(dialect: &dyn Dialect, options: FormatOptions) -> Result<Self> {
        let mut taggers: TaggerList = SmallVec::new();
        taggers.push(Box::new(PlTagger::for_dialect(dialect)));
        taggers.push(Box::new(CommentTagger::new()));
        taggers.push(Box::new(DmlTagger::new()));
        taggers.push(Box::new(DdlTagger::new()));
        Self::new(taggers, options)
    }

    pub fn taggers(&self) -> impl Iterator<Item = &dyn Tagger> {
        self.taggers.iter().map(|t| t.as_ref())
    }

    pub fn classify(&self, queue: &mut WorkQueue) {
        for tagger in &self.taggers {
            tagger.classify(queue);
        }
        debug_assert_eq!(queue.unclassified_count(), 0);
    }

    pub fn format(&self, queue: &mut WorkQueue) {
        for tagger in &self.taggers {
            tagger.format(queue, &self.options);
        }
    }

    /// Classify then format the whole queue.
    pub fn run(&self, queue: &mut WorkQueue) {
        let start = Instant::now();
        self.classify(queue);
        let classified = start.elapsed();
        self.format(queue);
        log::debug!(
            "pipeline: {} units, classify {:?}, format {:?}",
            queue.len(),
            classified,
            start.elapsed() - classified
        );
    }
}
