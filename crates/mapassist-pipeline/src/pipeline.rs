//! Search pipeline orchestration.

use std::time::Instant;

use futures::future::join_all;
use mapassist_ai::{QueryInterpreter, RelevanceRanker};
use mapassist_core::{RankedResultSet, SearchQuery, SearchResults};
use mapassist_places::{PhotoResolver, PlaceSource};

/// Composes interpretation, place search, photo enrichment and ranking.
///
/// Every stage degrades instead of failing, so a search always ends with
/// some ordered list: possibly empty, possibly in provider order.
#[derive(Debug, Clone)]
pub struct Pipeline {
    interpreter: QueryInterpreter,
    source: PlaceSource,
    resolver: PhotoResolver,
    ranker: RelevanceRanker,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        interpreter: QueryInterpreter,
        source: PlaceSource,
        resolver: PhotoResolver,
        ranker: RelevanceRanker,
    ) -> Self {
        Self {
            interpreter,
            source,
            resolver,
            ranker,
        }
    }

    #[must_use]
    pub fn interpreter(&self) -> &QueryInterpreter {
        &self.interpreter
    }

    #[must_use]
    pub fn source(&self) -> &PlaceSource {
        &self.source
    }

    #[must_use]
    pub fn resolver(&self) -> &PhotoResolver {
        &self.resolver
    }

    #[must_use]
    pub fn ranker(&self) -> &RelevanceRanker {
        &self.ranker
    }

    /// Run a search with the configured default radius.
    pub async fn search(&self, query: &SearchQuery) -> SearchResults {
        self.search_within(query, self.source.default_radius_m())
            .await
    }

    /// Run the full pipeline for one query.
    ///
    /// 1. Interpret the text into a category and keywords.
    /// 2. Fetch candidates of that category around the origin.
    /// 3. Resolve a photo for every candidate concurrently.
    /// 4. Rank the enriched candidates by the keywords.
    pub async fn search_within(&self, query: &SearchQuery, radius_m: u32) -> SearchResults {
        let started = Instant::now();

        let intent = self.interpreter.interpret(&query.text).await;
        let mut candidates = self.source.search(query.origin, &intent, radius_m).await;

        if candidates.is_empty() {
            tracing::info!(
                category = %intent.category,
                radius_m,
                "no candidates found"
            );
            return SearchResults {
                intent,
                places: RankedResultSet::default(),
            };
        }

        join_all(
            candidates
                .iter_mut()
                .map(|candidate| self.resolver.enrich(candidate)),
        )
        .await;

        let with_photo = candidates.iter().filter(|c| !c.photo_url.is_empty()).count();
        let found = candidates.len();
        let ranked = self.ranker.rank(candidates, &intent.keywords).await;

        tracing::info!(
            category = %intent.category,
            keywords = ?intent.keywords,
            found,
            with_photo,
            returned = ranked.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "search complete"
        );

        SearchResults {
            intent,
            places: RankedResultSet::from(ranked),
        }
    }
}
