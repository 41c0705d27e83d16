use std::sync::Arc;

use common::{Problem, ProblemModelMap};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::debug;

/// Anything that can offer problems to add to a contest.
pub trait ProblemSupplier {
    /// The problems currently on offer; may be empty.
    fn supply(&self) -> Vec<Problem>;
}

/// Maximum number of matches a search shows.
pub const SEARCH_RESULT_LIMIT: usize = 10;

fn catalog_order(problems: impl IntoIterator<Item = Problem>) -> Vec<Problem> {
    let mut problems: Vec<Problem> = problems.into_iter().collect();
    problems.sort_by(|a, b| a.contest_id.cmp(&b.contest_id).then_with(|| a.id.cmp(&b.id)));
    problems
}

/// Free-text problem search box.
///
/// Every whitespace-separated word of the query must appear (ignoring case)
/// in either the problem id or its title.
#[derive(Debug, Clone)]
pub struct ProblemSearch {
    problems: Vec<Problem>,
    query: String,
    selected: Option<usize>,
}

impl ProblemSearch {
    pub fn new(problems: impl IntoIterator<Item = Problem>) -> Self {
        Self {
            problems: catalog_order(problems),
            query: String::new(),
            selected: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the query. Clears any selection.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.selected = None;
    }

    pub fn results(&self) -> Vec<&Problem> {
        let words: Vec<String> = self
            .query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        if words.is_empty() {
            return Vec::new();
        }
        self.problems
            .iter()
            .filter(|p| {
                let id = p.id.to_lowercase();
                let title = p.title.to_lowercase();
                words
                    .iter()
                    .all(|w| id.contains(w.as_str()) || title.contains(w.as_str()))
            })
            .take(SEARCH_RESULT_LIMIT)
            .collect()
    }

    /// Pick the `index`-th result. Out-of-range indexes clear the selection.
    pub fn select(&mut self, index: usize) -> Option<&Problem> {
        let found = index < self.results().len();
        self.selected = found.then_some(index);
        if found { self.results().into_iter().nth(index) } else { None }
    }
}

impl ProblemSupplier for ProblemSearch {
    fn supply(&self) -> Vec<Problem> {
        self.selected
            .and_then(|i| self.results().get(i).map(|p| (*p).clone()))
            .into_iter()
            .collect()
    }
}

/// Half-open difficulty window `[min, max)` on clipped difficulty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyRange {
    pub min: f64,
    pub max: f64,
}

impl DifficultyRange {
    pub const ANY: DifficultyRange = DifficultyRange {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, difficulty: f64) -> bool {
        self.min <= difficulty && difficulty < self.max
    }
}

impl Default for DifficultyRange {
    fn default() -> Self {
        Self::ANY
    }
}

/// Random problem set generator ("gacha").
#[derive(Debug, Clone)]
pub struct ProblemSetGenerator {
    problems: Vec<Problem>,
    models: Arc<ProblemModelMap>,
    count: usize,
    range: DifficultyRange,
    exclude_experimental: bool,
    seed: Option<u64>,
}

impl ProblemSetGenerator {
    pub fn new(problems: impl IntoIterator<Item = Problem>, models: Arc<ProblemModelMap>) -> Self {
        Self {
            problems: catalog_order(problems),
            models,
            count: 1,
            range: DifficultyRange::ANY,
            exclude_experimental: false,
            seed: None,
        }
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn difficulty(mut self, range: DifficultyRange) -> Self {
        self.range = range;
        self
    }

    pub fn exclude_experimental(mut self, exclude: bool) -> Self {
        self.exclude_experimental = exclude;
        self
    }

    /// Fix the RNG seed so repeated draws give the same set.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Problems eligible for a draw, paired with their clipped difficulty.
    /// Problems without a difficulty estimate are never eligible.
    pub fn candidates(&self) -> Vec<(&Problem, f64)> {
        self.problems
            .iter()
            .filter_map(|p| {
                let model = self.models.get(&p.id)?;
                if self.exclude_experimental && model.is_experimental() {
                    return None;
                }
                let difficulty = model.clipped_difficulty()?;
                self.range.contains(difficulty).then_some((p, difficulty))
            })
            .collect()
    }
}

impl ProblemSupplier for ProblemSetGenerator {
    /// Up to `count` distinct problems, easiest first.
    fn supply(&self) -> Vec<Problem> {
        let candidates = self.candidates();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let mut picked: Vec<(&Problem, f64)> = candidates
            .choose_multiple(&mut rng, self.count)
            .copied()
            .collect();
        picked.sort_by(|a, b| a.1.total_cmp(&b.1));
        debug!(
            candidates = candidates.len(),
            picked = picked.len(),
            "Generated problem set"
        );
        picked.into_iter().map(|(p, _)| p.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ProblemModel;
    use std::collections::HashSet;

    fn catalog() -> Vec<Problem> {
        vec![
            Problem::new("abc100_a", "abc100", "Happy Birthday!"),
            Problem::new("abc100_b", "abc100", "Ringo's Favorite Numbers"),
            Problem::new("abc100_c", "abc100", "*3 or /2"),
            Problem::new("arc100_a", "arc100", "Linear Approximation"),
            Problem::new("agc001_a", "agc001", "BBQ Easy"),
        ]
    }

    fn models() -> Arc<ProblemModelMap> {
        let mut models = ProblemModelMap::new();
        models.insert("abc100_a".into(), ProblemModel::with_difficulty(-800.0));
        models.insert("abc100_b".into(), ProblemModel::with_difficulty(350.0));
        models.insert("abc100_c".into(), ProblemModel::with_difficulty(700.0));
        models.insert(
            "arc100_a".into(),
            ProblemModel {
                difficulty: Some(1300.0),
                is_experimental: Some(true),
                ..ProblemModel::default()
            },
        );
        Arc::new(models)
    }

    #[test]
    fn test_search_matches_every_word() {
        let mut search = ProblemSearch::new(catalog());
        search.set_query("abc100 ringo");
        let ids: Vec<_> = search.results().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["abc100_b"]);

        search.set_query("HAPPY");
        assert_eq!(search.results()[0].id, "abc100_a");

        search.set_query("   ");
        assert!(search.results().is_empty());
    }

    #[test]
    fn test_search_supplies_only_the_selection() {
        let mut search = ProblemSearch::new(catalog());
        search.set_query("abc100");
        assert!(search.supply().is_empty());

        let picked = search.select(2).map(|p| p.id.clone());
        assert_eq!(picked.as_deref(), Some("abc100_c"));
        assert_eq!(search.supply()[0].id, "abc100_c");

        assert!(search.select(9).is_none());
        assert!(search.supply().is_empty());

        search.select(0);
        search.set_query("agc");
        assert!(search.supply().is_empty());
    }

    #[test]
    fn test_search_limits_results() {
        let many = (0..30).map(|i| Problem::new(format!("abc{i:03}_a"), format!("abc{i:03}"), "A"));
        let mut search = ProblemSearch::new(many);
        search.set_query("abc");
        assert_eq!(search.results().len(), SEARCH_RESULT_LIMIT);
    }

    #[test]
    fn test_generator_respects_range_and_models() {
        let generator = ProblemSetGenerator::new(catalog(), models())
            .count(10)
            .difficulty(DifficultyRange::new(0.0, 800.0))
            .seed(7);
        let ids: Vec<_> = generator.supply().into_iter().map(|p| p.id).collect();
        // agc001_a has no model; arc100_a is out of range.
        assert_eq!(ids, vec!["abc100_a", "abc100_b", "abc100_c"]);
    }

    #[test]
    fn test_generator_excludes_experimental() {
        let generator = ProblemSetGenerator::new(catalog(), models())
            .count(10)
            .difficulty(DifficultyRange::new(1000.0, 2000.0));
        assert_eq!(generator.supply().len(), 1);
        assert!(generator.exclude_experimental(true).supply().is_empty());
    }

    #[test]
    fn test_generator_picks_distinct_problems() {
        let generator = ProblemSetGenerator::new(catalog(), models()).count(2);
        for seed in 0..20 {
            let picked = generator.clone().seed(seed).supply();
            assert_eq!(picked.len(), 2);
            let unique: HashSet<_> = picked.iter().map(|p| &p.id).collect();
            assert_eq!(unique.len(), 2);
        }
    }

    #[test]
    fn test_generator_is_reproducible_with_seed() {
        let generator = ProblemSetGenerator::new(catalog(), models()).count(2).seed(42);
        assert_eq!(generator.supply(), generator.supply());
    }
}
