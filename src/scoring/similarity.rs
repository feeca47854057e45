use std::fmt;
use crate::search::explanation::Explanation;

/// Scoring formula provider consulted by weights and scorers.
///
/// Implementations are pure functions of their inputs; the kernel never
/// looks inside them.
pub trait Similarity: Send + Sync + fmt::Debug {
    /// Score factor for a term occurring `freq` times in a document.
    fn tf(&self, freq: f32) -> f32;

    /// Inverse document frequency of a term.
    fn idf(&self, doc_freq: u32, num_docs: u32) -> f32;

    /// Length normalization factor for a field holding `num_terms` tokens.
    fn length_norm(&self, field: &str, num_terms: u32) -> f32;

    /// Normalization factor derived from a query's sum of squared weights.
    fn query_norm(&self, sum_of_squared_weights: f32) -> f32;

    /// Boolean score factor based on how many clauses matched.
    fn coord(&self, overlap: usize, max_overlap: usize) -> f32;

    fn name(&self) -> &str;

    fn idf_explain(&self, doc_freq: u32, num_docs: u32) -> Explanation {
        Explanation::new(
            self.idf(doc_freq, num_docs),
            format!("idf(docFreq={}, maxDocs={})", doc_freq, num_docs),
        )
    }
}

/// Classic TF-IDF similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSimilarity;

impl Similarity for DefaultSimilarity {
    fn tf(&self, freq: f32) -> f32 {
        freq.sqrt()
    }

    fn idf(&self, doc_freq: u32, num_docs: u32) -> f32 {
        // IDF = 1 + ln(N / (df + 1))
        (num_docs as f64 / (doc_freq as f64 + 1.0)).ln() as f32 + 1.0
    }

    fn length_norm(&self, _field: &str, num_terms: u32) -> f32 {
        if num_terms == 0 {
            return 1.0;
        }
        1.0 / (num_terms as f32).sqrt()
    }

    fn query_norm(&self, sum_of_squared_weights: f32) -> f32 {
        if sum_of_squared_weights <= 0.0 {
            return 1.0;
        }
        1.0 / sum_of_squared_weights.sqrt()
    }

    fn coord(&self, overlap: usize, max_overlap: usize) -> f32 {
        if max_overlap == 0 {
            return 1.0;
        }
        overlap as f32 / max_overlap as f32
    }

    fn name(&self) -> &str {
        "tfidf"
    }
}

/// Query norm with the degenerate cases pinned to 1.0.
///
/// A zero or non-finite sum (an empty boolean query, a zero boost) and a
/// similarity returning a non-finite or zero factor all normalize to 1.0.
pub fn normalization_factor(similarity: &dyn Similarity, sum_of_squared_weights: f32) -> f32 {
    if sum_of_squared_weights <= 0.0 || !sum_of_squared_weights.is_finite() {
        return 1.0;
    }
    let norm = similarity.query_norm(sum_of_squared_weights);
    if norm.is_finite() && norm != 0.0 { norm } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_formulas() {
        let sim = DefaultSimilarity;
        assert_eq!(sim.tf(4.0), 2.0);
        assert_eq!(sim.tf(0.0), 0.0);
        assert!((sim.idf(1, 10) - (1.0 + 5f32.ln())).abs() < 1e-6);
        assert_eq!(sim.length_norm("body", 4), 0.5);
        assert_eq!(sim.query_norm(4.0), 0.5);
        assert_eq!(sim.coord(1, 2), 0.5);
        assert_eq!(sim.coord(0, 0), 1.0);
    }

    #[test]
    fn zero_sum_normalizes_to_one() {
        let sim = DefaultSimilarity;
        assert_eq!(normalization_factor(&sim, 0.0), 1.0);
        assert_eq!(normalization_factor(&sim, f32::NAN), 1.0);
        assert_eq!(normalization_factor(&sim, 16.0), 0.25);
    }

    #[test]
    fn idf_explanation_carries_statistics() {
        let expl = DefaultSimilarity.idf_explain(3, 12);
        assert_eq!(expl.description(), "idf(docFreq=3, maxDocs=12)");
        assert_eq!(expl.value(), DefaultSimilarity.idf(3, 12));
    }
}
