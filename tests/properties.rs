//! Property-based tests for frequency tables, PMI and the frequency filter.
//!
//! Validates:
//! 1. Table total equals max(0, len - n + 1)
//! 2. Unigram distinct count equals the token set size
//! 3. Building twice yields identical tables
//! 4. most_common is non-increasing and prefix-consistent across k
//! 5. Filter monotonicity; tau = 0 removes nothing
//! 6. PMI is invariant under scaling every count by the same factor
//! 7. top_k is sorted by score, then by bigram count

use std::collections::HashSet;

use proptest::prelude::*;

use corpus_stats::{AssociationFinder, Counting, FrequencyTable, NGram, Ranking};

// =============================================================================
// Strategies
// =============================================================================

/// Small vocabulary so that repeated n-grams are common.
fn arb_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("NEW".to_string()),
        Just("YORK".to_string()),
        Just("CITY".to_string()),
        Just("MAYOR".to_string()),
        Just("SAID".to_string()),
        Just("TODAY".to_string()),
    ]
}

fn arb_stream() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_token(), 0..200)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn total_matches_window_count(tokens in arb_stream(), n in 1usize..5) {
        let table = FrequencyTable::build(&tokens, n).unwrap();
        let expected = (tokens.len() + 1).saturating_sub(n) as u64;
        prop_assert_eq!(table.total(), expected);
        let summed: u64 = table.iter().map(|(_, c)| c).sum();
        prop_assert_eq!(summed, expected);
    }

    #[test]
    fn unigram_size_is_set_size(tokens in arb_stream()) {
        let table = FrequencyTable::build(&tokens, 1).unwrap();
        let distinct: HashSet<&String> = tokens.iter().collect();
        prop_assert_eq!(table.size(), distinct.len());
    }

    #[test]
    fn build_is_deterministic(tokens in arb_stream(), n in 1usize..4) {
        let a = FrequencyTable::build(&tokens, n).unwrap();
        let b = FrequencyTable::build(&tokens, n).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn most_common_is_sorted_and_prefix_consistent(tokens in arb_stream(), k in 0usize..10) {
        let table = FrequencyTable::build(&tokens, 2).unwrap();
        let small = table.most_common(k);
        let large = table.most_common(k + 3);
        prop_assert!(small.len() <= k);
        prop_assert_eq!(&large[..small.len()], &small[..]);
        for pair in large.windows(2) {
            prop_assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn filter_never_grows_live_set(tokens in arb_stream(), t1 in 0u64..6, extra in 0u64..6) {
        let mut finder = AssociationFinder::from_tokens(&tokens);
        let all = finder.live_count();
        finder.apply_frequency_filter(0);
        prop_assert_eq!(finder.live_count(), all);

        finder.apply_frequency_filter(t1);
        let after_first = finder.live_count();
        finder.apply_frequency_filter(t1 + extra);
        prop_assert!(finder.live_count() <= after_first);
        prop_assert!(finder.top_k(usize::MAX).iter().all(|r| r.bigram_freq >= t1 + extra));
    }

    #[test]
    fn pmi_is_scale_invariant(tokens in prop::collection::vec(arb_token(), 2..120), factor in 2u64..50) {
        let base = AssociationFinder::from_tokens(&tokens);
        let scale = |table: &FrequencyTable| {
            FrequencyTable::from_counts(
                table.order(),
                table.iter().map(|(g, c)| (g.clone(), c * factor)),
            )
            .unwrap()
        };
        let scaled = AssociationFinder::from_tables(scale(base.unigrams()), scale(base.bigrams())).unwrap();

        for (bigram, _) in base.bigrams().iter() {
            let a = base.score(bigram.tokens()).unwrap();
            let b = scaled.score(bigram.tokens()).unwrap();
            prop_assert!((a - b).abs() < 1e-9, "{} vs {} for {}", a, b, bigram);
        }
    }

    #[test]
    fn top_k_is_ordered(tokens in arb_stream(), k in 0usize..40) {
        let finder = AssociationFinder::from_tokens(&tokens);
        let top = finder.top_k(k);
        prop_assert!(top.len() <= k);
        for pair in top.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].bigram_freq >= pair[1].bigram_freq);
            }
        }
        // reported counts always come from the full tables
        for row in &top {
            prop_assert_eq!(row.bigram_freq, finder.bigrams().get(row.bigram.tokens()));
            prop_assert_eq!(row.w1_freq, finder.unigrams().get(&row.bigram.tokens()[..1]));
        }
    }
}

#[test]
fn absent_pair_cannot_be_scored() {
    let finder = AssociationFinder::from_tokens(&[]);
    let pair = NGram::pair("NEW", "YORK");
    assert!(finder.score(pair.tokens()).is_err());
}
