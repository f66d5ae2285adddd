//! Full-length character permutations.

/// Number of orderings of `n` items, or `None` on overflow.
pub fn count_permutations(n: usize) -> Option<usize> {
    (1..=n).try_fold(1usize, |acc, k| acc.checked_mul(k))
}

/// Every ordering of the characters of `text`.
///
/// Output order is lexicographic by character position, so the first entry is
/// `text` itself. Repeated characters are treated as distinct positions and
/// produce repeated orderings. An empty input yields one empty ordering.
pub fn allarr(text: &str) -> Vec<Vec<char>> {
    let l_chars: Vec<char> = text.chars().collect();
    let n_len = l_chars.len();

    let mut l_out = Vec::with_capacity(count_permutations(n_len).unwrap_or(0));
    let mut l_used = vec![false; n_len];
    let mut l_current = Vec::with_capacity(n_len);
    collect_permutations(&l_chars, &mut l_used, &mut l_current, &mut l_out);
    l_out
}

/// [`allarr`] with each ordering joined into a `String`.
pub fn allarr_strings(text: &str) -> Vec<String> {
    allarr(text)
        .into_iter()
        .map(|l_chars| l_chars.into_iter().collect())
        .collect()
}

fn collect_permutations(
    l_chars: &[char],
    l_used: &mut [bool],
    l_current: &mut Vec<char>,
    l_out: &mut Vec<Vec<char>>,
) {
    if l_current.len() == l_chars.len() {
        l_out.push(l_current.clone());
        return;
    }
    for idx in 0..l_chars.len() {
        if l_used[idx] {
            continue;
        }
        l_used[idx] = true;
        l_current.push(l_chars[idx]);
        collect_permutations(l_chars, l_used, l_current, l_out);
        l_current.pop();
        l_used[idx] = false;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_allarr_order_matches_position_order() {
        assert_eq!(
            allarr_strings("abc"),
            vec!["abc", "acb", "bac", "bca", "cab", "cba"]
        );
        assert_eq!(allarr("ab"), vec![vec!['a', 'b'], vec!['b', 'a']]);
    }

    #[test]
    fn test_allarr_edge_inputs() {
        assert_eq!(allarr(""), vec![Vec::<char>::new()]);
        assert_eq!(allarr_strings("aa"), vec!["aa", "aa"]);
        assert_eq!(allarr_strings("éß"), vec!["éß", "ßé"]);
    }

    #[test]
    fn test_count_permutations() {
        assert_eq!(count_permutations(0), Some(1));
        assert_eq!(count_permutations(5), Some(120));
        assert_eq!(count_permutations(100), None);
    }

    proptest! {
        #[test]
        fn allarr_yields_n_factorial_distinct_orderings(text in "[a-z]{0,5}") {
            let l_perms = allarr(&text);
            let n_len = text.chars().count();
            prop_assert_eq!(Some(l_perms.len()), count_permutations(n_len));

            let mut l_sorted_src: Vec<char> = text.chars().collect();
            l_sorted_src.sort_unstable();
            for l_perm in &l_perms {
                let mut l_sorted = l_perm.clone();
                l_sorted.sort_unstable();
                prop_assert_eq!(&l_sorted, &l_sorted_src);
            }

            let n_distinct_chars = text.chars().collect::<BTreeSet<_>>().len();
            if n_distinct_chars == n_len {
                let set_perms: BTreeSet<_> = l_perms.iter().collect();
                prop_assert_eq!(set_perms.len(), l_perms.len());
            }
        }
    }
}
