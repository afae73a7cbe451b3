// Merge order tests
//
// Union is commutative and associative: every merge order yields the
// same global index.

use invidx::core::indexer::Merger;
use invidx::core::types::{DocId, PartialIndex};
use proptest::prelude::*;
use tokio::sync::mpsc;

const DOCS: &[&str] = &["a.txt", "b.txt", "c.txt", "d.txt"];
const TOKENS: &[&str] = &["alpha", "beta", "gamma", "delta", "eps", "zeta", "eta"];

fn partial_strategy() -> impl Strategy<Value = PartialIndex> {
    (
        0..DOCS.len(),
        prop::collection::vec(0..TOKENS.len(), 0..6),
    )
        .prop_map(|(doc, tokens)| {
            let doc = DocId::from(DOCS[doc]);
            let mut partial = PartialIndex::new();
            for t in tokens {
                partial.insert(TOKENS[t], &doc);
            }
            partial
        })
}

proptest! {
    #[test]
    fn prop_merge_is_order_independent(
        (partials, shuffled) in prop::collection::vec(partial_strategy(), 0..12)
            .prop_flat_map(|v| {
                let shuffled = Just(v.clone()).prop_shuffle();
                (Just(v), shuffled)
            })
    ) {
        let forward = Merger::reduce(partials.clone());
        let permuted = Merger::reduce(shuffled.clone());
        let tree = Merger::reduce_tree(shuffled);

        prop_assert_eq!(&forward, &permuted);
        prop_assert_eq!(&forward, &tree);
    }

    #[test]
    fn prop_merge_is_associative(
        a in partial_strategy(),
        b in partial_strategy(),
        c in partial_strategy(),
    ) {
        let mut left = a.clone();
        left.merge(b.clone());
        left.merge(c.clone());

        let mut bc = b;
        bc.merge(c);
        let mut right = a;
        right.merge(bc);

        prop_assert_eq!(left, right);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reducer_with_racing_senders() {
    let partials: Vec<PartialIndex> = (0..200)
        .map(|i| {
            let doc = DocId::from(DOCS[i % DOCS.len()]);
            let mut p = PartialIndex::new();
            p.insert(TOKENS[i % TOKENS.len()], &doc);
            p.insert(&format!("t{}", i % 17), &doc);
            p
        })
        .collect();
    let expected = Merger::reduce(partials.clone());

    let (tx, rx) = mpsc::channel(4);
    let reducer = Merger::spawn(rx, 50);

    let mut senders = Vec::new();
    for chunk in partials.chunks(25) {
        let tx = tx.clone();
        let chunk = chunk.to_vec();
        senders.push(tokio::spawn(async move {
            for p in chunk.into_iter().rev() {
                tx.send(p).await.unwrap();
            }
        }));
    }
    drop(tx);
    for s in senders {
        s.await.unwrap();
    }

    let report = reducer.await.unwrap();
    assert_eq!(report.merged, 200);
    assert_eq!(report.index, expected);
}
