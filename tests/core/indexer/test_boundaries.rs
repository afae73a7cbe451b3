// Chunk boundary tests
//
// Indexing must not depend on where the planner cuts a file.

use crate::common::{build_index, naive_index, to_map, TestCorpus};
use invidx::core::indexer::{is_token_byte, ChunkPlanner};
use proptest::prelude::*;

#[tokio::test]
async fn test_small_and_huge_chunks_agree() {
    let corpus = TestCorpus::generated(3, 6000, 7);

    let small = build_index(&corpus.files, 1024, 4).await;
    let huge = build_index(&corpus.files, 100 * 1024 * 1024, 4).await;

    assert_eq!(to_map(&small), to_map(&huge));
    assert_eq!(to_map(&small), naive_index(&corpus.files));
}

#[tokio::test]
async fn test_tiny_chunks_never_split_words() {
    let corpus = TestCorpus::with_files(&[(
        "words.txt",
        "internationalization localization globalization a bb ccc",
    )]);

    for chunk_size in [1, 2, 3, 5, 8, 13] {
        let index = build_index(&corpus.files, chunk_size, 3).await;
        let map = to_map(&index);
        assert!(
            map.contains_key("internationalization"),
            "chunk size {chunk_size}"
        );
        assert!(!map.contains_key("interna"), "chunk size {chunk_size}");
        assert_eq!(map, naive_index(&corpus.files), "chunk size {chunk_size}");
    }
}

#[tokio::test]
async fn test_file_without_separators() {
    let content = "x".repeat(10_000);
    let corpus = TestCorpus::with_files(&[("solid.txt", &content)]);

    let index = build_index(&corpus.files, 64, 4).await;

    assert_eq!(index.len(), 1);
    assert!(index.contains_token(&content));
}

#[tokio::test]
async fn test_multibyte_text_is_split_on_non_ascii() {
    let corpus = TestCorpus::with_files(&[(
        "utf8.txt",
        "caf\u{e9} na\u{ef}ve \u{4e2d}\u{6587}abc \u{1f980}rust",
    )]);

    for chunk_size in [1, 4, 1024] {
        let index = build_index(&corpus.files, chunk_size, 2).await;
        assert_eq!(to_map(&index), naive_index(&corpus.files));
        assert!(index.contains_token("caf"));
        assert!(index.contains_token("abc"));
        assert!(index.contains_token("rust"));
    }
}

fn text_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            4 => prop::sample::select(b"abcXYZ019".to_vec()),
            1 => prop::sample::select(b" ,.\n\t-".to_vec()),
            1 => any::<u8>(),
        ],
        0..400,
    )
}

proptest! {
    #[test]
    fn prop_plan_covers_input_without_splitting_words(
        data in text_strategy(),
        chunk_size in 1u64..64,
    ) {
        let ranges = ChunkPlanner::new(chunk_size).plan_slice(&data);

        if data.is_empty() {
            prop_assert!(ranges.is_empty());
        } else {
            prop_assert_eq!(ranges[0].start, 0);
            prop_assert_eq!(ranges[ranges.len() - 1].end, data.len() as u64);
            for r in &ranges {
                prop_assert!(r.start < r.end);
            }
            for pair in ranges.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
                let b = pair[0].end as usize;
                prop_assert!(!(is_token_byte(data[b - 1]) && is_token_byte(data[b])));
            }
        }
    }

    #[test]
    fn prop_chunked_index_matches_naive(
        data in text_strategy(),
        chunk_size in 1u64..48,
        workers in 1usize..5,
    ) {
        let corpus = TestCorpus::with_files(&[]);
        let path = corpus.path().join("input.bin");
        std::fs::write(&path, &data).unwrap();
        let files = vec![path.to_string_lossy().into_owned()];

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let index = runtime.block_on(build_index(&files, chunk_size, workers));

        prop_assert_eq!(to_map(&index), naive_index(&files));
    }
}
