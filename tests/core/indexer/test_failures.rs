// Failure containment tests
//
// Missing and empty files must not stop the run.

use crate::common::{naive_index, to_map, TestCorpus};
use invidx::core::config::IndexingConfig;
use invidx::core::indexer::{CancelToken, IndexingPipeline};
use invidx::IndexError;

fn pipeline(chunk_size: u64) -> IndexingPipeline {
    IndexingPipeline::new(&IndexingConfig {
        chunk_size,
        workers: 3,
        read_buffer_size: 128,
        progress_interval: 100,
    })
    .expect("Failed to create pipeline")
}

#[tokio::test]
async fn test_missing_file_is_skipped() {
    let corpus = TestCorpus::with_files(&[("a.txt", "kept words"), ("b.txt", "more words")]);
    let mut files = corpus.files.clone();
    files.insert(1, corpus.missing("ghost.txt"));

    let (index, stats) = pipeline(4)
        .build_index(&files, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(stats.files_requested, 3);
    assert_eq!(stats.files_indexed, 2);
    assert_eq!(stats.files_skipped, 1);
    assert!(stats.chunk_failures.is_empty());
    assert_eq!(to_map(&index), naive_index(&corpus.files));
}

#[tokio::test]
async fn test_only_missing_files_yields_empty_index() {
    let corpus = TestCorpus::with_files(&[]);
    let files = vec![corpus.missing("x.txt"), corpus.missing("y.txt")];

    let (index, stats) = pipeline(4)
        .build_index(&files, &CancelToken::new())
        .await
        .unwrap();

    assert!(index.is_empty());
    assert_eq!(stats.files_skipped, 2);
}

#[tokio::test]
async fn test_empty_file_contributes_nothing() {
    let corpus = TestCorpus::with_files(&[("empty.txt", ""), ("full.txt", "content here")]);

    let (index, stats) = pipeline(4)
        .build_index(&corpus.files, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(stats.files_indexed, 2);
    assert_eq!(index.len(), 2);
    for (_, docs) in index.iter() {
        assert!(!docs.iter().any(|d| d.as_path().ends_with("empty.txt")));
    }
}

#[tokio::test]
async fn test_directory_argument_is_contained() {
    let corpus = TestCorpus::with_files(&[("a.txt", "fine")]);
    let mut files = corpus.files.clone();
    files.push(corpus.path().to_string_lossy().into_owned());

    let result = pipeline(4).build_index(&files, &CancelToken::new()).await;

    // Depending on the platform a directory fails at open or at read;
    // either way the run completes and the real file is indexed
    let (index, _stats) = result.unwrap();
    assert!(index.contains_token("fine"));
}

#[tokio::test]
async fn test_no_input_files() {
    let err = pipeline(4)
        .build_index(&[] as &[&str], &CancelToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, IndexError::NoInputFiles));
}

#[tokio::test]
async fn test_cancelled_run_reports_cancellation() {
    let corpus = TestCorpus::generated(4, 500, 11);
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = pipeline(64)
        .build_index(&corpus.files, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, IndexError::Cancelled));
}

#[tokio::test]
async fn test_cancel_mid_run_keeps_previous_output() {
    // Tiny chunks over a large corpus keep the run busy well past the cancel
    let corpus = TestCorpus::generated(4, 40_000, 5);
    let output = corpus.path().join("index.txt");
    std::fs::write(&output, "previous\n").unwrap();
    let cancel = CancelToken::new();

    let interrupt = async {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        cancel.cancel();
    };
    let pipeline = pipeline(16);
    let (result, ()) = tokio::join!(pipeline.run(&corpus.files, &output, &cancel), interrupt);

    assert!(matches!(result.unwrap_err(), IndexError::Cancelled));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous\n");
}
