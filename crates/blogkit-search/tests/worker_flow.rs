use std::fs;
use std::sync::{Arc, Condvar, Mutex};

use blogkit_core::traits::Embedder;
use blogkit_embed::FakeEmbedder;
use blogkit_search::feed::load_corpus;
use blogkit_search::{Outcome, SearchError, SearchSession, SearchWorker};

fn fake_worker(max_results: usize) -> SearchWorker {
    SearchWorker::spawn(|| Ok(Box::new(FakeEmbedder::new(1024)) as Box<dyn Embedder>), max_results)
}

/// Embedder that holds every batch until the test opens the gate, so the
/// order in which replies arrive is fixed.
struct GatedEmbedder {
    inner: FakeEmbedder,
    gate: Arc<(Mutex<bool>, Condvar)>,
}

impl Embedder for GatedEmbedder {
    fn dim(&self) -> usize { self.inner.dim() }
    fn max_len(&self) -> usize { self.inner.max_len() }
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let (open, cvar) = &*self.gate;
        let mut open = open.lock().unwrap();
        while !*open {
            open = cvar.wait(open).unwrap();
        }
        drop(open);
        self.inner.embed_batch(texts)
    }
}

fn open_gate(gate: &(Mutex<bool>, Condvar)) {
    *gate.0.lock().unwrap() = true;
    gate.1.notify_all();
}

async fn wait_for_generation(session: &SearchSession, generation: u64) {
    while session.latest_generation() < generation {
        tokio::task::yield_now().await;
    }
}

fn write_feed(dir: &std::path::Path, n: usize) -> String {
    let items: Vec<String> = (0..n)
        .map(|i| format!(r#"{{"title":"Post {i}","summary":"about subject{i}","url":"https://example.dev/{i}/"}}"#))
        .collect();
    let path = dir.join("feed.json");
    fs::write(&path, format!(r#"{{"items":[{}]}}"#, items.join(","))).unwrap();
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn search_before_load_is_rejected() {
    let worker = fake_worker(8);
    let err = worker.search(vec!["hello".into()], vec![]).await.unwrap_err();
    assert!(matches!(err, SearchError::ModelNotLoaded));
}

#[tokio::test]
async fn feed_to_ranked_results() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let corpus = load_corpus(&write_feed(tmp.path(), 20)).await?;
    assert_eq!(corpus.len(), 20);

    let worker = fake_worker(8);
    worker.load().await?;
    worker.load().await?;
    let results = worker.search(vec!["about subject5".into()], corpus.clone()).await?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].input, "about subject5");
    assert_eq!(results[0].predictions.len(), 8);

    let again = worker.search(vec!["about subject5".into()], corpus.clone()).await?;
    assert_eq!(results, again, "same inputs give the same order and scores");
    Ok(())
}

#[tokio::test]
async fn failed_load_can_be_retried() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let worker = SearchWorker::spawn(
        move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                anyhow::bail!("model files missing");
            }
            Ok(Box::new(FakeEmbedder::new(16)) as Box<dyn Embedder>)
        },
        8,
    );
    assert!(worker.load().await.is_err());
    assert!(worker.load().await.is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn newer_query_wins_over_older_response() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let corpus = load_corpus(&write_feed(tmp.path(), 10)).await?;
    let gate = Arc::new((Mutex::new(false), Condvar::new()));
    let worker_gate = gate.clone();
    let worker = SearchWorker::spawn(
        move || Ok(Box::new(GatedEmbedder { inner: FakeEmbedder::new(1024), gate: worker_gate.clone() }) as Box<dyn Embedder>),
        8,
    );
    worker.load().await?;
    let session = Arc::new(SearchSession::new(worker, corpus));

    // The older request is queued (and held by the gate) before the newer
    // one is submitted; only then may the worker answer either.
    let older = tokio::spawn({
        let session = session.clone();
        async move { session.submit("about subject1").await }
    });
    wait_for_generation(&session, 1).await;
    let newer = tokio::spawn({
        let session = session.clone();
        async move { session.submit("about subject2").await }
    });
    wait_for_generation(&session, 2).await;
    open_gate(&gate);

    let older = older.await?;
    let newer = newer.await?;
    assert!(matches!(older, Outcome::Stale { generation: 1, newest: 2 }), "{older:?}");
    let Outcome::Applied(result) = newer else { panic!("newest applies: {newer:?}") };
    assert_eq!(result.input, "about subject2");
    assert_eq!(session.last_good().await.map(|r| r.input).as_deref(), Some("about subject2"));

    // A failing search keeps the last good results.
    let failed = session.submit("   ").await;
    assert!(matches!(failed, Outcome::Failed(SearchError::EmptyQuery)));
    assert_eq!(session.last_good().await.map(|r| r.input).as_deref(), Some("about subject2"));

    let resolved = result.resolve(session.corpus());
    assert_eq!(resolved[0].document.link, "https://example.dev/2/");
    Ok(())
}
