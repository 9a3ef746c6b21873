use blogkit_core::config::EmbedSettings;
use blogkit_core::traits::Embedder;
use blogkit_embed::get_default_embedder;

fn fake_settings() -> EmbedSettings {
    EmbedSettings { use_fake: true, ..EmbedSettings::default() }
}

#[test]
fn fake_embedder_shapes_and_determinism() {
    let embedder = get_default_embedder(&fake_settings()).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), embedder.dim());

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn fake_embedder_keeps_empty_text_at_zero() {
    let embedder = get_default_embedder(&fake_settings()).expect("embedder");
    let embs = embedder.embed_batch(&[String::new()]).expect("embed_batch");
    assert!(embs[0].iter().all(|x| *x == 0.0));
}
