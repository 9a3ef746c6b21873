/// A sentence encoder producing fixed-length vectors.
///
/// Implementations must return vectors of length `dim()` for every input, in
/// input order.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}
