//! Result cards for the search page.

use crate::searcher::Prediction;

/// Whole-percent match shown on a card; NaN shows as 0.
pub fn percent_match(score: f32) -> i64 {
    (score * 100.0).floor() as i64
}

/// Feed titles arrive entity-encoded; decode once, then escape for output.
fn display_text(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    html_escape::encode_text(&decoded).into_owned()
}

pub fn render_card(prediction: &Prediction<'_>) -> String {
    let doc = prediction.document;
    format!(
        "<li class=\"list-item\"><div class=\"results-card\">\n  <a href=\"{href}\" target=\"_blank\" class=\"results-title\">{title}</a>\n  <p>{description}</p>\n  <span>{pct}% match</span>\n</div></li>",
        href = html_escape::encode_double_quoted_attribute(&doc.link),
        title = display_text(&doc.title),
        description = display_text(&doc.description),
        pct = percent_match(prediction.score),
    )
}

pub fn render_results(predictions: &[Prediction<'_>]) -> String {
    predictions.iter().map(render_card).collect::<Vec<_>>().join("\n")
}
