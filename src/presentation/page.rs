//! Renders the single-page UI for a [`Session`].

use crate::models::{AnalysisResult, DetailedPoint, SummaryUpgrade};
use crate::presentation::session::Session;
use crate::presentation::view::{
    card_for, experience_points, highlight_segments, points_for_tab, visible_summary_upgrade,
    CardBody, ScoreBand, Tab,
};
use crate::presentation::widgets::{
    error_banner, escape_html, highlighted, loader, tabs, EMPTY_TAB_TEXT,
};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 24px; color: #1f2933; }
header h1 { margin-bottom: 4px; }
.subtitle { color: #52606d; margin-top: 0; }
.form-container { display: flex; gap: 12px; align-items: center; margin: 16px 0; }
.file-label { border: 1px dashed #9aa5b1; padding: 10px 14px; border-radius: 6px; cursor: pointer; }
.primary-btn { padding: 10px 16px; border: 0; border-radius: 6px; background: #2f80ed; color: #fff; cursor: pointer; }
.primary-btn:disabled { background: #9aa5b1; cursor: not-allowed; }
.error-box { background: #fde8e8; color: #9b1c1c; padding: 10px 14px; border-radius: 6px; margin: 12px 0; }
.loader { padding: 8px 12px; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.12); margin: 12px 0; }
.score-box { font-size: 1.4rem; margin: 16px 0; }
.score-number { font-weight: 700; font-size: 2.4rem; margin: 0 6px; }
.score-high .score-number { color: #2f9e44; }
.score-medium .score-number { color: #e67700; }
.score-low .score-number { color: #c92a2a; }
.tabs { display: flex; gap: 8px; margin: 16px 0 8px; }
.tab-btn { padding: 8px 12px; border: 1px solid #ccc; border-radius: 6px; background: #fff; cursor: pointer; }
.tab-btn.active { border: 2px solid #333; background: #fafafa; }
.tab-panel ul, .experience ul { list-style: none; padding: 0; }
.point { border: 1px solid #e4e7eb; border-radius: 8px; padding: 12px; margin-bottom: 10px; }
.badge { font-size: 0.75rem; padding: 2px 8px; border-radius: 10px; margin-right: 8px; color: #fff; }
.badge-red { background: #c92a2a; }
.badge-yellow { background: #e67700; }
.badge-green { background: #2f9e44; }
.section { font-weight: 600; }
.compare { display: grid; grid-template-columns: 1fr 1fr; gap: 10px; }
.before { background: #fff5f5; padding: 8px; border-radius: 6px; }
.after { background: #ebfbee; padding: 8px; border-radius: 6px; }
.praise { background: #ebfbee; padding: 8px; border-radius: 6px; }
.no-content { color: #7b8794; font-style: italic; }
mark { background: #ffe066; }
"#;

const SCRIPT: &str = r#"
document.querySelectorAll('[data-tab]').forEach(function (btn) {
  btn.addEventListener('click', function () {
    document.querySelectorAll('[data-tab]').forEach(function (b) { b.classList.toggle('active', b === btn); });
    document.querySelectorAll('[data-panel]').forEach(function (p) { p.hidden = p.dataset.panel !== btn.dataset.tab; });
    var form = document.querySelector('form');
    if (form) { form.action = '/?tab=' + btn.dataset.tab; }
  });
});
var input = document.getElementById('resume-upload');
var submit = document.getElementById('submit-btn');
if (input && submit) {
  input.addEventListener('change', function () {
    var file = input.files[0];
    var label = document.querySelector('.file-label');
    if (file && file.type === 'application/pdf') {
      label.textContent = 'Selected: ' + file.name;
      submit.disabled = false;
    } else {
      label.textContent = 'Please upload a PDF file.';
      submit.disabled = true;
    }
  });
  submit.form.addEventListener('submit', function () {
    submit.disabled = true;
    submit.textContent = 'Analyzing Resume...';
    document.getElementById('pending-loader').hidden = false;
  });
}
var copy = document.getElementById('copy-best-summary');
if (copy) {
  copy.addEventListener('click', function () {
    navigator.clipboard.writeText(document.getElementById('best-summary').innerText).then(function () {
      copy.textContent = 'Copied!';
    });
  });
}
"#;

pub fn render_page(session: &Session) -> String {
    let mut body = String::new();

    body.push_str(
        r#"<header><h1>AI-Powered ATS Resume Analyzer</h1><p class="subtitle">Upload your resume (PDF)</p></header>"#,
    );
    body.push_str(&render_form(session));

    if let Some(message) = session.error() {
        body.push_str(&error_banner(message));
    }

    if session.is_loading() {
        body.push_str(&loader());
    }
    body.push_str(&format!(r#"<div id="pending-loader" hidden>{}</div>"#, loader()));

    if let Some(analysis) = session.analysis() {
        body.push_str(&render_results(analysis, session.active_tab()));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>ATS Resume Analyzer</title><style>{}</style></head>\
         <body>{}<script>{}</script></body></html>",
        STYLE, body, SCRIPT
    )
}

fn render_form(session: &Session) -> String {
    let label = match session.file() {
        Some(file) => format!("Selected: {}", escape_html(&file.name)),
        None => "Click here to choose a PDF Resume...".to_string(),
    };
    let button = if session.is_loading() {
        r#"<button id="submit-btn" type="submit" class="primary-btn" disabled>Analyzing Resume...</button>"#
    } else {
        r#"<button id="submit-btn" type="submit" class="primary-btn">Get ATS Score &amp; Feedback</button>"#
    };

    format!(
        r#"<form method="post" action="/?tab={tab}" enctype="multipart/form-data" class="form-container"><label for="resume-upload" class="file-label">{label}</label><input id="resume-upload" type="file" name="file" accept="application/pdf,.pdf">{button}</form>"#,
        label = label,
        tab = session.active_tab().id(),
        button = button,
    )
}

pub fn render_results(analysis: &AnalysisResult, active: Tab) -> String {
    let mut html = String::from(r#"<div class="results-container">"#);

    let band = ScoreBand::from_score(analysis.ats_score);
    html.push_str(&format!(
        r#"<div class="score-box score-{band}"><span class="score-label">ATS Score:</span><span class="score-number">{score}</span><span class="score-out-of">/ 100</span></div>"#,
        band = band.as_str(),
        score = analysis.ats_score,
    ));

    html.push_str(&format!(
        r#"<div class="summary"><h2>AI Summary</h2><p>{}</p></div>"#,
        escape_html(&analysis.summary)
    ));

    if let Some(upgrade) = visible_summary_upgrade(analysis) {
        html.push_str(&render_summary_upgrade(upgrade));
    }

    let experience = experience_points(&analysis.detailed_points);
    if !experience.is_empty() {
        html.push_str(&render_experience_panel(&experience));
    }

    html.push_str(&tabs(active));
    for tab in Tab::ALL {
        let points = points_for_tab(&analysis.detailed_points, tab);
        html.push_str(&format!(
            r#"<div class="tab-panel" data-panel="{id}"{hidden}><ul>"#,
            id = tab.id(),
            hidden = if tab == active { "" } else { " hidden" },
        ));
        if points.is_empty() {
            html.push_str(&format!(r#"<li class="no-content">{}</li>"#, EMPTY_TAB_TEXT));
        }
        for point in points {
            html.push_str(&render_point_card(point));
        }
        html.push_str("</ul></div>");
    }

    html.push_str("</div>");
    html
}

pub fn render_summary_upgrade(upgrade: &SummaryUpgrade) -> String {
    let original = highlighted(&highlight_segments(
        &upgrade.original_summary,
        &upgrade.weak_highlights,
    ));
    format!(
        r#"<div class="summary-upgrade"><h2>Summary Upgrade</h2><div class="compare"><div class="before"><h4>Original</h4><p>{original}</p></div><div class="after"><h4>Best</h4><p id="best-summary">{best}</p><button type="button" id="copy-best-summary">Copy</button></div></div></div>"#,
        original = original,
        best = escape_html(&upgrade.best_summary),
    )
}

fn render_experience_panel(points: &[&DetailedPoint]) -> String {
    let mut html = String::from(
        r#"<div class="experience"><h2>Work Experience Optimization</h2><p class="subtitle">Bullets rewritten with the STAR method (Situation, Task, Action, Result).</p><ul>"#,
    );
    for point in points {
        html.push_str(&render_point_card(point));
    }
    html.push_str("</ul></div>");
    html
}

pub fn render_point_card(point: &DetailedPoint) -> String {
    let card = card_for(point);

    let badge = card
        .badge
        .map(|b| format!(r#"<span class="badge {}">{}</span>"#, b.css_class(), b.label()))
        .unwrap_or_default();

    let body = match card.body {
        CardBody::Comparison {
            before,
            after,
            explanation,
        } => format!(
            r#"<div class="compare"><div class="before"><h4>Before</h4><p>{before}</p></div><div class="after"><h4>After</h4><p>{after}</p></div></div><p class="explanation">{explanation}</p>"#,
            before = highlighted(&highlight_segments(before, card.highlights)),
            after = escape_html(after),
            explanation = escape_html(explanation),
        ),
        CardBody::Explanation { explanation } => format!(
            r#"<div class="praise"><p class="explanation">{}</p></div>"#,
            escape_html(explanation)
        ),
    };

    format!(
        r#"<li class="point"><div class="point-head">{badge}<span class="section">{section}</span></div><p class="issue">{issue}</p>{body}</li>"#,
        badge = badge,
        section = escape_html(card.section),
        issue = escape_html(card.issue),
        body = body,
    )
}
