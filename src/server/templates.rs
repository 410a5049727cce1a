//! HTML templates for the learning platform page.
//!
//! [`render_app`] is a pure function of [`AppState`]. Interactive elements
//! carry a `data-action` attribute; the page shell installs a single delegated
//! listener on `#root`, so nothing needs rebinding after a render.

use crate::icons::{tab_icon, Icon};
use crate::models::{AppState, ProcessingStatus, Tab};

/// Extensions offered by the file picker. Advisory only.
pub const ACCEPTED_EXTENSIONS: &str = ".pdf,.doc,.docx,.txt";

/// Fixed fill of the upload progress bar while processing.
pub const PROCESSING_PROGRESS: u8 = 65;

/// Class added to the selected file row.
pub const SELECTED_CLASS: &str = "bg-primary/10";

/// Full HTML document wrapping the app markup.
pub fn page(session_id: &str, state: &AppState) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Adaptive Learning Platform</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <div id="root" data-session="{}" data-revision="{}">{}</div>
    <script>{}</script>
</body>
</html>"#,
        html_escape(session_id),
        state.revision,
        render_app(state),
        BINDINGS_JS
    )
}

/// Static snapshot without the binding script, for `adaptlearn render`.
pub fn static_page(state: &AppState) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Adaptive Learning Platform</title>
    <style>{}</style>
</head>
<body>
    <div id="root">{}</div>
</body>
</html>"#,
        CSS,
        render_app(state)
    )
}

/// Markup for the contents of `#root`.
pub fn render_app(state: &AppState) -> String {
    let tabs: String = Tab::ALL
        .iter()
        .map(|tab| tab_trigger(*tab, state.current_tab))
        .collect();

    format!(
        r#"
      <div class="min-h-screen bg-background">
        {}
        <div class="px-6 py-12">
          <div class="mx-auto max-w-7xl">
            <div class="space-y-8">
              <div class="tab-list">{}</div>
              <div id="tab-content" data-panel="{}">
                {}
              </div>
            </div>
          </div>
        </div>
      </div>
    "#,
        hero(),
        tabs,
        state.current_tab,
        render_tab_content(state)
    )
}

/// Markup for the active tab panel only.
pub fn render_tab_content(state: &AppState) -> String {
    match state.current_tab {
        Tab::Upload => upload_tab(state),
        Tab::Assessment => assessment_tab(state),
        Tab::Analytics => analytics_tab(),
        Tab::Recommendations => recommendations_tab(),
    }
}

fn hero() -> String {
    format!(
        r#"
        <div class="relative overflow-hidden">
          <div class="gradient-hero absolute inset-0 opacity-10"></div>
          <div class="relative px-6 py-24 text-center">
            <div class="mx-auto max-w-4xl">
              <div class="ai-badge mb-6 animate-pulse-slow inline-flex items-center">
                <span class="mr-2">{sparkles}</span>
                AI-Powered Learning
              </div>
              <h1 class="mb-6 text-5xl font-bold tracking-tight">Adaptive Learning Platform</h1>
              <p class="mb-8 text-xl text-muted-foreground leading-relaxed">
                Create a personalized study system with document processing, automated assessment generation,
                progress analytics, and AI-driven study recommendations.
              </p>
              <div class="flex justify-center gap-4 flex-wrap">
                <button class="btn-primary"><span class="mr-2">{upload}</span>Start Learning</button>
                <button class="btn-outline"><span class="mr-2">{chart}</span>View Analytics</button>
              </div>
            </div>
          </div>
        </div>"#,
        sparkles = Icon::Sparkles,
        upload = Icon::Upload,
        chart = Icon::BarChart,
    )
}

fn tab_trigger(tab: Tab, current: Tab) -> String {
    let active = if tab == current { " active" } else { "" };
    format!(
        r#"
                <button class="tab-trigger{}" data-action="select-tab" data-tab="{}">
                  <span class="mr-2">{}</span>
                  {}
                </button>"#,
        active,
        tab,
        tab_icon(tab),
        tab.label()
    )
}

fn card_header(icon: Icon, title: &str, subtitle: &str) -> String {
    format!(
        r#"
          <div class="mb-4">
            <h3 class="text-lg font-semibold flex items-center gap-2 mb-2">
              <span>{}</span>
              {}
            </h3>
            <p class="text-sm text-muted-foreground">{}</p>
          </div>"#,
        icon, title, subtitle
    )
}

fn progress_bar(percent: u8, extra_class: &str) -> String {
    format!(
        r#"<div class="progress-bar{}"><div class="progress-bar-fill" style="width: {}%"></div></div>"#,
        extra_class, percent
    )
}

fn disabled_attr(state: &AppState) -> &'static str {
    if state.has_files() {
        ""
    } else {
        " disabled"
    }
}

fn upload_tab(state: &AppState) -> String {
    let progress = if state.processing_status == ProcessingStatus::Processing {
        format!(
            r#"
            <div class="space-y-2" id="processing-indicator">
              <div class="flex items-center gap-2 text-sm">
                <span class="animate-spin">{}</span>
                Processing documents...
              </div>
              {}
            </div>"#,
            Icon::Clock,
            progress_bar(PROCESSING_PROGRESS, "")
        )
    } else {
        String::new()
    };

    let files = if state.uploaded_files.is_empty() {
        r#"<p class="text-sm text-muted-foreground">No files uploaded yet</p>"#.to_string()
    } else {
        state
            .uploaded_files
            .iter()
            .map(|file| file_row(file, state.selected_file.as_deref() == Some(file.as_str())))
            .collect()
    };

    format!(
        r#"
      <div class="grid gap-6 md:grid-cols-2">
        <div class="learning-card">
          {}
          <div class="space-y-4">
            <div class="border-2 border-dashed border-border rounded-lg p-8 text-center transition-smooth hover:border-primary/50">
              <div class="text-4xl mb-4">{}</div>
              <p class="text-sm text-muted-foreground mb-2">Drag and drop files here, or click to browse</p>
              <input type="file" multiple accept="{}" class="hidden" id="file-upload" data-action="receive-files" />
              <label for="file-upload" class="btn-outline cursor-pointer inline-block">Choose Files</label>
            </div>
            {}
          </div>
        </div>
        <div class="learning-card">
          {}
          <div class="space-y-2" id="file-list">{}</div>
        </div>
      </div>"#,
        card_header(
            Icon::FileText,
            "Upload Documents",
            "Upload your study materials for AI-powered processing and analysis"
        ),
        Icon::Upload,
        ACCEPTED_EXTENSIONS,
        progress,
        card_header(
            Icon::CheckCircle,
            "Processed Files",
            "Files ready for assessment generation and study recommendations"
        ),
        files
    )
}

fn file_row(name: &str, selected: bool) -> String {
    let highlight = if selected {
        format!(" {}", SELECTED_CLASS)
    } else {
        String::new()
    };
    let name = html_escape(name);

    format!(
        r#"
            <div class="flex items-center justify-between p-3 rounded-lg bg-secondary/50 cursor-pointer transition-smooth hover:bg-secondary{}" data-action="select-file" data-file="{}">
              <div class="flex items-center gap-3">
                <span>{}</span>
                <span class="text-sm font-medium">{}</span>
              </div>
              <div class="badge-success badge"><span class="mr-1">{}</span>Processed</div>
            </div>"#,
        highlight,
        name,
        Icon::FileText,
        name,
        Icon::CheckCircle
    )
}

fn assessment_tab(state: &AppState) -> String {
    let disabled = disabled_attr(state);

    let ready = if state.assessment_ready() {
        format!(
            r#"
      <div class="learning-card animate-float" id="assessment-ready">
        <div class="mb-4">
          <h3 class="text-lg font-semibold flex items-center gap-2"><span>{}</span>Generated Assessment Ready!</h3>
        </div>
        <div class="space-y-3">
          <div class="flex items-center justify-between p-3 rounded-lg bg-accent/10">
            <span class="font-medium">Multiple Choice Quiz</span>
            <div class="ai-badge">15 Questions</div>
          </div>
          <div class="flex items-center justify-between p-3 rounded-lg bg-success/10">
            <span class="font-medium">Key Concepts Review</span>
            <div class="badge">8 Topics</div>
          </div>
          <button class="btn-primary w-full mt-4">Start Assessment</button>
        </div>
      </div>"#,
            Icon::Sparkles
        )
    } else {
        String::new()
    };

    format!(
        r#"
      <div class="grid gap-6 md:grid-cols-3">
        <div class="learning-card">
          {}
          <button class="btn-primary w-full" id="generate-quiz" data-action="generate-quiz"{}>
            <span class="mr-2">{}</span>
            Generate Quiz
          </button>
          <p class="text-xs text-muted-foreground mt-2">{} documents available</p>
        </div>
        <div class="learning-card">
          {}
          <button class="btn-outline w-full" id="create-flashcards"{}><span class="mr-2">{}</span>Create Flashcards</button>
        </div>
        <div class="learning-card">
          {}
          <button class="btn-outline w-full" id="generate-test"{}><span class="mr-2">{}</span>Generate Test</button>
        </div>
      </div>
      {}"#,
        card_header(
            Icon::Target,
            "Generate Quiz",
            "AI-generated questions based on your documents"
        ),
        disabled,
        Icon::Zap,
        state.uploaded_files.len(),
        card_header(
            Icon::BookOpen,
            "Flashcards",
            "Key concepts extracted from your materials"
        ),
        disabled,
        Icon::Brain,
        card_header(
            Icon::Award,
            "Practice Test",
            "Comprehensive assessment for mastery"
        ),
        disabled,
        Icon::Target,
        ready
    )
}

fn stat_card(label: &str, value: &str, icon: Icon, bar: Option<u8>) -> String {
    let bar = bar
        .map(|pct| progress_bar(pct, " mt-2"))
        .unwrap_or_default();
    format!(
        r#"
        <div class="learning-card">
          <div class="flex items-center justify-between">
            <div>
              <p class="text-sm font-medium text-muted-foreground">{}</p>
              <p class="text-2xl font-bold">{}</p>
            </div>
            <div class="progress-ring"><span class="text-2xl p-2 block text-white">{}</span></div>
          </div>
          {}
        </div>"#,
        label, value, icon, bar
    )
}

fn analytics_tab() -> String {
    let subjects: String = [("Mathematics", 92), ("Science", 78), ("History", 85)]
        .iter()
        .map(|(subject, pct)| {
            format!(
                r#"
          <div class="space-y-3">
            <div class="flex items-center justify-between">
              <span class="text-sm font-medium">{}</span>
              <span class="text-sm text-muted-foreground">{}%</span>
            </div>
            {}
          </div>"#,
                subject,
                pct,
                progress_bar(*pct, "")
            )
        })
        .collect();

    format!(
        r#"
      <div class="grid gap-6 md:grid-cols-2 lg:grid-cols-4">{}{}{}{}</div>
      <div class="learning-card">
        <div class="mb-4">
          <h3 class="text-lg font-semibold">Learning Progress</h3>
          <p class="text-sm text-muted-foreground">Your performance across different subjects</p>
        </div>
        <div class="space-y-4">{}</div>
      </div>"#,
        stat_card("Study Streak", "12 Days", Icon::TrendingUp, None),
        stat_card("Accuracy Rate", "87%", Icon::Target, Some(87)),
        stat_card("Topics Mastered", "24", Icon::Award, None),
        stat_card("Study Time", "4.2h", Icon::Clock, None),
        subjects
    )
}

struct Recommendation {
    tone: &'static str,
    icon: Icon,
    title: &'static str,
    body: &'static str,
    button_class: &'static str,
    button: &'static str,
}

const RECOMMENDATIONS: [Recommendation; 3] = [
    Recommendation {
        tone: "accent",
        icon: Icon::Sparkles,
        title: "Focus on Weak Areas",
        body: "Your Science performance could improve. Try spending 20 more minutes daily on chemistry concepts.",
        button_class: "btn-outline",
        button: "Start Chemistry Review",
    },
    Recommendation {
        tone: "success",
        icon: Icon::TrendingUp,
        title: "Maintain Your Streak",
        body: "Great job on your 12-day streak! Keep up the momentum with today's recommended 30-minute session.",
        button_class: "btn-primary",
        button: "Continue Streak",
    },
    Recommendation {
        tone: "primary",
        icon: Icon::Target,
        title: "Practice Advanced Topics",
        body: "You've mastered the basics in Mathematics. Ready to tackle advanced calculus problems?",
        button_class: "btn-outline",
        button: "View Advanced Topics",
    },
];

fn recommendations_tab() -> String {
    let recommendations: String = RECOMMENDATIONS
        .iter()
        .map(|r| {
            format!(
                r#"
          <div class="p-4 rounded-lg bg-{tone}/10 border border-{tone}/20">
            <div class="flex items-start gap-3">
              <div class="progress-ring flex-shrink-0"><span class="text-sm p-1 block text-white">{icon}</span></div>
              <div class="flex-1">
                <h4 class="font-medium mb-1">{title}</h4>
                <p class="text-sm text-muted-foreground mb-3">{body}</p>
                <button class="{button_class} text-sm px-4 py-2">{button}</button>
              </div>
            </div>
          </div>"#,
                tone = r.tone,
                icon = r.icon,
                title = r.title,
                body = html_escape(r.body),
                button_class = r.button_class,
                button = r.button,
            )
        })
        .collect();

    let schedule: String = [
        ("Morning (9-11 AM)", "Mathematics"),
        ("Afternoon (2-4 PM)", "Science"),
        ("Evening (7-8 PM)", "Review"),
    ]
    .iter()
    .map(|(slot, subject)| {
        format!(
            r#"
            <div class="flex items-center justify-between p-2 rounded bg-secondary/50">
              <span class="text-sm">{}</span>
              <div class="badge">{}</div>
            </div>"#,
            slot, subject
        )
    })
    .collect();

    let styles: String = [("Visual Learning", 85), ("Kinesthetic Learning", 60), ("Auditory Learning", 45)]
        .iter()
        .map(|(style, pct)| {
            format!(
                r#"
            <div class="flex items-center justify-between">
              <span class="text-sm">{}</span>
              <span class="text-sm font-medium">{}%</span>
            </div>
            {}"#,
                style,
                pct,
                progress_bar(*pct, "")
            )
        })
        .collect();

    format!(
        r#"
      <div class="learning-card">
        <div class="mb-4">
          <h3 class="text-lg font-semibold flex items-center gap-2"><span>{}</span>AI Study Recommendations</h3>
          <p class="text-sm text-muted-foreground">Personalized suggestions based on your learning patterns and performance</p>
        </div>
        <div class="space-y-4">{}</div>
      </div>
      <div class="grid gap-6 md:grid-cols-2">
        <div class="learning-card">
          <div class="mb-4"><h3 class="text-lg font-semibold">Optimal Study Schedule</h3></div>
          <div class="space-y-3">{}</div>
        </div>
        <div class="learning-card">
          <div class="mb-4"><h3 class="text-lg font-semibold">Learning Style Analysis</h3></div>
          <div class="space-y-3">{}</div>
        </div>
      </div>"#,
        Icon::Brain,
        recommendations,
        schedule,
        styles
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Delegated event binding for `#root`.
///
/// Listeners sit on the root element, which is never replaced, so they
/// survive every render. A long-poll picks up renders caused by timers.
pub const BINDINGS_JS: &str = r#"
(function () {
    const root = document.getElementById('root');
    const base = `/api/sessions/${root.dataset.session}`;
    let revision = parseInt(root.dataset.revision, 10) || 0;

    function apply(view) {
        if (view.revision < revision) return;
        revision = view.revision;
        root.innerHTML = view.html;
    }

    async function send(action) {
        const res = await fetch(`${base}/actions`, {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(action),
        });
        if (res.ok) apply(await res.json());
    }

    root.addEventListener('click', (e) => {
        const el = e.target.closest('[data-action]');
        if (!el || el.disabled) return;
        switch (el.dataset.action) {
            case 'select-tab':
                send({ action: 'select-tab', tab: el.dataset.tab });
                break;
            case 'generate-quiz':
                send({ action: 'generate-quiz' });
                break;
            case 'select-file':
                send({ action: 'select-file', name: el.dataset.file });
                break;
        }
    });

    root.addEventListener('change', (e) => {
        const el = e.target.closest('[data-action="receive-files"]');
        if (!el || !el.files || el.files.length === 0) return;
        send({ action: 'receive-files', files: Array.from(el.files).map(f => f.name) });
    });

    const backoff = () => new Promise(r => setTimeout(r, 1000));

    async function poll() {
        for (;;) {
            try {
                const res = await fetch(`${base}/view?since=${revision}`);
                if (res.status === 404) return;
                if (!res.ok) {
                    await backoff();
                    continue;
                }
                const view = await res.json();
                // A timed-out poll carries unchanged markup.
                if (view.rendered) apply(view);
            } catch (_) {
                await backoff();
            }
        }
    }

    poll();
})();
"#;

/// Minimal stylesheet for the classes the templates reference.
pub const CSS: &str = r#"
:root {
    --bg: #f8fafc;
    --text: #0f172a;
    --text-muted: #64748b;
    --primary: #6366f1;
    --accent: #8b5cf6;
    --success: #10b981;
    --secondary: #e2e8f0;
    --border: #cbd5e1;
}

* { box-sizing: border-box; }

body {
    margin: 0;
    font-family: system-ui, -apple-system, sans-serif;
    background: var(--bg);
    color: var(--text);
}

.hidden { display: none; }
.text-center { text-align: center; }
.text-muted-foreground { color: var(--text-muted); }
.mx-auto { margin-left: auto; margin-right: auto; }
.max-w-4xl { max-width: 56rem; }
.max-w-7xl { max-width: 80rem; }
.px-6 { padding-left: 1.5rem; padding-right: 1.5rem; }
.py-12 { padding-top: 3rem; padding-bottom: 3rem; }
.py-24 { padding-top: 6rem; padding-bottom: 6rem; }
.flex { display: flex; }
.grid { display: grid; }
.items-center { align-items: center; }
.justify-between { justify-content: space-between; }
.gap-6 { gap: 1.5rem; }
.space-y-4 > * + * { margin-top: 1rem; }

@media (min-width: 768px) {
    .md\:grid-cols-2 { grid-template-columns: repeat(2, 1fr); }
    .md\:grid-cols-3 { grid-template-columns: repeat(3, 1fr); }
}

@media (min-width: 1024px) {
    .lg\:grid-cols-4 { grid-template-columns: repeat(4, 1fr); }
}

.gradient-hero { background: linear-gradient(135deg, var(--primary), var(--accent)); }

.ai-badge, .badge {
    display: inline-block;
    padding: 0.25rem 0.75rem;
    border-radius: 9999px;
    font-size: 0.75rem;
    background: var(--secondary);
}
.ai-badge { background: var(--accent); color: #fff; }
.badge-success { background: var(--success); color: #fff; }

.btn-primary, .btn-outline {
    padding: 0.5rem 1rem;
    border-radius: 0.5rem;
    cursor: pointer;
    font-weight: 500;
}
.btn-primary { background: var(--primary); color: #fff; border: none; }
.btn-outline { background: transparent; border: 1px solid var(--border); }
button:disabled { opacity: 0.5; cursor: not-allowed; }

.tab-list {
    display: grid;
    grid-template-columns: repeat(4, 1fr);
    gap: 0.25rem;
    padding: 0.25rem;
    border-radius: 0.5rem;
    background: var(--secondary);
}
.tab-trigger {
    padding: 0.5rem;
    border: none;
    border-radius: 0.375rem;
    background: transparent;
    cursor: pointer;
}
.tab-trigger.active { background: #fff; box-shadow: 0 1px 2px rgba(0, 0, 0, 0.1); }

.learning-card {
    padding: 1.5rem;
    border-radius: 0.75rem;
    background: #fff;
    border: 1px solid var(--border);
}

.progress-bar {
    height: 0.5rem;
    border-radius: 9999px;
    background: var(--secondary);
    overflow: hidden;
}
.progress-bar-fill { height: 100%; background: var(--primary); }
.progress-ring {
    border-radius: 9999px;
    background: linear-gradient(135deg, var(--primary), var(--accent));
}

.bg-primary\/10 { background: rgba(99, 102, 241, 0.1); }
"#;
