//! Icon glyphs used by the page templates.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Upload,
    FileText,
    Brain,
    BarChart,
    Target,
    CheckCircle,
    Clock,
    TrendingUp,
    Sparkles,
    BookOpen,
    Award,
    Zap,
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Upload => "📁",
            Icon::FileText => "📄",
            Icon::Brain => "🧠",
            Icon::BarChart => "📊",
            Icon::Target => "🎯",
            Icon::CheckCircle => "✅",
            Icon::Clock => "⏰",
            Icon::TrendingUp => "📈",
            Icon::Sparkles => "✨",
            Icon::BookOpen => "📖",
            Icon::Award => "🏆",
            Icon::Zap => "⚡",
        }
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Glyph shown on each tab button.
pub fn tab_icon(tab: crate::models::Tab) -> Icon {
    use crate::models::Tab;
    match tab {
        Tab::Upload => Icon::Upload,
        Tab::Assessment => Icon::Target,
        Tab::Analytics => Icon::BarChart,
        Tab::Recommendations => Icon::Brain,
    }
}
