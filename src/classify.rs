//! Tab categorization — a pure, stateless keyword match over URL and title.

use rand::Rng;

/// Tab category, in match-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Work,
    Learning,
    Entertainment,
    Social,
    Other,
}

const WORK_KW: &[&str] = &[
    "docs.google.com",
    "github.com",
    "gitlab.com",
    "jira",
    "confluence",
    "trello.com",
    "slack.com",
    "notion.so",
    "linkedin.com",
    "mail.google.com",
    "mail.yahoo.com",
    "mail.outlook.com",
];

const LEARNING_KW: &[&str] = &[
    "coursera.org",
    "udemy.com",
    "edx.org",
    "stackoverflow.com",
    "developer.",
    "learn",
    "tutorial",
    "documentation",
    "mdn",
    "w3schools.com",
];

const ENTERTAINMENT_KW: &[&str] = &[
    "youtube.com",
    "netflix.com",
    "twitch.tv",
    "spotify.com",
    "reddit.com",
    "game",
    "play",
    "movie",
    "video",
    "music",
];

const SOCIAL_KW: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "whatsapp.com",
    "telegram.org",
    "discord.com",
    "messenger",
    "chat",
    "social",
    "wechat",
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Learning => "learning",
            Self::Entertainment => "entertainment",
            Self::Social => "social",
            Self::Other => "other",
        }
    }

    /// Base importance contribution of the category.
    pub fn base_score(&self) -> f64 {
        match self {
            Self::Work => 0.8,
            Self::Learning => 0.7,
            Self::Social => 0.4,
            Self::Entertainment => 0.3,
            Self::Other => 0.5,
        }
    }

    /// Reminder message templates for this category.
    pub fn messages(&self) -> &'static [&'static str] {
        match self {
            Self::Work => &[
                "📊 Important work tab needs attention!",
                "💼 Time to check your work progress",
                "⚡ Don't forget about this work task",
            ],
            Self::Learning => &[
                "📚 Continue your learning journey!",
                "🎓 Time to study this material",
                "💡 Knowledge awaits - back to learning!",
            ],
            Self::Entertainment => &[
                "🎮 Entertainment tab reminder",
                "🎬 Your entertainment is waiting",
                "🎵 Back to your entertainment",
            ],
            Self::Social => &[
                "💬 Check your social updates",
                "👥 Social interaction waiting",
                "🤝 Stay connected - check this tab",
            ],
            Self::Other => &[
                "📌 Tab reminder",
                "🔔 Don't forget this tab",
                "⭐ Tab needs attention",
            ],
        }
    }
}

/// Classify a tab by URL and title. First matching category wins, in
/// work > learning > entertainment > social order.
pub fn classify(url: &str, title: &str) -> Category {
    let url = url.to_lowercase();
    let title = title.to_lowercase();

    let groups: &[(Category, &[&str])] = &[
        (Category::Work, WORK_KW),
        (Category::Learning, LEARNING_KW),
        (Category::Entertainment, ENTERTAINMENT_KW),
        (Category::Social, SOCIAL_KW),
    ];

    for (category, keywords) in groups {
        if keywords
            .iter()
            .any(|kw| url.contains(kw) || title.contains(kw))
        {
            return *category;
        }
    }
    Category::Other
}

/// Pick one of the category's message templates uniformly at random.
pub fn pick_message(category: Category) -> &'static str {
    let messages = category.messages();
    messages[rand::thread_rng().gen_range(0..messages.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_url() {
        assert_eq!(classify("https://github.com/rust-lang/rust", ""), Category::Work);
        assert_eq!(classify("https://stackoverflow.com/q/1", ""), Category::Learning);
        assert_eq!(classify("https://youtube.com/watch?v=x", ""), Category::Entertainment);
        assert_eq!(classify("https://discord.com/channels/1", ""), Category::Social);
        assert_eq!(classify("https://example.com/", "plain page"), Category::Other);
    }

    #[test]
    fn test_classify_by_title() {
        assert_eq!(classify("https://example.com/", "Rust Tutorial"), Category::Learning);
        assert_eq!(classify("https://example.com/", "Best Movie Trailers"), Category::Entertainment);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("https://GitHub.com/X", ""), Category::Work);
        assert_eq!(classify("", "LEARN RUST"), Category::Learning);
    }

    #[test]
    fn test_classify_priority_order() {
        // "github.com" (work) beats "tutorial" (learning) in the same tab.
        assert_eq!(
            classify("https://github.com/x/y", "Tutorial"),
            Category::Work
        );
    }

    #[test]
    fn test_pick_message_comes_from_category() {
        for _ in 0..20 {
            let msg = pick_message(Category::Learning);
            assert!(Category::Learning.messages().contains(&msg));
        }
    }
}
