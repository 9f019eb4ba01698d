//! Static site content the derived unlock rules are evaluated against.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechGroup {
    pub title: String,
    pub technologies: Vec<Technology>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalLink {
    pub name: String,
    pub target: String,
    /// Untracked links never reach the progress store.
    pub tracked: bool,
}

/// Copy shown for a contextual notification of a given type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationStyle {
    pub kind: String,
    pub message: String,
    pub sub_message: Option<String>,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub technology_groups: Vec<TechGroup>,
    pub projects: Vec<Project>,
    pub external_links: Vec<ExternalLink>,
    pub notification_styles: Vec<NotificationStyle>,
}

fn tech(name: &str, description: &str, icon: &str) -> Technology {
    Technology {
        name: name.into(),
        description: description.into(),
        icon: icon.into(),
    }
}

fn project(id: &str, title: &str, url: &str) -> Project {
    Project {
        id: id.into(),
        title: title.into(),
        url: Some(url.into()),
    }
}

fn style(kind: &str, message: &str, sub_message: &str, icon: &str) -> NotificationStyle {
    NotificationStyle {
        kind: kind.into(),
        message: message.into(),
        sub_message: Some(sub_message.into()),
        icon: icon.into(),
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            technology_groups: vec![
                TechGroup {
                    title: "Backend".into(),
                    technologies: vec![
                        tech("Node.js", "Server-side JavaScript runtime", "⚡"),
                        tech("PHP", "Dynamic web development language", "🐘"),
                        tech("Laravel", "Modern PHP web framework", "🔥"),
                        tech("MySQL", "Popular relational database", "🗃️"),
                        tech("MongoDB", "Flexible NoSQL database", "🍃"),
                        tech("Redis", "High-performance cache", "🔴"),
                    ],
                },
                TechGroup {
                    title: "Frontend".into(),
                    technologies: vec![
                        tech("React", "Modern user interface library", "⚛️"),
                        tech("Next.js", "React-based full-stack framework", "▲"),
                        tech("TypeScript", "Type-safe superset of JavaScript", "📘"),
                        tech("Bootstrap", "Popular CSS framework", "🅱️"),
                        tech("Three.js", "3D graphics and WebGL library", "🎮"),
                        tech("GSAP", "Professional animation library", "✨"),
                    ],
                },
                TechGroup {
                    title: "Tools & Systems".into(),
                    technologies: vec![
                        tech("Git", "Distributed version control", "📝"),
                        tech("Docker", "Container-based deployment", "🐳"),
                        tech("AWS", "Amazon cloud infrastructure", "☁️"),
                        tech("Railway", "Modern cloud deployment platform", "🚂"),
                        tech("VS Code", "Flexible code editor", "💻"),
                    ],
                },
            ],
            projects: vec![
                project(
                    "haber-portali",
                    "Haber Portalı",
                    "https://haber-portali.up.railway.app/",
                ),
                project(
                    "api-showcase",
                    "API Showcase",
                    "https://api-showcase.up.railway.app/",
                ),
                project(
                    "cosmic-explorer",
                    "Cosmic Explorer",
                    "https://frontend-astrolog.up.railway.app/",
                ),
            ],
            external_links: vec![
                ExternalLink {
                    name: "github".into(),
                    target: "https://github.com/canpolatkaya".into(),
                    tracked: true,
                },
                ExternalLink {
                    name: "linkedin".into(),
                    target: "https://linkedin.com/in/canpolatkaya".into(),
                    tracked: true,
                },
                ExternalLink {
                    name: "email".into(),
                    target: "mailto:canpolatkaya@email.com".into(),
                    tracked: false,
                },
            ],
            notification_styles: vec![
                style("about", "That was my story...", "I hope you found it inspiring", "📖"),
                style(
                    "technologies",
                    "Is that enough?",
                    "I keep learning more",
                    "⚡",
                ),
                style("projects", "Did you like them?", "More on the way...", "🚀"),
            ],
        }
    }
}

impl Catalog {
    pub fn technology_names(&self) -> impl Iterator<Item = &str> {
        self.technology_groups
            .iter()
            .flat_map(|g| g.technologies.iter().map(|t| t.name.as_str()))
    }

    pub fn project_ids(&self) -> impl Iterator<Item = &str> {
        self.projects.iter().map(|p| p.id.as_str())
    }

    pub fn tracked_links(&self) -> impl Iterator<Item = &str> {
        self.external_links
            .iter()
            .filter(|l| l.tracked)
            .map(|l| l.name.as_str())
    }

    pub fn is_tracked_link(&self, name: &str) -> bool {
        self.tracked_links().any(|l| l == name)
    }

    /// Style for a notification type; unknown types fall back to the first
    /// entry (`about` in the default catalog).
    pub fn notification_style(&self, kind: &str) -> Option<&NotificationStyle> {
        self.notification_styles
            .iter()
            .find(|s| s.kind == kind)
            .or_else(|| self.notification_styles.first())
    }
}
