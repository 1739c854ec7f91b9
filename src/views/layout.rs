//! App shell chrome and landing-page content

use crate::guard::Route;
use crate::models::User;

pub const PRODUCT_NAME: &str = "NarrativeIQ";
pub const TAGLINE: &str = "AI-powered narrative intelligence";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
}

pub const NAV_ITEMS: [NavItem; 6] = [
    NavItem { route: Route::Dashboard, label: "Workspace" },
    NavItem { route: Route::Story, label: "Story" },
    NavItem { route: Route::Mindmap, label: "Mindmap" },
    NavItem { route: Route::Documents, label: "Documents" },
    NavItem { route: Route::History, label: "History" },
    NavItem { route: Route::Profile, label: "Profile" },
];

/// Landing page feature card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
    pub badge: Option<&'static str>,
}

pub const FEATURES: [Feature; 6] = [
    Feature {
        title: "Persona Enhancement",
        description: "Rewrite in 6 distinct voices: technical, business, poetic, and more.",
        badge: None,
    },
    Feature {
        title: "Consistency Analysis",
        description: "Detect plot holes, timeline issues, and character contradictions.",
        badge: None,
    },
    Feature {
        title: "Story Completion",
        description: "Start with an idea, get a full narrative with structure.",
        badge: None,
    },
    Feature {
        title: "Character Tracking",
        description: "Map emotional arcs and behavioral evolution.",
        badge: None,
    },
    Feature {
        title: "Deep Scan",
        description: "Combined consistency + structure analysis in one sweep.",
        badge: None,
    },
    Feature {
        title: "Narrative Mindmap",
        description: "Extract characters, locations, themes & relationships as a downloadable knowledge graph.",
        badge: Some("New"),
    },
];

/// Credits badge text; zero when nobody is signed in
pub fn credits_badge(user: Option<&User>) -> String {
    format!("{} credits", user.map(|u| u.credits).unwrap_or(0))
}

/// Upper-cased first letter of the user's name
pub fn avatar_initial(user: &User) -> String {
    user.name
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}
