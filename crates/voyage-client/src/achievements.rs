//! Display metadata for achievement identifiers.

/// How one achievement is shown in the toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

const CATALOG: &[AchievementInfo] = &[
    AchievementInfo {
        id: "first_voyage",
        title: "First Voyage",
        description: "Finish your first game.",
        icon: "/assets/achievements/first_voyage.png",
    },
    AchievementInfo {
        id: "safe_harbor",
        title: "Safe Harbor",
        description: "Reach the finish tile.",
        icon: "/assets/achievements/safe_harbor.png",
    },
    AchievementInfo {
        id: "quick_exit",
        title: "Quick Exit",
        description: "Cash out before the fifth tile.",
        icon: "/assets/achievements/quick_exit.png",
    },
    AchievementInfo {
        id: "storm_chaser",
        title: "Storm Chaser",
        description: "Survive three hazard tiles in one game.",
        icon: "/assets/achievements/storm_chaser.png",
    },
    AchievementInfo {
        id: "treasure_hunter",
        title: "Treasure Hunter",
        description: "Land on a bonus tile.",
        icon: "/assets/achievements/treasure_hunter.png",
    },
    AchievementInfo {
        id: "shipwreck",
        title: "Shipwreck",
        description: "Lose a game.",
        icon: "/assets/achievements/shipwreck.png",
    },
];

/// Lookup table from identifier to display metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AchievementCatalog;

impl AchievementCatalog {
    /// `None` for identifiers this build does not know. The toast renders
    /// nothing for those but keeps their slot in the sequence.
    pub fn lookup(self, id: &str) -> Option<&'static AchievementInfo> {
        CATALOG.iter().find(|info| info.id == id)
    }

    /// Icon paths of every entry, for preloading.
    pub fn icon_paths(self) -> Vec<String> {
        CATALOG.iter().map(|info| info.icon.to_string()).collect()
    }
}
