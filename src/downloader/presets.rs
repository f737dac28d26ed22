// Role-based quality presets
//
// Maps the caller's role to a yt-dlp format selector chain and a display label.
// The table is built once at startup and shared read-only.

use std::collections::HashMap;
use std::fmt;

/// Caller tier selecting a quality preset (not authenticated)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Admin,
    ProPlus,
    ProUser,
    User,
    Guest,
}

impl Role {
    /// All roles, in the order they are reported by `/quality-info`
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::ProPlus,
        Role::ProUser,
        Role::User,
        Role::Guest,
    ];

    /// Wire name used in query strings and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::ProPlus => "pro_plus",
            Self::ProUser => "pro_user",
            Self::User => "user",
            Self::Guest => "guest",
        }
    }

    /// Case-insensitive lookup; `None` for anything unrecognised
    pub fn parse(value: &str) -> Option<Role> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format selector chain plus the label exposed in `X-Video-Quality`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityPreset {
    /// Ordered fallback expressions, evaluated by yt-dlp left to right
    pub format_selector: Vec<String>,
    /// Short display string (e.g. "720p")
    pub label: String,
}

impl QualityPreset {
    pub fn new<I, S>(format_selector: I, label: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            format_selector: format_selector.into_iter().map(Into::into).collect(),
            label: label.into(),
        }
    }

    /// Single `-f` expression for yt-dlp (alternatives joined by `/`)
    pub fn format_spec(&self) -> String {
        self.format_selector.join("/")
    }
}

/// A preset table without an entry for the fallback role
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("preset table has no entry for the fallback role '{0}'")]
pub struct MissingFallbackPreset(pub Role);

/// Immutable role → preset mapping
#[derive(Debug, Clone)]
pub struct PresetTable {
    presets: HashMap<Role, QualityPreset>,
}

impl PresetTable {
    /// Role used for missing or unrecognised input
    pub const FALLBACK: Role = Role::User;

    /// Build a custom table. It must contain the fallback role so that
    /// `resolve` stays total.
    pub fn new<I>(entries: I) -> Result<Self, MissingFallbackPreset>
    where
        I: IntoIterator<Item = (Role, QualityPreset)>,
    {
        let presets: HashMap<Role, QualityPreset> = entries.into_iter().collect();
        if !presets.contains_key(&Self::FALLBACK) {
            return Err(MissingFallbackPreset(Self::FALLBACK));
        }
        Ok(Self { presets })
    }

    /// The built-in presets served in production
    pub fn standard() -> Self {
        let hd = QualityPreset::new(
            [
                "bestvideo[height<=720][ext=mp4]+bestaudio[ext=m4a]",
                "best[height<=720]",
                "bestvideo[height<=480]+bestaudio",
                "best",
            ],
            "720p",
        );

        let presets = HashMap::from([
            (Role::Admin, hd.clone()),
            (Role::ProPlus, hd),
            (
                Role::ProUser,
                QualityPreset::new(
                    [
                        "bestvideo[height<=480][ext=mp4]+bestaudio[ext=m4a]",
                        "best[height<=480]",
                        "bestvideo[height<=360]+bestaudio",
                        "best",
                    ],
                    "480p",
                ),
            ),
            (
                Role::User,
                QualityPreset::new(
                    [
                        "bestvideo[height<=360][ext=mp4]+bestaudio[ext=m4a]",
                        "best[height<=360]",
                        "worstvideo[height<=360]+worstaudio",
                        "worst",
                    ],
                    "360p",
                ),
            ),
            (
                Role::Guest,
                QualityPreset::new(
                    [
                        "bestvideo[height<=240][ext=mp4]+bestaudio[ext=m4a]",
                        "best[height<=240]",
                        "worst",
                    ],
                    "240p",
                ),
            ),
        ]);

        Self { presets }
    }

    /// Resolve a caller-supplied role. Never fails: missing, empty and
    /// unknown roles (and roles absent from a custom table) get the fallback.
    pub fn resolve(&self, role: Option<&str>) -> (Role, &QualityPreset) {
        let requested = role.and_then(Role::parse);
        if let Some(role) = requested {
            if let Some(preset) = self.presets.get(&role) {
                return (role, preset);
            }
        }
        (Self::FALLBACK, &self.presets[&Self::FALLBACK])
    }

    pub fn get(&self, role: Role) -> Option<&QualityPreset> {
        self.presets.get(&role)
    }

    /// `(role, label)` pairs in `Role::ALL` order
    pub fn labels(&self) -> Vec<(Role, &str)> {
        Role::ALL
            .into_iter()
            .filter_map(|role| {
                self.presets
                    .get(&role)
                    .map(|preset| (role, preset.label.as_str()))
            })
            .collect()
    }
}
