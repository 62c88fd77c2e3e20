//! Choice enums for every constrained column.
//!
//! Each enum carries the string stored in SQL (`as_str`) and a human label
//! (`label`) used in CSV exports and dashboard charts. Serde uses the storage
//! string, so JSON payloads and database rows agree.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A submitted value did not match any variant of a choice enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => ($value:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $( #[serde(rename = $value)] $variant, )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Return the string representation used in SQL storage.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $value, )+
                }
            }

            /// Human-readable label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $value => Ok(Self::$variant), )+
                    _ => Err(UnknownChoice {
                        kind: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

choice_enum! {
    /// Kind of skill shown on the portfolio.
    SkillType {
        Language => ("language", "Programming Language"),
        Framework => ("framework", "Framework/Library"),
        Tool => ("tool", "Tool/Software"),
        Concept => ("concept", "Concept/Theory"),
    }
}

choice_enum! {
    /// Delivery status of a portfolio project.
    ProjectStatus {
        Completed => ("completed", "Completed"),
        InProgress => ("in_progress", "In Progress"),
        Planned => ("planned", "Planned"),
    }
}

choice_enum! {
    /// Whether a portfolio entry is an engineering project or a research write-up.
    ProjectType {
        Projects => ("projects", "Projects"),
        Research => ("research", "Research"),
    }
}

choice_enum! {
    /// Research area a portfolio research entry belongs to.
    ResearchArea {
        Astronomy => ("Astronomy", "Astronomy"),
        AiMachineLearning => ("AI & Machine Learning", "AI & Machine Learning"),
        Physics => ("Physics", "Physics"),
        Engineering => ("Engineering", "Engineering"),
        Mathematics => ("Mathematics", "Mathematics"),
        Other => ("Other", "Other"),
    }
}

// ---------------------------------------------------------------------------
// Blog
// ---------------------------------------------------------------------------

choice_enum! {
    /// Source format of a blog post body.
    ContentType {
        Html => ("html", "HTML"),
        Markdown => ("markdown", "Markdown"),
    }
}

choice_enum! {
    /// Publication state of a blog post.
    PostStatus {
        Draft => ("draft", "Draft"),
        Published => ("published", "Published"),
    }
}

// ---------------------------------------------------------------------------
// Astronomy
// ---------------------------------------------------------------------------

choice_enum! {
    /// Catalog class of a celestial object.
    ObjectType {
        Planet => ("planet", "Planet"),
        Star => ("star", "Star"),
        Galaxy => ("galaxy", "Galaxy"),
        Nebula => ("nebula", "Nebula"),
        Cluster => ("cluster", "Star Cluster"),
        Moon => ("moon", "Moon"),
        Satellite => ("satellite", "Planetary Satellite"),
        Comet => ("comet", "Comet"),
        Asteroid => ("asteroid", "Asteroid"),
        Other => ("other", "Other"),
    }
}

choice_enum! {
    /// Kind of eclipse recorded against an observation.
    EclipseType {
        LunarTotal => ("lunar_total", "Lunar - Total"),
        LunarPartial => ("lunar_partial", "Lunar - Partial"),
        LunarPenumbral => ("lunar_penumbral", "Lunar - Penumbral"),
        SolarTotal => ("solar_total", "Solar - Total"),
        SolarPartial => ("solar_partial", "Solar - Partial"),
        SolarAnnular => ("solar_annular", "Solar - Annular"),
        SolarHybrid => ("solar_hybrid", "Solar - Hybrid"),
    }
}

impl EclipseType {
    #[must_use]
    pub fn is_solar(self) -> bool {
        self.as_str().starts_with("solar_")
    }

    #[must_use]
    pub fn is_lunar(self) -> bool {
        self.as_str().starts_with("lunar_")
    }
}

choice_enum! {
    /// Eye/camera protection used while observing the sun.
    SolarFilter {
        SolarFilter => ("solar_filter", "Solar Filter"),
        EclipseGlasses => ("eclipse_glasses", "Eclipse Glasses"),
        WeldingGlass => ("welding_glass", "Welding Glass #14"),
        Mylar => ("mylar", "Mylar Filter"),
        ThousandOaks => ("thousand_oaks", "Thousand Oaks Solar Filter"),
        Baader => ("baader", "Baader AstroSolar"),
        Projection => ("projection", "Projection Method"),
    }
}

choice_enum! {
    /// Danjon brightness scale for total lunar eclipses.
    DanjonScale {
        L0 => ("L0", "L0 - Very dark"),
        L1 => ("L1", "L1 - Dark gray/brown"),
        L2 => ("L2", "L2 - Deep red/rust"),
        L3 => ("L3", "L3 - Brick red"),
        L4 => ("L4", "L4 - Bright copper/orange"),
    }
}

choice_enum! {
    /// Eclipse phase at which a photo was captured.
    EclipsePhase {
        Pre => ("pre", "Pre-Eclipse"),
        Post => ("post", "Post-Eclipse"),
        LunarP1 => ("lunar_p1", "Lunar - Penumbral Start"),
        LunarU1 => ("lunar_u1", "Lunar - Partial Start"),
        LunarU2 => ("lunar_u2", "Lunar - Total Start"),
        LunarMax => ("lunar_max", "Lunar - Maximum"),
        LunarU3 => ("lunar_u3", "Lunar - Total End"),
        LunarU4 => ("lunar_u4", "Lunar - Partial End"),
        LunarP2 => ("lunar_p2", "Lunar - Penumbral End"),
        SolarC1 => ("solar_c1", "Solar - First Contact"),
        SolarC2 => ("solar_c2", "Solar - Second Contact (Total/Annular Start)"),
        SolarMax => ("solar_max", "Solar - Maximum"),
        SolarC3 => ("solar_c3", "Solar - Third Contact (Total/Annular End)"),
        SolarC4 => ("solar_c4", "Solar - Fourth Contact"),
        SolarDiamond1 => ("solar_diamond1", "Solar - First Diamond Ring"),
        SolarDiamond2 => ("solar_diamond2", "Solar - Second Diamond Ring"),
        SolarBaileys => ("solar_baileys", "Solar - Baileys Beads"),
        SolarChromosphere => ("solar_chromosphere", "Solar - Chromosphere"),
        SolarCorona => ("solar_corona", "Solar - Corona (Totality)"),
        SolarProminence => ("solar_prominence", "Solar - Prominences"),
        SolarShadowBands => ("solar_shadow_bands", "Solar - Shadow Bands"),
        Composite => ("composite", "Composite/Montage"),
        Sequence => ("sequence", "Time Sequence"),
    }
}

impl EclipsePhase {
    /// Phases where the photosphere is exposed and unfiltered capture is unsafe.
    pub const HAZARDOUS: &'static [Self] = &[
        Self::SolarC1,
        Self::SolarC2,
        Self::SolarC4,
        Self::SolarBaileys,
    ];

    #[must_use]
    pub fn is_solar(self) -> bool {
        self.as_str().starts_with("solar_")
    }

    #[must_use]
    pub fn is_lunar(self) -> bool {
        self.as_str().starts_with("lunar_")
    }

    #[must_use]
    pub fn requires_safety_equipment(self) -> bool {
        Self::HAZARDOUS.contains(&self)
    }
}

choice_enum! {
    /// Technique used for solar photography.
    SolarPhotoMethod {
        DirectFiltered => ("direct_filtered", "Direct with Solar Filter"),
        Projection => ("projection", "Projection Method"),
        HAlpha => ("h_alpha", "H-Alpha Filter"),
        CalciumK => ("calcium_k", "Calcium-K Filter"),
        WhiteLight => ("white_light", "White Light Filter"),
        Coronagraph => ("coronagraph", "Coronagraph"),
    }
}

choice_enum! {
    /// Kind of structured astronomy research programme.
    AstroResearchType {
        Orbital => ("orbital", "Orbital Period Measurement"),
        VariableStar => ("variable_star", "Variable Star Observation"),
        Meteor => ("meteor", "Meteor Shower Study"),
        Eclipse => ("eclipse", "Eclipse Documentation"),
        Planetary => ("planetary", "Planetary Observation"),
        DeepSky => ("deep_sky", "Deep Sky Observation"),
        Occultation => ("occultation", "Occultation Timing"),
        Sunspot => ("sunspot", "Sunspot Monitoring"),
        Custom => ("custom", "Custom Research"),
    }
}

choice_enum! {
    /// Analysis performed over collected research data.
    AnalysisType {
        Period => ("period", "Orbital Period Calculation"),
        Kepler => ("kepler", "Kepler's Law Verification"),
        LightCurve => ("light_curve", "Light Curve Analysis"),
        Statistics => ("statistics", "Statistical Analysis"),
        Custom => ("custom", "Custom Analysis"),
    }
}

choice_enum! {
    /// Quality grade of an analysis against theoretical values.
    QualityRating {
        Excellent => ("excellent", "Excellent (<2% error)"),
        Good => ("good", "Good (2-5% error)"),
        Fair => ("fair", "Fair (5-10% error)"),
        Poor => ("poor", "Poor (>10% error)"),
    }
}

impl QualityRating {
    /// Grade a relative error expressed in percent.
    #[must_use]
    pub fn from_error_percentage(error: f64) -> Self {
        let error = error.abs();
        if error < 2.0 {
            Self::Excellent
        } else if error <= 5.0 {
            Self::Good
        } else if error <= 10.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Seeing/transparency grade on a five-point scale (stored as 1..=5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SkyQuality {
    Terrible = 1,
    Poor = 2,
    Average = 3,
    Good = 4,
    Excellent = 5,
}

impl SkyQuality {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Terrible => "Terrible",
            Self::Poor => "Poor",
            Self::Average => "Average",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

impl TryFrom<u8> for SkyQuality {
    type Error = UnknownChoice;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Terrible),
            2 => Ok(Self::Poor),
            3 => Ok(Self::Average),
            4 => Ok(Self::Good),
            5 => Ok(Self::Excellent),
            other => Err(UnknownChoice {
                kind: "SkyQuality",
                value: other.to_string(),
            }),
        }
    }
}

impl From<SkyQuality> for u8 {
    fn from(value: SkyQuality) -> Self {
        value.as_u8()
    }
}

impl fmt::Display for SkyQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Research
// ---------------------------------------------------------------------------

choice_enum! {
    /// Lifecycle of both astronomy and general research projects.
    ResearchStatus {
        Planning => ("planning", "Planning"),
        Active => ("active", "Active"),
        Paused => ("paused", "Paused"),
        Completed => ("completed", "Completed"),
        Archived => ("archived", "Archived"),
    }
}

impl ResearchStatus {
    /// Badge colour for status chips.
    #[must_use]
    pub const fn badge_color(self) -> &'static str {
        match self {
            Self::Planning | Self::Archived => "#6c757d",
            Self::Active => "#37a749",
            Self::Paused => "#ffc107",
            Self::Completed => "#0d6efd",
        }
    }
}

choice_enum! {
    /// Discipline of a general research project.
    ResearchField {
        Ai => ("ai", "AI & Machine Learning"),
        Physics => ("physics", "Physics"),
        Mathematics => ("mathematics", "Mathematics"),
        Engineering => ("engineering", "Engineering"),
        Astronomy => ("astronomy", "Astronomy"),
        Other => ("other", "Other"),
    }
}

impl ResearchField {
    /// Chart colour used by the research dashboard.
    #[must_use]
    pub const fn chart_color(self) -> &'static str {
        match self {
            Self::Ai => "#667eea",
            Self::Physics => "#f093fb",
            Self::Mathematics => "#4facfe",
            Self::Engineering => "#fa709a",
            Self::Astronomy => "#feca57",
            Self::Other => "#6c757d",
        }
    }
}

choice_enum! {
    /// Priority of a general research project.
    Priority {
        Low => ("low", "Low"),
        Medium => ("medium", "Medium"),
        High => ("high", "High"),
        Urgent => ("urgent", "Urgent"),
    }
}

impl Priority {
    /// Sort rank, higher is more pressing.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Urgent => 3,
        }
    }

    #[must_use]
    pub const fn badge_color(self) -> &'static str {
        match self {
            Self::Low => "#6c757d",
            Self::Medium => "#0d6efd",
            Self::High => "#ffc107",
            Self::Urgent => "#dc3545",
        }
    }
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

choice_enum! {
    /// Direction of money for transactions and their categories.
    TransactionKind {
        Income => ("income", "Income"),
        Expense => ("expense", "Expense"),
    }
}

choice_enum! {
    /// Research discipline a research expense is billed to.
    ExpenseField {
        Ai => ("ai", "AI & Machine Learning"),
        Physics => ("physics", "Physics"),
        Math => ("math", "Mathematics"),
        Engineering => ("engineering", "Engineering"),
        Astronomy => ("astronomy", "Astronomy"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn storage_strings_roundtrip_through_from_str() {
        for status in ResearchStatus::ALL {
            assert_eq!(status.as_str().parse::<ResearchStatus>().unwrap(), *status);
        }
        for phase in EclipsePhase::ALL {
            assert_eq!(phase.as_str().parse::<EclipsePhase>().unwrap(), *phase);
        }
    }

    #[test]
    fn unknown_choice_is_reported() {
        let err = "sideways".parse::<Priority>().unwrap_err();
        assert_eq!(err.kind, "Priority");
        assert_eq!(err.to_string(), "'sideways' is not a valid Priority");
    }

    #[test]
    fn serde_uses_storage_string() {
        let json = serde_json::to_string(&ResearchArea::AiMachineLearning).unwrap();
        assert_eq!(json, "\"AI & Machine Learning\"");
        let kind: TransactionKind = serde_json::from_str("\"expense\"").unwrap();
        assert_eq!(kind, TransactionKind::Expense);
    }

    #[test]
    fn eclipse_phase_predicates() {
        assert!(EclipsePhase::SolarCorona.is_solar());
        assert!(!EclipsePhase::SolarCorona.is_lunar());
        assert!(EclipsePhase::LunarMax.is_lunar());
        assert!(!EclipsePhase::Composite.is_solar());
        assert!(!EclipsePhase::Composite.is_lunar());
    }

    #[test]
    fn only_exposed_photosphere_phases_need_protection() {
        let hazardous: Vec<_> = EclipsePhase::ALL
            .iter()
            .filter(|p| p.requires_safety_equipment())
            .map(|p| p.as_str())
            .collect();
        assert_eq!(
            hazardous,
            vec!["solar_c1", "solar_c2", "solar_c4", "solar_baileys"]
        );
        assert!(!EclipsePhase::SolarCorona.requires_safety_equipment());
        assert!(!EclipsePhase::SolarMax.requires_safety_equipment());
    }

    #[test]
    fn eclipse_type_predicates() {
        assert!(EclipseType::SolarAnnular.is_solar());
        assert!(EclipseType::LunarPenumbral.is_lunar());
        assert!(!EclipseType::LunarTotal.is_solar());
    }

    #[test]
    fn sky_quality_is_serialized_as_integer() {
        assert_eq!(serde_json::to_string(&SkyQuality::Good).unwrap(), "4");
        let parsed: SkyQuality = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, SkyQuality::Terrible);
        assert!(serde_json::from_str::<SkyQuality>("6").is_err());
    }

    #[test]
    fn priority_rank_orders_by_urgency() {
        let mut all = Priority::ALL.to_vec();
        all.sort_by_key(|p| std::cmp::Reverse(p.rank()));
        assert_eq!(all[0], Priority::Urgent);
        assert_eq!(all[3], Priority::Low);
    }

    #[test]
    fn quality_rating_thresholds() {
        assert_eq!(QualityRating::from_error_percentage(1.2), QualityRating::Excellent);
        assert_eq!(QualityRating::from_error_percentage(-4.0), QualityRating::Good);
        assert_eq!(QualityRating::from_error_percentage(7.5), QualityRating::Fair);
        assert_eq!(QualityRating::from_error_percentage(12.0), QualityRating::Poor);
    }
}
