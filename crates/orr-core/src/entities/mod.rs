//! Entity structs for all Orrery domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `orr-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` so they can be returned from handlers as-is.

mod account;
mod astro_research;
mod astronomy;
mod blog;
mod finance;
mod portfolio;
mod research;

pub use account::{Session, User};
pub use astro_research::{
    AstroResearchProject, ResearchAnalysis, ResearchDataEntry, ResearchTemplate,
};
pub use astronomy::{AstroPhoto, CelestialObject, EclipseObservation, ObservationLog};
pub use blog::{BlogCategory, BlogImage, BlogPost, ContactMessage};
pub use finance::{
    Budget, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON, FinanceCategory, ResearchExpense,
    Transaction,
};
pub use portfolio::{PortfolioProject, ProjectCategory, ProjectDocument, ResearchCategory, Skill};
pub use research::ResearchProject;
