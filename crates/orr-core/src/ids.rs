//! ID prefix constants.
//!
//! Every stored row is keyed by `{prefix}-{8 hex chars}`, e.g. `pst-a3f8b2c1`.
//! The random part is produced by the database (`randomblob(4)`).

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_SKILL: &str = "skl";
pub const PREFIX_PROJECT_CATEGORY: &str = "pcat";
pub const PREFIX_RESEARCH_CATEGORY: &str = "rcat";
pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_DOCUMENT: &str = "doc";
pub const PREFIX_BLOG_CATEGORY: &str = "bcat";
pub const PREFIX_POST: &str = "pst";
pub const PREFIX_BLOG_IMAGE: &str = "img";
pub const PREFIX_CONTACT: &str = "msg";
pub const PREFIX_CELESTIAL: &str = "obj";
pub const PREFIX_OBSERVATION: &str = "obs";
pub const PREFIX_ECLIPSE: &str = "ecl";
pub const PREFIX_PHOTO: &str = "pho";
pub const PREFIX_ASTRO_RESEARCH: &str = "ast";
pub const PREFIX_DATA_ENTRY: &str = "dat";
pub const PREFIX_ANALYSIS: &str = "ana";
pub const PREFIX_TEMPLATE: &str = "tpl";
pub const PREFIX_RESEARCH: &str = "res";
pub const PREFIX_FINANCE_CATEGORY: &str = "fcat";
pub const PREFIX_TRANSACTION: &str = "txn";
pub const PREFIX_BUDGET: &str = "bud";
pub const PREFIX_EXPENSE: &str = "exp";

/// Every prefix in use, for exhaustive ID-format tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_USER,
    PREFIX_SKILL,
    PREFIX_PROJECT_CATEGORY,
    PREFIX_RESEARCH_CATEGORY,
    PREFIX_PROJECT,
    PREFIX_DOCUMENT,
    PREFIX_BLOG_CATEGORY,
    PREFIX_POST,
    PREFIX_BLOG_IMAGE,
    PREFIX_CONTACT,
    PREFIX_CELESTIAL,
    PREFIX_OBSERVATION,
    PREFIX_ECLIPSE,
    PREFIX_PHOTO,
    PREFIX_ASTRO_RESEARCH,
    PREFIX_DATA_ENTRY,
    PREFIX_ANALYSIS,
    PREFIX_TEMPLATE,
    PREFIX_RESEARCH,
    PREFIX_FINANCE_CATEGORY,
    PREFIX_TRANSACTION,
    PREFIX_BUDGET,
    PREFIX_EXPENSE,
];
