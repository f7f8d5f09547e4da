//! Built-in demo dataset: the fixed role catalog, the match table and the
//! static learning links.
//!
//! Scores and skill lists are hand-authored sample data. A real data source
//! plugs in through `RemoteRoleMatcher` instead of editing this file.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::role::{MatchRecord, ResourceLink, RoleRef};

/// Known starting roles, in display order.
pub const ROLE_CATALOG: [&str; 10] = [
    "Actuary",
    "Accountant",
    "Business Analyst",
    "Data Analyst",
    "Financial Analyst",
    "Investment Analyst",
    "Risk Analyst",
    "Consultant",
    "Software Engineer",
    "Operations Analyst",
];

/// Roles guaranteed to have entries in [`MATCH_TABLE`].
pub const DEMO_ROLES: [&str; 3] = ["Actuary", "Business Analyst", "Accountant"];

pub static RESOURCES: [ResourceLink; 3] = [
    ResourceLink {
        label: "Course directory",
        url: "https://www.coursera.org/",
        kind: "course",
    },
    ResourceLink {
        label: "edX programs",
        url: "https://www.edx.org/",
        kind: "course",
    },
    ResourceLink {
        label: "CFA program overview",
        url: "https://www.cfainstitute.org/en/programs/cfa",
        kind: "exam/membership",
    },
];

/// Case-sensitive role name → ordered match records.
pub static MATCH_TABLE: LazyLock<HashMap<&'static str, Vec<MatchRecord>>> = LazyLock::new(|| {
    HashMap::from([
        (
            "Actuary",
            vec![
                record(
                    "data-analyst",
                    "Data Analyst",
                    82,
                    &["statistics", "python", "excel", "risk modelling"],
                    &["sql", "dashboarding (Power BI/Looker)", "stakeholder comms"],
                ),
                record(
                    "investment-analyst",
                    "Investment Analyst",
                    74,
                    &["valuation basics", "excel", "quant mindset"],
                    &["equity research process", "DCF depth", "report writing"],
                ),
                record(
                    "risk-manager",
                    "Financial Risk Manager",
                    70,
                    &["risk modelling", "controls", "governance exposure"],
                    &["reg frameworks (Basel/Solvency)", "credit risk", "ALM"],
                ),
            ],
        ),
        (
            "Business Analyst",
            vec![
                record(
                    "product-analyst",
                    "Product Analyst",
                    78,
                    &["requirements", "process mapping", "stakeholders"],
                    &["A/B testing", "sql", "product metrics"],
                ),
                record(
                    "data-analyst",
                    "Data Analyst",
                    72,
                    &["excel", "reporting", "communication"],
                    &["sql", "python", "visualisation (Tableau/Power BI)"],
                ),
            ],
        ),
        (
            "Accountant",
            vec![
                record(
                    "financial-analyst",
                    "Financial Analyst",
                    80,
                    &["financial statements", "excel modelling"],
                    &["valuation", "forecasting", "kpis"],
                ),
                record(
                    "operations-analyst",
                    "Operations Analyst",
                    68,
                    &["process discipline", "controls", "excel"],
                    &["sql", "automation", "ops metrics"],
                ),
            ],
        ),
    ])
});

fn record(slug: &str, title: &str, score: u8, matched: &[&str], missing: &[&str]) -> MatchRecord {
    MatchRecord {
        role: RoleRef {
            slug: slug.to_string(),
            title: title.to_string(),
        },
        score,
        matched_skills: matched.iter().map(|s| s.to_string()).collect(),
        missing_top_skills: missing.iter().map(|s| s.to_string()).collect(),
    }
}
