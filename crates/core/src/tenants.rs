//! Public landing page: tenant cards and resource links.

use serde::{Deserialize, Serialize};

/// Tenant that hosts shared resources; never shown as a card.
pub const SUPER_TENANT_NAME: &str = "SuperPOEM Tenant";

/// Cards per row in the tenant grid.
pub const CARDS_PER_ROW: usize = 3;

/// Per-tenant public resources: (path suffix, label).
pub const TENANT_RESOURCES: [(&str, &str); 5] = [
    ("metrics", "Metrics"),
    ("metricprofiles", "Metric profiles"),
    ("aggregationprofiles", "Aggregation profiles"),
    ("thresholdsprofiles", "Thresholds profiles"),
    ("operationsprofiles", "Operations profiles"),
];

/// Resources shared by every tenant.
pub const SHARED_RESOURCES: [(&str, &str); 2] = [
    ("probes", "Probes"),
    ("metrictemplates", "Metric templates"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub name: String,
    pub domain_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantCard {
    pub name: String,
    pub links: Vec<ResourceLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRow {
    pub cards: Vec<TenantCard>,
    /// CSS width of the row, e.g. `66.6666%`.
    pub width: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub shared_resources: Vec<ResourceLink>,
    /// Links of the local tenant; empty for superusers.
    pub tenant_resources: Vec<ResourceLink>,
    /// Tenant grid; empty for non-superusers.
    pub tenant_rows: Vec<CardRow>,
}

fn public_path(resource: &str) -> String {
    format!("/ui/public_{resource}")
}

/// Absolute public links for one tenant.
pub fn tenant_links(tenant: &Tenant) -> Vec<ResourceLink> {
    TENANT_RESOURCES
        .iter()
        .map(|(resource, label)| ResourceLink {
            label: label.to_string(),
            href: format!("https://{}{}", tenant.domain_url, public_path(resource)),
        })
        .collect()
}

fn relative_links(resources: &[(&str, &str)]) -> Vec<ResourceLink> {
    resources
        .iter()
        .map(|(resource, label)| ResourceLink {
            label: label.to_string(),
            href: public_path(resource),
        })
        .collect()
}

/// Width of a row holding `cards` cards.
pub fn row_width(cards: usize) -> &'static str {
    match cards {
        1 => "33.3333%",
        2 => "66.6666%",
        _ => "100%",
    }
}

/// Drop the super tenant and lay the rest out in rows of three.
pub fn tenant_rows(tenants: &[Tenant]) -> Vec<CardRow> {
    let cards: Vec<TenantCard> = tenants
        .iter()
        .filter(|t| t.name != SUPER_TENANT_NAME)
        .map(|t| TenantCard {
            name: t.name.clone(),
            links: tenant_links(t),
        })
        .collect();

    cards
        .chunks(CARDS_PER_ROW)
        .map(|chunk| CardRow {
            width: row_width(chunk.len()).to_string(),
            cards: chunk.to_vec(),
        })
        .collect()
}

/// Landing page for the current user.
///
/// Superusers get the tenant grid; everyone else gets the local tenant's
/// resource links. Shared resources are always listed.
pub fn dashboard(is_superuser: bool, tenants: &[Tenant]) -> Dashboard {
    let shared_resources = relative_links(&SHARED_RESOURCES);
    if is_superuser {
        Dashboard {
            shared_resources,
            tenant_resources: Vec::new(),
            tenant_rows: tenant_rows(tenants),
        }
    } else {
        Dashboard {
            shared_resources,
            tenant_resources: relative_links(&TENANT_RESOURCES),
            tenant_rows: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(name: &str) -> Tenant {
        Tenant {
            name: name.into(),
            domain_url: format!("{}.poem.example.org", name.to_lowercase()),
        }
    }

    #[test]
    fn super_tenant_is_dropped_and_rows_hold_three() {
        let tenants = vec![
            tenant("EGI"),
            tenant(SUPER_TENANT_NAME),
            tenant("EUDAT"),
            tenant("SDC"),
            tenant("EOSC"),
            tenant("ARGO"),
        ];
        let rows = tenant_rows(&tenants);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].width, "100%");
        assert_eq!(rows[1].width, "66.6666%");
        let names: Vec<_> = rows[1].cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["EOSC", "ARGO"]);
    }

    #[test]
    fn single_card_row_is_one_third_wide() {
        let rows = tenant_rows(&[tenant("EGI")]);
        assert_eq!(rows[0].width, "33.3333%");
        assert!(tenant_rows(&[]).is_empty());
    }

    #[test]
    fn tenant_links_point_at_public_pages() {
        let links = tenant_links(&tenant("EGI"));
        assert_eq!(links.len(), 5);
        assert_eq!(links[0].href, "https://egi.poem.example.org/ui/public_metrics");
        assert_eq!(links[4].label, "Operations profiles");
    }

    #[test]
    fn dashboard_depends_on_superuser() {
        let tenants = [tenant("EGI")];

        let admin = dashboard(true, &tenants);
        assert_eq!(admin.tenant_rows.len(), 1);
        assert!(admin.tenant_resources.is_empty());
        assert_eq!(admin.shared_resources[1].href, "/ui/public_metrictemplates");

        let user = dashboard(false, &tenants);
        assert!(user.tenant_rows.is_empty());
        assert_eq!(user.tenant_resources[0].href, "/ui/public_metrics");
        assert_eq!(user.shared_resources.len(), 2);
    }
}
