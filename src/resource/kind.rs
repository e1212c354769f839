//! Resource kind table
//!
//! Closed enumeration of the networking resource kinds the census counts,
//! each mapped to a static descriptor: display label, API scope, REST
//! collection, response items field, and an optional item predicate.
//! Adding a kind means adding one enum variant and one table entry.

use serde_json::Value;

/// The networking resource kinds this tool counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    VpnTunnel,
    Vpc,
    DnsZone,
    CloudRouter,
    VpcPeering,
    Firewall,
    PrivateServiceAccessRange,
}

/// How a kind's listing endpoint is scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiScope {
    /// Compute `regions/{region}/<collection>` - requires a region
    Regional,
    /// Compute `global/<collection>`
    Global,
    /// Compute `aggregated/<collection>` - items nested per scope bucket
    Aggregated,
    /// Cloud DNS `projects/{project}/<collection>`
    Dns,
}

/// Static descriptor for one resource kind.
pub struct KindSpec {
    /// Human label used in every sink line ("<label> Count in <project>: <n>")
    pub label: &'static str,
    pub scope: ApiScope,
    /// REST collection name under the scope prefix
    pub collection: &'static str,
    /// Field holding the result items ("items" for compute, "managedZones"
    /// for DNS; for aggregated responses, the per-bucket inner field)
    pub items_field: &'static str,
    /// Counts only items matching the predicate (aggregated case)
    pub predicate: Option<fn(&Value) -> bool>,
}

/// Every kind, in the fixed order collection runs and sink output use.
pub const ALL_KINDS: [ResourceKind; 7] = [
    ResourceKind::VpnTunnel,
    ResourceKind::Vpc,
    ResourceKind::DnsZone,
    ResourceKind::CloudRouter,
    ResourceKind::VpcPeering,
    ResourceKind::Firewall,
    ResourceKind::PrivateServiceAccessRange,
];

fn is_private_service_connect(subnet: &Value) -> bool {
    subnet
        .get("purpose")
        .and_then(|v| v.as_str())
        .map(|p| p == "PRIVATE_SERVICE_CONNECT")
        .unwrap_or(false)
}

const VPN_TUNNEL_SPEC: KindSpec = KindSpec {
    label: "VPN Tunnel",
    scope: ApiScope::Regional,
    collection: "vpnTunnels",
    items_field: "items",
    predicate: None,
};

const VPC_SPEC: KindSpec = KindSpec {
    label: "VPC",
    scope: ApiScope::Global,
    collection: "networks",
    items_field: "items",
    predicate: None,
};

const DNS_ZONE_SPEC: KindSpec = KindSpec {
    label: "DNS Zone",
    scope: ApiScope::Dns,
    collection: "managedZones",
    items_field: "managedZones",
    predicate: None,
};

const CLOUD_ROUTER_SPEC: KindSpec = KindSpec {
    label: "Cloud Router",
    scope: ApiScope::Regional,
    collection: "routers",
    items_field: "items",
    predicate: None,
};

/// Global addresses stand in for peerings; the dashboards this feeds have
/// always read them.
const VPC_PEERING_SPEC: KindSpec = KindSpec {
    label: "VPC Peering",
    scope: ApiScope::Global,
    collection: "addresses",
    items_field: "items",
    predicate: None,
};

const FIREWALL_SPEC: KindSpec = KindSpec {
    label: "Firewall",
    scope: ApiScope::Global,
    collection: "firewalls",
    items_field: "items",
    predicate: None,
};

const PSA_RANGE_SPEC: KindSpec = KindSpec {
    label: "Private Service Access Range",
    scope: ApiScope::Aggregated,
    collection: "subnetworks",
    items_field: "subnetworks",
    predicate: Some(is_private_service_connect),
};

impl ResourceKind {
    /// Look up the static descriptor for this kind.
    pub fn spec(&self) -> &'static KindSpec {
        match self {
            ResourceKind::VpnTunnel => &VPN_TUNNEL_SPEC,
            ResourceKind::Vpc => &VPC_SPEC,
            ResourceKind::DnsZone => &DNS_ZONE_SPEC,
            ResourceKind::CloudRouter => &CLOUD_ROUTER_SPEC,
            ResourceKind::VpcPeering => &VPC_PEERING_SPEC,
            ResourceKind::Firewall => &FIREWALL_SPEC,
            ResourceKind::PrivateServiceAccessRange => &PSA_RANGE_SPEC,
        }
    }

    /// Display label for sink lines
    pub fn label(&self) -> &'static str {
        self.spec().label
    }

    /// Whether the listing endpoint needs a region
    pub fn requires_region(&self) -> bool {
        self.spec().scope == ApiScope::Regional
    }
}
