use crate::models::{CatalogProduct, MaterialLine, PricingSummaryResponse, Rfp, RfpItem, ServiceLine};

/// Static reference data served by the dashboard API
///
/// Product scores in here are reference values only; the product matching
/// route recomputes them and falls back to these when scoring fails.
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    rfps: Vec<Rfp>,
    items: Vec<RfpItem>,
    materials: Vec<MaterialLine>,
    services: Vec<ServiceLine>,
}

impl ReferenceCatalog {
    pub fn new(
        rfps: Vec<Rfp>,
        items: Vec<RfpItem>,
        materials: Vec<MaterialLine>,
        services: Vec<ServiceLine>,
    ) -> Self {
        Self {
            rfps,
            items,
            materials,
            services,
        }
    }

    /// Demo catalog of network equipment RFPs
    pub fn demo() -> Self {
        Self::new(demo_rfps(), demo_items(), demo_materials(), demo_services())
    }

    pub fn rfps(&self) -> &[Rfp] {
        &self.rfps
    }

    pub fn items(&self) -> &[RfpItem] {
        &self.items
    }

    /// Pricing breakdown with material, service and proposal totals
    pub fn pricing_summary(&self) -> PricingSummaryResponse {
        let material_cost = self.materials.iter().map(|line| line.total).sum::<u64>();
        let service_cost = self.services.iter().map(|line| line.total).sum::<u64>();

        PricingSummaryResponse {
            material_cost,
            service_cost,
            total_proposal_value: material_cost + service_cost,
            materials_breakdown: self.materials.clone(),
            services_breakdown: self.services.clone(),
        }
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::demo()
    }
}

fn rfp(id: u32, title: &str, source: &str, due_date: &str, days_left: u32) -> Rfp {
    Rfp {
        id,
        title: title.to_string(),
        source: source.to_string(),
        due_date: due_date.to_string(),
        days_left,
    }
}

fn product(name: &str, specification_text: &str, reference_score: u8) -> CatalogProduct {
    CatalogProduct {
        name: name.to_string(),
        specification_text: specification_text.to_string(),
        reference_score,
    }
}

fn material(item: &str, quantity: u32, unit_price: u64) -> MaterialLine {
    MaterialLine {
        item: item.to_string(),
        quantity,
        unit_price,
        total: quantity as u64 * unit_price,
    }
}

fn service(item: &str, hours: u32, rate: u64) -> ServiceLine {
    ServiceLine {
        item: item.to_string(),
        hours,
        rate,
        total: hours as u64 * rate,
    }
}

fn demo_rfps() -> Vec<Rfp> {
    vec![
        rfp(1, "Industrial Equipment Supply - Metro Rail Project", "gov-procurement.com", "2025-02-15", 28),
        rfp(2, "Telecommunications Infrastructure Upgrade", "telecom-rfps.io", "2025-03-10", 51),
        rfp(3, "Smart Manufacturing Solutions RFP", "enterprise-bids.net", "2025-02-28", 41),
        rfp(4, "Metro Rail Signaling System Modernization", "gov-procurement.com", "2025-03-20", 61),
        rfp(5, "5G Network Equipment Procurement", "telecom-rfps.io", "2025-02-22", 35),
    ]
}

fn demo_items() -> Vec<RfpItem> {
    vec![
        RfpItem {
            name: "Industrial Grade Router".to_string(),
            requirement_text: "Industrial grade router supporting OSPF, BGP, VPN, 10 Gbps throughput, \
                redundant power supply"
                .to_string(),
            top_match: product(
                "Cisco ISR 4451",
                "Cisco ISR 4451 integrated services router: OSPF, BGP, IPsec VPN, 10 Gbps \
                 aggregate throughput, redundant power supply, modular interfaces",
                94,
            ),
            alternatives: vec![
                product(
                    "Juniper MX204",
                    "Juniper MX204 universal routing platform: OSPF, BGP, MPLS VPN, 100GbE ports",
                    89,
                ),
                product(
                    "HPE FlexNetwork",
                    "HPE FlexNetwork MSR router: OSPF, BGP, VPN, 1 Gbps forwarding",
                    85,
                ),
            ],
        },
        RfpItem {
            name: "Network Switch 48-Port".to_string(),
            requirement_text: "Managed network switch with 48 gigabit ports, stacking, PoE+ and \
                Layer 3 routing"
                .to_string(),
            top_match: product(
                "Cisco Catalyst 9300",
                "Cisco Catalyst 9300 managed switch: 48 gigabit ports, StackWise stacking, PoE+, \
                 Layer 3 routing, modular uplinks",
                96,
            ),
            alternatives: vec![
                product(
                    "Arista 7050X",
                    "Arista 7050X data center switch: 48 ports 10GbE, Layer 3 routing, low latency",
                    91,
                ),
                product(
                    "Dell PowerSwitch",
                    "Dell PowerSwitch N3248: 48 gigabit ports, stacking, Layer 3 routing",
                    87,
                ),
            ],
        },
        RfpItem {
            name: "Firewall Appliance".to_string(),
            requirement_text: "Next generation firewall appliance with threat prevention, \
                SSL inspection, 10 Gbps firewall throughput and high availability"
                .to_string(),
            top_match: product(
                "Palo Alto PA-5220",
                "Palo Alto PA-5220 next generation firewall: threat prevention, SSL decryption \
                 inspection, 18 Gbps firewall throughput, high availability pairs",
                92,
            ),
            alternatives: vec![
                product(
                    "Fortinet FortiGate 600E",
                    "Fortinet FortiGate 600E firewall: threat protection, SSL inspection, \
                     36 Gbps firewall throughput",
                    88,
                ),
                product(
                    "Check Point 6400",
                    "Check Point 6400 security gateway: threat prevention, high availability clustering",
                    84,
                ),
            ],
        },
    ]
}

fn demo_materials() -> Vec<MaterialLine> {
    vec![
        material("Cisco ISR 4451", 5, 12_500),
        material("Cisco Catalyst 9300", 12, 8_200),
        material("Palo Alto PA-5220", 3, 28_000),
    ]
}

fn demo_services() -> Vec<ServiceLine> {
    vec![
        service("Installation & Configuration", 120, 150),
        service("Performance Testing", 40, 175),
        service("Acceptance Testing", 32, 175),
    ]
}
