use crate::domain::record::{
    AssessmentRecord, ControlScore, LicenseDetail, LicenseMetrics, Metrics, Recommendation,
    SecureScoreMetrics,
};

pub const CUSTOMER_ID: &str = "customer-7";
pub const TENANT_ID: &str = "tenant-7f3a";
pub const TIMESTAMP: u64 = 1_700_000_000;

/// Control with a recognisable name; `max_score` decides optimizer priority.
pub fn make_control(index: usize, max_score: f64) -> ControlScore {
    ControlScore {
        control_name: format!("Control {index}: require multifactor authentication"),
        category: "Identity".to_string(),
        current_score: max_score / 2.0,
        max_score,
        implementation_status: "Partially implemented".to_string(),
    }
}

/// `count` controls with distinct, shuffled `max_score` values when `count`
/// is coprime with 37.
pub fn make_controls(count: usize) -> Vec<ControlScore> {
    (0..count)
        .map(|i| make_control(i, ((i * 37) % count) as f64 + 1.0))
        .collect()
}

pub fn make_license(detail_count: usize) -> LicenseMetrics {
    LicenseMetrics {
        total_licenses: 500,
        assigned_licenses: 430,
        utilization_rate: 86.0,
        license_details: (0..detail_count)
            .map(|i| LicenseDetail {
                sku_part_number: format!("SKU_ENTERPRISE_PACK_{i:05}"),
                service_plan_name: Some(format!("Exchange Online Plan {i}")),
                total_units: 25,
                consumed_units: (i % 25) as u64,
            })
            .collect(),
    }
}

pub fn make_metrics(control_count: usize, license_detail_count: usize) -> Metrics {
    Metrics {
        secure_score: Some(SecureScoreMetrics {
            current_score: 412.5,
            max_score: 870.0,
            percentage: 47.41,
            control_scores: make_controls(control_count),
            ..Default::default()
        }),
        license: Some(make_license(license_detail_count)),
        ..Metrics::default()
    }
}

pub fn make_recommendations(count: usize) -> Vec<Recommendation> {
    (0..count)
        .map(|i| Recommendation {
            title: Some(format!("Recommendation {i}")),
            description: Some(format!("Turn on security defaults for group {i}.")),
            category: Some("Identity".to_string()),
            priority: Some(if i % 2 == 0 { "high" } else { "medium" }.to_string()),
            action_url: None,
        })
        .collect()
}

pub fn make_record(id: &str, control_count: usize, license_detail_count: usize) -> AssessmentRecord {
    AssessmentRecord::new(CUSTOMER_ID, TENANT_ID, TIMESTAMP)
        .with_id(id)
        .with_score(47.41)
        .with_metrics(make_metrics(control_count, license_detail_count))
        .with_recommendations(make_recommendations(5))
}
