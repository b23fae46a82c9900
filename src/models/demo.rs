//! Demo Dataset
//!
//! A pre-built summary of a year of synthetic procurement data, so the arena
//! can be tried without uploading anything.

use spend_arena_core::session::{
    CategorySummary, DepartmentSummary, MonthlyTrend, VendorSummary,
};
use spend_arena_core::DataSummary;

/// File name recorded for demo sessions.
pub const DEMO_FILENAME: &str = "demo-data.csv";

fn vendor(name: &str, total_spend: f64, transaction_count: u64) -> VendorSummary {
    VendorSummary {
        vendor: name.to_string(),
        total_spend,
        transaction_count,
    }
}

fn category(name: &str, total_spend: f64, transaction_count: u64) -> CategorySummary {
    CategorySummary {
        category: name.to_string(),
        total_spend,
        transaction_count,
    }
}

fn department(name: &str, total_spend: f64, transaction_count: u64) -> DepartmentSummary {
    DepartmentSummary {
        department: name.to_string(),
        total_spend,
        transaction_count,
    }
}

pub fn demo_summary() -> DataSummary {
    let monthly = [
        94_200.0, 98_100.0, 102_500.0, 99_800.0, 105_300.0, 108_900.0, 112_400.0, 106_700.0,
        110_200.0, 115_800.0, 118_350.0, 112_500.0,
    ];

    DataSummary {
        total_spend: 1_284_750.0,
        row_count: 2_847,
        unique_vendor_count: 42,
        date_range: "2024-01-01 to 2024-12-31".to_string(),
        date_min: Some("2024-01-01".to_string()),
        date_max: Some("2024-12-31".to_string()),
        top_vendors: vec![
            vendor("Amazon Web Services", 189_400.0, 312),
            vendor("Microsoft Azure", 142_300.0, 198),
            vendor("Deloitte Consulting", 125_000.0, 24),
            vendor("Salesforce", 98_500.0, 48),
            vendor("Google Cloud Platform", 87_200.0, 156),
            vendor("Staples", 62_800.0, 423),
            vendor("Office Depot", 54_300.0, 387),
            vendor("McKinsey & Company", 48_000.0, 12),
            vendor("Zoom Video Communications", 36_200.0, 96),
            vendor("Slack Technologies", 28_400.0, 84),
        ],
        category_breakdown: vec![
            category("Cloud Infrastructure", 418_900.0, 666),
            category("Professional Services", 198_000.0, 48),
            category("Software Licenses", 285_600.0, 384),
            category("Office Supplies", 142_100.0, 891),
            category("Travel & Entertainment", 240_150.0, 858),
        ],
        department_breakdown: vec![
            department("Engineering", 486_200.0, 834),
            department("Operations", 312_400.0, 756),
            department("Marketing", 268_150.0, 642),
            department("Finance", 218_000.0, 615),
        ],
        monthly_trends: monthly
            .iter()
            .enumerate()
            .map(|(i, total_spend)| MonthlyTrend {
                month: format!("2024-{:02}", i + 1),
                total_spend: *total_spend,
            })
            .collect(),
        duplicate_vendors: vec![
            "Staples / Staples Express".to_string(),
            "Office Depot / Office Depot Online".to_string(),
            "Zoom Video Communications / Zoom".to_string(),
            "Slack Technologies / Slack".to_string(),
        ],
    }
}
