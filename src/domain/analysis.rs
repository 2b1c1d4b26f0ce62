//! Rule-based cardio risk scoring and longitudinal trend detection.
//!
//! Readings of zero are treated as missing, the same as an absent field.

use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

pub const MAX_RISK_SCORE: u32 = 100;

/// Minimum number of readings before a slope is considered meaningful.
pub const MIN_TREND_POINTS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    pub heart_rate: Option<i32>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub oxygen_saturation: Option<f64>,
    pub bmi: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub record_date: DateTime<Utc>,
    pub vitals: Vitals,
    pub blood_sugar: Option<f64>,
    pub cholesterol: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk_score: u32,
    pub risk_factors: Vec<String>,
}

fn present_i32(v: Option<i32>) -> Option<i32> {
    v.filter(|&x| x != 0)
}

fn present_f64(v: Option<f64>) -> Option<f64> {
    v.filter(|&x| x != 0.0)
}

pub fn calculate_cardio_risk(vitals: &Vitals) -> RiskAssessment {
    let mut score = 0;
    let mut factors = Vec::new();

    if present_i32(vitals.heart_rate).is_some_and(|hr| hr > 100) {
        score += 15;
        factors.push("High resting heart rate".to_string());
    }

    if let (Some(sys), Some(dia)) = (
        present_i32(vitals.systolic),
        present_i32(vitals.diastolic),
    ) {
        if sys > 140 || dia > 90 {
            score += 25;
            factors.push("Hypertension detected".to_string());
        }
    }

    if present_f64(vitals.oxygen_saturation).is_some_and(|spo2| spo2 < 94.0) {
        score += 20;
        factors.push("Low oxygen saturation".to_string());
    }

    if present_f64(vitals.bmi).is_some_and(|bmi| bmi > 30.0) {
        score += 15;
        factors.push("Obesity risk".to_string());
    }

    RiskAssessment {
        risk_score: score.min(MAX_RISK_SCORE),
        risk_factors: factors,
    }
}

/// Least-squares slope of `ys` against their index.
fn slope(ys: &[f64]) -> f64 {
    let n = ys.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (num, den) = ys
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, &y)| {
            let dx = i as f64 - mean_x;
            (num + dx * (y - mean_y), den + dx * dx)
        });

    if den == 0.0 { 0.0 } else { num / den }
}

fn rising(series: &[f64]) -> bool {
    series.len() >= MIN_TREND_POINTS && slope(series) > 1.0
}

pub fn detect_trends(records: &[HealthRecord]) -> Vec<String> {
    let heart_rates: Vec<f64> = records
        .iter()
        .filter_map(|r| present_i32(r.vitals.heart_rate))
        .map(f64::from)
        .collect();
    let systolic: Vec<f64> = records
        .iter()
        .filter_map(|r| present_i32(r.vitals.systolic))
        .map(f64::from)
        .collect();

    let mut trends = Vec::new();
    if rising(&heart_rates) {
        trends.push("Increasing heart rate trend detected".to_string());
    }
    if rising(&systolic) {
        trends.push("Worsening blood pressure trend".to_string());
    }
    trends
}
