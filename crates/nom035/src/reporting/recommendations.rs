use crate::assessment::RiskLevel;

const HIGH_RISK: &[&str] = &["Buscar apoyo psicológico", "Revisar cargas laborales"];
const BASELINE: &[&str] = &["Mantener prácticas saludables"];

/// Fixed guidance per risk level; LOW and MEDIUM share the baseline set.
pub fn recommendations_for(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::High => HIGH_RISK,
        RiskLevel::Medium | RiskLevel::Low => BASELINE,
    }
}
