//! The HouseHub scoring and ranking engine.
//!
//! Everything here is a pure function over its inputs: no clock, no store,
//! no randomness. A score computed at submission time can therefore be
//! recomputed bit-for-bit from the stored offer, and ranking the same set of
//! offers twice always yields the same order.

use serde::{Deserialize, Serialize};

use super::domain::{AgentId, Offer};

/// Weights of the four sub-scores, in percent of the 0-100 composite.
pub const COMMISSION_WEIGHT: f64 = 25.0;
pub const TIMELINE_WEIGHT: f64 = 23.0;
pub const PERFORMANCE_WEIGHT: f64 = 27.0;
pub const EXPERIENCE_WEIGHT: f64 = 25.0;

/// Every sub-score is bounded to this band regardless of its weight, so the
/// 27-weight performance factor saturates at 25.
pub const SUBSCORE_CAP: u8 = 25;

/// Reference bands for the scoring curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Commission-to-price ratio at or below which the commission sub-score
    /// is maximal.
    pub commission_ratio_floor: f64,
    /// Ratio at or above which the commission sub-score is zero.
    pub commission_ratio_ceiling: f64,
    /// Binding period (months) scoring maximal on the timeline factor.
    pub binding_period_best_months: u8,
    /// Binding period scoring zero on the timeline factor.
    pub binding_period_worst_months: u8,
    /// Average days-on-market at or above which the pace contribution of the
    /// performance factor is zero.
    pub days_on_market_ceiling: f64,
    /// Years of local experience at which the experience sub-score is
    /// maximal.
    pub local_experience_full_years: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            commission_ratio_floor: 0.005,
            commission_ratio_ceiling: 0.03,
            binding_period_best_months: 3,
            binding_period_worst_months: 12,
            days_on_market_ceiling: 90.0,
            local_experience_full_years: 10.0,
        }
    }
}

/// Track record supplied by the agent-profile collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentTrackRecord {
    /// Share of handled cases closed successfully, in [0, 1].
    pub success_rate: f64,
    pub average_days_on_market: f64,
    pub years_local_experience: f64,
}

impl AgentTrackRecord {
    /// Documented neutral default used when profile data is absent.
    pub const fn neutral() -> Self {
        Self {
            success_rate: 0.5,
            average_days_on_market: 45.0,
            years_local_experience: 5.0,
        }
    }
}

impl Default for AgentTrackRecord {
    fn default() -> Self {
        Self::neutral()
    }
}

/// External collaborator supplying per-agent track records. Returning `None`
/// makes the engine fall back to [`AgentTrackRecord::neutral`].
pub trait AgentProfileProvider: Send + Sync {
    fn track_record(&self, agent_id: &AgentId) -> Option<AgentTrackRecord>;
}

/// The four sub-scores, each independently in `[0, SUBSCORE_CAP]`. The
/// composite score is their exact sum; there is no post-hoc renormalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub commission: u8,
    pub timeline: u8,
    pub performance: u8,
    pub local_experience: u8,
}

impl ScoreBreakdown {
    pub const fn total(&self) -> u8 {
        self.commission + self.timeline + self.performance + self.local_experience
    }
}

/// Terms of an offer that feed the score; extracted so the engine never
/// depends on a stored [`Offer`].
#[derive(Debug, Clone, Copy)]
pub struct OfferTerms {
    pub price_value: u64,
    pub commission_value: u64,
    pub binding_period_months: u8,
}

fn subscore(weight: f64, quality: f64) -> u8 {
    let raw = (quality.clamp(0.0, 1.0) * weight).floor() as u8;
    raw.min(SUBSCORE_CAP)
}

/// Linear descent from 1 at `best` to 0 at `worst`.
fn band_quality(value: f64, best: f64, worst: f64) -> f64 {
    if worst <= best {
        return 1.0;
    }
    (worst - value) / (worst - best)
}

/// Compute the four sub-scores for one offer. Deterministic for identical
/// inputs.
pub fn compute_breakdown(
    terms: OfferTerms,
    record: &AgentTrackRecord,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let ratio = if terms.price_value == 0 {
        config.commission_ratio_ceiling
    } else {
        terms.commission_value as f64 / terms.price_value as f64
    };
    let commission = subscore(
        COMMISSION_WEIGHT,
        band_quality(
            ratio,
            config.commission_ratio_floor,
            config.commission_ratio_ceiling,
        ),
    );

    let timeline = subscore(
        TIMELINE_WEIGHT,
        band_quality(
            terms.binding_period_months as f64,
            config.binding_period_best_months as f64,
            config.binding_period_worst_months as f64,
        ),
    );

    let pace = band_quality(
        record.average_days_on_market,
        0.0,
        config.days_on_market_ceiling,
    );
    let performance = subscore(
        PERFORMANCE_WEIGHT,
        0.6 * record.success_rate + 0.4 * pace.clamp(0.0, 1.0),
    );

    let local_experience = subscore(
        EXPERIENCE_WEIGHT,
        record.years_local_experience / config.local_experience_full_years,
    );

    ScoreBreakdown {
        commission,
        timeline,
        performance,
        local_experience,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Score,
    Commission,
    Timeline,
    Price,
    SubmittedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Commission buckets used as a structural filter in the seller's offer
/// list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionBand {
    /// Below 50.000 kr.
    Low,
    /// 50.000 kr. through 75.000 kr.
    Mid,
    /// Above 75.000 kr.
    High,
}

impl CommissionBand {
    pub fn contains(self, commission_value: u64) -> bool {
        match self {
            Self::Low => commission_value < 50_000,
            Self::Mid => (50_000..=75_000).contains(&commission_value),
            Self::High => commission_value > 75_000,
        }
    }
}

/// Structural predicate map: an offer passes only if it satisfies every
/// provided filter; absent keys impose no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_commission: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_band: Option<CommissionBand>,
}

impl OfferFilters {
    pub fn accepts(&self, offer: &Offer) -> bool {
        if let Some(max) = self.max_commission {
            if offer.commission.value > max {
                return false;
            }
        }
        if let Some(min) = self.min_score {
            if offer.score < min {
                return false;
            }
        }
        if let Some(band) = self.commission_band {
            if !band.contains(offer.commission.value) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingQuery {
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default)]
    pub filters: OfferFilters,
}

/// Ordered, filtered view over a case's offers, with both counts so the
/// caller can render "N of M".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedOffers {
    pub total_count: usize,
    pub filtered_count: usize,
    pub offers: Vec<Offer>,
}

/// Filter, then sort. The primary key honors the requested direction; ties
/// break by `submitted_at` ascending (earlier offer wins), then by id
/// ascending, both irrespective of direction.
pub fn rank_offers(offers: &[Offer], query: &RankingQuery) -> RankedOffers {
    let total_count = offers.len();

    let mut filtered: Vec<Offer> = offers
        .iter()
        .filter(|offer| query.filters.accepts(offer))
        .cloned()
        .collect();
    let filtered_count = filtered.len();

    filtered.sort_by(|a, b| {
        let primary = match query.sort_by {
            SortKey::Score => a.score.cmp(&b.score),
            SortKey::Commission => a.commission.value.cmp(&b.commission.value),
            SortKey::Timeline => a.binding_period_months.cmp(&b.binding_period_months),
            SortKey::Price => a.expected_price.value.cmp(&b.expected_price.value),
            SortKey::SubmittedAt => a.submitted_at.cmp(&b.submitted_at),
        };
        let primary = match query.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary
            .then_with(|| a.submitted_at.cmp(&b.submitted_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    RankedOffers {
        total_count,
        filtered_count,
        offers: filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::marketplace::domain::{CaseId, Money, OfferId};

    fn terms(price: u64, commission: u64, months: u8) -> OfferTerms {
        OfferTerms {
            price_value: price,
            commission_value: commission,
            binding_period_months: months,
        }
    }

    fn offer(agent: &str, price: u64, commission: u64, months: u8, minute: u32) -> Offer {
        let case_id = CaseId("case-000001".to_string());
        let agent_id = AgentId(agent.to_string());
        let breakdown = compute_breakdown(
            terms(price, commission, months),
            &AgentTrackRecord::neutral(),
            &ScoringConfig::default(),
        );
        Offer {
            id: OfferId::for_submission(&case_id, &agent_id),
            case_id,
            agent_id,
            agency_name: format!("{agent} Agency"),
            agent_name: agent.to_string(),
            expected_price: Money::dkk(price),
            commission: Money::dkk(commission),
            binding_period_months: months,
            marketing_methods: Vec::new(),
            sales_strategy: "standard".to_string(),
            submitted_at: Utc
                .with_ymd_and_hms(2026, 9, 10, 12, minute, 0)
                .single()
                .expect("valid timestamp"),
            score: breakdown.total(),
            score_breakdown: breakdown,
        }
    }

    #[test]
    fn subscores_stay_in_band_and_sum_to_total() {
        let config = ScoringConfig::default();
        let records = [
            AgentTrackRecord::neutral(),
            AgentTrackRecord {
                success_rate: 1.0,
                average_days_on_market: 0.0,
                years_local_experience: 30.0,
            },
            AgentTrackRecord {
                success_rate: 0.0,
                average_days_on_market: 400.0,
                years_local_experience: 0.0,
            },
        ];
        let cases = [
            terms(4_350_000, 65_000, 6),
            terms(4_275_000, 55_000, 4),
            terms(1, 0, 3),
            terms(10_000_000, 9_999_999, 12),
        ];

        for record in &records {
            for case in cases {
                let breakdown = compute_breakdown(case, record, &config);
                for sub in [
                    breakdown.commission,
                    breakdown.timeline,
                    breakdown.performance,
                    breakdown.local_experience,
                ] {
                    assert!(sub <= SUBSCORE_CAP, "{breakdown:?}");
                }
                assert!(breakdown.total() <= 100);
            }
        }
    }

    #[test]
    fn performance_weight_saturates_at_cap() {
        let best = AgentTrackRecord {
            success_rate: 1.0,
            average_days_on_market: 0.0,
            years_local_experience: 10.0,
        };
        let breakdown = compute_breakdown(
            terms(4_000_000, 20_000, 3),
            &best,
            &ScoringConfig::default(),
        );
        assert_eq!(breakdown.performance, SUBSCORE_CAP);
    }

    #[test]
    fn commission_subscore_is_monotonically_decreasing() {
        let config = ScoringConfig::default();
        let record = AgentTrackRecord::neutral();
        let mut previous = u8::MAX;
        for commission in [10_000u64, 30_000, 55_000, 65_000, 90_000, 140_000] {
            let breakdown = compute_breakdown(terms(4_300_000, commission, 6), &record, &config);
            assert!(breakdown.commission <= previous, "commission {commission}");
            previous = breakdown.commission;
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let config = ScoringConfig::default();
        let record = AgentTrackRecord {
            success_rate: 0.73,
            average_days_on_market: 38.0,
            years_local_experience: 7.5,
        };
        let a = compute_breakdown(terms(4_350_000, 65_000, 6), &record, &config);
        let b = compute_breakdown(terms(4_350_000, 65_000, 6), &record, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn missing_profile_falls_back_to_neutral_default() {
        let neutral = AgentTrackRecord::neutral();
        assert_eq!(AgentTrackRecord::default(), neutral);
        assert!((neutral.success_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn ranking_is_idempotent_and_direction_aware() {
        let offers = vec![
            offer("agent-a", 4_350_000, 65_000, 6, 0),
            offer("agent-b", 4_275_000, 55_000, 4, 1),
            offer("agent-c", 4_400_000, 80_000, 9, 2),
        ];
        let query = RankingQuery::default();

        let first = rank_offers(&offers, &query);
        let second = rank_offers(&offers, &query);
        assert_eq!(first, second);
        assert_eq!(first.total_count, 3);
        assert_eq!(first.filtered_count, 3);

        // Default is score descending; agent-b has the cheapest commission
        // and shortest binding period.
        assert_eq!(first.offers[0].agent_id.0, "agent-b");

        let asc = rank_offers(
            &offers,
            &RankingQuery {
                direction: SortDirection::Asc,
                ..RankingQuery::default()
            },
        );
        let mut reversed: Vec<_> = first.offers.iter().map(|o| o.score).collect();
        reversed.reverse();
        let asc_scores: Vec<_> = asc.offers.iter().map(|o| o.score).collect();
        assert_eq!(asc_scores, reversed);
    }

    #[test]
    fn ties_break_by_submission_time_then_id() {
        // Identical terms, different submission minute.
        let late = offer("agent-z", 4_300_000, 60_000, 6, 5);
        let early = offer("agent-a", 4_300_000, 60_000, 6, 1);
        assert_eq!(late.score, early.score);

        let ranked = rank_offers(&[late.clone(), early.clone()], &RankingQuery::default());
        assert_eq!(ranked.offers[0].id, early.id);
        assert_eq!(ranked.offers[1].id, late.id);

        // Same instant: id ascending decides.
        let twin_a = offer("agent-a", 4_300_000, 60_000, 6, 2);
        let twin_b = offer("agent-b", 4_300_000, 60_000, 6, 2);
        let ranked = rank_offers(&[twin_b, twin_a.clone()], &RankingQuery::default());
        assert_eq!(ranked.offers[0].id, twin_a.id);
    }

    #[test]
    fn filters_apply_conjunctively_and_report_counts() {
        let offers = vec![
            offer("agent-a", 4_350_000, 65_000, 6, 0),
            offer("agent-b", 4_275_000, 55_000, 4, 1),
            offer("agent-c", 4_400_000, 80_000, 9, 2),
        ];

        let ranked = rank_offers(
            &offers,
            &RankingQuery {
                filters: OfferFilters {
                    max_commission: Some(70_000),
                    min_score: None,
                    commission_band: Some(CommissionBand::Mid),
                },
                ..RankingQuery::default()
            },
        );
        assert_eq!(ranked.total_count, 3);
        assert_eq!(ranked.filtered_count, 2);
        assert!(ranked.offers.iter().all(|o| o.commission.value <= 70_000));
    }

    #[test]
    fn tightening_a_filter_never_increases_filtered_count() {
        let offers = vec![
            offer("agent-a", 4_350_000, 65_000, 6, 0),
            offer("agent-b", 4_275_000, 55_000, 4, 1),
            offer("agent-c", 4_400_000, 80_000, 9, 2),
            offer("agent-d", 4_100_000, 30_000, 12, 3),
        ];

        let mut previous = offers.len();
        for min_score in [0u8, 20, 40, 60, 80, 100] {
            let ranked = rank_offers(
                &offers,
                &RankingQuery {
                    filters: OfferFilters {
                        min_score: Some(min_score),
                        ..OfferFilters::default()
                    },
                    ..RankingQuery::default()
                },
            );
            assert!(ranked.filtered_count <= previous, "min_score {min_score}");
            previous = ranked.filtered_count;
        }
    }

    #[test]
    fn commission_bands_partition_the_value_range() {
        for value in [0u64, 49_999, 50_000, 60_000, 75_000, 75_001, 200_000] {
            let hits = [
                CommissionBand::Low,
                CommissionBand::Mid,
                CommissionBand::High,
            ]
            .iter()
            .filter(|band| band.contains(value))
            .count();
            assert_eq!(hits, 1, "value {value}");
        }
    }
}
