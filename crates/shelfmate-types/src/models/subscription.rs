//! Premium subscription models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Billing period of a plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BillingInterval {
    Month,
    Year,
}

/// A plan from `/subscriptions/plans`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    /// Price per interval in minor currency units
    pub price_cents: u32,
    /// ISO 4217 code
    pub currency: String,
    pub interval: BillingInterval,
    #[serde(default)]
    pub features: Vec<String>,
}

impl SubscriptionPlan {
    /// Price normalized to one month, rounded down.
    pub const fn monthly_price_cents(&self) -> u32 {
        match self.interval {
            BillingInterval::Month => self.price_cents,
            BillingInterval::Year => self.price_cents / 12,
        }
    }
}

/// Billing state of a subscription.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trialing,
    Active,
    Cancelled,
    Expired,
    PastDue,
}

/// The user's subscription from `/subscriptions/current`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    pub plan_id: String,
    pub status: SubscriptionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

impl Subscription {
    /// Whether premium features are unlocked at `now`.
    ///
    /// A cancelled subscription stays premium until its paid period ends.
    pub fn is_premium_at(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            SubscriptionStatus::Active | SubscriptionStatus::Trialing => true,
            SubscriptionStatus::Cancelled => self.current_period_end.is_some_and(|end| end > now),
            SubscriptionStatus::Expired | SubscriptionStatus::PastDue => false,
        }
    }

    /// [`Self::is_premium_at`] for the current time.
    pub fn is_premium(&self) -> bool {
        self.is_premium_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::round_trip;
    use chrono::Duration;

    fn sub(status: SubscriptionStatus, end: Option<DateTime<Utc>>) -> Subscription {
        Subscription {
            plan_id: "premium".to_string(),
            status,
            current_period_end: end,
            cancel_at_period_end: false,
        }
    }

    #[test]
    fn test_cancelled_keeps_premium_until_period_end() {
        let now = Utc::now();
        assert!(sub(SubscriptionStatus::Cancelled, Some(now + Duration::days(3))).is_premium_at(now));
        assert!(!sub(SubscriptionStatus::Cancelled, Some(now - Duration::days(1))).is_premium_at(now));
        assert!(!sub(SubscriptionStatus::Cancelled, None).is_premium_at(now));
    }

    #[test]
    fn test_status_premium() {
        let now = Utc::now();
        assert!(sub(SubscriptionStatus::Trialing, None).is_premium_at(now));
        assert!(sub(SubscriptionStatus::Active, None).is_premium_at(now));
        assert!(!sub(SubscriptionStatus::PastDue, None).is_premium_at(now));
        assert!(!sub(SubscriptionStatus::Expired, None).is_premium_at(now));
    }

    #[test]
    fn test_monthly_price() {
        let yearly = SubscriptionPlan {
            id: "y".to_string(),
            name: "Yearly".to_string(),
            price_cents: 4799,
            currency: "EUR".to_string(),
            interval: BillingInterval::Year,
            features: Vec::new(),
        };
        assert_eq!(yearly.monthly_price_cents(), 399);
    }

    #[test]
    fn test_round_trip() {
        let plan = SubscriptionPlan {
            id: "premium-month".to_string(),
            name: "Premium".to_string(),
            price_cents: 499,
            currency: "EUR".to_string(),
            interval: BillingInterval::Month,
            features: vec!["unlimited quotes".to_string(), "reading insights".to_string()],
        };
        assert_eq!(round_trip(&plan), plan);
        let bare_plan = SubscriptionPlan { features: Vec::new(), ..plan };
        assert_eq!(round_trip(&bare_plan), bare_plan);

        let end = "2024-06-01T00:00:00Z"
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|e| panic!("bad timestamp: {e}"));
        let full = Subscription {
            cancel_at_period_end: true,
            ..sub(SubscriptionStatus::PastDue, Some(end))
        };
        assert_eq!(round_trip(&full), full);
        let minimal = sub(SubscriptionStatus::Trialing, None);
        assert_eq!(round_trip(&minimal), minimal);
    }
}
