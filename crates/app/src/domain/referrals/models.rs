//! Referral models.

use crate::ids::UserUuid;

/// One successful signup referral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReferralUsage {
    pub referrer: UserUuid,
    pub referred: UserUuid,
    /// The code that was redeemed (the referrer's).
    pub referral_code: String,
    pub bonus_points_awarded: i64,
}
