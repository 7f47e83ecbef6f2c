//! Loyalty service.

use async_trait::async_trait;
use kaiten::lines::LineKind;
use mockall::automock;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        carts::repository::PgCartsRepository,
        loyalty::{
            errors::LoyaltyServiceError,
            models::{CardUsage, LoyaltyCard, LoyaltyRollOption},
            repository::PgLoyaltyRepository,
        },
        users::repository::PgUsersRepository,
    },
    ids::{CardUuid, UserUuid},
};

#[derive(Debug, Clone)]
pub struct PgLoyaltyService {
    db: Db,
    loyalty: PgLoyaltyRepository,
    carts: PgCartsRepository,
    users: PgUsersRepository,
}

impl PgLoyaltyService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            loyalty: PgLoyaltyRepository::new(),
            carts: PgCartsRepository::new(),
            users: PgUsersRepository::new(),
        }
    }

    /// Whitelist the `limit` cheapest rolls for redemption. Used by the
    /// seeding CLI; already whitelisted rolls are re-enabled.
    ///
    /// # Errors
    ///
    /// Fails when the whitelist upsert fails.
    pub async fn seed_whitelist(&self, limit: i64) -> Result<u64, LoyaltyServiceError> {
        let mut tx = self.db.begin().await?;

        let seeded = self.loyalty.seed_whitelist(&mut tx, limit).await?;

        tx.commit().await?;

        Ok(seeded)
    }
}

#[async_trait]
impl LoyaltyService for PgLoyaltyService {
    async fn list_cards(&self, user: UserUuid) -> Result<Vec<LoyaltyCard>, LoyaltyServiceError> {
        let mut tx = self.db.begin().await?;

        let cards = self.loyalty.list_cards(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cards)
    }

    async fn available_rolls(&self) -> Result<Vec<LoyaltyRollOption>, LoyaltyServiceError> {
        let mut tx = self.db.begin().await?;

        let rolls = self.loyalty.available_rolls(&mut tx).await?;

        tx.commit().await?;

        Ok(rolls)
    }

    async fn redeem(
        &self,
        user: UserUuid,
        card: CardUuid,
        roll_id: Uuid,
    ) -> Result<CardUsage, LoyaltyServiceError> {
        let mut tx = self.db.begin().await?;

        // Redemption writes a cart line, so it takes the same user-row lock
        // as every other cart mutation. Without it a concurrent checkout
        // could clear the free roll out of the cart after the card is gone.
        self.users.lock_user(&mut tx, user).await?;

        // Locks the card row; a concurrent redemption of the same card
        // blocks here and then finds the row gone.
        let (card, card_number) = self
            .loyalty
            .get_completed_card(&mut tx, user, card)
            .await?
            .ok_or(LoyaltyServiceError::NotFound)?;

        if !self.loyalty.roll_available(&mut tx, roll_id).await? {
            return Err(LoyaltyServiceError::RollNotAvailable);
        }

        self.carts
            .upsert_item_line(&mut tx, user, LineKind::LoyaltyRoll, roll_id, 1)
            .await?;

        let usage = self
            .loyalty
            .create_usage(&mut tx, user, card, &card_number, roll_id)
            .await?;

        self.loyalty.delete_card(&mut tx, card).await?;

        tx.commit().await?;

        tracing::info!(card = %usage.card_number, "Loyalty card redeemed");

        Ok(usage)
    }

    async fn history(&self, user: UserUuid) -> Result<Vec<CardUsage>, LoyaltyServiceError> {
        let mut tx = self.db.begin().await?;

        let usages = self.loyalty.history(&mut tx, user).await?;

        tx.commit().await?;

        Ok(usages)
    }
}

#[automock]
#[async_trait]
pub trait LoyaltyService: Send + Sync {
    /// Every card the user has held, newest first.
    async fn list_cards(&self, user: UserUuid) -> Result<Vec<LoyaltyCard>, LoyaltyServiceError>;

    /// Rolls a completed card can currently be exchanged for.
    async fn available_rolls(&self) -> Result<Vec<LoyaltyRollOption>, LoyaltyServiceError>;

    /// Exchange a completed card for a free roll in the cart.
    async fn redeem(
        &self,
        user: UserUuid,
        card: CardUuid,
        roll_id: Uuid,
    ) -> Result<CardUsage, LoyaltyServiceError>;

    /// The user's redemption ledger.
    async fn history(&self, user: UserUuid) -> Result<Vec<CardUsage>, LoyaltyServiceError>;
}

#[cfg(test)]
mod tests {
    use crate::{domain::carts::service::CartsService, test::TestContext};

    use super::*;

    async fn accrue(ctx: &TestContext, user: UserUuid, amount: i64) {
        let mut tx = ctx.db.pool().begin().await.expect("tx should begin");

        PgLoyaltyRepository::new()
            .accrue(&mut tx, user, amount)
            .await
            .expect("accrual should succeed");

        tx.commit().await.expect("tx should commit");
    }

    #[tokio::test]
    async fn spend_under_one_stamp_creates_no_card() {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("miso@example.com").await;

        accrue(&ctx, user, 999).await;

        let cards = ctx.loyalty.list_cards(user).await.expect("list_cards");

        assert!(cards.is_empty(), "expected no cards, got {cards:?}");
    }

    #[tokio::test]
    async fn spend_fills_an_active_card() {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("nigiri@example.com").await;

        accrue(&ctx, user, 3500).await;

        let cards = ctx.loyalty.list_cards(user).await.expect("list_cards");

        assert_eq!(cards.len(), 1, "expected one card, got {cards:?}");

        let card = cards.first().expect("one card");

        assert_eq!(card.filled_rolls, 3);
        assert!(!card.is_completed);
        assert!(card.completed_at.is_none());
    }

    #[tokio::test]
    async fn overflow_completes_the_card_and_carries_over() {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("unagi@example.com").await;

        accrue(&ctx, user, 6999).await;
        accrue(&ctx, user, 3000).await;

        let cards = ctx.loyalty.list_cards(user).await.expect("list_cards");

        assert_eq!(cards.len(), 2, "expected two cards, got {cards:?}");

        let completed = cards.iter().find(|card| card.is_completed);
        let active = cards.iter().find(|card| !card.is_completed);

        assert_eq!(completed.map(|card| card.filled_rolls), Some(8));
        assert!(completed.and_then(|card| card.completed_at).is_some());
        assert_eq!(active.map(|card| card.filled_rolls), Some(1));
    }

    #[tokio::test]
    async fn one_spend_can_complete_several_cards() {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("omakase@example.com").await;

        accrue(&ctx, user, 17_000).await;

        let cards = ctx.loyalty.list_cards(user).await.expect("list_cards");

        let completed = cards.iter().filter(|card| card.is_completed).count();
        let active = cards.iter().find(|card| !card.is_completed);

        assert_eq!(completed, 2, "expected two completed cards, got {cards:?}");
        assert_eq!(active.map(|card| card.filled_rolls), Some(1));
    }

    #[tokio::test]
    async fn exact_boundary_leaves_no_active_card() {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("tamago@example.com").await;

        accrue(&ctx, user, 8000).await;

        let cards = ctx.loyalty.list_cards(user).await.expect("list_cards");

        assert_eq!(cards.len(), 1, "expected one card, got {cards:?}");
        assert!(cards.iter().all(|card| card.is_completed));
    }

    #[tokio::test]
    async fn redeem_consumes_the_card_and_adds_a_free_roll() {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("kappa@example.com").await;
        let roll = ctx.seed_roll("Kappa Maki", 300).await;

        ctx.whitelist_roll(roll).await;
        accrue(&ctx, user, 8000).await;

        let cards = ctx.loyalty.list_cards(user).await.expect("list_cards");
        let card = cards.first().expect("completed card").uuid;

        let usage = ctx
            .loyalty
            .redeem(user, card, roll)
            .await
            .expect("redeem should succeed");

        assert_eq!(usage.roll_id, roll);

        let view = ctx.carts.get_cart(user).await.expect("get_cart");
        let free = view
            .priced
            .lines
            .iter()
            .find(|line| line.line.kind() == LineKind::LoyaltyRoll)
            .expect("free roll line");

        assert_eq!(free.unit_price, 0);
        assert_eq!(free.line.quantity(), 1);
        assert_eq!(view.priced.total, 0);

        let history = ctx.loyalty.history(user).await.expect("history");

        assert_eq!(history.len(), 1, "expected one ledger entry");
        assert_eq!(
            history.first().map(|entry| entry.card_number.as_str()),
            Some(usage.card_number.as_str())
        );

        // The card row is gone, so spending it again misses.
        let again = ctx.loyalty.redeem(user, card, roll).await;

        assert!(
            matches!(again, Err(LoyaltyServiceError::NotFound)),
            "expected NotFound, got {again:?}"
        );
    }

    #[tokio::test]
    async fn redeem_requires_a_whitelisted_roll() {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("ikura@example.com").await;
        let roll = ctx.seed_roll("Ikura Gunkan", 450).await;

        accrue(&ctx, user, 8000).await;

        let cards = ctx.loyalty.list_cards(user).await.expect("list_cards");
        let card = cards.first().expect("completed card").uuid;

        let result = ctx.loyalty.redeem(user, card, roll).await;

        assert!(
            matches!(result, Err(LoyaltyServiceError::RollNotAvailable)),
            "expected RollNotAvailable, got {result:?}"
        );

        // The failed redemption must not have consumed the card.
        let cards = ctx.loyalty.list_cards(user).await.expect("list_cards");

        assert_eq!(cards.len(), 1, "card should survive a failed redemption");
    }
}
