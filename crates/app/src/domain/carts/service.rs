//! Carts service.

use async_trait::async_trait;
use kaiten::{
    lines::{CartLine, LineKind},
    pricing::{PricedCart, bonus_to_apply, price_cart},
};
use mockall::automock;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{BonusApplication, CartView},
            repository::PgCartsRepository,
        },
        catalog::repository::PgCatalogRepository,
        users::repository::PgUsersRepository,
    },
    ids::UserUuid,
};

/// Price a set of cart lines inside an open transaction, resolving catalog
/// prices with one query per item kind. Shared with the checkout path.
pub(crate) async fn price_lines_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    catalog: &PgCatalogRepository,
    lines: &[CartLine],
) -> Result<PricedCart, CartsServiceError> {
    let roll_ids: Vec<Uuid> = lines
        .iter()
        .filter(|line| line.kind() == LineKind::Roll)
        .filter_map(CartLine::item_id)
        .collect();

    let set_ids: Vec<Uuid> = lines
        .iter()
        .filter(|line| line.kind() == LineKind::Set)
        .filter_map(CartLine::item_id)
        .collect();

    let prices = catalog.load_prices(tx, &roll_ids, &set_ids).await?;

    Ok(price_cart(lines, &prices)?)
}

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts: PgCartsRepository,
    catalog: PgCatalogRepository,
    users: PgUsersRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts: PgCartsRepository::new(),
            catalog: PgCatalogRepository::new(),
            users: PgUsersRepository::new(),
        }
    }

    async fn view_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartView, CartsServiceError> {
        let account = self.users.get_user(tx, user).await?;
        let lines = self.carts.get_lines(tx, user).await?;
        let priced = price_lines_in_tx(tx, &self.catalog, &lines).await?;

        Ok(CartView {
            priced,
            bonus_points: account.bonus_points,
        })
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let view = self.view_in_tx(&mut tx, user).await?;

        tx.commit().await?;

        Ok(view)
    }

    async fn add_line(
        &self,
        user: UserUuid,
        kind: LineKind,
        item_id: Uuid,
        quantity: u32,
    ) -> Result<CartView, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        // Loyalty lines enter through redemption, the bonus line through
        // `use_bonus_points`; only catalog lines are added directly.
        if !kind.is_catalog() {
            return Err(CartsServiceError::KindNotAllowed);
        }

        let mut tx = self.db.begin().await?;

        self.users.lock_user(&mut tx, user).await?;

        let exists = match kind {
            LineKind::Roll => self.catalog.roll_exists(&mut tx, item_id).await?,
            _ => self.catalog.set_exists(&mut tx, item_id).await?,
        };

        if !exists {
            return Err(CartsServiceError::NotFound);
        }

        self.carts
            .upsert_item_line(&mut tx, user, kind, item_id, quantity)
            .await?;

        let view = self.view_in_tx(&mut tx, user).await?;

        tx.commit().await?;

        Ok(view)
    }

    async fn remove_line(
        &self,
        user: UserUuid,
        kind: LineKind,
        item_id: Option<Uuid>,
    ) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.users.lock_user(&mut tx, user).await?;

        if kind == LineKind::BonusPoints {
            // Removing the discount returns the points to the balance.
            let amount = self
                .carts
                .delete_bonus_line(&mut tx, user)
                .await?
                .ok_or(CartsServiceError::NotFound)?;

            self.users
                .adjust_bonus_points(&mut tx, user, -amount)
                .await?;
        } else {
            let item_id = item_id.ok_or(CartsServiceError::MissingItemId)?;

            let removed = self
                .carts
                .delete_item_line(&mut tx, user, kind, item_id)
                .await?;

            if removed == 0 {
                return Err(CartsServiceError::NotFound);
            }
        }

        let view = self.view_in_tx(&mut tx, user).await?;

        tx.commit().await?;

        Ok(view)
    }

    async fn update_quantity(
        &self,
        user: UserUuid,
        kind: LineKind,
        item_id: Uuid,
        quantity: i64,
    ) -> Result<CartView, CartsServiceError> {
        // Only catalog lines can be resized. The free roll's quantity is
        // pinned at 1; it can still be removed outright.
        if !kind.is_catalog() {
            return Err(CartsServiceError::KindNotAllowed);
        }

        // Dropping to zero or below removes the line.
        if quantity <= 0 {
            return self.remove_line(user, kind, Some(item_id)).await;
        }

        let quantity = u32::try_from(quantity).map_err(|_| CartsServiceError::InvalidQuantity)?;

        let mut tx = self.db.begin().await?;

        self.users.lock_user(&mut tx, user).await?;

        let updated = self
            .carts
            .set_quantity(&mut tx, user, kind, item_id, quantity)
            .await?;

        if updated == 0 {
            return Err(CartsServiceError::NotFound);
        }

        let view = self.view_in_tx(&mut tx, user).await?;

        tx.commit().await?;

        Ok(view)
    }

    async fn clear(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.users.lock_user(&mut tx, user).await?;

        // Give a pending discount back before dropping the lines; points
        // must not vanish without a purchase.
        if let Some(amount) = self.carts.delete_bonus_line(&mut tx, user).await? {
            self.users
                .adjust_bonus_points(&mut tx, user, -amount)
                .await?;
        }

        self.carts.clear(&mut tx, user).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn use_bonus_points(
        &self,
        user: UserUuid,
        amount: i64,
    ) -> Result<BonusApplication, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut balance = self.users.lock_user(&mut tx, user).await?;

        // A previously applied discount is replaced, not stacked: credit it
        // back before clamping the new request.
        if let Some(previous) = self.carts.delete_bonus_line(&mut tx, user).await? {
            balance = self
                .users
                .adjust_bonus_points(&mut tx, user, -previous)
                .await?;
        }

        let lines = self.carts.get_lines(&mut tx, user).await?;
        let priced = price_lines_in_tx(&mut tx, &self.catalog, &lines).await?;

        let applied = bonus_to_apply(amount, balance, priced.catalog_total)?;

        self.carts.upsert_bonus_line(&mut tx, user, -applied).await?;

        let remaining = self
            .users
            .adjust_bonus_points(&mut tx, user, -applied)
            .await?;

        tx.commit().await?;

        Ok(BonusApplication { applied, remaining })
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The user's priced cart plus bonus-point balance.
    async fn get_cart(&self, user: UserUuid) -> Result<CartView, CartsServiceError>;

    /// Add a catalog item to the cart, merging into an existing line.
    async fn add_line(
        &self,
        user: UserUuid,
        kind: LineKind,
        item_id: Uuid,
        quantity: u32,
    ) -> Result<CartView, CartsServiceError>;

    /// Remove one line. Removing the bonus line refunds its points.
    async fn remove_line(
        &self,
        user: UserUuid,
        kind: LineKind,
        item_id: Option<Uuid>,
    ) -> Result<CartView, CartsServiceError>;

    /// Overwrite a line's quantity; zero or negative removes the line.
    async fn update_quantity(
        &self,
        user: UserUuid,
        kind: LineKind,
        item_id: Uuid,
        quantity: i64,
    ) -> Result<CartView, CartsServiceError>;

    /// Empty the cart, refunding any pending bonus discount.
    async fn clear(&self, user: UserUuid) -> Result<(), CartsServiceError>;

    /// Convert bonus points into a cart discount.
    async fn use_bonus_points(
        &self,
        user: UserUuid,
        amount: i64,
    ) -> Result<BonusApplication, CartsServiceError>;
}
