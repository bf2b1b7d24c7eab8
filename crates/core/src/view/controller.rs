use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::domain::cart::{Cart, LineChange};
use crate::domain::product::{Product, ProductId};
use crate::errors::DomainError;
use crate::pricing::CartSummary;
use crate::view::states::{DetailView, EventOutcome, Screen, UiEvent};

/// Owns all session state: the catalog, the cart, the visible screen and the
/// transient product selection. Every user action enters through [`dispatch`].
///
/// [`dispatch`]: Storefront::dispatch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Storefront {
    catalog: Catalog,
    cart: Cart,
    screen: Screen,
    detail: Option<DetailView>,
}

impl Storefront {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog, cart: Cart::new(), screen: Screen::Products, detail: None }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.detail.as_ref().and_then(|detail| self.catalog.find_by_id(detail.product_id))
    }

    pub fn summary(&self) -> CartSummary {
        self.cart.summary()
    }

    pub fn dispatch(&mut self, event: UiEvent) -> EventOutcome {
        debug!(event_name = "storefront.event_received", event = ?event, "ui event received");

        match event {
            UiEvent::ViewDetails(product_id) => self.open_details(product_id),
            UiEvent::SetQuantity(input) => match self.detail.as_mut() {
                Some(detail) => {
                    detail.quantity_input = input;
                    EventOutcome::Redraw
                }
                None => EventOutcome::Ignored,
            },
            UiEvent::AddToCart => self.add_selected(),
            UiEvent::CloseDetails => match self.detail.take() {
                Some(_) => EventOutcome::Redraw,
                None => EventOutcome::Ignored,
            },
            UiEvent::ViewCart => {
                // The detail panel only exists on the products screen.
                self.detail = None;
                self.screen = Screen::Cart;
                EventOutcome::Redraw
            }
            UiEvent::CloseCart => {
                self.screen = Screen::Products;
                EventOutcome::Redraw
            }
            UiEvent::Increment(product_id) => {
                let Self { catalog, cart, .. } = self;
                mutate_line(cart, product_id, |cart, index| cart.increment(catalog, index))
            }
            UiEvent::Decrement(product_id) => {
                mutate_line(&mut self.cart, product_id, |cart, index| cart.decrement(index))
            }
            UiEvent::Remove(product_id) => mutate_line(&mut self.cart, product_id, |cart, index| {
                cart.remove(index).map(|_| LineChange::Removed)
            }),
            UiEvent::SetLineQuantity(product_id, quantity) => {
                let Self { catalog, cart, .. } = self;
                mutate_line(cart, product_id, |cart, index| {
                    cart.set_quantity(catalog, index, quantity)
                })
            }
        }
    }

    fn open_details(&mut self, product_id: ProductId) -> EventOutcome {
        if self.screen == Screen::Cart || self.catalog.find_by_id(product_id).is_none() {
            return EventOutcome::Ignored;
        }
        self.detail = Some(DetailView::open(product_id));
        EventOutcome::Redraw
    }

    fn add_selected(&mut self) -> EventOutcome {
        let Some(detail) = self.detail.as_ref() else {
            return EventOutcome::Ignored;
        };
        let Some(quantity) = detail.requested_quantity() else {
            debug!(
                event_name = "storefront.quantity_ignored",
                input = %detail.quantity_input,
                "non-positive or non-numeric quantity ignored"
            );
            return EventOutcome::Ignored;
        };
        let product_id = detail.product_id;

        match self.cart.add(&self.catalog, product_id, quantity) {
            Ok(_) => {
                self.detail = None;
                let summary = self.summary();
                info!(
                    event_name = "storefront.cart_updated",
                    product_id = %product_id,
                    quantity,
                    item_count = summary.item_count,
                    total = %summary.total,
                    "product added to cart"
                );
                EventOutcome::Redraw
            }
            Err(error) => reject(error),
        }
    }
}

fn mutate_line<F>(cart: &mut Cart, product_id: ProductId, mutate: F) -> EventOutcome
where
    F: FnOnce(&mut Cart, usize) -> Result<LineChange, DomainError>,
{
    let Some(index) = cart.line_index(product_id) else {
        return EventOutcome::Ignored;
    };

    match mutate(cart, index) {
        Ok(LineChange::Unchanged) => EventOutcome::Ignored,
        Ok(_) => EventOutcome::Redraw,
        Err(error) => reject(error),
    }
}

fn reject(error: DomainError) -> EventOutcome {
    info!(event_name = "storefront.event_rejected", error = %error, "cart left unchanged");
    EventOutcome::Alert(error)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::catalog::Catalog;
    use crate::domain::product::ProductId;
    use crate::errors::DomainError;
    use crate::view::states::{EventOutcome, Screen, UiEvent};

    use super::Storefront;

    const LAPTOP: ProductId = ProductId(1);
    const PHONE: ProductId = ProductId(2);

    fn storefront() -> Storefront {
        Storefront::new(Catalog::seeded())
    }

    fn add(store: &mut Storefront, product_id: ProductId, quantity: &str) -> EventOutcome {
        store.dispatch(UiEvent::ViewDetails(product_id));
        store.dispatch(UiEvent::SetQuantity(quantity.to_string()));
        store.dispatch(UiEvent::AddToCart)
    }

    #[test]
    fn starts_on_products_screen_with_empty_cart() {
        let store = storefront();

        assert_eq!(store.screen(), Screen::Products);
        assert!(store.cart().is_empty());
        assert!(store.detail().is_none());
    }

    #[test]
    fn view_details_selects_product_and_resets_quantity() {
        let mut store = storefront();
        store.dispatch(UiEvent::ViewDetails(PHONE));
        store.dispatch(UiEvent::SetQuantity("7".to_string()));
        store.dispatch(UiEvent::CloseDetails);

        assert_eq!(store.dispatch(UiEvent::ViewDetails(PHONE)), EventOutcome::Redraw);

        assert_eq!(store.selected_product().map(|p| p.name.as_str()), Some("Phone"));
        assert_eq!(store.detail().map(|d| d.quantity_input.as_str()), Some("1"));
    }

    #[test]
    fn unknown_product_details_are_ignored() {
        let mut store = storefront();

        assert_eq!(store.dispatch(UiEvent::ViewDetails(ProductId(404))), EventOutcome::Ignored);
        assert!(store.detail().is_none());
    }

    #[test]
    fn successful_add_closes_detail_and_updates_summary() {
        let mut store = storefront();

        assert_eq!(add(&mut store, LAPTOP, "3"), EventOutcome::Redraw);

        assert!(store.detail().is_none());
        assert_eq!(store.summary().item_count, 3);
        assert_eq!(store.summary().total, Decimal::new(299997, 2));
    }

    #[test]
    fn stock_failure_alerts_and_keeps_detail_open() {
        let mut store = storefront();
        add(&mut store, LAPTOP, "8");
        let cart_before = store.cart().clone();

        let outcome = add(&mut store, LAPTOP, "3");

        assert_eq!(
            outcome,
            EventOutcome::Alert(DomainError::InsufficientStock {
                product_id: LAPTOP,
                requested: 11,
                available: 10,
            })
        );
        assert_eq!(store.cart(), &cart_before);
        assert_eq!(store.detail().map(|d| d.product_id), Some(LAPTOP));
        assert_eq!(store.detail().map(|d| d.quantity_input.as_str()), Some("3"));
    }

    #[test]
    fn invalid_quantity_input_is_silently_ignored() {
        let mut store = storefront();

        for input in ["0", "-1", "two", ""] {
            assert_eq!(add(&mut store, PHONE, input), EventOutcome::Ignored, "input {input:?}");
        }
        assert!(store.cart().is_empty());
        assert!(store.detail().is_some());
    }

    #[test]
    fn add_without_selection_is_ignored() {
        let mut store = storefront();

        assert_eq!(store.dispatch(UiEvent::AddToCart), EventOutcome::Ignored);
        assert_eq!(store.dispatch(UiEvent::SetQuantity("2".into())), EventOutcome::Ignored);
    }

    #[test]
    fn only_cart_toggles_change_the_screen() {
        let mut store = storefront();
        add(&mut store, PHONE, "1");
        assert_eq!(store.screen(), Screen::Products);

        store.dispatch(UiEvent::ViewCart);
        assert_eq!(store.screen(), Screen::Cart);

        store.dispatch(UiEvent::Increment(PHONE));
        store.dispatch(UiEvent::Decrement(PHONE));
        assert_eq!(store.screen(), Screen::Cart);

        store.dispatch(UiEvent::CloseCart);
        assert_eq!(store.screen(), Screen::Products);
    }

    #[test]
    fn details_cannot_be_opened_from_the_cart_screen() {
        let mut store = storefront();
        store.dispatch(UiEvent::ViewCart);

        assert_eq!(store.dispatch(UiEvent::ViewDetails(LAPTOP)), EventOutcome::Ignored);
        assert!(store.detail().is_none());
        assert_eq!(store.dispatch(UiEvent::AddToCart), EventOutcome::Ignored);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn viewing_the_cart_closes_an_open_detail() {
        let mut store = storefront();
        store.dispatch(UiEvent::ViewDetails(PHONE));
        store.dispatch(UiEvent::SetQuantity("2".into()));

        store.dispatch(UiEvent::ViewCart);

        assert!(store.detail().is_none());
        assert_eq!(store.dispatch(UiEvent::AddToCart), EventOutcome::Ignored);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn line_events_are_keyed_by_product_identity() {
        let mut store = storefront();
        add(&mut store, LAPTOP, "1");
        add(&mut store, PHONE, "2");

        assert_eq!(store.dispatch(UiEvent::Decrement(LAPTOP)), EventOutcome::Redraw);
        assert_eq!(store.cart().len(), 1);

        assert_eq!(store.dispatch(UiEvent::Increment(PHONE)), EventOutcome::Redraw);
        assert_eq!(store.cart().lines()[0].quantity, 3);
        assert_eq!(store.dispatch(UiEvent::Increment(LAPTOP)), EventOutcome::Ignored);
    }

    #[test]
    fn increment_at_ceiling_is_a_no_op() {
        let mut store = storefront();
        add(&mut store, LAPTOP, "10");

        assert_eq!(store.dispatch(UiEvent::Increment(LAPTOP)), EventOutcome::Ignored);
        assert_eq!(store.summary().item_count, 10);
    }

    #[test]
    fn set_line_quantity_and_remove() {
        let mut store = storefront();
        add(&mut store, PHONE, "2");

        assert!(matches!(
            store.dispatch(UiEvent::SetLineQuantity(PHONE, 99)),
            EventOutcome::Alert(DomainError::InsufficientStock { .. })
        ));
        assert_eq!(store.dispatch(UiEvent::SetLineQuantity(PHONE, 5)), EventOutcome::Redraw);
        assert_eq!(store.summary().item_count, 5);

        assert_eq!(store.dispatch(UiEvent::Remove(PHONE)), EventOutcome::Redraw);
        assert!(store.cart().is_empty());
        assert_eq!(store.dispatch(UiEvent::Remove(PHONE)), EventOutcome::Ignored);
    }

    #[test]
    fn laptop_walkthrough_through_the_dispatcher() {
        let mut store = storefront();
        add(&mut store, LAPTOP, "3");
        assert_eq!(store.summary().item_count, 3);

        store.dispatch(UiEvent::Increment(LAPTOP));
        store.dispatch(UiEvent::Increment(LAPTOP));
        assert_eq!(store.summary().item_count, 5);

        for _ in 0..3 {
            store.dispatch(UiEvent::Decrement(LAPTOP));
        }
        assert_eq!(store.cart().lines()[0].quantity, 2);

        store.dispatch(UiEvent::Decrement(LAPTOP));
        store.dispatch(UiEvent::Decrement(LAPTOP));
        assert!(store.cart().is_empty());
        assert_eq!(store.summary().total, Decimal::ZERO);
    }
}
