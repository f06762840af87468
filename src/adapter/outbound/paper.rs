//! In-memory paper trader.
//!
//! A deliberately simple simulator: market orders fill immediately and in
//! full at the requested price, sells clamp to the held position, and
//! positions are marked to the order-book midpoint when a book source is
//! wired in. There is no queue, no partial-fill model, and no fee model.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::id::{OrderId, TokenId};
use crate::domain::money::Price;
use crate::error::{Error, Result};
use crate::port::outbound::execution::{OrderClient, OrderSide};
use crate::port::outbound::paper::{PaperFill, PaperOrderRequest, PaperStats, PaperTrader};

#[derive(Debug, Clone)]
struct PaperPosition {
    size: Decimal,
    avg_price: Price,
    last_price: Price,
}

#[derive(Debug)]
struct PaperLedger {
    cash: Decimal,
    positions: HashMap<TokenId, PaperPosition>,
    realized_pnl: Decimal,
    trades: u64,
}

/// Paper trader backed by a mutex-guarded ledger.
pub struct InMemoryPaperTrader {
    /// Book source for mark-to-market; prices stay at the last fill
    /// when absent.
    marks: Option<Arc<dyn OrderClient>>,
    ledger: Mutex<PaperLedger>,
}

impl InMemoryPaperTrader {
    /// Create a trader with the given starting cash and no book source.
    #[must_use]
    pub fn new(starting_cash: Decimal) -> Self {
        Self {
            marks: None,
            ledger: Mutex::new(PaperLedger {
                cash: starting_cash,
                positions: HashMap::new(),
                realized_pnl: Decimal::ZERO,
                trades: 0,
            }),
        }
    }

    /// Create a trader that marks positions against live order books.
    #[must_use]
    pub fn with_marks(starting_cash: Decimal, books: Arc<dyn OrderClient>) -> Self {
        let mut trader = Self::new(starting_cash);
        trader.marks = Some(books);
        trader
    }

    fn fill_buy(&self, request: &PaperOrderRequest) -> Result<PaperFill> {
        let mut ledger = self.ledger.lock();
        let notional = request.size * request.price;
        if notional > ledger.cash {
            return Err(Error::Execution(format!(
                "insufficient paper cash: need {notional}, have {}",
                ledger.cash
            )));
        }
        ledger.cash -= notional;

        let position = ledger
            .positions
            .entry(request.token_id.clone())
            .or_insert(PaperPosition {
                size: Decimal::ZERO,
                avg_price: Decimal::ZERO,
                last_price: request.price,
            });
        let total = position.size + request.size;
        position.avg_price =
            (position.size * position.avg_price + request.size * request.price) / total;
        position.size = total;
        position.last_price = request.price;
        ledger.trades += 1;

        Ok(PaperFill {
            order_id: OrderId::generate(),
            price: request.price,
            size: request.size,
            realized_pnl: Decimal::ZERO,
        })
    }

    fn fill_sell(&self, request: &PaperOrderRequest) -> Result<PaperFill> {
        let mut ledger = self.ledger.lock();
        let Some(position) = ledger.positions.get(&request.token_id).cloned() else {
            return Err(Error::Execution(format!(
                "no paper position in token {}",
                request.token_id
            )));
        };

        let filled = request.size.min(position.size);
        let realized = (request.price - position.avg_price) * filled;
        ledger.cash += filled * request.price;
        ledger.realized_pnl += realized;
        ledger.trades += 1;

        let remaining = position.size - filled;
        if remaining.is_zero() {
            ledger.positions.remove(&request.token_id);
        } else if let Some(entry) = ledger.positions.get_mut(&request.token_id) {
            entry.size = remaining;
            entry.last_price = request.price;
        }

        Ok(PaperFill {
            order_id: OrderId::generate(),
            price: request.price,
            size: filled,
            realized_pnl: realized,
        })
    }
}

#[async_trait]
impl PaperTrader for InMemoryPaperTrader {
    async fn place_order(&self, request: &PaperOrderRequest) -> Result<PaperFill> {
        let fill = match request.side {
            OrderSide::Buy => self.fill_buy(request)?,
            OrderSide::Sell => self.fill_sell(request)?,
        };
        debug!(
            token = %request.token_id,
            side = request.side.as_str(),
            size = %fill.size,
            price = %fill.price,
            "Paper fill"
        );
        Ok(fill)
    }

    async fn update_prices(&self) -> Result<()> {
        let Some(books) = &self.marks else {
            return Ok(());
        };
        let tokens: Vec<TokenId> = self.ledger.lock().positions.keys().cloned().collect();

        for token in tokens {
            match books.get_order_book(&token).await {
                Ok(book) => {
                    if let Some(mid) = book.midpoint() {
                        if let Some(position) = self.ledger.lock().positions.get_mut(&token) {
                            position.last_price = mid;
                        }
                    }
                }
                Err(e) => {
                    debug!(token = %token, error = %e, "Mark refresh failed");
                }
            }
        }
        Ok(())
    }

    fn stats(&self) -> PaperStats {
        let ledger = self.ledger.lock();
        let unrealized = ledger
            .positions
            .values()
            .map(|p| (p.last_price - p.avg_price) * p.size)
            .sum();
        PaperStats {
            cash: ledger.cash,
            open_positions: ledger.positions.len(),
            realized_pnl: ledger.realized_pnl,
            unrealized_pnl: unrealized,
            trades: ledger.trades,
        }
    }
}
