//! Carbon price and exchange rate feeds.
//!
//! A feed reports each fetch as an explicit success or failure. Fallback
//! constants are applied by [`resolve_price`], and the result records
//! whether a fallback was used so it can be labeled downstream.

use std::{collections::BTreeMap, fmt};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vermi_emissions::credit::CarbonPrice;

/// Price per tonne of CO₂eq used when the feed is unavailable [€].
pub const FALLBACK_PRICE_PER_TONNE: f64 = 85.50;

/// EUR to BRL rate used when the feed is unavailable.
pub const FALLBACK_EXCHANGE_RATE: f64 = 5.50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Brl,
    Usd,
}

impl Currency {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Brl => "BRL",
            Currency::Usd => "USD",
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Brl => "R$",
            Currency::Usd => "$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A carbon price and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price_per_tonne: f64,
    pub currency: Currency,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PriceFetchResult {
    Success(PriceQuote),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RateFetchResult {
    Success { rate: f64, source: String },
    Failure(String),
}

/// A supplier of carbon prices and exchange rates.
pub trait PriceFeed {
    fn carbon_price(&self) -> PriceFetchResult;

    /// Units of `to` per unit of `from`.
    fn exchange_rate(&self, from: Currency, to: Currency) -> RateFetchResult;
}

/// A feed with a fixed quote and a fixed table of rates.
///
/// Rates are looked up directly or inverted. Converting a currency to
/// itself always succeeds with a rate of one.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPriceFeed {
    quote: PriceQuote,
    rates: BTreeMap<(Currency, Currency), f64>,
}

impl FixedPriceFeed {
    #[must_use]
    pub fn new(quote: PriceQuote) -> Self {
        Self {
            quote,
            rates: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_rate(mut self, from: Currency, to: Currency, rate: f64) -> Self {
        self.rates.insert((from, to), rate);
        self
    }
}

impl PriceFeed for FixedPriceFeed {
    fn carbon_price(&self) -> PriceFetchResult {
        PriceFetchResult::Success(self.quote.clone())
    }

    fn exchange_rate(&self, from: Currency, to: Currency) -> RateFetchResult {
        let source = || self.quote.source.clone();
        if from == to {
            return RateFetchResult::Success {
                rate: 1.0,
                source: source(),
            };
        }
        if let Some(&rate) = self.rates.get(&(from, to)) {
            return RateFetchResult::Success {
                rate,
                source: source(),
            };
        }
        match self.rates.get(&(to, from)) {
            Some(&rate) if rate != 0.0 => RateFetchResult::Success {
                rate: 1.0 / rate,
                source: source(),
            },
            _ => RateFetchResult::Failure(format!("no rate for {from} to {to}")),
        }
    }
}

/// A feed that always fails, for offline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnavailableFeed {
    pub reason: String,
}

impl PriceFeed for UnavailableFeed {
    fn carbon_price(&self) -> PriceFetchResult {
        PriceFetchResult::Failure(self.reason.clone())
    }

    fn exchange_rate(&self, _from: Currency, _to: Currency) -> RateFetchResult {
        RateFetchResult::Failure(self.reason.clone())
    }
}

/// Values substituted for a failed fetch, and the reporting currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceFallback {
    pub price_per_tonne: f64,
    pub currency: Currency,
    pub exchange_rate: f64,
    pub reporting_currency: Currency,
}

impl Default for PriceFallback {
    fn default() -> Self {
        Self {
            price_per_tonne: FALLBACK_PRICE_PER_TONNE,
            currency: Currency::Eur,
            exchange_rate: FALLBACK_EXCHANGE_RATE,
            reporting_currency: Currency::Brl,
        }
    }
}

/// A usable price, possibly built from fallback constants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPrice {
    pub quote: PriceQuote,
    /// Units of the reporting currency per unit of the quote's currency.
    pub exchange_rate: f64,
    pub reporting_currency: Currency,
    /// True if the price or the rate is a fallback constant.
    pub is_fallback: bool,
}

impl ResolvedPrice {
    #[must_use]
    pub fn carbon_price(&self) -> CarbonPrice {
        CarbonPrice::new(self.quote.price_per_tonne).with_exchange_rate(self.exchange_rate)
    }
}

/// Fetches a price and rate from `feed`, substituting `fallback` for any
/// failed or unusable value.
///
/// A fetched value is unusable if it is non-finite or not strictly positive.
/// The fallback exchange rate only applies when the quote is in the fallback
/// currency; otherwise a failed rate lookup falls back to the full fallback
/// quote.
pub fn resolve_price<F: PriceFeed + ?Sized>(feed: &F, fallback: &PriceFallback) -> ResolvedPrice {
    let fallback_quote = || PriceQuote {
        price_per_tonne: fallback.price_per_tonne,
        currency: fallback.currency,
        source: "fallback".into(),
    };

    let (quote, price_fell_back) = match feed.carbon_price() {
        PriceFetchResult::Success(quote) if usable(quote.price_per_tonne) => (quote, false),
        PriceFetchResult::Success(quote) => {
            warn!(price = quote.price_per_tonne, source = %quote.source, "unusable carbon price, using fallback");
            (fallback_quote(), true)
        }
        PriceFetchResult::Failure(reason) => {
            warn!(%reason, "carbon price unavailable, using fallback");
            (fallback_quote(), true)
        }
    };

    let to = fallback.reporting_currency;
    let (quote, exchange_rate, rate_fell_back) = match feed.exchange_rate(quote.currency, to) {
        RateFetchResult::Success { rate, .. } if usable(rate) => (quote, rate, false),
        failed => {
            let reason = match failed {
                RateFetchResult::Failure(reason) => reason,
                RateFetchResult::Success { rate, .. } => format!("unusable rate {rate}"),
            };
            warn!(%reason, from = %quote.currency, %to, "exchange rate unavailable, using fallback");
            if quote.currency == fallback.currency {
                (quote, fallback.exchange_rate, true)
            } else {
                (fallback_quote(), fallback.exchange_rate, true)
            }
        }
    };

    ResolvedPrice {
        quote,
        exchange_rate,
        reporting_currency: to,
        is_fallback: price_fell_back || rate_fell_back,
    }
}

fn usable(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[derive(Debug, Clone, PartialEq)]
struct CachedPrice {
    resolved: ResolvedPrice,
    checked_at: Timestamp,
}

/// A feed wrapper that resolves prices at most once per `max_age`.
///
/// A refresh that falls back keeps the last price fetched from the feed,
/// if there is one.
#[derive(Debug, Clone)]
pub struct CachedPriceFeed<F> {
    feed: F,
    fallback: PriceFallback,
    max_age: SignedDuration,
    cached: Option<CachedPrice>,
}

impl<F: PriceFeed> CachedPriceFeed<F> {
    #[must_use]
    pub fn new(feed: F, fallback: PriceFallback, max_age: SignedDuration) -> Self {
        Self {
            feed,
            fallback,
            max_age,
            cached: None,
        }
    }

    #[must_use]
    pub fn feed(&self) -> &F {
        &self.feed
    }

    #[must_use]
    pub fn current(&self) -> Option<&ResolvedPrice> {
        self.cached.as_ref().map(|cached| &cached.resolved)
    }

    /// When the feed was last consulted.
    #[must_use]
    pub fn checked_at(&self) -> Option<Timestamp> {
        self.cached.as_ref().map(|cached| cached.checked_at)
    }

    #[must_use]
    pub fn is_stale(&self, now: Timestamp) -> bool {
        self.checked_at()
            .is_none_or(|checked_at| now.duration_since(checked_at) >= self.max_age)
    }

    /// Returns the cached price, consulting the feed first if it is stale.
    pub fn refresh_if_stale(&mut self, now: Timestamp) -> &ResolvedPrice {
        let entry = match self.cached.take() {
            Some(cached) if now.duration_since(cached.checked_at) < self.max_age => cached,
            previous => self.refresh(previous, now),
        };
        &self.cached.insert(entry).resolved
    }

    fn refresh(&self, previous: Option<CachedPrice>, now: Timestamp) -> CachedPrice {
        let resolved = resolve_price(&self.feed, &self.fallback);

        match previous {
            Some(previous) if resolved.is_fallback && !previous.resolved.is_fallback => {
                warn!(
                    source = %previous.resolved.quote.source,
                    "price refresh failed, keeping last fetched price"
                );
                CachedPrice {
                    resolved: previous.resolved,
                    checked_at: now,
                }
            }
            _ => {
                info!(
                    price = resolved.quote.price_per_tonne,
                    currency = %resolved.quote.currency,
                    exchange_rate = resolved.exchange_rate,
                    fallback = resolved.is_fallback,
                    "refreshed carbon price"
                );
                CachedPrice {
                    resolved,
                    checked_at: now,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::{Cell, RefCell};

    use approx::assert_relative_eq;

    fn quote(price: f64) -> PriceQuote {
        PriceQuote {
            price_per_tonne: price,
            currency: Currency::Eur,
            source: "exchange".into(),
        }
    }

    #[test]
    fn fixed_feed_resolves_without_fallback() {
        let feed = FixedPriceFeed::new(quote(90.0)).with_rate(Currency::Eur, Currency::Brl, 6.0);
        let resolved = resolve_price(&feed, &PriceFallback::default());

        assert!(!resolved.is_fallback);
        assert_eq!(resolved.quote, quote(90.0));
        assert_relative_eq!(resolved.carbon_price().value_of(1.0), 540.0);
    }

    #[test]
    fn inverse_and_identity_rates() {
        let feed = FixedPriceFeed::new(quote(90.0)).with_rate(Currency::Brl, Currency::Eur, 0.25);
        assert_eq!(
            feed.exchange_rate(Currency::Eur, Currency::Brl),
            RateFetchResult::Success {
                rate: 4.0,
                source: "exchange".into()
            }
        );
        assert!(matches!(
            feed.exchange_rate(Currency::Usd, Currency::Usd),
            RateFetchResult::Success { rate, .. } if rate == 1.0
        ));
        assert!(matches!(
            feed.exchange_rate(Currency::Usd, Currency::Brl),
            RateFetchResult::Failure(_)
        ));
    }

    #[test]
    fn unavailable_feed_uses_reference_fallback() {
        let feed = UnavailableFeed {
            reason: "offline".into(),
        };
        let resolved = resolve_price(&feed, &PriceFallback::default());

        assert!(resolved.is_fallback);
        assert_eq!(resolved.quote.source, "fallback");
        assert_relative_eq!(resolved.quote.price_per_tonne, 85.50);
        assert_relative_eq!(resolved.exchange_rate, 5.50);
        assert_relative_eq!(resolved.carbon_price().value_of(0.200), 94.05, epsilon = 1e-9);
    }

    #[test]
    fn unusable_values_fall_back() {
        let feed = FixedPriceFeed::new(quote(f64::NAN)).with_rate(Currency::Eur, Currency::Brl, 6.0);
        let resolved = resolve_price(&feed, &PriceFallback::default());
        assert!(resolved.is_fallback);
        assert_relative_eq!(resolved.quote.price_per_tonne, 85.50);
        assert_relative_eq!(resolved.exchange_rate, 6.0);

        let feed = FixedPriceFeed::new(quote(90.0)).with_rate(Currency::Eur, Currency::Brl, -1.0);
        let resolved = resolve_price(&feed, &PriceFallback::default());
        assert!(resolved.is_fallback);
        assert_relative_eq!(resolved.quote.price_per_tonne, 90.0);
        assert_relative_eq!(resolved.exchange_rate, 5.50);
    }

    #[test]
    fn foreign_quote_without_rate_uses_full_fallback() {
        let feed = FixedPriceFeed::new(PriceQuote {
            currency: Currency::Usd,
            ..quote(95.0)
        });
        let resolved = resolve_price(&feed, &PriceFallback::default());

        assert!(resolved.is_fallback);
        assert_eq!(resolved.quote.currency, Currency::Eur);
        assert_relative_eq!(resolved.quote.price_per_tonne, 85.50);
        assert_relative_eq!(resolved.exchange_rate, 5.50);
    }

    /// Returns queued prices in order, then fails.
    struct ScriptedFeed {
        prices: RefCell<Vec<Option<f64>>>,
        calls: Cell<usize>,
    }

    impl ScriptedFeed {
        fn new(prices: &[Option<f64>]) -> Self {
            Self {
                prices: RefCell::new(prices.iter().rev().copied().collect()),
                calls: Cell::new(0),
            }
        }
    }

    impl PriceFeed for ScriptedFeed {
        fn carbon_price(&self) -> PriceFetchResult {
            self.calls.set(self.calls.get() + 1);
            match self.prices.borrow_mut().pop().flatten() {
                Some(price) => PriceFetchResult::Success(quote(price)),
                None => PriceFetchResult::Failure("scripted failure".into()),
            }
        }

        fn exchange_rate(&self, _from: Currency, _to: Currency) -> RateFetchResult {
            RateFetchResult::Success {
                rate: 6.0,
                source: "scripted".into(),
            }
        }
    }

    fn at(seconds: i64) -> Timestamp {
        Timestamp::from_second(1_700_000_000 + seconds).unwrap()
    }

    #[test]
    fn cache_refreshes_once_per_window() {
        let feed = ScriptedFeed::new(&[Some(80.0), Some(95.0)]);
        let mut cached = CachedPriceFeed::new(feed, PriceFallback::default(), SignedDuration::from_mins(10));

        assert!(cached.is_stale(at(0)));
        assert_relative_eq!(cached.refresh_if_stale(at(0)).quote.price_per_tonne, 80.0);
        assert_relative_eq!(cached.refresh_if_stale(at(300)).quote.price_per_tonne, 80.0);
        assert_eq!(cached.feed().calls.get(), 1);

        assert!(cached.is_stale(at(600)));
        assert_relative_eq!(cached.refresh_if_stale(at(600)).quote.price_per_tonne, 95.0);
        assert_eq!(cached.feed().calls.get(), 2);
        assert_eq!(cached.checked_at(), Some(at(600)));
    }

    #[test]
    fn failed_refresh_keeps_last_good_price() {
        let feed = ScriptedFeed::new(&[Some(80.0), None]);
        let mut cached = CachedPriceFeed::new(feed, PriceFallback::default(), SignedDuration::from_mins(10));

        cached.refresh_if_stale(at(0));
        let kept = cached.refresh_if_stale(at(900)).clone();
        assert!(!kept.is_fallback);
        assert_relative_eq!(kept.quote.price_per_tonne, 80.0);
        assert_eq!(cached.checked_at(), Some(at(900)));
        assert_eq!(cached.feed().calls.get(), 2);
    }

    #[test]
    fn first_failure_caches_the_fallback() {
        let feed = ScriptedFeed::new(&[None, Some(99.0)]);
        let mut cached = CachedPriceFeed::new(feed, PriceFallback::default(), SignedDuration::from_mins(10));

        assert!(cached.refresh_if_stale(at(0)).is_fallback);
        assert!(cached.current().is_some_and(|price| price.is_fallback));

        let recovered = cached.refresh_if_stale(at(601));
        assert!(!recovered.is_fallback);
        assert_relative_eq!(recovered.quote.price_per_tonne, 99.0);
    }
}
