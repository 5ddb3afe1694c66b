// ═══════════════════════════════════════════════════════════════════
// Service Tests: PortfolioService, ValuationService, ReportService
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use stock_portfolio_core::errors::CoreError;
use stock_portfolio_core::models::holding::{Holding, HoldingUpdate};
use stock_portfolio_core::models::portfolio::Portfolio;
use stock_portfolio_core::providers::traits::QuoteProvider;
use stock_portfolio_core::services::portfolio_service::PortfolioService;
use stock_portfolio_core::services::report_service::ReportService;
use stock_portfolio_core::services::valuation_service::{ValuationService, MS_PER_YEAR};

// ═══════════════════════════════════════════════════════════════════
// Mock Provider
// ═══════════════════════════════════════════════════════════════════

/// Serves fixed prices, fails for unknown symbols, and records every request.
struct MockQuoteProvider {
    prices: HashMap<String, f64>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockQuoteProvider {
    fn new(prices: &[(&str, f64)]) -> Self {
        Self {
            prices: prices.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    fn name(&self) -> &str {
        "MockProvider"
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.prices.get(symbol).copied().ok_or_else(|| CoreError::Api {
            provider: "MockProvider".into(),
            message: format!("No quote for {symbol}"),
        })
    }
}

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::default()).and_utc()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn portfolio_with(entries: &[(&str, Holding)]) -> Portfolio {
    let svc = PortfolioService::new();
    let mut portfolio = Portfolio::new();
    for (symbol, holding) in entries {
        svc.add_or_replace(&mut portfolio, *symbol, holding.clone());
    }
    portfolio
}

// ═══════════════════════════════════════════════════════════════════
// PortfolioService
// ═══════════════════════════════════════════════════════════════════

mod portfolio_service {
    use super::*;

    #[test]
    fn add_inserts_new_holding() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::new();
        let previous = svc.add_or_replace(
            &mut p,
            "AAPL",
            Holding::new(10, 100.0, make_date(2022, 1, 3), "Tech"),
        );
        assert!(previous.is_none());
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("AAPL").unwrap().quantity, 10);
    }

    #[test]
    fn add_replaces_existing_entirely() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::new();
        svc.add_or_replace(&mut p, "AAPL", Holding::new(10, 100.0, make_date(2022, 1, 3), "Tech"));
        let previous = svc.add_or_replace(
            &mut p,
            "AAPL",
            Holding::new(5, 180.0, make_date(2023, 5, 1), "Hardware"),
        );

        assert_eq!(previous.unwrap().quantity, 10);
        assert_eq!(p.len(), 1);
        assert_eq!(
            p.get("AAPL"),
            Some(&Holding::new(5, 180.0, make_date(2023, 5, 1), "Hardware"))
        );
    }

    #[test]
    fn add_performs_no_validation() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::new();
        svc.add_or_replace(&mut p, "", Holding::new(0, -1.0, make_date(2030, 1, 1), ""));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn edit_changes_only_supplied_fields() {
        let svc = PortfolioService::new();
        let mut p = portfolio_with(&[("AAPL", Holding::new(10, 100.0, make_date(2022, 1, 3), "Tech"))]);

        svc.edit(&mut p, "AAPL", HoldingUpdate::new().quantity(25)).unwrap();

        let h = p.get("AAPL").unwrap();
        assert_eq!(h.quantity, 25);
        assert_eq!(h.purchase_price, 100.0);
        assert_eq!(h.purchase_date, make_date(2022, 1, 3));
        assert_eq!(h.sector, "Tech");
    }

    #[test]
    fn edit_missing_symbol_is_not_found() {
        let svc = PortfolioService::new();
        let mut p = portfolio_with(&[("AAPL", Holding::new(10, 100.0, make_date(2022, 1, 3), "Tech"))]);
        let before = p.clone();

        let err = svc
            .edit(&mut p, "MSFT", HoldingUpdate::new().quantity(1))
            .unwrap_err();

        assert!(matches!(err, CoreError::HoldingNotFound(ref s) if s == "MSFT"));
        assert!(err.is_not_found());
        assert_eq!(p, before);
    }

    #[test]
    fn remove_returns_removed_holding() {
        let svc = PortfolioService::new();
        let mut p = portfolio_with(&[
            ("AAPL", Holding::new(10, 100.0, make_date(2022, 1, 3), "Tech")),
            ("XOM", Holding::new(7, 60.0, make_date(2021, 2, 1), "Energy")),
        ]);

        let removed = svc.remove(&mut p, "XOM").unwrap();
        assert_eq!(removed.sector, "Energy");
        assert_eq!(p.len(), 1);
        assert!(!p.contains("XOM"));
    }

    #[test]
    fn remove_missing_symbol_leaves_size_unchanged() {
        let svc = PortfolioService::new();
        let mut p = portfolio_with(&[("AAPL", Holding::new(10, 100.0, make_date(2022, 1, 3), "Tech"))]);

        let err = svc.remove(&mut p, "MSFT").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn symbols_are_case_sensitive_keys() {
        let svc = PortfolioService::new();
        let mut p = portfolio_with(&[("AAPL", Holding::new(10, 100.0, make_date(2022, 1, 3), "Tech"))]);
        assert!(svc.remove(&mut p, "aapl").is_err());
        assert_eq!(p.len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// ValuationService
// ═══════════════════════════════════════════════════════════════════

mod valuation_service {
    use super::*;

    #[test]
    fn annualized_growth_matches_formula() {
        let svc = ValuationService::new();
        for &(initial, final_value, years) in &[
            (100.0, 150.0, 2.0),
            (50.0, 40.0, 3.5),
            (10.0, 10.0, 1.0),
            (1.0, 8.0, 3.0),
        ] {
            let expected: f64 = (final_value / initial as f64).powf(1.0 / years) - 1.0;
            assert_close(svc.annualized_growth(initial, final_value, years), expected);
        }
    }

    #[test]
    fn annualized_growth_known_values() {
        let svc = ValuationService::new();
        assert_close(svc.annualized_growth(1.0, 8.0, 3.0), 1.0);
        assert_close(svc.annualized_growth(100.0, 100.0, 5.0), 0.0);
        assert_close(svc.annualized_growth(100.0, 121.0, 2.0), 0.1);
    }

    #[test]
    fn elapsed_years_uses_julian_year_from_utc_midnight() {
        let svc = ValuationService::new();
        let purchase = make_date(2020, 1, 1);

        let one_year = midnight_utc(purchase) + Duration::milliseconds(MS_PER_YEAR as i64);
        assert_close(svc.elapsed_years(purchase, one_year), 1.0);

        let two_years = midnight_utc(purchase) + Duration::days(730) + Duration::hours(12);
        assert_close(svc.elapsed_years(purchase, two_years), 2.0);
    }

    #[test]
    fn elapsed_years_zero_on_purchase_instant_and_negative_before() {
        let svc = ValuationService::new();
        let purchase = make_date(2024, 6, 1);
        assert_eq!(svc.elapsed_years(purchase, midnight_utc(purchase)), 0.0);
        assert!(svc.elapsed_years(purchase, midnight_utc(make_date(2024, 5, 1))) < 0.0);
    }

    #[test]
    fn cagr_is_exactly_zero_without_elapsed_time() {
        let svc = ValuationService::new();
        let purchase = make_date(2024, 6, 1);
        let h = Holding::new(10, 100.0, purchase, "Tech");

        assert_eq!(svc.cagr(&h, 500.0, midnight_utc(purchase)), 0.0);
        assert_eq!(svc.cagr(&h, 1.0, midnight_utc(make_date(2023, 1, 1))), 0.0);
    }

    #[test]
    fn values() {
        let svc = ValuationService::new();
        assert_eq!(svc.current_value(10, 150.0), 1500.0);
        assert_eq!(svc.current_value(0, 150.0), 0.0);
        assert_close(svc.projected_value(1500.0, 0.10), 1650.0);
        assert_close(svc.projected_value(1000.0, -0.25), 750.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// ReportService: with mock provider
// ═══════════════════════════════════════════════════════════════════

mod report_service {
    use super::*;

    fn aapl_two_years() -> (Portfolio, DateTime<Utc>) {
        let purchase = make_date(2022, 1, 3);
        let portfolio = portfolio_with(&[("AAPL", Holding::new(10, 100.0, purchase, "Tech"))]);
        let as_of = midnight_utc(purchase) + Duration::days(730) + Duration::hours(12);
        (portfolio, as_of)
    }

    #[tokio::test]
    async fn valuation_row_for_two_year_holding() {
        let (portfolio, as_of) = aapl_two_years();
        let provider = MockQuoteProvider::new(&[("AAPL", 150.0)]);

        let rows = ReportService::new()
            .build_valuation_report(&portfolio, &provider, as_of)
            .await;

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.symbol, "AAPL");
        assert_eq!(row.quantity, 10);
        assert_eq!(row.purchase_price, 100.0);
        assert_eq!(row.purchase_date, make_date(2022, 1, 3));
        assert_eq!(row.sector, "Tech");
        assert_eq!(row.current_price, 150.0);
        assert_eq!(row.current_value, 1500.0);
        assert_close(row.cagr, 1.5_f64.sqrt() - 1.0);
        assert!((row.cagr_pct() - 22.47).abs() < 0.01);
    }

    #[tokio::test]
    async fn valuation_cagr_zero_for_future_purchase() {
        let purchase = make_date(2030, 1, 1);
        let portfolio = portfolio_with(&[("AAPL", Holding::new(10, 100.0, purchase, "Tech"))]);
        let provider = MockQuoteProvider::new(&[("AAPL", 300.0)]);

        let rows = ReportService::new()
            .build_valuation_report(&portfolio, &provider, midnight_utc(make_date(2025, 1, 1)))
            .await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cagr, 0.0);
        assert_eq!(rows[0].current_value, 3000.0);
    }

    #[tokio::test]
    async fn failed_quote_is_skipped() {
        let purchase = make_date(2022, 1, 3);
        let portfolio = portfolio_with(&[
            ("FAIL", Holding::new(1, 10.0, purchase, "Tech")),
            ("MSFT", Holding::new(2, 200.0, purchase, "Tech")),
        ]);
        let provider = MockQuoteProvider::new(&[("MSFT", 300.0)]);

        let rows = ReportService::new()
            .build_valuation_report(&portfolio, &provider, midnight_utc(make_date(2024, 1, 3)))
            .await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "MSFT");
        assert!(rows.iter().all(|r| r.symbol != "FAIL"));
        assert_eq!(provider.calls(), vec!["FAIL", "MSFT"]);
    }

    #[tokio::test]
    async fn invalid_prices_are_treated_as_failures() {
        let purchase = make_date(2022, 1, 3);
        let portfolio = portfolio_with(&[
            ("NAN", Holding::new(1, 10.0, purchase, "Tech")),
            ("NEG", Holding::new(1, 10.0, purchase, "Tech")),
            ("OK", Holding::new(1, 10.0, purchase, "Tech")),
        ]);
        let provider =
            MockQuoteProvider::new(&[("NAN", f64::NAN), ("NEG", -5.0), ("OK", 12.0)]);

        let rows = ReportService::new()
            .build_valuation_report(&portfolio, &provider, midnight_utc(make_date(2024, 1, 3)))
            .await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "OK");
    }

    #[tokio::test]
    async fn malformed_symbols_are_never_dispatched() {
        let purchase = make_date(2022, 1, 3);
        let portfolio = portfolio_with(&[
            ("AA PL", Holding::new(1, 10.0, purchase, "Tech")),
            ("IBM", Holding::new(1, 10.0, purchase, "Tech")),
        ]);
        let provider = MockQuoteProvider::new(&[("AA PL", 1.0), ("IBM", 130.0)]);

        let rows = ReportService::new()
            .build_valuation_report(&portfolio, &provider, midnight_utc(make_date(2024, 1, 3)))
            .await;

        assert_eq!(provider.calls(), vec!["IBM"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "IBM");
    }

    #[tokio::test]
    async fn fetches_are_sequential_in_store_order() {
        let purchase = make_date(2022, 1, 3);
        let portfolio = portfolio_with(&[
            ("MSFT", Holding::new(1, 10.0, purchase, "Tech")),
            ("AAPL", Holding::new(1, 10.0, purchase, "Tech")),
            ("GOOG", Holding::new(1, 10.0, purchase, "Tech")),
        ]);
        let provider =
            MockQuoteProvider::new(&[("MSFT", 1.0), ("AAPL", 2.0), ("GOOG", 3.0)]);

        let rows = ReportService::new()
            .build_valuation_report(&portfolio, &provider, midnight_utc(make_date(2024, 1, 3)))
            .await;

        let order: Vec<&str> = portfolio.symbols();
        assert_eq!(provider.calls(), order);
        let row_order: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(row_order, order);
        assert_eq!(provider.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn every_report_refetches() {
        let (portfolio, as_of) = aapl_two_years();
        let provider = MockQuoteProvider::new(&[("AAPL", 150.0)]);
        let svc = ReportService::new();

        svc.build_valuation_report(&portfolio, &provider, as_of).await;
        svc.build_valuation_report(&portfolio, &provider, as_of).await;
        svc.build_projection_report(&portfolio, &provider, 0.1).await;

        assert_eq!(provider.calls().len(), 3);
    }

    #[tokio::test]
    async fn empty_portfolio_gives_empty_reports() {
        let portfolio = Portfolio::new();
        let provider = MockQuoteProvider::new(&[]);
        let svc = ReportService::new();

        assert!(svc
            .build_valuation_report(&portfolio, &provider, Utc::now())
            .await
            .is_empty());
        assert!(svc
            .build_projection_report(&portfolio, &provider, 0.05)
            .await
            .is_empty());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn projection_grows_current_value() {
        let (portfolio, _) = aapl_two_years();
        let provider = MockQuoteProvider::new(&[("AAPL", 150.0)]);

        let rows = ReportService::new()
            .build_projection_report(&portfolio, &provider, 0.10)
            .await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "AAPL");
        assert_eq!(rows[0].current_value, 1500.0);
        assert_close(rows[0].projected_value, 1650.0);
    }

    #[tokio::test]
    async fn projection_skips_failed_quotes() {
        let purchase = make_date(2022, 1, 3);
        let portfolio = portfolio_with(&[
            ("AAPL", Holding::new(10, 100.0, purchase, "Tech")),
            ("GONE", Holding::new(5, 10.0, purchase, "Tech")),
        ]);
        let provider = MockQuoteProvider::new(&[("AAPL", 150.0)]);

        let rows = ReportService::new()
            .build_projection_report(&portfolio, &provider, -0.2)
            .await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "AAPL");
        assert_close(rows[0].projected_value, 1200.0);
    }
}
