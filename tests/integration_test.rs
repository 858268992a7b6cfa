// tests/integration_test.rs
use mc_pricer::analytics::bs_analytic;
use mc_pricer::math_utils::norm_cdf;
use mc_pricer::mc::mc_engine::{mc_price_european, price_european_option, McConfig};
use mc_pricer::mc::payoffs::{DigitalKind, DigitalPayoff, VanillaPayoff};
use mc_pricer::rng::NormalRng;
use mc_pricer::MarketParameters;

fn reference_market() -> MarketParameters {
    MarketParameters::new(100.0, 0.05, 0.20, 1.0).expect("valid market")
}

#[test]
fn test_mc_call_vs_analytic() {
    let market = reference_market();
    let k = 105.0;

    let cfg = McConfig {
        paths: 1_000_000,
        seed: Some(42),
        ..Default::default()
    };
    let result = mc_price_european(&cfg, &market, &VanillaPayoff::call(k).unwrap())
        .expect("Valid configuration");

    let analytic_price = bs_analytic::call_price(&market, k);
    let abs_error = (result.price - analytic_price).abs();

    println!("\nMC Call Price: {}", result.price);
    println!("Analytic Price: {}", analytic_price);
    println!("Standard Error: {}", result.standard_error);
    println!("Absolute Error: {}", abs_error);

    assert!(
        abs_error < 4.5 * result.standard_error,
        "Error {} exceeds 4.5 standard errors ({})",
        abs_error,
        result.standard_error
    );
}

#[test]
fn test_mc_put_vs_analytic_parallel() {
    let market = reference_market();
    let k = 105.0;

    let cfg = McConfig {
        paths: 1_000_000,
        seed: Some(7),
        workers: 4,
        ..Default::default()
    };
    let result = mc_price_european(&cfg, &market, &VanillaPayoff::put(k).unwrap())
        .expect("Valid configuration");

    let analytic_price = bs_analytic::put_price(&market, k);
    let abs_error = (result.price - analytic_price).abs();

    println!("\nMC Put Price (4 workers): {}", result.price);
    println!("Analytic Price: {}", analytic_price);
    println!("Standard Error: {}", result.standard_error);

    assert!(
        abs_error < 4.5 * result.standard_error,
        "Error {} exceeds 4.5 standard errors ({})",
        abs_error,
        result.standard_error
    );
}

#[test]
fn test_zero_volatility_is_deterministic_forward() {
    let market = MarketParameters::new(100.0, 0.05, 0.0, 1.0).unwrap();
    let call = VanillaPayoff::call(105.0).unwrap();
    let mut rng = NormalRng::seed_from_u64(1);

    let result = price_european_option(&market, 100_000, &call, 0.95, &mut rng).unwrap();

    let expected = (-0.05f64).exp() * (100.0 * 0.05f64.exp() - 105.0).max(0.0);
    println!("\nZero-vol price: {} expected: {}", result.price, expected);

    assert!((result.price - expected).abs() < 1e-10);
    assert_eq!(result.standard_error, 0.0);
    assert_eq!(result.ci_lower, result.price);
    assert_eq!(result.ci_upper, result.price);
}

#[test]
fn test_put_call_parity_with_matched_draws() {
    let market = reference_market();
    let k = 105.0;
    let n = 1_000_000;

    let call = price_european_option(
        &market,
        n,
        &VanillaPayoff::call(k).unwrap(),
        0.95,
        &mut NormalRng::seed_from_u64(2024),
    )
    .unwrap();
    let put = price_european_option(
        &market,
        n,
        &VanillaPayoff::put(k).unwrap(),
        0.95,
        &mut NormalRng::seed_from_u64(2024),
    )
    .unwrap();

    let lhs = call.price - put.price;
    let rhs = bs_analytic::parity_forward_value(&market, k);
    let tolerance = 4.0 * (call.standard_error + put.standard_error);

    println!("\nC - P = {}, S - K e^(-rT) = {}, tolerance {}", lhs, rhs, tolerance);

    assert!((lhs - rhs).abs() < tolerance, "parity gap {}", (lhs - rhs).abs());
}

#[test]
fn test_digital_call_extends_engine() {
    let market = reference_market();
    let k = 105.0;
    let digital = DigitalPayoff::new(DigitalKind::Call, k, 1.0).unwrap();

    let cfg = McConfig {
        paths: 200_000,
        seed: Some(3),
        workers: 2,
        ..Default::default()
    };
    let result = mc_price_european(&cfg, &market, &digital).unwrap();

    let drift = (market.rate - 0.5 * market.volatility.powi(2)) * market.maturity;
    let d2 = ((market.spot / k).ln() + drift) / (market.volatility * market.maturity.sqrt());
    let analytic = market.discount_factor() * norm_cdf(d2);

    println!("\nDigital call MC: {} analytic: {}", result.price, analytic);

    assert!((result.price - analytic).abs() < 4.5 * result.standard_error);
}

#[test]
fn test_prices_are_non_negative() {
    // Deep out-of-the-money on both sides
    let market = reference_market();
    for payoff in [VanillaPayoff::call(400.0).unwrap(), VanillaPayoff::put(20.0).unwrap()] {
        let cfg = McConfig {
            paths: 20_000,
            seed: Some(11),
            ..Default::default()
        };
        let r = mc_price_european(&cfg, &market, &payoff).unwrap();
        assert!(r.price >= 0.0, "{} priced negative: {}", payoff, r.price);
        assert!(r.standard_error >= 0.0);
        assert!(r.ci_lower <= r.price && r.price <= r.ci_upper);
    }
}
