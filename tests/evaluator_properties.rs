use approx::assert_relative_eq;
use backcast::prelude::*;
use backcast::signal::align;
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 3, 1).unwrap()
}

//random walk bars whose ranges straddle the close
fn walk(shortcode: &str, base: f64, moves: &[(f64, f64, f64)]) -> MarketSeries {
    let mut close = base;
    let bars = moves
        .iter()
        .enumerate()
        .map(|(i, &(step, up, down))| {
            close = (close + step).max(1.0);
            let high = close + up;
            let low = (close - down).max(0.5);
            Bar::new(start() + Duration::days(i as i64), close, high, low, close).unwrap()
        })
        .collect();
    MarketSeries::new(shortcode, bars)
}

fn price_moves(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    prop::collection::vec((-3.0..3.0f64, 0.0..2.0f64, 0.0..2.0f64), len)
}

fn strategy_params() -> impl Strategy<Value = StrategyParams> {
    (0.0..3.0f64, 2usize..8, 1.0..12.0f64, 100.0..5000.0f64)
        .prop_map(|(nc, lookback, ticks, risk)| StrategyParams::new(nc, lookback, ticks, risk))
}

//trade invariants every evaluator must hold against the bars it traded
fn check_ledger(ledger: &TradeLedger, traded: &MarketSeries, contract: &ContractSpec, params: &StrategyParams) {
    let quantity = PositionSizer::for_contract(params.risk_dollars, params.loss_ticks, contract)
        .unwrap()
        .quantity();
    let stop_distance = params.loss_ticks * contract.tick_size;

    for trade in ledger {
        assert!(trade.entry_date < trade.exit_date);
        assert_eq!(trade.pnl, trade.expected_pnl(contract.point_value));
        assert_eq!(trade.quantity, quantity);

        let stop = trade.entry_price - trade.direction.sign() * stop_distance;
        let exit_bar = traded.on(trade.exit_date).unwrap();
        match trade.exit_reason {
            ExitReason::StopLoss => {
                assert_relative_eq!(trade.exit_price, stop, epsilon = 1e-9, max_relative = 1e-12);
                //only a close at or through the stop triggers it
                match trade.direction {
                    Direction::Long => assert!(exit_bar.close <= stop + 1e-9),
                    Direction::Short => assert!(exit_bar.close >= stop - 1e-9),
                }
            }
            ExitReason::Signal => {
                //a stop reached by the exit bar's close would have fired first
                match trade.direction {
                    Direction::Long => assert!(exit_bar.close > stop - 1e-9),
                    Direction::Short => assert!(exit_bar.close < stop + 1e-9),
                }
                assert_eq!(trade.exit_price, exit_bar.close);
            }
            ExitReason::EndOfData => {
                assert_eq!(trade.exit_date, traded.last().unwrap().date);
                assert_eq!(trade.exit_price, exit_bar.close);
            }
        }
    }

    //one position at a time, no re-entry on an exit bar
    for pair in ledger.trades().windows(2) {
        assert!(pair[0].exit_date < pair[1].entry_date);
    }
    //only the last trade can be marked at the final close
    let n = ledger.len();
    for trade in ledger.trades().iter().take(n.saturating_sub(1)) {
        assert_ne!(trade.exit_reason, ExitReason::EndOfData);
    }
}

proptest! {
    #[test]
    fn trend_follow_trades_are_consistent(moves in price_moves(1..90), params in strategy_params()) {
        let contract = ContractSpec::new("ES", "S&P Equity index", 0.25, 50.0);
        let series = walk("ES", 100.0, &moves);
        let evaluation = TrendFollowEvaluator::new(params).unwrap().evaluate(&contract, &series).unwrap();

        prop_assert_eq!(evaluation.is_success(), series.len() > params.ma_lookback_days);
        if let Some(ledger) = evaluation.ledger() {
            check_ledger(ledger, &series, &contract, &params);
            prop_assert!(ledger.iter().all(|t| t.instrument_label == "ES"));
        }
    }

    #[test]
    fn pairs_trades_follow_the_spread(
        moves_1 in price_moves(1..80),
        moves_2 in price_moves(1..80),
        params in strategy_params(),
        ratio in any::<bool>(),
    ) {
        let leg_1 = ContractSpec::new("GC", "Gold", 0.1, 100.0);
        let leg_2 = ContractSpec::new("SI", "Silver", 0.005, 5000.0);
        let series_1 = walk("GC", 200.0, &moves_1);
        let series_2 = walk("SI", 50.0, &moves_2);
        let kind = if ratio { SpreadKind::Ratio } else { SpreadKind::Difference };

        let evaluator = PairsReversionEvaluator::new(PairsParams::new(params).with_spread(kind)).unwrap();
        let evaluation = evaluator.evaluate(&leg_1, &leg_2, &series_1, &series_2).unwrap();
        prop_assert_eq!(evaluation.label(), "GC-SI");

        let shared = series_1.len().min(series_2.len());
        prop_assert_eq!(evaluation.is_success(), shared > params.ma_lookback_days);

        if let Some(ledger) = evaluation.ledger() {
            let synthetic = evaluation.synthetic.as_ref().unwrap();
            prop_assert_eq!(synthetic.kind, kind);
            prop_assert_eq!(evaluation.contract.tick_size, leg_1.tick_size);
            prop_assert_eq!(evaluation.contract.point_value, leg_1.point_value);

            //spread bars carry no range, so the check runs against the spread itself
            let dates: Vec<_> = series_1.dates().into_iter().take(shared).collect();
            let points: Vec<(NaiveDate, f64)> = dates
                .iter()
                .map(|&d| (d, synthetic.price(series_1.on(d).unwrap().close, series_2.on(d).unwrap().close)))
                .collect();
            let spread = MarketSeries::from_closes("GC-SI", &points);
            check_ledger(ledger, &spread, &evaluation.contract, &params);
        }
    }

    #[test]
    fn stat_arb_trades_only_the_primary(
        moves_1 in price_moves(1..80),
        moves_2 in price_moves(1..80),
        params in strategy_params().prop_filter("correlation needs three bars", |p| p.ma_lookback_days >= 3),
        min_correlation in -1.0..1.0f64,
    ) {
        let primary = ContractSpec::new("CL", "Crude Oil", 0.01, 1000.0);
        let reference = ContractSpec::new("HO", "Heating Oil", 0.0001, 42000.0);
        let series_1 = walk("CL", 80.0, &moves_1);
        let series_2 = walk("HO", 60.0, &moves_2);

        let evaluator = StatArbEvaluator::new(StatArbParams::new(params, min_correlation)).unwrap();
        let evaluation = evaluator.evaluate(&primary, &reference, &series_1, &series_2).unwrap();
        prop_assert_eq!(evaluation.label(), "CL");
        prop_assert!(evaluation.synthetic.is_none());

        if let Some(ledger) = evaluation.ledger() {
            prop_assert!(ledger.iter().all(|t| t.instrument_label == "CL"));
            //force closes land on the last date both legs share
            let (traded, _) = align(&series_1, &series_2);
            check_ledger(ledger, &traded, &primary, &params);
        }
    }

    #[test]
    fn sizer_floors_risk_over_stop(risk in 1.0..100_000.0f64, ticks in 0.5..50.0f64, tick_value in 1.0..500.0f64) {
        let quantity = backcast::portfolio::size(risk, ticks, tick_value).unwrap();
        prop_assert!(quantity >= 1);
        //never more than the budget allows, beyond the one contract floor
        if quantity > 1 {
            prop_assert!(quantity as f64 * ticks * tick_value <= risk * (1.0 + 1e-6));
        }
        prop_assert!((quantity as f64 + 1.0) * ticks * tick_value > risk * (1.0 - 1e-6));
    }
}

#[test]
fn single_bar_is_insufficient_everywhere() {
    let day = start();
    let es = ContractSpec::new("ES", "S&P Equity index", 0.25, 50.0);
    let nq = ContractSpec::new("NQ", "Nasdaq", 0.25, 20.0);
    let one_es = MarketSeries::from_closes("ES", &[(day, 4500.0)]);
    let one_nq = MarketSeries::from_closes("NQ", &[(day, 15000.0)]);
    let base = StrategyParams::new(0.25, 40, 0.1, 1000.0);
    let expected = RunStatus::InsufficientHistory {
        available: 1,
        required: 41,
    };

    let trend = TrendFollowEvaluator::new(base).unwrap().evaluate(&es, &one_es).unwrap();
    assert_eq!(trend.status, expected);

    let pairs = PairsReversionEvaluator::new(PairsParams::new(base))
        .unwrap()
        .evaluate(&es, &nq, &one_es, &one_nq)
        .unwrap();
    assert_eq!(pairs.status, expected);

    let stat_arb = StatArbEvaluator::new(StatArbParams::new(base, 0.65))
        .unwrap()
        .evaluate(&es, &nq, &one_es, &one_nq)
        .unwrap();
    assert_eq!(stat_arb.status, expected);
    assert!(stat_arb.ledger().is_none());
}

#[test]
fn zero_stop_distance_is_a_configuration_error() {
    let base = StrategyParams::new(0.25, 40, 0.0, 1000.0);
    assert!(matches!(
        TrendFollowEvaluator::new(base),
        Err(EvalError::ZeroStopDistance { .. })
    ));
    assert!(matches!(
        StatArbEvaluator::new(StatArbParams::new(base, 0.5)),
        Err(EvalError::ZeroStopDistance { .. })
    ));
}
