//! Execution simulator: a single pass over the bar series.
//!
//! Per bar, in order:
//! 1. Ask the policy for a decision using `bars[..=i]`.
//! 2. Flat + Enter: buy at the close (slippage against us), pay commission, go long.
//! 3. Long: stop-loss, then take-profit, then a strategy Exit. The first that
//!    fires closes the position. A position is never exit-checked on its entry bar.
//! 4. Record equity: cash when flat, cash + shares × close when long. Bar 0
//!    always records the initial capital.
//!
//! A position still open after the last bar is closed at the final close with
//! `end_of_period`, and the last equity point is replaced by the realized value.
//! On a one-bar series that replacement wins over the bar-0 mark.

use super::cost_model::{CostModel, Side};
use super::exits::ExitRules;
use crate::domain::{round_cents, Bar, BarSeries, ExitReason, Position, PositionState, Trade};
use crate::strategy::{Decision, DecisionPolicy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the simulator needs besides the bars and the policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub initial_capital: f64,
    /// Fraction of available cash committed per entry, in (0, 1].
    pub position_size: f64,
    pub costs: CostModel,
    pub exits: ExitRules,
}

impl SimulationConfig {
    /// Full position, no costs, no protective exits.
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            position_size: 1.0,
            costs: CostModel::frictionless(),
            exits: ExitRules::none(),
        }
    }

    pub fn with_position_size(mut self, position_size: f64) -> Self {
        self.position_size = position_size;
        self
    }

    pub fn with_costs(mut self, costs: CostModel) -> Self {
        self.costs = costs;
        self
    }

    pub fn with_exits(mut self, exits: ExitRules) -> Self {
        self.exits = exits;
        self
    }
}

/// Trade ledger and equity curve produced by one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutput {
    pub trades: Vec<Trade>,
    /// One value per bar, aligned with the series.
    pub equity_curve: Vec<f64>,
    /// Cash after the forced close; equals the last equity point.
    pub final_capital: f64,
    /// Commission charged on every fill, unrounded.
    pub total_commission: f64,
}

/// Account state owned by the loop and passed from bar to bar.
#[derive(Debug, Clone, PartialEq)]
struct Book {
    cash: f64,
    position: PositionState,
    commission_paid: f64,
}

impl Book {
    fn new(cash: f64) -> Self {
        Self {
            cash,
            position: PositionState::Flat,
            commission_paid: 0.0,
        }
    }

    fn equity(&self, close: f64) -> f64 {
        match &self.position {
            PositionState::Flat => self.cash,
            PositionState::Long(p) => self.cash + p.market_value(close),
        }
    }

    /// Buy at `bar.close`. Stays flat if nothing is affordable.
    fn open(
        mut self,
        bar: &Bar,
        entry_reason: &str,
        config: &SimulationConfig,
    ) -> Self {
        let fill = config.costs.fill_price(bar.close, Side::Buy);
        let budget = self.cash * config.position_size;
        let shares = config.costs.affordable_shares(budget, fill);
        if !(shares.is_finite() && shares > 0.0) {
            return self;
        }

        let commission = config.costs.commission_for(fill, shares);
        self.cash = (self.cash - shares * fill - commission).max(0.0);
        self.commission_paid += commission;
        debug!(date = %bar.date, price = fill, shares, commission, "entry filled");

        self.position = PositionState::Long(Position {
            entry_date: bar.date,
            entry_price: fill,
            shares,
            entry_commission: commission,
            entry_reason: entry_reason.to_string(),
        });
        self
    }

    /// Sell the whole position at `raw_price` (before slippage).
    fn close(
        &mut self,
        position: Position,
        date: NaiveDate,
        raw_price: f64,
        reason: ExitReason,
        costs: &CostModel,
    ) -> Trade {
        let fill = costs.fill_price(raw_price, Side::Sell);
        let commission = costs.commission_for(fill, position.shares);
        self.cash += position.shares * fill - commission;
        self.commission_paid += commission;
        self.position = PositionState::Flat;

        let pnl = position.shares * (fill - position.entry_price)
            - position.entry_commission
            - commission;
        let basis = position.cost_basis();
        let return_pct = if basis > 0.0 { pnl / basis } else { 0.0 };
        debug!(%date, price = fill, reason = %reason, pnl, "exit filled");

        Trade {
            entry_date: position.entry_date,
            exit_date: date,
            entry_price: position.entry_price,
            exit_price: fill,
            shares: position.shares,
            pnl: round_cents(pnl),
            return_pct,
            hold_days: (date - position.entry_date).num_days(),
            entry_reason: position.entry_reason,
            exit_reason: reason,
            commission_paid: round_cents(position.entry_commission + commission),
        }
    }

    /// Apply one bar's decision and protective exits.
    fn step(
        mut self,
        bar: &Bar,
        decision: Decision,
        policy: &dyn DecisionPolicy,
        config: &SimulationConfig,
    ) -> (Self, Option<Trade>) {
        match std::mem::take(&mut self.position) {
            PositionState::Flat => {
                if decision == Decision::Enter {
                    self = self.open(bar, policy.entry_reason(), config);
                }
                (self, None)
            }
            PositionState::Long(position) => {
                let exit = match config.exits.check(&position, bar) {
                    Some(trigger) => Some((trigger.reason, trigger.price)),
                    None if decision == Decision::Exit => Some((ExitReason::Signal, bar.close)),
                    None => None,
                };
                match exit {
                    Some((reason, price)) => {
                        let trade = self.close(position, bar.date, price, reason, &config.costs);
                        (self, Some(trade))
                    }
                    None => {
                        self.position = PositionState::Long(position);
                        (self, None)
                    }
                }
            }
        }
    }
}

/// Run `policy` over `series`.
///
/// Pure: the same inputs always produce the same ledger and equity curve.
/// An empty series yields no trades, an empty curve, and the initial capital.
pub fn simulate(
    series: &BarSeries,
    policy: &dyn DecisionPolicy,
    config: &SimulationConfig,
) -> SimulationOutput {
    let bars = series.bars();
    let mut book = Book::new(config.initial_capital);
    let mut trades = Vec::new();
    let mut equity_curve = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let decision = policy.decide(series.history(i));
        let (next, trade) = book.step(bar, decision, policy, config);
        book = next;
        trades.extend(trade);
        // Bar 0 is the pre-trade mark; entry costs show up from bar 1.
        let point = if i == 0 {
            config.initial_capital
        } else {
            book.equity(bar.close)
        };
        equity_curve.push(point);
    }

    if let (Some(last), PositionState::Long(position)) =
        (bars.last(), std::mem::take(&mut book.position))
    {
        let trade = book.close(
            position,
            last.date,
            last.close,
            ExitReason::EndOfPeriod,
            &config.costs,
        );
        trades.push(trade);
        if let Some(point) = equity_curve.last_mut() {
            *point = book.cash;
        }
    }

    debug!(
        bars = bars.len(),
        trades = trades.len(),
        final_capital = book.cash,
        "simulation complete"
    );

    SimulationOutput {
        trades,
        equity_curve,
        final_capital: book.cash,
        total_commission: book.commission_paid,
    }
}
