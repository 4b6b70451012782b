use animeswap_core::CoinType;
use clap::{Args, ValueEnum};
use serde_json::json;
use swap::router_v2::get_all_routes;
use swap::{
    build_swap_payload, fetch_swap_rates, route_exact_in, route_exact_in_v2, route_exact_out,
    route_exact_out_v2, Route, SwapRates, Trade, TradeType,
};

use super::{parse_amount, parse_slippage};
use crate::Context;

/// Routing strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Depth-first search simulating every path
    V1,
    /// Enumerate routes, then simulate a sample
    V2,
}

#[derive(Debug, Args)]
pub struct RoutesArgs {
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub to: String,
    /// Defaults to the router's enumeration limit
    #[arg(long)]
    pub max_hops: Option<usize>,
}

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub to: String,
    /// Amount of `from` (or of `to` with --exact-out), raw units unless --decimals is set
    #[arg(long)]
    pub amount: String,
    /// Fix the amount received instead of the amount paid
    #[arg(long)]
    pub exact_out: bool,
    #[arg(long, value_enum, default_value_t = Strategy::V1)]
    pub strategy: Strategy,
}

impl QuoteArgs {
    pub fn trade_type(&self) -> TradeType {
        if self.exact_out {
            TradeType::ExactOut
        } else {
            TradeType::ExactIn
        }
    }
}

#[derive(Debug, Args)]
pub struct PayloadArgs {
    #[command(flatten)]
    pub quote: QuoteArgs,
    /// Fraction in (0, 1)
    #[arg(long, default_value = "0.005")]
    pub slippage: String,
    /// Minutes until the transaction expires
    #[arg(long, default_value_t = 20)]
    pub deadline: u64,
    /// Recipient of the output coin
    #[arg(long)]
    pub to_address: String,
}

#[derive(Debug, Args)]
pub struct PairQuoteArgs {
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub to: String,
    #[arg(long)]
    pub amount: String,
    #[arg(long)]
    pub exact_out: bool,
    #[arg(long, default_value = "0.005")]
    pub slippage: String,
}

pub async fn routes(ctx: &Context, args: &RoutesArgs) -> anyhow::Result<Vec<Route>> {
    let from = CoinType::new(args.from.as_str());
    let to = CoinType::new(args.to.as_str());
    let max_hops = args.max_hops.unwrap_or(ctx.router.max_hops_v2);

    let routes = get_all_routes(ctx.fetcher.as_ref(), &ctx.options, &from, &to, max_hops).await?;
    tracing::info!("Found {} routes from {} to {}", routes.len(), from, to);
    Ok(routes)
}

pub async fn quote(ctx: &Context, args: &QuoteArgs) -> anyhow::Result<Vec<Trade>> {
    let from = CoinType::new(args.from.as_str());
    let to = CoinType::new(args.to.as_str());
    let amount = parse_amount(&args.amount, ctx.decimals)?;
    let fetcher = ctx.fetcher.as_ref();

    let trades = match (args.strategy, args.trade_type()) {
        (Strategy::V1, TradeType::ExactIn) => {
            route_exact_in(fetcher, &ctx.options, &ctx.router, &from, &to, &amount).await?
        }
        (Strategy::V1, TradeType::ExactOut) => {
            route_exact_out(fetcher, &ctx.options, &ctx.router, &from, &to, &amount).await?
        }
        (Strategy::V2, TradeType::ExactIn) => {
            route_exact_in_v2(fetcher, &ctx.options, &ctx.router, &from, &to, &amount, &[])
                .await?
        }
        (Strategy::V2, TradeType::ExactOut) => {
            route_exact_out_v2(fetcher, &ctx.options, &ctx.router, &from, &to, &amount, &[])
                .await?
        }
    };

    tracing::info!(
        "{:?} {:?}: {} trades from {} to {}",
        args.strategy,
        args.trade_type(),
        trades.len(),
        from,
        to
    );
    Ok(trades)
}

pub async fn payload(ctx: &Context, args: &PayloadArgs) -> anyhow::Result<serde_json::Value> {
    let slippage = parse_slippage(&args.slippage)?;
    let trades = quote(ctx, &args.quote).await?;
    let Some(best) = trades.first() else {
        anyhow::bail!("no route from {} to {}", args.quote.from, args.quote.to);
    };

    let result = build_swap_payload(
        &ctx.options,
        best,
        args.quote.trade_type(),
        &args.to_address,
        &slippage,
        args.deadline,
    )?;
    Ok(json!({
        "summary": result.summary,
        "payload": result.payload,
    }))
}

/// Single-pool quote without routing
pub async fn pair_quote(ctx: &Context, args: &PairQuoteArgs) -> anyhow::Result<SwapRates> {
    let from = CoinType::new(args.from.as_str());
    let to = CoinType::new(args.to.as_str());
    let amount = parse_amount(&args.amount, ctx.decimals)?;
    let slippage = parse_slippage(&args.slippage)?;
    let fixed = if args.exact_out {
        TradeType::ExactOut
    } else {
        TradeType::ExactIn
    };

    Ok(fetch_swap_rates(
        ctx.fetcher.as_ref(),
        &ctx.options,
        &from,
        &to,
        &amount,
        fixed,
        &slippage,
    )
    .await?)
}
