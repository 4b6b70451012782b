use animeswap_core::CoinType;
use clap::Subcommand;
use swap::{fetch_add_liquidity_rates, fetch_remove_liquidity_rates};

use super::parse_amount;
use crate::{print_json, Context};

#[derive(Debug, Subcommand)]
pub enum LiquidityCommand {
    /// Counter-amount needed to deposit `amount` of the fixed coin
    Add {
        #[arg(long)]
        fixed: String,
        #[arg(long)]
        other: String,
        #[arg(long)]
        amount: String,
    },
    /// Coins returned for burning LP coin
    Remove {
        #[arg(long)]
        coin_x: String,
        #[arg(long)]
        coin_y: String,
        #[arg(long)]
        lp_amount: String,
    },
}

pub async fn liquidity(ctx: &Context, cmd: &LiquidityCommand) -> anyhow::Result<()> {
    let fetcher = ctx.fetcher.as_ref();
    match cmd {
        LiquidityCommand::Add {
            fixed,
            other,
            amount,
        } => {
            let rates = fetch_add_liquidity_rates(
                fetcher,
                &ctx.options,
                &CoinType::new(fixed.as_str()),
                &CoinType::new(other.as_str()),
                &parse_amount(amount, ctx.decimals)?,
            )
            .await?;
            print_json(&rates)
        }
        LiquidityCommand::Remove {
            coin_x,
            coin_y,
            lp_amount,
        } => {
            let rates = fetch_remove_liquidity_rates(
                fetcher,
                &ctx.options,
                &CoinType::new(coin_x.as_str()),
                &CoinType::new(coin_y.as_str()),
                &parse_amount(lp_amount, ctx.decimals)?,
            )
            .await?;
            print_json(&rates)
        }
    }
}
