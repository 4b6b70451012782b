//! Swap Payload Builder
//!
//! Turns a routed trade into an unsigned entry-function call on the scripts
//! module. The wallet signs and submits it; nothing here touches keys.
//!
//! # Arguments layout
//!
//! Exact input:  `[resource_account, amount_in, min_amount_out, to, deadline]`
//! Exact output: `[resource_account, amount_out, max_amount_in, to, deadline]`
//!
//! Type arguments are the coins visited by the route, source first.

use animeswap_core::number::bigint_str;
use animeswap_core::{AccountAddress, NetworkOptions, ProtocolError, TxError};
use aptos_tx::{minutes_to_deadline, EntryFunctionPayload};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::calculator::apply_slippage;
use crate::constants::{entry, MAX_PAYLOAD_HOPS};
use crate::state::{SlippageDirection, SwapError, Trade, TradeType};

// =============================================================================
// Public Types
// =============================================================================

/// Build result containing the payload and a summary
#[derive(Debug, Clone)]
pub struct SwapBuildResult {
    pub payload: EntryFunctionPayload,
    pub summary: SwapPayloadSummary,
}

/// Summary of a swap payload for display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapPayloadSummary {
    pub trade_type: TradeType,
    #[serde(with = "bigint_str")]
    pub amount_in: BigInt,
    #[serde(with = "bigint_str")]
    pub amount_out: BigInt,
    /// Minimum received (exact input) or maximum paid (exact output)
    #[serde(with = "bigint_str")]
    pub slippage_bound: BigInt,
    pub price_impact: BigDecimal,
    pub hops: usize,
    pub deadline: u64,
}

// =============================================================================
// Validation
// =============================================================================

/// Slippage must lie strictly between 0 and 1
pub fn validate_slippage(slippage: &BigDecimal) -> Result<(), ProtocolError> {
    if *slippage <= BigDecimal::zero() || *slippage >= BigDecimal::one() {
        return Err(ProtocolError::InvalidSlippage {
            value: slippage.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn parse_recipient(to_address: &str) -> Result<AccountAddress, TxError> {
    AccountAddress::parse(to_address).ok_or_else(|| TxError::InvalidAddress {
        address: to_address.to_string(),
    })
}

/// `{scripts}::{function}`
pub(crate) fn entry_function(options: &NetworkOptions, function: &str) -> String {
    format!("{}::{}", options.modules.scripts, function)
}

// =============================================================================
// Builders
// =============================================================================

/// Build the swap payload for a routed trade, expiring `deadline_minutes` from now.
pub fn build_swap_payload(
    options: &NetworkOptions,
    trade: &Trade,
    trade_type: TradeType,
    to_address: &str,
    slippage: &BigDecimal,
    deadline_minutes: u64,
) -> Result<SwapBuildResult, SwapError> {
    build_swap_payload_with_deadline(
        options,
        trade,
        trade_type,
        to_address,
        slippage,
        minutes_to_deadline(deadline_minutes),
    )
}

/// Build the swap payload with an absolute deadline in unix seconds.
pub fn build_swap_payload_with_deadline(
    options: &NetworkOptions,
    trade: &Trade,
    trade_type: TradeType,
    to_address: &str,
    slippage: &BigDecimal,
    deadline: u64,
) -> Result<SwapBuildResult, SwapError> {
    // ----- Step 1: Validate -----
    validate_slippage(slippage)?;

    let hops = trade.hops();
    if hops == 0 || hops > MAX_PAYLOAD_HOPS {
        return Err(ProtocolError::InvalidHopCount {
            hops,
            max: MAX_PAYLOAD_HOPS,
        }
        .into());
    }

    let (Some(amount_in), Some(amount_out)) = (trade.amount_in(), trade.amount_out()) else {
        return Err(ProtocolError::InvalidAmount {
            message: "trade has no amounts".to_string(),
        }
        .into());
    };

    let to = parse_recipient(to_address)?;

    // ----- Step 2: Slippage bound -----
    let (function, fixed, slippage_bound) = match trade_type {
        TradeType::ExactIn => (
            entry::SWAP_EXACT_IN[hops - 1],
            amount_in,
            apply_slippage(amount_out, slippage, SlippageDirection::Minus),
        ),
        TradeType::ExactOut => (
            entry::SWAP_EXACT_OUT[hops - 1],
            amount_out,
            apply_slippage(amount_in, slippage, SlippageDirection::Plus),
        ),
    };

    // ----- Step 3: Assemble -----
    let payload = EntryFunctionPayload::new(
        entry_function(options, function),
        trade
            .coin_type_list
            .iter()
            .map(|coin| coin.as_str().to_string())
            .collect(),
        vec![
            options.modules.resource_account_address.clone(),
            fixed.to_string(),
            slippage_bound.to_string(),
            to.to_string(),
            deadline.to_string(),
        ],
    );

    tracing::debug!(
        "Built {} payload: {} -> {} over {} hops",
        function,
        amount_in,
        amount_out,
        hops
    );

    Ok(SwapBuildResult {
        payload,
        summary: SwapPayloadSummary {
            trade_type,
            amount_in: amount_in.clone(),
            amount_out: amount_out.clone(),
            slippage_bound,
            price_impact: trade.price_impact.clone(),
            hops,
            deadline,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::make_trade;
    use crate::testing::*;
    use animeswap_core::number::d;
    use animeswap_core::CoinType;

    const TO: &str = "0xCAFE";

    fn one_hop() -> Trade {
        make_trade(
            &COIN_A.into(),
            vec![pool(COIN_A, COIN_B, 1_000_000, 2_000_000)],
            vec![BigInt::from(10_000), BigInt::from(19_743)],
            30,
        )
    }

    fn three_hop() -> Trade {
        make_trade(
            &COIN_A.into(),
            vec![
                pool(COIN_A, COIN_B, 1_000_000, 1_000_000),
                pool(COIN_B, COIN_C, 1_000_000, 1_000_000),
                pool(COIN_C, COIN_D, 1_000_000, 1_000_000),
            ],
            vec![
                BigInt::from(1_000),
                BigInt::from(996),
                BigInt::from(992),
                BigInt::from(988),
            ],
            30,
        )
    }

    #[test]
    fn test_exact_in_payload() {
        let opts = options();
        let result = build_swap_payload_with_deadline(
            &opts,
            &one_hop(),
            TradeType::ExactIn,
            TO,
            &d("0.005").unwrap(),
            1_700_001_200,
        )
        .unwrap();

        let payload = &result.payload;
        assert_eq!(
            payload.function,
            format!("{}::swap_exact_coins_for_coins_entry", opts.modules.scripts)
        );
        assert_eq!(payload.type_arguments, vec![COIN_A, COIN_B]);
        assert_eq!(
            payload.arguments,
            vec![
                opts.modules.resource_account_address.clone(),
                "10000".to_string(),
                "19644".to_string(),
                "0xcafe".to_string(),
                "1700001200".to_string(),
            ]
        );
        assert_eq!(result.summary.slippage_bound, BigInt::from(19_644));
    }

    #[test]
    fn test_exact_out_payload() {
        let opts = options();
        let result = build_swap_payload_with_deadline(
            &opts,
            &three_hop(),
            TradeType::ExactOut,
            TO,
            &d("0.05").unwrap(),
            42,
        )
        .unwrap();

        assert!(result
            .payload
            .function
            .ends_with("::swap_coins_for_exact_coins_3_pair_entry"));
        assert_eq!(result.payload.type_arguments.len(), 4);
        assert_eq!(result.payload.arguments[1], "988");
        assert_eq!(result.payload.arguments[2], "1050");
    }

    #[test]
    fn test_invalid_slippage() {
        for value in ["0", "1", "-0.1", "1.5"] {
            let err = build_swap_payload_with_deadline(
                &options(),
                &one_hop(),
                TradeType::ExactIn,
                TO,
                &d(value).unwrap(),
                0,
            )
            .unwrap_err();
            assert!(err.is_invalid_argument(), "slippage {} accepted", value);
        }
    }

    #[test]
    fn test_invalid_hop_count() {
        let mut four = three_hop();
        four.coin_pair_list.push(pool(COIN_D, APT, 1, 1));
        four.amount_list.push(BigInt::from(1));
        four.coin_type_list.push(CoinType::from(APT));

        let err = build_swap_payload_with_deadline(
            &options(),
            &four,
            TradeType::ExactIn,
            TO,
            &d("0.01").unwrap(),
            0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SwapError::Protocol(ProtocolError::InvalidHopCount { hops: 4, max: 3 })
        ));

        let empty = Trade {
            coin_pair_list: Vec::new(),
            amount_list: Vec::new(),
            coin_type_list: Vec::new(),
            price_impact: BigDecimal::zero(),
        };
        let err = build_swap_payload_with_deadline(
            &options(),
            &empty,
            TradeType::ExactIn,
            TO,
            &d("0.01").unwrap(),
            0,
        )
        .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_invalid_recipient() {
        let err = build_swap_payload_with_deadline(
            &options(),
            &one_hop(),
            TradeType::ExactIn,
            "not-an-address",
            &d("0.01").unwrap(),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, SwapError::Tx(TxError::InvalidAddress { .. })));
    }

    #[test]
    fn test_build_swap_payload_sets_future_deadline() {
        let result = build_swap_payload(
            &options(),
            &one_hop(),
            TradeType::ExactIn,
            TO,
            &d("0.01").unwrap(),
            20,
        )
        .unwrap();
        let now = aptos_tx::unix_now();
        assert!(result.summary.deadline >= now + 20 * 60 - 5);
        assert_eq!(result.payload.arguments[4], result.summary.deadline.to_string());
    }
}
