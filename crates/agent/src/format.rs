//! Answer formatting.
//!
//! Turns raw operation results into the human-readable text promised by the
//! model's answer template. Tools with well-known shapes get dedicated
//! renderings; everything else goes through generic `${...}` placeholder
//! substitution against the first action's result.

use crate::response::ActionResult;
use market::{CoinRegistry, coins};
use serde_json::Value;

const NO_POOL_DATA: &str = "Pool Information: No data available";
const NO_DCA_ORDERS: &str = "No active DCA orders found for this wallet.";
const NO_DATA_FOUND: &str = "No data found";
const NO_DATA_AVAILABLE: &str = "No data available";
const PROCESSING_ERROR: &str = "Error processing data";

/// Render the final answer for one query.
///
/// Only the first action's result feeds the template; later results ride
/// along in the structured response untouched.
pub fn format_final_answer(
    registry: &CoinRegistry,
    template: &str,
    results: &[ActionResult],
    query: &str,
) -> String {
    let Some(first) = results.first() else {
        return template.to_string();
    };
    if first.result.is_null() {
        return template.to_string();
    }

    let data = &first.result;
    let action = &first.action;

    match first.tool.as_str() {
        "get_pool_info" if template.contains("${result}") || template == NO_POOL_DATA => {
            let summary = format!(
                "This pool has a Total Value Locked (TVL) of ${}, generates ${} in daily \
                 fees, and offers an APR of {}%.",
                thousands(number_field(data, "tvl"), 2),
                thousands(number_field(data, "fee"), 2),
                thousands(number_field(data, "apr"), 2),
            );
            format!("{summary}\n\n{}", pool_info_block(registry, data))
        }
        "get_pool_spot_price" => {
            let spot = data.as_f64().unwrap_or(f64::NAN);
            let coin_in = display_token(action.input.get("coin_in_type"));
            let coin_out = display_token(action.input.get("coin_out_type"));
            format!("The current spot price is {spot:.6} {coin_out} per {coin_in}")
        }
        "get_pool_info" if query.to_lowercase().contains("fee") => {
            format!(
                "The daily trading fees for this pool are ${}",
                thousands(number_field(data, "fee"), 2)
            )
        }
        "get_coins_price_info" => {
            let lines: Vec<String> = data
                .as_object()
                .map(|entries| {
                    entries
                        .iter()
                        .map(|(coin_type, info)| {
                            let symbol = registry
                                .symbol_for(coin_type)
                                .unwrap_or_else(|| trailing_segment(coin_type));
                            format!("{symbol}: ${}", thousands(number_field(info, "current"), 2))
                        })
                        .collect()
                })
                .unwrap_or_default();
            format!("Current prices:\n{}", lines.join("\n"))
        }
        "get_all_pools" => {
            let sort_by = action
                .input
                .get("sort_by")
                .and_then(Value::as_str)
                .unwrap_or("tvl");
            let limit = action
                .input
                .get("limit")
                .and_then(Value::as_u64)
                .unwrap_or(10) as usize;
            ranked_pools(data, sort_by, limit)
        }
        "get_dca_orders" => dca_orders_block(data),
        tool => substitute(registry, template, data, tool),
    }
}

/// The fixed-width pool overview: tokens with reserves, then headline
/// stats. Reserves arrive in base units (1e9 per whole coin).
pub fn pool_info_block(registry: &CoinRegistry, data: &Value) -> String {
    if data.is_null() {
        return "Pool information not available".to_string();
    }

    let tokens: Vec<&str> = data["tokens"]
        .as_array()
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let reserves: Vec<f64> = data["reserves"]
        .as_array()
        .map(|a| a.iter().map(lenient_f64).collect())
        .unwrap_or_default();

    let rows: Vec<String> = tokens
        .iter()
        .zip(&reserves)
        .map(|(coin_type, reserve)| {
            let symbol = registry.symbol_for(coin_type).unwrap_or("Unknown");
            format!("{symbol:<10}: {:>12}", thousands(reserve / 1e9, 2))
        })
        .collect();

    format!(
        "Pool Information\n\
         ================\n\
         ID: {}\n\
         \n\
         Tokens and Reserves:\n\
         {}\n\
         \n\
         Pool Stats:\n\
         • TVL: ${}\n\
         • Daily Fees: ${}\n\
         • APR: {}%",
        data["id"].as_str().unwrap_or_default(),
        rows.join("\n"),
        thousands(number_field(data, "tvl"), 2),
        thousands(number_field(data, "fee"), 2),
        thousands(number_field(data, "apr"), 2),
    )
}

fn ranked_pools(data: &Value, sort_by: &str, limit: usize) -> String {
    let field = match sort_by {
        "apr" => "apr",
        "fees" => "fee",
        _ => "tvl",
    };

    let mut pools: Vec<&Value> = data.as_array().map(|a| a.iter().collect()).unwrap_or_default();
    pools.sort_by(|a, b| number_field(b, field).total_cmp(&number_field(a, field)));
    pools.truncate(limit);

    pools
        .iter()
        .enumerate()
        .map(|(i, pool)| {
            format!(
                "{}. Pool {}\n    TVL: ${}\n    APR: {:.2}%\n    Daily Fees: ${}",
                i + 1,
                pool["id"].as_str().unwrap_or_default(),
                thousands(number_field(pool, "tvl"), 3),
                number_field(pool, "apr"),
                thousands(number_field(pool, "fee"), 3),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn dca_orders_block(data: &Value) -> String {
    let orders = match data {
        Value::Array(orders) => orders,
        _ => return "Unexpected DCA orders format received.".to_string(),
    };
    if orders.is_empty() {
        return NO_DCA_ORDERS.to_string();
    }

    let blocks: Vec<String> = orders
        .iter()
        .enumerate()
        .map(|(i, order)| {
            format!(
                "{}. Order ID: {}\n   From: {}\n   To: {}\n   Amount: {}\n   Frequency: {}",
                i + 1,
                text_field(order, "id"),
                text_field(order, "fromCoin"),
                text_field(order, "toCoin"),
                text_field(order, "amount"),
                text_field(order, "frequency"),
            )
        })
        .collect();

    format!("DCA Orders:\n{}", blocks.join("\n\n"))
}

/// Replace every `${expr}` in the template. A failure resolving one
/// placeholder marks that placeholder only; the rest of the answer
/// renders normally.
fn substitute(registry: &CoinRegistry, template: &str, data: &Value, tool: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let expr = &after[..end];
                out.push_str(&resolve_placeholder(registry, expr, data, tool));
                rest = &after[end + 1..];
            }
            None => {
                out.push_str("${");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn resolve_placeholder(registry: &CoinRegistry, expr: &str, data: &Value, tool: &str) -> String {
    let unresolved = || format!("${{{expr}}}");

    if expr.contains("results[") {
        let Some((coin, field)) = per_coin_pattern(expr) else {
            return unresolved();
        };
        // Result mappings key SUI by whichever form the provider favors;
        // try the key as written, then the padded form, then the short one.
        for key in [coin, coins::normalize(coin), coins::shorten(coin)] {
            let Some(value) = data.get(key).and_then(|entry| entry.get(field)) else {
                continue;
            };
            return match value.as_f64() {
                Some(number) => format!("{number:.3}"),
                None => PROCESSING_ERROR.to_string(),
            };
        }
        return unresolved();
    }

    let path = expr.strip_prefix("result.").unwrap_or(expr);
    match walk(data, path) {
        Err(()) => PROCESSING_ERROR.to_string(),
        Ok(None) => NO_DATA_AVAILABLE.to_string(),
        Ok(Some(value)) => render_leaf(registry, value, tool),
    }
}

/// Parse `results['<coin>'].<field>`.
fn per_coin_pattern(expr: &str) -> Option<(&str, &str)> {
    let after = expr.split_once("results['")?.1;
    let (coin, rest) = after.split_once("']")?;
    let field = rest.strip_prefix('.')?;
    (!coin.is_empty() && !field.is_empty()).then_some((coin, field))
}

/// Walk a dotted path into the result. `Err` marks a lookup on a missing
/// intermediate value, `Ok(None)` a miss at the final step.
fn walk<'v>(data: &'v Value, path: &str) -> Result<Option<&'v Value>, ()> {
    let mut current = Some(data);
    for key in path.split('.') {
        current = match current {
            None => return Err(()),
            Some(Value::Null) => return Err(()),
            Some(value) => index(value, key),
        };
    }
    Ok(current)
}

fn index<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn render_leaf(registry: &CoinRegistry, value: &Value, tool: &str) -> String {
    match value {
        Value::Null => NO_DATA_AVAILABLE.to_string(),
        Value::Array(items) if items.is_empty() => NO_DATA_FOUND.to_string(),
        Value::Array(_) => serde_json::to_string_pretty(value).unwrap_or_default(),
        Value::Object(_) if tool == "get_pool_info" => pool_info_block(registry, value),
        Value::Object(_) => serde_json::to_string_pretty(value).unwrap_or_default(),
        Value::Number(_) => format!("{:.3}", lenient_f64(value)),
        Value::String(s) => match s.parse::<f64>() {
            Ok(number) => format!("{number:.3}"),
            Err(_) => s.clone(),
        },
        Value::Bool(b) => b.to_string(),
    }
}

fn display_token(value: Option<&Value>) -> &str {
    let segment = value
        .and_then(Value::as_str)
        .map(trailing_segment)
        .unwrap_or_default();
    if segment.is_empty() { "token" } else { segment }
}

fn trailing_segment(coin_type: &str) -> &str {
    coin_type.rsplit("::").next().unwrap_or(coin_type)
}

fn number_field(value: &Value, field: &str) -> f64 {
    value.get(field).map(lenient_f64).unwrap_or(0.0)
}

/// Numbers arrive both as JSON numbers and as stringified base units.
fn lenient_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn text_field(value: &Value, field: &str) -> String {
    match value.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// en-US style grouping with up to `decimals` fraction digits, trailing
/// zeros trimmed.
fn thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part.map(|f| f.trim_end_matches('0')).filter(|f| !f.is_empty()) {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
